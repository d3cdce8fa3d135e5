use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DeployError;

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Environment {
    #[serde(rename = "stg", alias = "staging")]
    Staging,
    #[serde(rename = "prd", alias = "prod", alias = "production")]
    Production,
}

impl Environment {
    pub const ALL: [Environment; 2] = [Environment::Staging, Environment::Production];

    /// Short name, also the directory under `conf/`
    pub fn as_dir(self) -> &'static str {
        match self {
            Environment::Staging => "stg",
            Environment::Production => "prd",
        }
    }

    /// Domain suffix the environment's virtual host answers on
    pub fn domain_suffix(self) -> &'static str {
        match self {
            Environment::Staging => "knilab.com",
            Environment::Production => "com",
        }
    }
}

impl FromStr for Environment {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stg" | "staging" => Ok(Environment::Staging),
            "prd" | "prod" | "production" => Ok(Environment::Production),
            _ => Err(DeployError::UnknownEnvironment(s.to_string())),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_dir())
    }
}

/// Which Apache configuration file a site points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigVariant {
    /// Normal operation
    Active,
    /// Maintenance page for every request
    Maintenance,
}

impl ConfigVariant {
    pub const ALL: [ConfigVariant; 2] = [ConfigVariant::Active, ConfigVariant::Maintenance];

    /// File name inside `conf/<env>/`
    pub fn file_name(self) -> &'static str {
        match self {
            ConfigVariant::Active => "apache",
            ConfigVariant::Maintenance => "apache.maintenance",
        }
    }

    pub fn from_maintenance(maintenance: bool) -> Self {
        if maintenance {
            ConfigVariant::Maintenance
        } else {
            ConfigVariant::Active
        }
    }
}

impl fmt::Display for ConfigVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigVariant::Active => f.write_str("active"),
            ConfigVariant::Maintenance => f.write_str("maintenance"),
        }
    }
}
