//! Classifying cloud instances into host roles by name.
//!
//! Instances are named `<env>-<role><n>`, e.g. `stg-app1` or `prd-work12`.
//! Anything after the number is ignored.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::environment::Environment;
use crate::error::{DeployError, DeployResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    App,
    Work,
    Pgis,
    Mongo,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::App, Role::Work, Role::Pgis, Role::Mongo];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::App => "app",
            Role::Work => "work",
            Role::Pgis => "pgis",
            Role::Mongo => "mongo",
        }
    }
}

impl FromStr for Role {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "app" => Ok(Role::App),
            "work" => Ok(Role::Work),
            "pgis" => Ok(Role::Pgis),
            "mongo" => Ok(Role::Mongo),
            _ => Err(DeployError::UnknownRole(s.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Matches instance names for one environment
#[derive(Debug, Clone)]
pub struct InstanceClassifier {
    environment: Environment,
    pattern: Regex,
}

impl InstanceClassifier {
    /// # Errors
    ///
    /// Fails only if the generated pattern does not compile.
    pub fn new(environment: Environment) -> DeployResult<Self> {
        let pattern = Regex::new(&format!(
            r"^{}-(?P<role>[a-zA-Z]+)[0-9]+",
            regex::escape(environment.as_dir())
        ))?;
        Ok(Self {
            environment,
            pattern,
        })
    }

    /// Role for `name`, or `None` if the name belongs to another
    /// environment or names an unknown role.
    pub fn classify(&self, name: &str) -> Option<Role> {
        let captures = self.pattern.captures(name)?;
        let role = captures.name("role")?.as_str();
        match role.parse() {
            Ok(role) => Some(role),
            Err(_) => {
                warn!(
                    instance = name,
                    role,
                    environment = %self.environment,
                    "Ignoring instance with unknown role"
                );
                None
            }
        }
    }
}

/// Hosts per role, as `<user>@<public dns>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RoleMap {
    roles: BTreeMap<Role, Vec<String>>,
}

impl Default for RoleMap {
    fn default() -> Self {
        Self {
            roles: Role::ALL.into_iter().map(|role| (role, Vec::new())).collect(),
        }
    }
}

impl RoleMap {
    /// Build the map from `(instance name, public dns)` pairs.
    ///
    /// # Errors
    ///
    /// See [`InstanceClassifier::new`].
    pub fn from_instances<I, N, D>(
        environment: Environment,
        app_user: &str,
        instances: I,
    ) -> DeployResult<Self>
    where
        I: IntoIterator<Item = (N, D)>,
        N: AsRef<str>,
        D: AsRef<str>,
    {
        let classifier = InstanceClassifier::new(environment)?;
        let mut map = Self::default();

        for (name, dns) in instances {
            let name = name.as_ref();
            if let Some(role) = classifier.classify(name) {
                debug!(instance = name, role = %role, "Classified instance");
                map.add(role, format!("{app_user}@{}", dns.as_ref()));
            }
        }
        Ok(map)
    }

    pub fn add(&mut self, role: Role, host: String) {
        self.roles.entry(role).or_default().push(host);
    }

    pub fn hosts(&self, role: Role) -> &[String] {
        self.roles.get(&role).map(Vec::as_slice).unwrap_or_default()
    }

    /// Total number of hosts across roles
    pub fn len(&self) -> usize {
        self.roles.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parse a `name dns` line; blank lines and `#` comments yield `None`.
pub fn parse_instance_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let mut fields = line.split_whitespace();
    match (fields.next(), fields.next()) {
        (Some(name), Some(dns)) => Some((name, dns)),
        _ => None,
    }
}
