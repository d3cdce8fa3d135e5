use std::path::PathBuf;

use config_engine::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Invalid project name `{name}`: {reason}")]
    InvalidProjectName { name: String, reason: String },

    #[error("Unknown environment `{0}`, expected one of: stg, prd")]
    UnknownEnvironment(String),

    #[error("Unknown role `{0}`, expected one of: app, work, pgis, mongo")]
    UnknownRole(String),

    #[error("Template error: {0}")]
    Template(#[from] ConfigError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid instance name pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Unsupported on this platform: {0}")]
    Unsupported(String),
}

impl DeployError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type DeployResult<T> = Result<T, DeployError>;
