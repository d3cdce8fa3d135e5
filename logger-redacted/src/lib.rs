//! Logging for sitectl with secret redaction
//!
//! Installs a `tracing` subscriber that writes to stderr (so rendered
//! configuration on stdout stays clean) and provides a [`SecretRedactor`]
//! that masks Django `SECRET_KEY` assignments and AWS credentials before
//! they reach a log line.
//!
//! Redacted values are replaced with a short SHA-256 prefix so the same
//! secret can be correlated across log lines without being exposed:
//!
//! ```rust
//! use logger_redacted::{RedactionConfig, SecretRedactor};
//!
//! let redactor = SecretRedactor::new(RedactionConfig::default()).unwrap();
//! let line = redactor.redact("SECRET_KEY='s3cr3t'");
//! assert!(line.starts_with("SECRET_KEY='SECRET["));
//! assert!(!line.contains("s3cr3t"));
//! ```

pub mod config;
pub mod error;
pub mod macros;
pub mod redactor;

pub use config::*;
pub use error::*;
pub use redactor::*;

use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `config.log_level` when set.
///
/// # Errors
///
/// Returns an error if the level is not a valid filter or a global
/// subscriber is already installed.
pub fn init(config: &LoggerConfig) -> Result<(), LoggerError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level)
            .map_err(|_| LoggerError::InvalidFilter(config.log_level.clone()))?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = if config.json_output {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| LoggerError::InitFailed(e.to_string()))
}

/// Redactor matching `config.redaction_enabled`
///
/// # Errors
///
/// See [`SecretRedactor::new`].
pub fn redactor_for(config: &LoggerConfig) -> Result<SecretRedactor, LoggerError> {
    if config.redaction_enabled {
        SecretRedactor::new(RedactionConfig::default())
    } else {
        SecretRedactor::disabled()
    }
}
