use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Invalid redaction pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Invalid log filter `{0}`")]
    InvalidFilter(String),

    #[error("Logger initialization failed: {0}")]
    InitFailed(String),
}
