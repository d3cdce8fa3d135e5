use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Malformed placeholder at byte {offset}: {reason}")]
    MalformedPlaceholder { offset: usize, reason: String },

    #[error("Template variable `{0}` is not set")]
    MissingVariable(String),

    #[error("Template variable `{0}` is empty")]
    EmptyVariable(String),

    #[error("Value for `{0}` contains placeholder delimiters")]
    InvalidValue(String),

    #[error("Rendered output still contains placeholder `{token}` at byte {offset}")]
    UnresolvedPlaceholder { token: String, offset: usize },

    #[error("Rendered output does not match template with substitutions applied")]
    LiteralMismatch,

    #[error("Invalid context entry `{0}`, expected KEY=VALUE")]
    InvalidEntry(String),

    #[error("Configuration source not found: {0}")]
    SourceNotFound(String),

    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    #[error("Configuration parsing failed: {0}")]
    ParseError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
