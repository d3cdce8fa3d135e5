// Logger configuration
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerConfig {
    pub redaction_enabled: bool,
    pub json_output: bool,
    pub log_level: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            redaction_enabled: true,
            json_output: false,
            log_level: "info".to_string(),
        }
    }
}

impl LoggerConfig {
    /// Level used when `-v` is passed `verbosity` times
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.log_level = match verbosity {
            0 => self.log_level,
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        };
        self
    }
}
