// Logging macros that pass the formatted message through a redactor
#[macro_export]
macro_rules! redacted_info {
    ($redactor:expr, $($arg:tt)*) => {
        tracing::info!("{}", $redactor.redact(&format!($($arg)*)))
    };
}

#[macro_export]
macro_rules! redacted_debug {
    ($redactor:expr, $($arg:tt)*) => {
        tracing::debug!("{}", $redactor.redact(&format!($($arg)*)))
    };
}
