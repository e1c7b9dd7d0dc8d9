// Logging macros that pass the formatted message through a `PiiRedactor`
#[macro_export]
macro_rules! redacted_info {
    ($redactor:expr, $($arg:tt)*) => {
        $crate::tracing::info!("{}", $redactor.redact(&format!($($arg)*)))
    };
}

#[macro_export]
macro_rules! redacted_warn {
    ($redactor:expr, $($arg:tt)*) => {
        $crate::tracing::warn!("{}", $redactor.redact(&format!($($arg)*)))
    };
}
