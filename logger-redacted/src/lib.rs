pub mod redactor;
pub mod macros;
pub mod config;

pub use redactor::*;
pub use config::*;

#[doc(hidden)]
pub use tracing;

use error_common::{EngineError, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Patient-safe logging with automatic PII redaction
///
/// Field assessments carry patient names and contact numbers. Nothing in
/// this workspace logs those values in clear text: names are registered on
/// a [`PiiRedactor`] and replaced by a short correlation hash, e-mail
/// addresses and phone numbers are detected by pattern.
///
/// # Example
///
/// ```rust
/// use logger_redacted::{init_tracing, LoggerConfig, PiiRedactor, RedactionConfig};
///
/// init_tracing(&LoggerConfig::default()).unwrap();
///
/// let redactor = PiiRedactor::new(RedactionConfig::default()).with_name("Juan Dela Cruz");
/// logger_redacted::redacted_info!(redactor, "Assessment generated for {}", "Juan Dela Cruz");
/// // Output: "Assessment generated for PATIENT[...]"
/// ```
///
/// Installing the global subscriber more than once is a no-op, so tests and
/// binaries can both call [`init_tracing`] freely.
pub fn init_tracing(config: &LoggerConfig) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level)
            .map_err(|e| EngineError::Logging(format!("invalid log level '{}': {}", config.log_level, e)))?,
    };

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if config.json {
        registry
            .with(fmt::layer().with_target(false).with_ansi(false).json())
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(true).with_level(true))
            .try_init()
    };

    if let Err(e) = installed {
        tracing::debug!(reason = %e, "Tracing subscriber already installed");
    }

    Ok(())
}

/// Build the redactor matching a logger configuration
pub fn redactor_for(config: &LoggerConfig) -> PiiRedactor {
    PiiRedactor::new(RedactionConfig {
        enabled: config.redaction_enabled,
        ..Default::default()
    })
}
