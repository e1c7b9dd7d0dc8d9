use thiserror::Error;

use crate::codes;

/// Workspace-level error enum used at binary and service boundaries
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller input errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Scoring model and asset errors
    #[error("Model error: {0}")]
    Model(String),

    /// Logging subsystem errors
    #[error("Logging error: {0}")]
    Logging(String),

    /// File system errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode/decode errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal system errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// Wrapped external errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EngineError {
    /// Stable machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => codes::config::INVALID_CONFIGURATION,
            Self::Validation(_) => codes::validation::INVALID_INPUT,
            Self::Model(_) => codes::model::MODEL_UNAVAILABLE,
            Self::Logging(_) => codes::system::LOGGING_INIT_FAILED,
            Self::Io(_) => codes::system::IO_FAILURE,
            Self::Serialization(_) => codes::validation::INVALID_FORMAT,
            Self::Internal(_) | Self::Other(_) => codes::system::INTERNAL,
        }
    }

    /// Short category name used as a structured log field
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Validation(_) | Self::Serialization(_) => "validation",
            Self::Model(_) => "model",
            Self::Logging(_) => "logging",
            Self::Io(_) => "io",
            Self::Internal(_) | Self::Other(_) => "internal",
        }
    }
}

/// Result type alias for workspace operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Async logging function for errors
pub async fn log_error(context: &str, error: &EngineError) {
    tracing::error!(
        context = context,
        error_code = error.code(),
        error_type = error.error_type(),
        error = %error,
        "Triage engine error occurred"
    );
}
