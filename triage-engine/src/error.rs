use thiserror::Error;

#[derive(Error, Debug)]
pub enum TriageError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Model {0} not found in manifest")]
    ModelNotFound(String),

    #[error("Model asset for {id} not found. Verify manifest path {path}")]
    AssetMissing { id: String, path: String },

    #[error("Model cache error: {0}")]
    Cache(String),

    #[error("Scoring backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    #[error("Malformed model: {0}")]
    Model(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<TriageError> for error_common::EngineError {
    fn from(err: TriageError) -> Self {
        match err {
            TriageError::Config(msg) => error_common::EngineError::Config(msg),
            TriageError::Io(e) => error_common::EngineError::Io(e),
            TriageError::Serialization(e) => error_common::EngineError::Serialization(e),
            other => error_common::EngineError::Model(other.to_string()),
        }
    }
}

pub type TriageResult<T> = Result<T, TriageError>;
