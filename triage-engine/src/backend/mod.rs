//! Neural inference backends for the text scorer
//!
//! The text scorer only needs logits for a tokenized input. Which runtime
//! produces them is a deployment choice, so it sits behind a trait with a
//! factory picking the implementation from configuration.

mod linear;
mod null;

pub use linear::{LinearTextBackend, LinearWeights};
pub use null::NullBackend;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::error::TriageResult;
use crate::models::ModelStore;
use config_engine::TextSettings;

/// Result of the one-time backend capability check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum BackendAvailability {
    Available,
    Unavailable(String),
}

impl BackendAvailability {
    pub fn is_available(&self) -> bool {
        matches!(self, BackendAvailability::Available)
    }
}

impl fmt::Display for BackendAvailability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendAvailability::Available => write!(f, "available"),
            BackendAvailability::Unavailable(reason) => write!(f, "unavailable ({})", reason),
        }
    }
}

#[async_trait]
pub trait InferenceBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Load model state; an error marks the backend unavailable for the process
    async fn initialize(&self) -> TriageResult<()>;

    /// One logit per disease class for a single encoded input
    async fn infer(&self, input_ids: &[i64], attention_mask: &[i64]) -> TriageResult<Vec<f32>>;
}

/// Pick the backend for the text scorer
pub fn create_backend(settings: &TextSettings, store: Arc<ModelStore>) -> Arc<dyn InferenceBackend> {
    if settings.neural_enabled {
        Arc::new(LinearTextBackend::new(settings.model_id.clone(), store))
    } else {
        Arc::new(NullBackend)
    }
}
