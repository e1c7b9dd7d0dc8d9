use async_trait::async_trait;

use super::InferenceBackend;
use crate::error::{TriageError, TriageResult};

/// Backend for devices without a neural runtime; always unavailable
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBackend;

#[async_trait]
impl InferenceBackend for NullBackend {
    fn name(&self) -> &'static str {
        "null"
    }

    async fn initialize(&self) -> TriageResult<()> {
        Err(TriageError::BackendUnavailable("neural scoring disabled".to_string()))
    }

    async fn infer(&self, _input_ids: &[i64], _attention_mask: &[i64]) -> TriageResult<Vec<f32>> {
        Err(TriageError::BackendUnavailable("neural scoring disabled".to_string()))
    }
}
