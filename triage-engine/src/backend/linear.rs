use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

use super::InferenceBackend;
use crate::error::{TriageError, TriageResult};
use crate::models::ModelStore;

/// Bag-of-tokens linear classifier exported as JSON
///
/// `token_weights` maps a token id (as a string key) to one weight per class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearWeights {
    pub num_classes: usize,
    pub bias: Vec<f32>,
    #[serde(default)]
    pub token_weights: HashMap<String, Vec<f32>>,
}

#[derive(Debug)]
struct LoadedWeights {
    bias: Vec<f32>,
    rows: HashMap<i64, Vec<f32>>,
}

impl LinearWeights {
    fn compile(self) -> TriageResult<LoadedWeights> {
        if self.bias.len() != self.num_classes {
            return Err(TriageError::Model(format!(
                "bias has {} entries, expected {}",
                self.bias.len(),
                self.num_classes
            )));
        }
        let mut rows = HashMap::with_capacity(self.token_weights.len());
        for (key, row) in self.token_weights {
            let id: i64 = key
                .parse()
                .map_err(|_| TriageError::Model(format!("token id '{}' is not an integer", key)))?;
            if row.len() != self.num_classes {
                return Err(TriageError::Model(format!(
                    "token {} has {} weights, expected {}",
                    id,
                    row.len(),
                    self.num_classes
                )));
            }
            rows.insert(id, row);
        }
        Ok(LoadedWeights { bias: self.bias, rows })
    }
}

/// Pure-Rust text classifier: logits = bias + sum of attended token rows
pub struct LinearTextBackend {
    model_id: String,
    store: Arc<ModelStore>,
    weights: OnceCell<LoadedWeights>,
}

impl LinearTextBackend {
    pub fn new(model_id: impl Into<String>, store: Arc<ModelStore>) -> Self {
        Self {
            model_id: model_id.into(),
            store,
            weights: OnceCell::new(),
        }
    }

    async fn load(&self) -> TriageResult<LoadedWeights> {
        let path = self.store.resolve(&self.model_id).await?;
        let raw = tokio::fs::read_to_string(&path).await?;
        let weights: LinearWeights = serde_json::from_str(&raw)?;
        let classes = weights.num_classes;
        let loaded = weights.compile()?;
        info!(model = %self.model_id, classes, tokens = loaded.rows.len(), "Linear text model loaded");
        Ok(loaded)
    }
}

#[async_trait]
impl InferenceBackend for LinearTextBackend {
    fn name(&self) -> &'static str {
        "linear"
    }

    async fn initialize(&self) -> TriageResult<()> {
        self.weights.get_or_try_init(|| self.load()).await.map(|_| ())
    }

    async fn infer(&self, input_ids: &[i64], attention_mask: &[i64]) -> TriageResult<Vec<f32>> {
        let weights = self
            .weights
            .get()
            .ok_or_else(|| TriageError::BackendUnavailable(format!("model {} not loaded", self.model_id)))?;
        if input_ids.len() != attention_mask.len() {
            return Err(TriageError::Inference(format!(
                "input_ids ({}) and attention_mask ({}) differ in length",
                input_ids.len(),
                attention_mask.len()
            )));
        }

        let mut logits = weights.bias.clone();
        for (id, mask) in input_ids.iter().zip(attention_mask) {
            if *mask == 0 {
                continue;
            }
            if let Some(row) = weights.rows.get(id) {
                for (logit, w) in logits.iter_mut().zip(row) {
                    *logit += w;
                }
            }
        }
        Ok(logits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ModelEntry, ModelKind, ModelManifest};

    async fn backend_with(weights: serde_json::Value) -> (LinearTextBackend, tempfile::TempDir, tempfile::TempDir) {
        let assets = tempfile::tempdir().unwrap();
        let cache = tempfile::tempdir().unwrap();
        std::fs::write(assets.path().join("linear.json"), weights.to_string()).unwrap();
        let manifest = ModelManifest {
            version: "1".into(),
            models: vec![ModelEntry {
                id: "symptom-linear".into(),
                kind: ModelKind::Json,
                path: "linear.json".into(),
                description: String::new(),
                input: vec![],
                output: vec![],
                size_mb: 0.0,
            }],
        };
        let store = Arc::new(ModelStore::new(manifest, assets.path(), cache.path()));
        (LinearTextBackend::new("symptom-linear", store), assets, cache)
    }

    #[tokio::test]
    async fn test_infer_sums_attended_rows() {
        let (backend, _a, _c) = backend_with(serde_json::json!({
            "num_classes": 2,
            "bias": [0.5, 0.0],
            "token_weights": {"7": [1.0, 2.0], "9": [0.0, 10.0]}
        }))
        .await;
        backend.initialize().await.unwrap();

        // Token 9 is masked out
        let logits = backend.infer(&[7, 7, 9], &[1, 1, 0]).await.unwrap();
        assert_eq!(logits, vec![2.5, 4.0]);
    }

    #[tokio::test]
    async fn test_infer_before_initialize_is_unavailable() {
        let (backend, _a, _c) = backend_with(serde_json::json!({"num_classes": 1, "bias": [0.0]})).await;
        let err = backend.infer(&[1], &[1]).await.unwrap_err();
        assert!(matches!(err, TriageError::BackendUnavailable(_)));
    }

    #[tokio::test]
    async fn test_row_width_is_checked() {
        let (backend, _a, _c) = backend_with(serde_json::json!({
            "num_classes": 2,
            "bias": [0.0, 0.0],
            "token_weights": {"3": [1.0]}
        }))
        .await;
        assert!(matches!(backend.initialize().await, Err(TriageError::Model(_))));
    }

    #[tokio::test]
    async fn test_mismatched_inputs() {
        let (backend, _a, _c) = backend_with(serde_json::json!({"num_classes": 1, "bias": [0.0]})).await;
        backend.initialize().await.unwrap();
        assert!(backend.infer(&[1, 2], &[1]).await.is_err());
    }
}
