//! Scoring asset manifest and local model cache
//!
//! Model files ship next to a JSON manifest. Before a scorer loads one, the
//! file is copied into a cache directory keyed by model id so later runs
//! (and other processes) reuse the same local path.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

use crate::error::{TriageError, TriageResult};
use config_engine::ModelSettings;

static COPY_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Serialized model format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Onnx,
    Tflite,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ModelKind,
    /// Path relative to the asset root
    pub path: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub input: Vec<String>,
    #[serde(default)]
    pub output: Vec<String>,
    #[serde(default, rename = "sizeMB")]
    pub size_mb: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelManifest {
    pub version: String,
    pub models: Vec<ModelEntry>,
}

impl ModelManifest {
    pub fn empty() -> Self {
        Self {
            version: "0".to_string(),
            models: Vec::new(),
        }
    }
}

/// Manifest lookup plus cache management
#[derive(Debug, Clone)]
pub struct ModelStore {
    manifest: ModelManifest,
    asset_root: PathBuf,
    cache_dir: PathBuf,
}

impl ModelStore {
    pub fn new(manifest: ModelManifest, asset_root: impl Into<PathBuf>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            manifest,
            asset_root: asset_root.into(),
            cache_dir: cache_dir.into(),
        }
    }

    /// Store with no models; every lookup fails with `ModelNotFound`
    pub fn empty(cache_dir: impl Into<PathBuf>) -> Self {
        Self::new(ModelManifest::empty(), PathBuf::from("."), cache_dir)
    }

    /// Read the configured manifest, or fall back to an empty store
    pub async fn from_settings(settings: &ModelSettings) -> TriageResult<Self> {
        let cache_dir = settings.resolved_cache_dir();
        match &settings.manifest_path {
            Some(path) => {
                let manifest = load_manifest(path).await?;
                info!(
                    manifest = %path.display(),
                    models = manifest.models.len(),
                    "Loaded model manifest"
                );
                Ok(Self::new(manifest, settings.resolved_asset_root(), cache_dir))
            }
            None => {
                debug!("No model manifest configured");
                Ok(Self::empty(cache_dir))
            }
        }
    }

    pub fn manifest(&self) -> &ModelManifest {
        &self.manifest
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn list_models(&self) -> &[ModelEntry] {
        &self.manifest.models
    }

    pub fn get_model_by_id(&self, id: &str) -> Option<&ModelEntry> {
        self.manifest.models.iter().find(|m| m.id == id)
    }

    /// Copy a model into the cache unless it is already there
    pub async fn ensure_model_cached(&self, entry: &ModelEntry) -> TriageResult<PathBuf> {
        let source = self.asset_root.join(&entry.path);
        if !tokio::fs::try_exists(&source).await.unwrap_or(false) {
            return Err(TriageError::AssetMissing {
                id: entry.id.clone(),
                path: entry.path.clone(),
            });
        }

        tokio::fs::create_dir_all(&self.cache_dir).await.map_err(|e| {
            TriageError::Cache(format!("cannot create {}: {}", self.cache_dir.display(), e))
        })?;

        let destination = self.cache_dir.join(&entry.id);
        if tokio::fs::try_exists(&destination).await.unwrap_or(false) {
            debug!(model = %entry.id, path = %destination.display(), "Model already cached");
            return Ok(destination);
        }

        // Copy under a private name first so readers never see a partial file.
        let staging = self.cache_dir.join(format!(
            ".{}.{}.{}.partial",
            entry.id,
            std::process::id(),
            COPY_SEQUENCE.fetch_add(1, Ordering::Relaxed)
        ));
        tokio::fs::copy(&source, &staging).await.map_err(|e| {
            TriageError::Cache(format!("unable to cache asset for model {}: {}", entry.id, e))
        })?;
        tokio::fs::rename(&staging, &destination).await.map_err(|e| {
            TriageError::Cache(format!("unable to cache asset for model {}: {}", entry.id, e))
        })?;

        info!(model = %entry.id, path = %destination.display(), "Model cached");
        Ok(destination)
    }

    /// Look up a model id and return its cached path
    pub async fn resolve(&self, id: &str) -> TriageResult<PathBuf> {
        let entry = self
            .get_model_by_id(id)
            .ok_or_else(|| TriageError::ModelNotFound(id.to_string()))?;
        self.ensure_model_cached(entry).await
    }
}

pub async fn load_manifest(path: &Path) -> TriageResult<ModelManifest> {
    let raw = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, path: &str) -> ModelEntry {
        ModelEntry {
            id: id.to_string(),
            kind: ModelKind::Json,
            path: path.to_string(),
            description: String::new(),
            input: vec![],
            output: vec![],
            size_mb: 0.0,
        }
    }

    #[test]
    fn test_manifest_parses_asset_format() {
        let raw = r#"{
            "version": "1.0.0",
            "models": [
                {"id": "symptom-transformer", "type": "onnx", "path": "models/symptom/model.onnx",
                 "description": "DistilBERT symptom classifier", "input": ["input_ids", "attention_mask"],
                 "output": ["logits"], "sizeMB": 255.4}
            ]
        }"#;
        let manifest: ModelManifest = serde_json::from_str(raw).unwrap();
        assert_eq!(manifest.models[0].kind, ModelKind::Onnx);
        assert_eq!(manifest.models[0].input.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_model_id_is_descriptive() {
        let cache = tempfile::tempdir().unwrap();
        let store = ModelStore::empty(cache.path());
        let err = store.resolve("symptom-transformer").await.unwrap_err();
        assert!(matches!(err, TriageError::ModelNotFound(ref id) if id == "symptom-transformer"));
    }

    #[tokio::test]
    async fn test_missing_asset_file() {
        let assets = tempfile::tempdir().unwrap();
        let cache = tempfile::tempdir().unwrap();
        let manifest = ModelManifest {
            version: "1".into(),
            models: vec![entry("linear", "missing.json")],
        };
        let store = ModelStore::new(manifest, assets.path(), cache.path());
        let err = store.resolve("linear").await.unwrap_err();
        assert!(err.to_string().contains("missing.json"));
    }

    #[tokio::test]
    async fn test_cache_is_created_and_reused() {
        let assets = tempfile::tempdir().unwrap();
        std::fs::write(assets.path().join("weights.json"), "{}").unwrap();
        let cache_root = tempfile::tempdir().unwrap();
        let cache_dir = cache_root.path().join("nested").join("models");

        let manifest = ModelManifest {
            version: "1".into(),
            models: vec![entry("linear", "weights.json")],
        };
        let store = ModelStore::new(manifest, assets.path(), &cache_dir);

        let first = store.resolve("linear").await.unwrap();
        assert_eq!(first, cache_dir.join("linear"));
        assert!(first.exists());

        // Later changes to the asset are not re-fetched.
        std::fs::write(assets.path().join("weights.json"), "{\"changed\":true}").unwrap();
        let second = store.resolve("linear").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(std::fs::read_to_string(second).unwrap(), "{}");
    }
}
