use logger_redacted::LoggerConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub fusion: FusionSettings,
    pub structured: StructuredSettings,
    pub text: TextSettings,
    pub models: ModelSettings,
    /// Language of the simplified summary handed to the patient
    pub locale: String,
    pub logging: LoggerConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fusion: FusionSettings::default(),
            structured: StructuredSettings::default(),
            text: TextSettings::default(),
            models: ModelSettings::default(),
            locale: "Tagalog".to_string(),
            logging: LoggerConfig::default(),
        }
    }
}

/// Weighted-average fusion and post-processing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionSettings {
    /// Weight of the structured (symptom checklist) scorer
    pub structured_weight: f64,
    /// Weight of the free-text scorer
    pub text_weight: f64,
    /// Entries below this probability are dropped after fusion
    pub min_probability: f64,
    pub top_n: usize,
    /// Calibration temperature; 1.0 leaves probabilities unchanged
    pub temperature: f64,
}

impl Default for FusionSettings {
    fn default() -> Self {
        Self {
            structured_weight: 0.6,
            text_weight: 0.4,
            min_probability: 0.01,
            top_n: 5,
            temperature: 1.0,
        }
    }
}

/// Which structured scorer implementation to ship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructuredScorerKind {
    /// Symptom-weight table, no model file required
    Heuristic,
    /// Gradient-boosted tree dump with heuristic fallback
    Tree,
}

/// Extra score given to one disease when a symptom has no table entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseBoost {
    pub disease: String,
    pub boost: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuredSettings {
    pub kind: StructuredScorerKind,
    pub tree_model_id: String,
    pub base_score: f64,
    pub boost_cap: f64,
    pub per_symptom_increment: f64,
    pub boost_top_k: usize,
    pub unknown_symptom_boosts: Vec<DiseaseBoost>,
}

impl Default for StructuredSettings {
    fn default() -> Self {
        Self {
            kind: StructuredScorerKind::Heuristic,
            tree_model_id: "symptom-xgboost".to_string(),
            base_score: 0.001,
            boost_cap: 0.2,
            per_symptom_increment: 0.02,
            boost_top_k: 5,
            unknown_symptom_boosts: vec![
                DiseaseBoost { disease: "Common Cold".to_string(), boost: 0.05 },
                DiseaseBoost { disease: "Allergy".to_string(), boost: 0.03 },
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSettings {
    /// Try the neural backend before the keyword heuristic
    pub neural_enabled: bool,
    pub model_id: String,
    pub max_length: usize,
    pub fallback_base: f64,
    pub fallback_increment: f64,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self {
            neural_enabled: true,
            model_id: "symptom-transformer".to_string(),
            max_length: 256,
            fallback_base: 0.01,
            fallback_increment: 0.1,
        }
    }
}

/// Where scoring assets come from and where they are cached
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub manifest_path: Option<PathBuf>,
    /// Directory that manifest `path` entries are relative to
    pub asset_root: Option<PathBuf>,
    pub cache_dir: Option<PathBuf>,
}

impl ModelSettings {
    /// Asset root, defaulting to the manifest's directory
    pub fn resolved_asset_root(&self) -> PathBuf {
        if let Some(root) = &self.asset_root {
            return root.clone();
        }
        self.manifest_path
            .as_ref()
            .and_then(|p| p.parent())
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Cache directory, defaulting to the platform cache location
    pub fn resolved_cache_dir(&self) -> PathBuf {
        if let Some(dir) = &self.cache_dir {
            return dir.clone();
        }
        directories::ProjectDirs::from("dev", "rustcare", "triage")
            .map(|dirs| dirs.cache_dir().join("models"))
            .unwrap_or_else(|| std::env::temp_dir().join("triage-models"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_tuned_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.fusion.top_n, 5);
        assert!((config.fusion.structured_weight - 0.6).abs() < f64::EPSILON);
        assert!((config.fusion.text_weight - 0.4).abs() < f64::EPSILON);
        assert_eq!(config.structured.kind, StructuredScorerKind::Heuristic);
        assert_eq!(config.structured.unknown_symptom_boosts.len(), 2);
        assert_eq!(config.locale, "Tagalog");
    }

    #[test]
    fn test_asset_root_defaults_to_manifest_dir() {
        let settings = ModelSettings {
            manifest_path: Some(PathBuf::from("/opt/models/manifest.json")),
            ..Default::default()
        };
        assert_eq!(settings.resolved_asset_root(), PathBuf::from("/opt/models"));
    }

    #[test]
    fn test_explicit_cache_dir_wins() {
        let settings = ModelSettings {
            cache_dir: Some(PathBuf::from("/tmp/triage-cache")),
            ..Default::default()
        };
        assert_eq!(settings.resolved_cache_dir(), PathBuf::from("/tmp/triage-cache"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: EngineConfig = serde_yaml::from_str("fusion:\n  top_n: 3\nstructured:\n  kind: tree\n").unwrap();
        assert_eq!(config.fusion.top_n, 3);
        assert!((config.fusion.min_probability - 0.01).abs() < f64::EPSILON);
        assert_eq!(config.structured.kind, StructuredScorerKind::Tree);
    }
}
