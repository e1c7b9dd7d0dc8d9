//! Offline symptom triage for community health workers
//!
//! The engine scores an assessment two ways at once: a structured scorer
//! over the selected symptom checklist and a text scorer over the notes.
//! The two distributions are fused, calibrated and trimmed, then vital-sign
//! and condition rules assign a triage level with recommended actions and a
//! localized summary for the patient.
//!
//! # Example
//!
//! ```rust,no_run
//! use config_engine::EngineConfig;
//! use triage_engine::{run_assessment, AssessmentInputs, ScoringContext, Vitals};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let context = ScoringContext::from_config(&EngineConfig::default()).await?;
//! let inputs = AssessmentInputs {
//!     patient_name: "Juan Dela Cruz".to_string(),
//!     vitals: Vitals {
//!         blood_pressure: "140/90".to_string(),
//!         temperature: 37.0,
//!         heart_rate: 125.0,
//!         oxygen_level: 90.0,
//!     },
//!     symptoms: vec!["breathlessness".to_string(), "chest_pain".to_string()],
//!     notes: String::new(),
//! };
//!
//! let result = run_assessment(&context, &inputs).await;
//! println!("{} - {}", result.triage_level, result.simplified_summary);
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod assessment;
pub mod backend;
pub mod context;
pub mod error;
pub mod fusion;
pub mod labels;
pub mod models;
pub mod normalizer;
pub mod prediction;
pub mod structured;
pub mod text;
pub mod tokenizer;
pub mod translations;
pub mod triage;
pub mod vocabulary;

pub use actions::{generate_actions, generate_summary};
pub use assessment::{run_assessment, AssessmentInputs, AssessmentResult, ProbableCondition};
pub use backend::{BackendAvailability, InferenceBackend, LinearTextBackend, NullBackend};
pub use context::{InitReport, ScoringContext};
pub use error::{TriageError, TriageResult};
pub use fusion::{
    fallback_distribution, filter_by_threshold, fuse_predictions, get_top, temperature_scale, FusionLayer,
    FusionSource, FusionWeights,
};
pub use labels::{DiseaseLabels, DISEASE_LABELS};
pub use models::{ModelEntry, ModelKind, ModelManifest, ModelStore};
pub use normalizer::{create_feature_vector, extract_from_text, normalize, normalize_all};
pub use prediction::DiseasePrediction;
pub use structured::{create_structured_scorer, HeuristicScorer, StructuredScorer, TreeEnsembleScorer};
pub use text::{combine_symptoms_to_text, HybridTextScorer, TextScorer};
pub use tokenizer::{Encoding, WordPieceTokenizer};
pub use translations::{translate_action, translate_actions, PreferredLanguage};
pub use triage::{assess_triage, decide_triage, TriageDecision, TriageLevel, TriageReason, Vitals};
pub use vocabulary::{SymptomDefinition, SymptomId, SymptomVocabulary};
