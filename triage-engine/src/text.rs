//! Free-text scoring
//!
//! Health-worker notes plus the selected symptoms are combined into one
//! string and scored by a neural backend when one is available, otherwise
//! by a keyword table. Backend failures never surface: the keyword path is
//! always there.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::backend::{BackendAvailability, InferenceBackend};
use crate::error::{TriageError, TriageResult};
use crate::labels::DiseaseLabels;
use crate::prediction::{normalize_linear, softmax, to_ranked_predictions, DiseasePrediction};
use crate::tokenizer::WordPieceTokenizer;
use config_engine::TextSettings;

/// Keyword -> disease class indices, checked as lowercase substrings
const KEYWORD_DISEASES: &[(&str, &[usize])] = &[
    ("fever", &[10, 11, 29, 37]),
    ("cough", &[10, 6, 34, 36]),
    ("headache", &[30, 10, 0]),
    ("pain", &[5, 7, 31]),
    ("rash", &[8, 15, 14, 35]),
    ("breath", &[6, 34, 18]),
    ("chest", &[18, 34, 23]),
    ("nausea", &[17, 11, 37]),
    ("vomit", &[17, 11, 37]),
    ("diarrhea", &[17, 11, 37]),
];

#[async_trait]
pub trait TextScorer: Send + Sync {
    fn name(&self) -> &'static str;

    /// One-time backend check; later calls return the memoized result
    async fn initialize(&self) -> BackendAvailability {
        BackendAvailability::Unavailable("no neural backend".to_string())
    }

    async fn score(&self, text: &str) -> TriageResult<Vec<DiseasePrediction>>;
}

/// Join symptoms with ", " and append trimmed notes as a new sentence
pub fn combine_symptoms_to_text<S: AsRef<str>>(symptoms: &[S], notes: &str) -> String {
    let mut text = symptoms.iter().map(|s| s.as_ref()).collect::<Vec<_>>().join(", ");
    let notes = notes.trim();
    if !notes.is_empty() {
        text.push_str(". ");
        text.push_str(notes);
    }
    text
}

/// Neural scoring with a keyword-table fallback
pub struct HybridTextScorer {
    labels: Arc<DiseaseLabels>,
    tokenizer: WordPieceTokenizer,
    backend: Arc<dyn InferenceBackend>,
    availability: OnceCell<BackendAvailability>,
    fallback_base: f64,
    fallback_increment: f64,
}

impl HybridTextScorer {
    pub fn new(
        settings: &TextSettings,
        labels: Arc<DiseaseLabels>,
        backend: Arc<dyn InferenceBackend>,
    ) -> TriageResult<Self> {
        Ok(Self {
            labels,
            tokenizer: WordPieceTokenizer::standard(settings.max_length)?,
            backend,
            availability: OnceCell::new(),
            fallback_base: settings.fallback_base,
            fallback_increment: settings.fallback_increment,
        })
    }

    /// Swap in a tokenizer matching the backend's vocabulary
    pub fn with_tokenizer(mut self, tokenizer: WordPieceTokenizer) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn availability(&self) -> Option<&BackendAvailability> {
        self.availability.get()
    }

    async fn check_backend(&self) -> &BackendAvailability {
        self.availability
            .get_or_init(|| async {
                match self.backend.initialize().await {
                    Ok(()) => {
                        info!(backend = self.backend.name(), "Neural text backend available");
                        BackendAvailability::Available
                    }
                    Err(e) => {
                        info!(backend = self.backend.name(), reason = %e, "Neural text backend unavailable, using keywords");
                        BackendAvailability::Unavailable(e.to_string())
                    }
                }
            })
            .await
    }

    async fn score_neural(&self, text: &str) -> TriageResult<Vec<DiseasePrediction>> {
        let encoding = self.tokenizer.encode(text);
        let logits = self
            .backend
            .infer(&encoding.input_ids, &encoding.attention_mask)
            .await?;
        if logits.len() != self.labels.len() {
            return Err(TriageError::Inference(format!(
                "backend returned {} logits for {} labels",
                logits.len(),
                self.labels.len()
            )));
        }
        let logits: Vec<f64> = logits.into_iter().map(f64::from).collect();
        if logits.iter().any(|l| !l.is_finite()) {
            return Err(TriageError::Inference("backend returned non-finite logits".to_string()));
        }
        Ok(to_ranked_predictions(&self.labels, &softmax(&logits)))
    }

    /// Keyword-count distribution; deterministic and never empty
    pub fn score_keywords(&self, text: &str) -> Vec<DiseasePrediction> {
        let lower = text.to_lowercase();
        let mut scores = vec![self.fallback_base; self.labels.len()];
        for (keyword, diseases) in KEYWORD_DISEASES {
            if lower.contains(keyword) {
                for &index in diseases.iter() {
                    if let Some(slot) = scores.get_mut(index) {
                        *slot += self.fallback_increment;
                    }
                }
            }
        }
        to_ranked_predictions(&self.labels, &normalize_linear(&scores))
    }
}

#[async_trait]
impl TextScorer for HybridTextScorer {
    fn name(&self) -> &'static str {
        "hybrid-text"
    }

    async fn initialize(&self) -> BackendAvailability {
        self.check_backend().await.clone()
    }

    async fn score(&self, text: &str) -> TriageResult<Vec<DiseasePrediction>> {
        if self.check_backend().await.is_available() {
            match self.score_neural(text).await {
                Ok(predictions) => return Ok(predictions),
                Err(e) => warn!(error = %e, "Neural text scoring failed, using keywords"),
            }
        } else {
            debug!("Scoring text with keyword table");
        }
        Ok(self.score_keywords(text))
    }
}
