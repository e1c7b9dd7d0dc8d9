use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::backend::{create_backend, BackendAvailability, InferenceBackend};
use crate::error::{TriageError, TriageResult};
use crate::fusion::FusionLayer;
use crate::labels::DiseaseLabels;
use crate::models::ModelStore;
use crate::structured::{create_structured_scorer, StructuredScorer};
use crate::text::{HybridTextScorer, TextScorer};
use crate::translations::PreferredLanguage;
use crate::vocabulary::SymptomVocabulary;
use config_engine::EngineConfig;
use logger_redacted::LoggerConfig;

/// Outcome of the one-time scorer initialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub structured_ready: bool,
    pub text_backend: BackendAvailability,
}

/// Everything an assessment needs, built once and shared
///
/// Scorers are trait objects so deployments (and tests) can swap them.
/// Initialization runs at most once no matter how many assessments race
/// to trigger it.
pub struct ScoringContext {
    labels: Arc<DiseaseLabels>,
    vocabulary: &'static SymptomVocabulary,
    store: Arc<ModelStore>,
    structured: Arc<dyn StructuredScorer>,
    text: Arc<dyn TextScorer>,
    fusion: FusionLayer,
    language: PreferredLanguage,
    logging: LoggerConfig,
    init: OnceCell<InitReport>,
}

impl ScoringContext {
    /// Build a context from configuration, loading the model manifest if set
    pub async fn from_config(config: &EngineConfig) -> TriageResult<Self> {
        let store = ModelStore::from_settings(&config.models).await?;
        Self::new(config, store)
    }

    pub fn new(config: &EngineConfig, store: ModelStore) -> TriageResult<Self> {
        let labels = DiseaseLabels::standard();
        let store = Arc::new(store);
        let language: PreferredLanguage = config.locale.parse().map_err(TriageError::Config)?;

        let structured = create_structured_scorer(&config.structured, Arc::clone(&labels), Arc::clone(&store))?;
        let backend = create_backend(&config.text, Arc::clone(&store));
        let text: Arc<dyn TextScorer> = Arc::new(HybridTextScorer::new(&config.text, Arc::clone(&labels), backend)?);

        Ok(Self {
            labels,
            vocabulary: SymptomVocabulary::standard(),
            store,
            structured,
            text,
            fusion: FusionLayer::from_settings(&config.fusion),
            language,
            logging: config.logging.clone(),
            init: OnceCell::new(),
        })
    }

    pub fn with_structured_scorer(mut self, scorer: Arc<dyn StructuredScorer>) -> Self {
        self.structured = scorer;
        self
    }

    pub fn with_text_scorer(mut self, scorer: Arc<dyn TextScorer>) -> Self {
        self.text = scorer;
        self
    }

    /// Replace the neural backend behind the default text scorer
    pub fn with_backend(self, config: &EngineConfig, backend: Arc<dyn InferenceBackend>) -> TriageResult<Self> {
        let text = HybridTextScorer::new(&config.text, Arc::clone(&self.labels), backend)?;
        Ok(self.with_text_scorer(Arc::new(text)))
    }

    pub fn with_language(mut self, language: PreferredLanguage) -> Self {
        self.language = language;
        self
    }

    /// Initialize both scorers concurrently; later and concurrent callers
    /// share the first result
    pub async fn initialize(&self) -> &InitReport {
        self.init
            .get_or_init(|| async {
                let (structured, text_backend) = tokio::join!(self.structured.initialize(), self.text.initialize());
                let structured_ready = match structured {
                    Ok(()) => true,
                    Err(e) => {
                        warn!(scorer = self.structured.name(), error = %e, "Structured scorer initialization failed");
                        false
                    }
                };
                info!(
                    structured = self.structured.name(),
                    structured_ready,
                    text = self.text.name(),
                    text_backend = %text_backend,
                    "Scoring context initialized"
                );
                InitReport {
                    structured_ready,
                    text_backend,
                }
            })
            .await
    }

    pub fn is_initialized(&self) -> bool {
        self.init.initialized()
    }

    pub fn labels(&self) -> &Arc<DiseaseLabels> {
        &self.labels
    }

    pub fn vocabulary(&self) -> &'static SymptomVocabulary {
        self.vocabulary
    }

    pub fn model_store(&self) -> &Arc<ModelStore> {
        &self.store
    }

    pub fn structured(&self) -> &Arc<dyn StructuredScorer> {
        &self.structured
    }

    pub fn text(&self) -> &Arc<dyn TextScorer> {
        &self.text
    }

    pub fn fusion(&self) -> &FusionLayer {
        &self.fusion
    }

    pub fn language(&self) -> PreferredLanguage {
        self.language
    }

    pub fn logging(&self) -> &LoggerConfig {
        &self.logging
    }
}
