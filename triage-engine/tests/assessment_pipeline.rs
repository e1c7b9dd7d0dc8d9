use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use config_engine::EngineConfig;
use triage_engine::{
    fallback_distribution, run_assessment, translate_action, AssessmentInputs, BackendAvailability, DiseasePrediction,
    ModelStore, PreferredLanguage, ScoringContext, StructuredScorer, SymptomId, TextScorer, TriageError, TriageLevel,
    TriageResult, Vitals,
};

fn offline_config() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.text.neural_enabled = false;
    config
}

fn context(config: &EngineConfig) -> (ScoringContext, tempfile::TempDir) {
    let cache = tempfile::tempdir().unwrap();
    let context = ScoringContext::new(config, ModelStore::empty(cache.path())).unwrap();
    (context, cache)
}

fn inputs(symptoms: &[&str], notes: &str, vitals: Vitals) -> AssessmentInputs {
    AssessmentInputs {
        patient_name: "Juan Dela Cruz".to_string(),
        vitals,
        symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
        notes: notes.to_string(),
    }
}

fn normal_vitals() -> Vitals {
    Vitals {
        blood_pressure: "120/80".to_string(),
        temperature: 36.8,
        heart_rate: 78.0,
        oxygen_level: 98.0,
    }
}

struct FailingStructured;

#[async_trait]
impl StructuredScorer for FailingStructured {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn score(&self, _symptoms: &[SymptomId]) -> TriageResult<Vec<DiseasePrediction>> {
        Err(TriageError::Inference("structured model crashed".to_string()))
    }
}

struct FailingText;

#[async_trait]
impl TextScorer for FailingText {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn score(&self, _text: &str) -> TriageResult<Vec<DiseasePrediction>> {
        Err(TriageError::BackendUnavailable("no runtime".to_string()))
    }
}

struct PanickingText;

#[async_trait]
impl TextScorer for PanickingText {
    fn name(&self) -> &'static str {
        "panicking"
    }

    async fn score(&self, _text: &str) -> TriageResult<Vec<DiseasePrediction>> {
        panic!("tokenizer exploded");
    }
}

/// Structured scorer whose output cannot be ranked
struct NonFiniteStructured;

#[async_trait]
impl StructuredScorer for NonFiniteStructured {
    fn name(&self) -> &'static str {
        "non-finite"
    }

    async fn score(&self, _symptoms: &[SymptomId]) -> TriageResult<Vec<DiseasePrediction>> {
        Ok(vec![DiseasePrediction::new("Allergy", f64::NAN)])
    }
}

/// Structured scorer that counts initializations and is slow to start
struct CountingStructured {
    inits: AtomicUsize,
}

#[async_trait]
impl StructuredScorer for CountingStructured {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn initialize(&self) -> TriageResult<()> {
        self.inits.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok(())
    }

    async fn score(&self, _symptoms: &[SymptomId]) -> TriageResult<Vec<DiseasePrediction>> {
        Ok(vec![DiseasePrediction::new("Allergy", 0.7), DiseasePrediction::new("Common Cold", 0.3)])
    }
}

#[tokio::test]
async fn critical_vitals_override_conditions() {
    let (context, _cache) = context(&offline_config());
    let vitals = Vitals {
        blood_pressure: "140/90".to_string(),
        temperature: 37.0,
        heart_rate: 125.0,
        oxygen_level: 90.0,
    };

    let result = run_assessment(&context, &inputs(&["breathlessness", "chest_pain"], "", vitals)).await;

    assert_eq!(result.triage_level, TriageLevel::Critical);
    assert!(!result.probable_conditions.is_empty());
    assert!(result.probable_conditions.len() <= 5);
    assert_eq!(result.recommended_actions[0], "Refer to nearest hospital immediately.");
    assert!(result.explanation.contains("danger range"));
}

#[tokio::test]
async fn both_scorers_failing_uses_fallback_distribution() {
    let (context, _cache) = context(&offline_config());
    let context = context
        .with_structured_scorer(Arc::new(FailingStructured))
        .with_text_scorer(Arc::new(FailingText));

    let result = run_assessment(&context, &inputs(&["cough"], "", normal_vitals())).await;

    let names: Vec<&str> = result.probable_conditions.iter().map(|c| c.name.as_str()).collect();
    let expected: Vec<String> = fallback_distribution().into_iter().map(|p| p.disease).collect();
    assert_eq!(names, expected);
    assert_eq!(result.triage_level, TriageLevel::Mild);
    assert!(result.explanation.contains("low confidence"));
}

#[tokio::test]
async fn unable_to_assess_respects_top_n() {
    let mut config = offline_config();
    config.fusion.top_n = 2;
    let (context, _cache) = context(&config);
    let context = context
        .with_structured_scorer(Arc::new(NonFiniteStructured))
        .with_text_scorer(Arc::new(FailingText));

    let result = run_assessment(&context, &inputs(&["cough"], "", normal_vitals())).await;

    assert!(result.explanation.starts_with("Unable to assess"));
    assert_eq!(result.probable_conditions.len(), 2);
    assert_eq!(result.probable_conditions[0].name, "Common Cold");
    assert!(result.probable_conditions.iter().all(|c| c.probability.is_finite()));
    assert_eq!(result.triage_level, TriageLevel::Mild);
}

#[tokio::test]
async fn unable_to_assess_keeps_vitals_rules() {
    let (context, _cache) = context(&offline_config());
    let context = context
        .with_structured_scorer(Arc::new(NonFiniteStructured))
        .with_text_scorer(Arc::new(FailingText));
    let vitals = Vitals {
        blood_pressure: "140/90".to_string(),
        temperature: 37.0,
        heart_rate: 130.0,
        oxygen_level: 97.0,
    };

    let result = run_assessment(&context, &inputs(&["cough"], "", vitals)).await;

    assert!(result.explanation.starts_with("Unable to assess"));
    assert_eq!(result.triage_level, TriageLevel::Critical);
}

#[tokio::test]
async fn one_failing_scorer_passes_the_other_through() {
    let (context, _cache) = context(&offline_config());
    let context = context.with_text_scorer(Arc::new(FailingText));

    let result = run_assessment(&context, &inputs(&["itching", "skin_rash"], "", normal_vitals())).await;

    assert_eq!(result.probable_conditions[0].name, "Fungal infection");
    assert!(result.explanation.contains("symptom checklist only"));
}

#[tokio::test]
async fn panicking_scorer_is_contained() {
    let (context, _cache) = context(&offline_config());
    let context = context.with_text_scorer(Arc::new(PanickingText));

    let result = run_assessment(&context, &inputs(&["cough"], "dry cough", normal_vitals())).await;

    assert!(!result.probable_conditions.is_empty());
    assert!(result.probable_conditions.iter().all(|c| c.probability.is_finite()));
}

#[tokio::test]
async fn unknown_symptoms_do_not_abort() {
    let (context, _cache) = context(&offline_config());
    let result = run_assessment(&context, &inputs(&["levitation", "", "Cough"], "", normal_vitals())).await;
    assert!(!result.probable_conditions.is_empty());
}

#[tokio::test]
async fn concurrent_assessments_share_one_initialization() {
    let counting = Arc::new(CountingStructured { inits: AtomicUsize::new(0) });
    let (context, _cache) = context(&offline_config());
    let context = Arc::new(context.with_structured_scorer(counting.clone()));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let context = Arc::clone(&context);
        handles.push(tokio::spawn(async move {
            run_assessment(&context, &inputs(&["cough"], "", normal_vitals())).await
        }));
    }
    for handle in handles {
        let result = handle.await.unwrap();
        assert!(!result.probable_conditions.is_empty());
    }

    assert_eq!(counting.inits.load(Ordering::SeqCst), 1);
    assert!(context.is_initialized());
}

#[tokio::test]
async fn summary_follows_configured_language() {
    let (context, _cache) = context(&offline_config());
    let english = context.with_language(PreferredLanguage::English);
    let result = run_assessment(&english, &inputs(&["cough"], "", normal_vitals())).await;
    assert_eq!(result.simplified_summary, "The condition looks mild for now. Rest, drink water, and watch the symptoms.");

    let mut config = offline_config();
    config.locale = "Cebuano".to_string();
    let (cebuano, _cache) = self::context(&config);
    let result = run_assessment(&cebuano, &inputs(&["cough"], "", normal_vitals())).await;
    assert!(result.simplified_summary.starts_with("Morag mild"));
}

#[test]
fn translation_falls_back_to_english() {
    assert_eq!(
        translate_action("Advise rest and hydration.", PreferredLanguage::Tagalog),
        "Magpahinga at uminom ng tubig."
    );
    assert_eq!(
        translate_action("Some未knownphrase", PreferredLanguage::Tagalog),
        "Some未knownphrase"
    );
}

#[tokio::test]
async fn bundled_models_drive_both_scorers() {
    let assets = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("assets");
    let cache = tempfile::tempdir().unwrap();

    let mut config = EngineConfig::default();
    config.structured.kind = config_engine::StructuredScorerKind::Tree;
    config.models.manifest_path = Some(assets.join("manifest.json"));
    config.models.cache_dir = Some(cache.path().to_path_buf());

    let context = ScoringContext::from_config(&config).await.unwrap();
    let report = context.initialize().await;
    assert!(report.structured_ready);
    assert_eq!(report.text_backend, BackendAvailability::Available);

    let result = run_assessment(
        &context,
        &inputs(&["chest_pain", "breathlessness"], "pain in the chest and short of breath", normal_vitals()),
    )
    .await;

    assert_eq!(result.probable_conditions[0].name, "Heart attack");
    assert_eq!(result.triage_level, TriageLevel::Critical);
    assert!(result.recommended_actions.contains(&"Do not delay seeking emergency medical care.".to_string()));
    assert!(cache.path().join("symptom-xgboost").exists());
    assert!(cache.path().join("symptom-transformer").exists());
}
