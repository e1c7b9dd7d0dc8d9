// Subcommand handlers
use std::io::Read;
use std::path::Path;

use config_engine::EngineConfig;
use error_common::{EngineError, Result};
use tracing::{debug, info};
use triage_engine::{
    extract_from_text, normalize, run_assessment, AssessmentInputs, AssessmentResult, ModelStore,
    PreferredLanguage, ScoringContext, SymptomDefinition, SymptomId, SymptomVocabulary,
};

use crate::cli::Command;
use crate::output;

/// Run one parsed subcommand against a loaded configuration
pub async fn dispatch(command: Command, config: &EngineConfig) -> Result<()> {
    match command {
        Command::Assess { input, language, json } => {
            let inputs = read_inputs(&input)?;
            let result = assess(config, &inputs, language.as_deref()).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                output::print_assessment(&result);
            }
        }
        Command::Normalize { symptoms } => {
            output::print_normalized(&normalize_phrases(&symptoms));
        }
        Command::Extract { text } => {
            output::print_symptom_ids(&extract_from_text(&text));
        }
        Command::Symptoms { query } => match query {
            Some(query) => output::print_catalogue(&search_symptoms(&query)),
            None => output::print_groups(&SymptomVocabulary::standard().groups()),
        },
        Command::Models { cache } => {
            let store = ModelStore::from_settings(&config.models).await?;
            output::print_models(store.list_models(), store.cache_dir());
            if cache {
                for entry in store.list_models() {
                    let path = store.ensure_model_cached(entry).await?;
                    output::print_cached(&entry.id, &path);
                }
            }
        }
    }
    Ok(())
}

/// Read assessment inputs from a JSON file, or stdin for "-"
pub fn read_inputs(path: &Path) -> Result<AssessmentInputs> {
    let raw = if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| EngineError::Validation(format!("cannot read {}: {}", path.display(), e)))?
    };
    parse_inputs(&raw)
}

pub fn parse_inputs(raw: &str) -> Result<AssessmentInputs> {
    serde_json::from_str(raw).map_err(|e| EngineError::Validation(format!("invalid assessment inputs: {}", e)))
}

/// Build the scoring context and run a single assessment
pub async fn assess(
    config: &EngineConfig,
    inputs: &AssessmentInputs,
    language: Option<&str>,
) -> Result<AssessmentResult> {
    let mut context = ScoringContext::from_config(config).await?;
    if let Some(language) = language {
        let language: PreferredLanguage = language.parse().map_err(EngineError::Validation)?;
        context = context.with_language(language);
    }

    let report = context.initialize().await;
    info!(
        structured_ready = report.structured_ready,
        text_backend = %report.text_backend,
        "Scoring context ready"
    );

    let result = run_assessment(&context, inputs).await;
    debug!(level = %result.triage_level, conditions = result.probable_conditions.len(), "Assessment finished");
    Ok(result)
}

/// Pair each phrase with its vocabulary id, if any
pub fn normalize_phrases(phrases: &[String]) -> Vec<(String, Option<SymptomId>)> {
    phrases.iter().map(|phrase| (phrase.clone(), normalize(phrase))).collect()
}

pub fn search_symptoms(query: &str) -> Vec<&'static SymptomDefinition> {
    SymptomVocabulary::standard().search(query)
}
