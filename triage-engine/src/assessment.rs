//! End-to-end assessment pipeline
//!
//! `run_assessment` never fails. Scorer errors degrade to the other scorer
//! or to a fixed fallback distribution; anything else (including a panic)
//! produces an "unable to assess" result built from the vitals alone.

use futures::FutureExt;
use logger_redacted::{redacted_info, redacted_warn, redactor_for, PiiRedactor};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tracing::{info, warn};

use crate::actions::{generate_actions, generate_summary, unable_to_assess_actions, SUMMARY_UNABLE};
use crate::context::ScoringContext;
use crate::error::{TriageError, TriageResult};
use crate::fusion::{fallback_distribution, FusionSource};
use crate::normalizer::normalize_all;
use crate::prediction::DiseasePrediction;
use crate::text::combine_symptoms_to_text;
use crate::translations::translate_action;
use crate::triage::{assess_triage, decide_triage, TriageLevel, Vitals};

/// What the health worker entered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentInputs {
    pub patient_name: String,
    pub vitals: Vitals,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbableCondition {
    pub name: String,
    pub probability: f64,
}

impl From<DiseasePrediction> for ProbableCondition {
    fn from(p: DiseasePrediction) -> Self {
        Self {
            name: p.disease,
            probability: p.probability,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
    pub triage_level: TriageLevel,
    pub explanation: String,
    pub probable_conditions: Vec<ProbableCondition>,
    /// English, for the health worker
    pub recommended_actions: Vec<String>,
    /// In the patient's language
    pub simplified_summary: String,
}

/// Run one assessment; always returns a displayable result
pub async fn run_assessment(context: &ScoringContext, inputs: &AssessmentInputs) -> AssessmentResult {
    let redactor = redactor_for(context.logging()).with_name(&inputs.patient_name);

    match AssertUnwindSafe(assess(context, inputs, &redactor)).catch_unwind().await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => {
            redacted_warn!(redactor, "Assessment for {} failed: {}", inputs.patient_name, e);
            unable_to_assess(context, inputs)
        }
        Err(_) => {
            warn!("Assessment pipeline panicked");
            unable_to_assess(context, inputs)
        }
    }
}

/// Await one scorer branch, turning an error or panic into an empty list
async fn settle<F>(branch: &'static str, future: F) -> Vec<DiseasePrediction>
where
    F: Future<Output = TriageResult<Vec<DiseasePrediction>>>,
{
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(Ok(predictions)) => predictions,
        Ok(Err(e)) => {
            warn!(branch, error = %e, "Scorer failed");
            Vec::new()
        }
        Err(_) => {
            warn!(branch, "Scorer panicked");
            Vec::new()
        }
    }
}

async fn assess(
    context: &ScoringContext,
    inputs: &AssessmentInputs,
    redactor: &PiiRedactor,
) -> TriageResult<AssessmentResult> {
    context.initialize().await;

    let symptoms = normalize_all(context.vocabulary(), &inputs.symptoms);
    let text = combine_symptoms_to_text(&symptoms, &inputs.notes);

    let (structured, text_predictions) = tokio::join!(
        settle("structured", context.structured().score(&symptoms)),
        settle("text", context.text().score(&text)),
    );

    let (fused, source) = context.fusion().combine(structured, text_predictions);
    let ranked = context.fusion().rank(&fused);
    if ranked.is_empty() || ranked.iter().any(|p| !p.probability.is_finite()) {
        return Err(TriageError::Inference("fused distribution is empty or not finite".to_string()));
    }

    let decision = assess_triage(&inputs.vitals, ranked.first());
    let recommended_actions = generate_actions(decision.level, &ranked);
    let summary = generate_summary(decision.level, &ranked);
    let simplified_summary = translate_action(&summary, context.language());
    let explanation = explain(&inputs.patient_name, &decision.reason.describe(), &ranked, source);

    redacted_info!(redactor, "Assessment generated for {}: {}", inputs.patient_name, decision.level);
    info!(
        patient = %redactor.redact_name(&inputs.patient_name),
        triage_level = %decision.level,
        top_condition = %ranked[0].disease,
        source = %source,
        symptoms = symptoms.len(),
        "Assessment complete"
    );

    Ok(AssessmentResult {
        triage_level: decision.level,
        explanation,
        probable_conditions: ranked.into_iter().map(ProbableCondition::from).collect(),
        recommended_actions,
        simplified_summary,
    })
}

fn explain(patient_name: &str, reason: &str, ranked: &[DiseasePrediction], source: FusionSource) -> String {
    let mut explanation = format!("Assessment generated for {}. {}", patient_name, reason);
    if let Some(top) = ranked.first() {
        explanation.push_str(&format!(
            " Most likely condition: {} ({:.0}%).",
            top.disease,
            top.probability * 100.0
        ));
    }
    match source {
        FusionSource::Fused => {}
        FusionSource::StructuredOnly => explanation.push_str(" Based on the symptom checklist only."),
        FusionSource::TextOnly => explanation.push_str(" Based on the written notes only."),
        FusionSource::Fallback => {
            explanation.push_str(" Symptom scoring was unavailable; conditions shown are generic and low confidence.")
        }
    }
    explanation
}

/// Result used when the pipeline itself failed
pub fn unable_to_assess(context: &ScoringContext, inputs: &AssessmentInputs) -> AssessmentResult {
    AssessmentResult {
        triage_level: decide_triage(&inputs.vitals, None),
        explanation: format!(
            "Unable to assess {} automatically. Try again or consult a healthcare provider.",
            inputs.patient_name
        ),
        probable_conditions: context
            .fusion()
            .rank(&fallback_distribution())
            .into_iter()
            .map(ProbableCondition::from)
            .collect(),
        recommended_actions: unable_to_assess_actions(),
        simplified_summary: translate_action(SUMMARY_UNABLE, context.language()),
    }
}
