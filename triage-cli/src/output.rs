// Terminal rendering
use colored::*;
use std::collections::BTreeMap;
use std::path::Path;

use triage_engine::{AssessmentResult, ModelEntry, ModelKind, SymptomDefinition, SymptomId, TriageLevel};

pub fn level_label(level: TriageLevel) -> ColoredString {
    match level {
        TriageLevel::Critical => "CRITICAL".red().bold(),
        TriageLevel::Moderate => "MODERATE".yellow().bold(),
        TriageLevel::Mild => "MILD".green().bold(),
    }
}

/// Whole-number percentage as shown to health workers
pub fn percent(probability: f64) -> String {
    format!("{:.0}%", probability * 100.0)
}

pub fn kind_name(kind: ModelKind) -> &'static str {
    match kind {
        ModelKind::Onnx => "onnx",
        ModelKind::Tflite => "tflite",
        ModelKind::Json => "json",
    }
}

pub fn print_assessment(result: &AssessmentResult) {
    println!("{} {}", "Triage level:".bold(), level_label(result.triage_level));
    println!();
    println!("{}", result.explanation);
    println!();

    println!("{}", "Probable conditions".bold().underline());
    for condition in &result.probable_conditions {
        println!("  {:<32} {:>5}", condition.name, percent(condition.probability).cyan());
    }
    println!();

    println!("{}", "Recommended actions".bold().underline());
    for (i, action) in result.recommended_actions.iter().enumerate() {
        println!("  {}. {}", i + 1, action);
    }
    println!();

    println!("{} {}", "Summary:".bold(), result.simplified_summary.italic());
}

pub fn print_normalized(pairs: &[(String, Option<SymptomId>)]) {
    for (phrase, id) in pairs {
        match id {
            Some(id) => println!("{} {} {}", phrase, "->".dimmed(), id.green()),
            None => println!("{} {} {}", phrase, "->".dimmed(), "not in vocabulary".red()),
        }
    }
}

pub fn print_symptom_ids(ids: &[SymptomId]) {
    if ids.is_empty() {
        println!("{}", "No known symptoms found.".yellow());
        return;
    }
    for id in ids {
        println!("{}", id.green());
    }
}

pub fn print_catalogue(symptoms: &[&SymptomDefinition]) {
    if symptoms.is_empty() {
        println!("{}", "No matching symptoms.".yellow());
        return;
    }
    for symptom in symptoms {
        println!("{:<36} {}", symptom.label, symptom.id.dimmed());
    }
}

pub fn print_groups(groups: &BTreeMap<String, Vec<&SymptomDefinition>>) {
    for (letter, members) in groups {
        println!("{}", letter.bold().blue());
        for symptom in members {
            println!("  {:<34} {}", symptom.label, symptom.id.dimmed());
        }
    }
}

pub fn print_models(models: &[ModelEntry], cache_dir: &Path) {
    if models.is_empty() {
        println!("{}", "No model manifest configured; built-in scorers only.".yellow());
        return;
    }
    println!("{} {}", "Cache:".bold(), cache_dir.display());
    for model in models {
        println!(
            "  {:<24} {:<7} {:>7.2} MB  {}",
            model.id.bold(),
            kind_name(model.kind),
            model.size_mb,
            model.description.dimmed()
        );
    }
}

pub fn print_cached(id: &str, path: &Path) {
    println!("{} {} {}", "✓".green(), id, path.display().to_string().dimmed());
}
