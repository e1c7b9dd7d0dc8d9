//! Symptom normalization
//!
//! Maps free-form and picker-provided symptom strings onto the canonical
//! vocabulary. Unknown input is reported as `None` and never aborts an
//! assessment.

use crate::vocabulary::{SymptomId, SymptomVocabulary};

/// Normalize one symptom string against the standard vocabulary
pub fn normalize(input: &str) -> Option<SymptomId> {
    normalize_with(SymptomVocabulary::standard(), input)
}

/// Normalize one symptom string: synonym table first, then the
/// underscore-joined form against the vocabulary
pub fn normalize_with(vocabulary: &SymptomVocabulary, input: &str) -> Option<SymptomId> {
    let cleaned = input.trim().to_lowercase();
    if cleaned.is_empty() {
        return None;
    }
    if let Some(id) = vocabulary.synonym(&cleaned) {
        return Some(id.to_string());
    }
    let joined = cleaned.split_whitespace().collect::<Vec<_>>().join("_");
    if vocabulary.contains(&joined) {
        return Some(joined);
    }
    None
}

/// Normalize a list, dropping unknown entries and duplicates while keeping order
pub fn normalize_all<S: AsRef<str>>(vocabulary: &SymptomVocabulary, inputs: &[S]) -> Vec<SymptomId> {
    let mut out: Vec<SymptomId> = Vec::with_capacity(inputs.len());
    for input in inputs {
        match normalize_with(vocabulary, input.as_ref()) {
            Some(id) if !out.contains(&id) => out.push(id),
            Some(_) => {}
            None => tracing::debug!(symptom = input.as_ref(), "Ignoring symptom outside the vocabulary"),
        }
    }
    out
}

/// Symptoms mentioned anywhere in free text, using the standard vocabulary
pub fn extract_from_text(text: &str) -> Vec<SymptomId> {
    extract_from_text_with(SymptomVocabulary::standard(), text)
}

/// Scan text for synonym phrases and space-separated canonical names
///
/// Matching is a case-insensitive substring test. Results are unique, in
/// discovery order: synonym hits first, then vocabulary order.
pub fn extract_from_text_with(vocabulary: &SymptomVocabulary, text: &str) -> Vec<SymptomId> {
    let lower = text.to_lowercase();
    if lower.trim().is_empty() {
        return Vec::new();
    }

    let mut matches: Vec<SymptomId> = Vec::new();
    let mut add = |id: &str| {
        if !matches.iter().any(|m| m == id) {
            matches.push(id.to_string());
        }
    };

    for (phrase, id) in vocabulary.synonyms() {
        if lower.contains(phrase.as_str()) {
            add(id);
        }
    }
    for id in vocabulary.symptoms() {
        if lower.contains(&id.replace('_', " ")) {
            add(id);
        }
    }
    matches
}

/// Presence/absence flags in vocabulary order
pub fn create_feature_vector<S: AsRef<str>>(selected: &[S], vocabulary: &[SymptomId]) -> Vec<u8> {
    let mut features = vec![0u8; vocabulary.len()];
    for symptom in selected {
        if let Some(index) = vocabulary.iter().position(|v| v == symptom.as_ref()) {
            if let Some(slot) = features.get_mut(index) {
                *slot = 1;
            }
        }
    }
    features
}
