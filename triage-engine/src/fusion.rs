//! Prediction fusion and post-processing
//!
//! Combines the structured and text distributions by weighted average over
//! the union of diseases, then calibrates, thresholds and truncates the
//! result for display.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::prediction::{sort_descending, DiseasePrediction};
use config_engine::FusionSettings;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionWeights {
    pub structured: f64,
    pub text: f64,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            structured: 0.6,
            text: 0.4,
        }
    }
}

/// Which inputs produced the final distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FusionSource {
    Fused,
    StructuredOnly,
    TextOnly,
    Fallback,
}

impl fmt::Display for FusionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FusionSource::Fused => "fused",
            FusionSource::StructuredOnly => "structured_only",
            FusionSource::TextOnly => "text_only",
            FusionSource::Fallback => "fallback",
        };
        f.write_str(name)
    }
}

/// Weighted average over the union of diseases, renormalized and sorted
///
/// A disease missing from one list counts as 0 there. Union order is the
/// first list's order followed by diseases only the second list has, which
/// makes ties deterministic.
pub fn fuse_predictions(
    structured: &[DiseasePrediction],
    text: &[DiseasePrediction],
    weights: FusionWeights,
) -> Vec<DiseasePrediction> {
    let lookup = |list: &[DiseasePrediction]| -> HashMap<String, f64> {
        list.iter().map(|p| (p.disease.clone(), p.probability)).collect()
    };
    let structured_map = lookup(structured);
    let text_map = lookup(text);

    let mut order: Vec<&str> = Vec::with_capacity(structured.len() + text.len());
    for p in structured.iter().chain(text.iter()) {
        if !order.contains(&p.disease.as_str()) {
            order.push(&p.disease);
        }
    }

    let mut fused: Vec<DiseasePrediction> = order
        .into_iter()
        .map(|disease| {
            let s = structured_map.get(disease).copied().unwrap_or(0.0);
            let t = text_map.get(disease).copied().unwrap_or(0.0);
            DiseasePrediction::new(disease, weights.structured * s + weights.text * t)
        })
        .collect();

    let sum: f64 = fused.iter().map(|p| p.probability).sum();
    if sum > 0.0 {
        for p in &mut fused {
            p.probability /= sum;
        }
    }
    sort_descending(&mut fused);
    fused
}

/// Entries at or above `min_probability`, order kept
pub fn filter_by_threshold(predictions: &[DiseasePrediction], min_probability: f64) -> Vec<DiseasePrediction> {
    predictions
        .iter()
        .filter(|p| p.probability >= min_probability)
        .cloned()
        .collect()
}

/// First `n` entries
pub fn get_top(predictions: &[DiseasePrediction], n: usize) -> Vec<DiseasePrediction> {
    predictions.iter().take(n).cloned().collect()
}

/// Raise each probability to `1/temperature` and renormalize
///
/// Temperature 1 is the identity. Values below 1 sharpen, above 1 flatten.
pub fn temperature_scale(predictions: &[DiseasePrediction], temperature: f64) -> Vec<DiseasePrediction> {
    if (temperature - 1.0).abs() < f64::EPSILON || temperature <= 0.0 {
        return predictions.to_vec();
    }
    let exponent = 1.0 / temperature;
    let mut scaled: Vec<DiseasePrediction> = predictions
        .iter()
        .map(|p| DiseasePrediction::new(p.disease.clone(), p.probability.powf(exponent)))
        .collect();
    let sum: f64 = scaled.iter().map(|p| p.probability).sum();
    if sum > 0.0 {
        for p in &mut scaled {
            p.probability /= sum;
        }
    }
    scaled
}

/// Low-confidence distribution used when neither scorer produced anything
pub fn fallback_distribution() -> Vec<DiseasePrediction> {
    vec![
        DiseasePrediction::new("Common Cold", 0.5),
        DiseasePrediction::new("Allergy", 0.3),
        DiseasePrediction::new("Gastroenteritis", 0.2),
    ]
}

#[derive(Debug, Clone)]
pub struct FusionLayer {
    weights: FusionWeights,
    min_probability: f64,
    top_n: usize,
    temperature: f64,
}

impl Default for FusionLayer {
    fn default() -> Self {
        Self::from_settings(&FusionSettings::default())
    }
}

impl FusionLayer {
    pub fn from_settings(settings: &FusionSettings) -> Self {
        Self {
            weights: FusionWeights {
                structured: settings.structured_weight,
                text: settings.text_weight,
            },
            min_probability: settings.min_probability,
            top_n: settings.top_n,
            temperature: settings.temperature,
        }
    }

    pub fn weights(&self) -> FusionWeights {
        self.weights
    }

    pub fn fuse(&self, structured: &[DiseasePrediction], text: &[DiseasePrediction]) -> Vec<DiseasePrediction> {
        fuse_predictions(structured, text, self.weights)
    }

    /// Fuse when both sides produced output, otherwise pass the survivor
    /// through, otherwise use the fallback distribution
    pub fn combine(
        &self,
        structured: Vec<DiseasePrediction>,
        text: Vec<DiseasePrediction>,
    ) -> (Vec<DiseasePrediction>, FusionSource) {
        match (structured.is_empty(), text.is_empty()) {
            (false, false) => (self.fuse(&structured, &text), FusionSource::Fused),
            (false, true) => (structured, FusionSource::StructuredOnly),
            (true, false) => (text, FusionSource::TextOnly),
            (true, true) => (fallback_distribution(), FusionSource::Fallback),
        }
    }

    /// Calibrate, threshold and truncate for display
    ///
    /// If the threshold would remove everything, the single most likely
    /// entry is kept.
    pub fn rank(&self, predictions: &[DiseasePrediction]) -> Vec<DiseasePrediction> {
        let mut calibrated = temperature_scale(predictions, self.temperature);
        sort_descending(&mut calibrated);
        let mut kept = filter_by_threshold(&calibrated, self.min_probability);
        if kept.is_empty() {
            kept = get_top(&calibrated, 1);
        }
        get_top(&kept, self.top_n.max(1))
    }
}
