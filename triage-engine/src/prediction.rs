use serde::{Deserialize, Serialize};

use crate::labels::DiseaseLabels;

/// One disease and its probability within a single distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseasePrediction {
    pub disease: String,
    pub probability: f64,
}

impl DiseasePrediction {
    pub fn new(disease: impl Into<String>, probability: f64) -> Self {
        Self {
            disease: disease.into(),
            probability,
        }
    }
}

/// Sort by probability, highest first; equal probabilities keep their order
pub fn sort_descending(predictions: &mut [DiseasePrediction]) {
    predictions.sort_by(|a, b| {
        b.probability
            .partial_cmp(&a.probability)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Numerically stable softmax
pub fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    if sum > 0.0 && sum.is_finite() {
        exps.into_iter().map(|e| e / sum).collect()
    } else {
        exps
    }
}

/// Divide by the total; all-zero input comes back unchanged
pub fn normalize_linear(values: &[f64]) -> Vec<f64> {
    let sum: f64 = values.iter().sum();
    if sum > 0.0 {
        values.iter().map(|v| v / sum).collect()
    } else {
        values.to_vec()
    }
}

/// Pair class probabilities with label names and sort descending
pub fn to_ranked_predictions(labels: &DiseaseLabels, probabilities: &[f64]) -> Vec<DiseasePrediction> {
    let mut predictions: Vec<DiseasePrediction> = labels
        .iter()
        .map(|(index, name)| {
            DiseasePrediction::new(name, probabilities.get(index).copied().unwrap_or(0.0))
        })
        .collect();
    sort_descending(&mut predictions);
    predictions
}

/// Sum of probabilities in a list
pub fn total_mass(predictions: &[DiseasePrediction]) -> f64 {
    predictions.iter().map(|p| p.probability).sum()
}
