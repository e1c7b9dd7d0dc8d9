use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::StructuredScorer;
use crate::error::{TriageError, TriageResult};
use crate::labels::DiseaseLabels;
use crate::normalizer::create_feature_vector;
use crate::prediction::{softmax, to_ranked_predictions, DiseasePrediction};
use crate::vocabulary::{SymptomId, SymptomVocabulary};
use config_engine::StructuredSettings;

type Weights = &'static [(usize, f64)];

/// Symptom -> (disease class index, weight)
///
/// Keys are matched after [`weight_key`]; a key listed twice keeps its
/// last row.
const SYMPTOM_WEIGHTS: &[(&str, Weights)] = &[
    ("fever", &[(10, 0.3), (11, 0.25), (29, 0.2), (37, 0.15)]),
    ("high_fever", &[(11, 0.35), (29, 0.3), (37, 0.25), (8, 0.2)]),
    ("cough", &[(10, 0.3), (6, 0.25), (34, 0.2), (36, 0.15)]),
    ("headache", &[(30, 0.3), (10, 0.2), (0, 0.15)]),
    ("rash", &[(8, 0.3), (15, 0.25), (14, 0.2), (35, 0.15)]),
    ("skin_rash", &[(8, 0.3), (15, 0.25), (14, 0.2), (35, 0.15)]),
    ("abdominal_pain", &[(17, 0.3), (33, 0.25), (16, 0.2)]),
    ("belly_pain", &[(17, 0.3), (33, 0.25), (16, 0.2)]),
    ("breathlessness", &[(6, 0.4), (34, 0.3), (18, 0.2)]),
    ("chest_pain", &[(18, 0.4), (34, 0.3), (23, 0.2)]),
    ("nausea", &[(17, 0.3), (11, 0.25), (37, 0.2)]),
    ("vomiting", &[(17, 0.3), (11, 0.25), (37, 0.2)]),
    ("diarrhoea", &[(17, 0.4), (11, 0.3), (37, 0.2)]),
    ("diarrhea", &[(17, 0.4), (11, 0.3), (37, 0.2)]),
    ("joint_pain", &[(5, 0.3), (31, 0.25), (7, 0.2)]),
    ("back_pain", &[(7, 0.3), (5, 0.25), (31, 0.2)]),
    ("fatigue", &[(12, 0.25), (26, 0.2), (24, 0.15), (11, 0.15)]),
    ("weakness", &[(12, 0.25), (26, 0.2), (11, 0.15)]),
    ("burning_micturition", &[(38, 0.4), (16, 0.2)]),
    ("bladder_discomfort", &[(38, 0.4)]),
    ("itching", &[(15, 0.3), (4, 0.25), (35, 0.2)]),
    ("chills", &[(11, 0.3), (29, 0.25), (37, 0.2), (10, 0.15)]),
    ("dizziness", &[(0, 0.3), (30, 0.2), (25, 0.15)]),
    ("blurred_and_distorted_vision", &[(12, 0.3), (25, 0.25), (0, 0.2)]),
    ("excessive_hunger", &[(12, 0.3), (24, 0.25)]),
    ("fast_heart_rate", &[(24, 0.3), (23, 0.25), (18, 0.2)]),
    ("weight_loss", &[(12, 0.25), (24, 0.2), (36, 0.15)]),
    ("weight_gain", &[(26, 0.3), (12, 0.2)]),
    ("constipation", &[(26, 0.25), (17, 0.2)]),
    ("jaundice", &[(28, 0.4), (19, 0.3), (20, 0.2)]),
    ("dark_urine", &[(28, 0.3), (19, 0.25), (20, 0.2)]),
    ("yellowing_of_eyes", &[(28, 0.4), (19, 0.3), (20, 0.2)]),
    ("skin_rash", &[(8, 0.3), (15, 0.25), (14, 0.2)]),
];

/// Lowercase, whitespace to `_`, drop anything outside `[a-z0-9_]`
pub fn weight_key(symptom: &str) -> String {
    symptom
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .collect()
}

fn weights_for(key: &str) -> Option<Weights> {
    SYMPTOM_WEIGHTS
        .iter()
        .rev()
        .find(|(symptom, _)| *symptom == key)
        .map(|(_, weights)| *weights)
}

/// Weighted symptom table scorer
///
/// Scores start at `base_score`, each symptom adds its table weights (or
/// the configured boosts when it has no row), the current top classes get
/// a boost growing with the number of recognised symptoms, and the result
/// goes through softmax. Deterministic and always available.
#[derive(Debug, Clone)]
pub struct HeuristicScorer {
    labels: Arc<DiseaseLabels>,
    vocabulary: &'static SymptomVocabulary,
    base_score: f64,
    boost_cap: f64,
    per_symptom_increment: f64,
    boost_top_k: usize,
    unknown_boosts: Vec<(usize, f64)>,
}

impl HeuristicScorer {
    pub fn new(settings: &StructuredSettings, labels: Arc<DiseaseLabels>) -> TriageResult<Self> {
        let unknown_boosts = settings
            .unknown_symptom_boosts
            .iter()
            .map(|b| {
                labels
                    .index_of(&b.disease)
                    .map(|index| (index, b.boost))
                    .ok_or_else(|| TriageError::Config(format!("unknown disease in boost table: {}", b.disease)))
            })
            .collect::<TriageResult<Vec<_>>>()?;

        Ok(Self {
            labels,
            vocabulary: SymptomVocabulary::standard(),
            base_score: settings.base_score,
            boost_cap: settings.boost_cap,
            per_symptom_increment: settings.per_symptom_increment,
            boost_top_k: settings.boost_top_k,
            unknown_boosts,
        })
    }

    /// Scorer with the tuned default constants
    pub fn standard() -> Self {
        Self {
            labels: DiseaseLabels::standard(),
            vocabulary: SymptomVocabulary::standard(),
            base_score: 0.001,
            boost_cap: 0.2,
            per_symptom_increment: 0.02,
            boost_top_k: 5,
            unknown_boosts: vec![(10, 0.05), (4, 0.03)],
        }
    }

    pub fn labels(&self) -> &Arc<DiseaseLabels> {
        &self.labels
    }

    /// Raw, pre-softmax class scores
    pub fn raw_scores(&self, symptoms: &[SymptomId]) -> Vec<f64> {
        let mut scores = vec![self.base_score; self.labels.len()];
        let add = |scores: &mut Vec<f64>, index: usize, weight: f64| {
            if let Some(slot) = scores.get_mut(index) {
                *slot += weight;
            }
        };

        for symptom in symptoms {
            match weights_for(&weight_key(symptom)) {
                Some(weights) => {
                    for &(index, weight) in weights {
                        add(&mut scores, index, weight);
                    }
                }
                None => {
                    for &(index, boost) in &self.unknown_boosts {
                        add(&mut scores, index, boost);
                    }
                }
            }
        }

        let recognised = create_feature_vector(symptoms, self.vocabulary.symptoms())
            .iter()
            .filter(|&&flag| flag == 1)
            .count();
        let boost = (recognised as f64 * self.per_symptom_increment).min(self.boost_cap);
        if boost > 0.0 {
            let mut order: Vec<usize> = (0..scores.len()).collect();
            order.sort_by(|&a, &b| {
                scores[b]
                    .partial_cmp(&scores[a])
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            for index in order.into_iter().take(self.boost_top_k) {
                scores[index] += boost;
            }
        }

        scores
    }

    /// Full ranked distribution over every label
    pub fn predict(&self, symptoms: &[SymptomId]) -> Vec<DiseasePrediction> {
        let probabilities = softmax(&self.raw_scores(symptoms));
        to_ranked_predictions(&self.labels, &probabilities)
    }
}

#[async_trait]
impl StructuredScorer for HeuristicScorer {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    async fn score(&self, symptoms: &[SymptomId]) -> TriageResult<Vec<DiseasePrediction>> {
        debug!(symptoms = symptoms.len(), "Scoring symptoms with weight table");
        Ok(self.predict(symptoms))
    }
}
