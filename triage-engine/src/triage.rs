//! Triage level rules
//!
//! Vital signs outrank model output: a critical vital sign makes the
//! assessment Critical regardless of what the scorers said.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::prediction::DiseasePrediction;

pub const CRITICAL_HEART_RATE: f64 = 120.0;
pub const LOW_OXYGEN_LEVEL: f64 = 92.0;
pub const FEVER_TEMPERATURE: f64 = 38.5;

/// Top conditions that escalate straight to Critical
pub const CRITICAL_DISEASES: [&str; 4] = ["Heart attack", "Paralysis (brain hemorrhage)", "AIDS", "Tuberculosis"];

/// Top conditions that escalate to Moderate
pub const MODERATE_DISEASES: [&str; 2] = ["Pneumonia", "Bronchial Asthma"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TriageLevel {
    Mild,
    Moderate,
    Critical,
}

impl fmt::Display for TriageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriageLevel::Mild => write!(f, "Mild"),
            TriageLevel::Moderate => write!(f, "Moderate"),
            TriageLevel::Critical => write!(f, "Critical"),
        }
    }
}

/// Vital signs as entered in the field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vitals {
    /// Free text such as "120/80"; recorded, not used by the rules
    #[serde(default)]
    pub blood_pressure: String,
    /// Degrees Celsius
    pub temperature: f64,
    /// Beats per minute
    pub heart_rate: f64,
    /// SpO2 percentage
    pub oxygen_level: f64,
}

impl Vitals {
    pub fn has_critical_signs(&self) -> bool {
        self.heart_rate >= CRITICAL_HEART_RATE || self.oxygen_level <= LOW_OXYGEN_LEVEL
    }

    pub fn has_fever(&self) -> bool {
        self.temperature >= FEVER_TEMPERATURE
    }
}

/// The rule that fired
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriageReason {
    CriticalVitals,
    CriticalCondition(String),
    Fever,
    ModerateCondition(String),
    NoWarningSigns,
}

impl TriageReason {
    /// One-sentence English explanation
    pub fn describe(&self) -> String {
        match self {
            TriageReason::CriticalVitals => {
                "Vital signs are in the danger range (heart rate 120 or more, or oxygen 92% or less).".to_string()
            }
            TriageReason::CriticalCondition(disease) => {
                format!("The most likely condition, {}, needs emergency care.", disease)
            }
            TriageReason::Fever => "Temperature is 38.5°C or higher.".to_string(),
            TriageReason::ModerateCondition(disease) => {
                format!("The most likely condition, {}, affects breathing and needs follow-up.", disease)
            }
            TriageReason::NoWarningSigns => "No danger signs were found in vitals or symptoms.".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriageDecision {
    pub level: TriageLevel,
    pub reason: TriageReason,
}

/// Apply the rules in order; the first match wins
pub fn assess_triage(vitals: &Vitals, top: Option<&DiseasePrediction>) -> TriageDecision {
    let top_disease = top.map(|p| p.disease.as_str());

    let (level, reason) = if vitals.has_critical_signs() {
        (TriageLevel::Critical, TriageReason::CriticalVitals)
    } else if let Some(disease) = top_disease.filter(|d| CRITICAL_DISEASES.contains(d)) {
        (TriageLevel::Critical, TriageReason::CriticalCondition(disease.to_string()))
    } else if vitals.has_fever() {
        (TriageLevel::Moderate, TriageReason::Fever)
    } else if let Some(disease) = top_disease.filter(|d| MODERATE_DISEASES.contains(d)) {
        (TriageLevel::Moderate, TriageReason::ModerateCondition(disease.to_string()))
    } else {
        (TriageLevel::Mild, TriageReason::NoWarningSigns)
    };

    TriageDecision { level, reason }
}

pub fn decide_triage(vitals: &Vitals, top: Option<&DiseasePrediction>) -> TriageLevel {
    assess_triage(vitals, top).level
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::DiseaseLabels;

    fn vitals(temperature: f64, heart_rate: f64, oxygen_level: f64) -> Vitals {
        Vitals {
            blood_pressure: "120/80".to_string(),
            temperature,
            heart_rate,
            oxygen_level,
        }
    }

    fn top(disease: &str) -> DiseasePrediction {
        DiseasePrediction::new(disease, 0.4)
    }

    #[test]
    fn test_critical_vitals_win() {
        assert_eq!(decide_triage(&vitals(36.8, 125.0, 97.0), Some(&top("Common Cold"))), TriageLevel::Critical);
        assert_eq!(decide_triage(&vitals(36.8, 80.0, 91.0), None), TriageLevel::Critical);
    }

    #[test]
    fn test_thresholds_are_inclusive() {
        assert_eq!(decide_triage(&vitals(36.5, 120.0, 98.0), None), TriageLevel::Critical);
        assert_eq!(decide_triage(&vitals(36.5, 80.0, 92.0), None), TriageLevel::Critical);
        assert_eq!(decide_triage(&vitals(38.5, 119.0, 93.0), None), TriageLevel::Moderate);
        assert_eq!(decide_triage(&vitals(38.4, 119.0, 93.0), None), TriageLevel::Mild);
    }

    #[test]
    fn test_vitals_only_examples() {
        assert_eq!(decide_triage(&vitals(37.0, 130.0, 98.0), None), TriageLevel::Critical);
        assert_eq!(decide_triage(&vitals(39.0, 80.0, 98.0), None), TriageLevel::Moderate);
        assert_eq!(decide_triage(&vitals(36.5, 75.0, 98.0), None), TriageLevel::Mild);
    }

    #[test]
    fn test_condition_rules() {
        let normal = vitals(36.8, 80.0, 98.0);
        assert_eq!(decide_triage(&normal, Some(&top("Heart attack"))), TriageLevel::Critical);
        assert_eq!(decide_triage(&normal, Some(&top("Pneumonia"))), TriageLevel::Moderate);
        assert_eq!(decide_triage(&normal, Some(&top("Allergy"))), TriageLevel::Mild);
    }

    #[test]
    fn test_critical_condition_outranks_fever() {
        let decision = assess_triage(&vitals(39.0, 80.0, 98.0), Some(&top("Tuberculosis")));
        assert_eq!(decision.level, TriageLevel::Critical);
        assert_eq!(decision.reason, TriageReason::CriticalCondition("Tuberculosis".to_string()));
    }

    #[test]
    fn test_allowlists_use_label_names() {
        let labels = DiseaseLabels::standard();
        for name in CRITICAL_DISEASES.iter().chain(MODERATE_DISEASES.iter()) {
            assert!(labels.index_of(name).is_some(), "{} is not a model label", name);
        }
    }

    #[test]
    fn test_level_ordering() {
        assert!(TriageLevel::Critical > TriageLevel::Moderate);
        assert!(TriageLevel::Moderate > TriageLevel::Mild);
    }
}
