//! Recommended actions and patient-facing summaries
//!
//! All text here is English. Localization happens afterwards through
//! [`crate::translations`], which keys on these exact strings.

use crate::prediction::DiseasePrediction;
use crate::triage::{TriageLevel, CRITICAL_DISEASES, MODERATE_DISEASES};

pub const REFER_TO_HOSPITAL: &str = "Refer to nearest hospital immediately.";
pub const MONITOR_ABC: &str = "Monitor airway, breathing, and circulation.";
pub const DO_NOT_DELAY: &str = "Do not delay seeking emergency medical care.";
pub const CLINIC_FOLLOW_UP: &str = "Schedule a clinic follow-up within 24 hours.";
pub const HYDRATION_AND_VITALS: &str = "Provide hydration and monitor vitals regularly.";
pub const MONITOR_BREATHING: &str = "Monitor breathing and seek care if symptoms worsen.";
pub const REST_AND_HYDRATION: &str = "Advise rest and hydration.";
pub const REASSESS_48H: &str = "Reassess if symptoms persist beyond 48 hours.";
pub const OTC_COLD_MEDICATION: &str = "Over-the-counter cold medications may help.";
pub const CHECK_SYMPTOMS: &str = "Please ensure all symptoms are entered correctly.";
pub const TRY_AGAIN: &str = "Try again or consult a healthcare provider.";

pub const SUMMARY_CRITICAL: &str = "The condition looks serious. Go to the nearest hospital immediately.";
pub const SUMMARY_CRITICAL_CONDITION: &str =
    "Signs point to a possible emergency. Go to the nearest hospital immediately.";
pub const SUMMARY_MODERATE: &str =
    "The condition needs attention. Visit the clinic within 24 hours and keep monitoring vital signs.";
pub const SUMMARY_MODERATE_BREATHING: &str =
    "Breathing needs close watching. Visit the clinic within 24 hours.";
pub const SUMMARY_MILD: &str = "The condition looks mild for now. Rest, drink water, and watch the symptoms.";
pub const SUMMARY_UNABLE: &str =
    "Unable to complete the assessment. Try again or consult a healthcare provider.";

fn top_is(conditions: &[DiseasePrediction], allowlist: &[&str]) -> bool {
    conditions
        .first()
        .map(|p| allowlist.contains(&p.disease.as_str()))
        .unwrap_or(false)
}

/// Level-specific actions plus disease-specific additions for the top condition
pub fn generate_actions(level: TriageLevel, conditions: &[DiseasePrediction]) -> Vec<String> {
    let mut actions: Vec<&str> = match level {
        TriageLevel::Critical => vec![REFER_TO_HOSPITAL, MONITOR_ABC],
        TriageLevel::Moderate => vec![CLINIC_FOLLOW_UP, HYDRATION_AND_VITALS],
        TriageLevel::Mild => vec![REST_AND_HYDRATION, REASSESS_48H],
    };

    match level {
        TriageLevel::Critical if top_is(conditions, &CRITICAL_DISEASES) => actions.push(DO_NOT_DELAY),
        TriageLevel::Moderate if top_is(conditions, &MODERATE_DISEASES) => actions.push(MONITOR_BREATHING),
        TriageLevel::Mild if top_is(conditions, &["Common Cold"]) => actions.push(OTC_COLD_MEDICATION),
        _ => {}
    }

    actions.into_iter().map(String::from).collect()
}

/// Actions shown when the pipeline could not produce an assessment
pub fn unable_to_assess_actions() -> Vec<String> {
    vec![CHECK_SYMPTOMS.to_string(), TRY_AGAIN.to_string()]
}

/// Short English summary for the patient
pub fn generate_summary(level: TriageLevel, conditions: &[DiseasePrediction]) -> String {
    let summary = match level {
        TriageLevel::Critical if top_is(conditions, &CRITICAL_DISEASES) => SUMMARY_CRITICAL_CONDITION,
        TriageLevel::Critical => SUMMARY_CRITICAL,
        TriageLevel::Moderate if top_is(conditions, &MODERATE_DISEASES) => SUMMARY_MODERATE_BREATHING,
        TriageLevel::Moderate => SUMMARY_MODERATE,
        TriageLevel::Mild => SUMMARY_MILD,
    };
    summary.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn top(disease: &str) -> Vec<DiseasePrediction> {
        vec![DiseasePrediction::new(disease, 0.5)]
    }

    #[test]
    fn test_level_actions() {
        assert_eq!(generate_actions(TriageLevel::Critical, &[]), vec![REFER_TO_HOSPITAL, MONITOR_ABC]);
        assert_eq!(generate_actions(TriageLevel::Moderate, &[]), vec![CLINIC_FOLLOW_UP, HYDRATION_AND_VITALS]);
        assert_eq!(generate_actions(TriageLevel::Mild, &[]), vec![REST_AND_HYDRATION, REASSESS_48H]);
    }

    #[test]
    fn test_disease_specific_additions() {
        assert_eq!(generate_actions(TriageLevel::Critical, &top("Heart attack")).last().unwrap(), DO_NOT_DELAY);
        assert_eq!(generate_actions(TriageLevel::Moderate, &top("Bronchial Asthma")).last().unwrap(), MONITOR_BREATHING);
        assert_eq!(generate_actions(TriageLevel::Mild, &top("Common Cold")).last().unwrap(), OTC_COLD_MEDICATION);
        assert_eq!(generate_actions(TriageLevel::Mild, &top("Allergy")).len(), 2);
        // Addition only applies at the matching level
        assert_eq!(generate_actions(TriageLevel::Moderate, &top("Common Cold")).len(), 2);
    }

    #[test]
    fn test_summaries() {
        assert_eq!(generate_summary(TriageLevel::Mild, &[]), SUMMARY_MILD);
        assert_eq!(generate_summary(TriageLevel::Critical, &top("AIDS")), SUMMARY_CRITICAL_CONDITION);
        assert_eq!(generate_summary(TriageLevel::Critical, &top("Malaria")), SUMMARY_CRITICAL);
        assert_eq!(generate_summary(TriageLevel::Moderate, &top("Pneumonia")), SUMMARY_MODERATE_BREATHING);
    }
}
