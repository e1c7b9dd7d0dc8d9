//! Canonical symptom vocabulary and synonym table
//!
//! The vocabulary order defines the feature-vector layout of the structured
//! scorer, so entries are never reordered or mutated after construction.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A token from the canonical symptom vocabulary, e.g. `chest_pain`
pub type SymptomId = String;

/// Canonical symptoms in feature-vector order
pub const CANONICAL_SYMPTOMS: [&str; 131] = [
    "itching", "skin_rash", "nodal_skin_eruptions", "continuous_sneezing", "shivering",
    "chills", "joint_pain", "stomach_pain", "acidity", "ulcers_on_tongue",
    "muscle_wasting", "vomiting", "burning_micturition", "spotting_urination", "fatigue",
    "weight_gain", "anxiety", "cold_hands_and_feets", "mood_swings", "weight_loss",
    "restlessness", "lethargy", "patches_in_throat", "irregular_sugar_level", "cough",
    "high_fever", "sunken_eyes", "breathlessness", "sweating", "dehydration",
    "indigestion", "headache", "yellowish_skin", "dark_urine", "nausea",
    "loss_of_appetite", "pain_behind_the_eyes", "back_pain", "constipation", "abdominal_pain",
    "diarrhoea", "mild_fever", "yellow_urine", "yellowing_of_eyes", "acute_liver_failure",
    "fluid_overload", "swelling_of_stomach", "swelled_lymph_nodes", "malaise", "blurred_and_distorted_vision",
    "phlegm", "throat_irritation", "redness_of_eyes", "sinus_pressure", "runny_nose",
    "congestion", "chest_pain", "weakness_in_limbs", "fast_heart_rate", "pain_during_bowel_movements",
    "pain_in_anal_region", "bloody_stool", "irritation_in_anus", "neck_pain", "dizziness",
    "cramps", "bruising", "obesity", "swollen_legs", "swollen_blood_vessels",
    "puffy_face_and_eyes", "enlarged_thyroid", "brittle_nails", "swollen_extremeties", "excessive_hunger",
    "extra_marital_contacts", "drying_and_tingling_lips", "slurred_speech", "knee_pain", "hip_joint_pain",
    "muscle_weakness", "stiff_neck", "swelling_joints", "movement_stiffness", "spinning_movements",
    "loss_of_balance", "unsteadiness", "weakness_of_one_body_side", "loss_of_smell", "bladder_discomfort",
    "foul_smell_of_urine", "continuous_feel_of_urine", "passage_of_gases", "internal_itching", "toxic_look_typhos",
    "depression", "irritability", "muscle_pain", "altered_sensorium", "red_spots_over_body",
    "belly_pain", "abnormal_menstruation", "dischromic_patches", "watering_from_eyes", "increased_appetite",
    "polyuria", "family_history", "mucoid_sputum", "rusty_sputum", "lack_of_concentration",
    "visual_disturbances", "receiving_blood_transfusion", "receiving_unsterile_injections", "coma", "stomach_bleeding",
    "distention_of_abdomen", "history_of_alcohol_consumption", "blood_in_sputum", "prominent_veins_on_calf", "palpitations",
    "painful_walking", "pus_filled_pimples", "blackheads", "scurring", "skin_peeling",
    "silver_like_dusting", "small_dents_in_nails", "inflammatory_nails", "blister", "red_sore_around_nose",
    "yellow_crust_ooze",
];

/// Everyday phrases health workers type, mapped to canonical ids
pub const SYMPTOM_SYNONYMS: [(&str, &str); 15] = [
    ("shortness of breath", "breathlessness"),
    ("breathless", "breathlessness"),
    ("skin rash", "skin_rash"),
    ("rash", "skin_rash"),
    ("fever", "high_fever"),
    ("low grade fever", "mild_fever"),
    ("nausea", "nausea"),
    ("vomiting", "vomiting"),
    ("stomach ache", "belly_pain"),
    ("diarrhea", "diarrhoea"),
    ("diarrhoea", "diarrhoea"),
    ("cough", "cough"),
    ("headache", "headache"),
    ("dizziness", "dizziness"),
    ("fatigue", "fatigue"),
];

lazy_static! {
    static ref STANDARD: SymptomVocabulary = SymptomVocabulary::new(
        CANONICAL_SYMPTOMS.iter().map(|s| s.to_string()).collect(),
        SYMPTOM_SYNONYMS.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
    );
}

/// Catalogue entry shown by symptom pickers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomDefinition {
    pub id: SymptomId,
    pub label: String,
    pub keywords: Vec<String>,
    /// Upper-case first letter of the label
    pub group: String,
}

/// Immutable symptom vocabulary with synonyms and picker catalogue
#[derive(Debug, Clone)]
pub struct SymptomVocabulary {
    symptoms: Vec<SymptomId>,
    index: HashMap<SymptomId, usize>,
    synonyms: Vec<(String, SymptomId)>,
    catalogue: Vec<SymptomDefinition>,
}

impl SymptomVocabulary {
    pub fn new(symptoms: Vec<SymptomId>, synonyms: Vec<(String, SymptomId)>) -> Self {
        let index = symptoms
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), i))
            .collect();
        let catalogue = symptoms.iter().map(|id| define(id)).collect();

        Self {
            symptoms,
            index,
            synonyms,
            catalogue,
        }
    }

    /// Process-wide vocabulary built from the bundled tables
    pub fn standard() -> &'static SymptomVocabulary {
        &STANDARD
    }

    pub fn len(&self) -> usize {
        self.symptoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symptoms.is_empty()
    }

    pub fn symptoms(&self) -> &[SymptomId] {
        &self.symptoms
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn synonym(&self, phrase: &str) -> Option<&str> {
        self.synonyms
            .iter()
            .find(|(p, _)| p == phrase)
            .map(|(_, id)| id.as_str())
    }

    pub fn synonyms(&self) -> &[(String, SymptomId)] {
        &self.synonyms
    }

    pub fn catalogue(&self) -> &[SymptomDefinition] {
        &self.catalogue
    }

    /// Catalogue entries whose keywords contain the query; blank query returns everything
    pub fn search(&self, query: &str) -> Vec<&SymptomDefinition> {
        let cleaned = query.trim().to_lowercase();
        if cleaned.is_empty() {
            return self.catalogue.iter().collect();
        }
        self.catalogue
            .iter()
            .filter(|symptom| symptom.keywords.iter().any(|k| k.contains(&cleaned)))
            .collect()
    }

    /// Catalogue grouped by first letter, each group sorted by label
    pub fn groups(&self) -> BTreeMap<String, Vec<&SymptomDefinition>> {
        let mut groups: BTreeMap<String, Vec<&SymptomDefinition>> = BTreeMap::new();
        for symptom in &self.catalogue {
            groups.entry(symptom.group.clone()).or_default().push(symptom);
        }
        for members in groups.values_mut() {
            members.sort_by(|a, b| a.label.cmp(&b.label));
        }
        groups
    }
}

/// Human-readable label: underscores become spaces, words are title-cased
pub fn label_of(id: &str) -> String {
    id.split(|c: char| c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn define(id: &str) -> SymptomDefinition {
    let label = label_of(id);
    let keywords = vec![
        id.replace('_', " "),
        label.clone(),
        label.to_lowercase(),
        id.to_string(),
    ];
    let group = label
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect::<String>())
        .unwrap_or_default();

    SymptomDefinition {
        id: id.to_string(),
        label,
        keywords,
        group,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_has_no_duplicates() {
        let vocab = SymptomVocabulary::standard();
        assert_eq!(vocab.len(), CANONICAL_SYMPTOMS.len());
        assert_eq!(vocab.index.len(), vocab.len());
    }

    #[test]
    fn test_synonyms_point_into_vocabulary() {
        let vocab = SymptomVocabulary::standard();
        for (phrase, id) in vocab.synonyms() {
            assert!(vocab.contains(id), "synonym {} maps to unknown id {}", phrase, id);
        }
    }

    #[test]
    fn test_label_of() {
        assert_eq!(label_of("blurred_and_distorted_vision"), "Blurred And Distorted Vision");
        assert_eq!(label_of("cough"), "Cough");
    }

    #[test]
    fn test_search_matches_keywords() {
        let vocab = SymptomVocabulary::standard();
        let hits: Vec<&str> = vocab.search("Chest").iter().map(|s| s.id.as_str()).collect();
        assert_eq!(hits, vec!["chest_pain"]);
        assert_eq!(vocab.search("   ").len(), vocab.len());
    }

    #[test]
    fn test_groups_sorted_by_label() {
        let vocab = SymptomVocabulary::standard();
        let groups = vocab.groups();
        let c_group = &groups["C"];
        assert!(c_group.windows(2).all(|w| w[0].label <= w[1].label));
        assert_eq!(groups.values().map(Vec::len).sum::<usize>(), vocab.len());
    }
}
