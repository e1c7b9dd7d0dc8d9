//! Disease label table
//!
//! The class index order is fixed by the trained models; every scorer and
//! the fusion layer address diseases through this table so indices line up.

use std::sync::Arc;

/// Class index -> disease name, in model output order
pub const DISEASE_LABELS: [&str; 41] = [
    "(vertigo) Paroymsal  Positional Vertigo",
    "AIDS",
    "Acne",
    "Alcoholic hepatitis",
    "Allergy",
    "Arthritis",
    "Bronchial Asthma",
    "Cervical spondylosis",
    "Chicken pox",
    "Chronic cholestasis",
    "Common Cold",
    "Dengue",
    "Diabetes",
    "Dimorphic hemmorhoids(piles)",
    "Drug Reaction",
    "Fungal infection",
    "GERD",
    "Gastroenteritis",
    "Heart attack",
    "Hepatitis B",
    "Hepatitis C",
    "Hepatitis D",
    "Hepatitis E",
    "Hypertension",
    "Hyperthyroidism",
    "Hypoglycemia",
    "Hypothyroidism",
    "Impetigo",
    "Jaundice",
    "Malaria",
    "Migraine",
    "Osteoarthristis",
    "Paralysis (brain hemorrhage)",
    "Peptic ulcer diseae",
    "Pneumonia",
    "Psoriasis",
    "Tuberculosis",
    "Typhoid",
    "Urinary tract infection",
    "Varicose veins",
    "hepatitis A",
];

/// Shared, immutable view of the label table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiseaseLabels {
    names: Vec<String>,
}

impl DiseaseLabels {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// The 41-class table the bundled models were trained on
    pub fn standard() -> Arc<Self> {
        Arc::new(Self::new(DISEASE_LABELS.iter().map(|s| s.to_string()).collect()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.names.iter().enumerate().map(|(i, n)| (i, n.as_str()))
    }
}
