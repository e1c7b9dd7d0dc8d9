//! Structured (symptom checklist) scorers
//!
//! A structured scorer turns normalized symptom ids into a probability
//! distribution over the disease labels. Two implementations ship: the
//! weight-table heuristic and a boosted tree ensemble loaded from the model
//! store, which falls back to the heuristic when its model is unavailable.

mod heuristic;
mod tree;

pub use heuristic::{weight_key, HeuristicScorer};
pub use tree::{Tree, TreeEnsembleScorer, TreeModel, TreeNode};

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::TriageResult;
use crate::labels::DiseaseLabels;
use crate::models::ModelStore;
use crate::prediction::DiseasePrediction;
use crate::vocabulary::SymptomId;
use config_engine::{StructuredScorerKind, StructuredSettings};

#[async_trait]
pub trait StructuredScorer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Load any model state; called once per scoring context
    async fn initialize(&self) -> TriageResult<()> {
        Ok(())
    }

    /// Ranked distribution over the label table, highest first
    async fn score(&self, symptoms: &[SymptomId]) -> TriageResult<Vec<DiseasePrediction>>;
}

/// Build the configured structured scorer
pub fn create_structured_scorer(
    settings: &StructuredSettings,
    labels: Arc<DiseaseLabels>,
    store: Arc<ModelStore>,
) -> TriageResult<Arc<dyn StructuredScorer>> {
    let heuristic = HeuristicScorer::new(settings, labels)?;
    match settings.kind {
        StructuredScorerKind::Heuristic => Ok(Arc::new(heuristic)),
        StructuredScorerKind::Tree => Ok(Arc::new(TreeEnsembleScorer::new(
            settings.tree_model_id.clone(),
            store,
            heuristic,
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_selects_kind() {
        let cache = tempfile::tempdir().unwrap();
        let store = Arc::new(ModelStore::empty(cache.path()));
        let mut settings = StructuredSettings::default();

        let scorer = create_structured_scorer(&settings, DiseaseLabels::standard(), Arc::clone(&store)).unwrap();
        assert_eq!(scorer.name(), "heuristic");

        settings.kind = StructuredScorerKind::Tree;
        let scorer = create_structured_scorer(&settings, DiseaseLabels::standard(), store).unwrap();
        assert_eq!(scorer.name(), "tree-ensemble");
    }
}
