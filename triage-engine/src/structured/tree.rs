use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use super::{HeuristicScorer, StructuredScorer};
use crate::error::{TriageError, TriageResult};
use crate::labels::DiseaseLabels;
use crate::models::ModelStore;
use crate::normalizer::create_feature_vector;
use crate::prediction::{softmax, to_ranked_predictions, DiseasePrediction};
use crate::vocabulary::{SymptomId, SymptomVocabulary};

/// One node of a dumped decision tree
///
/// Internal nodes carry `split` (feature index) and `threshold`; a feature
/// value below the threshold follows `yes`. Leaves carry `leaf`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    #[serde(default)]
    pub split: Option<usize>,
    #[serde(default)]
    pub threshold: f64,
    #[serde(default)]
    pub yes: usize,
    #[serde(default)]
    pub no: usize,
    #[serde(default)]
    pub leaf: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

/// Multi-class boosted tree ensemble; tree `i` contributes to class `i % num_class`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeModel {
    pub num_class: usize,
    #[serde(default)]
    pub base_score: f64,
    pub trees: Vec<Tree>,
}

impl TreeModel {
    pub fn from_json(raw: &str) -> TriageResult<Self> {
        let model: TreeModel = serde_json::from_str(raw)?;
        model.check()?;
        Ok(model)
    }

    fn check(&self) -> TriageResult<()> {
        if self.num_class == 0 {
            return Err(TriageError::Model("num_class must be positive".to_string()));
        }
        if self.trees.is_empty() {
            return Err(TriageError::Model("ensemble has no trees".to_string()));
        }
        for (t, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(TriageError::Model(format!("tree {} has no nodes", t)));
            }
            for (n, node) in tree.nodes.iter().enumerate() {
                if node.leaf.is_none() {
                    if node.split.is_none() {
                        return Err(TriageError::Model(format!("tree {} node {} is neither leaf nor split", t, n)));
                    }
                    if node.yes >= tree.nodes.len() || node.no >= tree.nodes.len() {
                        return Err(TriageError::Model(format!("tree {} node {} points outside the tree", t, n)));
                    }
                }
            }
        }
        Ok(())
    }

    /// Per-class margins before softmax
    pub fn margins(&self, features: &[u8]) -> TriageResult<Vec<f64>> {
        let mut margins = vec![self.base_score; self.num_class];
        for (i, tree) in self.trees.iter().enumerate() {
            let value = walk(tree, features)?;
            if let Some(slot) = margins.get_mut(i % self.num_class) {
                *slot += value;
            }
        }
        Ok(margins)
    }

    pub fn predict_proba(&self, features: &[u8]) -> TriageResult<Vec<f64>> {
        Ok(softmax(&self.margins(features)?))
    }
}

fn walk(tree: &Tree, features: &[u8]) -> TriageResult<f64> {
    let mut index = 0;
    // A well-formed tree reaches a leaf in fewer steps than it has nodes.
    for _ in 0..=tree.nodes.len() {
        let node = tree
            .nodes
            .get(index)
            .ok_or_else(|| TriageError::Model(format!("node {} out of range", index)))?;
        if let Some(leaf) = node.leaf {
            return Ok(leaf);
        }
        let feature = node
            .split
            .and_then(|split| features.get(split))
            .map(|&f| f64::from(f))
            .unwrap_or(0.0);
        index = if feature < node.threshold { node.yes } else { node.no };
    }
    Err(TriageError::Model("tree contains a cycle".to_string()))
}

/// Tree-ensemble scorer loaded from the model store
///
/// Until the model is loaded, or whenever it fails, scores come from the
/// weight-table heuristic so the structured branch keeps producing a
/// distribution.
pub struct TreeEnsembleScorer {
    model_id: String,
    store: Arc<ModelStore>,
    labels: Arc<DiseaseLabels>,
    vocabulary: &'static SymptomVocabulary,
    model: OnceCell<TreeModel>,
    fallback: HeuristicScorer,
}

impl TreeEnsembleScorer {
    pub fn new(model_id: impl Into<String>, store: Arc<ModelStore>, fallback: HeuristicScorer) -> Self {
        Self {
            model_id: model_id.into(),
            store,
            labels: Arc::clone(fallback.labels()),
            vocabulary: SymptomVocabulary::standard(),
            model: OnceCell::new(),
            fallback,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.model.initialized()
    }

    async fn load(&self) -> TriageResult<TreeModel> {
        let path = self.store.resolve(&self.model_id).await?;
        let raw = tokio::fs::read_to_string(&path).await?;
        let model = TreeModel::from_json(&raw)?;
        if model.num_class != self.labels.len() {
            return Err(TriageError::Model(format!(
                "model {} has {} classes, expected {}",
                self.model_id,
                model.num_class,
                self.labels.len()
            )));
        }
        info!(model = %self.model_id, trees = model.trees.len(), "Tree ensemble loaded");
        Ok(model)
    }

    fn predict(&self, model: &TreeModel, symptoms: &[SymptomId]) -> TriageResult<Vec<DiseasePrediction>> {
        let features = create_feature_vector(symptoms, self.vocabulary.symptoms());
        let probabilities = model.predict_proba(&features)?;
        Ok(to_ranked_predictions(&self.labels, &probabilities))
    }
}

#[async_trait]
impl StructuredScorer for TreeEnsembleScorer {
    fn name(&self) -> &'static str {
        "tree-ensemble"
    }

    async fn initialize(&self) -> TriageResult<()> {
        self.model.get_or_try_init(|| self.load()).await.map(|_| ())
    }

    async fn score(&self, symptoms: &[SymptomId]) -> TriageResult<Vec<DiseasePrediction>> {
        match self.model.get() {
            Some(model) => match self.predict(model, symptoms) {
                Ok(predictions) => Ok(predictions),
                Err(e) => {
                    warn!(model = %self.model_id, error = %e, "Tree ensemble failed, using weight table");
                    Ok(self.fallback.predict(symptoms))
                }
            },
            None => {
                debug!(model = %self.model_id, "Tree ensemble not loaded, using weight table");
                Ok(self.fallback.predict(symptoms))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ModelEntry, ModelKind, ModelManifest};

    fn stump(split: usize, yes: f64, no: f64) -> Tree {
        Tree {
            nodes: vec![
                TreeNode { split: Some(split), threshold: 0.5, yes: 1, no: 2, leaf: None },
                TreeNode { split: None, threshold: 0.0, yes: 0, no: 0, leaf: Some(yes) },
                TreeNode { split: None, threshold: 0.0, yes: 0, no: 0, leaf: Some(no) },
            ],
        }
    }

    #[test]
    fn test_stump_walk() {
        let tree = stump(1, -1.0, 2.0);
        assert_eq!(walk(&tree, &[0, 0]).unwrap(), -1.0);
        assert_eq!(walk(&tree, &[0, 1]).unwrap(), 2.0);
        // Missing features read as absent
        assert_eq!(walk(&tree, &[]).unwrap(), -1.0);
    }

    #[test]
    fn test_trees_round_robin_over_classes() {
        let model = TreeModel {
            num_class: 2,
            base_score: 0.5,
            trees: vec![stump(0, 0.0, 1.0), stump(0, 0.0, 3.0)],
        };
        assert_eq!(model.margins(&[1]).unwrap(), vec![1.5, 3.5]);
        let p = model.predict_proba(&[1]).unwrap();
        assert!(p[1] > p[0]);
    }

    #[test]
    fn test_malformed_models_are_rejected() {
        let dangling = r#"{"num_class": 1, "trees": [{"nodes": [{"split": 0, "threshold": 0.5, "yes": 4, "no": 5}]}]}"#;
        assert!(TreeModel::from_json(dangling).is_err());
        let empty = r#"{"num_class": 1, "trees": []}"#;
        assert!(TreeModel::from_json(empty).is_err());
    }

    #[test]
    fn test_cycle_is_detected() {
        let tree = Tree {
            nodes: vec![TreeNode { split: Some(0), threshold: 0.5, yes: 0, no: 0, leaf: None }],
        };
        assert!(walk(&tree, &[0]).is_err());
    }

    #[tokio::test]
    async fn test_falls_back_until_loaded() {
        let cache = tempfile::tempdir().unwrap();
        let store = Arc::new(ModelStore::empty(cache.path()));
        let scorer = TreeEnsembleScorer::new("symptom-xgboost", store, HeuristicScorer::standard());

        assert!(scorer.initialize().await.is_err());
        assert!(!scorer.is_loaded());

        let symptoms = vec!["cough".to_string()];
        let predictions = scorer.score(&symptoms).await.unwrap();
        assert_eq!(predictions, HeuristicScorer::standard().predict(&symptoms));
    }

    #[tokio::test]
    async fn test_loaded_model_drives_scores() {
        let assets = tempfile::tempdir().unwrap();
        let cache = tempfile::tempdir().unwrap();

        // 41 single-leaf trees; class 17 (Gastroenteritis) gets the big margin.
        let trees: Vec<serde_json::Value> = (0..41)
            .map(|i| {
                let leaf = if i == 17 { 4.0 } else { 0.0 };
                serde_json::json!({"nodes": [{"leaf": leaf}]})
            })
            .collect();
        let raw = serde_json::json!({"num_class": 41, "base_score": 0.0, "trees": trees});
        std::fs::write(assets.path().join("trees.json"), raw.to_string()).unwrap();

        let manifest = ModelManifest {
            version: "1".into(),
            models: vec![ModelEntry {
                id: "symptom-xgboost".into(),
                kind: ModelKind::Json,
                path: "trees.json".into(),
                description: String::new(),
                input: vec![],
                output: vec![],
                size_mb: 0.0,
            }],
        };
        let store = Arc::new(ModelStore::new(manifest, assets.path(), cache.path()));
        let scorer = TreeEnsembleScorer::new("symptom-xgboost", store, HeuristicScorer::standard());
        scorer.initialize().await.unwrap();
        assert!(scorer.is_loaded());

        let predictions = scorer.score(&["cough".to_string()]).await.unwrap();
        assert_eq!(predictions[0].disease, "Gastroenteritis");
        assert_eq!(predictions.len(), 41);
    }
}
