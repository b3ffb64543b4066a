//! Random Forest - pure Rust evaluation of an exported tree ensemble
//!
//! Artifact layout follows the fitted estimator's `tree_` arrays:
//! `children_left`, `children_right`, `feature`, `threshold`, `value`.
//! A leaf has both children set to -1. A row goes left when
//! `row[feature] <= threshold`.

use serde::{Deserialize, Serialize};

use super::classifier::Classifier;
use crate::logic::error::{PipelineError, PipelineResult};

const LEAF: i64 = -1;

// ============================================================================
// DECISION TREE
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node class counts or fractions
    pub value: Vec<Vec<f64>>,
}

impl DecisionTree {
    fn node_count(&self) -> usize {
        self.children_left.len()
    }

    fn is_leaf(&self, node: usize) -> bool {
        self.children_left[node] == LEAF
    }

    /// Structural checks so evaluation can index without bounds failures.
    /// Children must point forward, which also rules out cycles.
    fn validate(&self, tree_idx: usize, n_features: usize, n_classes: usize) -> PipelineResult<()> {
        let n = self.node_count();
        let invalid = |msg: String| {
            PipelineError::ModelUnavailable(format!("tree {}: {}", tree_idx, msg))
        };

        if n == 0 {
            return Err(invalid("has no nodes".to_string()));
        }
        if self.children_right.len() != n
            || self.feature.len() != n
            || self.threshold.len() != n
            || self.value.len() != n
        {
            return Err(invalid("node arrays have different lengths".to_string()));
        }

        for node in 0..n {
            let (left, right) = (self.children_left[node], self.children_right[node]);

            if left == LEAF || right == LEAF {
                if left != right {
                    return Err(invalid(format!("node {} has only one child", node)));
                }
                let counts = &self.value[node];
                if counts.len() != n_classes {
                    return Err(invalid(format!(
                        "leaf {} has {} class values, expected {}",
                        node,
                        counts.len(),
                        n_classes
                    )));
                }
                let total: f64 = counts.iter().sum();
                if !(total > 0.0) || counts.iter().any(|c| *c < 0.0 || !c.is_finite()) {
                    return Err(invalid(format!("leaf {} has an invalid class distribution", node)));
                }
                continue;
            }

            for child in [left, right] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(invalid(format!("node {} points to invalid child {}", node, child)));
                }
            }

            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(invalid(format!(
                    "node {} splits on feature {}, model has {}",
                    node, feature, n_features
                )));
            }
        }

        Ok(())
    }

    /// Walk to the leaf for `row`
    fn leaf_for(&self, row: &[f64]) -> usize {
        let mut node = 0usize;
        while !self.is_leaf(node) {
            let feature = self.feature[node] as usize;
            node = if row[feature] <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        node
    }

    /// Leaf class distribution, normalized to sum to 1
    fn predict_proba(&self, row: &[f64]) -> impl Iterator<Item = f64> + '_ {
        let counts = &self.value[self.leaf_for(row)];
        let total: f64 = counts.iter().sum();
        counts.iter().map(move |c| c / total)
    }
}

// ============================================================================
// RANDOM FOREST
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    #[serde(default = "default_model_type")]
    pub model_type: String,
    pub n_features: usize,
    pub classes: Vec<i64>,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub feature_importances: Vec<f64>,
    pub estimators: Vec<DecisionTree>,
}

fn default_model_type() -> String {
    "random_forest".to_string()
}

impl RandomForest {
    /// Parse and validate a forest artifact
    pub fn from_json(content: &str) -> PipelineResult<Self> {
        let forest: RandomForest = serde_json::from_str(content)
            .map_err(|e| PipelineError::unavailable("Failed to parse forest model", e))?;
        forest.validate()?;
        Ok(forest)
    }

    pub fn validate(&self) -> PipelineResult<()> {
        if self.classes.is_empty() {
            return Err(PipelineError::ModelUnavailable("model declares no classes".to_string()));
        }
        if self.estimators.is_empty() {
            return Err(PipelineError::ModelUnavailable("model has no trees".to_string()));
        }
        if self.feature_importances.len() != self.n_features {
            return Err(PipelineError::ModelUnavailable(format!(
                "model has {} feature importances for {} features",
                self.feature_importances.len(),
                self.n_features
            )));
        }
        if let Some(names) = &self.feature_names {
            if names.len() != self.n_features {
                return Err(PipelineError::ModelUnavailable(format!(
                    "model lists {} feature names for {} features",
                    names.len(),
                    self.n_features
                )));
            }
        }

        for (i, tree) in self.estimators.iter().enumerate() {
            tree.validate(i, self.n_features, self.classes.len())?;
        }

        Ok(())
    }

    fn check_row(&self, row: &[f64]) -> PipelineResult<()> {
        if row.len() != self.n_features {
            return Err(PipelineError::Configuration(format!(
                "model expects {} features, got {}",
                self.n_features,
                row.len()
            )));
        }
        Ok(())
    }
}

impl Classifier for RandomForest {
    fn kind(&self) -> &str {
        &self.model_type
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }

    /// Argmax of the averaged probabilities; first class wins ties
    fn predict(&self, row: &[f64]) -> PipelineResult<i64> {
        let proba = self.predict_proba(row)?;

        let mut best = 0usize;
        for (i, p) in proba.iter().enumerate() {
            if *p > proba[best] {
                best = i;
            }
        }

        Ok(self.classes[best])
    }

    /// Mean of the per-tree leaf distributions
    fn predict_proba(&self, row: &[f64]) -> PipelineResult<Vec<f64>> {
        self.check_row(row)?;

        let mut sums = vec![0.0f64; self.classes.len()];
        for tree in &self.estimators {
            for (sum, p) in sums.iter_mut().zip(tree.predict_proba(row)) {
                *sum += p;
            }
        }

        let n_trees = self.estimators.len() as f64;
        Ok(sums.into_iter().map(|s| s / n_trees).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two stumps on feature 0 (threshold 10) and feature 1 (threshold 0.5)
    fn two_stump_forest() -> RandomForest {
        RandomForest {
            model_type: "random_forest".to_string(),
            n_features: 2,
            classes: vec![0, 1],
            feature_names: None,
            feature_importances: vec![0.7, 0.3],
            estimators: vec![
                DecisionTree {
                    children_left: vec![1, -1, -1],
                    children_right: vec![2, -1, -1],
                    feature: vec![0, -2, -2],
                    threshold: vec![10.0, -2.0, -2.0],
                    value: vec![vec![5.0, 5.0], vec![4.0, 0.0], vec![1.0, 3.0]],
                },
                DecisionTree {
                    children_left: vec![1, -1, -1],
                    children_right: vec![2, -1, -1],
                    feature: vec![1, -2, -2],
                    threshold: vec![0.5, -2.0, -2.0],
                    value: vec![vec![0.5, 0.5], vec![1.0, 0.0], vec![0.0, 1.0]],
                },
            ],
        }
    }

    #[test]
    fn test_predict_proba_averages_trees() {
        let forest = two_stump_forest();

        // left, left: (1,0) and (1,0)
        assert_eq!(forest.predict_proba(&[3.0, 0.0]).unwrap(), vec![1.0, 0.0]);
        // right, right: (0.25,0.75) and (0,1)
        assert_eq!(forest.predict_proba(&[20.0, 1.0]).unwrap(), vec![0.125, 0.875]);
        assert_eq!(forest.predict(&[20.0, 1.0]).unwrap(), 1);
    }

    #[test]
    fn test_threshold_goes_left_when_equal() {
        let forest = two_stump_forest();
        assert_eq!(forest.predict_proba(&[10.0, 0.5]).unwrap(), vec![1.0, 0.0]);
    }

    #[test]
    fn test_tie_picks_first_class() {
        let forest = two_stump_forest();
        // (1,0) and (0,1) average to (0.5,0.5)
        assert_eq!(forest.predict(&[3.0, 1.0]).unwrap(), 0);
    }

    #[test]
    fn test_row_length_checked() {
        let forest = two_stump_forest();
        assert!(matches!(
            forest.predict(&[1.0]),
            Err(PipelineError::Configuration(_))
        ));
    }

    #[test]
    fn test_validate_rejects_backward_child() {
        let mut forest = two_stump_forest();
        forest.estimators[0].children_left[0] = 0;
        assert!(matches!(forest.validate(), Err(PipelineError::ModelUnavailable(_))));
    }

    #[test]
    fn test_validate_rejects_bad_split_feature() {
        let mut forest = two_stump_forest();
        forest.estimators[1].feature[0] = 5;
        assert!(forest.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_importance_length() {
        let mut forest = two_stump_forest();
        forest.feature_importances.push(0.0);
        assert!(forest.validate().is_err());
    }

    #[test]
    fn test_from_json() {
        let json = serde_json::to_string(&two_stump_forest()).unwrap();
        let forest = RandomForest::from_json(&json).unwrap();
        assert_eq!(forest.kind(), "random_forest");
        assert_eq!(forest.classes(), &[0, 1]);
        assert!(RandomForest::from_json("{\"n_features\": 2}").is_err());
    }
}
