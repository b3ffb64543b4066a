//! Feature Importance Ranking
//!
//! Importances are a property of the trained model, so ranking happens once
//! when the model is bound to its metadata.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub name: String,
    pub importance: f64,
}

/// Pair names with importances and sort DESC. Equal weights keep declared order.
pub fn rank_importances(feature_names: &[String], importances: &[f64]) -> Vec<FeatureImportance> {
    let mut ranked: Vec<FeatureImportance> = feature_names
        .iter()
        .zip(importances.iter())
        .map(|(name, &importance)| FeatureImportance {
            name: name.clone(),
            importance,
        })
        .collect();

    // Stable sort
    ranked.sort_by(|a, b| {
        b.importance
            .partial_cmp(&a.importance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sorted_descending() {
        let ranked = rank_importances(&names(&["a", "b", "c", "d"]), &[0.1, 0.4, 0.2, 0.3]);
        let order: Vec<&str> = ranked.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(order, vec!["b", "d", "c", "a"]);
    }

    #[test]
    fn test_ties_keep_declared_order() {
        let ranked = rank_importances(&names(&["x", "y", "z"]), &[0.2, 0.5, 0.2]);
        let order: Vec<&str> = ranked.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(order, vec!["y", "x", "z"]);
    }
}
