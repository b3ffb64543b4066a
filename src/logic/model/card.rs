//! Model Card - descriptive facts about the trained model
//!
//! Optional section of the preprocessing metadata. Only shown to the user,
//! never used for inference.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelCard {
    pub algorithm: String,
    #[serde(default)]
    pub n_estimators: Option<u32>,
    #[serde(default)]
    pub accuracy: Option<f64>,
    #[serde(default)]
    pub test_samples: Option<u32>,
    #[serde(default)]
    pub class_report: Vec<ClassMetrics>,
    #[serde(default)]
    pub dataset: Option<DatasetProfile>,
}

/// Precision / recall / F1 for one class on the held-out set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetProfile {
    pub rows: u64,
    pub columns: u32,
    #[serde(default)]
    pub source: Option<String>,
}
