//! Shared fixtures for unit tests
//!
//! A small two-tree forest over the full feature layout plus metadata that
//! matches it, and a stub classifier that records what it was given.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::logic::encoding::{EncodingTables, FeatureThresholds};
use crate::logic::error::PipelineResult;
use crate::logic::features::layout::FEATURE_LAYOUT;
use crate::logic::features::RawAnswers;
use crate::logic::model::forest::{DecisionTree, RandomForest};
use crate::logic::model::classifier::Classifier;
use crate::logic::model::LoadedModel;
use crate::logic::pipeline::{InferencePipeline, PipelineOptions};

pub fn layout_names() -> Vec<String> {
    FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect()
}

pub fn mapping(pairs: &[(&str, i64)]) -> BTreeMap<String, i64> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

pub fn target_mapping() -> BTreeMap<String, i64> {
    mapping(&[("Extrovert", 0), ("Introvert", 1)])
}

pub fn yes_no() -> BTreeMap<String, i64> {
    mapping(&[("No", 0), ("Yes", 1)])
}

pub fn thresholds() -> FeatureThresholds {
    FeatureThresholds {
        time_alone_median: 5.0,
        friends_circle_median: 8.0,
    }
}

pub fn tables_with(feature_names: Vec<String>) -> EncodingTables {
    EncodingTables::new(feature_names, target_mapping(), yes_no(), yes_no(), thresholds())
        .expect("fixture tables are valid")
}

pub fn sample_tables() -> EncodingTables {
    tables_with(layout_names())
}

/// Importances sum to 1; top 3 are alone time, drained, social events
pub const SAMPLE_IMPORTANCES: [f64; 11] =
    [0.30, 0.15, 0.05, 0.10, 0.05, 0.05, 0.20, 0.04, 0.03, 0.02, 0.01];

fn stump(feature: i64, threshold: f64, left: [f64; 2], right: [f64; 2]) -> DecisionTree {
    DecisionTree {
        children_left: vec![1, -1, -1],
        children_right: vec![2, -1, -1],
        feature: vec![feature, -2, -2],
        threshold: vec![threshold, -2.0, -2.0],
        value: vec![vec![1.0, 1.0], left.to_vec(), right.to_vec()],
    }
}

/// Tree 1: time alone <= 20. Tree 2: drained <= 0.5.
pub fn sample_forest() -> RandomForest {
    RandomForest {
        model_type: "random_forest".to_string(),
        n_features: FEATURE_LAYOUT.len(),
        classes: vec![0, 1],
        feature_names: Some(layout_names()),
        feature_importances: SAMPLE_IMPORTANCES.to_vec(),
        estimators: vec![
            stump(0, 20.0, [0.9, 0.1], [0.2, 0.8]),
            stump(6, 0.5, [0.8, 0.2], [0.1, 0.9]),
        ],
    }
}

pub fn sample_pipeline() -> InferencePipeline {
    let tables = sample_tables();
    let model = LoadedModel::bind(Box::new(sample_forest()), &tables, "<memory>", None)
        .expect("fixture model binds");
    InferencePipeline::new(tables, model, PipelineOptions::default())
}

pub fn answers(time_alone: u32, drained: &str) -> RawAnswers {
    RawAnswers {
        time_alone,
        social_event_attendance: 2,
        going_outside: 3,
        friends_circle_size: 10,
        post_frequency: 5,
        stage_fear: "No".to_string(),
        drained_after_socializing: drained.to_string(),
    }
}

/// Fixed answer; remembers every row it was asked about
pub struct StubClassifier {
    pub n_features: usize,
    pub classes: Vec<i64>,
    pub class_id: i64,
    pub proba: Vec<f64>,
    pub importances: Vec<f64>,
    pub names: Option<Vec<String>>,
    /// Shared so tests can read it after the stub is boxed
    pub seen: Arc<Mutex<Vec<Vec<f64>>>>,
}

impl StubClassifier {
    pub fn binary(class_id: i64, proba: [f64; 2]) -> Self {
        Self {
            n_features: FEATURE_LAYOUT.len(),
            classes: vec![0, 1],
            class_id,
            proba: proba.to_vec(),
            importances: SAMPLE_IMPORTANCES.to_vec(),
            names: None,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Classifier for StubClassifier {
    fn kind(&self) -> &str {
        "stub"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.names.as_deref()
    }

    fn feature_importances(&self) -> &[f64] {
        &self.importances
    }

    fn predict(&self, row: &[f64]) -> PipelineResult<i64> {
        self.seen.lock().push(row.to_vec());
        Ok(self.class_id)
    }

    fn predict_proba(&self, _row: &[f64]) -> PipelineResult<Vec<f64>> {
        Ok(self.proba.clone())
    }
}
