//! Inference Pipeline
//!
//! answers → encode → engineer → ordered vector → classifier → labeled result.
//!
//! Pure for fixed inputs: the same answers against the same loaded artifacts
//! always produce the same result. Nothing here mutates shared state, so one
//! `InferencePipeline` can serve any number of callers.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_TOP_FACTORS, UNKNOWN_LABEL};
use crate::logic::encoding::EncodingTables;
use crate::logic::error::{PipelineError, PipelineResult};
use crate::logic::features::{
    EncodedAnswers, EngineeredFeatures, FeatureRow, FeatureVector, RawAnswers,
};
use crate::logic::model::{load_artifacts, FeatureImportance, LoadedModel, ModelCard};


// ============================================================================
// OPTIONS
// ============================================================================

/// What to do when the classifier returns a class id the target mapping lacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownClassPolicy {
    /// Report the "Unknown" label and keep going
    #[default]
    Sentinel,
    /// Treat it as a model/metadata mismatch
    Fail,
}

impl FromStr for UnknownClassPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sentinel" => Ok(UnknownClassPolicy::Sentinel),
            "fail" => Ok(UnknownClassPolicy::Fail),
            other => Err(format!("unknown class policy '{}' (expected sentinel or fail)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOptions {
    pub unknown_class_policy: UnknownClassPolicy,
    pub top_factors: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            unknown_class_policy: UnknownClassPolicy::default(),
            top_factors: DEFAULT_TOP_FACTORS,
        }
    }
}

// ============================================================================
// RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassProbability {
    pub class_id: i64,
    pub label: Option<String>,
    pub probability: f64,
}

/// Prediction output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub label: String,
    pub class_id: i64,
    /// False when `label` is the sentinel
    pub label_known: bool,
    /// Probability of the predicted class, 0.0 - 1.0
    pub confidence: f64,
    pub probabilities: Vec<ClassProbability>,
    /// Static importances, most important first
    pub top_factors: Vec<FeatureImportance>,
    pub answers: RawAnswers,
    pub encoded: EncodedAnswers,
    pub engineered: EngineeredFeatures,
    pub feature_vector: FeatureVector,
}

impl PredictionResult {
    pub fn confidence_percent(&self) -> f64 {
        self.confidence * 100.0
    }
}

// ============================================================================
// PREDICTION
// ============================================================================

/// Categorical answers → codes. The options offered to the user come from the
/// same tables, but the lookup is still checked.
pub fn encode_answers(raw: &RawAnswers, tables: &EncodingTables) -> PipelineResult<EncodedAnswers> {
    Ok(EncodedAnswers {
        stage_fear: tables.stage_fear().try_encode(&raw.stage_fear)?,
        drained_after_socializing: tables.drained().try_encode(&raw.drained_after_socializing)?,
    })
}

/// Run one prediction
pub fn predict(
    raw: &RawAnswers,
    tables: &EncodingTables,
    model: &LoadedModel,
    options: &PipelineOptions,
) -> PipelineResult<PredictionResult> {
    let encoded = encode_answers(raw, tables)?;
    let engineered = EngineeredFeatures::derive(raw, tables.thresholds());
    let row = FeatureRow::new(raw, &encoded, &engineered);
    let vector = row.assemble(tables.feature_names())?;

    log::debug!("Feature vector: {}", vector.to_log_entry());

    let classifier = model.classifier();
    let class_id = classifier.predict(vector.as_slice())?;
    let proba = classifier.predict_proba(vector.as_slice())?;
    let classes = classifier.classes();

    if proba.len() != classes.len() {
        return Err(PipelineError::Configuration(format!(
            "classifier returned {} probabilities for {} classes",
            proba.len(),
            classes.len()
        )));
    }

    let (label, label_known) = match tables.target().decode(class_id) {
        Some(label) => (label.to_string(), true),
        None => match options.unknown_class_policy {
            UnknownClassPolicy::Sentinel => {
                log::warn!("Class {} missing from target mapping, reporting '{}'", class_id, UNKNOWN_LABEL);
                (UNKNOWN_LABEL.to_string(), false)
            }
            UnknownClassPolicy::Fail => return Err(PipelineError::UnknownClass(class_id)),
        },
    };

    let confidence = class_probability(class_id, classes, &proba);

    let probabilities = classes
        .iter()
        .zip(proba.iter())
        .map(|(&id, &probability)| ClassProbability {
            class_id: id,
            label: tables.target().decode(id).map(str::to_string),
            probability,
        })
        .collect();

    log::info!("Prediction: {} ({:.0}%)", label, confidence * 100.0);

    Ok(PredictionResult {
        label,
        class_id,
        label_known,
        confidence,
        probabilities,
        top_factors: model.top_factors(options.top_factors).to_vec(),
        answers: raw.clone(),
        encoded,
        engineered,
        feature_vector: vector,
    })
}

/// Probability mass of `class_id`. Looked up through the class list; a class
/// outside it falls back to positional indexing, then to zero.
fn class_probability(class_id: i64, classes: &[i64], proba: &[f64]) -> f64 {
    let index = classes
        .iter()
        .position(|&c| c == class_id)
        .or_else(|| usize::try_from(class_id).ok().filter(|&i| i < proba.len()));

    index
        .and_then(|i| proba.get(i).copied())
        .filter(|p| p.is_finite())
        .map(|p| p.clamp(0.0, 1.0))
        .unwrap_or(0.0)
}

// ============================================================================
// INFERENCE PIPELINE
// ============================================================================

/// Process-wide immutable state: tables + bound model, loaded once
#[derive(Debug)]
pub struct InferencePipeline {
    tables: EncodingTables,
    model: LoadedModel,
    card: Option<ModelCard>,
    options: PipelineOptions,
}

impl InferencePipeline {
    #[cfg(test)]
    pub fn new(tables: EncodingTables, model: LoadedModel, options: PipelineOptions) -> Self {
        Self {
            tables,
            model,
            card: None,
            options,
        }
    }

    /// Load both artifacts. Any error here means the app must not start.
    pub fn load(model_path: &Path, metadata_path: &Path, options: PipelineOptions) -> PipelineResult<Self> {
        let artifacts = load_artifacts(model_path, metadata_path)?;

        log::info!(
            "Pipeline ready: {} features, {} classes, top {} factors",
            artifacts.tables.feature_names().len(),
            artifacts.model.metadata().classes.len(),
            options.top_factors
        );

        Ok(Self {
            tables: artifacts.tables,
            model: artifacts.model,
            card: artifacts.card,
            options,
        })
    }

    pub fn predict(&self, raw: &RawAnswers) -> PipelineResult<PredictionResult> {
        predict(raw, &self.tables, &self.model, &self.options)
    }

    pub fn tables(&self) -> &EncodingTables {
        &self.tables
    }

    pub fn model(&self) -> &LoadedModel {
        &self.model
    }

    pub fn card(&self) -> Option<&ModelCard> {
        self.card.as_ref()
    }
}
