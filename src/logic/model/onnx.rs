//! ONNX Backend - ONNX Runtime Integration
//!
//! Expects a classifier export with two outputs: the predicted label
//! (int64, shape [1]) and class probabilities (float, shape [1, n_classes]).
//! Classes and importances live in the metadata's `model_properties`.

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;

use super::artifact::ModelProperties;
use super::classifier::Classifier;
use crate::logic::error::{PipelineError, PipelineResult};

const DEFAULT_LABEL_OUTPUT: &str = "label";
const DEFAULT_PROBABILITY_OUTPUT: &str = "probabilities";

pub struct OnnxClassifier {
    /// Running a session needs exclusive access
    session: Mutex<Session>,
    n_features: usize,
    classes: Vec<i64>,
    feature_importances: Vec<f64>,
    label_output: String,
    probability_output: String,
}

impl OnnxClassifier {
    /// Load ONNX model từ bytes
    pub fn from_bytes(
        model_bytes: &[u8],
        properties: &ModelProperties,
        n_features: usize,
    ) -> PipelineResult<Self> {
        log::info!("Loading ONNX model from memory ({} bytes)", model_bytes.len());

        let session = Session::builder()
            .map_err(|e| PipelineError::unavailable("Session builder error", e))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| PipelineError::unavailable("Optimization error", e))?
            .commit_from_memory(model_bytes)
            .map_err(|e| PipelineError::unavailable("Load from memory error", e))?;

        let label_output = properties
            .label_output
            .clone()
            .unwrap_or_else(|| DEFAULT_LABEL_OUTPUT.to_string());
        let probability_output = properties
            .probability_output
            .clone()
            .unwrap_or_else(|| DEFAULT_PROBABILITY_OUTPUT.to_string());

        for wanted in [&label_output, &probability_output] {
            if !session.outputs.iter().any(|o| &o.name == wanted) {
                return Err(PipelineError::ModelUnavailable(format!(
                    "ONNX model has no output named '{}'",
                    wanted
                )));
            }
        }

        log::info!("ONNX model loaded successfully");

        Ok(Self {
            session: Mutex::new(session),
            n_features,
            classes: properties.classes.clone(),
            feature_importances: properties.feature_importances.clone(),
            label_output,
            probability_output,
        })
    }

    /// One session run yields both label and probabilities
    fn run(&self, row: &[f64]) -> PipelineResult<(i64, Vec<f64>)> {
        if row.len() != self.n_features {
            return Err(PipelineError::Configuration(format!(
                "model expects {} features, got {}",
                self.n_features,
                row.len()
            )));
        }

        let input: Vec<f32> = row.iter().map(|v| *v as f32).collect();
        let input_array = Array2::<f32>::from_shape_vec((1, row.len()), input)
            .map_err(|e| PipelineError::Configuration(format!("Array error: {}", e)))?;
        let input_tensor = Value::from_array(input_array)
            .map_err(|e| PipelineError::Configuration(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| PipelineError::Configuration(format!("Inference failed: {}", e)))?;

        let label = outputs
            .get(&self.label_output)
            .ok_or_else(|| PipelineError::Configuration("No label output".to_string()))?
            .try_extract_tensor::<i64>()
            .map_err(|e| PipelineError::Configuration(format!("Extract error: {}", e)))?
            .1
            .first()
            .copied()
            .ok_or_else(|| PipelineError::Configuration("Empty label output".to_string()))?;

        let probabilities: Vec<f64> = outputs
            .get(&self.probability_output)
            .ok_or_else(|| PipelineError::Configuration("No probability output".to_string()))?
            .try_extract_tensor::<f32>()
            .map_err(|e| PipelineError::Configuration(format!("Extract error: {}", e)))?
            .1
            .iter()
            .map(|p| f64::from(*p))
            .collect();

        if probabilities.len() != self.classes.len() {
            return Err(PipelineError::Configuration(format!(
                "ONNX model returned {} probabilities for {} classes",
                probabilities.len(),
                self.classes.len()
            )));
        }

        Ok((label, probabilities))
    }
}

impl Classifier for OnnxClassifier {
    fn kind(&self) -> &str {
        "onnx"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }

    fn predict(&self, row: &[f64]) -> PipelineResult<i64> {
        self.run(row).map(|(label, _)| label)
    }

    fn predict_proba(&self, row: &[f64]) -> PipelineResult<Vec<f64>> {
        self.run(row).map(|(_, probabilities)| probabilities)
    }
}
