//! Classifier Trait
//!
//! The pipeline only needs predict, predict_proba and the static importances.
//! Backends (JSON forest, ONNX) implement this; tests plug in stubs.

use crate::logic::error::PipelineResult;

pub trait Classifier: Send + Sync {
    /// Backend name for logs and `info` ("random_forest", "onnx", ...)
    fn kind(&self) -> &str;

    /// Number of input columns the model was fit on
    fn n_features(&self) -> usize;

    /// Class ids, aligned with `predict_proba` output
    fn classes(&self) -> &[i64];

    /// Column names the model was fit on, when the artifact records them
    fn feature_names(&self) -> Option<&[String]> {
        None
    }

    /// Static per-feature weights, aligned with the input columns
    fn feature_importances(&self) -> &[f64];

    /// Predicted class id for one row
    fn predict(&self, row: &[f64]) -> PipelineResult<i64>;

    /// Probability per class (same order as `classes`) for one row
    fn predict_proba(&self, row: &[f64]) -> PipelineResult<Vec<f64>>;
}
