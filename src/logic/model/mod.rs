//! Model Module - classifier backends and artifact loading
//!
//! Dễ dàng swap model: the pipeline only sees the `Classifier` trait.

pub mod artifact;
pub mod card;
pub mod classifier;
pub mod forest;
pub mod importance;
pub mod loaded;
#[cfg(feature = "onnx")]
pub mod onnx;

// Re-export common types
pub use artifact::load_artifacts;
pub use card::ModelCard;
pub use importance::FeatureImportance;
pub use loaded::{LoadedModel, ModelMetadata};
