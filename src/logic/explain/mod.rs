//! Explain Module - turns a prediction into what the user reads
//!
//! No model access here: everything comes from `PredictionResult`.

pub mod engine;
pub mod types;

pub use engine::{explain, readable_name};
pub use types::Explanation;
