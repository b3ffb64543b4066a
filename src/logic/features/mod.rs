//! Features Module - Feature Engineering
//!
//! Raw answers → encoded answers → engineered signals → ordered vector.
//! Nothing here touches the classifier.

pub mod answers;
pub mod engineered;
pub mod layout;
pub mod vector;

#[cfg(test)]
mod tests;

// Re-export common types
pub use answers::{EncodedAnswers, NumericQuestion, RawAnswers, NUMERIC_QUESTIONS};
pub use engineered::EngineeredFeatures;
pub use layout::LayoutInfo;
pub use vector::{FeatureRow, FeatureVector};
