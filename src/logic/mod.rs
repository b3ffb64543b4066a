//! Logic Module - Business Logic & Engines
//!
//! ## Layout
//! - `features/` - answers, engineered signals, ordered vector
//! - `model/` - classifier backends, artifact loading
//! - `pipeline/` - one prediction end to end
//! - `explain/` - report content derived from a prediction

pub mod config;
pub mod encoding;
pub mod error;
pub mod explain;
pub mod features;
pub mod model;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod test_support;
