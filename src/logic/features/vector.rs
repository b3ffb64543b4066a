//! Feature Vector - ordered classifier input
//!
//! A `FeatureRow` holds every derivable value keyed by the canonical layout.
//! `FeatureRow::assemble` then picks values by NAME in the order the
//! metadata declares, so a reordered artifact gets a reordered vector.

use serde::{Deserialize, Serialize};

use super::answers::{EncodedAnswers, RawAnswers};
use super::engineered::EngineeredFeatures;
use super::layout::{compute_layout_hash, feature_index, FEATURE_COUNT};
use crate::logic::error::{PipelineError, PipelineResult};

// ============================================================================
// FEATURE ROW
// ============================================================================

/// All derivable feature values for one request, in FEATURE_LAYOUT order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRow {
    values: [f64; FEATURE_COUNT],
}

impl FeatureRow {
    pub fn new(raw: &RawAnswers, encoded: &EncodedAnswers, engineered: &EngineeredFeatures) -> Self {
        Self {
            values: [
                f64::from(raw.time_alone),
                f64::from(raw.social_event_attendance),
                f64::from(raw.going_outside),
                f64::from(raw.friends_circle_size),
                f64::from(raw.post_frequency),
                encoded.stage_fear as f64,
                encoded.drained_after_socializing as f64,
                engineered.social_ratio,
                engineered.outdoor_social_ratio,
                f64::from(engineered.high_alone_time),
                f64::from(engineered.large_friend_circle),
            ],
        }
    }

    /// Get feature by name
    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        feature_index(name).map(|i| self.values[i])
    }

    /// Build the classifier input in the declared order
    pub fn assemble(&self, feature_names: &[String]) -> PipelineResult<FeatureVector> {
        let values = feature_names
            .iter()
            .map(|name| {
                self.get_by_name(name).ok_or_else(|| {
                    PipelineError::Configuration(format!(
                        "classifier expects feature '{}', which is not derivable",
                        name
                    ))
                })
            })
            .collect::<PipelineResult<Vec<f64>>>()?;

        Ok(FeatureVector {
            layout_hash: compute_layout_hash(feature_names),
            names: feature_names.to_vec(),
            values,
        })
    }
}

// ============================================================================
// FEATURE VECTOR
// ============================================================================

/// Single-row classifier input with the order it was assembled in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// CRC32 of the declared order
    pub layout_hash: u32,
    pub names: Vec<String>,
    pub values: Vec<f64>,
}

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Convert to JSON-serializable format for logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::json!({
            "layout_hash": format!("{:08x}", self.layout_hash),
            "named_values": self.names.iter()
                .zip(self.values.iter())
                .map(|(name, value)| (name.clone(), *value))
                .collect::<std::collections::BTreeMap<_, _>>(),
        })
    }
}
