//! Feature Layout - Centralized Feature Definition
//!
//! **This file controls which features the pipeline can derive.**
//!
//! The classifier's own column order comes from the preprocessing metadata,
//! never from this list. This list only answers "can we compute it?".
//!
//! ## Rules:
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Rename feature → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use crate::logic::error::{PipelineError, PipelineResult};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current derivable-feature set version
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT
// ============================================================================

/// Every feature this pipeline knows how to produce, in training column order
pub const FEATURE_LAYOUT: &[&str] = &[
    // === Raw answers (0-6) ===
    "Time_spent_Alone",          // 0: hours/week
    "Social_event_attendance",   // 1: events/month
    "Going_outside",             // 2: days/week
    "Friends_circle_size",       // 3: close friends
    "Post_frequency",            // 4: posts/week
    "Stage_fear",                // 5: encoded 0/1
    "Drained_after_socializing", // 6: encoded 0/1

    // === Engineered (7-10) ===
    "Social_ratio",              // 7: events / (alone + 1)
    "Outdoor_social_ratio",      // 8: outside / (events + 1)
    "High_alone_time",           // 9: alone > median
    "Large_friend_circle",       // 10: friends > median
];

/// Total number of derivable features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 11;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 over a feature order. Two artifacts with the same order share a hash.
pub fn compute_layout_hash<S: AsRef<str>>(names: &[S]) -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[FEATURE_VERSION]);

    for name in names {
        hasher.update(name.as_ref().as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Declared layout as loaded from metadata, for logging and `info`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn from_names(names: &[String]) -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: compute_layout_hash(names),
            feature_count: names.len(),
            feature_names: names.to_vec(),
        }
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Check a declared feature order: non-empty, no duplicates, every name derivable
pub fn validate_declared_layout(names: &[String]) -> PipelineResult<()> {
    if names.is_empty() {
        return Err(PipelineError::Configuration(
            "feature name list is empty".to_string(),
        ));
    }

    for (i, name) in names.iter().enumerate() {
        if feature_index(name).is_none() {
            return Err(PipelineError::Configuration(format!(
                "feature '{}' at position {} cannot be derived from the questionnaire",
                name, i
            )));
        }
        if names[..i].contains(name) {
            return Err(PipelineError::Configuration(format!(
                "feature '{}' is declared more than once",
                name
            )));
        }
    }

    Ok(())
}

// ============================================================================
// FEATURE INDEX LOOKUP
// ============================================================================

/// Get feature index by name (O(n) but features are few)
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

// ============================================================================
// TESTS
// ============================================================================
