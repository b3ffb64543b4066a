//! Encoding Tables - categorical lookups loaded from preprocessing metadata
//!
//! Built once at startup, read-only afterwards. Each mapping keeps its
//! inverse next to it so decoding a class id is a lookup, not a rebuild.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::logic::error::{PipelineError, PipelineResult};
use crate::logic::features::layout::{validate_declared_layout, LayoutInfo};

// ============================================================================
// LABEL CODEC
// ============================================================================

/// Bidirectional label <-> code mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelCodec {
    name: String,
    forward: BTreeMap<String, i64>,
    inverse: BTreeMap<i64, String>,
}

impl LabelCodec {
    /// Build from a label -> code mapping. Two labels sharing a code is rejected,
    /// since the inverse would silently drop one of them.
    pub fn new(name: &str, mapping: BTreeMap<String, i64>) -> PipelineResult<Self> {
        if mapping.is_empty() {
            return Err(PipelineError::Configuration(format!(
                "{} mapping is empty",
                name
            )));
        }

        let mut inverse = BTreeMap::new();
        for (label, &code) in &mapping {
            if let Some(existing) = inverse.insert(code, label.clone()) {
                return Err(PipelineError::Configuration(format!(
                    "{} mapping assigns code {} to both '{}' and '{}'",
                    name, code, existing, label
                )));
            }
        }

        Ok(Self {
            name: name.to_string(),
            forward: mapping,
            inverse,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Label -> code
    pub fn encode(&self, label: &str) -> Option<i64> {
        self.forward.get(label).copied()
    }

    /// Label -> code, unknown label is a configuration error
    pub fn try_encode(&self, label: &str) -> PipelineResult<i64> {
        self.encode(label).ok_or_else(|| {
            PipelineError::Configuration(format!(
                "'{}' is not a known {} option (expected one of: {})",
                label,
                self.name,
                self.labels().collect::<Vec<_>>().join(", ")
            ))
        })
    }

    /// Code -> label
    pub fn decode(&self, code: i64) -> Option<&str> {
        self.inverse.get(&code).map(String::as_str)
    }

    /// Labels ordered by code, used to build the selectable options
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.inverse.values().map(String::as_str)
    }

}

// ============================================================================
// THRESHOLDS
// ============================================================================

/// Medians used for the binary engineered features
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureThresholds {
    pub time_alone_median: f64,
    pub friends_circle_median: f64,
}

// ============================================================================
// ENCODING TABLES
// ============================================================================

/// Immutable preprocessing configuration shared by every prediction
#[derive(Debug, Clone)]
pub struct EncodingTables {
    pub(crate) feature_names: Vec<String>,
    pub(crate) target: LabelCodec,
    pub(crate) stage_fear: LabelCodec,
    pub(crate) drained: LabelCodec,
    pub(crate) thresholds: FeatureThresholds,
    pub(crate) layout: LayoutInfo,
}

impl EncodingTables {
    pub fn new(
        feature_names: Vec<String>,
        target_mapping: BTreeMap<String, i64>,
        stage_fear_mapping: BTreeMap<String, i64>,
        drained_mapping: BTreeMap<String, i64>,
        thresholds: FeatureThresholds,
    ) -> PipelineResult<Self> {
        validate_declared_layout(&feature_names)?;

        if !thresholds.time_alone_median.is_finite() || !thresholds.friends_circle_median.is_finite() {
            return Err(PipelineError::Configuration(format!(
                "feature engineering thresholds must be finite, got {:?}",
                thresholds
            )));
        }

        let layout = LayoutInfo::from_names(&feature_names);

        Ok(Self {
            feature_names,
            target: LabelCodec::new("target", target_mapping)?,
            stage_fear: LabelCodec::new("stage_fear", stage_fear_mapping)?,
            drained: LabelCodec::new("drained_after_socializing", drained_mapping)?,
            thresholds,
            layout,
        })
    }

    /// Classifier column order
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn target(&self) -> &LabelCodec {
        &self.target
    }

    pub fn stage_fear(&self) -> &LabelCodec {
        &self.stage_fear
    }

    pub fn drained(&self) -> &LabelCodec {
        &self.drained
    }

    pub fn thresholds(&self) -> &FeatureThresholds {
        &self.thresholds
    }

    pub fn layout(&self) -> &LayoutInfo {
        &self.layout
    }
}
