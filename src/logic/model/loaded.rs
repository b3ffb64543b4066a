//! Loaded Model - a classifier bound to the metadata it was trained with
//!
//! Binding is where mismatched artifact pairs are caught: column count,
//! column names and order, importance length. The importance ranking is
//! computed here once and reused by every prediction.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::classifier::Classifier;
use super::importance::{rank_importances, FeatureImportance};
use crate::logic::encoding::EncodingTables;
use crate::logic::error::{PipelineError, PipelineResult};

/// Model metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_path: String,
    pub model_type: String,
    pub n_features: usize,
    pub classes: Vec<i64>,
    pub layout_hash: u32,
    pub sha256: Option<String>,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

pub struct LoadedModel {
    classifier: Box<dyn Classifier>,
    ranked: Vec<FeatureImportance>,
    metadata: ModelMetadata,
}

impl std::fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModel")
            .field("metadata", &self.metadata)
            .field("ranked", &self.ranked)
            .finish()
    }
}

impl LoadedModel {
    pub fn bind(
        classifier: Box<dyn Classifier>,
        tables: &EncodingTables,
        model_path: &str,
        sha256: Option<String>,
    ) -> PipelineResult<Self> {
        let names = tables.feature_names();

        if classifier.n_features() != names.len() {
            return Err(PipelineError::Configuration(format!(
                "model was fit on {} features, metadata declares {}",
                classifier.n_features(),
                names.len()
            )));
        }

        if let Some(model_names) = classifier.feature_names() {
            if model_names != names {
                return Err(PipelineError::Configuration(format!(
                    "model feature order {:?} does not match metadata order {:?}",
                    model_names, names
                )));
            }
        }

        let importances = classifier.feature_importances();
        if importances.len() != names.len() {
            return Err(PipelineError::Configuration(format!(
                "model has {} feature importances for {} features",
                importances.len(),
                names.len()
            )));
        }
        if importances.iter().any(|w| !w.is_finite()) {
            return Err(PipelineError::Configuration(
                "model feature importances must be finite".to_string(),
            ));
        }

        let classes = classifier.classes().to_vec();
        if classes.is_empty() {
            return Err(PipelineError::Configuration("model declares no classes".to_string()));
        }
        if classes.iter().collect::<BTreeSet<_>>().len() != classes.len() {
            return Err(PipelineError::Configuration(format!(
                "model declares duplicate classes {:?}",
                classes
            )));
        }
        for class in &classes {
            if tables.target().decode(*class).is_none() {
                log::warn!("Model class {} has no label in the target mapping", class);
            }
        }

        let ranked = rank_importances(names, importances);

        let metadata = ModelMetadata {
            model_path: model_path.to_string(),
            model_type: classifier.kind().to_string(),
            n_features: classifier.n_features(),
            classes,
            layout_hash: tables.layout().hash,
            sha256,
            loaded_at: chrono::Utc::now(),
        };

        log::info!(
            "Model bound: {} ({} features, layout {:08x})",
            metadata.model_type,
            metadata.n_features,
            metadata.layout_hash
        );

        Ok(Self {
            classifier,
            ranked,
            metadata,
        })
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    /// All features, most important first
    pub fn ranked_importances(&self) -> &[FeatureImportance] {
        &self.ranked
    }

    /// Top `k` features (fewer if the model has fewer)
    pub fn top_factors(&self, k: usize) -> &[FeatureImportance] {
        &self.ranked[..k.min(self.ranked.len())]
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}
