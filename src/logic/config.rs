//! Configuration module
//!
//! Precedence, lowest first: built-in defaults, `.env` / environment,
//! JSON config file, command-line flags.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{self, DATA_DIR_NAME, DEFAULT_METADATA_FILE, DEFAULT_MODEL_FILE};
use crate::logic::error::{PipelineError, PipelineResult};
use crate::logic::model::artifact::locate_artifact;
use crate::logic::pipeline::{PipelineOptions, UnknownClassPolicy};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Model artifact; searched for when unset
    pub model_path: Option<PathBuf>,

    /// Preprocessing metadata; searched for when unset
    pub metadata_path: Option<PathBuf>,

    /// "Average person" profile used by the comparison chart
    pub reference_averages: [f64; 4],

    pub unknown_class_policy: UnknownClassPolicy,

    pub top_factors: usize,
}

/// File form: every field optional so a file can override just one setting
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    model_path: Option<PathBuf>,
    metadata_path: Option<PathBuf>,
    reference_averages: Option<[f64; 4]>,
    unknown_class_policy: Option<UnknownClassPolicy>,
    top_factors: Option<usize>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            metadata_path: None,
            reference_averages: constants::DEFAULT_REFERENCE_AVERAGES,
            unknown_class_policy: UnknownClassPolicy::default(),
            top_factors: constants::DEFAULT_TOP_FACTORS,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables (after `.env`, if any)
    pub fn from_env() -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("Loaded environment from {}", path.display());
        }

        let mut config = Self::default();

        if let Some(path) = constants::get_model_path() {
            config.model_path = Some(PathBuf::from(path));
        }
        if let Some(path) = constants::get_metadata_path() {
            config.metadata_path = Some(PathBuf::from(path));
        }
        if let Some(values) = constants::get_reference_averages() {
            config.reference_averages = values;
        }
        if let Some(raw) = constants::get_unknown_class_policy() {
            match raw.parse() {
                Ok(policy) => config.unknown_class_policy = policy,
                Err(e) => log::warn!("Ignoring PERSONA_UNKNOWN_CLASS_POLICY: {}", e),
            }
        }
        if let Some(n) = constants::get_top_factors() {
            config.top_factors = n;
        }

        config
    }

    /// Overlay a JSON config file
    pub fn merge_file(mut self, path: &Path) -> PipelineResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::Configuration(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        let file: ConfigFile = serde_json::from_str(&content).map_err(|e| {
            PipelineError::Configuration(format!("Failed to parse config {}: {}", path.display(), e))
        })?;

        if file.model_path.is_some() {
            self.model_path = file.model_path;
        }
        if file.metadata_path.is_some() {
            self.metadata_path = file.metadata_path;
        }
        if let Some(values) = file.reference_averages {
            self.reference_averages = values;
        }
        if let Some(policy) = file.unknown_class_policy {
            self.unknown_class_policy = policy;
        }
        if let Some(n) = file.top_factors {
            self.top_factors = n;
        }

        Ok(self)
    }

    pub fn validate(&self) -> PipelineResult<()> {
        if self.reference_averages.iter().any(|v| !(0.0..=1.0).contains(v)) {
            return Err(PipelineError::Configuration(format!(
                "reference averages must be within 0-1, got {:?}",
                self.reference_averages
            )));
        }
        if self.top_factors == 0 {
            return Err(PipelineError::Configuration(
                "top_factors must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn resolved_model_path(&self) -> PathBuf {
        self.model_path
            .clone()
            .unwrap_or_else(|| locate_artifact(DEFAULT_MODEL_FILE, DATA_DIR_NAME))
    }

    pub fn resolved_metadata_path(&self) -> PathBuf {
        self.metadata_path
            .clone()
            .unwrap_or_else(|| locate_artifact(DEFAULT_METADATA_FILE, DATA_DIR_NAME))
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            unknown_class_policy: self.unknown_class_policy,
            top_factors: self.top_factors,
        }
    }

    /// Reference averages are hard-coded guesses unless someone supplied real ones
    pub fn uses_default_reference(&self) -> bool {
        self.reference_averages == constants::DEFAULT_REFERENCE_AVERAGES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.uses_default_reference());
        assert_eq!(config.pipeline_options(), PipelineOptions::default());
    }

    #[test]
    fn test_merge_file_overrides_only_given_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("persona.json");
        std::fs::write(
            &path,
            r#"{ "unknown_class_policy": "fail", "reference_averages": [0.4, 0.4, 0.3, 0.2] }"#,
        )
        .unwrap();

        let config = AppConfig::default().merge_file(&path).unwrap();
        assert_eq!(config.unknown_class_policy, UnknownClassPolicy::Fail);
        assert_eq!(config.reference_averages, [0.4, 0.4, 0.3, 0.2]);
        assert_eq!(config.top_factors, 3);
        assert!(!config.uses_default_reference());
    }

    #[test]
    fn test_merge_file_rejects_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("persona.json");
        std::fs::write(&path, r#"{ "colour": "blue" }"#).unwrap();

        assert!(AppConfig::default().merge_file(&path).is_err());
    }

    #[test]
    fn test_validate_bounds() {
        let config = AppConfig {
            reference_averages: [0.5, 1.2, 0.5, 0.5],
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            top_factors: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_explicit_paths_win() {
        let config = AppConfig {
            model_path: Some(PathBuf::from("/models/a.json")),
            ..Default::default()
        };
        assert_eq!(config.resolved_model_path(), PathBuf::from("/models/a.json"));
    }
}
