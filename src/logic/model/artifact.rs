//! Artifact Loading - model file + preprocessing metadata
//!
//! Both files are read once at startup. Anything missing, unreadable or
//! corrupt is `ModelUnavailable`; the caller must not start accepting input.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::card::ModelCard;
use super::classifier::Classifier;
use super::forest::RandomForest;
use super::loaded::LoadedModel;
use crate::logic::encoding::{EncodingTables, FeatureThresholds};
use crate::logic::error::{PipelineError, PipelineResult};

// ============================================================================
// METADATA FORMAT
// ============================================================================

/// Preprocessing metadata as written next to the trained model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessingInfo {
    pub feature_names: Vec<String>,
    pub target_mapping: BTreeMap<String, i64>,
    pub stage_fear_mapping: BTreeMap<String, i64>,
    pub drained_mapping: BTreeMap<String, i64>,
    pub feature_engineering_params: FeatureThresholds,
    #[serde(default)]
    pub model_card: Option<ModelCard>,
    /// Needed for backends whose artifact doesn't carry classes/importances (ONNX)
    #[serde(default)]
    pub model_properties: Option<ModelProperties>,
    /// Expected SHA-256 of the model file (hex)
    #[serde(default)]
    pub model_sha256: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelProperties {
    pub classes: Vec<i64>,
    pub feature_importances: Vec<f64>,
    #[serde(default)]
    pub label_output: Option<String>,
    #[serde(default)]
    pub probability_output: Option<String>,
}

impl PreprocessingInfo {
    pub fn build_tables(&self) -> PipelineResult<EncodingTables> {
        EncodingTables::new(
            self.feature_names.clone(),
            self.target_mapping.clone(),
            self.stage_fear_mapping.clone(),
            self.drained_mapping.clone(),
            self.feature_engineering_params,
        )
    }
}

/// Load metadata từ JSON file
pub fn read_metadata(path: &Path) -> PipelineResult<PreprocessingInfo> {
    log::info!("Loading preprocessing metadata from: {}", path.display());

    if !path.exists() {
        return Err(PipelineError::ModelUnavailable(format!(
            "Metadata not found: {}",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| PipelineError::unavailable("Failed to read metadata", e))?;

    serde_json::from_str(&content)
        .map_err(|e| PipelineError::unavailable("Failed to parse metadata", e))
}

// ============================================================================
// MODEL FILE
// ============================================================================

/// Model encodings this build can read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    Forest,
    Onnx,
}

impl ModelFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("onnx") => ModelFormat::Onnx,
            _ => ModelFormat::Forest,
        }
    }
}

/// SHA-256 of the model bytes (hex, lowercase)
pub fn compute_checksum(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Compare against the expected digest; case-insensitive hex
pub fn verify_checksum(bytes: &[u8], expected: &str) -> PipelineResult<String> {
    let actual = compute_checksum(bytes);
    if !actual.eq_ignore_ascii_case(expected.trim()) {
        return Err(PipelineError::ModelUnavailable(format!(
            "Model checksum mismatch: expected {}, got {}",
            expected.trim(),
            actual
        )));
    }
    Ok(actual)
}

fn read_model_bytes(path: &Path) -> PipelineResult<Vec<u8>> {
    log::info!("Loading model from: {}", path.display());

    if !path.exists() {
        return Err(PipelineError::ModelUnavailable(format!(
            "Model not found: {}",
            path.display()
        )));
    }

    std::fs::read(path).map_err(|e| PipelineError::unavailable("Failed to read model", e))
}

fn build_classifier(
    format: ModelFormat,
    bytes: &[u8],
    info: &PreprocessingInfo,
) -> PipelineResult<Box<dyn Classifier>> {
    match format {
        ModelFormat::Forest => {
            let content = std::str::from_utf8(bytes)
                .map_err(|e| PipelineError::unavailable("Model is not UTF-8 JSON", e))?;
            Ok(Box::new(RandomForest::from_json(content)?))
        }
        ModelFormat::Onnx => build_onnx(bytes, info),
    }
}

#[cfg(feature = "onnx")]
fn build_onnx(bytes: &[u8], info: &PreprocessingInfo) -> PipelineResult<Box<dyn Classifier>> {
    let properties = info.model_properties.as_ref().ok_or_else(|| {
        PipelineError::ModelUnavailable(
            "ONNX model needs `model_properties` (classes, feature_importances) in metadata"
                .to_string(),
        )
    })?;
    let classifier =
        super::onnx::OnnxClassifier::from_bytes(bytes, properties, info.feature_names.len())?;
    Ok(Box::new(classifier))
}

#[cfg(not(feature = "onnx"))]
fn build_onnx(_bytes: &[u8], _info: &PreprocessingInfo) -> PipelineResult<Box<dyn Classifier>> {
    Err(PipelineError::ModelUnavailable(
        "ONNX model given but this build has no ONNX support (enable the `onnx` feature)"
            .to_string(),
    ))
}

// ============================================================================
// FULL LOAD
// ============================================================================

/// Everything produced by a successful startup load
#[derive(Debug)]
pub struct LoadedArtifacts {
    pub tables: EncodingTables,
    pub model: LoadedModel,
    pub card: Option<ModelCard>,
}

/// Read metadata, then the model, verify and bind them
pub fn load_artifacts(model_path: &Path, metadata_path: &Path) -> PipelineResult<LoadedArtifacts> {
    let info = read_metadata(metadata_path)?;
    let tables = info.build_tables()?;

    let bytes = read_model_bytes(model_path)?;
    let checksum = match &info.model_sha256 {
        Some(expected) => {
            let digest = verify_checksum(&bytes, expected)?;
            log::info!("Model checksum verified ({})", &digest[..12]);
            Some(digest)
        }
        None => {
            log::debug!("No model checksum in metadata, skipping verification");
            None
        }
    };

    let classifier = build_classifier(ModelFormat::from_path(model_path), &bytes, &info)?;
    let model = LoadedModel::bind(
        classifier,
        &tables,
        &model_path.display().to_string(),
        checksum,
    )?;

    Ok(LoadedArtifacts {
        tables,
        model,
        card: info.model_card,
    })
}

// ============================================================================
// PATH RESOLUTION
// ============================================================================

/// First existing candidate: working directory, then the per-user data dir.
/// Falls back to the working-directory path so the error names a real location.
pub fn locate_artifact(file_name: &str, data_dir_name: &str) -> PathBuf {
    let local = PathBuf::from(file_name);
    if local.exists() {
        return local;
    }

    if let Some(data_dir) = dirs::data_dir() {
        let candidate = data_dir.join(data_dir_name).join(file_name);
        if candidate.exists() {
            return candidate;
        }
    }

    local
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_known_value() {
        assert_eq!(
            compute_checksum(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_verify_checksum_case_insensitive() {
        let digest = compute_checksum(b"model");
        assert!(verify_checksum(b"model", &digest.to_uppercase()).is_ok());
        assert!(matches!(
            verify_checksum(b"other", &digest),
            Err(PipelineError::ModelUnavailable(_))
        ));
    }

    #[test]
    fn test_model_format_from_extension() {
        assert_eq!(ModelFormat::from_path(Path::new("m.onnx")), ModelFormat::Onnx);
        assert_eq!(ModelFormat::from_path(Path::new("m.ONNX")), ModelFormat::Onnx);
        assert_eq!(ModelFormat::from_path(Path::new("m.json")), ModelFormat::Forest);
        assert_eq!(ModelFormat::from_path(Path::new("model")), ModelFormat::Forest);
    }

    #[test]
    fn test_missing_metadata_is_model_unavailable() {
        let err = read_metadata(Path::new("/nonexistent/preprocessing_info.json")).unwrap_err();
        assert!(err.is_fatal());
    }
}
