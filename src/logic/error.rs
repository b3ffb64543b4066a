//! Error handling
//!
//! Two kinds matter to callers: the artifacts or settings are broken (no
//! answer can succeed, the app exits), or this one set of answers failed.

use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Model or metadata artifact missing, unreadable or corrupt
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// Metadata and model disagree (unknown label, unknown feature, shape mismatch)
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Answer outside the bounds of the questionnaire
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Classifier returned a class id missing from the target mapping
    #[error("classifier returned class {0}, which the target mapping does not know")]
    UnknownClass(i64),
}

impl PipelineError {
    /// Broken artifacts or settings abort the application instead of failing one request
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PipelineError::ModelUnavailable(_) | PipelineError::Configuration(_)
        )
    }

    pub(crate) fn unavailable(context: &str, err: impl std::fmt::Display) -> Self {
        PipelineError::ModelUnavailable(format!("{}: {}", context, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broken_setup_is_fatal() {
        assert!(PipelineError::ModelUnavailable("x".into()).is_fatal());
        assert!(PipelineError::Configuration("x".into()).is_fatal());
        assert!(!PipelineError::InvalidInput("x".into()).is_fatal());
        assert!(!PipelineError::UnknownClass(3).is_fatal());
    }

    #[test]
    fn test_display_messages() {
        let err = PipelineError::unavailable("Failed to read model", "No such file");
        assert_eq!(
            err.to_string(),
            "model unavailable: Failed to read model: No such file"
        );
        assert!(PipelineError::UnknownClass(7).to_string().contains("class 7"));
    }
}
