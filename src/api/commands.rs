//! Commands - API cho CLI frontend
//!
//! Each command takes the loaded pipeline and returns a serializable
//! response, or a display-ready error string.

use serde::{Deserialize, Serialize};

use crate::logic::config::AppConfig;
use crate::logic::explain::{explain, Explanation};
use crate::logic::features::{LayoutInfo, NumericQuestion, RawAnswers, NUMERIC_QUESTIONS};
use crate::logic::features::answers::{DRAINED_PROMPT, STAGE_FEAR_PROMPT};
use crate::logic::model::{FeatureImportance, ModelCard, ModelMetadata};
use crate::logic::pipeline::{InferencePipeline, PredictionResult};

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Everything the result page needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub result: PredictionResult,
    pub explanation: Explanation,
    pub generated_at: String,
}

/// Model & data facts for the `info` command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model: ModelMetadata,
    pub layout: LayoutInfo,
    pub card: Option<ModelCard>,
    pub ranked_importances: Vec<FeatureImportance>,
    pub reference_averages: [f64; 4],
    /// True while the reference profile is the unvalidated built-in one
    pub reference_is_default: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericControl {
    pub key: String,
    pub prompt: String,
    pub help: Option<String>,
    pub min: u32,
    pub max: u32,
    pub default: u32,
}

impl From<&NumericQuestion> for NumericControl {
    fn from(q: &NumericQuestion) -> Self {
        Self {
            key: q.key.to_string(),
            prompt: q.prompt.to_string(),
            help: q.help.map(str::to_string),
            min: q.min,
            max: q.max,
            default: q.default,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceControl {
    pub key: String,
    pub prompt: String,
    pub options: Vec<String>,
}

/// The questionnaire, with choice options taken from the loaded tables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Questionnaire {
    pub numeric: Vec<NumericControl>,
    pub stage_fear: ChoiceControl,
    pub drained_after_socializing: ChoiceControl,
}

// ============================================================================
// COMMANDS
// ============================================================================

pub fn get_questionnaire(pipeline: &InferencePipeline) -> Questionnaire {
    let tables = pipeline.tables();
    Questionnaire {
        numeric: NUMERIC_QUESTIONS.iter().map(NumericControl::from).collect(),
        stage_fear: ChoiceControl {
            key: "stage_fear".to_string(),
            prompt: STAGE_FEAR_PROMPT.to_string(),
            options: tables.stage_fear().labels().map(str::to_string).collect(),
        },
        drained_after_socializing: ChoiceControl {
            key: "drained_after_socializing".to_string(),
            prompt: DRAINED_PROMPT.to_string(),
            options: tables.drained().labels().map(str::to_string).collect(),
        },
    }
}

/// Validate, predict, explain
pub fn run_prediction(
    pipeline: &InferencePipeline,
    config: &AppConfig,
    answers: RawAnswers,
) -> Result<PredictionResponse, String> {
    answers.validate().map_err(|e| e.to_string())?;

    let result = pipeline.predict(&answers).map_err(|e| {
        log::error!("Prediction failed: {}", e);
        e.to_string()
    })?;
    let explanation = explain(&result, &config.reference_averages);

    Ok(PredictionResponse {
        result,
        explanation,
        generated_at: chrono::Utc::now().to_rfc3339(),
    })
}

pub fn get_model_info(pipeline: &InferencePipeline, config: &AppConfig) -> ModelInfo {
    ModelInfo {
        model: pipeline.model().metadata().clone(),
        layout: pipeline.tables().layout().clone(),
        card: pipeline.card().cloned(),
        ranked_importances: pipeline.model().ranked_importances().to_vec(),
        reference_averages: config.reference_averages,
        reference_is_default: config.uses_default_reference(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::test_support::{answers, sample_pipeline};

    #[test]
    fn test_questionnaire_options_from_tables() {
        let q = get_questionnaire(&sample_pipeline());
        assert_eq!(q.numeric.len(), 5);
        assert_eq!(q.numeric[0].max, 168);
        assert_eq!(q.stage_fear.options, vec!["No", "Yes"]);
    }

    #[test]
    fn test_run_prediction() {
        let response =
            run_prediction(&sample_pipeline(), &AppConfig::default(), answers(40, "Yes")).unwrap();
        assert_eq!(response.result.label, "Introvert");
        assert_eq!(response.explanation.factors.len(), 3);
    }

    #[test]
    fn test_run_prediction_rejects_out_of_range() {
        let mut raw = answers(40, "Yes");
        raw.post_frequency = 101;
        let err = run_prediction(&sample_pipeline(), &AppConfig::default(), raw).unwrap_err();
        assert!(err.contains("post_frequency"));
    }

    #[test]
    fn test_model_info() {
        let info = get_model_info(&sample_pipeline(), &AppConfig::default());
        assert_eq!(info.layout.feature_count, 11);
        assert!(info.reference_is_default);
        assert_eq!(info.ranked_importances[0].name, "Time_spent_Alone");
    }
}
