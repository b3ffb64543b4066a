//! Questionnaire Answers
//!
//! The seven answers of one interaction plus the bounds of every numeric
//! control. The input layer enforces the bounds; the pipeline only relies on
//! values being non-negative integers.

use serde::{Deserialize, Serialize};

use crate::logic::error::{PipelineError, PipelineResult};

// ============================================================================
// NUMERIC CONTROLS
// ============================================================================

/// One bounded numeric control of the questionnaire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericQuestion {
    pub key: &'static str,
    pub prompt: &'static str,
    pub help: Option<&'static str>,
    pub min: u32,
    pub max: u32,
    pub default: u32,
}

impl NumericQuestion {
    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    pub fn check(&self, value: u32) -> PipelineResult<u32> {
        if self.contains(value) {
            Ok(value)
        } else {
            Err(PipelineError::InvalidInput(format!(
                "{} must be between {} and {}, got {}",
                self.key, self.min, self.max, value
            )))
        }
    }
}

pub const TIME_ALONE: NumericQuestion = NumericQuestion {
    key: "time_alone",
    prompt: "Me-time per week (hours)",
    help: Some("Total time spent alone in a week"),
    min: 0,
    max: 168,
    default: 40,
};

pub const SOCIAL_EVENTS: NumericQuestion = NumericQuestion {
    key: "social_event_attendance",
    prompt: "Hangouts per month",
    help: None,
    min: 0,
    max: 30,
    default: 2,
};

pub const GOING_OUTSIDE: NumericQuestion = NumericQuestion {
    key: "going_outside",
    prompt: "Days going out per week",
    help: None,
    min: 0,
    max: 7,
    default: 3,
};

pub const FRIENDS_CIRCLE: NumericQuestion = NumericQuestion {
    key: "friends_circle_size",
    prompt: "Number of close friends",
    help: Some("People you really trust and interact with often"),
    min: 0,
    max: 100,
    default: 10,
};

pub const POST_FREQUENCY: NumericQuestion = NumericQuestion {
    key: "post_frequency",
    prompt: "Social media posts/stories per week",
    help: None,
    min: 0,
    max: 100,
    default: 5,
};

/// Numeric controls in questionnaire order
pub const NUMERIC_QUESTIONS: [NumericQuestion; 5] = [
    TIME_ALONE,
    SOCIAL_EVENTS,
    GOING_OUTSIDE,
    FRIENDS_CIRCLE,
    POST_FREQUENCY,
];

/// Prompts for the two binary-choice controls
pub const STAGE_FEAR_PROMPT: &str = "Nervous when presenting or speaking in public?";
pub const DRAINED_PROMPT: &str = "Often out of energy after socializing?";

// ============================================================================
// RAW ANSWERS
// ============================================================================

/// Everything a user supplies in one interaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAnswers {
    pub time_alone: u32,
    pub social_event_attendance: u32,
    pub going_outside: u32,
    pub friends_circle_size: u32,
    pub post_frequency: u32,
    pub stage_fear: String,
    pub drained_after_socializing: String,
}

impl RawAnswers {
    /// Check every numeric answer against its control's bounds
    pub fn validate(&self) -> PipelineResult<()> {
        TIME_ALONE.check(self.time_alone)?;
        SOCIAL_EVENTS.check(self.social_event_attendance)?;
        GOING_OUTSIDE.check(self.going_outside)?;
        FRIENDS_CIRCLE.check(self.friends_circle_size)?;
        POST_FREQUENCY.check(self.post_frequency)?;
        Ok(())
    }
}

/// Categorical answers after lookup in the encoding tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedAnswers {
    pub stage_fear: i64,
    pub drained_after_socializing: i64,
}
