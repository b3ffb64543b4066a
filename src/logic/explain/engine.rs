//! Explain Engine - report content for one prediction
//!
//! Profile against the reference averages, readable factors, insights for
//! the predicted label, comparisons against typical values.

use super::types::{Comparison, Explanation, FactorExplanation, ProfileAxis};
use crate::constants::{TYPICAL_FRIENDS_CIRCLE, TYPICAL_TIME_ALONE_HOURS};
use crate::logic::features::answers::{FRIENDS_CIRCLE, POST_FREQUENCY, SOCIAL_EVENTS, TIME_ALONE};
use crate::logic::pipeline::PredictionResult;

// Profile axes, in reference-average order
const PROFILE_AXES: [&str; 4] = ["Time alone", "Social activity", "Close friends", "Social posts"];

const INTROVERT_INSIGHTS: [&str; 3] = [
    "Your energy tends to recharge when you are alone",
    "Large social gatherings may drain you",
    "You value deep connections with a few people",
];

const EXTROVERT_INSIGHTS: [&str; 3] = [
    "Your energy recharges when you are with other people",
    "Long stretches alone may leave you less productive",
    "A wide network is your strength",
];

const FACTS: [&str; 3] = [
    "Neither personality is \"better\" - both have their strengths",
    "Most people sit in the middle of the spectrum (ambivert)",
    "Personality can shift over time and with circumstances",
];

pub fn explain(result: &PredictionResult, reference_averages: &[f64; 4]) -> Explanation {
    let raw = &result.answers;

    let user_values = [
        normalized(raw.time_alone, TIME_ALONE.max),
        normalized(raw.social_event_attendance, SOCIAL_EVENTS.max),
        normalized(raw.friends_circle_size, FRIENDS_CIRCLE.max),
        normalized(raw.post_frequency, POST_FREQUENCY.max),
    ];

    let profile = PROFILE_AXES
        .iter()
        .zip(user_values.iter().zip(reference_averages.iter()))
        .map(|(label, (&user_value, &reference_value))| ProfileAxis {
            label: label.to_string(),
            user_value,
            reference_value,
        })
        .collect();

    let factors = result
        .top_factors
        .iter()
        .map(|factor| FactorExplanation {
            name: factor.name.clone(),
            readable_name: readable_name(&factor.name).to_string(),
            importance: factor.importance,
            percent: (factor.importance * 100.0).round().clamp(0.0, 100.0) as u32,
            description: get_description(&factor.name),
        })
        .collect();

    // Any named label other than Introvert reads as Extrovert; the sentinel gets nothing
    let (insights, tip) = if !result.label_known {
        (Vec::new(), None)
    } else if result.label == "Introvert" {
        (
            INTROVERT_INSIGHTS.iter().map(|s| s.to_string()).collect(),
            (result.encoded.drained_after_socializing == 1).then(|| {
                "Tip: after a social event, set aside recovery time to recharge".to_string()
            }),
        )
    } else {
        (
            EXTROVERT_INSIGHTS.iter().map(|s| s.to_string()).collect(),
            (result.encoded.stage_fear == 0).then(|| {
                "Strength: you are comfortable speaking in public - use it to grow your career"
                    .to_string()
            }),
        )
    };

    let time_above = raw.time_alone > TYPICAL_TIME_ALONE_HOURS;
    let friends_above = raw.friends_circle_size > TYPICAL_FRIENDS_CIRCLE;
    let comparisons = vec![
        Comparison {
            label: "Time alone".to_string(),
            value: format!("{} hours/week", raw.time_alone),
            verdict: if time_above { "Higher" } else { "Lower" }.to_string(),
            above_typical: time_above,
        },
        Comparison {
            label: "Close friends".to_string(),
            value: raw.friends_circle_size.to_string(),
            verdict: if friends_above { "Wide network" } else { "Few but close" }.to_string(),
            above_typical: friends_above,
        },
    ];

    Explanation {
        profile,
        factors,
        insights,
        tip,
        comparisons,
        facts: FACTS.iter().map(|s| s.to_string()).collect(),
    }
}

fn normalized(value: u32, max: u32) -> f64 {
    if max == 0 {
        return 0.0;
    }
    (f64::from(value) / f64::from(max)).clamp(0.0, 1.0)
}

pub fn readable_name(name: &str) -> &str {
    match name {
        "Time_spent_Alone" => "Me-time",
        "Social_event_attendance" => "Hangout frequency",
        "Going_outside" => "Going out",
        "Friends_circle_size" => "Close friends",
        "Post_frequency" => "Posting frequency",
        "Stage_fear" => "Stage fright",
        "Drained_after_socializing" => "Drained after socializing",
        "Social_ratio" => "Social vs alone time",
        "Outdoor_social_ratio" => "Outings vs events",
        "High_alone_time" => "Above-median alone time",
        "Large_friend_circle" => "Above-median friend circle",
        other => other,
    }
}

fn get_description(name: &str) -> Option<String> {
    match name {
        "Time_spent_Alone" => Some("Hours per week spent on your own".to_string()),
        "Drained_after_socializing" => Some("Whether socializing leaves you tired".to_string()),
        "Social_event_attendance" => Some("How often you attend social events".to_string()),
        "Stage_fear" => Some("Nervousness when speaking in public".to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_REFERENCE_AVERAGES;
    use crate::logic::test_support::{answers, sample_pipeline};

    #[test]
    fn test_profile_normalization() {
        let pipeline = sample_pipeline();
        let mut raw = answers(84, "Yes");
        raw.social_event_attendance = 30;
        raw.friends_circle_size = 0;
        raw.post_frequency = 25;

        let result = pipeline.predict(&raw).unwrap();
        let explanation = explain(&result, &DEFAULT_REFERENCE_AVERAGES);

        let values: Vec<f64> = explanation.profile.iter().map(|a| a.user_value).collect();
        assert_eq!(values, vec![0.5, 1.0, 0.0, 0.25]);
        assert_eq!(explanation.profile[0].reference_value, 0.6);
    }

    #[test]
    fn test_introvert_tip_when_drained() {
        let pipeline = sample_pipeline();
        let result = pipeline.predict(&answers(40, "Yes")).unwrap();
        let explanation = explain(&result, &DEFAULT_REFERENCE_AVERAGES);

        assert_eq!(explanation.insights.len(), 3);
        assert!(explanation.tip.as_deref().unwrap_or("").starts_with("Tip"));
        assert!(explanation.comparisons[0].above_typical);
        assert!(!explanation.comparisons[1].above_typical);
        assert_eq!(explanation.comparisons[1].verdict, "Few but close");
    }

    #[test]
    fn test_extrovert_strength_without_stage_fear() {
        let pipeline = sample_pipeline();
        let result = pipeline.predict(&answers(10, "No")).unwrap();
        let explanation = explain(&result, &DEFAULT_REFERENCE_AVERAGES);

        assert!(explanation.tip.as_deref().unwrap_or("").starts_with("Strength"));
        assert_eq!(explanation.comparisons[0].verdict, "Lower");
    }

    #[test]
    fn test_factors_readable() {
        let pipeline = sample_pipeline();
        let result = pipeline.predict(&answers(10, "No")).unwrap();
        let explanation = explain(&result, &DEFAULT_REFERENCE_AVERAGES);

        assert_eq!(explanation.factors.len(), 3);
        assert_eq!(explanation.factors[0].readable_name, "Me-time");
        assert_eq!(explanation.factors[0].percent, 30);
        assert_eq!(readable_name("Unmapped"), "Unmapped");
    }

    #[test]
    fn test_unknown_label_has_no_insights() {
        let pipeline = sample_pipeline();
        let mut result = pipeline.predict(&answers(10, "No")).unwrap();
        result.label = "Unknown".to_string();
        result.label_known = false;

        let explanation = explain(&result, &DEFAULT_REFERENCE_AVERAGES);
        assert!(explanation.insights.is_empty());
        assert!(explanation.tip.is_none());
        assert_eq!(explanation.comparisons.len(), 2);
    }

    #[test]
    fn test_other_named_label_reads_as_extrovert() {
        let pipeline = sample_pipeline();
        let mut result = pipeline.predict(&answers(10, "No")).unwrap();
        result.label = "Ambivert".to_string();

        let explanation = explain(&result, &DEFAULT_REFERENCE_AVERAGES);
        assert_eq!(explanation.insights[0], EXTROVERT_INSIGHTS[0]);
        assert!(explanation.tip.as_deref().unwrap_or("").starts_with("Strength"));
    }
}
