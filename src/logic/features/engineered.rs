//! Engineered Features
//!
//! Four signals derived from the raw answers. The `+ 1.0` in both ratio
//! denominators is a smoothing constant the model was trained with; it also
//! keeps zero answers finite.

use serde::{Deserialize, Serialize};

use super::answers::RawAnswers;
use crate::logic::encoding::FeatureThresholds;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineeredFeatures {
    /// social events / (time alone + 1)
    pub social_ratio: f64,
    /// days outside / (social events + 1)
    pub outdoor_social_ratio: f64,
    /// 1 if time alone > median
    pub high_alone_time: u8,
    /// 1 if friends circle > median
    pub large_friend_circle: u8,
}

impl EngineeredFeatures {
    pub fn derive(raw: &RawAnswers, thresholds: &FeatureThresholds) -> Self {
        let time_alone = f64::from(raw.time_alone);
        let social_events = f64::from(raw.social_event_attendance);
        let going_outside = f64::from(raw.going_outside);
        let friends = f64::from(raw.friends_circle_size);

        Self {
            social_ratio: social_events / (time_alone + 1.0),
            outdoor_social_ratio: going_outside / (social_events + 1.0),
            high_alone_time: u8::from(time_alone > thresholds.time_alone_median),
            large_friend_circle: u8::from(friends > thresholds.friends_circle_median),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds() -> FeatureThresholds {
        FeatureThresholds {
            time_alone_median: 5.0,
            friends_circle_median: 8.0,
        }
    }

    fn raw(time_alone: u32, events: u32, outside: u32, friends: u32) -> RawAnswers {
        RawAnswers {
            time_alone,
            social_event_attendance: events,
            going_outside: outside,
            friends_circle_size: friends,
            post_frequency: 0,
            stage_fear: "Yes".to_string(),
            drained_after_socializing: "Yes".to_string(),
        }
    }

    #[test]
    fn test_all_zero_answers() {
        let features = EngineeredFeatures::derive(&raw(0, 0, 0, 0), &thresholds());
        assert_eq!(features.social_ratio, 0.0);
        assert_eq!(features.outdoor_social_ratio, 0.0);
        assert_eq!(features.high_alone_time, 0);
        assert_eq!(features.large_friend_circle, 0);
    }

    #[test]
    fn test_above_medians() {
        let features = EngineeredFeatures::derive(&raw(50, 0, 0, 20), &thresholds());
        assert_eq!(features.high_alone_time, 1);
        assert_eq!(features.large_friend_circle, 1);
    }

    #[test]
    fn test_equal_to_median_is_not_above() {
        let features = EngineeredFeatures::derive(&raw(5, 0, 0, 8), &thresholds());
        assert_eq!(features.high_alone_time, 0);
        assert_eq!(features.large_friend_circle, 0);
    }

    #[test]
    fn test_ratios_use_smoothed_denominators() {
        let features = EngineeredFeatures::derive(&raw(3, 6, 7, 0), &thresholds());
        assert_eq!(features.social_ratio, 6.0 / 4.0);
        assert_eq!(features.outdoor_social_ratio, 7.0 / 7.0);
    }

    #[test]
    fn test_zero_denominators_stay_finite() {
        let features = EngineeredFeatures::derive(&raw(0, 0, 7, 0), &thresholds());
        assert!(features.social_ratio.is_finite());
        assert!(features.outdoor_social_ratio.is_finite());
        assert_eq!(features.outdoor_social_ratio, 7.0);
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let input = raw(37, 11, 4, 23);
        let a = EngineeredFeatures::derive(&input, &thresholds());
        let b = EngineeredFeatures::derive(&input, &thresholds());
        assert_eq!(a.social_ratio.to_bits(), b.social_ratio.to_bits());
        assert_eq!(a.outdoor_social_ratio.to_bits(), b.outdoor_social_ratio.to_bits());
        assert_eq!(a, b);
    }
}
