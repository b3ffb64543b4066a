//! Integration Tests for Feature Engineering
//!
//! Raw answers through to the ordered vector, without a classifier.

#[cfg(test)]
mod integration_tests {
    use crate::logic::encoding::FeatureThresholds;
    use crate::logic::error::PipelineError;
    use crate::logic::features::layout::FEATURE_LAYOUT;
    use crate::logic::features::{EncodedAnswers, EngineeredFeatures, FeatureRow, RawAnswers};

    fn sample_row() -> FeatureRow {
        let raw = RawAnswers {
            time_alone: 12,
            social_event_attendance: 4,
            going_outside: 5,
            friends_circle_size: 9,
            post_frequency: 3,
            stage_fear: "No".to_string(),
            drained_after_socializing: "Yes".to_string(),
        };
        let encoded = EncodedAnswers {
            stage_fear: 0,
            drained_after_socializing: 1,
        };
        let thresholds = FeatureThresholds {
            time_alone_median: 4.0,
            friends_circle_median: 5.0,
        };
        let engineered = EngineeredFeatures::derive(&raw, &thresholds);
        FeatureRow::new(&raw, &encoded, &engineered)
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    /// Every canonical feature gets the value it was derived from
    #[test]
    fn test_canonical_row_values() {
        let row = sample_row();
        let vector = row.assemble(&names(FEATURE_LAYOUT)).unwrap();

        assert_eq!(
            vector.values,
            vec![12.0, 4.0, 5.0, 9.0, 3.0, 0.0, 1.0, 4.0 / 13.0, 5.0 / 5.0, 1.0, 1.0]
        );
    }

    /// Permuting the declared order permutes what the classifier receives
    #[test]
    fn test_declared_order_is_respected() {
        let row = sample_row();
        let forward = row
            .assemble(&names(&["Time_spent_Alone", "Friends_circle_size", "Drained_after_socializing"]))
            .unwrap();
        let permuted = row
            .assemble(&names(&["Drained_after_socializing", "Time_spent_Alone", "Friends_circle_size"]))
            .unwrap();

        assert_eq!(forward.values, vec![12.0, 9.0, 1.0]);
        assert_eq!(permuted.values, vec![1.0, 12.0, 9.0]);
        assert_ne!(forward.values, permuted.values);
        assert_ne!(forward.layout_hash, permuted.layout_hash);
    }

    /// A subset of the layout is fine, an unknown name is not
    #[test]
    fn test_unknown_feature_is_configuration_error() {
        let row = sample_row();
        assert_eq!(row.assemble(&names(&["Post_frequency"])).unwrap().values, vec![3.0]);

        let err = row
            .assemble(&names(&["Post_frequency", "Favourite_colour"]))
            .unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(_)));
    }

    #[test]
    fn test_log_entry_contains_named_values() {
        let vector = sample_row().assemble(&names(&["Going_outside"])).unwrap();
        let entry = vector.to_log_entry();
        assert_eq!(entry["named_values"]["Going_outside"], 5.0);
    }
}
