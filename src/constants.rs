//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! Artifact names mirror the files shipped next to the trained model.

/// Default model artifact file name
pub const DEFAULT_MODEL_FILE: &str = "personality_prediction_model.json";

/// Default preprocessing metadata file name
pub const DEFAULT_METADATA_FILE: &str = "preprocessing_info.json";

/// Directory under the per-user data dir searched for artifacts
pub const DATA_DIR_NAME: &str = "persona";

/// Label shown when the classifier returns a class the metadata doesn't know
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Number of explanatory factors returned per prediction
pub const DEFAULT_TOP_FACTORS: usize = 3;

/// "Average person" profile: time alone, social events, friends, posts (normalized 0-1)
///
/// Not derived from population statistics. Validate before relying on it.
pub const DEFAULT_REFERENCE_AVERAGES: [f64; 4] = [0.6, 0.5, 0.5, 0.5];

/// Hours per week above which time alone counts as "higher than most"
pub const TYPICAL_TIME_ALONE_HOURS: u32 = 20;

/// Friend circle size above which the network counts as "wide"
pub const TYPICAL_FRIENDS_CIRCLE: u32 = 15;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Persona";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Model artifact path from environment, if set
pub fn get_model_path() -> Option<String> {
    std::env::var("PERSONA_MODEL_PATH").ok().filter(|s| !s.is_empty())
}

/// Metadata artifact path from environment, if set
pub fn get_metadata_path() -> Option<String> {
    std::env::var("PERSONA_METADATA_PATH").ok().filter(|s| !s.is_empty())
}

/// Reference averages from environment (comma separated, 4 values)
pub fn get_reference_averages() -> Option<[f64; 4]> {
    let raw = std::env::var("PERSONA_REFERENCE_AVERAGES").ok()?;
    let values = parse_reference_averages(&raw);
    if values.is_none() {
        log::warn!(
            "Ignoring PERSONA_REFERENCE_AVERAGES: expected 4 comma-separated values in 0-1, got '{}'",
            raw
        );
    }
    values
}

/// Unknown class policy from environment ("sentinel" or "fail")
pub fn get_unknown_class_policy() -> Option<String> {
    std::env::var("PERSONA_UNKNOWN_CLASS_POLICY").ok()
}

/// Number of explanatory factors from environment
pub fn get_top_factors() -> Option<usize> {
    let raw = std::env::var("PERSONA_TOP_FACTORS").ok()?;
    match raw.trim().parse() {
        Ok(n) => Some(n),
        Err(e) => {
            log::warn!("Ignoring PERSONA_TOP_FACTORS '{}': {}", raw, e);
            None
        }
    }
}

/// Parse "0.6,0.5,0.5,0.5" into four values in [0, 1]
pub fn parse_reference_averages(raw: &str) -> Option<[f64; 4]> {
    let values: Vec<f64> = raw
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .ok()?;

    if values.len() != 4 || values.iter().any(|v| !(0.0..=1.0).contains(v)) {
        return None;
    }

    Some([values[0], values[1], values[2], values[3]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reference_averages() {
        assert_eq!(
            parse_reference_averages("0.6, 0.5,0.5 ,0.5"),
            Some(DEFAULT_REFERENCE_AVERAGES)
        );
        assert_eq!(parse_reference_averages("0.6,0.5,0.5"), None);
        assert_eq!(parse_reference_averages("0.6,0.5,0.5,1.5"), None);
        assert_eq!(parse_reference_averages("a,b,c,d"), None);
    }

    // One test owns these variables; no other test reads them
    #[test]
    fn test_malformed_env_values_are_ignored() {
        std::env::set_var("PERSONA_TOP_FACTORS", "three");
        assert_eq!(get_top_factors(), None);
        std::env::set_var("PERSONA_TOP_FACTORS", " 5 ");
        assert_eq!(get_top_factors(), Some(5));
        std::env::remove_var("PERSONA_TOP_FACTORS");
        assert_eq!(get_top_factors(), None);

        std::env::set_var("PERSONA_REFERENCE_AVERAGES", "0.6,0.5");
        assert_eq!(get_reference_averages(), None);
        std::env::set_var("PERSONA_REFERENCE_AVERAGES", "0.1,0.2,0.3,0.4");
        assert_eq!(get_reference_averages(), Some([0.1, 0.2, 0.3, 0.4]));
        std::env::remove_var("PERSONA_REFERENCE_AVERAGES");
    }
}
