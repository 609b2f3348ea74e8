use super::config::ScoringConfig;
use super::policy::{AggregationMode, DuplicatePolicy};

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref duplicates) = config.duplicates {
        if let Err(e) = DuplicatePolicy::parse(duplicates) {
            errors.push(format!(
                "scoring.duplicates: invalid '{}' - {}",
                duplicates, e
            ));
        }
    }

    if let Some(ref aggregation) = config.aggregation {
        if let Err(e) = AggregationMode::parse(aggregation) {
            errors.push(format!(
                "scoring.aggregation: invalid '{}' - {}",
                aggregation, e
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let config = ScoringConfig {
            duplicates: Some("latest".to_string()),
            aggregation: Some("ranked".to_string()),
        };
        assert!(validate_scoring(&config).is_ok());
    }

    #[test]
    fn test_empty_config() {
        assert!(validate_scoring(&ScoringConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_duplicates() {
        let config = ScoringConfig {
            duplicates: Some("first".to_string()),
            aggregation: None,
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.duplicates"));
    }

    #[test]
    fn test_collects_all_errors() {
        let config = ScoringConfig {
            duplicates: Some("first".to_string()),
            aggregation: Some("average".to_string()),
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[1].contains("scoring.aggregation"));
    }
}
