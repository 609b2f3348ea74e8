use serde::{Deserialize, Serialize};
use tracing::warn;

use super::policy::{AggregationMode, DuplicatePolicy};

/// Scoring configuration.
///
/// The rank-to-points table is fixed; only the handling of messy data can
/// be chosen here.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   duplicates: latest
///   aggregation: ranked
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Duplicate result policy: "best" (default), "latest" or "reject"
    #[serde(default)]
    pub duplicates: Option<String>,

    /// Aggregation mode: "ranked" (default) or "raw_value_sum"
    #[serde(default)]
    pub aggregation: Option<String>,
}

impl ScoringConfig {
    /// Effective duplicate policy. Unparseable values fall back to the default;
    /// `validate_scoring` reports them at startup.
    pub fn policy(&self) -> DuplicatePolicy {
        match self.duplicates.as_deref().map(DuplicatePolicy::parse) {
            Some(Ok(policy)) => policy,
            Some(Err(e)) => {
                warn!("Ignoring scoring.duplicates: {}", e);
                DuplicatePolicy::default()
            }
            None => DuplicatePolicy::default(),
        }
    }

    pub fn mode(&self) -> AggregationMode {
        match self.aggregation.as_deref().map(AggregationMode::parse) {
            Some(Ok(mode)) => mode,
            Some(Err(e)) => {
                warn!("Ignoring scoring.aggregation: {}", e);
                AggregationMode::default()
            }
            None => AggregationMode::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scoring_config() {
        let config = ScoringConfig::default();

        assert!(config.duplicates.is_none());
        assert!(config.aggregation.is_none());
        assert_eq!(config.policy(), DuplicatePolicy::Best);
        assert_eq!(config.mode(), AggregationMode::Ranked);
    }

    #[test]
    fn test_scoring_config_serde_roundtrip() {
        let config = ScoringConfig {
            duplicates: Some("latest".to_string()),
            aggregation: Some("raw_value_sum".to_string()),
        };
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: ScoringConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_scoring_config_parse() {
        let yaml = r#"
duplicates: reject
"#;
        let config: ScoringConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.policy(), DuplicatePolicy::Reject);
        assert_eq!(config.mode(), AggregationMode::Ranked);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = r#"
points_table: [12, 10, 8]
"#;
        let result: Result<ScoringConfig, _> = serde_saphyr::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_value_falls_back_to_default() {
        let config = ScoringConfig {
            duplicates: Some("oldest".to_string()),
            aggregation: Some("median".to_string()),
        };
        assert_eq!(config.policy(), DuplicatePolicy::Best);
        assert_eq!(config.mode(), AggregationMode::Ranked);
    }
}
