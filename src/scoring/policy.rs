use anyhow::{bail, Result};
use serde::Serialize;
use std::fmt;

/// What to do when a child has more than one result for the same game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Keep the best value under the game's direction.
    #[default]
    Best,
    /// Keep the most recently recorded value.
    Latest,
    /// Refuse to score until the data is cleaned up.
    Reject,
}

impl DuplicatePolicy {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "best" => Ok(DuplicatePolicy::Best),
            "latest" => Ok(DuplicatePolicy::Latest),
            "reject" => Ok(DuplicatePolicy::Reject),
            other => bail!("Duplicate policy must be best, latest or reject: {}", other),
        }
    }
}

/// How a child's total is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMode {
    /// Sum of rank points per game.
    #[default]
    Ranked,
    /// Sum of raw measured values. An approximation for data where ranks
    /// make no sense, never the default.
    RawValueSum,
}

impl AggregationMode {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "ranked" => Ok(AggregationMode::Ranked),
            "raw_value_sum" => Ok(AggregationMode::RawValueSum),
            other => bail!("Aggregation must be ranked or raw_value_sum: {}", other),
        }
    }

    pub fn is_approximation(&self) -> bool {
        matches!(self, AggregationMode::RawValueSum)
    }
}

impl fmt::Display for AggregationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregationMode::Ranked => write!(f, "ranked"),
            AggregationMode::RawValueSum => write!(f, "raw value sum (approximation)"),
        }
    }
}
