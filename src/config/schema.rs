use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scoring::ScoringConfig;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Snapshot file used when `--snapshot` is not given
    #[serde(default)]
    pub snapshot: Option<PathBuf>,
    #[serde(default)]
    pub scoring: Option<ScoringConfig>,
}
