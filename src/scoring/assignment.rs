use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

use crate::snapshot::{Game, Id, Snapshot};

/// Which rule decided the relevant games of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameSource {
    /// Explicit class/game assignments exist.
    Assigned,
    /// No assignments; derived from results recorded in the class's groups.
    Observed,
    /// Neither assignments nor results. "0 of 0 games".
    None,
}

/// Games that count for one class, resolved once per computation pass.
#[derive(Debug, Clone)]
pub struct RelevantGames {
    pub source: GameSource,
    pub games: Vec<Game>,
}

impl RelevantGames {
    pub fn expected(&self) -> usize {
        self.games.len()
    }

    pub fn contains(&self, game_id: &Id) -> bool {
        self.games.iter().any(|g| &g.id == game_id)
    }
}

/// Resolve the ordered list of games that count for `class_label`.
///
/// First match wins, no merging:
/// 1. games referenced by class assignments
/// 2. games with at least one result in a group of the class
/// 3. nothing
///
/// Games keep the snapshot's game order.
pub fn resolve_games(snapshot: &Snapshot, class_label: &str) -> RelevantGames {
    let assigned: HashSet<&Id> = snapshot
        .assignments
        .iter()
        .filter(|a| a.class_label == class_label)
        .map(|a| &a.game_id)
        .collect();

    if !assigned.is_empty() {
        let games = filter_games(snapshot, &assigned);
        debug!(class = class_label, games = games.len(), "Relevant games from assignments");
        return RelevantGames {
            source: GameSource::Assigned,
            games,
        };
    }

    let class_groups: HashSet<&Id> = snapshot
        .groups_in_class(class_label)
        .map(|g| &g.id)
        .collect();
    let observed: HashSet<&Id> = snapshot
        .results
        .iter()
        .filter(|r| class_groups.contains(&r.group_id))
        .map(|r| &r.game_id)
        .collect();

    let games = filter_games(snapshot, &observed);
    if games.is_empty() {
        debug!(class = class_label, "No assignments and no results, 0 relevant games");
        return RelevantGames {
            source: GameSource::None,
            games,
        };
    }

    debug!(class = class_label, games = games.len(), "Relevant games from observed results");
    RelevantGames {
        source: GameSource::Observed,
        games,
    }
}

fn filter_games(snapshot: &Snapshot, ids: &HashSet<&Id>) -> Vec<Game> {
    snapshot
        .games
        .iter()
        .filter(|g| ids.contains(&g.id))
        .cloned()
        .collect()
}
