use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

use super::assignment::{resolve_games, RelevantGames};
use super::standings::group_members;
use crate::snapshot::{Game, Id, Snapshot};

/// Progress of one game in one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CellStatus {
    /// The game does not count for the group's class.
    NotAssigned,
    /// No results yet.
    Open,
    /// Some, but fewer results than children in the group.
    Partial,
    Complete,
}

impl CellStatus {
    pub fn from_counts(results: usize, group_size: usize) -> Self {
        if results == 0 {
            CellStatus::Open
        } else if results >= group_size {
            CellStatus::Complete
        } else {
            CellStatus::Partial
        }
    }
}

impl fmt::Display for CellStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellStatus::NotAssigned => write!(f, "-"),
            CellStatus::Open => write!(f, "open"),
            CellStatus::Partial => write!(f, "partial"),
            CellStatus::Complete => write!(f, "done"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MatrixCell {
    pub game_id: Id,
    /// Distinct children with a result
    pub results: usize,
    pub status: CellStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatrixRow {
    pub group_id: Id,
    pub group_name: String,
    pub class_label: String,
    pub group_size: usize,
    pub cells: Vec<MatrixCell>,
}

/// Status of every (group, game) pair; columns follow `games`.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionMatrix {
    pub games: Vec<Game>,
    pub rows: Vec<MatrixRow>,
}

pub fn completion_matrix(snapshot: &Snapshot) -> CompletionMatrix {
    let relevant: HashMap<String, RelevantGames> = snapshot
        .class_labels()
        .into_iter()
        .map(|label| {
            let games = resolve_games(snapshot, &label);
            (label, games)
        })
        .collect();

    let mut players: HashMap<(&Id, &Id), HashSet<&Id>> = HashMap::new();
    for result in &snapshot.results {
        players
            .entry((&result.group_id, &result.game_id))
            .or_default()
            .insert(&result.child_id);
    }

    let rows = snapshot
        .groups
        .iter()
        .map(|group| {
            let group_size = group_members(snapshot, &group.id).len();
            let class_games = relevant.get(&group.class_label);
            let cells = snapshot
                .games
                .iter()
                .map(|game| {
                    let results = players
                        .get(&(&group.id, &game.id))
                        .map_or(0, HashSet::len);
                    let assigned = class_games.is_some_and(|r| r.contains(&game.id));
                    let status = if assigned {
                        CellStatus::from_counts(results, group_size)
                    } else {
                        CellStatus::NotAssigned
                    };
                    MatrixCell {
                        game_id: game.id.clone(),
                        results,
                        status,
                    }
                })
                .collect();

            MatrixRow {
                group_id: group.id.clone(),
                group_name: group.name.clone(),
                class_label: group.class_label.clone(),
                group_size,
                cells,
            }
        })
        .collect();

    CompletionMatrix {
        games: snapshot.games.clone(),
        rows,
    }
}
