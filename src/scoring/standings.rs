use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

use super::aggregate::{aggregate_child, rank_scores, AggregatedScore};
use super::assignment::resolve_games;
use super::config::ScoringConfig;
use super::policy::AggregationMode;
use super::rank::{rank_all, select_results};
use crate::error::ValidationError;
use crate::snapshot::{Child, Id, Snapshot};

#[derive(Debug, Clone, Serialize)]
pub struct StandingsRow {
    pub position: u32,
    pub child_id: Id,
    pub child_name: String,
    pub points: f64,
    pub games_participated: usize,
    pub games_expected: usize,
}

/// Live leaderboard of one group.
#[derive(Debug, Clone, Serialize)]
pub struct GroupStandings {
    pub group_id: Id,
    pub group_name: String,
    pub class_label: String,
    /// Relevant games with at least one result in this group
    pub completed_games: usize,
    pub expected_games: usize,
    pub mode: AggregationMode,
    pub rows: Vec<StandingsRow>,
}

/// Children playing in a group, in roster order.
///
/// Explicit members come first. Children without any group assignment
/// who have results recorded against this group are added after them.
pub fn group_members<'a>(snapshot: &'a Snapshot, group_id: &Id) -> Vec<&'a Child> {
    let with_results: HashSet<&Id> = snapshot
        .results
        .iter()
        .filter(|r| &r.group_id == group_id)
        .map(|r| &r.child_id)
        .collect();

    let explicit = snapshot
        .children
        .iter()
        .filter(|c| c.group_id.as_ref() == Some(group_id));
    let inferred = snapshot
        .children
        .iter()
        .filter(|c| c.group_id.is_none() && with_results.contains(&c.id));

    explicit.chain(inferred).collect()
}

/// Build the live standings of a group from its own results only.
pub fn compose_standings(
    snapshot: &Snapshot,
    group_id: &Id,
    config: &ScoringConfig,
) -> Result<GroupStandings, ValidationError> {
    let group = snapshot
        .group(group_id)
        .ok_or_else(|| ValidationError::UnknownGroup(group_id.clone()))?;

    let relevant = resolve_games(snapshot, &group.class_label);
    let own_results = snapshot.results.iter().filter(|r| &r.group_id == group_id);
    let selected = select_results(own_results, &snapshot.games, config.policy())?;
    let ranked = rank_all(&selected, &snapshot.games);

    let members = group_members(snapshot, group_id);
    let mode = config.mode();
    let scores: Vec<AggregatedScore> = members
        .iter()
        .map(|c| aggregate_child(&c.id, &relevant, &ranked, mode))
        .collect();

    let rows: Vec<StandingsRow> = rank_scores(scores)
        .into_iter()
        .filter_map(|score| {
            let child = members.iter().find(|c| c.id == score.child_id)?;
            Some(StandingsRow {
                position: score.rank.unwrap_or_default(),
                child_id: score.child_id,
                child_name: child.name.clone(),
                points: score.total,
                games_participated: score.games_participated,
                games_expected: score.games_expected,
            })
        })
        .collect();

    let completed_games = relevant
        .games
        .iter()
        .filter(|g| selected.iter().any(|r| r.game_id == g.id))
        .count();

    debug!(
        group = %group_id,
        children = rows.len(),
        completed_games,
        expected_games = relevant.expected(),
        "Composed group standings"
    );

    Ok(GroupStandings {
        group_id: group.id.clone(),
        group_name: group.name.clone(),
        class_label: group.class_label.clone(),
        completed_games,
        expected_games: relevant.expected(),
        mode,
        rows,
    })
}
