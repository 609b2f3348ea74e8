use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;

use super::assignment::RelevantGames;
use super::completion::{evaluate, CompletionStatus};
use super::policy::AggregationMode;
use super::rank::RankedResult;
use crate::snapshot::Id;

/// A child's standing across the games of their class.
#[derive(Debug, Clone, Serialize)]
pub struct AggregatedScore {
    pub child_id: Id,
    /// Rank points, or the raw value sum in [`AggregationMode::RawValueSum`].
    pub total: f64,
    pub games_participated: usize,
    pub games_expected: usize,
    pub status: CompletionStatus,
    pub mode: AggregationMode,
    /// Position within the class; set by [`rank_scores`].
    pub rank: Option<u32>,
}

/// Sum one child's results over the relevant games.
///
/// `ranked` must hold at most one result per (child, game), as produced
/// by `select_results` followed by `rank_all`.
pub fn aggregate_child(
    child_id: &Id,
    relevant: &RelevantGames,
    ranked: &[RankedResult],
    mode: AggregationMode,
) -> AggregatedScore {
    let own: Vec<&RankedResult> = ranked
        .iter()
        .filter(|r| &r.result.child_id == child_id && relevant.contains(&r.result.game_id))
        .collect();

    let total: f64 = match mode {
        AggregationMode::Ranked => own.iter().map(|r| r.points as f64).sum(),
        AggregationMode::RawValueSum => own.iter().map(|r| r.result.value).sum(),
    };

    let games_participated = own
        .iter()
        .map(|r| &r.result.game_id)
        .collect::<HashSet<_>>()
        .len();
    let games_expected = relevant.expected();

    AggregatedScore {
        child_id: child_id.clone(),
        total,
        games_participated,
        games_expected,
        status: evaluate(games_participated, games_expected),
        mode,
        rank: None,
    }
}

/// Best-first order: total descending, then games played descending.
/// Used with a stable sort so roster order breaks remaining ties.
pub fn compare_scores(a: &AggregatedScore, b: &AggregatedScore) -> Ordering {
    b.total
        .total_cmp(&a.total)
        .then_with(|| b.games_participated.cmp(&a.games_participated))
}

/// Sort scores best-first and number them. Scores equal in total and games
/// played share a rank; the next one skips the shared slots.
pub fn rank_scores(scores: Vec<AggregatedScore>) -> Vec<AggregatedScore> {
    let mut sorted = scores;
    sorted.sort_by(compare_scores);

    let mut ranked: Vec<AggregatedScore> = Vec::with_capacity(sorted.len());
    let mut rank = 0;
    for (idx, score) in sorted.into_iter().enumerate() {
        let tied = ranked
            .last()
            .is_some_and(|prev| compare_scores(prev, &score) == Ordering::Equal);
        if !tied {
            rank = idx as u32 + 1;
        }
        ranked.push(AggregatedScore {
            rank: Some(rank),
            ..score
        });
    }
    ranked
}
