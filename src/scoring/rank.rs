use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

use super::points::points_for_rank;
use super::policy::DuplicatePolicy;
use crate::error::ValidationError;
use crate::snapshot::{Game, GameResult, Id, ScoringDirection};

/// A result placed within its (game, group) pair.
#[derive(Debug, Clone, Serialize)]
pub struct RankedResult {
    pub result: GameResult,
    pub rank: u32,
    pub points: u32,
}

/// Reduce the results to one per (child, game) according to `policy`.
///
/// Survivors keep the order in which their (child, game) pair first appears.
pub fn select_results<'a, I>(
    results: I,
    games: &[Game],
    policy: DuplicatePolicy,
) -> Result<Vec<GameResult>, ValidationError>
where
    I: IntoIterator<Item = &'a GameResult>,
{
    let mut order: Vec<(&Id, &Id)> = Vec::new();
    let mut by_pair: HashMap<(&Id, &Id), Vec<&GameResult>> = HashMap::new();

    for result in results {
        let key = (&result.child_id, &result.game_id);
        let entry = by_pair.entry(key).or_default();
        if entry.is_empty() {
            order.push(key);
        }
        entry.push(result);
    }

    let mut selected = Vec::with_capacity(order.len());
    for key in order {
        let candidates = &by_pair[&key];
        if candidates.len() == 1 {
            selected.push(candidates[0].clone());
            continue;
        }

        if policy == DuplicatePolicy::Reject {
            return Err(ValidationError::DuplicateResult {
                child_id: key.0.clone(),
                game_id: key.1.clone(),
                count: candidates.len(),
            });
        }

        let direction = find_game(games, key.1)
            .map(|g| g.direction)
            .unwrap_or(ScoringDirection::HigherIsBetter);

        let keep = candidates
            .iter()
            .copied()
            .min_by(|a, b| preference(a, b, direction, policy));
        if let Some(keep) = keep {
            debug!(
                child = %key.0,
                game = %key.1,
                dropped = candidates.len() - 1,
                kept = %keep.id,
                "Dropped duplicate results"
            );
            selected.push(keep.clone());
        }
    }

    Ok(selected)
}

fn find_game<'a>(games: &'a [Game], id: &Id) -> Option<&'a Game> {
    games.iter().find(|g| &g.id == id)
}

/// `Less` means `a` is the one to keep.
fn preference(
    a: &GameResult,
    b: &GameResult,
    direction: ScoringDirection,
    policy: DuplicatePolicy,
) -> Ordering {
    let by_value = direction.compare(a.value, b.value);
    // Newest first; a missing timestamp counts as oldest.
    let by_time = b.recorded_at.cmp(&a.recorded_at);
    let by_id = a.id.cmp(&b.id);

    match policy {
        DuplicatePolicy::Latest => by_time.then(by_value).then(by_id),
        DuplicatePolicy::Best | DuplicatePolicy::Reject => by_value.then(by_time).then(by_id),
    }
}

/// Rank the results of one (game, group) pair.
///
/// Equal values share a rank and consume the following slots:
/// 8, 8, 5 ranks as 1, 1, 3. Output is best-first; equal values are
/// ordered by result id.
pub fn rank_results(results: &[GameResult], direction: ScoringDirection) -> Vec<RankedResult> {
    let mut sorted: Vec<&GameResult> = results.iter().collect();
    sorted.sort_by(|a, b| direction.compare(a.value, b.value).then_with(|| a.id.cmp(&b.id)));

    let mut ranked = Vec::with_capacity(sorted.len());
    let mut rank = 0;
    let mut previous: Option<f64> = None;
    for (idx, result) in sorted.into_iter().enumerate() {
        if previous != Some(result.value) {
            rank = idx as u32 + 1;
            previous = Some(result.value);
        }
        ranked.push(RankedResult {
            result: result.clone(),
            rank,
            points: points_for_rank(rank),
        });
    }
    ranked
}

/// Rank every (game, group) pair present in `results`.
///
/// Results for games missing from `games` cannot be ranked and are skipped.
pub fn rank_all(results: &[GameResult], games: &[Game]) -> Vec<RankedResult> {
    let mut pairs: BTreeMap<(&Id, &Id), Vec<GameResult>> = BTreeMap::new();
    for result in results {
        pairs
            .entry((&result.game_id, &result.group_id))
            .or_default()
            .push(result.clone());
    }

    let mut ranked = Vec::with_capacity(results.len());
    for ((game_id, group_id), pair_results) in pairs {
        let Some(game) = find_game(games, game_id) else {
            warn!(
                "Skipping {} results for unknown game {} in group {}",
                pair_results.len(),
                game_id,
                group_id
            );
            continue;
        };
        ranked.extend(rank_results(&pair_results, game.direction));
    }
    ranked
}
