use serde::{Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

use super::aggregate::{aggregate_child, rank_scores, AggregatedScore};
use super::assignment::{resolve_games, GameSource};
use super::completion::{all_complete, CompletionStatus};
use super::config::ScoringConfig;
use super::crown::{select_crowns, Crown};
use super::policy::{AggregationMode, DuplicatePolicy};
use super::rank::{rank_all, select_results, RankedResult};
use crate::error::ValidationError;
use crate::snapshot::{Child, Game, GameResult, Gender, Id, Snapshot};

/// One line of a class ranking table.
#[derive(Debug, Clone, Serialize)]
pub struct ClassRankingRow {
    pub rank: u32,
    pub child_id: Id,
    pub child_name: String,
    pub gender: Gender,
    pub group_name: Option<String>,
    pub total: f64,
    pub games_participated: usize,
    pub games_expected: usize,
    pub status: CompletionStatus,
    /// "König" or "Königin" when this child holds the class crown
    pub crown: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassRanking {
    pub class_label: String,
    pub game_source: GameSource,
    pub games: Vec<Game>,
    pub mode: AggregationMode,
    pub rows: Vec<ClassRankingRow>,
    pub crowns: Vec<Crown>,
    pub all_complete: bool,
}

/// A class that could not be ranked, and why.
#[derive(Debug, Clone, Serialize)]
pub struct ClassFailure {
    pub class_label: String,
    #[serde(serialize_with = "serialize_error")]
    pub error: ValidationError,
}

fn serialize_error<S: Serializer>(error: &ValidationError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Every class of a snapshot, split into tables and failures.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClassRankings {
    pub classes: Vec<ClassRanking>,
    pub failures: Vec<ClassFailure>,
}

/// Scoring settings applied to one snapshot.
///
/// Each class selects and ranks only the results that feed its own table:
/// everything recorded in the class's groups plus the groups its children
/// played in as guests. Invalid data elsewhere does not reach it.
pub struct ScoringPass<'a> {
    snapshot: &'a Snapshot,
    policy: DuplicatePolicy,
    mode: AggregationMode,
}

impl<'a> ScoringPass<'a> {
    pub fn new(snapshot: &'a Snapshot, config: &ScoringConfig) -> Self {
        Self {
            snapshot,
            policy: config.policy(),
            mode: config.mode(),
        }
    }

    /// Deduplicate and rank the results a class table is built from.
    fn class_results(&self, class_label: &str) -> Result<Vec<RankedResult>, ValidationError> {
        let children: HashSet<&Id> = self
            .snapshot
            .children_in_class(class_label)
            .map(|c| &c.id)
            .collect();
        let mut groups: HashSet<&Id> = self
            .snapshot
            .groups_in_class(class_label)
            .map(|g| &g.id)
            .collect();
        groups.extend(
            self.snapshot
                .results
                .iter()
                .filter(|r| children.contains(&r.child_id))
                .map(|r| &r.group_id),
        );

        let scoped: Vec<&GameResult> = self
            .snapshot
            .results
            .iter()
            .filter(|r| groups.contains(&r.group_id))
            .collect();
        let selected = select_results(scoped.iter().copied(), &self.snapshot.games, self.policy)?;
        debug!(
            class = class_label,
            results = scoped.len(),
            kept = selected.len(),
            "Selected one result per child and game"
        );
        Ok(rank_all(&selected, &self.snapshot.games))
    }

    /// Build the ranking table of one class.
    pub fn rank_class(&self, class_label: &str) -> Result<ClassRanking, ValidationError> {
        if !self.snapshot.has_class(class_label) {
            return Err(ValidationError::UnknownClass(class_label.to_string()));
        }

        let ranked = self.class_results(class_label)?;
        let relevant = resolve_games(self.snapshot, class_label);
        let children: HashMap<&Id, &Child> = self
            .snapshot
            .children_in_class(class_label)
            .map(|c| (&c.id, c))
            .collect();

        let scores: Vec<AggregatedScore> = self
            .snapshot
            .children_in_class(class_label)
            .map(|c| aggregate_child(&c.id, &relevant, &ranked, self.mode))
            .collect();
        let scores = rank_scores(scores);

        let entries: Vec<(&Child, &AggregatedScore)> = scores
            .iter()
            .filter_map(|s| children.get(&s.child_id).map(|c| (*c, s)))
            .collect();
        let crowns = select_crowns(class_label, &entries)?;

        let rows: Vec<ClassRankingRow> = entries
            .iter()
            .map(|(child, score)| ClassRankingRow {
                rank: score.rank.unwrap_or_default(),
                child_id: child.id.clone(),
                child_name: child.name.clone(),
                gender: child.gender.clone(),
                group_name: child
                    .group_id
                    .as_ref()
                    .and_then(|id| self.snapshot.group(id))
                    .map(|g| g.name.clone()),
                total: score.total,
                games_participated: score.games_participated,
                games_expected: score.games_expected,
                status: score.status,
                crown: crowns
                    .iter()
                    .find(|crown| crown.child_id == child.id)
                    .map(|crown| crown.title),
            })
            .collect();

        debug!(
            class = class_label,
            children = rows.len(),
            games = relevant.expected(),
            "Ranked class"
        );

        Ok(ClassRanking {
            class_label: class_label.to_string(),
            game_source: relevant.source,
            games: relevant.games,
            mode: self.mode,
            all_complete: all_complete(rows.iter().map(|r| r.status)),
            rows,
            crowns,
        })
    }
}

/// Ranking table of a single class.
pub fn rank_class(
    snapshot: &Snapshot,
    class_label: &str,
    config: &ScoringConfig,
) -> Result<ClassRanking, ValidationError> {
    ScoringPass::new(snapshot, config).rank_class(class_label)
}

/// Ranking tables of every class in the snapshot, ordered by class label.
///
/// A class that fails is listed in `failures`; the other classes are
/// still ranked.
pub fn rank_all_classes(snapshot: &Snapshot, config: &ScoringConfig) -> ClassRankings {
    let pass = ScoringPass::new(snapshot, config);
    let mut rankings = ClassRankings::default();
    for label in snapshot.class_labels() {
        match pass.rank_class(&label) {
            Ok(ranking) => rankings.classes.push(ranking),
            Err(error) => {
                warn!(class = %label, "Class cannot be ranked: {}", error);
                rankings.failures.push(ClassFailure {
                    class_label: label,
                    error,
                });
            }
        }
    }
    rankings
}
