pub mod aggregate;
pub mod assignment;
pub mod completion;
pub mod config;
pub mod crown;
pub mod engine;
pub mod matrix;
pub mod points;
pub mod policy;
pub mod rank;
pub mod standings;
pub mod validation;

pub use aggregate::{aggregate_child, rank_scores, AggregatedScore};
pub use assignment::{resolve_games, GameSource, RelevantGames};
pub use completion::{all_complete, evaluate, CompletionStatus};
pub use config::ScoringConfig;
pub use crown::{select_crowns, Crown};
pub use engine::{
    rank_all_classes, rank_class, ClassFailure, ClassRanking, ClassRankingRow, ClassRankings,
    ScoringPass,
};
pub use matrix::{completion_matrix, CellStatus, CompletionMatrix, MatrixCell, MatrixRow};
pub use points::points_for_rank;
pub use policy::{AggregationMode, DuplicatePolicy};
pub use rank::{rank_all, rank_results, select_results, RankedResult};
pub use standings::{compose_standings, group_members, GroupStandings, StandingsRow};
pub use validation::validate_scoring;
