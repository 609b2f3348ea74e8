pub mod raw;
pub mod storage;
pub mod types;

pub use raw::{RawSnapshot, RawValue};
pub use storage::load_snapshot;
pub use types::{
    Child, ClassGameAssignment, Game, GameResult, Gender, Group, Id, ScoringDirection, Snapshot,
};
