use thiserror::Error;

use crate::snapshot::Id;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Result {result_id}: value '{value}' is not a number")]
    NonNumericValue { result_id: Id, value: String },

    #[error("Child {child_id} has {count} results for game {game_id} (duplicates rejected)")]
    DuplicateResult {
        child_id: Id,
        game_id: Id,
        count: usize,
    },

    #[error("Child {child_id}: gender '{value}' is neither boy nor girl")]
    UnrecognizedGender { child_id: Id, value: String },

    #[error("Unknown group: {0}")]
    UnknownGroup(Id),

    #[error("Unknown class: {0}")]
    UnknownClass(String),
}
