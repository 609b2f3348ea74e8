use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompletionStatus {
    Complete,
    Incomplete,
}

impl fmt::Display for CompletionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionStatus::Complete => write!(f, "complete"),
            CompletionStatus::Incomplete => write!(f, "incomplete"),
        }
    }
}

/// A child is complete once they have played every expected game.
/// No expected games means nothing is missing.
pub fn evaluate(games_participated: usize, games_expected: usize) -> CompletionStatus {
    if games_expected == 0 || games_participated >= games_expected {
        CompletionStatus::Complete
    } else {
        CompletionStatus::Incomplete
    }
}

/// Class-level flag: every child is complete (vacuously true for no children).
pub fn all_complete<I>(statuses: I) -> bool
where
    I: IntoIterator<Item = CompletionStatus>,
{
    statuses
        .into_iter()
        .all(|s| s == CompletionStatus::Complete)
}
