// Typed failures of a single search call
//
// None of these outlive the call that raised them: the arena and frontier are
// dropped on every return path, so a failed call leaves nothing behind.

use std::fmt;

/// Why `GreedySearch` could not produce an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// A probe read outside the grids under the `error` out-of-bounds policy
    OutOfBounds { row: i64, col: i64 },
    /// Grids or ego position (or search parameters) are unusable
    InvalidInput { detail: String },
    /// The expansion cap was hit before the horizon was reached
    SearchExhausted { expansions: u64 },
}

impl SearchError {
    pub(crate) fn invalid(detail: impl Into<String>) -> Self {
        SearchError::InvalidInput {
            detail: detail.into(),
        }
    }
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { row, col } => {
                write!(f, "probe at ({row}, {col}) is outside the grid")
            }
            Self::InvalidInput { detail } => write!(f, "invalid input: {detail}"),
            Self::SearchExhausted { expansions } => {
                write!(f, "search gave up after {expansions} expansions")
            }
        }
    }
}

impl std::error::Error for SearchError {}
