//! Error types for grid_nav

use thiserror::Error;

/// Misuse of a finder. Failing to find a path is not an error and is reported as `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The finder still holds the state of a previous search.
    #[error("finder holds the state of a previous search, call reset() before searching again")]
    NotReset,
}

/// Errors raised when parsing a [CostGrid](crate::cost_grid::CostGrid) from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapParseError {
    #[error("map contains no rows")]
    Empty,

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unexpected character {found:?} at column {col}, row {row}")]
    InvalidCell { col: usize, row: usize, found: char },
}
