//! Error types for input validation at the library boundary.
//!
//! Search failure is never an error: an exhausted or capped search is
//! reported through the flags of [`crate::search::SearchResult`]. Errors only
//! describe input that must be rejected before any algorithm runs.

use thiserror::Error;

/// Main error type for the crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid state length: expected {expected} cells, got {got}")]
    InvalidStateLength { expected: usize, got: usize },

    #[error("invalid state: not a permutation of 0..8 ({state:?})")]
    NotAPermutation { state: Vec<u8> },

    #[error("invalid tile '{token}' in '{context}'")]
    InvalidTile { token: String, context: String },

    #[error("invalid board length: expected {expected} cells, got {got} in '{context}'")]
    InvalidBoardLength {
        expected: usize,
        got: usize,
        context: String,
    },

    #[error("invalid character '{character}' at position {position} in '{context}'")]
    InvalidCellCharacter {
        character: char,
        position: usize,
        context: String,
    },

    #[error("invalid player '{input}' (expected 'X' or 'O')")]
    InvalidPlayer { input: String },

    #[error("position {position} is out of bounds (must be 0-8)")]
    InvalidPosition { position: usize },

    #[error("invalid move: position {position} is already occupied")]
    Occupied { position: usize },

    #[error("tile at position {position} is not adjacent to the blank")]
    NotAdjacent { position: usize },

    #[error("game already over")]
    GameOver,

    #[error("no moves to undo")]
    NothingToUndo,

    #[error("manual play is disabled until the puzzle is reset or shuffled")]
    ManualPlayDisabled,

    #[error("puzzle is already solved")]
    AlreadySolved,

    #[error("no comparison has been run yet")]
    NoComparison,
}

/// Convenience type alias for Results using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
