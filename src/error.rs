//! Errors for the recoverable setup surface (board notation parsing).
//!
//! Rule violations during play are contract violations and panic instead;
//! see the crate-level documentation.

use thiserror::Error;

/// Errors raised while parsing a board from its compact notation.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum NotationError {
    #[error("unexpected character {0:?}")]
    BadChar(char),

    #[error("row {row} describes {got} squares, expected {expected}")]
    BadRowLength { row: usize, got: usize, expected: usize },

    #[error("expected {expected} rows, got {got}")]
    BadRowCount { got: usize, expected: usize },

    #[error("missing side-to-move field")]
    MissingSideToMove,

    #[error("bad side-to-move field {0:?}")]
    BadSideToMove(String),
}
