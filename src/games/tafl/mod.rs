//! Tafl: a 7x7 Brandubh-style game with corner escape, custodian capture
//! and a threefold-repetition terminal rule.

mod board;
mod symmetry;

mod game;

pub use board::{Captures, TaflBoard, TaflPiece, ATTACKER, DEFENDER, SIZE, THRONE};
pub use game::{PlayRecord, RepetitionOutcome, TaflConfig, TaflGame, CHANNELS, NUM_ACTIONS};
pub use symmetry::{Symmetry, SYMMETRY_COUNT};
