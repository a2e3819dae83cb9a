//! # rust-bge
//!
//! A multi-game board engine optimized for RL/MCTS training.
//!
//! ## Design Principles
//!
//! 1. **One contract, many games**: Every engine exposes the same
//!    capability interface (`GameEngine`): legality masks over a fixed
//!    action space, action application, terminal scores, canonical
//!    tensors, and symmetries. The search/self-play driver is external
//!    and never sees game-specific types.
//!
//! 2. **Dense action spaces**: Actions live in a flat, fixed-size index
//!    space built once per game by the `ActionCodec`. Slots that can
//!    never be legal keep their index so the layout never shifts under
//!    the policy network.
//!
//! 3. **Cheap snapshots**: Game objects deep-copy per search branch.
//!    Turn histories use `im` persistent structures, and repetition keys
//!    are interned in a shared, reference-counted pool that is swept at
//!    every fork.
//!
//! ## Error handling
//!
//! Contract violations (out-of-range indices, illegal actions) panic
//! immediately; expected empty outcomes (no useful ability, skip-only
//! positions) are ordinary values; make/undo restoration is checked with
//! debug assertions.
//!
//! ## Modules
//!
//! - `core`: player ids, board geometry, tensors, score vectors
//! - `codec`: flat action-index bijection
//! - `intern`: position keys, interned pool, repetition tracking
//! - `engine`: the `GameEngine` trait and the closed `AnyGame` variant
//! - `games`: the concrete rule engines (skirmish, tafl)

pub mod codec;
pub mod core;
pub mod engine;
pub mod error;
pub mod games;
pub mod intern;

// Re-export commonly used types
pub use crate::core::{Coords, Delta, Grid, PlayerId, ScoreVector, Square, Tensor};

pub use crate::codec::{ActionCodec, DecodedAction};

pub use crate::engine::{AnyGame, GameEngine};

pub use crate::error::NotationError;

pub use crate::intern::{InternPool, PositionKey, RepetitionTracker};

pub use crate::games::skirmish::{SkirmishConfig, SkirmishGame};

pub use crate::games::tafl::{RepetitionOutcome, TaflConfig, TaflGame};
