//! The uniform contract between game engines and the external self-play /
//! search driver.
//!
//! Drivers talk to every game through [`GameEngine`]; the concrete engines
//! live behind the closed [`AnyGame`] variant so a training loop can hold
//! heterogeneous games without trait objects.
//!
//! ## Contract notes
//!
//! - `apply_action` must only be called with an index reported legal by
//!   `legal_action_mask`; violating this is a programming error and may
//!   panic, never silently correct itself.
//! - `scores` returns `None` while the game is running.
//! - No method here blocks or suspends; game objects are single-threaded.
//!   Parallel drivers deep-copy (`Clone`) one object per worker.

use crate::core::{PlayerId, ScoreVector, Tensor};
use crate::games::skirmish::SkirmishGame;
use crate::games::tafl::TaflGame;
use crate::intern::PositionKey;

/// Capability interface every rule engine exposes to the driver.
pub trait GameEngine {
    /// Number of players.
    fn player_count(&self) -> usize;

    /// The player to act.
    fn current_player(&self) -> PlayerId;

    /// The current turn number, starting at 0.
    fn current_turn(&self) -> u32;

    /// Size of the fixed flat action space.
    fn action_count(&self) -> usize;

    /// Legality mask over the full flat action space.
    ///
    /// For games with a skip action this always has at least one set bit.
    fn legal_action_mask(&self) -> Vec<bool>;

    /// Whether the side to move has any legal action at all.
    fn has_any_legal_action(&self) -> bool {
        self.legal_action_mask().iter().any(|&legal| legal)
    }

    /// Apply one action index, mutating the game.
    ///
    /// Effects are observed through subsequent queries. The index must be
    /// legal in the current position.
    fn apply_action(&mut self, index: usize);

    /// Terminal status: `None` while the game continues, otherwise the
    /// one-hot per-player outcome with trailing draw flag.
    fn scores(&self) -> Option<ScoreVector>;

    /// The position encoded as a fixed-shape tensor for neural evaluation.
    fn canonical(&self) -> Tensor;

    /// Number of symmetries `symmetries` will produce (at least 1).
    fn symmetry_count(&self) -> usize;

    /// Equivalent (tensor, policy) pairs under the game's symmetry group,
    /// with the supplied policy vector relabeled to match each transform.
    /// The identity transform is always included.
    fn symmetries(&self, policy: &[f32]) -> Vec<(Tensor, Vec<f32>)>;

    /// Human-readable position dump for debugging and logging only; the
    /// format is not a stability contract.
    fn dump(&self) -> String;

    /// Strip auxiliary bookkeeping, keeping only what `position_key`
    /// needs. Used before storing a game as a cache/hash key.
    fn minimize(&mut self);

    /// Canonical hashable identity of the current position.
    fn position_key(&self) -> PositionKey;
}

/// Closed set of supported games behind one dispatchable value.
#[derive(Clone)]
pub enum AnyGame {
    Skirmish(SkirmishGame),
    Tafl(TaflGame),
}

macro_rules! delegate {
    ($self:ident, $game:ident => $body:expr) => {
        match $self {
            AnyGame::Skirmish($game) => $body,
            AnyGame::Tafl($game) => $body,
        }
    };
}

impl GameEngine for AnyGame {
    fn player_count(&self) -> usize {
        delegate!(self, game => game.player_count())
    }

    fn current_player(&self) -> PlayerId {
        delegate!(self, game => game.current_player())
    }

    fn current_turn(&self) -> u32 {
        delegate!(self, game => game.current_turn())
    }

    fn action_count(&self) -> usize {
        delegate!(self, game => game.action_count())
    }

    fn legal_action_mask(&self) -> Vec<bool> {
        delegate!(self, game => game.legal_action_mask())
    }

    fn has_any_legal_action(&self) -> bool {
        delegate!(self, game => game.has_any_legal_action())
    }

    fn apply_action(&mut self, index: usize) {
        delegate!(self, game => game.apply_action(index));
    }

    fn scores(&self) -> Option<ScoreVector> {
        delegate!(self, game => game.scores())
    }

    fn canonical(&self) -> Tensor {
        delegate!(self, game => game.canonical())
    }

    fn symmetry_count(&self) -> usize {
        delegate!(self, game => game.symmetry_count())
    }

    fn symmetries(&self, policy: &[f32]) -> Vec<(Tensor, Vec<f32>)> {
        delegate!(self, game => game.symmetries(policy))
    }

    fn dump(&self) -> String {
        delegate!(self, game => game.dump())
    }

    fn minimize(&mut self) {
        delegate!(self, game => game.minimize());
    }

    fn position_key(&self) -> PositionKey {
        delegate!(self, game => game.position_key())
    }
}

impl From<SkirmishGame> for AnyGame {
    fn from(game: SkirmishGame) -> Self {
        AnyGame::Skirmish(game)
    }
}

impl From<TaflGame> for AnyGame {
    fn from(game: TaflGame) -> Self {
        AnyGame::Tafl(game)
    }
}
