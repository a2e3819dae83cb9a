//! The skirmish rule engine behind the uniform driver contract.

use std::sync::Arc;

use crate::codec::ActionCodec;
use crate::core::{PlayerId, ScoreVector, Tensor};
use crate::engine::GameEngine;
use crate::error::NotationError;
use crate::intern::PositionKey;

use super::board::{SkirmishBoard, TurnAction};
use super::pieces::KIND_COUNT;
use super::tables::{RuleTables, SIZE};
use super::{movegen, resolver};

/// Number of canonical channels: presence and vitality planes per
/// (owner, kind) pair plus the two side-to-move planes.
pub const CHANNELS: usize = 2 * 2 * KIND_COUNT + 2;

/// Skirmish rule configuration.
#[derive(Clone, Copy, Debug)]
pub struct SkirmishConfig {
    /// Turn count at which the game is drawn.
    pub max_turns: u32,
}

impl Default for SkirmishConfig {
    fn default() -> Self {
        Self { max_turns: 200 }
    }
}

impl SkirmishConfig {
    /// Override the draw turn cap.
    #[must_use]
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }
}

/// The skirmish game: an 8x8 two-player vitality/ability engine.
#[derive(Clone)]
pub struct SkirmishGame {
    board: SkirmishBoard,
    tables: Arc<RuleTables>,
    config: SkirmishConfig,
}

impl SkirmishGame {
    /// Create a game from the standard starting position.
    #[must_use]
    pub fn new(config: SkirmishConfig) -> Self {
        Self {
            board: SkirmishBoard::standard(),
            tables: Arc::new(RuleTables::standard()),
            config,
        }
    }

    /// Create a game from compact board notation.
    pub fn from_notation(config: SkirmishConfig, text: &str) -> Result<Self, NotationError> {
        Ok(Self {
            board: SkirmishBoard::from_notation(text)?,
            tables: Arc::new(RuleTables::standard()),
            config,
        })
    }

    /// The underlying board.
    #[must_use]
    pub fn board(&self) -> &SkirmishBoard {
        &self.board
    }

    /// The action index codec for this game.
    #[must_use]
    pub fn codec(&self) -> &ActionCodec {
        self.tables.codec()
    }

    /// Resolve the combined action `index` would commit, without
    /// committing it: the board is returned to its pre-turn state.
    pub fn preview_action(&mut self, index: usize) -> TurnAction {
        resolver::choose(&mut self.board, &self.tables, index)
    }
}

impl GameEngine for SkirmishGame {
    fn player_count(&self) -> usize {
        2
    }

    fn current_player(&self) -> PlayerId {
        self.board.to_move()
    }

    fn current_turn(&self) -> u32 {
        self.board.turn()
    }

    fn action_count(&self) -> usize {
        self.tables.codec().action_count()
    }

    fn legal_action_mask(&self) -> Vec<bool> {
        movegen::legal_action_mask(&self.board, &self.tables)
    }

    fn has_any_legal_action(&self) -> bool {
        // Skip is always available as a fallback.
        true
    }

    fn apply_action(&mut self, index: usize) {
        assert!(index < self.action_count(), "action index {index} out of range");
        debug_assert!(
            self.legal_action_mask()[index],
            "action {index} is not legal in this position"
        );
        let _ = resolver::resolve(&mut self.board, &self.tables, index);
    }

    fn scores(&self) -> Option<ScoreVector> {
        for player in PlayerId::all(2) {
            if !self.board.king_alive(player) {
                return Some(ScoreVector::win(2, player.other()));
            }
        }
        if self.board.turn() >= self.config.max_turns {
            return Some(ScoreVector::draw(2));
        }
        None
    }

    fn canonical(&self) -> Tensor {
        let mut out = Tensor::zeros([CHANNELS, SIZE as usize, SIZE as usize]);
        for piece in self.board.pieces() {
            if !piece.is_alive() {
                continue;
            }
            let plane = piece.owner.index() * KIND_COUNT + piece.kind.index();
            let (row, col) = (piece.square.row as usize, piece.square.col as usize);
            out.set(plane, row, col, 1.0);
            let ratio = f32::from(piece.vitality) / f32::from(piece.kind.max_vitality());
            out.set(plane + 2 * KIND_COUNT, row, col, ratio.clamp(0.0, 1.0));
        }
        out.fill_channel(4 * KIND_COUNT + self.board.to_move().index(), 1.0);
        out
    }

    fn symmetry_count(&self) -> usize {
        // Directional pawn movement breaks the grid symmetry.
        1
    }

    fn symmetries(&self, policy: &[f32]) -> Vec<(Tensor, Vec<f32>)> {
        vec![(self.canonical(), policy.to_vec())]
    }

    fn dump(&self) -> String {
        self.board.dump()
    }

    fn minimize(&mut self) {
        self.board.clear_history();
    }

    fn position_key(&self) -> PositionKey {
        self.board.position_key()
    }
}
