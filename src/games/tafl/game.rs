//! The tafl rule engine behind the uniform driver contract.
//!
//! This game carries the repetition machinery: every applied move records
//! the resulting position in a shared interned pool, and reaching the same
//! position for the third time ends the game with a configurable outcome.

use std::sync::Arc;

use im::Vector;

use crate::codec::{ActionCodec, DecodedAction};
use crate::core::{PlayerId, ScoreVector, Square, Tensor};
use crate::engine::GameEngine;
use crate::intern::{InternPool, PositionKey, RepetitionTracker};

use super::board::{Captures, TaflBoard, ATTACKER, DEFENDER, SIZE};
use super::symmetry::{Symmetry, SYMMETRY_COUNT};

/// Size of the flat action space: one slot per (source, rank-or-file
/// target) pair. There is no skip slot; a side without moves has lost.
pub const NUM_ACTIONS: usize =
    (SIZE as usize) * (SIZE as usize) * (SIZE as usize + SIZE as usize);

/// Canonical channels: three piece planes, two side-to-move planes, two
/// repetition planes.
pub const CHANNELS: usize = 7;

/// Occurrence count at which a position becomes terminal.
const REPETITION_LIMIT: u8 = 3;

/// What a threefold repetition means for this ruleset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RepetitionOutcome {
    /// The designated side wins outright.
    Winner(PlayerId),
    /// The game is drawn.
    Draw,
}

/// Tafl rule configuration.
#[derive(Clone, Copy, Debug)]
pub struct TaflConfig {
    /// Turn count at which the game is drawn.
    pub max_turns: u32,
    /// Outcome of a threefold repetition. Defaults to an attacker win:
    /// the defenders are the side with a perpetual-shuffle incentive.
    pub repetition: RepetitionOutcome,
}

impl Default for TaflConfig {
    fn default() -> Self {
        Self {
            max_turns: 150,
            repetition: RepetitionOutcome::Winner(ATTACKER),
        }
    }
}

impl TaflConfig {
    /// Override the draw turn cap.
    #[must_use]
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Override the repetition outcome.
    #[must_use]
    pub fn with_repetition(mut self, repetition: RepetitionOutcome) -> Self {
        self.repetition = repetition;
        self
    }
}

/// History entry for one committed play.
#[derive(Clone, Debug)]
pub struct PlayRecord {
    pub by: PlayerId,
    pub src: Square,
    pub dst: Square,
    pub captures: Captures,
}

/// The tafl game: 7x7 Brandubh-style rules with repetition tracking.
pub struct TaflGame {
    board: TaflBoard,
    to_move: PlayerId,
    turn: u32,
    config: TaflConfig,
    tracker: RepetitionTracker,
    codec: Arc<ActionCodec>,
    history: Vector<PlayRecord>,
}

impl TaflGame {
    /// Create a game from the standard starting position with a fresh
    /// intern pool.
    #[must_use]
    pub fn new(config: TaflConfig) -> Self {
        Self::from_board(config, TaflBoard::standard(), ATTACKER)
    }

    /// Create a game from an arbitrary position. The position is recorded
    /// as the first occurrence in a fresh intern pool.
    #[must_use]
    pub fn from_board(config: TaflConfig, board: TaflBoard, to_move: PlayerId) -> Self {
        let codec = Arc::new(ActionCodec::rank_file(TaflBoard::grid()));
        let mut tracker = RepetitionTracker::new(InternPool::new());
        let key = PositionKey::new(board.key_cells(), to_move);
        let _ = tracker.record(key);
        Self {
            board,
            to_move,
            turn: 0,
            config,
            tracker,
            codec,
            history: Vector::new(),
        }
    }

    /// The underlying board.
    #[must_use]
    pub fn board(&self) -> &TaflBoard {
        &self.board
    }

    /// The action index codec for this game.
    #[must_use]
    pub fn codec(&self) -> &ActionCodec {
        &self.codec
    }

    /// Occurrence count of the current position.
    #[must_use]
    pub fn repetition_count(&self) -> u8 {
        self.tracker.current_count()
    }

    /// The shared intern pool backing repetition tracking.
    #[must_use]
    pub fn intern_pool(&self) -> &InternPool {
        self.tracker.pool()
    }

    /// History of committed plays.
    #[must_use]
    pub fn history(&self) -> &Vector<PlayRecord> {
        &self.history
    }
}

impl Clone for TaflGame {
    /// Deep-copy the game as a derived snapshot. Forking the tracker
    /// sweeps the shared pool before anything else, so keys held only by
    /// discarded snapshots are reclaimed here.
    fn clone(&self) -> Self {
        let tracker = self.tracker.fork();
        Self {
            board: self.board.clone(),
            to_move: self.to_move,
            turn: self.turn,
            config: self.config,
            tracker,
            codec: Arc::clone(&self.codec),
            history: self.history.clone(),
        }
    }
}

impl GameEngine for TaflGame {
    fn player_count(&self) -> usize {
        2
    }

    fn current_player(&self) -> PlayerId {
        self.to_move
    }

    fn current_turn(&self) -> u32 {
        self.turn
    }

    fn action_count(&self) -> usize {
        self.codec.action_count()
    }

    fn legal_action_mask(&self) -> Vec<bool> {
        let mut mask = vec![false; self.codec.action_count()];
        for src in TaflBoard::grid().squares() {
            if self
                .board
                .at(src)
                .is_some_and(|piece| piece.owner() == self.to_move)
            {
                for dst in self.board.moves_from(src) {
                    mask[self.codec.encode(src, dst)] = true;
                }
            }
        }
        mask
    }

    fn has_any_legal_action(&self) -> bool {
        self.board.side_has_moves(self.to_move)
    }

    fn apply_action(&mut self, index: usize) {
        assert!(index < self.action_count(), "action index {index} out of range");
        let DecodedAction::Move { src, dst } = self.codec.decode(index) else {
            unreachable!("tafl has no skip action");
        };
        debug_assert!(
            self.board
                .at(src)
                .is_some_and(|piece| piece.owner() == self.to_move),
            "source square does not hold a piece of the side to move"
        );
        debug_assert!(self.board.moves_from(src).contains(&dst), "illegal destination");

        let by = self.to_move;
        let captures = self.board.apply_move(src, dst);
        self.history.push_back(PlayRecord { by, src, dst, captures });
        self.turn += 1;
        self.to_move = by.other();

        let key = PositionKey::new(self.board.key_cells(), self.to_move);
        let _ = self.tracker.record(key);
    }

    fn scores(&self) -> Option<ScoreVector> {
        match self.board.king_square() {
            None => return Some(ScoreVector::win(2, ATTACKER)),
            Some(sq) if TaflBoard::is_corner(sq) => {
                return Some(ScoreVector::win(2, DEFENDER));
            }
            Some(_) => {}
        }
        if self.tracker.current_count() >= REPETITION_LIMIT {
            return Some(match self.config.repetition {
                RepetitionOutcome::Winner(player) => ScoreVector::win(2, player),
                RepetitionOutcome::Draw => ScoreVector::draw(2),
            });
        }
        if self.turn >= self.config.max_turns {
            return Some(ScoreVector::draw(2));
        }
        if !self.board.side_has_moves(self.to_move) {
            return Some(ScoreVector::win(2, self.to_move.other()));
        }
        None
    }

    fn canonical(&self) -> Tensor {
        let mut out = Tensor::zeros([CHANNELS, SIZE as usize, SIZE as usize]);
        for sq in TaflBoard::grid().squares() {
            if let Some(piece) = self.board.at(sq) {
                out.set(piece.layer(), sq.row as usize, sq.col as usize, 1.0);
            }
        }
        out.fill_channel(3 + self.to_move.index(), 1.0);
        if self.tracker.current_count() >= 2 {
            out.fill_channel(5, 1.0);
        }
        if self.tracker.current_count() >= REPETITION_LIMIT {
            out.fill_channel(6, 1.0);
        }
        out
    }

    fn symmetry_count(&self) -> usize {
        SYMMETRY_COUNT
    }

    fn symmetries(&self, policy: &[f32]) -> Vec<(Tensor, Vec<f32>)> {
        let canonical = self.canonical();
        Symmetry::ALL
            .iter()
            .map(|sym| {
                (
                    sym.apply_tensor(&canonical),
                    sym.remap_policy(&self.codec, policy),
                )
            })
            .collect()
    }

    fn dump(&self) -> String {
        format!(
            "{}turn {}, {} to move, repetition count {}\n",
            self.board.dump(),
            self.turn,
            self.to_move,
            self.tracker.current_count()
        )
    }

    fn minimize(&mut self) {
        self.tracker.minimize();
        self.history = Vector::new();
    }

    fn position_key(&self) -> PositionKey {
        PositionKey::new(self.board.key_cells(), self.to_move)
    }
}
