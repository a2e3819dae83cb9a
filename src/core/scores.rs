//! Terminal outcome representation.
//!
//! A finished game is reported as a vector with one slot per player plus a
//! trailing draw flag: the winner's slot (or the draw slot) is set to 1.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;

/// One-hot outcome vector: `player_count` win slots plus a draw slot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreVector {
    values: Vec<f32>,
}

impl ScoreVector {
    /// Outcome where `winner` won.
    #[must_use]
    pub fn win(player_count: usize, winner: PlayerId) -> Self {
        assert!(winner.index() < player_count, "winner must be a valid player");
        let mut values = vec![0.0; player_count + 1];
        values[winner.index()] = 1.0;
        Self { values }
    }

    /// Drawn outcome.
    #[must_use]
    pub fn draw(player_count: usize) -> Self {
        let mut values = vec![0.0; player_count + 1];
        values[player_count] = 1.0;
        Self { values }
    }

    /// Check if a player won.
    #[must_use]
    pub fn is_win_for(&self, player: PlayerId) -> bool {
        self.values[player.index()] == 1.0
    }

    /// Check if the game was drawn.
    #[must_use]
    pub fn is_draw(&self) -> bool {
        self.values[self.values.len() - 1] == 1.0
    }

    /// The raw outcome vector.
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }
}
