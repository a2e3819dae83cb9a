//! Skirmish piece kinds and their stat tables.
//!
//! Every per-kind property is an explicit table entry, including the
//! ability target rule: which board relationship (enemy or ally) a kind's
//! ability may be directed at. Nothing here is derived from another kind's
//! entry.

use serde::{Deserialize, Serialize};

use crate::core::{PlayerId, Square};

/// Number of piece kinds.
pub const KIND_COUNT: usize = 5;

/// The piece kinds of the skirmish game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    King,
    Mage,
    Pawn,
    Warrior,
    Assassin,
}

impl PieceKind {
    /// All kinds, in canonical (channel) order.
    pub const ALL: [PieceKind; KIND_COUNT] = [
        PieceKind::King,
        PieceKind::Mage,
        PieceKind::Pawn,
        PieceKind::Warrior,
        PieceKind::Assassin,
    ];

    /// Canonical index of this kind.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            PieceKind::King => 0,
            PieceKind::Mage => 1,
            PieceKind::Pawn => 2,
            PieceKind::Warrior => 3,
            PieceKind::Assassin => 4,
        }
    }

    /// Starting and maximum vitality.
    #[must_use]
    pub fn max_vitality(self) -> i16 {
        match self {
            PieceKind::King => 200,
            PieceKind::Mage => 230,
            PieceKind::Pawn => 300,
            PieceKind::Warrior => 500,
            PieceKind::Assassin => 110,
        }
    }

    /// Vitality removed from (or restored to) an ability target.
    #[must_use]
    pub fn ability_power(self) -> i16 {
        match self {
            PieceKind::King => 60,
            PieceKind::Mage => 80,
            PieceKind::Pawn => 30,
            PieceKind::Warrior => 100,
            PieceKind::Assassin => 120,
        }
    }

    /// Material weight used by the position-value function.
    #[must_use]
    pub fn value_weight(self) -> f32 {
        match self {
            PieceKind::King => 1000.0,
            PieceKind::Mage => 10.0,
            PieceKind::Pawn => 1.0,
            PieceKind::Warrior => 5.0,
            PieceKind::Assassin => 15.0,
        }
    }

    /// Which relationship this kind's ability targets. One explicit entry
    /// per kind; every kind in this game attacks, but the rule set also
    /// admits ally-targeting support kinds.
    #[must_use]
    pub fn target_rule(self) -> TargetRule {
        match self {
            PieceKind::King => TargetRule::Enemies,
            PieceKind::Mage => TargetRule::Enemies,
            PieceKind::Pawn => TargetRule::Enemies,
            PieceKind::Warrior => TargetRule::Enemies,
            PieceKind::Assassin => TargetRule::Enemies,
        }
    }

    /// One-letter notation glyph; uppercase for player 0.
    #[must_use]
    pub fn glyph(self, owner: PlayerId) -> char {
        let upper = match self {
            PieceKind::King => 'K',
            PieceKind::Mage => 'M',
            PieceKind::Pawn => 'P',
            PieceKind::Warrior => 'W',
            PieceKind::Assassin => 'A',
        };
        if owner == PlayerId::new(0) {
            upper
        } else {
            upper.to_ascii_lowercase()
        }
    }

    /// Parse a notation glyph back into kind and owner.
    #[must_use]
    pub fn from_glyph(ch: char) -> Option<(PieceKind, PlayerId)> {
        let kind = match ch.to_ascii_uppercase() {
            'K' => PieceKind::King,
            'M' => PieceKind::Mage,
            'P' => PieceKind::Pawn,
            'W' => PieceKind::Warrior,
            'A' => PieceKind::Assassin,
            _ => return None,
        };
        let owner = if ch.is_ascii_uppercase() {
            PlayerId::new(0)
        } else {
            PlayerId::new(1)
        };
        Some((kind, owner))
    }
}

/// Relationship an ability may be directed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetRule {
    /// Attack abilities: the target must belong to the opponent.
    Enemies,
    /// Support abilities: the target must belong to the actor.
    Allies,
}

impl TargetRule {
    /// Whether a piece owned by `target` is a permitted target for an
    /// actor owned by `actor`.
    #[must_use]
    pub fn allows(self, actor: PlayerId, target: PlayerId) -> bool {
        match self {
            TargetRule::Enemies => actor != target,
            TargetRule::Allies => actor == target,
        }
    }
}

/// A piece on the board or in the roster.
///
/// Dead pieces (vitality <= 0) stay in the roster for valuation but are
/// removed from the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub owner: PlayerId,
    pub vitality: i16,
    pub square: Square,
}

impl Piece {
    /// Create a piece at full vitality.
    #[must_use]
    pub fn new(kind: PieceKind, owner: PlayerId, square: Square) -> Self {
        Self {
            kind,
            owner,
            vitality: kind.max_vitality(),
            square,
        }
    }

    /// Whether the piece is still in play.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.vitality > 0
    }
}
