//! Precomputed empty-board lookup tables for the skirmish game.
//!
//! Built once at startup and shared read-only between every game object.
//! The tables answer "which squares can this kind reach from this square
//! on an empty board", for moves and for abilities; occupancy and
//! obstruction filtering happen at generation time, never here.
//!
//! A move slot that leaps a square records that square as `via`: the move
//! is legal only while `via` is empty. Slots without `via` are
//! unobstructable (short steps and true leaps).

use smallvec::SmallVec;

use crate::codec::ActionCodec;
use crate::core::{Coords, Delta, Grid, PlayerId, Square};

use super::pieces::{PieceKind, KIND_COUNT};

/// Board width and height.
pub const SIZE: u8 = 8;

/// Slots per source square in the codec: the 5x5 neighborhood minus the
/// origin, plus 4 extended diagonal leaps.
pub const SLOTS_PER_SQUARE: usize = 28;

/// Size of the flat action space, including the reserved skip slot.
pub const NUM_ACTIONS: usize = (SIZE as usize * SIZE as usize) * SLOTS_PER_SQUARE + 1;

/// The reserved skip index.
pub const SKIP_INDEX: usize = NUM_ACTIONS - 1;

/// One empty-board move target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveSlot {
    pub dst: Square,
    /// Square that must be empty for the move to be legal, if any.
    pub via: Option<Square>,
}

/// Shared read-only rule tables: codec plus per-(owner, kind, square)
/// target lists.
#[derive(Debug)]
pub struct RuleTables {
    codec: ActionCodec,
    move_targets: Vec<SmallVec<[MoveSlot; 12]>>,
    ability_targets: Vec<SmallVec<[Square; 8]>>,
}

/// The codec's displacement template, in slot order.
fn codec_template() -> Vec<Delta> {
    let mut deltas = Vec::with_capacity(SLOTS_PER_SQUARE);
    for rows in -2..=2i8 {
        for cols in -2..=2i8 {
            if rows != 0 || cols != 0 {
                deltas.push(Delta::new(rows, cols));
            }
        }
    }
    for (rows, cols) in [(3, 3), (3, -3), (-3, 3), (-3, -3)] {
        deltas.push(Delta::new(rows, cols));
    }
    deltas
}

/// Move template for a kind: each entry is a displacement plus whether the
/// halfway square must be clear.
fn move_deltas(owner: PlayerId, kind: PieceKind) -> Vec<(Delta, bool)> {
    let mut deltas: Vec<(Delta, bool)> = Vec::new();
    let steps = |deltas: &mut Vec<(Delta, bool)>| {
        for rows in -1..=1i8 {
            for cols in -1..=1i8 {
                if rows != 0 || cols != 0 {
                    deltas.push((Delta::new(rows, cols), false));
                }
            }
        }
    };
    match kind {
        PieceKind::King => steps(&mut deltas),
        PieceKind::Mage => {
            for rows in -2..=2i8 {
                for cols in -2..=2i8 {
                    if rows != 0 || cols != 0 {
                        deltas.push((Delta::new(rows, cols), false));
                    }
                }
            }
        }
        PieceKind::Pawn => {
            steps(&mut deltas);
            // Two forward, leaping the square directly ahead.
            let forward = if owner == PlayerId::new(0) { 2 } else { -2 };
            deltas.push((Delta::new(forward, 0), true));
        }
        PieceKind::Warrior => {
            steps(&mut deltas);
            for delta in [
                Delta::new(2, 0),
                Delta::new(-2, 0),
                Delta::new(0, 2),
                Delta::new(0, -2),
            ] {
                deltas.push((delta, true));
            }
        }
        PieceKind::Assassin => {
            steps(&mut deltas);
            for rows in [-2, 2i8] {
                for cols in [-2, 2i8] {
                    deltas.push((Delta::new(rows, cols), false));
                }
            }
            for rows in [-3, 3i8] {
                for cols in [-3, 3i8] {
                    deltas.push((Delta::new(rows, cols), false));
                }
            }
        }
    }
    deltas
}

/// Ability reach for a kind.
fn ability_deltas(kind: PieceKind) -> Vec<Delta> {
    let radius: i8 = match kind {
        PieceKind::Mage => 2,
        PieceKind::King | PieceKind::Pawn | PieceKind::Warrior | PieceKind::Assassin => 1,
    };
    let mut deltas = Vec::new();
    for rows in -radius..=radius {
        for cols in -radius..=radius {
            if rows != 0 || cols != 0 {
                deltas.push(Delta::new(rows, cols));
            }
        }
    }
    deltas
}

impl RuleTables {
    /// Build the standard tables.
    #[must_use]
    pub fn standard() -> Self {
        let grid = Grid::new(SIZE, SIZE);
        let codec = ActionCodec::displacement(grid, &codec_template(), true);

        let entries = 2 * KIND_COUNT * grid.square_count();
        let mut move_targets = vec![SmallVec::new(); entries];
        let mut ability_targets = vec![SmallVec::new(); entries];

        for owner in PlayerId::all(2) {
            for kind in PieceKind::ALL {
                let moves = move_deltas(owner, kind);
                let abilities = ability_deltas(kind);
                for src in grid.squares() {
                    let slot = Self::entry_index(grid, owner, kind, src);
                    for &(delta, checked) in &moves {
                        if let Some(dst) = grid.square_at(Coords::from(src) + delta) {
                            let via = checked
                                .then(|| grid.square_at(Coords::from(src) + delta.midpoint()))
                                .flatten();
                            move_targets[slot].push(MoveSlot { dst, via });
                        }
                    }
                    for &delta in &abilities {
                        if let Some(dst) = grid.square_at(Coords::from(src) + delta) {
                            ability_targets[slot].push(dst);
                        }
                    }
                }
            }
        }

        Self {
            codec,
            move_targets,
            ability_targets,
        }
    }

    fn entry_index(grid: Grid, owner: PlayerId, kind: PieceKind, sq: Square) -> usize {
        (owner.index() * KIND_COUNT + kind.index()) * grid.square_count() + grid.index_of(sq)
    }

    /// The action index codec for this game.
    #[must_use]
    pub fn codec(&self) -> &ActionCodec {
        &self.codec
    }

    /// Squares a kind can move to from `src` on an empty board.
    #[must_use]
    pub fn moves_on_empty(&self, owner: PlayerId, kind: PieceKind, src: Square) -> &[MoveSlot] {
        &self.move_targets[Self::entry_index(self.codec.grid(), owner, kind, src)]
    }

    /// Squares a kind's ability can reach from `src` on an empty board.
    #[must_use]
    pub fn abilities_on_empty(&self, owner: PlayerId, kind: PieceKind, src: Square) -> &[Square] {
        &self.ability_targets[Self::entry_index(self.codec.grid(), owner, kind, src)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_space_size() {
        let tables = RuleTables::standard();
        assert_eq!(tables.codec().action_count(), NUM_ACTIONS);
        assert_eq!(tables.codec().skip_index(), Some(SKIP_INDEX));
    }

    #[test]
    fn test_every_move_target_is_encodable() {
        let tables = RuleTables::standard();
        let grid = tables.codec().grid();
        for owner in PlayerId::all(2) {
            for kind in PieceKind::ALL {
                for src in grid.squares() {
                    for slot in tables.moves_on_empty(owner, kind, src) {
                        assert!(tables.codec().try_encode(src, slot.dst).is_some());
                    }
                }
            }
        }
    }

    #[test]
    fn test_pawn_forward_depends_on_owner() {
        let tables = RuleTables::standard();
        let src = Square::new(3, 3);
        let p0: Vec<_> = tables
            .moves_on_empty(PlayerId::new(0), PieceKind::Pawn, src)
            .iter()
            .filter(|slot| slot.via.is_some())
            .collect();
        assert_eq!(p0, vec![&MoveSlot { dst: Square::new(5, 3), via: Some(Square::new(4, 3)) }]);

        let p1: Vec<_> = tables
            .moves_on_empty(PlayerId::new(1), PieceKind::Pawn, src)
            .iter()
            .filter(|slot| slot.via.is_some())
            .collect();
        assert_eq!(p1, vec![&MoveSlot { dst: Square::new(1, 3), via: Some(Square::new(2, 3)) }]);
    }

    #[test]
    fn test_assassin_leaps_are_unobstructed() {
        let tables = RuleTables::standard();
        let slots = tables.moves_on_empty(PlayerId::new(0), PieceKind::Assassin, Square::new(4, 4));
        assert!(slots.iter().all(|slot| slot.via.is_none()));
        assert!(slots.iter().any(|slot| slot.dst == Square::new(7, 7)));
        assert!(slots.iter().any(|slot| slot.dst == Square::new(1, 1)));
    }

    #[test]
    fn test_corner_lists_are_clipped() {
        let tables = RuleTables::standard();
        let slots = tables.moves_on_empty(PlayerId::new(0), PieceKind::King, Square::new(0, 0));
        assert_eq!(slots.len(), 3);
        let reach = tables.abilities_on_empty(PlayerId::new(0), PieceKind::Mage, Square::new(0, 0));
        assert_eq!(reach.len(), 8);
    }
}
