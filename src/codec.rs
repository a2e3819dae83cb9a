//! Action index codec: the bijection between flat action indices and
//! `(source, destination)` square pairs.
//!
//! The index space is dense and rectangular: every source square owns the
//! same number of slots, one per entry of the game's movement template,
//! whether or not the slot's destination exists on the board. Off-board
//! (and degenerate same-square) slots keep their index so the layout never
//! shifts, but they are never reported legal and decode to nothing. Games
//! with a skip action reserve the final index for it.
//!
//! Both lookup directions are precomputed once at construction and are
//! mutual inverses over every on-board pair.

use serde::{Deserialize, Serialize};

use crate::core::{Coords, Delta, Grid, Square};

/// Sentinel for "no slot" entries in the reverse table.
const NO_SLOT: u32 = u32::MAX;

/// A decoded action: either a source/destination move or the skip action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecodedAction {
    Move { src: Square, dst: Square },
    Skip,
}

/// Bijective mapping between flat indices and move endpoints.
#[derive(Clone, Debug)]
pub struct ActionCodec {
    grid: Grid,
    slots_per_square: usize,
    skip: Option<usize>,
    /// index -> endpoints, `None` for off-board / degenerate slots.
    forward: Vec<Option<(Square, Square)>>,
    /// src index * square_count + dst index -> flat index.
    reverse: Vec<u32>,
}

impl ActionCodec {
    /// Build a codec from an explicit displacement template.
    ///
    /// Each source square gets one slot per delta, in template order. When
    /// `with_skip` is set the final index of the space is reserved for the
    /// skip action.
    #[must_use]
    pub fn displacement(grid: Grid, deltas: &[Delta], with_skip: bool) -> Self {
        let slots = deltas.len();
        let mut codec = Self::empty(grid, slots, with_skip);
        for src in grid.squares() {
            let base = grid.index_of(src) * slots;
            for (n, &delta) in deltas.iter().enumerate() {
                codec.assign(base + n, src, Coords::from(src) + delta);
            }
        }
        codec
    }

    /// Build a rank-and-file codec: per source square, one slot per target
    /// column in the same row followed by one per target row in the same
    /// column. The same-square slots are degenerate and never legal.
    #[must_use]
    pub fn rank_file(grid: Grid) -> Self {
        let slots = grid.width as usize + grid.height as usize;
        let mut codec = Self::empty(grid, slots, false);
        for src in grid.squares() {
            let base = grid.index_of(src) * slots;
            for col in 0..grid.width {
                if col != src.col {
                    codec.assign(
                        base + col as usize,
                        src,
                        Coords::new(src.row as i8, col as i8),
                    );
                }
            }
            for row in 0..grid.height {
                if row != src.row {
                    codec.assign(
                        base + grid.width as usize + row as usize,
                        src,
                        Coords::new(row as i8, src.col as i8),
                    );
                }
            }
        }
        codec
    }

    fn empty(grid: Grid, slots_per_square: usize, with_skip: bool) -> Self {
        let move_slots = grid.square_count() * slots_per_square;
        Self {
            grid,
            slots_per_square,
            skip: with_skip.then_some(move_slots),
            forward: vec![None; move_slots],
            reverse: vec![NO_SLOT; grid.square_count() * grid.square_count()],
        }
    }

    fn assign(&mut self, index: usize, src: Square, dst: Coords) {
        if let Some(dst) = self.grid.square_at(dst) {
            self.forward[index] = Some((src, dst));
            self.reverse[self.grid.index_of(src) * self.grid.square_count()
                + self.grid.index_of(dst)] = index as u32;
        }
    }

    /// The board geometry this codec was built for.
    #[must_use]
    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Total size of the flat action space, skip slot included.
    #[must_use]
    pub fn action_count(&self) -> usize {
        self.forward.len() + usize::from(self.skip.is_some())
    }

    /// The reserved skip index, if this game has one.
    #[must_use]
    pub fn skip_index(&self) -> Option<usize> {
        self.skip
    }

    /// Decode a flat index.
    ///
    /// Panics on an index outside `[0, action_count)` or on a slot with no
    /// on-board destination: callers must only decode indices that were
    /// reported legal.
    #[must_use]
    pub fn decode(&self, index: usize) -> DecodedAction {
        assert!(index < self.action_count(), "action index {index} out of range");
        self.try_decode(index)
            .unwrap_or_else(|| panic!("action index {index} has no on-board destination"))
    }

    /// Decode a flat index, returning `None` for off-board / degenerate
    /// slots. Panics on an out-of-range index.
    #[must_use]
    pub fn try_decode(&self, index: usize) -> Option<DecodedAction> {
        assert!(index < self.action_count(), "action index {index} out of range");
        if Some(index) == self.skip {
            return Some(DecodedAction::Skip);
        }
        self.forward[index].map(|(src, dst)| DecodedAction::Move { src, dst })
    }

    /// Encode a source/destination pair.
    ///
    /// Panics when the destination is not reachable from the source under
    /// this codec's template.
    #[must_use]
    pub fn encode(&self, src: Square, dst: Square) -> usize {
        self.try_encode(src, dst)
            .unwrap_or_else(|| panic!("no action slot for {src} -> {dst}"))
    }

    /// Encode a source/destination pair if the template covers it.
    #[must_use]
    pub fn try_encode(&self, src: Square, dst: Square) -> Option<usize> {
        let slot = self.reverse
            [self.grid.index_of(src) * self.grid.square_count() + self.grid.index_of(dst)];
        (slot != NO_SLOT).then_some(slot as usize)
    }
}
