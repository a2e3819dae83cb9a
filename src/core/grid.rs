//! Board geometry: squares, hypothetical coordinates, and displacements.
//!
//! `Square` always refers to a location on the board. `Coords` is the
//! unbounded variant used while applying displacements, so off-board
//! results are representable and can be filtered instead of wrapping.

use serde::{Deserialize, Serialize};

/// A location on the board. Row and column are 0-based.
///
/// Only construct `Square`s for positions that exist on the board in use;
/// use [`Coords`] for hypothetical locations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Square {
    pub row: u8,
    pub col: u8,
}

impl Square {
    /// Create a new square with the given row and column.
    #[must_use]
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", (self.col + b'a') as char, self.row + 1)
    }
}

/// An unbounded row-column pair, possibly off the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Coords {
    pub row: i8,
    pub col: i8,
}

impl Coords {
    #[must_use]
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }
}

impl From<Square> for Coords {
    fn from(sq: Square) -> Self {
        Self {
            row: sq.row as i8,
            col: sq.col as i8,
        }
    }
}

/// A signed row/column displacement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Delta {
    pub rows: i8,
    pub cols: i8,
}

impl Delta {
    #[must_use]
    pub const fn new(rows: i8, cols: i8) -> Self {
        Self { rows, cols }
    }

    /// The displacement halved, for two-step slots whose intervening
    /// square must be checked. Only meaningful for even displacements.
    #[must_use]
    pub const fn midpoint(self) -> Delta {
        Delta::new(self.rows / 2, self.cols / 2)
    }
}

impl std::ops::Add<Delta> for Coords {
    type Output = Coords;

    fn add(self, rhs: Delta) -> Coords {
        Coords::new(self.row + rhs.rows, self.col + rhs.cols)
    }
}

/// Rectangular board dimensions with index arithmetic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub width: u8,
    pub height: u8,
}

impl Grid {
    #[must_use]
    pub const fn new(width: u8, height: u8) -> Self {
        Self { width, height }
    }

    /// Total number of squares.
    #[must_use]
    pub const fn square_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Whether the coordinates fall on the board.
    #[must_use]
    pub const fn contains(self, c: Coords) -> bool {
        c.row >= 0 && c.col >= 0 && (c.row as u8) < self.height && (c.col as u8) < self.width
    }

    /// Convert coordinates to a square if they are on the board.
    #[must_use]
    pub fn square_at(self, c: Coords) -> Option<Square> {
        self.contains(c).then(|| Square::new(c.row as u8, c.col as u8))
    }

    /// Row-major flat index of a square.
    #[must_use]
    pub const fn index_of(self, sq: Square) -> usize {
        sq.row as usize * self.width as usize + sq.col as usize
    }

    /// Iterate all squares in row-major order.
    pub fn squares(self) -> impl Iterator<Item = Square> {
        let (w, h) = (self.width, self.height);
        (0..h).flat_map(move |row| (0..w).map(move |col| Square::new(row, col)))
    }
}
