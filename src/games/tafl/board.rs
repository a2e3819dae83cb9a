//! The 7x7 tafl board: rook-like movement, restricted squares, and
//! custodian capture.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Coords, Delta, Grid, PlayerId, Square};

/// Board width and height.
pub const SIZE: u8 = 7;

/// The attacking side moves first.
pub const ATTACKER: PlayerId = PlayerId(0);

/// The king's side.
pub const DEFENDER: PlayerId = PlayerId(1);

/// The central throne square.
pub const THRONE: Square = Square::new(3, 3);

/// Piece kinds on a tafl board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaflPiece {
    King,
    Defender,
    Attacker,
}

impl TaflPiece {
    /// The player this piece fights for.
    #[must_use]
    pub fn owner(self) -> PlayerId {
        match self {
            TaflPiece::King | TaflPiece::Defender => DEFENDER,
            TaflPiece::Attacker => ATTACKER,
        }
    }

    /// Canonical tensor plane for this piece kind.
    #[must_use]
    pub fn layer(self) -> usize {
        match self {
            TaflPiece::King => 0,
            TaflPiece::Defender => 1,
            TaflPiece::Attacker => 2,
        }
    }

    fn glyph(self) -> char {
        match self {
            TaflPiece::King => 'K',
            TaflPiece::Defender => 'D',
            TaflPiece::Attacker => 'a',
        }
    }
}

/// Capture record: which square lost which piece.
pub type Captures = SmallVec<[(Square, TaflPiece); 3]>;

/// Piece placement for the 7x7 game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaflBoard {
    cells: [Option<TaflPiece>; (SIZE as usize) * (SIZE as usize)],
}

impl TaflBoard {
    pub(crate) fn grid() -> Grid {
        Grid::new(SIZE, SIZE)
    }

    pub(crate) fn empty() -> Self {
        Self {
            cells: [None; (SIZE as usize) * (SIZE as usize)],
        }
    }

    /// The standard starting position: king on the throne, four adjacent
    /// defenders, eight attackers in the cross arms.
    #[must_use]
    pub fn standard() -> Self {
        let mut board = Self::empty();
        board.place(THRONE, TaflPiece::King);
        for sq in [(2, 3), (3, 2), (4, 3), (3, 4)] {
            board.place(Square::new(sq.0, sq.1), TaflPiece::Defender);
        }
        for sq in [(0, 3), (1, 3), (3, 0), (3, 1), (5, 3), (6, 3), (3, 5), (3, 6)] {
            board.place(Square::new(sq.0, sq.1), TaflPiece::Attacker);
        }
        board
    }

    pub(crate) fn place(&mut self, sq: Square, piece: TaflPiece) {
        let cell = Self::grid().index_of(sq);
        debug_assert!(self.cells[cell].is_none(), "square already occupied");
        self.cells[cell] = Some(piece);
    }

    /// The piece on `sq`, if any.
    #[must_use]
    pub fn at(&self, sq: Square) -> Option<TaflPiece> {
        self.cells[Self::grid().index_of(sq)]
    }

    fn take(&mut self, sq: Square) -> Option<TaflPiece> {
        self.cells[Self::grid().index_of(sq)].take()
    }

    /// Whether `sq` is one of the four corner escape squares.
    #[must_use]
    pub fn is_corner(sq: Square) -> bool {
        let edge = SIZE - 1;
        (sq.row == 0 || sq.row == edge) && (sq.col == 0 || sq.col == edge)
    }

    /// Whether `sq` is restricted to the king (throne or corner).
    #[must_use]
    pub fn is_restricted(sq: Square) -> bool {
        sq == THRONE || Self::is_corner(sq)
    }

    /// Whether `sq` acts as a capturing partner: corners always, the
    /// throne only while empty.
    fn is_hostile(&self, sq: Square) -> bool {
        Self::is_corner(sq) || (sq == THRONE && self.at(THRONE).is_none())
    }

    /// Where the king currently stands, if it is still on the board.
    #[must_use]
    pub fn king_square(&self) -> Option<Square> {
        Self::grid()
            .squares()
            .find(|&sq| self.at(sq) == Some(TaflPiece::King))
    }

    /// Legal destinations for the piece on `src`: any distance along a
    /// rank or file through empty squares. Restricted squares block
    /// non-king pieces entirely; the king may enter them.
    #[must_use]
    pub fn moves_from(&self, src: Square) -> SmallVec<[Square; 12]> {
        let mut moves = SmallVec::new();
        let Some(piece) = self.at(src) else {
            return moves;
        };
        let grid = Self::grid();
        for (dr, dc) in [(1i8, 0i8), (-1, 0), (0, 1), (0, -1)] {
            let mut pos = Coords::from(src);
            loop {
                pos = Coords::new(pos.row + dr, pos.col + dc);
                let Some(sq) = grid.square_at(pos) else {
                    break;
                };
                if self.at(sq).is_some() {
                    break;
                }
                if Self::is_restricted(sq) && piece != TaflPiece::King {
                    break;
                }
                moves.push(sq);
            }
        }
        moves
    }

    /// Whether `side` has at least one legal move.
    #[must_use]
    pub fn side_has_moves(&self, side: PlayerId) -> bool {
        Self::grid().squares().any(|sq| {
            self.at(sq).is_some_and(|piece| piece.owner() == side) && !self.moves_from(sq).is_empty()
        })
    }

    /// Move the piece on `src` to `dst` and resolve custodian captures
    /// around the destination: an enemy piece orthogonally adjacent to
    /// `dst` falls when the square directly beyond it holds a friendly
    /// piece or is hostile. The king is captured like any other piece.
    ///
    /// Contract: the move must be legal per [`moves_from`](Self::moves_from).
    pub(crate) fn apply_move(&mut self, src: Square, dst: Square) -> Captures {
        let grid = Self::grid();
        let piece = self.take(src).expect("no piece on move source");
        debug_assert!(self.at(dst).is_none(), "destination occupied");
        self.place(dst, piece);

        let mut captures = Captures::new();
        for (dr, dc) in [(1i8, 0i8), (-1, 0), (0, 1), (0, -1)] {
            let delta = Delta::new(dr, dc);
            let Some(neighbor) = grid.square_at(Coords::from(dst) + delta) else {
                continue;
            };
            let Some(victim) = self.at(neighbor) else {
                continue;
            };
            if victim.owner() == piece.owner() {
                continue;
            }
            let Some(beyond) = grid.square_at(Coords::from(neighbor) + delta) else {
                continue;
            };
            let supported = self
                .at(beyond)
                .is_some_and(|ally| ally.owner() == piece.owner())
                || self.is_hostile(beyond);
            if supported {
                self.take(neighbor);
                captures.push((neighbor, victim));
            }
        }
        captures
    }

    /// Undo one [`apply_move`](Self::apply_move) given its capture record.
    pub(crate) fn undo_move(&mut self, src: Square, dst: Square, captures: &Captures) {
        let piece = self.take(dst).expect("no piece on undo destination");
        self.place(src, piece);
        for &(sq, victim) in captures {
            self.place(sq, victim);
        }
    }

    /// Board contents serialized for position keys.
    #[must_use]
    pub fn key_cells(&self) -> Vec<u8> {
        self.cells
            .iter()
            .map(|cell| cell.map_or(0, |piece| piece.layer() as u8 + 1))
            .collect()
    }

    /// The board remapped square-by-square through `transform`.
    #[must_use]
    pub fn transformed(&self, transform: impl Fn(Square) -> Square) -> Self {
        let mut out = Self::empty();
        for sq in Self::grid().squares() {
            if let Some(piece) = self.at(sq) {
                out.place(transform(sq), piece);
            }
        }
        out
    }

    /// Human-readable dump (debug only).
    #[must_use]
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for row in (0..SIZE).rev() {
            out.push((b'1' + row) as char);
            out.push(' ');
            for col in 0..SIZE {
                let sq = Square::new(row, col);
                match self.at(sq) {
                    Some(piece) => out.push(piece.glyph()),
                    None if Self::is_restricted(sq) => out.push('x'),
                    None => out.push('.'),
                }
            }
            out.push('\n');
        }
        out.push_str("  abcdefg\n");
        out
    }
}
