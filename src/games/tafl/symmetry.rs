//! The dihedral symmetry group of the square board.
//!
//! Each transform is an optional column mirror followed by 0-3 quarter
//! turns. Transforms apply jointly to board squares, canonical tensors and
//! policy vectors; the policy remap routes every move slot through the
//! codec so the index of a move maps to the index of the transformed move.

use crate::codec::{ActionCodec, DecodedAction};
use crate::core::{Square, Tensor};

/// Size of the dihedral group on a square board.
pub const SYMMETRY_COUNT: usize = 8;

/// One board transform: mirror columns, then rotate 90 degrees
/// `rotations` times.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Symmetry {
    rotations: u8,
    flip: bool,
}

impl Symmetry {
    /// All eight transforms; the identity comes first.
    pub const ALL: [Symmetry; SYMMETRY_COUNT] = [
        Symmetry { rotations: 0, flip: false },
        Symmetry { rotations: 1, flip: false },
        Symmetry { rotations: 2, flip: false },
        Symmetry { rotations: 3, flip: false },
        Symmetry { rotations: 0, flip: true },
        Symmetry { rotations: 1, flip: true },
        Symmetry { rotations: 2, flip: true },
        Symmetry { rotations: 3, flip: true },
    ];

    /// The identity transform.
    #[must_use]
    pub fn identity() -> Self {
        Self::ALL[0]
    }

    /// The transform that undoes this one. Mirrored transforms are their
    /// own inverses; pure rotations invert to the complementary rotation.
    #[must_use]
    pub fn inverse(self) -> Self {
        if self.flip {
            self
        } else {
            Symmetry {
                rotations: (4 - self.rotations) % 4,
                flip: false,
            }
        }
    }

    /// Map a square through this transform on a `size` x `size` board.
    #[must_use]
    pub fn apply(self, sq: Square, size: u8) -> Square {
        let mut row = sq.row;
        let mut col = sq.col;
        if self.flip {
            col = size - 1 - col;
        }
        for _ in 0..self.rotations {
            let (new_row, new_col) = (col, size - 1 - row);
            row = new_row;
            col = new_col;
        }
        Square::new(row, col)
    }

    /// Transform every spatial plane of a tensor. The spatial dimensions
    /// must be square.
    #[must_use]
    pub fn apply_tensor(self, tensor: &Tensor) -> Tensor {
        let [channels, height, width] = tensor.shape();
        debug_assert_eq!(height, width, "dihedral transforms need a square board");
        let size = height as u8;
        let mut out = Tensor::zeros(tensor.shape());
        for channel in 0..channels {
            for row in 0..height {
                for col in 0..width {
                    let to = self.apply(Square::new(row as u8, col as u8), size);
                    out.set(
                        channel,
                        to.row as usize,
                        to.col as usize,
                        tensor.get(channel, row, col),
                    );
                }
            }
        }
        out
    }

    /// Relabel a policy vector: the probability of each move slot lands on
    /// the slot of the transformed move. Slots without an on-board
    /// destination carry no probability and are dropped.
    #[must_use]
    pub fn remap_policy(self, codec: &ActionCodec, policy: &[f32]) -> Vec<f32> {
        debug_assert_eq!(policy.len(), codec.action_count());
        let size = codec.grid().height;
        let mut out = vec![0.0; policy.len()];
        for (index, &probability) in policy.iter().enumerate() {
            match codec.try_decode(index) {
                Some(DecodedAction::Move { src, dst }) => {
                    let mapped =
                        codec.encode(self.apply(src, size), self.apply(dst, size));
                    out[mapped] = probability;
                }
                Some(DecodedAction::Skip) => out[index] = probability,
                None => {}
            }
        }
        out
    }
}
