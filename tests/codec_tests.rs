//! Codec bijection properties over the full index space.

use std::sync::OnceLock;

use proptest::prelude::*;

use rust_bge::{ActionCodec, Coords, DecodedAction, Delta, Grid, Square};

/// The skirmish displacement template: the 5x5 neighborhood minus the
/// origin plus four extended diagonal leaps.
fn skirmish_template() -> Vec<Delta> {
    let mut deltas = Vec::new();
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

fn displacement_codec() -> &'static ActionCodec {
    static CODEC: OnceLock<ActionCodec> = OnceLock::new();
    CODEC.get_or_init(|| ActionCodec::displacement(Grid::new(8, 8), &skirmish_template(), true))
}

fn rank_file_codec() -> &'static ActionCodec {
    static CODEC: OnceLock<ActionCodec> = OnceLock::new();
    CODEC.get_or_init(|| ActionCodec::rank_file(Grid::new(7, 7)))
}

#[test]
fn displacement_space_is_dense_and_sized() {
    let codec = displacement_codec();
    assert_eq!(codec.action_count(), 64 * 28 + 1);
    assert_eq!(codec.skip_index(), Some(64 * 28));
}

#[test]
fn every_template_pair_round_trips() {
    let codec = displacement_codec();
    let grid = codec.grid();
    let mut on_board = 0;
    for src in grid.squares() {
        for &delta in &skirmish_template() {
            let Some(dst) = grid.square_at(Coords::from(src) + delta) else {
                continue;
            };
            on_board += 1;
            let index = codec.encode(src, dst);
            assert_eq!(codec.decode(index), DecodedAction::Move { src, dst });
        }
    }
    // Sanity: a meaningful share of the space is on-board.
    assert!(on_board > 1000);
}

#[test]
fn rank_file_pairs_round_trip() {
    let codec = rank_file_codec();
    let grid = codec.grid();
    for src in grid.squares() {
        for dst in grid.squares() {
            if dst == src || (dst.row != src.row && dst.col != src.col) {
                assert_eq!(codec.try_encode(src, dst), None);
            } else {
                let index = codec.encode(src, dst);
                assert_eq!(codec.decode(index), DecodedAction::Move { src, dst });
            }
        }
    }
}

proptest! {
    /// Any in-range index either decodes to a move that encodes back to
    /// the same index, is the skip slot, or is a dead slot.
    #[test]
    fn decode_then_encode_is_identity(index in 0usize..64 * 28 + 1) {
        let codec = displacement_codec();
        match codec.try_decode(index) {
            Some(DecodedAction::Move { src, dst }) => {
                prop_assert_eq!(codec.encode(src, dst), index);
            }
            Some(DecodedAction::Skip) => prop_assert_eq!(index, 64 * 28),
            None => {}
        }
    }

    /// Encodable pairs always survive a round trip on the rank-file codec.
    #[test]
    fn rank_file_round_trip(row in 0u8..7, col in 0u8..7, target in 0u8..7, horizontal: bool) {
        let codec = rank_file_codec();
        let src = Square::new(row, col);
        let dst = if horizontal {
            Square::new(row, target)
        } else {
            Square::new(target, col)
        };
        match codec.try_encode(src, dst) {
            Some(index) => {
                prop_assert_ne!(src, dst);
                prop_assert_eq!(codec.decode(index), DecodedAction::Move { src, dst });
            }
            None => prop_assert_eq!(src, dst),
        }
    }
}
