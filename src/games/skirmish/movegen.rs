//! Legal move and useful-ability generation.
//!
//! Both generators walk the precomputed empty-board tables and filter
//! against the live position: destinations must be empty, leap slots need
//! their `via` square clear, and ability candidates must point at a piece
//! whose relationship to the actor matches the kind's target rule.

use crate::core::Square;

use super::board::SkirmishBoard;
use super::tables::{RuleTables, SKIP_INDEX};

/// Full-width legality mask over the flat action space.
///
/// When the side to move has no legal piece move, the skip slot becomes
/// the sole legal action, so the mask always has at least one set bit.
pub(crate) fn legal_action_mask(board: &SkirmishBoard, tables: &RuleTables) -> Vec<bool> {
    let mut mask = vec![false; tables.codec().action_count()];
    let mut found = false;
    for piece in board.pieces() {
        if !piece.is_alive() || piece.owner != board.to_move() {
            continue;
        }
        for slot in tables.moves_on_empty(piece.owner, piece.kind, piece.square) {
            if board.piece_at(slot.dst).is_some() {
                continue;
            }
            if slot.via.is_some_and(|via| board.piece_at(via).is_some()) {
                continue;
            }
            mask[tables.codec().encode(piece.square, slot.dst)] = true;
            found = true;
        }
    }
    if !found {
        mask[SKIP_INDEX] = true;
    }
    mask
}

/// Every useful ability for the side to move, in deterministic
/// enumeration order (roster order, then table order).
///
/// An ability is useful only when its target square holds a piece and the
/// actor kind's target rule admits that piece; anything else cannot change
/// the game state and is pruned here.
pub(crate) fn useful_abilities(board: &SkirmishBoard, tables: &RuleTables) -> Vec<(Square, Square)> {
    let actor = board.to_move();
    if !board.king_alive(actor) {
        return Vec::new();
    }
    let mut candidates = Vec::new();
    for piece in board.pieces() {
        if !piece.is_alive() || piece.owner != actor {
            continue;
        }
        let rule = piece.kind.target_rule();
        for &dst in tables.abilities_on_empty(piece.owner, piece.kind, piece.square) {
            if let Some(target) = board.piece_at(dst) {
                if rule.allows(actor, target.owner) {
                    candidates.push((piece.square, dst));
                }
            }
        }
    }
    candidates
}
