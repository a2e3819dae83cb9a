//! Transactional action resolution.
//!
//! A turn is resolved in three phases on the single mutable game object:
//!
//! 1. decode the chosen index and speculatively apply the primary move;
//! 2. try every useful ability with make/undo pairs, keeping the one with
//!    the strictly greatest position value for the acting side (ties keep
//!    the first candidate in enumeration order);
//! 3. undo the speculative move and commit the combined turn atomically.
//!
//! The undo in phase 3 matters: the combined commit updates move history
//! and the turn counter on the assumption that it drives the transition
//! from the clean pre-turn state, not from a partially applied one.
//! Finding no useful ability is a normal outcome, resolved as "no
//! ability", never an error.

use crate::codec::DecodedAction;

use super::board::{SkirmishBoard, TurnAction};
use super::movegen::useful_abilities;
use super::tables::RuleTables;

/// Run phases 1 and 2, then roll the board back to its pre-turn state and
/// return the combined action that `resolve` would commit.
pub(crate) fn choose(board: &mut SkirmishBoard, tables: &RuleTables, index: usize) -> TurnAction {
    #[cfg(debug_assertions)]
    let entry_key = board.position_key();

    let mv = match tables.codec().decode(index) {
        DecodedAction::Skip => None,
        DecodedAction::Move { src, dst } => Some((src, dst)),
    };
    let move_undo = mv.map(|(src, dst)| board.make_move(src, dst));

    let actor = board.to_move();
    let mut best = None;
    let mut best_value = f32::NEG_INFINITY;
    for (src, dst) in useful_abilities(board, tables) {
        let undo = board.make_ability(src, dst);
        let value = board.position_value(actor);
        if value > best_value {
            best_value = value;
            best = Some((src, dst));
        }
        board.undo_ability(undo);
    }

    if let Some(undo) = move_undo {
        board.undo_move(undo);
    }

    #[cfg(debug_assertions)]
    debug_assert_eq!(
        board.position_key(),
        entry_key,
        "make/undo must exactly restore the pre-turn position"
    );

    TurnAction { mv, ability: best }
}

/// Resolve and commit the action for `index`, leaving the board in its
/// final post-turn state. Returns the committed combined action.
pub(crate) fn resolve(board: &mut SkirmishBoard, tables: &RuleTables, index: usize) -> TurnAction {
    let action = choose(board, tables, index);
    board.apply_turn(&action);
    action
}
