//! Tafl integration tests: the Brandubh-style scenario, repetition,
//! interning and symmetry closure.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use rust_bge::games::tafl::{Symmetry, ATTACKER, DEFENDER, SIZE, THRONE};
use rust_bge::{
    ActionCodec, DecodedAction, GameEngine, Grid, RepetitionOutcome, Square, TaflConfig, TaflGame,
};

// =============================================================================
// Brandubh Scenario
// =============================================================================

#[test]
fn test_brandubh_start_contract() {
    let game = TaflGame::new(TaflConfig::default());

    // King at center, 4 defenders adjacent, 8 attackers on the cross.
    assert_eq!(game.board().at(THRONE).map(|p| p.owner()), Some(DEFENDER));
    assert_eq!(game.current_player(), ATTACKER);

    let mask = game.legal_action_mask();
    assert!(mask.iter().any(|&legal| legal), "first mask must be non-empty");
    for (index, &legal) in mask.iter().enumerate() {
        if !legal {
            continue;
        }
        let DecodedAction::Move { src, dst } = game.codec().decode(index) else {
            panic!("tafl has no skip slot");
        };
        assert_eq!(game.board().at(src).unwrap().owner(), ATTACKER);
        assert!(
            game.board().at(dst).is_none(),
            "mask must not include occupied destinations"
        );
    }
}

// =============================================================================
// Repetition
// =============================================================================

/// Attacker and defender shuttle pieces back and forth; every fourth ply
/// recreates the starting position.
const SHUTTLE: [(Square, Square); 4] = [
    (Square::new(3, 0), Square::new(2, 0)),
    (Square::new(3, 2), Square::new(2, 2)),
    (Square::new(2, 0), Square::new(3, 0)),
    (Square::new(2, 2), Square::new(3, 2)),
];

fn play(game: &mut TaflGame, src: Square, dst: Square) {
    let index = game.codec().encode(src, dst);
    game.apply_action(index);
}

#[test]
fn test_three_position_cycle_triggers_at_exactly_three() {
    let mut game = TaflGame::new(TaflConfig::default());
    assert_eq!(game.repetition_count(), 1);

    for (src, dst) in SHUTTLE {
        assert!(game.scores().is_none(), "terminal before the cycle completed");
        play(&mut game, src, dst);
    }
    assert_eq!(game.repetition_count(), 2);

    for (src, dst) in SHUTTLE {
        assert!(game.scores().is_none(), "terminal before the third occurrence");
        play(&mut game, src, dst);
    }
    assert_eq!(game.repetition_count(), 3);
    assert!(game.scores().expect("threefold is terminal").is_win_for(ATTACKER));
}

#[test]
fn test_repetition_winner_follows_configuration() {
    let mut game =
        TaflGame::new(TaflConfig::default().with_repetition(RepetitionOutcome::Winner(DEFENDER)));
    for _ in 0..2 {
        for (src, dst) in SHUTTLE {
            play(&mut game, src, dst);
        }
    }
    assert!(game.scores().unwrap().is_win_for(DEFENDER));
}

// =============================================================================
// Interning
// =============================================================================

#[test]
fn test_pool_stays_bounded_under_fork_discard() {
    let mut game = TaflGame::new(TaflConfig::default());
    play(&mut game, Square::new(3, 0), Square::new(2, 0));
    let baseline = game.intern_pool().len();

    // Hundreds of forks each explore a short line, then die. The pool
    // must not accumulate their keys.
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for _ in 0..200 {
        let mut fork = game.clone();
        for _ in 0..3 {
            if fork.scores().is_some() {
                break;
            }
            let mask = fork.legal_action_mask();
            let legal: Vec<usize> = mask
                .iter()
                .enumerate()
                .filter_map(|(i, &l)| l.then_some(i))
                .collect();
            let index = *legal.choose(&mut rng).unwrap();
            fork.apply_action(index);
        }
    }

    // One final fork sweeps the last generation's leftovers.
    let _fork = game.clone();
    assert_eq!(game.intern_pool().len(), baseline);
}

// =============================================================================
// Symmetry Closure
// =============================================================================

#[test]
fn test_symmetry_then_inverse_restores_tensor() {
    let mut game = TaflGame::new(TaflConfig::default());
    play(&mut game, Square::new(3, 0), Square::new(2, 0));
    play(&mut game, Square::new(2, 3), Square::new(2, 1));
    let tensor = game.canonical();
    for sym in Symmetry::ALL {
        let there = sym.apply_tensor(&tensor);
        let back = sym.inverse().apply_tensor(&there);
        assert_eq!(back, tensor, "inverse transform must restore the tensor");
    }
}

#[test]
fn test_mask_closure_under_all_symmetries() {
    let codec = ActionCodec::rank_file(Grid::new(SIZE, SIZE));
    let mut game = TaflGame::new(TaflConfig::default());
    play(&mut game, Square::new(3, 0), Square::new(2, 0));

    let mask = game.legal_action_mask();
    let policy: Vec<f32> = mask.iter().map(|&legal| f32::from(u8::from(legal))).collect();

    for sym in Symmetry::ALL {
        let transformed = game
            .board()
            .transformed(|sq| sym.apply(sq, SIZE));
        let mirrored = TaflGame::from_board(TaflConfig::default(), transformed, game.current_player());
        let mirrored_mask = mirrored.legal_action_mask();
        let remapped = sym.remap_policy(&codec, &policy);
        for index in 0..codec.action_count() {
            assert_eq!(
                mirrored_mask[index],
                remapped[index] == 1.0,
                "legality must be preserved by symmetry at index {index}"
            );
        }
    }
}

#[test]
fn test_symmetries_include_identity_and_count() {
    let game = TaflGame::new(TaflConfig::default());
    let policy = vec![1.0 / game.action_count() as f32; game.action_count()];
    let symmetries = game.symmetries(&policy);
    assert_eq!(symmetries.len(), game.symmetry_count());
    assert_eq!(symmetries.len(), 8);
    assert_eq!(symmetries[0].0, game.canonical());
}

// =============================================================================
// Seeded Playouts
// =============================================================================

#[test]
fn test_random_playouts_terminate_coherently() {
    for seed in 0..5 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut game = TaflGame::new(TaflConfig::default());
        while game.scores().is_none() {
            let mask = game.legal_action_mask();
            let legal: Vec<usize> = mask
                .iter()
                .enumerate()
                .filter_map(|(i, &l)| l.then_some(i))
                .collect();
            assert!(!legal.is_empty(), "non-terminal positions have moves");
            let index = *legal.choose(&mut rng).unwrap();
            game.apply_action(index);
        }
        let scores = game.scores().unwrap();
        assert_eq!(scores.values().iter().sum::<f32>(), 1.0);
        assert!(game.current_turn() <= 150);
    }
}
