//! Mask generation and playout throughput.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rust_bge::{GameEngine, SkirmishConfig, SkirmishGame, TaflConfig, TaflGame};

fn bench_masks(c: &mut Criterion) {
    let skirmish = SkirmishGame::new(SkirmishConfig::default());
    c.bench_function("skirmish_legal_mask", |b| {
        b.iter(|| black_box(skirmish.legal_action_mask()))
    });

    let tafl = TaflGame::new(TaflConfig::default());
    c.bench_function("tafl_legal_mask", |b| {
        b.iter(|| black_box(tafl.legal_action_mask()))
    });
}

fn bench_playout(c: &mut Criterion) {
    c.bench_function("tafl_first_legal_playout", |b| {
        b.iter(|| {
            let mut game = TaflGame::new(TaflConfig::default());
            while game.scores().is_none() {
                let index = game
                    .legal_action_mask()
                    .iter()
                    .position(|&legal| legal)
                    .unwrap();
                game.apply_action(index);
            }
            black_box(game.current_turn())
        })
    });
}

criterion_group!(benches, bench_masks, bench_playout);
criterion_main!(benches);
