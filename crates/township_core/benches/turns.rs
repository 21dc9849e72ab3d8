//! Turn throughput benchmarks for township_core.
//!
//! Run with: `cargo bench -p township_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use township_core::prelude::*;

const CONTENT: &str = include_str!("../../../assets/data/content.ron");

/// A game with every free field of a 32x32 map covered in houses.
fn crowded_game() -> GameState {
    let pack = ContentPack::from_ron_str(CONTENT).expect("shipped content parses");
    let config = GameConfig::default().with_map_size(32, 32);
    let mut game = GameState::from_content(&config, &pack)
        .expect("shipped content is valid")
        .with_map(GridMap::filled(32, 32, Terrain::Plains))
        .with_actions_per_turn(u32::MAX)
        .with_resources(Resources::new(i64::MAX / 2, 0));

    for y in 0..32 {
        for x in 0..32 {
            let _ = game.build(0, x, y);
        }
    }
    game
}

/// Benchmarks `end_turn` with a full map and the shipped event set.
pub fn end_turn_benchmark(c: &mut Criterion) {
    c.bench_function("end_turn_1024_buildings", |b| {
        b.iter_batched(
            crowded_game,
            |mut game| {
                for _ in 0..10 {
                    while game.get_next_event().is_some() {}
                    black_box(game.end_turn().ok());
                }
                game
            },
            BatchSize::LargeInput,
        );
    });

    c.bench_function("state_hash_1024_buildings", |b| {
        let game = crowded_game();
        b.iter(|| black_box(game.state_hash()));
    });
}

criterion_group!(benches, end_turn_benchmark);
criterion_main!(benches);
