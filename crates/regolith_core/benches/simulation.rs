//! Simulation benchmarks for regolith_core.
//!
//! Run with: `cargo bench -p regolith_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use regolith_core::costs::scaled_cost;
use regolith_core::ideology::rank_band;
use regolith_core::math::Fixed;
use regolith_test_utils::fixtures::{run_ticks, standard_simulation};

/// Single ticks on a fresh game and on one with busy programs.
pub fn tick_benchmark(c: &mut Criterion) {
    c.bench_function("advance_tick_fresh", |b| {
        b.iter_batched(
            standard_simulation,
            |mut sim| black_box(sim.advance_tick()),
            BatchSize::SmallInput,
        )
    });

    let mut busy = standard_simulation();
    let catalog = busy.catalog().clone();
    for name in ["Sell Cloud Compute", "Gather Regolith", "Sell Regolith"] {
        if let Some(id) = catalog.command_id(name) {
            let _ = busy.append_program_command(0, id);
        }
    }
    run_ticks(&mut busy, 3_000);
    c.bench_function("advance_tick_midgame", |b| {
        b.iter_batched(
            || busy.clone(),
            |mut sim| black_box(sim.advance_tick()),
            BatchSize::SmallInput,
        )
    });

    c.bench_function("advance_1000_ticks", |b| {
        b.iter_batched(
            standard_simulation,
            |mut sim| {
                run_ticks(&mut sim, 1_000);
                black_box(sim.state_hash())
            },
            BatchSize::SmallInput,
        )
    });
}

/// Cost formulas evaluated by the presentation layer every frame.
pub fn cost_benchmark(c: &mut Criterion) {
    let base = Fixed::from_num(50);
    let scaling = Fixed::from_num(1.15);
    c.bench_function("scaled_cost_50_owned", |b| {
        b.iter(|| scaled_cost(black_box(base), black_box(scaling), black_box(50), Fixed::ONE))
    });

    let score = Fixed::from_num(1_000_000);
    c.bench_function("rank_band_large_score", |b| {
        b.iter(|| rank_band(black_box(score), Fixed::from_num(100), Fixed::from_num(2)))
    });
}

criterion_group!(benches, tick_benchmark, cost_benchmark);
criterion_main!(benches);
