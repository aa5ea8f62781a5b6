//! Criterion micro-benchmarks for the adjacent-sum stencil.

use criterion::{criterion_group, criterion_main, Criterion};
use eddy_bench::{reference_grid, stress_grid};
use eddy_core::StencilConfig;
use eddy_ops::{sum_adjacent_vectors, update_grid_with_adjacent_sum};
use std::hint::black_box;

/// Benchmark: one whole-grid pass on 16K cells, flags off.
fn bench_update_16k(c: &mut Criterion) {
    let cfg = StencilConfig::default();
    let grid = reference_grid().unwrap();

    c.bench_function("stencil_update_16k", |b| {
        b.iter_batched_ref(
            || grid.clone(),
            |g| {
                update_grid_with_adjacent_sum(g, None, &cfg);
            },
            criterion::BatchSize::LargeInput,
        );
    });
}

/// Benchmark: one whole-grid pass on ~262K cells with normalization.
fn bench_update_262k_normalized(c: &mut Criterion) {
    let cfg = StencilConfig::builder()
        .enable_normalization(true)
        .build()
        .unwrap();
    let grid = stress_grid().unwrap();

    c.bench_function("stencil_update_262k_normalized", |b| {
        b.iter_batched_ref(
            || grid.clone(),
            |g| {
                update_grid_with_adjacent_sum(g, None, &cfg);
            },
            criterion::BatchSize::LargeInput,
        );
    });
}

/// Benchmark: per-cell sums over every cell of a 16K grid.
fn bench_point_sum_16k(c: &mut Criterion) {
    let cfg = StencilConfig::default();
    let grid = reference_grid().unwrap();

    c.bench_function("stencil_point_sum_16k", |b| {
        b.iter(|| {
            for y in 0..128i64 {
                for x in 0..128i64 {
                    black_box(sum_adjacent_vectors(&grid, x, y, None, &cfg));
                }
            }
        });
    });
}

criterion_group!(
    benches,
    bench_update_16k,
    bench_update_262k_normalized,
    bench_point_sum_16k
);
criterion_main!(benches);
