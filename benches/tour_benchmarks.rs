//! Tour construction benchmarks.
//!
//! Run with: cargo bench --bench tour_benchmarks

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tourviz::prelude::*;

fn board(count: usize) -> Board {
    let config = VizConfig::builder().seed(42).random_count(count).build();
    Board::from_config(&config).unwrap_or_else(|e| panic!("bench config invalid: {e}"))
}

/// Full matrix rebuild, as done on every city edit.
fn bench_cost_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("cost_matrix");
    group.sample_size(100);

    for n in [10, 25, 50] {
        let cities = board(n).cities().to_vec();
        group.bench_with_input(BenchmarkId::new("from_cities", n), &cities, |b, cities| {
            b.iter(|| black_box(CostMatrix::from_cities(cities)));
        });
    }

    group.finish();
}

/// Greedy construction without the scheduler.
fn bench_nearest_neighbor(c: &mut Criterion) {
    let mut group = c.benchmark_group("nearest_neighbor");
    group.sample_size(100);

    for n in [10, 25, 50] {
        let matrix = Arc::clone(board(n).matrix());
        group.bench_with_input(BenchmarkId::new("tour", n), &matrix, |b, matrix| {
            b.iter(|| black_box(nearest_neighbor_tour(Arc::clone(matrix), 0)));
        });
    }

    group.finish();
}

/// Scheduler-driven solve on the virtual clock, one tick per step.
fn bench_scheduled_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("scheduled_solve");
    group.sample_size(50);

    for n in [10, 50] {
        let matrix = Arc::clone(board(n).matrix());
        group.bench_with_input(BenchmarkId::new("run_until_settled", n), &matrix, |b, matrix| {
            b.iter(|| {
                let mut scheduler = StepScheduler::default();
                let _ = scheduler.start(Arc::clone(matrix), 0, &mut NullObserver);
                scheduler.run_until_settled(&mut NullObserver);
                black_box(scheduler.distance())
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_cost_matrix,
    bench_nearest_neighbor,
    bench_scheduled_solve
);
criterion_main!(benches);
