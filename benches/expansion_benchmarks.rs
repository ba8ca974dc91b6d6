use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;

use detscale::determinant::{ParallelCoordinator, determinant};
use detscale::matrix::{GeneratedMatrixSource, Matrix, MatrixSource};
use detscale::parallel::{ExecutionBackend, available_cores};

const SEED: u64 = 42;

fn matrix_of_order(order: usize) -> Matrix {
    match GeneratedMatrixSource::new(SEED).matrix_of_order(order) {
        Ok(matrix) => matrix,
        Err(e) => panic!("failed to generate a matrix of order {order}: {e}"),
    }
}

/// Serial expansion across orders; cost grows as n!
fn bench_serial_expansion(c: &mut Criterion) {
    let mut group = c.benchmark_group("serial_expansion");

    for order in [4, 6, 8, 9] {
        let matrix = matrix_of_order(order);
        group.bench_with_input(BenchmarkId::from_parameter(order), &matrix, |b, m| {
            b.iter(|| determinant(black_box(m)))
        });
    }

    group.finish();
}

/// Fixed order, increasing worker counts, both backends
fn bench_parallel_scaling(c: &mut Criterion) {
    let order = 9;
    let matrix = matrix_of_order(order);
    let mut group = c.benchmark_group("parallel_scaling");
    group.measurement_time(Duration::from_secs(10));

    for backend in [ExecutionBackend::ScopedThreads, ExecutionBackend::ThreadPool] {
        let coordinator = ParallelCoordinator::new(backend);
        for workers in [1, 2, 4, order] {
            group.bench_with_input(
                BenchmarkId::new(format!("{backend:?}"), workers),
                &workers,
                |b, &workers| {
                    b.iter(|| {
                        coordinator
                            .compute(black_box(&matrix), workers)
                            .map(|run| run.value)
                    })
                },
            );
        }
    }

    group.finish();
}

fn print_bench_info() {
    println!("\ndetscale benchmarks");
    println!("  serial expansion  - cofactor expansion cost per order");
    println!(
        "  parallel scaling  - order 9 on 1, 2, 4 and 9 workers ({} cores available)",
        available_cores()
    );
    println!();
}

fn setup_criterion() -> Criterion {
    print_bench_info();

    Criterion::default().with_output_color(true).with_plots()
}

criterion_group!(
    name = benches;
    config = setup_criterion();
    targets = bench_serial_expansion, bench_parallel_scaling
);

criterion_main!(benches);
