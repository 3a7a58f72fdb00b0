use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use parmat::{Fill, Matrix, Schedule, Team, matmul_rows_mt, multiply_reference, vector};
use std::hint::black_box;

fn bench_reference(c: &mut Criterion) {
    let mut group = c.benchmark_group("naive_ijk");
    for &n in &[64, 128, 256] {
        let a = Matrix::filled(n, n, Fill::IndexSum).unwrap();
        let b = Matrix::filled(n, n, Fill::IndexSum).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |bench, _| {
            bench.iter(|| black_box(multiply_reference(&a, &b).unwrap()));
        });
    }
    group.finish();
}

fn bench_threads(c: &mut Criterion) {
    let n = 256;
    let a = Matrix::filled(n, n, Fill::IndexSum).unwrap();
    let b = Matrix::filled(n, n, Fill::IndexSum).unwrap();

    let mut group = c.benchmark_group("rows_mt_256");
    for &threads in &[1, 2, 4, 8] {
        let team = Team::new(threads).unwrap();
        for (name, schedule) in [("static", Schedule::Static), ("dynamic6", Schedule::dynamic(6))] {
            group.bench_with_input(BenchmarkId::new(name, threads), &threads, |bench, _| {
                bench.iter(|| black_box(matmul_rows_mt(&a, &b, &team, schedule, &()).unwrap()));
            });
        }
    }
    group.finish();
}

fn bench_vector_add(c: &mut Criterion) {
    let (a, b) = vector::chunk_demo_inputs(1 << 16);
    let team = Team::new(4).unwrap();

    let mut group = c.benchmark_group("vector_add_64k");
    for &chunk in &[6, 256, 4096] {
        group.bench_with_input(BenchmarkId::from_parameter(chunk), &chunk, |bench, &chunk| {
            bench.iter(|| {
                black_box(vector::add(&a, &b, &team, Schedule::dynamic(chunk), &()).unwrap())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_reference, bench_threads, bench_vector_add);
criterion_main!(benches);
