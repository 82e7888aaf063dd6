//! Benchmarks for circuit construction
//!
//! Run with: cargo bench -p qfsm-core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qfsm_adapter_sim::BitState;
use qfsm_core::{Fsm, Mode, Problem};

fn problem(n: usize) -> Problem {
    let x: String = (0..n).map(|i| if i % 3 == 0 { '1' } else { '0' }).collect();
    let y: String = (0..n).map(|i| if i % 5 == 0 { '0' } else { '1' }).collect();
    Problem::new(&x, &y, n - 1, Mode::FreeSearch).unwrap()
}

/// Benchmark a full build pass
fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for n in [4usize, 16, 64, 256] {
        group.bench_with_input(BenchmarkId::new("free_search", n), &n, |b, &n| {
            let problem = problem(n);
            b.iter(|| {
                let mut fsm = Fsm::new(black_box(problem.clone())).unwrap();
                fsm.build().unwrap();
                fsm.circuit().len()
            });
        });
    }

    group.finish();
}

/// Benchmark depth analysis of a built circuit
fn bench_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("depth");

    for n in [16usize, 256] {
        let mut fsm = Fsm::new(problem(n)).unwrap();
        fsm.build().unwrap();
        group.bench_with_input(BenchmarkId::new("circuit", n), &fsm, |b, fsm| {
            b.iter(|| black_box(fsm.circuit()).depth());
        });
    }

    group.finish();
}

/// Benchmark classical evaluation of a built circuit
fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    for n in [16usize, 256] {
        let mut fsm = Fsm::new(problem(n)).unwrap();
        fsm.build().unwrap();
        group.bench_with_input(BenchmarkId::new("bit_state", n), &fsm, |b, fsm| {
            b.iter(|| BitState::evaluate(black_box(fsm.circuit())));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_depth, bench_evaluate);
criterion_main!(benches);
