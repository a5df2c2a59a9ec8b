// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use acoustic_fdtd::config::WaveConfig;
use acoustic_fdtd::scheduler::WaveSolver;

fn make_solver(n: usize, threads: usize) -> WaveSolver {
    let mut solver = WaveSolver::new(n, n, WaveConfig::default())
        .unwrap()
        .with_threads(threads);
    solver.inject_source().unwrap();
    solver
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Single-thread baseline: 512^2, 50 steps, 1 thread.
fn bench_single_thread(c: &mut Criterion) {
    c.bench_function("512x512_50steps_1thread", |b| {
        b.iter_with_setup(
            || make_solver(512, 1),
            |mut solver| {
                solver.run(50).unwrap();
                black_box(solver)
            },
        );
    });
}

/// Thread scaling: 1024^2, 20 steps, varying thread counts.
fn bench_thread_scaling(c: &mut Criterion) {
    let cpus = num_cpus();
    let mut group = c.benchmark_group("thread_scaling_1024x1024");
    for &threads in &[1, 2, 4, 8] {
        if threads <= cpus {
            group.bench_function(format!("{}threads", threads), |b| {
                b.iter_with_setup(
                    || make_solver(1024, threads),
                    |mut solver| {
                        solver.run(20).unwrap();
                        black_box(solver)
                    },
                );
            });
        }
    }
    group.bench_function(format!("{}threads_all", cpus), |b| {
        b.iter_with_setup(
            || make_solver(1024, cpus),
            |mut solver| {
                solver.run(20).unwrap();
                black_box(solver)
            },
        );
    });
    group.finish();
}

/// Grid size scaling: 20 steps at all cores.
fn bench_grid_size_scaling(c: &mut Criterion) {
    let cpus = num_cpus();
    let mut group = c.benchmark_group("grid_size_scaling");
    for &n in &[128, 256, 512, 1024] {
        group.bench_function(format!("{}x{}", n, n), |b| {
            b.iter_with_setup(
                || make_solver(n, cpus),
                |mut solver| {
                    solver.run(20).unwrap();
                    black_box(solver)
                },
            );
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_single_thread,
    bench_thread_scaling,
    bench_grid_size_scaling,
);
criterion_main!(benches);
