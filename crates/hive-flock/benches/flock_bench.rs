//! Criterion benchmarks for `FlockingSystem::update`.
//!
//! Run with:
//!   cargo bench -p hive-flock
//!   cargo bench -p hive-flock --features parallel

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use hive_core::{SimRng, Vec3};
use hive_flock::{FlockConfig, FlockingSystem};
use hive_spatial::RTreeIndex;

fn populate<I: hive_spatial::NeighborIndex>(flock: &mut FlockingSystem<I>, n: usize) {
    let mut rng = SimRng::new(42);
    for _ in 0..n {
        flock.add_boid(Vec3::new(
            rng.gen_range(-20.0..20.0),
            rng.gen_range(-2.0..2.0),
            rng.gen_range(-20.0..20.0),
        ));
    }
    flock.set_target(Vec3::ZERO);
}

fn bench_hash_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("flock_update_hash");
    for n in [100usize, 500, 2_000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let mut flock = FlockingSystem::new(FlockConfig::default()).unwrap();
            populate(&mut flock, n);
            b.iter(|| flock.update(black_box(1.0 / 60.0)));
        });
    }
    group.finish();
}

fn bench_rtree(c: &mut Criterion) {
    let mut group = c.benchmark_group("flock_update_rtree");
    for n in [100usize, 500, 2_000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let mut flock =
                FlockingSystem::with_index(FlockConfig::default(), RTreeIndex::new()).unwrap();
            populate(&mut flock, n);
            b.iter(|| flock.update(black_box(1.0 / 60.0)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_hash_grid, bench_rtree);
criterion_main!(benches);
