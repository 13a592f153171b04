//! Dtype-dispatched kernels: native vs portable backend, and the cost of
//! mixed-dtype promotion.
//!
//! Run with: cargo bench --bench dispatch_bench

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::StandardNormal;
use std::time::Duration;
use strided_base::dispatch::{apply_with, PreferredBackend};
use strided_base::{apply, DType, Op, PortableBackend, TypedBuffer};

fn bench_backends(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch_add");
    group.sample_size(20);
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(3));

    for size in [1_000, 100_000, 1_000_000] {
        group.throughput(Throughput::Elements(size as u64));
        let mut rng = StdRng::seed_from_u64(42);
        let a: Vec<f64> = (0..size).map(|_| rng.sample(StandardNormal)).collect();
        let b: Vec<f64> = (0..size).map(|_| rng.sample(StandardNormal)).collect();
        let a = TypedBuffer::from_vec(a);
        let b = TypedBuffer::from_vec(b);
        let ints = TypedBuffer::from_vec((0..size as i32).collect::<Vec<_>>());
        let mut out = TypedBuffer::zeros(DType::Float64, size);

        group.bench_with_input(BenchmarkId::new("preferred", size), &size, |bench, _| {
            bench.iter(|| {
                apply_with::<PreferredBackend>(
                    Op::Add,
                    &[a.as_view(), b.as_view()],
                    &mut out.as_view_mut(),
                )
                .unwrap()
            })
        });
        group.bench_with_input(BenchmarkId::new("portable", size), &size, |bench, _| {
            bench.iter(|| {
                apply_with::<PortableBackend>(
                    Op::Add,
                    &[a.as_view(), b.as_view()],
                    &mut out.as_view_mut(),
                )
                .unwrap()
            })
        });
        group.bench_with_input(BenchmarkId::new("mixed_f64_i32", size), &size, |bench, _| {
            bench.iter(|| {
                apply(Op::Add, &[a.as_view(), ints.as_view()], &mut out.as_view_mut()).unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_backends);
criterion_main!(benches);
