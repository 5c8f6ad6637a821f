use std::convert::Infallible;

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use drip::prelude::*;
use futures::{StreamExt, stream};
use tokio::runtime::Runtime;

async fn square(op: u64) -> Result<u64, Infallible> {
    tokio::task::yield_now().await;
    Ok(op * op)
}

/// Benchmark the executor with a rate high enough to never throttle
fn bench_executor_capacity(c: &mut Criterion) {
    let mut group = c.benchmark_group("executor_capacity");
    let runtime = Runtime::new().unwrap();

    for capacity in [1, 10, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(capacity), &capacity, |b, &capacity| {
            b.to_async(&runtime).iter_batched(
                || ExecutorConfig::new(capacity, 1_000_000.0),
                |config| async move {
                    let executor = StreamExecutor::new(&config, stream::iter(0..10_000u64), square).unwrap();
                    black_box(executor.into_stream().count().await)
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// Benchmark inline execution against pooled execution
fn bench_executor_sync(c: &mut Criterion) {
    let mut group = c.benchmark_group("executor_sync");
    let runtime = Runtime::new().unwrap();
    let config = ExecutorConfig::new(10, 1_000_000.0);

    for (name, sync_every) in [("pooled", 0u64), ("half_inline", 2), ("all_inline", 1)] {
        group.bench_function(name, |b| {
            b.to_async(&runtime).iter(|| async {
                let executor = StreamExecutor::new(&config, stream::iter(0..10_000u64), square)
                    .unwrap()
                    .with_sync(move |op: &u64| sync_every != 0 && op % sync_every == 0);
                black_box(executor.into_stream().count().await)
            });
        });
    }

    group.finish();
}

/// Benchmark order-preserving parallel execution
fn bench_parallelize(c: &mut Criterion) {
    let runtime = Runtime::new().unwrap();

    c.bench_function("parallelize_10k", |b| {
        b.to_async(&runtime)
            .iter(|| async { black_box(parallelize(&square, 0..10_000u64, 10).await.len()) });
    });
}

criterion_group!(benches, bench_executor_capacity, bench_executor_sync, bench_parallelize);
criterion_main!(benches);
