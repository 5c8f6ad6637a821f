use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use drip::prelude::*;
use futures::{StreamExt, stream};
use serde_json::{Value, json};
use tokio::runtime::Runtime;

/// Generate `count` records with even or odd ids and ascending timestamps
fn generate_records(count: usize, odd: bool) -> Vec<Value> {
    (0..count)
        .map(|i| {
            let id = i * 2 + usize::from(odd);
            json!({
                "id": id,
                "created_at": format!("2021-01-01T00:{:02}:{:02}.{:03}Z", id / 60 % 60, id % 60, id % 1000),
            })
        })
        .collect()
}

/// Benchmark the iterator merge with different comparators
fn bench_merge_sorted_iter(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_sorted_iter");

    for size in [1_000, 10_000, 100_000] {
        let left = generate_records(size, false);
        let right = generate_records(size, true);

        group.bench_with_input(BenchmarkId::new("by_id", size), &size, |b, _| {
            b.iter(|| {
                let merged = merge_sorted(left.iter(), right.iter(), |a, b| by_id(a, b));
                black_box(merged.count())
            });
        });

        let precedes = by_timestamp("created_at");
        group.bench_with_input(BenchmarkId::new("by_timestamp", size), &size, |b, _| {
            b.iter(|| {
                let merged = merge_sorted(left.iter(), right.iter(), |a, b| precedes(a, b));
                black_box(merged.count())
            });
        });
    }

    group.finish();
}

/// Benchmark the stream merge over in-memory streams
fn bench_merge_sorted_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_sorted_stream");
    let runtime = Runtime::new().unwrap();

    for size in [1_000, 10_000] {
        let left = generate_records(size, false);
        let right = generate_records(size, true);

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.to_async(&runtime).iter(|| async {
                let merged = MergeSorted::new(
                    stream::iter(left.iter()),
                    stream::iter(right.iter()),
                    |a: &&Value, b: &&Value| by_id(a, b),
                );
                black_box(merged.count().await)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_merge_sorted_iter, bench_merge_sorted_stream);
criterion_main!(benches);
