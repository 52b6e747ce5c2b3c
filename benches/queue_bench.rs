//! Benchmarks for the fair task pool.
//!
//! Benchmarks cover:
//! - Admission cost of `enqueue` (single key, spread across keys)
//! - Rejection path of a full queue
//! - End-to-end drain of many keys, with and without queue disposal

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

use fair_task_pool::config::FairPoolConfig;
use fair_task_pool::core::FairTaskPool;
use fair_task_pool::runtime::TokioSpawner;
use fair_task_pool::util::QueueKey;

use tokio::runtime::Runtime;

// ============================================================================
// Helper Functions
// ============================================================================

fn build_pool(config: FairPoolConfig) -> FairTaskPool<QueueKey, TokioSpawner> {
    FairTaskPool::new(config, TokioSpawner::try_current().unwrap()).unwrap()
}

// ============================================================================
// Admission Benchmarks
// ============================================================================

fn bench_enqueue_single_key(c: &mut Criterion) {
    let mut group = c.benchmark_group("enqueue_single_key");

    for size in [100_u64, 1_000, 10_000] {
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.to_async(Runtime::new().unwrap()).iter(|| async move {
                let pool = build_pool(FairPoolConfig::default());
                let mut handles = Vec::with_capacity(size as usize);
                for i in 0..size {
                    handles.push(
                        pool.enqueue(QueueKey::from(1), move || async move { Ok::<_, ()>(i) })
                            .unwrap(),
                    );
                }
                for handle in handles {
                    black_box(handle.await.unwrap());
                }
            });
        });
    }
    group.finish();
}

fn bench_enqueue_many_keys(c: &mut Criterion) {
    let mut group = c.benchmark_group("enqueue_many_keys");

    for keys in [10_u64, 100, 1_000] {
        group.throughput(Throughput::Elements(keys * 10));
        group.bench_with_input(BenchmarkId::from_parameter(keys), &keys, |b, &keys| {
            b.to_async(Runtime::new().unwrap()).iter(|| async move {
                let pool = build_pool(FairPoolConfig::default().with_capacity(10));
                let mut handles = Vec::new();
                for round in 0..10 {
                    for key in 0..keys {
                        handles.push(
                            pool.enqueue(QueueKey::from(key), move || async move {
                                Ok::<_, ()>(round)
                            })
                            .unwrap(),
                        );
                    }
                }
                for handle in handles {
                    black_box(handle.await.unwrap());
                }
            });
        });
    }
    group.finish();
}

fn bench_rejection_path(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
    let _guard = rt.enter();
    let pool = build_pool(FairPoolConfig::default().with_capacity(1));
    // Nothing polls the runtime here, so the first task never leaves the backlog.
    pool.enqueue_detached(QueueKey::guest(), || async {}).unwrap();

    c.bench_function("enqueue_rejected", |b| {
        b.iter(|| {
            let result = pool.enqueue_detached(QueueKey::guest(), || async {});
            black_box(result.is_err());
        });
    });
}

// ============================================================================
// End-to-End Benchmarks
// ============================================================================

fn bench_drain_with_disposal(c: &mut Criterion) {
    let mut group = c.benchmark_group("drain_with_disposal");

    for flush in [false, true] {
        group.bench_with_input(BenchmarkId::from_parameter(flush), &flush, |b, &flush| {
            b.to_async(Runtime::new().unwrap()).iter(|| async move {
                let pool = build_pool(
                    FairPoolConfig::default()
                        .with_capacity(100)
                        .with_flush_queue_when_empty(flush),
                );
                let mut handles = Vec::new();
                for key in 0..200_u64 {
                    for i in 0..5_u64 {
                        handles.push(
                            pool.enqueue(QueueKey::from(key), move || async move {
                                tokio::task::yield_now().await;
                                Ok::<_, ()>(key * i)
                            })
                            .unwrap(),
                        );
                    }
                }
                for handle in handles {
                    black_box(handle.await.unwrap());
                }
                black_box(pool.stats());
            });
        });
    }
    group.finish();
}

// ============================================================================
// Benchmark Groups
// ============================================================================

criterion_group!(
    admission_benches,
    bench_enqueue_single_key,
    bench_enqueue_many_keys,
    bench_rejection_path
);

criterion_group!(scenario_benches, bench_drain_with_disposal);

criterion_main!(admission_benches, scenario_benches);
