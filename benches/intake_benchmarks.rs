//! Performance benchmarks for the request path.
//!
//! Tracks end-to-end handler latency through the router with an in-memory
//! database, plus the health read.

use std::{
    hint::black_box,
    time::{Duration, Instant},
};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use intake_testing::{http, ContactPayload, TestEnv, TEST_SECRET};
use tokio::runtime::Runtime;

/// Benchmarks authenticated submissions for different message sizes.
fn bench_submission(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    let mut group = c.benchmark_group("submission");
    group.sample_size(50);
    group.measurement_time(Duration::from_secs(10));

    for message_size in [64, 1024, 16 * 1024] {
        group.throughput(Throughput::Elements(1));

        group.bench_with_input(
            BenchmarkId::new("message_size", message_size),
            &message_size,
            |b, &size| {
                b.iter_custom(|iters| {
                    rt.block_on(async {
                        let env = TestEnv::new().await.unwrap();
                        let payload = ContactPayload::with_defaults().message("x".repeat(size)).build();

                        let start = Instant::now();
                        for _ in 0..iters {
                            let response =
                                env.send(http::post_json(&payload, Some(TEST_SECRET))).await.unwrap();
                            black_box(response);
                        }
                        start.elapsed()
                    })
                });
            },
        );
    }

    group.finish();
}

/// Benchmarks requests rejected before touching storage.
fn bench_rejections(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let env = rt.block_on(TestEnv::new()).unwrap();
    let payload = ContactPayload::minimal().build();

    let mut group = c.benchmark_group("rejection");

    group.bench_function("bad_signature", |b| {
        b.to_async(&rt).iter(|| async {
            black_box(env.send(http::post_json(&payload, Some("wrong"))).await.unwrap())
        });
    });

    group.bench_function("missing_fields", |b| {
        let incomplete = ContactPayload::minimal().without("email").build();
        b.to_async(&rt).iter(|| async {
            black_box(env.send(http::post_json(&incomplete, Some(TEST_SECRET))).await.unwrap())
        });
    });

    group.finish();
}

/// Benchmarks the health check against a populated table.
fn bench_health(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let env = rt.block_on(TestEnv::new()).unwrap();
    rt.block_on(env.seed_contacts(1_000)).unwrap();

    c.bench_function("health_check", |b| {
        b.to_async(&rt).iter(|| async { black_box(env.send(http::get("/")).await.unwrap()) });
    });
}

criterion_group!(benches, bench_submission, bench_rejections, bench_health);
criterion_main!(benches);
