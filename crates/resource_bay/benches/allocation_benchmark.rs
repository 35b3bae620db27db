//! Benchmark for allocation throughput.
//!
//! Run with: cargo bench --package resource_bay --bench allocation_benchmark

// criterion_group! generates an undocumented `benches` function.
#![allow(missing_docs)]

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use resource_bay::{amount_map, AllocationRequest, BufferedSink, ResourceBay};

fn create_test_bay(keys: usize) -> ResourceBay {
    let bay = ResourceBay::new();
    for i in 0..keys {
        bay.define_resource(format!("resource_{i}"), 1_000_000).unwrap();
    }
    bay
}

fn multi_key_request(keys: usize) -> AllocationRequest {
    (0..keys).fold(AllocationRequest::new().with_owner("bench"), |request, i| {
        request.with(format!("resource_{i}"), 1)
    })
}

fn benchmark_allocate_release(c: &mut Criterion) {
    let bay = create_test_bay(4);
    let request = multi_key_request(4);

    c.bench_function("allocate_release_4_keys", |b| {
        b.iter(|| {
            let grant = bay.try_allocate(black_box(request.clone())).unwrap();
            black_box(bay.release(grant.id))
        });
    });
}

fn benchmark_rejection(c: &mut Criterion) {
    let bay = create_test_bay(16);
    // Every key short, so the full shortage map is built
    let request = (0..16).fold(AllocationRequest::new(), |request, i| {
        request.with(format!("resource_{i}"), 2_000_000)
    });

    c.bench_function("reject_16_key_shortage", |b| {
        b.iter(|| black_box(bay.try_allocate(black_box(request.clone())).is_err()));
    });
}

fn benchmark_partial_release(c: &mut Criterion) {
    let bay = create_test_bay(2);
    let partial = amount_map([("resource_0", 1)]);

    c.bench_function("allocate_partial_release", |b| {
        b.iter(|| {
            let grant = bay
                .try_allocate(AllocationRequest::new().with("resource_0", 2).with("resource_1", 1))
                .unwrap();
            black_box(bay.release_partial(grant.id, &partial));
            bay.release(grant.id);
        });
    });
}

fn benchmark_with_event_sink(c: &mut Criterion) {
    let sink = Arc::new(BufferedSink::new());
    let bay = ResourceBay::builder().event_sink(sink.clone()).build();
    bay.define_resource("water", 1_000_000).unwrap();
    let request = AllocationRequest::new().with("water", 1);

    c.bench_function("allocate_release_with_sink", |b| {
        b.iter(|| {
            let grant = bay.try_allocate(request.clone()).unwrap();
            bay.release(grant.id);
            black_box(sink.drain())
        });
    });
}

criterion_group!(
    benches,
    benchmark_allocate_release,
    benchmark_rejection,
    benchmark_partial_release,
    benchmark_with_event_sink
);
criterion_main!(benches);
