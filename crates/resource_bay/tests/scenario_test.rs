//! End-to-end allocation scenarios against a single engine.

use std::sync::Arc;

use resource_bay::{
    amount_map, AllocationError, AllocationRequest, BayEvent, BayEventKind, BaySnapshot,
    BufferedSink, ResourceBay, SnapshotCodec,
};

fn observed_bay() -> (ResourceBay, Arc<BufferedSink>) {
    let sink = Arc::new(BufferedSink::new());
    let bay = ResourceBay::builder().event_sink(sink.clone()).build();
    (bay, sink)
}

#[test]
fn test_single_resource_grant_then_shortage() {
    let (bay, sink) = observed_bay();
    bay.define_resource("water", 100).unwrap();

    let grant = bay
        .try_allocate(AllocationRequest::new().with("water", 40).with_owner("farm1"))
        .unwrap();
    assert_eq!(grant.granted, amount_map([("water", 40)]));
    assert_eq!(bay.available("water"), Some(60));

    let err = bay
        .try_allocate(AllocationRequest::new().with("water", 70))
        .unwrap_err();
    assert_eq!(
        err,
        AllocationError::Shortage {
            shortages: amount_map([("water", 10)]),
        }
    );
    assert_eq!(bay.available("water"), Some(60));

    let rejected = sink
        .drain()
        .into_iter()
        .find(|event| event.kind() == BayEventKind::AllocationRejected)
        .unwrap();
    match rejected {
        BayEvent::AllocationRejected { requested, error, .. } => {
            assert_eq!(requested, amount_map([("water", 70)]));
            assert!(error.contains("water: 10"));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn test_multi_resource_scenarios() {
    let bay = ResourceBay::new();
    bay.define_resource("energy", 50).unwrap();
    bay.define_resource("water", 50).unwrap();

    // All-or-nothing grant of both keys
    let a = bay
        .try_allocate(AllocationRequest::new().with("energy", 50).with("water", 10))
        .unwrap();

    // Energy exhausted: rejected, water untouched
    let err = bay
        .try_allocate(AllocationRequest::new().with("energy", 1))
        .unwrap_err();
    assert_eq!(err.shortages(), Some(&amount_map([("energy", 1)])));
    assert_eq!(bay.available("water"), Some(40));

    // Partial release
    let partial = bay
        .release_partial(a.id, &amount_map([("water", 5)]))
        .unwrap();
    assert_eq!(partial.remaining, amount_map([("water", 5), ("energy", 50)]));
    assert_eq!(bay.available("water"), Some(45));
    assert_eq!(
        bay.allocation(a.id).unwrap().resources,
        amount_map([("water", 5), ("energy", 50)])
    );

    // Removal blocked while held
    assert!(!bay.remove_resource("energy"));
    assert!(bay.contains("energy"));

    // Hard reset
    let cleared = bay.reset_all_allocations();
    assert_eq!(cleared, 1);
    assert!(bay.allocations().is_empty());
    for (_, totals) in bay.totals() {
        assert_eq!(totals.allocated, 0);
        assert_eq!(totals.available, totals.capacity);
    }
    assert_eq!(bay.capacity("energy"), Some(50));
    assert_eq!(bay.capacity("water"), Some(50));

    assert!(bay.remove_resource("energy"));
    assert!(bay.audit().is_consistent());
}

#[test]
fn test_owner_queries_and_bulk_release() {
    let bay = ResourceBay::new();
    bay.define_resource("compute", 10).unwrap();

    for _ in 0..3 {
        bay.try_allocate(AllocationRequest::new().with("compute", 2).with_owner("job-a"))
            .unwrap();
    }
    bay.try_allocate(AllocationRequest::new().with("compute", 1).with_owner("job-b"))
        .unwrap();

    assert_eq!(bay.owner_allocations("job-a").len(), 3);
    assert_eq!(bay.available("compute"), Some(3));

    let released = bay.release_by_owner("job-a");
    assert_eq!(released.len(), 3);
    assert!(released.iter().all(|r| r.owner_id.as_deref() == Some("job-a")));
    assert_eq!(bay.available("compute"), Some(9));
    assert_eq!(bay.stats().releases, 3);
}

#[test]
fn test_snapshot_text_round_trip() {
    let bay = ResourceBay::new();
    bay.define_resource("water", 100).unwrap();
    bay.define_resource("energy", 7).unwrap();

    let text = SnapshotCodec::encode(&bay.snapshot()).unwrap();
    let decoded = SnapshotCodec::decode(&text).unwrap();

    let restored = ResourceBay::new();
    restored.define_resource("stale", 1).unwrap();
    assert_eq!(restored.load_snapshot(&decoded), Ok(2));

    assert!(!restored.contains("stale"));
    assert_eq!(restored.capacity("water"), Some(100));
    assert_eq!(restored.capacity("energy"), Some(7));
    assert_eq!(restored.keys(), bay.keys());
}

#[test]
fn test_snapshot_allocated_total_is_ignored_on_load() {
    let text = r#"
        [[resources]]
        key = "water"
        capacity = 100
        allocatedTotal = 30
    "#;
    let snapshot = BaySnapshot::from_toml_str(text).unwrap();

    let bay = ResourceBay::new();
    bay.load_snapshot(&snapshot).unwrap();
    assert_eq!(bay.allocated_total("water"), Some(0));
    assert_eq!(bay.available("water"), Some(100));
}
