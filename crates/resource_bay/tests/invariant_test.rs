//! Property tests: random operation sequences against the ledger invariants.

use proptest::prelude::*;
use resource_bay::{amount_map, AllocationId, AllocationRequest, AmountMap, ResourceBay};

const KEYS: [&str; 3] = ["water", "energy", "compute"];

#[derive(Clone, Debug)]
enum Op {
    Allocate { amounts: Vec<(usize, i64)>, strict: bool },
    Release { pick: usize },
    ReleasePartial { pick: usize, key: usize, amount: i64 },
    SetCapacity { key: usize, capacity: i64 },
    ReleaseOwner { owner: usize },
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (prop::collection::vec((0..3usize, 1..40i64), 1..4), any::<bool>())
            .prop_map(|(amounts, strict)| Op::Allocate { amounts, strict }),
        (0..16usize).prop_map(|pick| Op::Release { pick }),
        (0..16usize, 0..3usize, -5..30i64)
            .prop_map(|(pick, key, amount)| Op::ReleasePartial { pick, key, amount }),
        (0..3usize, 0..120i64).prop_map(|(key, capacity)| Op::SetCapacity { key, capacity }),
        (0..3usize).prop_map(|owner| Op::ReleaseOwner { owner }),
    ]
}

fn seeded_bay() -> ResourceBay {
    let bay = ResourceBay::new();
    for key in KEYS {
        bay.define_resource(key, 60).unwrap();
    }
    bay
}

fn pick(ids: &[AllocationId], index: usize) -> Option<AllocationId> {
    if ids.is_empty() {
        None
    } else {
        Some(ids[index % ids.len()])
    }
}

fn apply(bay: &ResourceBay, ids: &mut Vec<AllocationId>, op: &Op, step: usize) {
    match op {
        Op::Allocate { amounts, strict } => {
            let mut request = AllocationRequest::new().with_owner(format!("owner-{}", step % 3));
            for (key, amount) in amounts {
                request = request.with(KEYS[*key], *amount);
            }
            if !strict {
                request = request.best_effort();
            }
            if let Ok(grant) = bay.try_allocate(request) {
                ids.push(grant.id);
            }
        }
        Op::Release { pick: index } => {
            if let Some(id) = pick(ids, *index) {
                bay.release(id);
            }
        }
        Op::ReleasePartial { pick: index, key, amount } => {
            if let Some(id) = pick(ids, *index) {
                bay.release_partial(id, &amount_map([(KEYS[*key], *amount)]));
            }
        }
        Op::SetCapacity { key, capacity } => {
            bay.set_capacity(KEYS[*key], *capacity).unwrap();
        }
        Op::ReleaseOwner { owner } => {
            bay.release_by_owner(&format!("owner-{owner}"));
        }
    }
}

proptest! {
    #[test]
    fn ledger_matches_records_after_any_sequence(ops in prop::collection::vec(arb_op(), 1..60)) {
        let bay = seeded_bay();
        let mut ids = Vec::new();

        for (step, op) in ops.iter().enumerate() {
            apply(&bay, &mut ids, op, step);

            let audit = bay.audit();
            prop_assert!(audit.is_consistent(), "after {:?}: {:?}", op, audit.discrepancies);
            for record in bay.allocations() {
                prop_assert!(!record.resources.is_empty());
                prop_assert!(record.resources.values().all(|&amount| amount > 0));
            }
        }
    }

    #[test]
    fn rejected_request_changes_nothing(
        capacities in prop::collection::vec(0..50i64, 3),
        amounts in prop::collection::vec(1..80i64, 3),
    ) {
        let bay = ResourceBay::new();
        for (key, capacity) in KEYS.iter().zip(&capacities) {
            bay.define_resource(*key, *capacity).unwrap();
        }
        let before = bay.totals();

        let request = AllocationRequest::from_amounts(
            KEYS.iter().zip(&amounts).map(|(k, a)| ((*k).into(), *a)).collect(),
        );
        let expect_ok = amounts.iter().zip(&capacities).all(|(a, c)| a <= c);

        match bay.try_allocate(request) {
            Ok(grant) => {
                prop_assert!(expect_ok);
                prop_assert!(grant.is_complete());
            }
            Err(err) => {
                prop_assert!(!expect_ok);
                prop_assert_eq!(bay.totals(), before);
                prop_assert_eq!(bay.allocation_count(), 0);

                // Every short key is listed, with the exact missing amount
                let expected: AmountMap = KEYS
                    .iter()
                    .zip(amounts.iter().zip(&capacities))
                    .filter(|(_, (a, c))| a > c)
                    .map(|(k, (a, c))| ((*k).into(), a - c))
                    .collect();
                prop_assert_eq!(err.shortages(), Some(&expected));
            }
        }
    }

    #[test]
    fn release_is_idempotent(amount in 1..60i64, repeats in 1..5usize) {
        let bay = seeded_bay();
        let grant = bay.try_allocate(AllocationRequest::new().with("water", amount)).unwrap();

        prop_assert!(bay.release(grant.id).is_some());
        for _ in 0..repeats {
            prop_assert!(bay.release(grant.id).is_none());
        }
        prop_assert_eq!(bay.available("water"), Some(60));
        prop_assert_eq!(bay.stats().releases, 1);
    }

    #[test]
    fn snapshot_round_trip_preserves_capacities(
        capacities in prop::collection::btree_map("[a-z]{1,8}", 0..1_000i64, 0..8),
    ) {
        let bay = ResourceBay::new();
        for (key, capacity) in &capacities {
            bay.define_resource(key.as_str(), *capacity).unwrap();
        }

        let snapshot = bay.snapshot();
        let restored = ResourceBay::new();
        prop_assert_eq!(restored.load_snapshot(&snapshot), Ok(capacities.len()));

        for (key, capacity) in &capacities {
            prop_assert_eq!(restored.capacity(key), Some(*capacity));
            prop_assert_eq!(restored.allocated_total(key), Some(0));
        }
    }
}
