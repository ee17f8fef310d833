//! Property-based tests for order reconciliation

use proptest::prelude::*;
use std::collections::HashSet;
use winring::reconcile::reconcile_order;
use winring::types::WindowId;

/// Distinct live ids in arbitrary enumeration order, plus a persisted order
/// that may hold stale ids and duplicates
fn inputs() -> impl Strategy<Value = (Vec<WindowId>, Vec<WindowId>)> {
    (
        prop::collection::hash_set(0u32..40, 0..16)
            .prop_map(|set| set.into_iter().collect::<Vec<_>>())
            .prop_shuffle(),
        prop::collection::vec(0u32..48, 0..24),
    )
}

/// Running reconciliation on its own output changes nothing
#[test]
fn test_reconcile_idempotent_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&inputs(), |(live, persisted)| {
            let once = reconcile_order(&live, Some(persisted.as_slice()));
            let twice = reconcile_order(&live, Some(once.as_slice()));
            prop_assert_eq!(once, twice);
            Ok(())
        })
        .unwrap();
}

/// The result holds every live window exactly once and nothing else
#[test]
fn test_reconcile_converges_to_live_set_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&inputs(), |(live, persisted)| {
            let order = reconcile_order(&live, Some(persisted.as_slice()));
            let unique: HashSet<WindowId> = order.iter().copied().collect();
            let live_set: HashSet<WindowId> = live.iter().copied().collect();
            prop_assert_eq!(unique.len(), order.len());
            prop_assert_eq!(unique, live_set);
            Ok(())
        })
        .unwrap();
}

/// Survivors keep their persisted relative order and come before newcomers
#[test]
fn test_reconcile_preserves_survivor_order_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&inputs(), |(live, persisted)| {
            let order = reconcile_order(&live, Some(persisted.as_slice()));
            let live_set: HashSet<WindowId> = live.iter().copied().collect();

            let mut seen = HashSet::new();
            let survivors: Vec<WindowId> = persisted
                .iter()
                .copied()
                .filter(|id| live_set.contains(id) && seen.insert(*id))
                .collect();
            prop_assert_eq!(&order[..survivors.len()], &survivors[..]);

            let newcomers: Vec<WindowId> =
                live.iter().copied().filter(|id| !seen.contains(id)).collect();
            prop_assert_eq!(&order[survivors.len()..], &newcomers[..]);
            Ok(())
        })
        .unwrap();
}

proptest! {
    /// With nothing usable persisted the live enumeration is taken as is
    #[test]
    fn test_empty_persisted_yields_live(live in prop::collection::vec(0u32..100, 0..20)) {
        prop_assert_eq!(reconcile_order(&live, None), live.clone());
        prop_assert_eq!(reconcile_order(&live, Some(&[][..])), live);
    }
}
