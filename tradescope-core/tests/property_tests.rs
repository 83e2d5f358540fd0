//! Property tests for range control and interval projection.
//!
//! Uses proptest to verify:
//! 1. Range control bounds track catalog length, with "All" on the last tick
//! 2. In-range readings project onto the catalog points they index
//! 3. Readings past the end are open-ended and render "..."
//! 4. Projection is idempotent and never panics on malformed readings

use proptest::prelude::*;
use tradescope_core::{
    Account, AccountId, IntervalEnd, IntervalProjector, PointCatalog, RangeControlConfig,
    RangeReading, FALLBACK_ACCOUNT_ID,
};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_catalog() -> impl Strategy<Value = PointCatalog> {
    prop::collection::vec("[a-z0-9:-]{1,12}", 0..40)
        .prop_map(|labels| labels.into_iter().collect())
}

fn arb_account() -> impl Strategy<Value = Option<Account>> {
    prop::option::of((1u64..100_000, "[A-Za-z ]{1,20}").prop_map(|(id, name)| Account::new(id, name)))
}

// ── 1. Range control ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn ceil_equals_catalog_length(catalog in arb_catalog()) {
        let config = RangeControlConfig::for_catalog(&catalog);
        prop_assert_eq!(config.floor, 0);
        prop_assert_eq!(config.ceil, catalog.len());
        prop_assert_eq!(config.step, 1);
        prop_assert_eq!(config.tick_label(catalog.len()), "All");
    }

    #[test]
    fn inner_ticks_are_positional(catalog in arb_catalog()) {
        let config = RangeControlConfig::for_catalog(&catalog);
        for i in 0..catalog.len() {
            prop_assert_eq!(config.tick_label(i), format!("v{i}"));
        }
        prop_assert_eq!(config.tick_labels().len(), catalog.len() + 1);
    }
}

// ── 2. In-range projection ───────────────────────────────────────────

proptest! {
    #[test]
    fn in_range_reading_hits_catalog_points(
        catalog in arb_catalog().prop_filter("non-empty", |c| !c.is_empty()),
        low_frac in 0.0..1.0_f64,
        high_frac in 0.0..1.0_f64,
        account in arb_account(),
    ) {
        let len = catalog.len();
        let low = ((len as f64) * low_frac) as usize;
        let high = ((len as f64) * high_frac) as usize;
        let interval = IntervalProjector::project(
            RangeReading::new(low, high),
            &catalog,
            account.as_ref(),
        );

        prop_assert_eq!(interval.start.as_ref(), catalog.get(low));
        prop_assert_eq!(interval.end.point(), catalog.get(high));
        let expected_label = format!(
            "{} - {}",
            catalog.get(low).unwrap(),
            catalog.get(high).unwrap()
        );
        prop_assert_eq!(interval.label, expected_label);
    }

    #[test]
    fn account_id_follows_selection(catalog in arb_catalog(), account in arb_account()) {
        let interval = IntervalProjector::project(RangeReading::new(0, 0), &catalog, account.as_ref());
        let expected = account.map_or(FALLBACK_ACCOUNT_ID, |a| a.id);
        prop_assert_eq!(interval.account_id, expected);
    }
}

// ── 3. Open-ended projection ─────────────────────────────────────────

proptest! {
    #[test]
    fn high_past_end_is_open(catalog in arb_catalog(), extra in 1usize..50) {
        let high = catalog.len() + extra;
        let interval = IntervalProjector::project(RangeReading::new(0, high), &catalog, None);
        prop_assert_eq!(&interval.end, &IntervalEnd::Open);
        prop_assert!(interval.label.ends_with(" - ..."));
    }
}

// ── 4. Robustness ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn projection_is_idempotent(
        catalog in arb_catalog(),
        low in 0usize..100,
        high in 0usize..100,
        account in arb_account(),
    ) {
        let reading = RangeReading::new(low, high);
        let first = IntervalProjector::project(reading, &catalog, account.as_ref());
        let second = IntervalProjector::project(reading, &catalog, account.as_ref());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn low_never_exceeds_catalog_length(catalog in arb_catalog(), low in any::<usize>()) {
        let clamped = IntervalProjector::clamp_low(RangeReading::new(low, 0), &catalog);
        prop_assert!(clamped <= catalog.len());
    }
}

#[test]
fn documented_example() {
    let catalog: PointCatalog = ["t0", "t1", "t2", "t3"].into_iter().collect();
    let account = Account::new(22214, "Test Account 20");

    let bounded = IntervalProjector::project(RangeReading::new(1, 3), &catalog, Some(&account));
    assert_eq!(bounded.label, "t1 - t3");
    assert_eq!(bounded.account_id, AccountId(22214));

    let open = IntervalProjector::project(RangeReading::new(1, 10), &catalog, Some(&account));
    assert_eq!(open.label, "t1 - ...");
    assert!(open.end.is_open());
}
