//! Property-based tests for extensive interpolation.
//!
//! # Invariants tested
//!
//! - **Conservation:** target values sum to the source total minus the
//!   unallocated quantity.
//! - **Non-negativity:** no target receives a negative share.

use anime_core::test_support::point_set;
use anime_core::SpatialIndex;
use anime_interp::{ExtensiveValues, interpolate_extensive};
use anime_matcher::match_all;
use proptest::prelude::*;

fn layer(max_len: usize) -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((-100.0..100.0_f64, -100.0..100.0_f64), 1..max_len)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn quantities_are_conserved(
        sources in layer(40),
        targets in layer(60),
        quantities in prop::collection::vec(0.0..1_000.0_f64, 40),
        k in 1_usize..4,
        max_distance in 0.0..80.0_f64,
    ) {
        let source_set = point_set((0_u64..).zip(&sources).map(|(id, &(x, y))| (id, x, y)));
        let target_set = point_set((0_u64..).zip(&targets).map(|(id, &(x, y))| (id, x, y)));
        let index = SpatialIndex::build(&source_set).expect("non-empty");
        let matches = match_all(&target_set, &index, k, max_distance).expect("matched");

        let values = ExtensiveValues::new(
            source_set.ids().zip(quantities.iter().copied()),
        )
        .expect("non-negative quantities");
        let result = interpolate_extensive(&values, &matches, None).expect("interpolated");

        let expected = values.total() - result.unallocated();
        prop_assert!(
            (result.total() - expected).abs() <= 1e-6 * values.total().max(1.0),
            "targets hold {} but {} was allocated",
            result.total(),
            expected
        );
        prop_assert!(result.values().values().all(|value| *value >= 0.0));
        prop_assert!(result.values().keys().all(|id| target_set.contains(*id)));
        prop_assert!(result.unallocated_sources() <= values.as_values().len());
    }
}
