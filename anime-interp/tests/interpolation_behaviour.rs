//! Behavioural tests for matching followed by extensive interpolation.

use anime_core::test_support::point_set;
use anime_core::{FeatureId, GeometrySet, SpatialIndex};
use anime_interp::{
    ExtensiveValues, Interpolation, InterpolationConfig, InterpolationError, Interpolator,
    MissingValuePolicy,
};
use anime_matcher::match_all;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

#[fixture]
fn sources() -> RefCell<GeometrySet> {
    RefCell::new(GeometrySet::default())
}

#[fixture]
fn targets() -> RefCell<GeometrySet> {
    RefCell::new(GeometrySet::default())
}

#[fixture]
fn quantities() -> RefCell<Vec<(FeatureId, f64)>> {
    RefCell::new(Vec::new())
}

#[fixture]
fn config() -> RefCell<InterpolationConfig> {
    RefCell::new(InterpolationConfig::default())
}

#[fixture]
fn outcome() -> RefCell<Option<Result<Interpolation, InterpolationError>>> {
    RefCell::new(None)
}

#[given("a source of 100 at the origin")]
fn given_source(
    #[from(sources)] sources: &RefCell<GeometrySet>,
    #[from(quantities)] quantities: &RefCell<Vec<(FeatureId, f64)>>,
) {
    *sources.borrow_mut() = point_set([(1, 0.0, 0.0)]);
    quantities.borrow_mut().push((FeatureId(1), 100.0));
}

#[given("targets at minus one zero and one zero")]
fn given_targets(#[from(targets)] targets: &RefCell<GeometrySet>) {
    *targets.borrow_mut() = point_set([(1, -1.0, 0.0), (2, 1.0, 0.0)]);
}

#[given("a value of 5 for an unknown source")]
fn given_unknown_value(#[from(quantities)] quantities: &RefCell<Vec<(FeatureId, f64)>>) {
    quantities.borrow_mut().push((FeatureId(99), 5.0));
}

#[given("unknown sources are ignored")]
fn given_lenient(#[from(config)] config: &RefCell<InterpolationConfig>) {
    let lenient = config
        .borrow()
        .with_missing_values(MissingValuePolicy::Ignore);
    *config.borrow_mut() = lenient;
}

#[when("I match and interpolate the quantity")]
fn when_interpolate(
    #[from(sources)] sources: &RefCell<GeometrySet>,
    #[from(targets)] targets: &RefCell<GeometrySet>,
    #[from(quantities)] quantities: &RefCell<Vec<(FeatureId, f64)>>,
    #[from(config)] config: &RefCell<InterpolationConfig>,
    #[from(outcome)] outcome: &RefCell<Option<Result<Interpolation, InterpolationError>>>,
) {
    let source_set = sources.borrow();
    let index = SpatialIndex::build(&source_set).expect("index built");
    let matches = match_all(&targets.borrow(), &index, 1, 5.0).expect("matched");
    let values = ExtensiveValues::new(quantities.borrow().iter().copied()).expect("valid values");
    let interpolator = Interpolator::new(*config.borrow()).expect("valid config");
    *outcome.borrow_mut() = Some(interpolator.interpolate_extensive(&values, &matches, None));
}

#[then("each target receives 50")]
fn then_even_split(
    #[from(outcome)] outcome: &RefCell<Option<Result<Interpolation, InterpolationError>>>,
) {
    let outcome = outcome.borrow();
    let result = outcome
        .as_ref()
        .expect("interpolation ran")
        .as_ref()
        .expect("interpolation succeeded");
    assert_eq!(result.get(FeatureId(1)), Some(50.0));
    assert_eq!(result.get(FeatureId(2)), Some(50.0));
}

#[then("interpolation reports a missing value")]
fn then_missing_value(
    #[from(outcome)] outcome: &RefCell<Option<Result<Interpolation, InterpolationError>>>,
) {
    assert_eq!(
        outcome.borrow().as_ref().and_then(|result| result.clone().err()),
        Some(InterpolationError::MissingValue {
            source_id: FeatureId(99)
        })
    );
}

#[scenario(path = "tests/features/interpolation.feature", index = 0)]
fn scenario_even_split(
    sources: RefCell<GeometrySet>,
    targets: RefCell<GeometrySet>,
    quantities: RefCell<Vec<(FeatureId, f64)>>,
    config: RefCell<InterpolationConfig>,
    outcome: RefCell<Option<Result<Interpolation, InterpolationError>>>,
) {
    let _ = (sources, targets, quantities, config, outcome);
}

#[scenario(path = "tests/features/interpolation.feature", index = 1)]
fn scenario_strict_policy(
    sources: RefCell<GeometrySet>,
    targets: RefCell<GeometrySet>,
    quantities: RefCell<Vec<(FeatureId, f64)>>,
    config: RefCell<InterpolationConfig>,
    outcome: RefCell<Option<Result<Interpolation, InterpolationError>>>,
) {
    let _ = (sources, targets, quantities, config, outcome);
}

#[scenario(path = "tests/features/interpolation.feature", index = 2)]
fn scenario_lenient_policy(
    sources: RefCell<GeometrySet>,
    targets: RefCell<GeometrySet>,
    quantities: RefCell<Vec<(FeatureId, f64)>>,
    config: RefCell<InterpolationConfig>,
    outcome: RefCell<Option<Result<Interpolation, InterpolationError>>>,
) {
    let _ = (sources, targets, quantities, config, outcome);
}
