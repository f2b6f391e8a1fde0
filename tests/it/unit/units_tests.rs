//! Unit tests for units specs: angles and distances.

use crate::helpers::{approx_eq, run_pipeline, source, view, xy_source};
use plotcore::PlotError;
use plotcore::core::{
    AngleSpec, AnyProperty, DataProperty, DataRole, DistanceSpec, Kind, ScreenDistanceSpec,
};
use plotcore::data::ColumnDataSource;
use plotcore::glyphs::Scatter;
use plotcore::types::{AngleUnits, Axis, SpatialUnits};
use serde_json::json;
use std::f64::consts::{FRAC_PI_2, PI};

#[test]
fn test_degrees_normalize_to_negated_radians() {
    let mut angle = AngleSpec::new("Test", "angle", Kind::Angle, 0.0);
    angle.set_json(&json!({"value": 90, "units": "deg"})).unwrap();
    assert_eq!(angle.units(), AngleUnits::Deg);

    let values = angle.array(&ColumnDataSource::new()).unwrap();
    assert!(approx_eq(values[0], -FRAC_PI_2));
    assert!(approx_eq(angle.normalized_value().unwrap(), -FRAC_PI_2));
}

#[test]
fn test_turns_and_grads() {
    let mut angle = AngleSpec::new("Test", "angle", Kind::Angle, 0.0);
    angle.set_json(&json!({"value": 0.5, "units": "turn"})).unwrap();
    assert!(approx_eq(angle.normalized_value().unwrap(), -PI));

    angle.set_json(&json!({"value": 200, "units": "grad"})).unwrap();
    assert!(approx_eq(angle.normalized_value().unwrap(), -PI));
}

#[test]
fn test_angle_field_normalizes_every_row() {
    let mut angle = AngleSpec::new("Test", "angle", Kind::Angle, 0.0);
    angle.set_json(&json!({"field": "a", "units": "deg"})).unwrap();
    let data = source(&[("a", &[0.0, 180.0, -90.0])]);
    let values = angle.array(&data).unwrap();
    assert!(approx_eq(values[0], 0.0));
    assert!(approx_eq(values[1], -PI));
    assert!(approx_eq(values[2], FRAC_PI_2));
}

#[test]
fn test_unknown_units_are_rejected_without_changing_spec() {
    let mut angle = AngleSpec::new("Test", "angle", Kind::Angle, 1.0);
    let err = angle
        .set_json(&json!({"value": 2.0, "units": "furlongs"}))
        .unwrap_err();
    assert!(matches!(err, PlotError::InvalidUnits { .. }));
    assert_eq!(angle.spec_json(), json!({"value": 1.0}));
}

#[test]
fn test_explicit_units_serialize() {
    let mut angle = AngleSpec::new("Test", "angle", Kind::Angle, 0.0);
    angle.set_json(&json!({"value": 45, "units": "deg"})).unwrap();
    assert_eq!(angle.spec_json(), json!({"value": 45.0, "units": "deg"}));
}

#[test]
fn test_distance_roles_follow_units() {
    let mut radius = DistanceSpec::new("Test", "radius", Kind::NonNegative, 1.0).along(Axis::Y, "y");
    assert_eq!(
        radius.role(),
        DataRole::Distance {
            axis: Axis::Y,
            center: "y",
            units: SpatialUnits::Data
        }
    );
    radius.set_units(SpatialUnits::Screen);
    assert!(matches!(
        radius.role(),
        DataRole::Distance {
            units: SpatialUnits::Screen,
            ..
        }
    ));

    let size = ScreenDistanceSpec::new("Test", "size", Kind::NonNegative, 4.0);
    assert_eq!(size.units(), SpatialUnits::Screen);
    assert!(!size.has_explicit_units());
}

#[test]
fn test_data_distance_maps_through_scale() {
    // Scale factor is 10 px per data unit
    let mut scatter = Scatter::new();
    scatter.radius.set_json(&json!({"value": 0.5})).unwrap();
    let mut view = view(scatter);
    run_pipeline(&mut view, &xy_source());

    let sradius = view.data().screen("sradius");
    assert_eq!(sradius.len(), 3);
    assert!(sradius.iter().all(|&r| approx_eq(r, 5.0)));
}

#[test]
fn test_screen_distance_is_copied() {
    let mut scatter = Scatter::new();
    scatter.size.set_json(&json!({"field": "s"})).unwrap();
    let data = source(&[("x", &[1.0, 2.0]), ("y", &[1.0, 2.0]), ("s", &[6.0, 12.0])]);
    let mut view = view(scatter);
    run_pipeline(&mut view, &data);
    assert_eq!(view.data().screen("ssize"), &[6.0, 12.0]);
}

#[test]
fn test_unset_radius_is_not_resolved() {
    let mut view = view(Scatter::new());
    run_pipeline(&mut view, &xy_source());
    assert!(!view.data().has_raw("radius"));
    assert!(view.data().screen("sradius").is_empty());
}
