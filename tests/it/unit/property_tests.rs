//! Unit tests for properties, specs and kinds.

use crate::helpers::source;
use plotcore::PlotError;
use plotcore::core::{
    AnyProperty, Kind, NumberSpec, Property, ScalarSpec, StringSpec, VectorSpec,
};
use plotcore::data::{Column, ColumnDataSource, CumSum, Dodge, FnTransform, Stack};
use serde_json::json;
use std::cell::Cell;
use std::rc::Rc;

fn width() -> Property<f64> {
    Property::new("Test", "line_width", Kind::NonNegative, 1.0)
}

fn vector_width() -> NumberSpec {
    NumberSpec::new("Test", "line_width", Kind::NonNegative, 1.0)
}

// ============================================================================
// Property
// ============================================================================

#[test]
fn test_default_is_a_clean_value() {
    let prop = width();
    assert_eq!(*prop.value().unwrap(), 1.0);
    assert!(!prop.is_dirty());
    assert_eq!(prop.spec_json(), json!({"value": 1.0}));
}

#[test]
fn test_invalid_assignment_keeps_previous_value() {
    let mut prop = width();
    let err = prop.set_json(&json!(-1)).unwrap_err();
    assert!(matches!(err, PlotError::Validation { .. }));
    assert_eq!(err.to_string(), "line_width given invalid value: -1");
    assert_eq!(*prop.value().unwrap(), 1.0);
    assert!(!prop.is_dirty());
}

#[test]
fn test_field_mode_has_no_scalar_value() {
    let mut prop = vector_width();
    prop.set_json(&json!({"field": "w"})).unwrap();
    assert!(prop.is_dirty());
    assert_eq!(prop.spec_json(), json!({"field": "w"}));

    let err = prop.value().unwrap_err();
    assert!(matches!(err, PlotError::InvalidState { .. }));
    assert!(err.to_string().contains("line_width"));
}

#[test]
fn test_spec_objects_need_exactly_one_mode() {
    let mut prop = width();
    assert!(prop.set_json(&json!({"value": 1, "field": "w"})).is_err());
    assert!(prop.set_json(&json!({"field": 3})).is_err());
    // Plain properties do not take units
    assert!(prop.set_json(&json!({"value": 1, "units": "screen"})).is_err());
}

#[test]
fn test_change_signal_fires_once_per_mutation() {
    let mut prop = width();
    let fired = Rc::new(Cell::new(0));
    let counter = fired.clone();
    prop.on_change(move |change| {
        assert_eq!(change.attr, "line_width");
        counter.set(counter.get() + 1);
    });

    prop.set_value(2.0).unwrap();
    prop.set_json(&json!(3.0)).unwrap();
    prop.reset();
    assert_eq!(fired.get(), 3);
    assert!(!prop.is_dirty());
}

#[test]
fn test_failed_validation_does_not_notify() {
    let mut prop = width();
    let fired = Rc::new(Cell::new(0));
    let counter = fired.clone();
    prop.on_change(move |_| counter.set(counter.get() + 1));

    assert!(prop.set_value(-5.0).is_err());
    assert_eq!(fired.get(), 0);
}

#[test]
fn test_version_increases() {
    let mut prop = width();
    let before = prop.version();
    prop.set_value(3.0).unwrap();
    assert!(prop.version() > before);
}

// ============================================================================
// Kinds
// ============================================================================

#[test]
fn test_kind_validation() {
    assert!(Kind::Percent.valid(&json!(0.0)));
    assert!(Kind::Percent.valid(&json!(1.0)));
    assert!(!Kind::Percent.valid(&json!(1.5)));
    assert!(Kind::Int.valid(&json!(3)));
    assert!(!Kind::Int.valid(&json!(3.5)));
    assert!(Kind::Color.valid(&json!("firebrick")));
    assert!(Kind::Color.valid(&json!("#ff000080")));
    assert!(Kind::Color.valid(&json!([255, 0, 0, 0.5])));
    assert!(!Kind::Color.valid(&json!("not-a-color")));
    assert!(Kind::FontSize.valid(&json!("12px")));
    assert!(!Kind::FontSize.valid(&json!("big")));
    assert!(Kind::Nullable(&Kind::Color).valid(&json!(null)));
    assert!(Kind::Enum(&["a", "b"]).valid(&json!("b")));
    assert!(!Kind::Enum(&["a", "b"]).valid(&json!("c")));
}

// ============================================================================
// Vector and scalar specs
// ============================================================================

#[test]
fn test_value_broadcasts_to_source_length() {
    let spec = NumberSpec::new("Test", "size", Kind::NonNegative, 4.0);
    let data = source(&[("x", &[1.0, 2.0, 3.0])]);
    assert_eq!(spec.array(&data).unwrap(), vec![4.0, 4.0, 4.0]);

    // Length 1 when the source has no columns
    assert_eq!(spec.array(&ColumnDataSource::new()).unwrap(), vec![4.0]);
}

#[test]
fn test_field_reads_column() {
    let mut spec = NumberSpec::new("Test", "size", Kind::NonNegative, 4.0);
    spec.set_field("s").unwrap();
    let data = source(&[("s", &[1.0, 5.0])]);
    assert_eq!(spec.array(&data).unwrap(), vec![1.0, 5.0]);
}

#[test]
fn test_transform_applies_after_resolution() {
    let mut spec = NumberSpec::new("Test", "x", Kind::Number, 0.0);
    spec.set_field("x").unwrap();
    spec.set_transform(Some(Rc::new(Dodge::new(0.5))));
    let data = source(&[("x", &[1.0, 2.0])]);
    assert_eq!(spec.array(&data).unwrap(), vec![1.5, 2.5]);
    assert_eq!(spec.spec_json(), json!({"field": "x", "transform": "Dodge"}));
}

#[test]
fn test_transform_must_preserve_length() {
    let mut spec = NumberSpec::new("Test", "x", Kind::Number, 0.0);
    spec.set_field("x").unwrap();
    spec.set_transform(Some(Rc::new(FnTransform::new("head", |column: &Column| {
        let values = column.to_numbers("x")?;
        Ok(Column::Numbers(values.into_iter().take(1).collect()))
    }))));
    let data = source(&[("x", &[1.0, 2.0, 3.0])]);
    let err = spec.array(&data).unwrap_err();
    assert!(matches!(
        err,
        PlotError::LengthMismatch {
            expected: 3,
            actual: 1,
            ..
        }
    ));
}

#[test]
fn test_expressions() {
    let data = source(&[("a", &[1.0, 2.0, 3.0]), ("b", &[10.0, 20.0, 30.0])]);

    let mut stacked = NumberSpec::new("Test", "top", Kind::Number, 0.0);
    stacked.set_expr(Rc::new(Stack::new(["a", "b"]))).unwrap();
    assert_eq!(stacked.array(&data).unwrap(), vec![11.0, 22.0, 33.0]);

    let mut summed = NumberSpec::new("Test", "top", Kind::Number, 0.0);
    summed.set_expr(Rc::new(CumSum::new("a"))).unwrap();
    assert_eq!(summed.array(&data).unwrap(), vec![1.0, 3.0, 6.0]);
    assert_eq!(summed.spec_json(), json!({"expr": "CumSum"}));
}

#[test]
fn test_string_spec_reads_string_column() {
    let mut spec: StringSpec = VectorSpec::new("Test", "text", Kind::String, String::new());
    let labels = ColumnDataSource::from_json_str(r#"{"t": ["a", "b"]}"#).unwrap();
    spec.set_field("t").unwrap();
    assert_eq!(spec.array(&labels).unwrap(), vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn test_scalar_spec_get() {
    let mut spec = ScalarSpec::new("Label", "text", Kind::String, "hello".to_string());
    assert_eq!(spec.get().unwrap(), "hello");
    // Value-only: a field is refused and the literal survives
    assert!(spec.set_field("t").is_err());
    assert!(spec.set_json(&json!({"field": "t"})).is_err());
    assert_eq!(spec.get().unwrap(), "hello");
    assert!(!spec.is_dirty());
}
