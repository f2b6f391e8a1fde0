//! Unit tests for column data sources: construction, streaming and patching.

use crate::helpers::source;
use plotcore::PlotError;
use plotcore::data::{Column, ColumnDataSource, DataSource, SourceChange};
use plotcore::util::{NDArray, NDArrayData};
use serde_json::json;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

fn record_changes(source: &mut ColumnDataSource) -> Rc<RefCell<Vec<SourceChange>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    source
        .change_mut()
        .connect(move |change| sink.borrow_mut().push(change.clone()));
    seen
}

fn numbers(name: &str, values: &[f64]) -> (String, Column) {
    (name.to_string(), Column::Numbers(values.to_vec()))
}

#[test]
fn test_json_columns() {
    let data = ColumnDataSource::from_json_str(
        r#"{"x": [1, 2.5, null], "label": ["a", "b", "c"], "flag": [true, false, true]}"#,
    )
    .unwrap();
    assert_eq!(data.get_length(), Some(3));
    assert_eq!(data.column_names(), vec!["flag", "label", "x"]);

    let Some(Column::Numbers(x)) = data.get_column("x") else {
        panic!("x should be numeric");
    };
    assert_eq!(&x[..2], &[1.0, 2.5]);
    assert!(x[2].is_nan());
    assert!(matches!(data.get_column("label"), Some(Column::Strings(_))));
}

#[test]
fn test_empty_source_has_no_length() {
    assert_eq!(ColumnDataSource::new().get_length(), None);
}

#[test]
fn test_columns_must_share_length() {
    let mut data = source(&[("x", &[1.0, 2.0])]);
    let err = data.insert("y", Column::Numbers(vec![1.0])).unwrap_err();
    assert!(matches!(
        err,
        PlotError::LengthMismatch {
            expected: 2,
            actual: 1,
            ..
        }
    ));
    // The only column may be replaced with a new length
    data.insert("x", Column::Numbers(vec![1.0])).unwrap();
    assert_eq!(data.get_length(), Some(1));
}

#[test]
fn test_set_data_replaces_and_notifies() {
    let mut data = source(&[("x", &[1.0])]);
    let seen = record_changes(&mut data);

    data.set_data(BTreeMap::from([numbers("y", &[4.0, 5.0])])).unwrap();
    assert!(data.get_column("x").is_none());
    assert_eq!(data.get_length(), Some(2));
    assert_eq!(*seen.borrow(), vec![SourceChange::Replaced]);

    let uneven = BTreeMap::from([numbers("a", &[1.0]), numbers("b", &[1.0, 2.0])]);
    assert!(data.set_data(uneven).is_err());
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn test_stream_appends_and_rolls_over() {
    let mut data = source(&[("x", &[1.0, 2.0, 3.0]), ("y", &[10.0, 20.0, 30.0])]);
    let seen = record_changes(&mut data);

    let rows = BTreeMap::from([numbers("x", &[4.0, 5.0]), numbers("y", &[40.0, 50.0])]);
    data.stream(rows, Some(4)).unwrap();

    assert_eq!(
        data.get_column("x"),
        Some(&Column::Numbers(vec![2.0, 3.0, 4.0, 5.0]))
    );
    assert_eq!(
        data.get_column("y"),
        Some(&Column::Numbers(vec![20.0, 30.0, 40.0, 50.0]))
    );
    assert_eq!(
        *seen.borrow(),
        vec![SourceChange::Streamed {
            appended: 2,
            dropped: 1
        }]
    );
}

#[test]
fn test_stream_requires_every_column() {
    let mut data = source(&[("x", &[1.0]), ("y", &[1.0])]);
    let err = data
        .stream(BTreeMap::from([numbers("x", &[2.0])]), None)
        .unwrap_err();
    assert!(matches!(err, PlotError::ColumnType { ref attr, .. } if attr == "y"));
    assert_eq!(data.get_length(), Some(1));
}

#[test]
fn test_stream_rejects_mixed_types() {
    let mut data = source(&[("x", &[1.0])]);
    let rows = BTreeMap::from([("x".to_string(), Column::Strings(vec!["a".into()]))]);
    assert!(matches!(
        data.stream(rows, None),
        Err(PlotError::ColumnType { .. })
    ));
}

#[test]
fn test_stream_rejects_unknown_columns() {
    let mut data = source(&[("x", &[1.0, 2.0])]);
    let seen = record_changes(&mut data);
    let rows = BTreeMap::from([numbers("x", &[3.0]), numbers("z", &[1.0])]);

    let err = data.stream(rows, None).unwrap_err();
    assert!(matches!(err, PlotError::Validation { ref attr, .. } if attr == "z"));
    assert_eq!(data.column_names(), vec!["x"]);
    assert_eq!(data.get_length(), Some(2));
    assert!(seen.borrow().is_empty());
}

#[test]
fn test_failed_stream_leaves_every_column_alone() {
    let mut data = source(&[("a", &[1.0, 2.0]), ("b", &[3.0, 4.0])]);
    let rows = BTreeMap::from([
        numbers("a", &[5.0]),
        ("b".to_string(), Column::Strings(vec!["five".into()])),
    ]);

    assert!(data.stream(rows, None).is_err());
    assert_eq!(data.get_column("a"), Some(&Column::Numbers(vec![1.0, 2.0])));
    assert_eq!(data.get_column("b"), Some(&Column::Numbers(vec![3.0, 4.0])));
}

#[test]
fn test_failed_patch_leaves_column_alone() {
    let mut data = source(&[("x", &[1.0, 2.0])]);
    let seen = record_changes(&mut data);

    assert!(data.patch("x", &[(0, json!(9)), (7, json!(1))]).is_err());
    assert!(data.patch("x", &[(1, json!(9)), (0, json!("nine"))]).is_err());
    assert_eq!(data.get_column("x"), Some(&Column::Numbers(vec![1.0, 2.0])));
    assert!(seen.borrow().is_empty());
}

#[test]
fn test_patch_overwrites_rows() {
    let mut data = source(&[("x", &[1.0, 2.0, 3.0])]);
    let seen = record_changes(&mut data);

    data.patch("x", &[(0, json!(9)), (2, json!(null))]).unwrap();
    let Some(Column::Numbers(x)) = data.get_column("x") else {
        panic!("x should be numeric");
    };
    assert_eq!(x[0], 9.0);
    assert_eq!(x[1], 2.0);
    assert!(x[2].is_nan());
    assert_eq!(
        *seen.borrow(),
        vec![SourceChange::Patched {
            column: "x".into(),
            rows: vec![0, 2]
        }]
    );
}

#[test]
fn test_patch_errors() {
    let mut data = source(&[("x", &[1.0])]);
    assert!(matches!(
        data.patch("nope", &[(0, json!(1))]),
        Err(PlotError::ColumnType { .. })
    ));
    assert!(matches!(
        data.patch("x", &[(5, json!(1))]),
        Err(PlotError::LengthMismatch { .. })
    ));
    assert!(matches!(
        data.patch("x", &[(0, json!("one"))]),
        Err(PlotError::Validation { .. })
    ));
}

#[test]
fn test_remove_column() {
    let mut data = source(&[("x", &[1.0]), ("y", &[2.0])]);
    assert!(data.remove("x").is_some());
    assert!(data.remove("x").is_none());
    assert_eq!(data.column_names(), vec!["y"]);
}

#[test]
fn test_ndarray_shape_must_cover_buffer() {
    let err = ColumnDataSource::from_json_str(
        r#"{"x": {"data": {"dtype": "float64", "data": [1.0, 2.0]}, "shape": [3]}}"#,
    )
    .unwrap_err();
    assert!(matches!(err, PlotError::Validation { ref attr, .. } if attr == "x"));

    let mut data = ColumnDataSource::new();
    let ragged = NDArray {
        data: NDArrayData::Float64(vec![1.0, 2.0]),
        shape: vec![3],
    };
    assert!(matches!(
        data.insert("x", Column::NDArray(ragged)),
        Err(PlotError::Validation { .. })
    ));
    assert_eq!(data.get_length(), None);
}
