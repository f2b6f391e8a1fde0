//! Unit tests for color parsing, packing and color specs.

use crate::helpers::source;
use plotcore::PlotError;
use plotcore::core::{AnyProperty, ColorSpec, Kind, color_array};
use plotcore::data::{Column, ColumnDataSource, LinearColorMapper};
use plotcore::util::{
    Color, NDArray, NDArrayData, color2css, color2rgba, decode_rgba, encode_rgba, parse_css,
};
use serde_json::json;
use std::rc::Rc;

#[test]
fn test_packing_is_big_endian_rgba() {
    assert_eq!(encode_rgba([0x11, 0x22, 0x33, 0x44]), 0x1122_3344);
    assert_eq!(decode_rgba(0xFF00_0080), [255, 0, 0, 128]);
}

#[test]
fn test_css_forms() {
    assert_eq!(parse_css("red"), Some([255, 0, 0, 255]));
    assert_eq!(parse_css("#0f0"), Some([0, 255, 0, 255]));
    assert_eq!(parse_css("#0000ff80"), Some([0, 0, 255, 128]));
    assert_eq!(parse_css("rgb(1, 2, 3)"), Some([1, 2, 3, 255]));
    assert_eq!(parse_css("transparent"), Some([0, 0, 0, 0]));
    assert_eq!(parse_css("nope"), None);
}

#[test]
fn test_null_color_is_transparent() {
    assert_eq!(color2rgba(None), [0, 0, 0, 0]);
    assert_eq!(color2rgba(Some(&Color::css("bogus"))), [0, 0, 0, 0]);
    assert_eq!(color2rgba(Some(&Color::rgba(10, 20, 30, 1.0))), [10, 20, 30, 255]);
}

#[test]
fn test_css_output_multiplies_alpha() {
    assert_eq!(color2css([255, 0, 0, 255], 1.0), "rgba(255, 0, 0, 1)");
    assert_eq!(color2css([255, 0, 0, 255], 0.5), "rgba(255, 0, 0, 0.5)");
    assert_eq!(color2css([0, 0, 0, 0], 1.0), "rgba(0, 0, 0, 0)");
}

#[test]
fn test_string_column_packs_each_row() {
    let column = Column::Strings(vec!["red".into(), "not a color".into()]);
    let colors = color_array("fill_color", &column).unwrap();
    assert_eq!(colors.0, vec![0xFF00_00FF, 0]);
}

#[test]
fn test_uint8_rgba_buffer() {
    let array = NDArray {
        shape: vec![2, 4],
        data: NDArrayData::Uint8(vec![255, 0, 0, 255, 0, 0, 255, 128]),
    };
    let colors = color_array("fill_color", &Column::NDArray(array)).unwrap();
    assert_eq!(colors.rgba(0), [255, 0, 0, 255]);
    assert_eq!(colors.rgba(1), [0, 0, 255, 128]);
}

#[test]
fn test_uint8_vector_is_grayscale() {
    let array = NDArray::vector(NDArrayData::Uint8(vec![0, 128, 255]));
    let colors = color_array("fill_color", &Column::NDArray(array)).unwrap();
    assert_eq!(colors.rgba(0), [0, 0, 0, 255]);
    assert_eq!(colors.rgba(1), [128, 128, 128, 255]);
    assert_eq!(colors.rgba(2), [255, 255, 255, 255]);
}

#[test]
fn test_uint8_rgb_buffer_is_opaque() {
    let array = NDArray::matrix(NDArrayData::Uint8(vec![10, 20, 30, 40, 50, 60]), 2, 3).unwrap();
    let colors = color_array("fill_color", &Column::NDArray(array)).unwrap();
    assert_eq!(colors.rgba(0), [10, 20, 30, 255]);
    assert_eq!(colors.rgba(1), [40, 50, 60, 255]);
}

#[test]
fn test_float_rgba_buffer_scales_alpha() {
    let array = NDArray::matrix(
        NDArrayData::Float32(vec![1.0, 0.0, 0.0, 0.5, 0.0, 1.0, 0.0, 0.0]),
        2,
        4,
    )
    .unwrap();
    let colors = color_array("fill_color", &Column::NDArray(array)).unwrap();
    assert_eq!(colors.rgba(0), [255, 0, 0, 128]);
    assert_eq!(colors.rgba(1), [0, 255, 0, 0]);
}

#[test]
fn test_float_buffer_needs_three_or_four_channels() {
    let array = NDArray::matrix(NDArrayData::Float64(vec![0.5; 10]), 2, 5).unwrap();
    let err = color_array("fill_color", &Column::NDArray(array)).unwrap_err();
    assert!(matches!(
        err,
        PlotError::UnsupportedEncoding { dimension: 2, .. }
    ));
    assert_eq!(err.to_string(), "invalid color array: dtype float64 with dimension 2");
}

#[test]
fn test_unsupported_buffer_reports_dtype_and_dimension() {
    let array = NDArray {
        shape: vec![1, 2],
        data: NDArrayData::Uint8(vec![1, 2]),
    };
    let err = color_array("fill_color", &Column::NDArray(array)).unwrap_err();
    assert!(matches!(
        err,
        PlotError::UnsupportedEncoding { dimension: 2, .. }
    ));
}

#[test]
fn test_color_spec_field_and_value() {
    let mut spec = ColorSpec::new("Test", "fill_color", Kind::Nullable(&Kind::Color), Some(Color::css("blue")));
    let colors = spec.array(&ColumnDataSource::new()).unwrap();
    assert_eq!(colors.rgba(0), [0, 0, 255, 255]);

    spec.set_json(&json!(null)).unwrap();
    let colors = spec.array(&ColumnDataSource::new()).unwrap();
    assert_eq!(colors.rgba(0), [0, 0, 0, 0]);

    assert!(spec.set_json(&json!("definitely-not-a-color")).is_err());
}

#[test]
fn test_color_mapper_transform() {
    let mut spec = ColorSpec::new("Test", "fill_color", Kind::Nullable(&Kind::Color), None);
    spec.set_field("v").unwrap();
    spec.set_transform(Some(Rc::new(LinearColorMapper::new(
        vec![Color::css("black"), Color::css("white")],
        0.0,
        1.0,
    ))));
    let data = source(&[("v", &[0.0, 1.0])]);
    let colors = spec.array(&data).unwrap();
    assert_eq!(colors.rgba(0), [0, 0, 0, 255]);
    assert_eq!(colors.rgba(1), [255, 255, 255, 255]);
}
