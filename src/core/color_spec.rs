//! Color resolution into packed RGBA buffers.
//!
//! Every row becomes one `u32` in the crate-wide `0xRRGGBBAA` layout.

use crate::core::{VectorSpec, VectorValue};
use crate::data::Column;
use crate::error::{PlotError, PlotResult};
use crate::util::{Color, NDArray, NDArrayData, color2rgba, decode_rgba, encode_rgba, parse_css};

pub type ColorSpec = VectorSpec<Option<Color>>;

/// Packed colors, one per row
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorArray(pub Vec<u32>);

impl ColorArray {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<u32> {
        self.0.get(i).copied()
    }

    /// RGBA bytes of row `i`; out-of-range rows are transparent
    pub fn rgba(&self, i: usize) -> [u8; 4] {
        self.get(i).map(decode_rgba).unwrap_or([0, 0, 0, 0])
    }

    pub fn select(&self, rows: &[usize]) -> Self {
        ColorArray(rows.iter().map(|&r| self.0.get(r).copied().unwrap_or(0)).collect())
    }
}

impl VectorValue for Option<Color> {
    type Array = ColorArray;

    fn broadcast(value: &Self, len: usize) -> Column {
        Column::Colors(vec![value.clone(); len])
    }

    fn to_array(attr: &str, column: &Column) -> PlotResult<ColorArray> {
        color_array(attr, column)
    }
}

/// Convert any color-bearing column to packed colors.
///
/// Numeric buffers branch on dtype and dimension; plain sequences convert
/// element by element, with unparseable entries becoming transparent.
/// Plain numbers must be packed `u32` colors; NaN marks a missing row.
pub fn color_array(attr: &str, column: &Column) -> PlotResult<ColorArray> {
    match column {
        Column::NDArray(array) => ndarray_colors(array),
        Column::Numbers(values) => values
            .iter()
            .map(|&v| packed_color(attr, v))
            .collect::<PlotResult<Vec<_>>>()
            .map(ColorArray),
        Column::Strings(values) => Ok(ColorArray(
            values
                .iter()
                .map(|s| encode_rgba(parse_css(s).unwrap_or([0, 0, 0, 0])))
                .collect(),
        )),
        Column::Colors(values) => Ok(ColorArray(
            values.iter().map(|c| encode_rgba(color2rgba(c.as_ref()))).collect(),
        )),
        Column::Bools(_) => Err(PlotError::ColumnType {
            attr: attr.to_string(),
            expected: "colors",
        }),
    }
}

fn ndarray_colors(array: &NDArray) -> PlotResult<ColorArray> {
    let unsupported = || PlotError::UnsupportedEncoding {
        dtype: array.dtype().to_string(),
        dimension: array.dimension(),
    };
    let channels = match array.shape.as_slice() {
        [_] => 1,
        [_, d @ (3 | 4)] => *d,
        _ => return Err(unsupported()),
    };

    let packed = match (&array.data, channels) {
        (NDArrayData::Uint32(values), 1) => values.clone(),
        (NDArrayData::Uint8(values), 1) => values
            .iter()
            .map(|&gray| encode_rgba([gray, gray, gray, 255]))
            .collect(),
        (NDArrayData::Uint8(values), d) => values
            .chunks_exact(d)
            .map(|px| encode_rgba([px[0], px[1], px[2], if d == 4 { px[3] } else { 255 }]))
            .collect(),
        (NDArrayData::Float32(_) | NDArrayData::Float64(_), d) if d > 1 => array
            .to_f64()
            .chunks_exact(d)
            .map(|px| {
                let alpha = if d == 4 { px[3] } else { 1.0 };
                encode_rgba([scale(px[0]), scale(px[1]), scale(px[2]), scale(alpha)])
            })
            .collect(),
        _ => return Err(unsupported()),
    };
    Ok(ColorArray(packed))
}

fn packed_color(attr: &str, value: f64) -> PlotResult<u32> {
    if value.is_nan() {
        return Ok(0);
    }
    if value.fract() != 0.0 || !(0.0..=u32::MAX as f64).contains(&value) {
        return Err(PlotError::Validation {
            attr: attr.to_string(),
            value: value.to_string(),
        });
    }
    Ok(value as u32)
}

fn scale(channel: f64) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}
