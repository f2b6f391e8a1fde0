//! Column storage for data sources.

use crate::error::{PlotError, PlotResult};
use crate::util::{Color, NDArray};
use serde_json::Value;

/// A single named column of a data source.
///
/// Plain sequences keep their element type; homogeneous numeric buffers are
/// carried as an [`NDArray`] so that color resolution can branch on dtype
/// and dimensionality.
#[derive(Clone, Debug, PartialEq)]
pub enum Column {
    Numbers(Vec<f64>),
    Strings(Vec<String>),
    Bools(Vec<bool>),
    Colors(Vec<Option<Color>>),
    NDArray(NDArray),
}

impl Column {
    /// A numeric column of `len` NaN values (the "missing" sentinel)
    pub fn nan(len: usize) -> Self {
        Column::Numbers(vec![f64::NAN; len])
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Numbers(v) => v.len(),
            Column::Strings(v) => v.len(),
            Column::Bools(v) => v.len(),
            Column::Colors(v) => v.len(),
            Column::NDArray(a) => a.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reject buffers whose shape disagrees with their data
    pub fn check(&self, name: &str) -> PlotResult<()> {
        match self {
            Column::NDArray(array) => array.check_shape().map_err(|reason| PlotError::Validation {
                attr: name.to_string(),
                value: reason,
            }),
            _ => Ok(()),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Column::Numbers(_) => "numbers",
            Column::Strings(_) => "strings",
            Column::Bools(_) => "bools",
            Column::Colors(_) => "colors",
            Column::NDArray(_) => "ndarray",
        }
    }

    /// Keep only the given rows, in the given order
    pub fn select(&self, rows: &[usize]) -> Self {
        fn pick<T: Clone>(v: &[T], rows: &[usize]) -> Vec<T> {
            rows.iter().map(|&r| v[r].clone()).collect()
        }
        match self {
            Column::Numbers(v) => Column::Numbers(pick(v, rows)),
            Column::Strings(v) => Column::Strings(pick(v, rows)),
            Column::Bools(v) => Column::Bools(pick(v, rows)),
            Column::Colors(v) => Column::Colors(pick(v, rows)),
            Column::NDArray(a) => Column::NDArray(a.select(rows)),
        }
    }

    /// Widen to `f64`; booleans map to 0/1. Strings and colors cannot be
    /// read as numbers.
    pub fn to_numbers(&self, attr: &str) -> PlotResult<Vec<f64>> {
        match self {
            Column::Numbers(v) => Ok(v.clone()),
            Column::Bools(v) => Ok(v.iter().map(|&b| if b { 1.0 } else { 0.0 }).collect()),
            Column::NDArray(a) if a.dimension() == 1 => Ok(a.to_f64()),
            Column::NDArray(a) => Err(PlotError::UnsupportedEncoding {
                dtype: a.dtype().to_string(),
                dimension: a.dimension(),
            }),
            Column::Strings(_) | Column::Colors(_) => Err(PlotError::ColumnType {
                attr: attr.to_string(),
                expected: "numbers",
            }),
        }
    }

    /// Build a column from a JSON array (or a serialized [`NDArray`]).
    ///
    /// Arrays of numbers and nulls become numbers (null is NaN), arrays of
    /// strings and nulls become strings (null is empty), arrays of booleans
    /// become bools, and anything else must be a sequence of color literals.
    pub fn from_json(name: &str, value: &Value) -> PlotResult<Self> {
        let items = match value {
            Value::Array(items) => items,
            Value::Object(_) => {
                return serde_json::from_value::<NDArray>(value.clone())
                    .map(Column::NDArray)
                    .map_err(|_| PlotError::validation(name, value));
            }
            _ => return Err(PlotError::validation(name, value)),
        };

        if items.iter().all(|v| v.is_number() || v.is_null()) {
            return Ok(Column::Numbers(
                items.iter().map(|v| v.as_f64().unwrap_or(f64::NAN)).collect(),
            ));
        }
        if items.iter().all(|v| v.is_string() || v.is_null()) {
            return Ok(Column::Strings(
                items
                    .iter()
                    .map(|v| v.as_str().unwrap_or_default().to_string())
                    .collect(),
            ));
        }
        if items.iter().all(Value::is_boolean) {
            return Ok(Column::Bools(
                items.iter().map(|v| v.as_bool().unwrap_or(false)).collect(),
            ));
        }
        serde_json::from_value::<Vec<Option<Color>>>(value.clone())
            .map(Column::Colors)
            .map_err(|_| PlotError::validation(name, value))
    }

    /// True when `other` can be appended by [`extend`](Self::extend)
    pub fn can_extend(&self, other: &Column) -> bool {
        matches!(
            (self, other),
            (Column::Numbers(_), Column::Numbers(_))
                | (Column::Strings(_), Column::Strings(_))
                | (Column::Bools(_), Column::Bools(_))
                | (Column::Colors(_), Column::Colors(_))
        )
    }

    /// Append rows of the same element type (streaming)
    pub fn extend(&mut self, name: &str, other: Column) -> PlotResult<()> {
        match (self, other) {
            (Column::Numbers(a), Column::Numbers(b)) => a.extend(b),
            (Column::Strings(a), Column::Strings(b)) => a.extend(b),
            (Column::Bools(a), Column::Bools(b)) => a.extend(b),
            (Column::Colors(a), Column::Colors(b)) => a.extend(b),
            (this, _) => {
                return Err(PlotError::ColumnType {
                    attr: name.to_string(),
                    expected: this.type_name(),
                });
            }
        }
        Ok(())
    }

    /// Drop the first `count` rows (streaming rollover)
    pub fn drop_front(&mut self, count: usize) {
        let count = count.min(self.len());
        match self {
            Column::Numbers(v) => {
                v.drain(..count);
            }
            Column::Strings(v) => {
                v.drain(..count);
            }
            Column::Bools(v) => {
                v.drain(..count);
            }
            Column::Colors(v) => {
                v.drain(..count);
            }
            Column::NDArray(a) => {
                let rows: Vec<usize> = (count..a.len()).collect();
                *a = a.select(&rows);
            }
        }
    }

    /// Replace a single row (patching)
    pub fn set(&mut self, name: &str, row: usize, value: &Value) -> PlotResult<()> {
        if row >= self.len() {
            return Err(PlotError::LengthMismatch {
                attr: name.to_string(),
                expected: self.len(),
                actual: row + 1,
            });
        }
        let invalid = || PlotError::validation(name, value);
        match self {
            Column::Numbers(v) => {
                v[row] = if value.is_null() {
                    f64::NAN
                } else {
                    value.as_f64().ok_or_else(invalid)?
                }
            }
            Column::Strings(v) => v[row] = value.as_str().ok_or_else(invalid)?.to_string(),
            Column::Bools(v) => v[row] = value.as_bool().ok_or_else(invalid)?,
            Column::Colors(v) => {
                v[row] = serde_json::from_value(value.clone()).map_err(|_| invalid())?
            }
            Column::NDArray(_) => {
                return Err(PlotError::ColumnType {
                    attr: name.to_string(),
                    expected: "a sequence column",
                });
            }
        }
        Ok(())
    }
}
