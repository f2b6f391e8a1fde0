//! Vectorized transforms applied after a spec is resolved.

use crate::data::Column;
use crate::error::{PlotError, PlotResult};
use crate::util::Color;
use std::fmt;

/// Maps a resolved column to a column of the same length.
pub trait Transform: fmt::Debug {
    fn name(&self) -> &str;

    fn v_compute(&self, column: &Column) -> PlotResult<Column>;
}

/// Shift numeric values by a constant (side-by-side bars)
#[derive(Clone, Debug, PartialEq)]
pub struct Dodge {
    pub value: f64,
}

impl Dodge {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl Transform for Dodge {
    fn name(&self) -> &str {
        "Dodge"
    }

    fn v_compute(&self, column: &Column) -> PlotResult<Column> {
        let values = column.to_numbers("Dodge")?;
        Ok(Column::Numbers(values.into_iter().map(|v| v + self.value).collect()))
    }
}

/// Map numbers linearly onto a palette.
///
/// Values below `low` take `low_color` (or the first palette entry), values
/// above `high` take `high_color` (or the last entry), NaN takes `nan_color`.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearColorMapper {
    pub palette: Vec<Color>,
    pub low: f64,
    pub high: f64,
    pub low_color: Option<Color>,
    pub high_color: Option<Color>,
    pub nan_color: Color,
}

impl LinearColorMapper {
    pub fn new(palette: Vec<Color>, low: f64, high: f64) -> Self {
        Self {
            palette,
            low,
            high,
            low_color: None,
            high_color: None,
            nan_color: Color::css("gray"),
        }
    }

    fn map_value(&self, value: f64) -> Option<Color> {
        let (first, last) = (self.palette.first()?, self.palette.last()?);
        if value.is_nan() {
            return Some(self.nan_color.clone());
        }
        if value < self.low {
            return Some(self.low_color.clone().unwrap_or_else(|| first.clone()));
        }
        if value > self.high {
            return Some(self.high_color.clone().unwrap_or_else(|| last.clone()));
        }
        let span = self.high - self.low;
        let n = self.palette.len();
        let index = if span == 0.0 {
            n / 2
        } else {
            (((value - self.low) / span) * n as f64).floor() as usize
        };
        self.palette.get(index.min(n - 1)).cloned()
    }
}

impl Transform for LinearColorMapper {
    fn name(&self) -> &str {
        "LinearColorMapper"
    }

    fn v_compute(&self, column: &Column) -> PlotResult<Column> {
        if self.palette.is_empty() {
            return Err(PlotError::ColumnType {
                attr: "palette".to_string(),
                expected: "a non-empty palette",
            });
        }
        let values = column.to_numbers("LinearColorMapper")?;
        Ok(Column::Colors(values.into_iter().map(|v| self.map_value(v)).collect()))
    }
}

/// A transform backed by a closure
pub struct FnTransform {
    name: String,
    func: Box<dyn Fn(&Column) -> PlotResult<Column>>,
}

impl FnTransform {
    pub fn new(
        name: impl Into<String>,
        func: impl Fn(&Column) -> PlotResult<Column> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            func: Box::new(func),
        }
    }
}

impl fmt::Debug for FnTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTransform").field("name", &self.name).finish()
    }
}

impl Transform for FnTransform {
    fn name(&self) -> &str {
        &self.name
    }

    fn v_compute(&self, column: &Column) -> PlotResult<Column> {
        (self.func)(column)
    }
}
