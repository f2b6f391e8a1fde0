//! Computed columns for expr-mode specs.

use crate::data::{Column, DataSource};
use crate::error::{PlotError, PlotResult};
use std::fmt;

/// Computes one value per source row.
pub trait Expression: fmt::Debug {
    /// Name used when a spec is serialized
    fn name(&self) -> &str;

    fn v_compute(&self, source: &dyn DataSource) -> PlotResult<Column>;
}

/// Row-wise sum of several numeric fields
#[derive(Clone, Debug, PartialEq)]
pub struct Stack {
    pub fields: Vec<String>,
}

impl Stack {
    pub fn new<S: Into<String>>(fields: impl IntoIterator<Item = S>) -> Self {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

impl Expression for Stack {
    fn name(&self) -> &str {
        "Stack"
    }

    fn v_compute(&self, source: &dyn DataSource) -> PlotResult<Column> {
        let len = source.get_length().unwrap_or(0);
        let mut result = vec![0.0; len];
        for field in &self.fields {
            let column = source.get_column(field).ok_or_else(|| PlotError::ColumnType {
                attr: field.clone(),
                expected: "an existing numeric column",
            })?;
            for (acc, value) in result.iter_mut().zip(column.to_numbers(field)?) {
                *acc += value;
            }
        }
        Ok(Column::Numbers(result))
    }
}

/// Cumulative sum of a numeric field.
///
/// With `include_zero` the output starts at zero and drops the last partial
/// sum, so that row `i` holds the sum of rows `0..i`.
#[derive(Clone, Debug, PartialEq)]
pub struct CumSum {
    pub field: String,
    pub include_zero: bool,
}

impl CumSum {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            include_zero: false,
        }
    }

    pub fn include_zero(mut self, include_zero: bool) -> Self {
        self.include_zero = include_zero;
        self
    }
}

impl Expression for CumSum {
    fn name(&self) -> &str {
        "CumSum"
    }

    fn v_compute(&self, source: &dyn DataSource) -> PlotResult<Column> {
        let column = source
            .get_column(&self.field)
            .ok_or_else(|| PlotError::ColumnType {
                attr: self.field.clone(),
                expected: "an existing numeric column",
            })?;
        let values = column.to_numbers(&self.field)?;
        let mut total = 0.0;
        let sums = values.iter().map(|value| {
            total += value;
            total
        });
        let result: Vec<f64> = if self.include_zero {
            std::iter::once(0.0).chain(sums).take(values.len()).collect()
        } else {
            sums.collect()
        };
        Ok(Column::Numbers(result))
    }
}
