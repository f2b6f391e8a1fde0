//! Loading column data sources from files with polars.

use crate::data::{Column, ColumnDataSource};
use crate::error::PlotResult;
use polars::prelude::{AnyValue, DataFrame, DataType, LazyCsvReader, LazyFileListReader};
use std::path::Path;

impl ColumnDataSource {
    /// Load a CSV (or TSV, by extension) file.
    ///
    /// Numeric columns become numbers (nulls are NaN), boolean columns become
    /// bools and everything else is read as strings.
    pub fn from_csv(path: &Path) -> PlotResult<Self> {
        let start = std::time::Instant::now();

        let separator = if path.extension().map(|e| e == "tsv").unwrap_or(false) {
            b'\t'
        } else {
            b','
        };

        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_separator(separator)
            .with_infer_schema_length(Some(1000))
            .finish()?
            .collect()?;

        let source = Self::from_frame(&df)?;

        tracing::debug!(
            "Loaded CSV {} with {} rows x {} cols in {:?}",
            path.display(),
            df.height(),
            df.width(),
            start.elapsed()
        );

        Ok(source)
    }

    pub fn from_frame(df: &DataFrame) -> PlotResult<Self> {
        let mut source = Self::new();
        for name in df.get_column_names() {
            let column = df.column(name)?;
            let values = (0..df.height()).map(|i| column.get(i).unwrap_or(AnyValue::Null));
            let converted = match column.dtype() {
                DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
                | DataType::Float32
                | DataType::Float64 => Column::Numbers(values.map(|v| any_to_f64(&v)).collect()),
                DataType::Boolean => Column::Bools(
                    values
                        .map(|v| matches!(v, AnyValue::Boolean(true)))
                        .collect(),
                ),
                _ => Column::Strings(values.map(|v| any_to_string(&v)).collect()),
            };
            source.insert(name.to_string(), converted)?;
        }
        Ok(source)
    }
}

fn any_to_f64(value: &AnyValue) -> f64 {
    match value {
        AnyValue::Int8(v) => *v as f64,
        AnyValue::Int16(v) => *v as f64,
        AnyValue::Int32(v) => *v as f64,
        AnyValue::Int64(v) => *v as f64,
        AnyValue::UInt8(v) => *v as f64,
        AnyValue::UInt16(v) => *v as f64,
        AnyValue::UInt32(v) => *v as f64,
        AnyValue::UInt64(v) => *v as f64,
        AnyValue::Float32(v) => *v as f64,
        AnyValue::Float64(v) => *v,
        _ => f64::NAN,
    }
}

fn any_to_string(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}
