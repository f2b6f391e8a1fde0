//! Column data sources consumed by field-mode specs.

use crate::core::Signal;
use crate::data::Column;
use crate::error::{PlotError, PlotResult};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// What changed in a data source
#[derive(Clone, Debug, PartialEq)]
pub enum SourceChange {
    /// All columns were replaced
    Replaced,
    /// `appended` rows were streamed in and `dropped` rows rolled off the front
    Streamed { appended: usize, dropped: usize },
    /// Individual rows of `column` were overwritten
    Patched { column: String, rows: Vec<usize> },
}

/// Tabular data with named, equal-length columns.
pub trait DataSource {
    /// Logical row count; `None` when the source cannot tell (e.g. no columns)
    fn get_length(&self) -> Option<usize>;

    fn get_column(&self, name: &str) -> Option<&Column>;

    fn column_names(&self) -> Vec<&str>;

    /// Change notification fired on replace, stream and patch
    fn change(&self) -> &Signal<SourceChange>;
}

/// In-memory column dictionary.
#[derive(Debug, Default)]
pub struct ColumnDataSource {
    columns: BTreeMap<String, Column>,
    change: Signal<SourceChange>,
}

impl ColumnDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(name, column)` pairs. Columns must share a length.
    pub fn from_columns<I, S>(columns: I) -> PlotResult<Self>
    where
        I: IntoIterator<Item = (S, Column)>,
        S: Into<String>,
    {
        let mut source = Self::new();
        for (name, column) in columns {
            source.insert(name, column)?;
        }
        Ok(source)
    }

    /// Parse a `{"name": [...], ...}` dictionary
    pub fn from_json_str(text: &str) -> PlotResult<Self> {
        let value: Value = serde_json::from_str(text)?;
        let Value::Object(map) = value else {
            return Err(PlotError::validation("data", &value));
        };
        Self::from_json_map(&map)
    }

    pub fn from_json_map(map: &Map<String, Value>) -> PlotResult<Self> {
        let mut source = Self::new();
        for (name, value) in map {
            source.insert(name.clone(), Column::from_json(name, value)?)?;
        }
        Ok(source)
    }

    /// Add or replace one column without notifying listeners
    pub fn insert(&mut self, name: impl Into<String>, column: Column) -> PlotResult<()> {
        let name = name.into();
        column.check(&name)?;
        if let Some(expected) = self.get_length() {
            let replacing_only_column = self.columns.len() == 1 && self.columns.contains_key(&name);
            if column.len() != expected && !replacing_only_column {
                return Err(PlotError::LengthMismatch {
                    attr: name,
                    expected,
                    actual: column.len(),
                });
            }
        }
        self.columns.insert(name, column);
        Ok(())
    }

    /// Replace all columns at once
    pub fn set_data(&mut self, columns: BTreeMap<String, Column>) -> PlotResult<()> {
        for (name, column) in &columns {
            column.check(name)?;
        }
        let mut lengths = columns.iter().map(|(name, c)| (name, c.len()));
        if let Some((_, expected)) = lengths.next() {
            if let Some((name, actual)) = lengths.find(|(_, len)| *len != expected) {
                return Err(PlotError::LengthMismatch {
                    attr: name.clone(),
                    expected,
                    actual,
                });
            }
        }
        self.columns = columns;
        self.change.emit(&SourceChange::Replaced);
        Ok(())
    }

    /// Append rows to every column, keeping at most `rollover` rows.
    ///
    /// On a source with columns, `new_data` must name exactly the existing
    /// columns with matching element types; an empty source takes the new
    /// columns as they are. Everything is checked before any column changes.
    pub fn stream(
        &mut self,
        new_data: BTreeMap<String, Column>,
        rollover: Option<usize>,
    ) -> PlotResult<()> {
        if !self.columns.is_empty() {
            for name in self.columns.keys() {
                if !new_data.contains_key(name) {
                    return Err(PlotError::ColumnType {
                        attr: name.clone(),
                        expected: "a streamed value for every column",
                    });
                }
            }
            for (name, column) in &new_data {
                match self.columns.get(name) {
                    Some(existing) if existing.can_extend(column) => {}
                    Some(existing) => {
                        return Err(PlotError::ColumnType {
                            attr: name.clone(),
                            expected: existing.type_name(),
                        });
                    }
                    None => {
                        return Err(PlotError::Validation {
                            attr: name.clone(),
                            value: "column not present in the data source".into(),
                        });
                    }
                }
            }
        }
        for (name, column) in &new_data {
            column.check(name)?;
        }
        let appended = new_data.values().next().map(Column::len).unwrap_or(0);
        if let Some((name, column)) = new_data.iter().find(|(_, c)| c.len() != appended) {
            return Err(PlotError::LengthMismatch {
                attr: name.clone(),
                expected: appended,
                actual: column.len(),
            });
        }

        for (name, column) in new_data {
            match self.columns.get_mut(&name) {
                Some(existing) => existing.extend(&name, column)?,
                None => {
                    self.columns.insert(name, column);
                }
            }
        }

        let mut dropped = 0;
        if let (Some(limit), Some(len)) = (rollover, self.get_length()) {
            if len > limit {
                dropped = len - limit;
                for column in self.columns.values_mut() {
                    column.drop_front(dropped);
                }
            }
        }

        tracing::debug!(appended, dropped, "streamed rows into column data source");
        self.change.emit(&SourceChange::Streamed { appended, dropped });
        Ok(())
    }

    /// Overwrite individual rows of one column.
    ///
    /// Either every patch applies or the column is left untouched.
    pub fn patch(&mut self, name: &str, patches: &[(usize, Value)]) -> PlotResult<()> {
        let column = self
            .columns
            .get_mut(name)
            .ok_or_else(|| PlotError::ColumnType {
                attr: name.to_string(),
                expected: "an existing column",
            })?;
        let mut patched = column.clone();
        for (row, value) in patches {
            patched.set(name, *row, value)?;
        }
        *column = patched;
        self.change.emit(&SourceChange::Patched {
            column: name.to_string(),
            rows: patches.iter().map(|(row, _)| *row).collect(),
        });
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Option<Column> {
        self.columns.remove(name)
    }

    pub fn change_mut(&mut self) -> &mut Signal<SourceChange> {
        &mut self.change
    }
}

impl DataSource for ColumnDataSource {
    fn get_length(&self) -> Option<usize> {
        self.columns.values().next().map(Column::len)
    }

    fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    fn change(&self) -> &Signal<SourceChange> {
        &self.change
    }
}
