//! Scalar and vectorized specs.

use crate::core::{AnyProperty, Kind, Property, PropertyValue, SpecMode};
use crate::data::{Column, DataSource};
use crate::error::{PlotError, PlotResult};
use crate::types::{FontStyle, MarkerType, TextAlign, TextBaseline};
use serde_json::Value;
use std::ops::{Deref, DerefMut};

/// A value type that can be broadcast to a column and read back per row.
pub trait VectorValue: PropertyValue {
    /// Typed per-row array produced by [`VectorSpec::array`]
    type Array: Clone + std::fmt::Debug;

    /// Repeat a literal `len` times
    fn broadcast(value: &Self, len: usize) -> Column;

    /// Column used for a field that the source does not have
    fn missing(len: usize) -> Column {
        Column::nan(len)
    }

    fn to_array(attr: &str, column: &Column) -> PlotResult<Self::Array>;
}

impl VectorValue for f64 {
    type Array = Vec<f64>;

    fn broadcast(value: &Self, len: usize) -> Column {
        Column::Numbers(vec![*value; len])
    }

    fn to_array(attr: &str, column: &Column) -> PlotResult<Vec<f64>> {
        column.to_numbers(attr)
    }
}

/// Nullable numbers; null broadcasts as NaN
impl VectorValue for Option<f64> {
    type Array = Vec<f64>;

    fn broadcast(value: &Self, len: usize) -> Column {
        Column::Numbers(vec![value.unwrap_or(f64::NAN); len])
    }

    fn to_array(attr: &str, column: &Column) -> PlotResult<Vec<f64>> {
        column.to_numbers(attr)
    }
}

impl VectorValue for String {
    type Array = Vec<String>;

    fn broadcast(value: &Self, len: usize) -> Column {
        Column::Strings(vec![value.clone(); len])
    }

    fn missing(len: usize) -> Column {
        Column::Strings(vec![String::new(); len])
    }

    fn to_array(attr: &str, column: &Column) -> PlotResult<Vec<String>> {
        strings(attr, column)
    }
}

/// Nullable strings; null is the empty string
impl VectorValue for Option<String> {
    type Array = Vec<String>;

    fn broadcast(value: &Self, len: usize) -> Column {
        Column::Strings(vec![value.clone().unwrap_or_default(); len])
    }

    fn missing(len: usize) -> Column {
        Column::Strings(vec![String::new(); len])
    }

    fn to_array(attr: &str, column: &Column) -> PlotResult<Vec<String>> {
        strings(attr, column)
    }
}

impl VectorValue for bool {
    type Array = Vec<bool>;

    fn broadcast(value: &Self, len: usize) -> Column {
        Column::Bools(vec![*value; len])
    }

    fn missing(len: usize) -> Column {
        Column::Bools(vec![false; len])
    }

    fn to_array(attr: &str, column: &Column) -> PlotResult<Vec<bool>> {
        match column {
            Column::Bools(v) => Ok(v.clone()),
            Column::Numbers(v) => Ok(v.iter().map(|x| *x != 0.0 && !x.is_nan()).collect()),
            _ => Err(PlotError::ColumnType {
                attr: attr.to_string(),
                expected: "bools",
            }),
        }
    }
}

fn strings(attr: &str, column: &Column) -> PlotResult<Vec<String>> {
    match column {
        Column::Strings(v) => Ok(v.clone()),
        Column::Numbers(v) => Ok(v
            .iter()
            .map(|x| if x.is_nan() { String::new() } else { x.to_string() })
            .collect()),
        _ => Err(PlotError::ColumnType {
            attr: attr.to_string(),
            expected: "strings",
        }),
    }
}

/// Enumerations travel through columns as their serialized names; empty
/// strings (missing rows) read back as the default variant.
macro_rules! enum_vector_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl VectorValue for $ty {
                type Array = Vec<$ty>;

                fn broadcast(value: &Self, len: usize) -> Column {
                    let name = serde_json::to_value(value)
                        .ok()
                        .and_then(|v| v.as_str().map(String::from))
                        .unwrap_or_default();
                    Column::Strings(vec![name; len])
                }

                fn missing(len: usize) -> Column {
                    Column::Strings(vec![String::new(); len])
                }

                fn to_array(attr: &str, column: &Column) -> PlotResult<Vec<$ty>> {
                    let Column::Strings(names) = column else {
                        return Err(PlotError::ColumnType {
                            attr: attr.to_string(),
                            expected: "strings",
                        });
                    };
                    names
                        .iter()
                        .map(|name| {
                            if name.is_empty() {
                                return Ok(<$ty>::default());
                            }
                            let json = Value::String(name.clone());
                            serde_json::from_value(json.clone())
                                .map_err(|_| PlotError::validation(attr, &json))
                        })
                        .collect()
                }
            }
        )*
    };
}

enum_vector_value!(MarkerType, TextAlign, TextBaseline, FontStyle);

/// A property resolved to one value per data source row.
pub struct VectorSpec<T: VectorValue> {
    property: Property<T>,
}

impl<T: VectorValue> VectorSpec<T> {
    pub fn new(owner: &'static str, attr: impl Into<String>, kind: Kind, default: T) -> Self {
        Self::from_property(Property::new(owner, attr, kind, default))
    }

    pub fn from_property(mut property: Property<T>) -> Self {
        property.set_vectorized();
        Self { property }
    }

    /// Start out reading the named field
    pub fn with_field(mut self, name: impl Into<String>) -> Self {
        self.property.replace_mode(SpecMode::Field(name.into()));
        self
    }

    pub fn property(&self) -> &Property<T> {
        &self.property
    }

    /// Resolve the active mode against `source`, without the transform.
    ///
    /// Values broadcast to the source length (1 when unknown). A field the
    /// source lacks resolves to a missing-value column with one warning.
    pub fn resolve_raw(&self, source: &dyn DataSource) -> PlotResult<Column> {
        let attr = self.property.attr();
        let len = source.get_length();
        let column = match &self.property.spec().mode {
            SpecMode::Value(value) => return Ok(T::broadcast(value, len.unwrap_or(1))),
            SpecMode::Field(name) => match source.get_column(name) {
                Some(column) => column.clone(),
                None => {
                    tracing::warn!(
                        attr,
                        field = %name,
                        "attempted to retrieve property array for nonexistent field '{name}'"
                    );
                    return Ok(T::missing(len.unwrap_or(1)));
                }
            },
            SpecMode::Expr(expr) => expr.v_compute(source)?,
        };
        check_length(attr, len, &column)?;
        Ok(column)
    }

    /// Apply the spec-level transform, if any
    pub fn apply_transform(&self, column: Column) -> PlotResult<Column> {
        let Some(transform) = &self.property.spec().transform else {
            return Ok(column);
        };
        let output = transform.v_compute(&column)?;
        check_length(self.property.attr(), Some(column.len()), &output)?;
        Ok(output)
    }

    /// Resolved column after the transform
    pub fn column(&self, source: &dyn DataSource) -> PlotResult<Column> {
        let raw = self.resolve_raw(source)?;
        self.apply_transform(raw)
    }

    pub fn array(&self, source: &dyn DataSource) -> PlotResult<T::Array> {
        T::to_array(self.property.attr(), &self.column(source)?)
    }
}

pub(crate) fn check_length(attr: &str, expected: Option<usize>, column: &Column) -> PlotResult<()> {
    match expected {
        Some(expected) if column.len() != expected => Err(PlotError::LengthMismatch {
            attr: attr.to_string(),
            expected,
            actual: column.len(),
        }),
        _ => Ok(()),
    }
}

impl<T: VectorValue> Deref for VectorSpec<T> {
    type Target = Property<T>;

    fn deref(&self) -> &Property<T> {
        &self.property
    }
}

impl<T: VectorValue> DerefMut for VectorSpec<T> {
    fn deref_mut(&mut self) -> &mut Property<T> {
        &mut self.property
    }
}

impl<T: VectorValue> std::fmt::Debug for VectorSpec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("VectorSpec").field(&self.property).finish()
    }
}

/// A property that resolves to a single value, whatever the row count.
pub struct ScalarSpec<T: PropertyValue> {
    property: Property<T>,
}

impl<T: PropertyValue> ScalarSpec<T> {
    pub fn new(owner: &'static str, attr: impl Into<String>, kind: Kind, default: T) -> Self {
        Self::from_property(Property::new(owner, attr, kind, default))
    }

    pub fn from_property(property: Property<T>) -> Self {
        Self { property }
    }

    /// Owned copy of the literal value
    pub fn get(&self) -> PlotResult<T> {
        self.property.value().cloned()
    }
}

impl<T: PropertyValue> Deref for ScalarSpec<T> {
    type Target = Property<T>;

    fn deref(&self) -> &Property<T> {
        &self.property
    }
}

impl<T: PropertyValue> DerefMut for ScalarSpec<T> {
    fn deref_mut(&mut self) -> &mut Property<T> {
        &mut self.property
    }
}

impl<T: PropertyValue> std::fmt::Debug for ScalarSpec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ScalarSpec").field(&self.property).finish()
    }
}

macro_rules! delegate_any_property {
    ($($ty:ident<$param:ident: $bound:ident>),* $(,)?) => {
        $(
            impl<$param: $bound> AnyProperty for $ty<$param> {
                fn attr(&self) -> &str {
                    self.property.attr()
                }

                fn kind(&self) -> Kind {
                    self.property.kind()
                }

                fn is_dirty(&self) -> bool {
                    self.property.is_dirty()
                }

                fn set_json(&mut self, value: &Value) -> PlotResult<()> {
                    self.property.set_json(value)
                }

                fn spec_json(&self) -> Value {
                    self.property.spec_json()
                }
            }
        )*
    };
}

delegate_any_property!(VectorSpec<T: VectorValue>, ScalarSpec<T: PropertyValue>);

pub type NumberSpec = VectorSpec<f64>;
pub type NullNumberSpec = VectorSpec<Option<f64>>;
pub type StringSpec = VectorSpec<String>;
pub type NullStringSpec = VectorSpec<Option<String>>;
pub type BooleanSpec = VectorSpec<bool>;
pub type MarkerSpec = VectorSpec<MarkerType>;
/// CSS font sizes such as `"12px"`, one per row
pub type FontSizeSpec = VectorSpec<String>;
