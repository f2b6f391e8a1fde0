//! Type-erased resolution of glyph geometry properties.

use crate::core::{AnyProperty, Kind, Property, UnitsFamily, UnitsSpec, VectorSpec, VectorValue};
use crate::data::{Column, DataSource};
use crate::error::PlotResult;
use crate::types::{Axis, MarkerType, SpatialUnits};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ops::{Deref, DerefMut};

/// How the pipeline treats a resolved geometry array
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataRole {
    /// Projected through the axis scale (data units) or copied (screen units)
    Coordinate { axis: Axis, units: SpatialUnits },
    /// Converted to a screen length around the `center` coordinate
    Distance {
        axis: Axis,
        center: &'static str,
        units: SpatialUnits,
    },
    /// Already normalized radians
    Angle,
    /// Used as-is
    Value,
}

/// A resolved geometry array
#[derive(Clone, Debug, PartialEq)]
pub enum Resolved {
    Numbers(Vec<f64>),
    Strings(Vec<String>),
    Markers(Vec<MarkerType>),
    /// Coordinates before categorical factors are mapped to numbers
    Column(Column),
}

impl Resolved {
    pub fn len(&self) -> usize {
        match self {
            Resolved::Numbers(v) => v.len(),
            Resolved::Strings(v) => v.len(),
            Resolved::Markers(v) => v.len(),
            Resolved::Column(c) => c.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn select(&self, rows: &[usize]) -> Self {
        fn pick<T: Clone>(v: &[T], rows: &[usize]) -> Vec<T> {
            rows.iter().map(|&r| v[r].clone()).collect()
        }
        match self {
            Resolved::Numbers(v) => Resolved::Numbers(pick(v, rows)),
            Resolved::Strings(v) => Resolved::Strings(pick(v, rows)),
            Resolved::Markers(v) => Resolved::Markers(pick(v, rows)),
            Resolved::Column(c) => Resolved::Column(c.select(rows)),
        }
    }
}

/// A property the glyph pipeline resolves into a geometry array.
pub trait DataProperty: AnyProperty {
    fn role(&self) -> DataRole;

    fn resolve(&self, source: &dyn DataSource) -> PlotResult<Resolved>;

    /// Optional properties left at a null default are not materialized
    fn skip_resolution(&self) -> bool;

    fn as_property_mut(&mut self) -> &mut dyn AnyProperty;
}

/// Values whose arrays can be stored as glyph geometry
pub trait DataValue: VectorValue {
    fn into_resolved(array: Self::Array) -> Resolved;
}

impl DataValue for f64 {
    fn into_resolved(array: Vec<f64>) -> Resolved {
        Resolved::Numbers(array)
    }
}

impl DataValue for Option<f64> {
    fn into_resolved(array: Vec<f64>) -> Resolved {
        Resolved::Numbers(array)
    }
}

impl DataValue for String {
    fn into_resolved(array: Vec<String>) -> Resolved {
        Resolved::Strings(array)
    }
}

impl DataValue for Option<String> {
    fn into_resolved(array: Vec<String>) -> Resolved {
        Resolved::Strings(array)
    }
}

impl DataValue for MarkerType {
    fn into_resolved(array: Vec<MarkerType>) -> Resolved {
        Resolved::Markers(array)
    }
}

impl<T: DataValue> DataProperty for VectorSpec<T> {
    fn role(&self) -> DataRole {
        DataRole::Value
    }

    fn resolve(&self, source: &dyn DataSource) -> PlotResult<Resolved> {
        self.array(source).map(T::into_resolved)
    }

    fn skip_resolution(&self) -> bool {
        self.is_optional() && self.is_null() && !self.is_dirty()
    }

    fn as_property_mut(&mut self) -> &mut dyn AnyProperty {
        self
    }
}

impl<F: UnitsFamily, T: VectorValue> DataProperty for UnitsSpec<F, T> {
    fn role(&self) -> DataRole {
        F::role(self.units(), self.axis())
    }

    fn resolve(&self, source: &dyn DataSource) -> PlotResult<Resolved> {
        self.array(source).map(Resolved::Numbers)
    }

    fn skip_resolution(&self) -> bool {
        self.is_optional() && self.is_null() && !self.is_dirty()
    }

    fn as_property_mut(&mut self) -> &mut dyn AnyProperty {
        self
    }
}

/// A data coordinate: a number or a categorical factor
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coordinate {
    Number(f64),
    Factor(String),
}

impl VectorValue for Coordinate {
    type Array = Column;

    fn broadcast(value: &Self, len: usize) -> Column {
        match value {
            Coordinate::Number(v) => Column::Numbers(vec![*v; len]),
            Coordinate::Factor(f) => Column::Strings(vec![f.clone(); len]),
        }
    }

    fn to_array(_attr: &str, column: &Column) -> PlotResult<Column> {
        Ok(column.clone())
    }
}

/// Position along one axis, in data or screen units
#[derive(Debug)]
pub struct CoordinateSpec {
    inner: VectorSpec<Coordinate>,
    axis: Axis,
    units: SpatialUnits,
}

impl CoordinateSpec {
    pub fn new(owner: &'static str, attr: impl Into<String>, axis: Axis) -> Self {
        Self {
            inner: VectorSpec::new(owner, attr, Kind::Any, Coordinate::Number(0.0)),
            axis,
            units: SpatialUnits::Data,
        }
    }

    /// Start out reading the named field
    pub fn field(owner: &'static str, attr: &'static str, axis: Axis) -> Self {
        let mut spec = Self::new(owner, attr, axis);
        spec.inner = spec.inner.with_field(attr);
        spec
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn set_axis(&mut self, axis: Axis) {
        self.axis = axis;
    }

    pub fn units(&self) -> SpatialUnits {
        self.units
    }

    pub fn set_units(&mut self, units: SpatialUnits) {
        self.units = units;
    }

    pub fn set_number(&mut self, value: f64) -> PlotResult<()> {
        self.inner.set_value(Coordinate::Number(value))
    }

    pub fn column(&self, source: &dyn DataSource) -> PlotResult<Column> {
        self.inner.column(source)
    }
}

impl Deref for CoordinateSpec {
    type Target = Property<Coordinate>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for CoordinateSpec {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl AnyProperty for CoordinateSpec {
    fn attr(&self) -> &str {
        self.inner.attr()
    }

    fn kind(&self) -> Kind {
        self.inner.kind()
    }

    fn is_dirty(&self) -> bool {
        self.inner.is_dirty()
    }

    fn set_json(&mut self, value: &Value) -> PlotResult<()> {
        self.inner.set_json(value)
    }

    fn spec_json(&self) -> Value {
        self.inner.spec_json()
    }
}

impl DataProperty for CoordinateSpec {
    fn role(&self) -> DataRole {
        DataRole::Coordinate {
            axis: self.axis,
            units: self.units,
        }
    }

    fn resolve(&self, source: &dyn DataSource) -> PlotResult<Resolved> {
        self.inner.column(source).map(Resolved::Column)
    }

    fn skip_resolution(&self) -> bool {
        false
    }

    fn as_property_mut(&mut self) -> &mut dyn AnyProperty {
        self
    }
}
