//! Numeric specs carrying units.

use crate::core::spec::parse_spec_json;
use crate::core::{AnyProperty, DataRole, Kind, Property, VectorSpec, VectorValue};
use crate::data::{Column, DataSource};
use crate::error::{PlotError, PlotResult};
use crate::types::{AngleUnits, Axis, SpatialUnits};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

/// A family of units with a default and a normalization rule.
pub trait UnitsFamily: 'static {
    type Units: Copy + PartialEq + fmt::Debug + Serialize + DeserializeOwned;

    const DEFAULT: Self::Units;
    const ALL: &'static [Self::Units];

    /// Convert resolved values to the canonical unit
    fn normalize(_units: Self::Units, values: Vec<f64>) -> Vec<f64> {
        values
    }

    /// How the glyph pipeline maps resolved values to screen space
    fn role(units: Self::Units, along: Option<(Axis, &'static str)>) -> DataRole;
}

fn distance_role(units: SpatialUnits, along: Option<(Axis, &'static str)>) -> DataRole {
    let (axis, center) = along.unwrap_or((Axis::X, "x"));
    DataRole::Distance { axis, center, units }
}

/// Angles in rad/deg/grad/turn, default rad.
///
/// Normalized values are radians with the sign flipped: data-space angles
/// run counter-clockwise while screen rotations run clockwise.
#[derive(Debug)]
pub struct AngleFamily;

impl UnitsFamily for AngleFamily {
    type Units = AngleUnits;

    const DEFAULT: AngleUnits = AngleUnits::Rad;
    const ALL: &'static [AngleUnits] = AngleUnits::ALL;

    fn normalize(units: AngleUnits, values: Vec<f64>) -> Vec<f64> {
        let coeff = -units.to_radians_coeff();
        values.into_iter().map(|v| v * coeff).collect()
    }

    fn role(_units: AngleUnits, _along: Option<(Axis, &'static str)>) -> DataRole {
        DataRole::Angle
    }
}

/// Distances in data or screen space, default data
#[derive(Debug)]
pub struct DistanceFamily;

impl UnitsFamily for DistanceFamily {
    type Units = SpatialUnits;

    const DEFAULT: SpatialUnits = SpatialUnits::Data;
    const ALL: &'static [SpatialUnits] = SpatialUnits::ALL;

    fn role(units: SpatialUnits, along: Option<(Axis, &'static str)>) -> DataRole {
        distance_role(units, along)
    }
}

/// Distances in data or screen space, default screen
#[derive(Debug)]
pub struct ScreenDistanceFamily;

impl UnitsFamily for ScreenDistanceFamily {
    type Units = SpatialUnits;

    const DEFAULT: SpatialUnits = SpatialUnits::Screen;
    const ALL: &'static [SpatialUnits] = SpatialUnits::ALL;

    fn role(units: SpatialUnits, along: Option<(Axis, &'static str)>) -> DataRole {
        distance_role(units, along)
    }
}

/// A numeric vector spec with units.
///
/// `units` is only stored when it differs from the family default, so a
/// spec set to the default serializes the same as one never set.
pub struct UnitsSpec<F: UnitsFamily, T: VectorValue = f64> {
    inner: VectorSpec<T>,
    units: Option<F::Units>,
    /// Axis and center coordinate a data-space distance is measured along
    along: Option<(Axis, &'static str)>,
    _family: PhantomData<F>,
}

pub type AngleSpec = UnitsSpec<AngleFamily>;
pub type DistanceSpec = UnitsSpec<DistanceFamily>;
pub type NullDistanceSpec = UnitsSpec<DistanceFamily, Option<f64>>;
pub type ScreenDistanceSpec = UnitsSpec<ScreenDistanceFamily>;

impl<F: UnitsFamily, T: VectorValue> UnitsSpec<F, T> {
    pub fn new(owner: &'static str, attr: impl Into<String>, kind: Kind, default: T) -> Self {
        Self {
            inner: VectorSpec::new(owner, attr, kind, default),
            units: None,
            along: None,
            _family: PhantomData,
        }
    }

    /// Skip resolution while left at a null default
    pub fn optional(mut self) -> Self {
        self.inner.set_optional(true);
        self
    }

    /// Measure data-space distances along `axis`, centered on `center`
    pub fn along(mut self, axis: Axis, center: &'static str) -> Self {
        self.along = Some((axis, center));
        self
    }

    pub fn axis(&self) -> Option<(Axis, &'static str)> {
        self.along
    }

    pub fn units(&self) -> F::Units {
        self.units.unwrap_or(F::DEFAULT)
    }

    /// Store `units`, dropping the explicit entry when it is the default
    pub fn set_units(&mut self, units: F::Units) {
        self.units = (units != F::DEFAULT).then_some(units);
    }

    /// Parse and store units by name
    pub fn set_units_str(&mut self, units: &str) -> PlotResult<()> {
        let parsed = self.parse_units(&Value::String(units.to_string()))?;
        self.set_units(parsed);
        Ok(())
    }

    /// True when units were given explicitly (and differ from the default)
    pub fn has_explicit_units(&self) -> bool {
        self.units.is_some()
    }

    fn parse_units(&self, value: &Value) -> PlotResult<F::Units> {
        serde_json::from_value(value.clone()).map_err(|_| PlotError::InvalidUnits {
            attr: self.inner.attr().to_string(),
            units: value.as_str().map(String::from).unwrap_or_else(|| value.to_string()),
            valid: F::ALL
                .iter()
                .filter_map(|u| serde_json::to_value(u).ok())
                .filter_map(|v| v.as_str().map(String::from))
                .collect::<Vec<_>>()
                .join(", "),
        })
    }

    /// Resolve, normalize to canonical units, then apply the transform
    pub fn array(&self, source: &dyn DataSource) -> PlotResult<Vec<f64>> {
        let raw = self.inner.resolve_raw(source)?;
        let values = F::normalize(self.units(), raw.to_numbers(self.inner.attr())?);
        let transformed = self.inner.apply_transform(Column::Numbers(values))?;
        transformed.to_numbers(self.inner.attr())
    }

    /// Normalized literal value (value mode only)
    pub fn normalized_value(&self) -> PlotResult<f64> {
        let column = T::broadcast(self.inner.value()?, 1);
        let values = F::normalize(self.units(), column.to_numbers(self.inner.attr())?);
        Ok(values.first().copied().unwrap_or(f64::NAN))
    }
}

impl<F: UnitsFamily, T: VectorValue> Deref for UnitsSpec<F, T> {
    type Target = Property<T>;

    fn deref(&self) -> &Property<T> {
        &self.inner
    }
}

impl<F: UnitsFamily, T: VectorValue> DerefMut for UnitsSpec<F, T> {
    fn deref_mut(&mut self) -> &mut Property<T> {
        &mut self.inner
    }
}

impl<F: UnitsFamily, T: VectorValue> fmt::Debug for UnitsSpec<F, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitsSpec")
            .field("property", self.inner.property())
            .field("units", &self.units())
            .finish()
    }
}

impl<F: UnitsFamily, T: VectorValue> AnyProperty for UnitsSpec<F, T> {
    fn attr(&self) -> &str {
        self.inner.attr()
    }

    fn kind(&self) -> Kind {
        self.inner.kind()
    }

    fn is_dirty(&self) -> bool {
        self.inner.is_dirty()
    }

    /// Accepts `{"value"|"field": ..., "units": ...}` in addition to literals
    fn set_json(&mut self, value: &Value) -> PlotResult<()> {
        let (raw, units) =
            parse_spec_json(value).map_err(|_| PlotError::validation(self.inner.attr(), value))?;
        let units = units.map(|u| self.parse_units(&u)).transpose()?;
        self.inner.apply_raw(raw)?;
        if let Some(units) = units {
            self.set_units(units);
        }
        Ok(())
    }

    fn spec_json(&self) -> Value {
        let mut spec = self.inner.spec_json();
        if let (Some(units), Value::Object(map)) = (self.units, &mut spec) {
            if let Ok(units) = serde_json::to_value(units) {
                map.insert("units".into(), units);
            }
        }
        spec
    }
}
