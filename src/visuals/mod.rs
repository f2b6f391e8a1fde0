//! Visual groups: bundles of line, fill, hatch and text properties that
//! apply themselves to a [`Context2d`](crate::render::Context2d).
//!
//! Scalar groups carry one value per attribute and are applied with
//! [`ScalarVisuals::set_value`]. Vector groups resolve their arrays once per
//! data change ([`VectorVisuals::set_visuals`]) and are applied per row with
//! [`VectorVisuals::set_vectorize`].

mod attrs;
mod fill;
mod group;
mod hatch;
mod line;
mod patterns;
mod text;
mod texture;

pub use attrs::*;
pub use fill::*;
pub use group::*;
pub use hatch::*;
pub use line::*;
pub use patterns::*;
pub use text::*;
pub use texture::*;

use crate::core::AnyProperty;
use crate::data::DataSource;
use crate::error::{PlotError, PlotResult};
use crate::render::Context2d;
use serde_json::{Map, Value};

/// Common surface of every visual group
pub trait ContextProperties {
    /// Attribute prefix, e.g. `"border_"`; empty for unprefixed groups
    fn prefix(&self) -> &str;

    fn properties(&self) -> Vec<&dyn AnyProperty>;

    fn properties_mut(&mut self) -> Vec<&mut dyn AnyProperty>;

    /// Whether the group paints anything, judged from its current specs
    fn doit(&self) -> bool;

    fn property(&self, attr: &str) -> Option<&dyn AnyProperty> {
        self.properties().into_iter().find(|p| p.attr() == attr)
    }

    fn property_mut(&mut self, attr: &str) -> Option<&mut dyn AnyProperty> {
        self.properties_mut().into_iter().find(|p| p.attr() == attr)
    }

    /// Attribute name to active spec, for comparing groups
    fn spec_json(&self) -> Value {
        Value::Object(
            self.properties()
                .into_iter()
                .map(|p| (p.attr().to_string(), p.spec_json()))
                .collect::<Map<String, Value>>(),
        )
    }
}

pub trait ScalarVisuals: ContextProperties {
    fn set_value(&self, ctx: &mut dyn Context2d) -> PlotResult<()>;
}

pub trait VectorVisuals: ContextProperties {
    /// Resolve every attribute against `source`, keeping the given rows
    fn set_visuals(&mut self, source: &dyn DataSource, indices: &[usize]) -> PlotResult<()>;

    /// Whether row `i` paints anything; reads the same arrays as
    /// [`set_vectorize`](Self::set_vectorize)
    fn doit_at(&self, i: usize) -> bool;

    fn set_vectorize(&self, ctx: &mut dyn Context2d, i: usize) -> PlotResult<()>;

    /// Drop the resolved arrays
    fn invalidate(&mut self);
}

/// Keep `rows` of a resolved array; single-value arrays broadcast
pub(crate) fn select_rows<T: Clone>(values: &[T], rows: &[usize]) -> Vec<T> {
    rows.iter()
        .filter_map(|&r| values.get(r).or_else(|| values.last()).cloned())
        .collect()
}

/// Row `i` of a numeric array; NaN past the end
pub(crate) fn at(values: &[f64], i: usize) -> f64 {
    values.get(i).copied().unwrap_or(f64::NAN)
}

/// A zero or missing alpha paints nothing
pub(crate) fn visible_alpha(alpha: f64) -> bool {
    alpha.is_finite() && alpha != 0.0
}

pub(crate) fn unresolved() -> PlotError {
    PlotError::Precondition {
        operation: "set_vectorize",
        required: "set_visuals",
        state: "unresolved",
    }
}
