//! Annotations.
//!
//! [`Arrow`] and [`Whisker`] are row-oriented and run through a
//! [`GlyphView`](crate::glyphs::GlyphView) like any glyph. [`Label`] and
//! [`BoxAnnotation`] hold one value per attribute and draw straight into
//! the frame with scalar visuals.

mod arrow;
mod arrow_head;
mod box_annotation;
mod label;
mod whisker;

pub use arrow::*;
pub use arrow_head::*;
pub use box_annotation::*;
pub use label::*;
pub use whisker::*;

use crate::core::AnyProperty;
use crate::error::{PlotError, PlotResult};
use crate::render::Context2d;
use crate::scales::Scale;
use crate::spatial_index::Rect;
use crate::types::SpatialUnits;
use serde_json::{Map, Value};

/// A single-shape annotation positioned against the plot frame.
pub trait Annotation {
    fn type_name(&self) -> &'static str;

    fn properties(&self) -> Vec<&dyn AnyProperty>;

    fn properties_mut(&mut self) -> Vec<&mut dyn AnyProperty>;

    /// Draw into `frame` (screen space, y growing downwards)
    fn render(
        &self,
        ctx: &mut dyn Context2d,
        frame: &Rect,
        x_scale: &dyn Scale,
        y_scale: &dyn Scale,
    ) -> PlotResult<()>;

    fn update_property(&mut self, attr: &str, value: &Value) -> PlotResult<()> {
        let owner = self.type_name();
        let property = self
            .properties_mut()
            .into_iter()
            .find(|p| p.attr() == attr)
            .ok_or_else(|| PlotError::UnknownAttribute {
                owner,
                attr: attr.to_string(),
            })?;
        property.set_json(value)
    }

    fn spec_json(&self) -> Value {
        Value::Object(
            self.properties()
                .into_iter()
                .map(|p| (p.attr().to_string(), p.spec_json()))
                .collect::<Map<String, Value>>(),
        )
    }
}

/// Screen x of a frame-relative position
pub(crate) fn frame_x(value: f64, units: SpatialUnits, frame: &Rect, scale: &dyn Scale) -> f64 {
    match units {
        SpatialUnits::Data => scale.compute(value),
        SpatialUnits::Screen => frame.x0 + value,
    }
}

/// Screen y of a frame-relative position; screen units count up from the bottom
pub(crate) fn frame_y(value: f64, units: SpatialUnits, frame: &Rect, scale: &dyn Scale) -> f64 {
    match units {
        SpatialUnits::Data => scale.compute(value),
        SpatialUnits::Screen => frame.y1 - value,
    }
}

pub(crate) const SPATIAL_UNITS: &[&str] = &["screen", "data"];
