//! Arrows: a body segment with optional heads at either end.

use crate::annotations::ArrowHead;
use crate::core::{AnyProperty, CoordinateSpec, DataProperty};
use crate::data::DataSource;
use crate::error::PlotResult;
use crate::glyphs::{Glyph, GlyphData, declared_property_mut, get};
use crate::render::{Context2d, with_saved};
use crate::spatial_index::Rect;
use crate::types::Axis;
use crate::visuals::{VectorVisuals, Visuals};
use serde_json::Value;
use std::f64::consts::{FRAC_PI_2, PI};

const OWNER: &str = "Arrow";

/// Screen angle a head is rotated by so that it points along the body
pub fn head_angle(start: (f64, f64), end: (f64, f64)) -> f64 {
    FRAC_PI_2 + (end.1 - start.1).atan2(end.0 - start.0)
}

#[derive(Debug)]
pub struct Arrow {
    pub x_start: CoordinateSpec,
    pub y_start: CoordinateSpec,
    pub x_end: CoordinateSpec,
    pub y_end: CoordinateSpec,
    pub start: Option<ArrowHead>,
    pub end: Option<ArrowHead>,
    visuals: Visuals,
}

impl Default for Arrow {
    fn default() -> Self {
        Self::new()
    }
}

impl Arrow {
    /// No start head and an open end head
    pub fn new() -> Self {
        Self {
            x_start: CoordinateSpec::field(OWNER, "x_start", Axis::X),
            y_start: CoordinateSpec::field(OWNER, "y_start", Axis::Y),
            x_end: CoordinateSpec::field(OWNER, "x_end", Axis::X),
            y_end: CoordinateSpec::field(OWNER, "y_end", Axis::Y),
            start: None,
            end: Some(ArrowHead::open()),
            visuals: Visuals::line_only(OWNER),
        }
    }

    pub fn with_heads(mut self, start: Option<ArrowHead>, end: Option<ArrowHead>) -> Self {
        self.start = start;
        self.end = end;
        self
    }
}

impl Glyph for Arrow {
    fn type_name(&self) -> &'static str {
        OWNER
    }

    fn data_properties(&self) -> Vec<&dyn DataProperty> {
        vec![
            &self.x_start as &dyn DataProperty,
            &self.y_start,
            &self.x_end,
            &self.y_end,
        ]
    }

    fn data_properties_mut(&mut self) -> Vec<&mut dyn DataProperty> {
        vec![
            &mut self.x_start as &mut dyn DataProperty,
            &mut self.y_start,
            &mut self.x_end,
            &mut self.y_end,
        ]
    }

    fn visuals(&self) -> &Visuals {
        &self.visuals
    }

    fn visuals_mut(&mut self) -> &mut Visuals {
        &mut self.visuals
    }

    /// Head attributes are addressed as `start.<attr>` and `end.<attr>`
    fn property_mut(&mut self, attr: &str) -> Option<&mut dyn AnyProperty> {
        match attr.split_once('.') {
            Some(("start", rest)) => self.start.as_mut()?.property_mut(rest),
            Some(("end", rest)) => self.end.as_mut()?.property_mut(rest),
            _ => declared_property_mut(self, attr),
        }
    }

    fn spec_json(&self) -> Value {
        let mut map: serde_json::Map<String, Value> = self
            .data_properties()
            .into_iter()
            .map(|p| (p.attr().to_string(), p.spec_json()))
            .collect();
        if let Value::Object(visuals) = self.visuals.spec_json() {
            map.extend(visuals);
        }
        map.insert("start".into(), self.start.as_ref().map_or(Value::Null, ArrowHead::spec_json));
        map.insert("end".into(), self.end.as_ref().map_or(Value::Null, ArrowHead::spec_json));
        map.into()
    }

    fn post_set_data(&mut self, source: &dyn DataSource, data: &mut GlyphData) -> PlotResult<()> {
        for head in [&mut self.start, &mut self.end].into_iter().flatten() {
            head.set_data(source, data.indices())?;
        }
        Ok(())
    }

    fn index_entries(&self, data: &GlyphData) -> Vec<(usize, Rect)> {
        let (x0, y0) = (data.numbers("x_start"), data.numbers("y_start"));
        let (x1, y1) = (data.numbers("x_end"), data.numbers("y_end"));
        (0..data.size())
            .map(|i| {
                let rect = Rect::from_corners((get(x0, i), get(y0, i)), (get(x1, i), get(y1, i)));
                (i, rect)
            })
            .collect()
    }

    fn render(&self, ctx: &mut dyn Context2d, indices: &[usize], data: &GlyphData) -> PlotResult<()> {
        let (sx0, sy0) = (data.screen("sx_start"), data.screen("sy_start"));
        let (sx1, sy1) = (data.screen("sx_end"), data.screen("sy_end"));
        let line = self.visuals.line("line");

        for &i in indices {
            let start = (get(sx0, i), get(sy0, i));
            let end = (get(sx1, i), get(sy1, i));
            if ![start.0, start.1, end.0, end.1].iter().all(|v| v.is_finite()) {
                continue;
            }
            if let Some(line) = line.filter(|l| l.doit_at(i)) {
                ctx.begin_path();
                ctx.move_to(start.0, start.1);
                ctx.line_to(end.0, end.1);
                line.set_vectorize(ctx, i)?;
                ctx.stroke();
            }

            let angle = head_angle(start, end);
            if let Some(head) = &self.end {
                with_saved(ctx, |ctx| {
                    ctx.translate(end.0, end.1);
                    ctx.rotate(angle);
                    head.render(ctx, i)
                })?;
            }
            if let Some(head) = &self.start {
                with_saved(ctx, |ctx| {
                    ctx.translate(start.0, start.1);
                    ctx.rotate(angle + PI);
                    head.render(ctx, i)
                })?;
            }
        }
        Ok(())
    }
}
