//! Whiskers: error bars spanning `lower` to `upper` at `base`.

use crate::annotations::{ArrowHead, ArrowHeadKind};
use crate::constants::WHISKER_HEAD_SIZE;
use crate::core::{AnyProperty, CoordinateSpec, DataProperty, Kind, Property};
use crate::data::DataSource;
use crate::error::PlotResult;
use crate::glyphs::{Glyph, GlyphData, declared_property_mut, get};
use crate::render::{Context2d, with_saved};
use crate::spatial_index::Rect;
use crate::types::{Axis, Dimension};
use crate::visuals::{VectorVisuals, Visuals};
use serde_json::Value;
use std::f64::consts::{FRAC_PI_2, PI};

const OWNER: &str = "Whisker";

/// `dimension` is the direction the whisker spans: `Height` draws vertical
/// whiskers with `base` on the x axis.
#[derive(Debug)]
pub struct Whisker {
    pub base: CoordinateSpec,
    pub lower: CoordinateSpec,
    pub upper: CoordinateSpec,
    pub dimension: Property<Dimension>,
    pub lower_head: Option<ArrowHead>,
    pub upper_head: Option<ArrowHead>,
    visuals: Visuals,
}

impl Default for Whisker {
    fn default() -> Self {
        Self::new()
    }
}

impl Whisker {
    pub fn new() -> Self {
        let mut whisker = Self {
            base: CoordinateSpec::field(OWNER, "base", Axis::X),
            lower: CoordinateSpec::field(OWNER, "lower", Axis::Y),
            upper: CoordinateSpec::field(OWNER, "upper", Axis::Y),
            dimension: Property::new(
                OWNER,
                "dimension",
                Kind::Enum(&["width", "height"]),
                Dimension::Height,
            ),
            lower_head: Some(ArrowHead::new(ArrowHeadKind::Tee, WHISKER_HEAD_SIZE)),
            upper_head: Some(ArrowHead::new(ArrowHeadKind::Tee, WHISKER_HEAD_SIZE)),
            visuals: Visuals::line_only(OWNER),
        };
        whisker.sync_axes();
        whisker
    }

    pub fn set_dimension(&mut self, dimension: Dimension) -> PlotResult<()> {
        self.dimension.set_value(dimension)?;
        self.sync_axes();
        Ok(())
    }

    fn current_dimension(&self) -> Dimension {
        self.dimension.value().copied().unwrap_or_default()
    }

    fn sync_axes(&mut self) {
        let (base, span) = match self.current_dimension() {
            Dimension::Height => (Axis::X, Axis::Y),
            Dimension::Width => (Axis::Y, Axis::X),
        };
        self.base.set_axis(base);
        self.lower.set_axis(span);
        self.upper.set_axis(span);
    }

    /// Screen point of `value` along the span at `base`
    fn point(&self, base: f64, value: f64) -> (f64, f64) {
        match self.current_dimension() {
            Dimension::Height => (base, value),
            Dimension::Width => (value, base),
        }
    }
}

impl Glyph for Whisker {
    fn type_name(&self) -> &'static str {
        OWNER
    }

    fn data_properties(&self) -> Vec<&dyn DataProperty> {
        vec![&self.base as &dyn DataProperty, &self.lower, &self.upper]
    }

    fn data_properties_mut(&mut self) -> Vec<&mut dyn DataProperty> {
        vec![
            &mut self.base as &mut dyn DataProperty,
            &mut self.lower,
            &mut self.upper,
        ]
    }

    fn visuals(&self) -> &Visuals {
        &self.visuals
    }

    fn visuals_mut(&mut self) -> &mut Visuals {
        &mut self.visuals
    }

    fn property_mut(&mut self, attr: &str) -> Option<&mut dyn AnyProperty> {
        match attr.split_once('.') {
            Some(("lower_head", rest)) => self.lower_head.as_mut()?.property_mut(rest),
            Some(("upper_head", rest)) => self.upper_head.as_mut()?.property_mut(rest),
            _ if attr == "dimension" => Some(&mut self.dimension),
            _ => declared_property_mut(self, attr),
        }
    }

    fn on_property_change(&mut self, attr: &str) {
        if attr == "dimension" {
            self.sync_axes();
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
        map.insert("dimension".into(), self.dimension.spec_json());
        let head = |h: &Option<ArrowHead>| h.as_ref().map_or(Value::Null, ArrowHead::spec_json);
        map.insert("lower_head".into(), head(&self.lower_head));
        map.insert("upper_head".into(), head(&self.upper_head));
        map.into()
    }

    fn post_set_data(&mut self, source: &dyn DataSource, data: &mut GlyphData) -> PlotResult<()> {
        for head in [&mut self.lower_head, &mut self.upper_head].into_iter().flatten() {
            head.set_data(source, data.indices())?;
        }
        Ok(())
    }

    fn index_entries(&self, data: &GlyphData) -> Vec<(usize, Rect)> {
        let (base, lower, upper) = (data.numbers("base"), data.numbers("lower"), data.numbers("upper"));
        (0..data.size())
            .map(|i| {
                let a = self.point(get(base, i), get(lower, i));
                let b = self.point(get(base, i), get(upper, i));
                (i, Rect::from_corners(a, b))
            })
            .collect()
    }

    fn render(&self, ctx: &mut dyn Context2d, indices: &[usize], data: &GlyphData) -> PlotResult<()> {
        let (sbase, slower, supper) = (data.screen("sbase"), data.screen("slower"), data.screen("supper"));
        let angle = match self.current_dimension() {
            Dimension::Height => 0.0,
            Dimension::Width => FRAC_PI_2,
        };
        let line = self.visuals.line("line");

        for &i in indices {
            let lower = self.point(get(sbase, i), get(slower, i));
            let upper = self.point(get(sbase, i), get(supper, i));
            if ![lower.0, lower.1, upper.0, upper.1].iter().all(|v| v.is_finite()) {
                continue;
            }
            if let Some(line) = line.filter(|l| l.doit_at(i)) {
                ctx.begin_path();
                ctx.move_to(lower.0, lower.1);
                ctx.line_to(upper.0, upper.1);
                line.set_vectorize(ctx, i)?;
                ctx.stroke();
            }
            if let Some(head) = &self.upper_head {
                with_saved(ctx, |ctx| {
                    ctx.translate(upper.0, upper.1);
                    ctx.rotate(angle);
                    head.render(ctx, i)
                })?;
            }
            if let Some(head) = &self.lower_head {
                with_saved(ctx, |ctx| {
                    ctx.translate(lower.0, lower.1);
                    ctx.rotate(angle + PI);
                    head.render(ctx, i)
                })?;
            }
        }
        Ok(())
    }
}
