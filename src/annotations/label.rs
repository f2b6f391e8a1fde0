//! A single text label with optional background and border.

use crate::annotations::{Annotation, SPATIAL_UNITS, frame_x, frame_y};
use crate::core::{AngleSpec, AnyProperty, Kind, Property, ScalarSpec};
use crate::error::PlotResult;
use crate::render::{Context2d, TextMetrics, with_saved};
use crate::scales::Scale;
use crate::spatial_index::Rect;
use crate::types::{SpatialUnits, TextAlign, TextBaseline};
use crate::visuals::{
    AttrSet, ContextProperties, FILL, FillDefaults, FillScalar, LINE, LineDefaults, LineScalar,
    ScalarVisuals, TextScalar,
};

const OWNER: &str = "Label";

#[derive(Debug)]
pub struct Label {
    pub x: ScalarSpec<f64>,
    pub x_units: Property<SpatialUnits>,
    pub y: ScalarSpec<f64>,
    pub y_units: Property<SpatialUnits>,
    pub text: ScalarSpec<String>,
    pub angle: AngleSpec,
    pub x_offset: ScalarSpec<f64>,
    pub y_offset: ScalarSpec<f64>,
    pub text_props: TextScalar,
    pub border: LineScalar,
    pub background: FillScalar,
}

impl Label {
    pub fn new(x: f64, y: f64, text: impl Into<String>) -> Self {
        let units = |attr: &str| {
            Property::new(OWNER, attr, Kind::Enum(SPATIAL_UNITS), SpatialUnits::Data)
        };
        let border = LineDefaults {
            color: None,
            ..Default::default()
        };
        let background = FillDefaults {
            color: None,
            ..Default::default()
        };
        Self {
            x: ScalarSpec::new(OWNER, "x", Kind::Number, x),
            x_units: units("x_units"),
            y: ScalarSpec::new(OWNER, "y", Kind::Number, y),
            y_units: units("y_units"),
            text: ScalarSpec::new(OWNER, "text", Kind::String, text.into()),
            angle: AngleSpec::new(OWNER, "angle", Kind::Angle, 0.0),
            x_offset: ScalarSpec::new(OWNER, "x_offset", Kind::Number, 0.0),
            y_offset: ScalarSpec::new(OWNER, "y_offset", Kind::Number, 0.0),
            text_props: TextScalar::with_defaults(OWNER),
            border: LineScalar::new(OWNER, &AttrSet::new(LINE).prefixed("border_"), border),
            background: FillScalar::new(OWNER, &AttrSet::new(FILL).prefixed("background_"), background),
        }
    }

    /// Screen anchor after units and offsets are applied
    pub fn anchor(&self, frame: &Rect, x_scale: &dyn Scale, y_scale: &dyn Scale) -> PlotResult<(f64, f64)> {
        let sx = frame_x(*self.x.value()?, *self.x_units.value()?, frame, x_scale);
        let sy = frame_y(*self.y.value()?, *self.y_units.value()?, frame, y_scale);
        Ok((sx + self.x_offset.value()?, sy - self.y_offset.value()?))
    }

    /// Box around the text relative to the anchor: `(x, y, width, height)`
    fn text_box(&self, metrics: &TextMetrics) -> PlotResult<(f64, f64, f64, f64)> {
        let width = metrics.width;
        let height = metrics.ascent + metrics.descent;
        let x = match *self.text_props.text_align.value()? {
            TextAlign::Left => 0.0,
            TextAlign::Center => -width / 2.0,
            TextAlign::Right => -width,
        };
        let y = match *self.text_props.text_baseline.value()? {
            TextBaseline::Top | TextBaseline::Hanging => 0.0,
            TextBaseline::Middle => -height / 2.0,
            TextBaseline::Bottom | TextBaseline::Ideographic => -height,
            TextBaseline::Alphabetic => -metrics.ascent,
        };
        Ok((x, y, width, height))
    }
}

impl Annotation for Label {
    fn type_name(&self) -> &'static str {
        OWNER
    }

    fn properties(&self) -> Vec<&dyn AnyProperty> {
        let mut props: Vec<&dyn AnyProperty> = vec![
            &self.x,
            &self.x_units,
            &self.y,
            &self.y_units,
            &self.text,
            &self.angle,
            &self.x_offset,
            &self.y_offset,
        ];
        props.extend(self.text_props.properties());
        props.extend(self.border.properties());
        props.extend(self.background.properties());
        props
    }

    fn properties_mut(&mut self) -> Vec<&mut dyn AnyProperty> {
        let mut props: Vec<&mut dyn AnyProperty> = vec![
            &mut self.x,
            &mut self.x_units,
            &mut self.y,
            &mut self.y_units,
            &mut self.text,
            &mut self.angle,
            &mut self.x_offset,
            &mut self.y_offset,
        ];
        props.extend(self.text_props.properties_mut());
        props.extend(self.border.properties_mut());
        props.extend(self.background.properties_mut());
        props
    }

    fn render(
        &self,
        ctx: &mut dyn Context2d,
        frame: &Rect,
        x_scale: &dyn Scale,
        y_scale: &dyn Scale,
    ) -> PlotResult<()> {
        let (sx, sy) = self.anchor(frame, x_scale, y_scale)?;
        let angle = self.angle.normalized_value()?;
        let text = self.text.value()?;

        with_saved(ctx, |ctx| {
            ctx.translate(sx, sy);
            if angle != 0.0 {
                ctx.rotate(angle);
            }
            let (draw_background, draw_border) = (self.background.doit(), self.border.doit());
            if draw_background || draw_border {
                ctx.set_font(&self.text_props.font()?);
                let (x, y, width, height) = self.text_box(&ctx.measure_text(text))?;
                if draw_background {
                    self.background.set_value(ctx)?;
                    ctx.begin_path();
                    ctx.rect(x, y, width, height);
                    ctx.fill();
                }
                if draw_border {
                    self.border.set_value(ctx)?;
                    ctx.begin_path();
                    ctx.rect(x, y, width, height);
                    ctx.stroke();
                }
            }
            if self.text_props.doit() {
                self.text_props.set_value(ctx)?;
                ctx.fill_text(text, 0.0, 0.0);
            }
            Ok(())
        })
    }
}
