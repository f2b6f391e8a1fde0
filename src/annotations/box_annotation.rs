//! A shaded rectangle; unset edges extend to the frame.

use crate::annotations::{Annotation, SPATIAL_UNITS, frame_x, frame_y};
use crate::core::{AnyProperty, Kind, Property, ScalarSpec};
use crate::error::PlotResult;
use crate::render::{Context2d, with_saved};
use crate::scales::Scale;
use crate::spatial_index::Rect;
use crate::types::SpatialUnits;
use crate::util::Color;
use crate::visuals::{
    AttrSet, ContextProperties, FILL, FillDefaults, FillScalar, HatchScalar, LINE, LineDefaults,
    LineScalar, RenderRequest, ScalarVisuals,
};
use tracing::debug;

const OWNER: &str = "BoxAnnotation";

#[derive(Debug)]
pub struct BoxAnnotation {
    pub left: ScalarSpec<Option<f64>>,
    pub left_units: Property<SpatialUnits>,
    pub right: ScalarSpec<Option<f64>>,
    pub right_units: Property<SpatialUnits>,
    pub top: ScalarSpec<Option<f64>>,
    pub top_units: Property<SpatialUnits>,
    pub bottom: ScalarSpec<Option<f64>>,
    pub bottom_units: Property<SpatialUnits>,
    pub line: LineScalar,
    pub fill: FillScalar,
    pub hatch: HatchScalar,
}

impl Default for BoxAnnotation {
    fn default() -> Self {
        Self::new()
    }
}

impl BoxAnnotation {
    pub fn new() -> Self {
        let bound = |attr: &str| ScalarSpec::new(OWNER, attr, Kind::Nullable(&Kind::Number), None);
        let units = |attr: &str| {
            Property::new(OWNER, attr, Kind::Enum(SPATIAL_UNITS), SpatialUnits::Data)
        };
        let line = LineDefaults {
            color: Some(Color::css("#cccccc")),
            alpha: 0.3,
            ..Default::default()
        };
        let fill = FillDefaults {
            color: Some(Color::css("#fff9ba")),
            alpha: 0.4,
        };
        Self {
            left: bound("left"),
            left_units: units("left_units"),
            right: bound("right"),
            right_units: units("right_units"),
            top: bound("top"),
            top_units: units("top_units"),
            bottom: bound("bottom"),
            bottom_units: units("bottom_units"),
            line: LineScalar::new(OWNER, &AttrSet::new(LINE), line),
            fill: FillScalar::new(OWNER, &AttrSet::new(FILL), fill),
            hatch: HatchScalar::with_defaults(OWNER),
        }
    }

    pub fn set_render_request(&mut self, request: &RenderRequest) {
        self.hatch.set_render_request(request);
    }

    /// Screen rectangle covered by the box
    pub fn screen_rect(&self, frame: &Rect, x_scale: &dyn Scale, y_scale: &dyn Scale) -> PlotResult<Rect> {
        let x = |v, units| frame_x(v, units, frame, x_scale);
        let y = |v, units| frame_y(v, units, frame, y_scale);
        let left = edge(&self.left, &self.left_units, frame.x0, x)?;
        let right = edge(&self.right, &self.right_units, frame.x1, x)?;
        let top = edge(&self.top, &self.top_units, frame.y0, y)?;
        let bottom = edge(&self.bottom, &self.bottom_units, frame.y1, y)?;
        Ok(Rect::from_corners((left, top), (right, bottom)))
    }
}

/// Screen position of one edge, or `default` when unset
fn edge(
    spec: &ScalarSpec<Option<f64>>,
    units: &Property<SpatialUnits>,
    default: f64,
    place: impl Fn(f64, SpatialUnits) -> f64,
) -> PlotResult<f64> {
    Ok(match *spec.value()? {
        Some(v) => place(v, *units.value()?),
        None => default,
    })
}

impl Annotation for BoxAnnotation {
    fn type_name(&self) -> &'static str {
        OWNER
    }

    fn properties(&self) -> Vec<&dyn AnyProperty> {
        let mut props: Vec<&dyn AnyProperty> = vec![
            &self.left,
            &self.left_units,
            &self.right,
            &self.right_units,
            &self.top,
            &self.top_units,
            &self.bottom,
            &self.bottom_units,
        ];
        props.extend(self.line.properties());
        props.extend(self.fill.properties());
        props.extend(self.hatch.properties());
        props
    }

    fn properties_mut(&mut self) -> Vec<&mut dyn AnyProperty> {
        let mut props: Vec<&mut dyn AnyProperty> = vec![
            &mut self.left,
            &mut self.left_units,
            &mut self.right,
            &mut self.right_units,
            &mut self.top,
            &mut self.top_units,
            &mut self.bottom,
            &mut self.bottom_units,
        ];
        props.extend(self.line.properties_mut());
        props.extend(self.fill.properties_mut());
        props.extend(self.hatch.properties_mut());
        props
    }

    fn render(
        &self,
        ctx: &mut dyn Context2d,
        frame: &Rect,
        x_scale: &dyn Scale,
        y_scale: &dyn Scale,
    ) -> PlotResult<()> {
        let rect = self.screen_rect(frame, x_scale, y_scale)?;
        if !rect.is_finite() {
            return Ok(());
        }
        with_saved(ctx, |ctx| {
            ctx.begin_path();
            ctx.rect(rect.x0, rect.y0, rect.x1 - rect.x0, rect.y1 - rect.y0);
            if self.fill.doit() {
                self.fill.set_value(ctx)?;
                ctx.fill();
            }
            self.hatch.doit2(
                ctx,
                |ctx| {
                    ctx.fill();
                    Ok(())
                },
                || debug!(annotation = OWNER, "hatch texture pending"),
            )?;
            if self.line.doit() {
                self.line.set_value(ctx)?;
                ctx.stroke();
            }
            Ok(())
        })
    }
}
