//! Stroke attributes.

use crate::core::{AnyProperty, ColorArray, ColorSpec, NumberSpec, Property, ScalarSpec};
use crate::data::DataSource;
use crate::error::PlotResult;
use crate::render::Context2d;
use crate::types::{LineCap, LineDash, LineJoin};
use crate::util::{Color, color2css, color2rgba};
use crate::visuals::{
    AttrSet, ContextProperties, LINE, LineDefaults, ScalarVisuals, VectorVisuals, at, select_rows, unresolved,
    visible_alpha,
};

/// Apply one resolved stroke state
#[allow(clippy::too_many_arguments)]
fn apply_line(
    ctx: &mut dyn Context2d,
    rgba: [u8; 4],
    alpha: f64,
    width: f64,
    join: LineJoin,
    cap: LineCap,
    dash: &LineDash,
    dash_offset: f64,
) {
    ctx.set_stroke_style(&color2css(rgba, alpha));
    ctx.set_line_width(width);
    ctx.set_line_join(join);
    ctx.set_line_cap(cap);
    ctx.set_line_dash(&dash.0);
    ctx.set_line_dash_offset(dash_offset);
}

// ============================================================================
// Vector
// ============================================================================

#[derive(Debug)]
struct LineCache {
    color: ColorArray,
    alpha: Vec<f64>,
    width: Vec<f64>,
}

/// Per-row stroke: color, alpha and width vectorize, the rest is shared.
#[derive(Debug)]
pub struct LineVector {
    prefix: String,
    pub line_color: ColorSpec,
    pub line_alpha: NumberSpec,
    pub line_width: NumberSpec,
    pub line_join: Property<LineJoin>,
    pub line_cap: Property<LineCap>,
    pub line_dash: Property<LineDash>,
    pub line_dash_offset: Property<f64>,
    cache: Option<LineCache>,
}

impl LineVector {
    pub fn new(owner: &'static str, attrs: &AttrSet, defaults: LineDefaults) -> Self {
        Self {
            prefix: attrs.prefix().to_string(),
            line_color: ColorSpec::from_property(attrs.build(owner, "line_color", defaults.color)),
            line_alpha: NumberSpec::from_property(attrs.build(owner, "line_alpha", defaults.alpha)),
            line_width: NumberSpec::from_property(attrs.build(owner, "line_width", defaults.width)),
            line_join: attrs.build(owner, "line_join", defaults.join),
            line_cap: attrs.build(owner, "line_cap", defaults.cap),
            line_dash: attrs.build(owner, "line_dash", defaults.dash),
            line_dash_offset: attrs.build(owner, "line_dash_offset", defaults.dash_offset),
            cache: None,
        }
    }

    pub fn with_defaults(owner: &'static str) -> Self {
        Self::new(owner, &AttrSet::new(LINE), LineDefaults::default())
    }
}

impl ContextProperties for LineVector {
    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn properties(&self) -> Vec<&dyn AnyProperty> {
        vec![
            &self.line_color as &dyn AnyProperty,
            &self.line_alpha,
            &self.line_width,
            &self.line_join,
            &self.line_cap,
            &self.line_dash,
            &self.line_dash_offset,
        ]
    }

    fn properties_mut(&mut self) -> Vec<&mut dyn AnyProperty> {
        vec![
            &mut self.line_color as &mut dyn AnyProperty,
            &mut self.line_alpha,
            &mut self.line_width,
            &mut self.line_join,
            &mut self.line_cap,
            &mut self.line_dash,
            &mut self.line_dash_offset,
        ]
    }

    fn doit(&self) -> bool {
        let no_color = self.line_color.spec().as_value().is_some_and(Option::is_none);
        let no_alpha = self.line_alpha.spec().as_value().is_some_and(|a| *a == 0.0);
        !(no_color || no_alpha)
    }
}

impl VectorVisuals for LineVector {
    fn set_visuals(&mut self, source: &dyn DataSource, indices: &[usize]) -> PlotResult<()> {
        let color = self.line_color.array(source)?;
        let alpha = self.line_alpha.array(source)?;
        let width = self.line_width.array(source)?;
        self.cache = Some(LineCache {
            color: ColorArray(select_rows(&color.0, indices)),
            alpha: select_rows(&alpha, indices),
            width: select_rows(&width, indices),
        });
        Ok(())
    }

    fn doit_at(&self, i: usize) -> bool {
        self.cache
            .as_ref()
            .is_some_and(|c| c.color.rgba(i)[3] != 0 && visible_alpha(at(&c.alpha, i)))
    }

    fn set_vectorize(&self, ctx: &mut dyn Context2d, i: usize) -> PlotResult<()> {
        let cache = self.cache.as_ref().ok_or_else(unresolved)?;
        apply_line(
            ctx,
            cache.color.rgba(i),
            at(&cache.alpha, i),
            at(&cache.width, i),
            *self.line_join.value()?,
            *self.line_cap.value()?,
            self.line_dash.value()?,
            *self.line_dash_offset.value()?,
        );
        Ok(())
    }

    fn invalidate(&mut self) {
        self.cache = None;
    }
}

// ============================================================================
// Scalar
// ============================================================================

/// Single stroke state for annotations
#[derive(Debug)]
pub struct LineScalar {
    prefix: String,
    pub line_color: ScalarSpec<Option<Color>>,
    pub line_alpha: ScalarSpec<f64>,
    pub line_width: ScalarSpec<f64>,
    pub line_join: ScalarSpec<LineJoin>,
    pub line_cap: ScalarSpec<LineCap>,
    pub line_dash: ScalarSpec<LineDash>,
    pub line_dash_offset: ScalarSpec<f64>,
}

impl LineScalar {
    pub fn new(owner: &'static str, attrs: &AttrSet, defaults: LineDefaults) -> Self {
        Self {
            prefix: attrs.prefix().to_string(),
            line_color: ScalarSpec::from_property(attrs.build(owner, "line_color", defaults.color)),
            line_alpha: ScalarSpec::from_property(attrs.build(owner, "line_alpha", defaults.alpha)),
            line_width: ScalarSpec::from_property(attrs.build(owner, "line_width", defaults.width)),
            line_join: ScalarSpec::from_property(attrs.build(owner, "line_join", defaults.join)),
            line_cap: ScalarSpec::from_property(attrs.build(owner, "line_cap", defaults.cap)),
            line_dash: ScalarSpec::from_property(attrs.build(owner, "line_dash", defaults.dash)),
            line_dash_offset: ScalarSpec::from_property(attrs.build(
                owner,
                "line_dash_offset",
                defaults.dash_offset,
            )),
        }
    }

    pub fn with_defaults(owner: &'static str) -> Self {
        Self::new(owner, &AttrSet::new(LINE), LineDefaults::default())
    }
}

impl ContextProperties for LineScalar {
    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn properties(&self) -> Vec<&dyn AnyProperty> {
        vec![
            &self.line_color as &dyn AnyProperty,
            &self.line_alpha,
            &self.line_width,
            &self.line_join,
            &self.line_cap,
            &self.line_dash,
            &self.line_dash_offset,
        ]
    }

    fn properties_mut(&mut self) -> Vec<&mut dyn AnyProperty> {
        vec![
            &mut self.line_color as &mut dyn AnyProperty,
            &mut self.line_alpha,
            &mut self.line_width,
            &mut self.line_join,
            &mut self.line_cap,
            &mut self.line_dash,
            &mut self.line_dash_offset,
        ]
    }

    fn doit(&self) -> bool {
        let has_color = self.line_color.value().is_ok_and(Option::is_some);
        let alpha = self.line_alpha.value().copied().unwrap_or(0.0);
        has_color && visible_alpha(alpha)
    }
}

impl ScalarVisuals for LineScalar {
    fn set_value(&self, ctx: &mut dyn Context2d) -> PlotResult<()> {
        apply_line(
            ctx,
            color2rgba(self.line_color.value()?.as_ref()),
            *self.line_alpha.value()?,
            *self.line_width.value()?,
            *self.line_join.value()?,
            *self.line_cap.value()?,
            self.line_dash.value()?,
            *self.line_dash_offset.value()?,
        );
        Ok(())
    }
}
