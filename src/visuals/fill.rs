//! Solid fill attributes.

use crate::core::{AnyProperty, ColorArray, ColorSpec, NumberSpec, ScalarSpec};
use crate::data::DataSource;
use crate::error::PlotResult;
use crate::render::{Context2d, FillStyle};
use crate::util::{Color, color2css, color2rgba};
use crate::visuals::{
    AttrSet, ContextProperties, FILL, FillDefaults, ScalarVisuals, VectorVisuals, at, select_rows, unresolved,
    visible_alpha,
};

#[derive(Debug)]
struct FillCache {
    color: ColorArray,
    alpha: Vec<f64>,
}

#[derive(Debug)]
pub struct FillVector {
    prefix: String,
    pub fill_color: ColorSpec,
    pub fill_alpha: NumberSpec,
    cache: Option<FillCache>,
}

impl FillVector {
    pub fn new(owner: &'static str, attrs: &AttrSet, defaults: FillDefaults) -> Self {
        Self {
            prefix: attrs.prefix().to_string(),
            fill_color: ColorSpec::from_property(attrs.build(owner, "fill_color", defaults.color)),
            fill_alpha: NumberSpec::from_property(attrs.build(owner, "fill_alpha", defaults.alpha)),
            cache: None,
        }
    }

    pub fn with_defaults(owner: &'static str) -> Self {
        Self::new(owner, &AttrSet::new(FILL), FillDefaults::default())
    }
}

impl ContextProperties for FillVector {
    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn properties(&self) -> Vec<&dyn AnyProperty> {
        vec![&self.fill_color as &dyn AnyProperty, &self.fill_alpha]
    }

    fn properties_mut(&mut self) -> Vec<&mut dyn AnyProperty> {
        vec![&mut self.fill_color as &mut dyn AnyProperty, &mut self.fill_alpha]
    }

    fn doit(&self) -> bool {
        let no_color = self.fill_color.spec().as_value().is_some_and(Option::is_none);
        let no_alpha = self.fill_alpha.spec().as_value().is_some_and(|a| *a == 0.0);
        !(no_color || no_alpha)
    }
}

impl VectorVisuals for FillVector {
    fn set_visuals(&mut self, source: &dyn DataSource, indices: &[usize]) -> PlotResult<()> {
        let color = self.fill_color.array(source)?;
        let alpha = self.fill_alpha.array(source)?;
        self.cache = Some(FillCache {
            color: ColorArray(select_rows(&color.0, indices)),
            alpha: select_rows(&alpha, indices),
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
        let css = color2css(cache.color.rgba(i), at(&cache.alpha, i));
        ctx.set_fill_style(FillStyle::Color(css));
        Ok(())
    }

    fn invalidate(&mut self) {
        self.cache = None;
    }
}

#[derive(Debug)]
pub struct FillScalar {
    prefix: String,
    pub fill_color: ScalarSpec<Option<Color>>,
    pub fill_alpha: ScalarSpec<f64>,
}

impl FillScalar {
    pub fn new(owner: &'static str, attrs: &AttrSet, defaults: FillDefaults) -> Self {
        Self {
            prefix: attrs.prefix().to_string(),
            fill_color: ScalarSpec::from_property(attrs.build(owner, "fill_color", defaults.color)),
            fill_alpha: ScalarSpec::from_property(attrs.build(owner, "fill_alpha", defaults.alpha)),
        }
    }

    pub fn with_defaults(owner: &'static str) -> Self {
        Self::new(owner, &AttrSet::new(FILL), FillDefaults::default())
    }
}

impl ContextProperties for FillScalar {
    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn properties(&self) -> Vec<&dyn AnyProperty> {
        vec![&self.fill_color as &dyn AnyProperty, &self.fill_alpha]
    }

    fn properties_mut(&mut self) -> Vec<&mut dyn AnyProperty> {
        vec![&mut self.fill_color as &mut dyn AnyProperty, &mut self.fill_alpha]
    }

    fn doit(&self) -> bool {
        let has_color = self.fill_color.value().is_ok_and(Option::is_some);
        let alpha = self.fill_alpha.value().copied().unwrap_or(0.0);
        has_color && visible_alpha(alpha)
    }
}

impl ScalarVisuals for FillScalar {
    fn set_value(&self, ctx: &mut dyn Context2d) -> PlotResult<()> {
        let rgba = color2rgba(self.fill_color.value()?.as_ref());
        ctx.set_fill_style(FillStyle::Color(color2css(rgba, *self.fill_alpha.value()?)));
        Ok(())
    }
}
