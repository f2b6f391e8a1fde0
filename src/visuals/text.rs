//! Text attributes.

use crate::core::{AnyProperty, ColorArray, ColorSpec, FontSizeSpec, NumberSpec, ScalarSpec, StringSpec, VectorSpec};
use crate::data::DataSource;
use crate::error::PlotResult;
use crate::render::{Context2d, FillStyle};
use crate::types::{FontStyle, TextAlign, TextBaseline};
use crate::util::{Color, color2css, color2rgba};
use crate::visuals::{
    AttrSet, ContextProperties, ScalarVisuals, TEXT, TextDefaults, VectorVisuals, at, select_rows, unresolved,
    visible_alpha,
};

/// CSS font shorthand, e.g. `"bold 12px helvetica"`
pub fn css_font(style: FontStyle, size: &str, family: &str) -> String {
    format!("{} {size} {family}", style.as_css())
}

fn apply_text(
    ctx: &mut dyn Context2d,
    rgba: [u8; 4],
    alpha: f64,
    font: &str,
    align: TextAlign,
    baseline: TextBaseline,
) {
    ctx.set_fill_style(FillStyle::Color(color2css(rgba, alpha)));
    ctx.set_font(font);
    ctx.set_text_align(align);
    ctx.set_text_baseline(baseline);
}

// ============================================================================
// Vector
// ============================================================================

#[derive(Debug)]
struct TextCache {
    color: ColorArray,
    alpha: Vec<f64>,
    font: Vec<String>,
    align: Vec<TextAlign>,
    baseline: Vec<TextBaseline>,
    line_height: Vec<f64>,
}

#[derive(Debug)]
pub struct TextVector {
    prefix: String,
    pub text_color: ColorSpec,
    pub text_alpha: NumberSpec,
    pub text_font: StringSpec,
    pub text_font_size: FontSizeSpec,
    pub text_font_style: VectorSpec<FontStyle>,
    pub text_align: VectorSpec<TextAlign>,
    pub text_baseline: VectorSpec<TextBaseline>,
    pub text_line_height: NumberSpec,
    cache: Option<TextCache>,
}

impl TextVector {
    pub fn new(owner: &'static str, attrs: &AttrSet, defaults: TextDefaults) -> Self {
        let d = defaults;
        Self {
            prefix: attrs.prefix().to_string(),
            text_color: ColorSpec::from_property(attrs.build(owner, "text_color", d.color)),
            text_alpha: NumberSpec::from_property(attrs.build(owner, "text_alpha", d.alpha)),
            text_font: StringSpec::from_property(attrs.build(owner, "text_font", d.font)),
            text_font_size: FontSizeSpec::from_property(attrs.build(owner, "text_font_size", d.font_size)),
            text_font_style: VectorSpec::from_property(attrs.build(owner, "text_font_style", d.font_style)),
            text_align: VectorSpec::from_property(attrs.build(owner, "text_align", d.align)),
            text_baseline: VectorSpec::from_property(attrs.build(owner, "text_baseline", d.baseline)),
            text_line_height: NumberSpec::from_property(attrs.build(owner, "text_line_height", d.line_height)),
            cache: None,
        }
    }

    pub fn with_defaults(owner: &'static str) -> Self {
        Self::new(owner, &AttrSet::new(TEXT), TextDefaults::default())
    }

    /// Resolved CSS font of row `i`
    pub fn font_at(&self, i: usize) -> Option<&str> {
        self.cache.as_ref()?.font.get(i).map(String::as_str)
    }

    pub fn line_height_at(&self, i: usize) -> f64 {
        self.cache.as_ref().map(|c| at(&c.line_height, i)).unwrap_or(f64::NAN)
    }

    pub fn baseline_at(&self, i: usize) -> TextBaseline {
        self.cache
            .as_ref()
            .and_then(|c| c.baseline.get(i).copied())
            .unwrap_or_default()
    }
}

impl ContextProperties for TextVector {
    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn properties(&self) -> Vec<&dyn AnyProperty> {
        vec![
            &self.text_color as &dyn AnyProperty,
            &self.text_alpha,
            &self.text_font,
            &self.text_font_size,
            &self.text_font_style,
            &self.text_align,
            &self.text_baseline,
            &self.text_line_height,
        ]
    }

    fn properties_mut(&mut self) -> Vec<&mut dyn AnyProperty> {
        vec![
            &mut self.text_color as &mut dyn AnyProperty,
            &mut self.text_alpha,
            &mut self.text_font,
            &mut self.text_font_size,
            &mut self.text_font_style,
            &mut self.text_align,
            &mut self.text_baseline,
            &mut self.text_line_height,
        ]
    }

    fn doit(&self) -> bool {
        let no_color = self.text_color.spec().as_value().is_some_and(Option::is_none);
        let no_alpha = self.text_alpha.spec().as_value().is_some_and(|a| *a == 0.0);
        !(no_color || no_alpha)
    }
}

impl VectorVisuals for TextVector {
    fn set_visuals(&mut self, source: &dyn DataSource, indices: &[usize]) -> PlotResult<()> {
        let color = self.text_color.array(source)?;
        let alpha = self.text_alpha.array(source)?;
        let family = select_rows(&self.text_font.array(source)?, indices);
        let size = select_rows(&self.text_font_size.array(source)?, indices);
        let style = select_rows(&self.text_font_style.array(source)?, indices);
        let font = style
            .iter()
            .zip(&size)
            .zip(&family)
            .map(|((style, size), family)| css_font(*style, size, family))
            .collect();

        self.cache = Some(TextCache {
            color: ColorArray(select_rows(&color.0, indices)),
            alpha: select_rows(&alpha, indices),
            font,
            align: select_rows(&self.text_align.array(source)?, indices),
            baseline: select_rows(&self.text_baseline.array(source)?, indices),
            line_height: select_rows(&self.text_line_height.array(source)?, indices),
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
        apply_text(
            ctx,
            cache.color.rgba(i),
            at(&cache.alpha, i),
            cache.font.get(i).map(String::as_str).unwrap_or_default(),
            cache.align.get(i).copied().unwrap_or_default(),
            cache.baseline.get(i).copied().unwrap_or_default(),
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

#[derive(Debug)]
pub struct TextScalar {
    prefix: String,
    pub text_color: ScalarSpec<Option<Color>>,
    pub text_alpha: ScalarSpec<f64>,
    pub text_font: ScalarSpec<String>,
    pub text_font_size: ScalarSpec<String>,
    pub text_font_style: ScalarSpec<FontStyle>,
    pub text_align: ScalarSpec<TextAlign>,
    pub text_baseline: ScalarSpec<TextBaseline>,
    pub text_line_height: ScalarSpec<f64>,
}

impl TextScalar {
    pub fn new(owner: &'static str, attrs: &AttrSet, defaults: TextDefaults) -> Self {
        let d = defaults;
        Self {
            prefix: attrs.prefix().to_string(),
            text_color: ScalarSpec::from_property(attrs.build(owner, "text_color", d.color)),
            text_alpha: ScalarSpec::from_property(attrs.build(owner, "text_alpha", d.alpha)),
            text_font: ScalarSpec::from_property(attrs.build(owner, "text_font", d.font)),
            text_font_size: ScalarSpec::from_property(attrs.build(owner, "text_font_size", d.font_size)),
            text_font_style: ScalarSpec::from_property(attrs.build(owner, "text_font_style", d.font_style)),
            text_align: ScalarSpec::from_property(attrs.build(owner, "text_align", d.align)),
            text_baseline: ScalarSpec::from_property(attrs.build(owner, "text_baseline", d.baseline)),
            text_line_height: ScalarSpec::from_property(attrs.build(owner, "text_line_height", d.line_height)),
        }
    }

    pub fn with_defaults(owner: &'static str) -> Self {
        Self::new(owner, &AttrSet::new(TEXT), TextDefaults::default())
    }

    pub fn font(&self) -> PlotResult<String> {
        Ok(css_font(
            *self.text_font_style.value()?,
            self.text_font_size.value()?,
            self.text_font.value()?,
        ))
    }
}

impl ContextProperties for TextScalar {
    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn properties(&self) -> Vec<&dyn AnyProperty> {
        vec![
            &self.text_color as &dyn AnyProperty,
            &self.text_alpha,
            &self.text_font,
            &self.text_font_size,
            &self.text_font_style,
            &self.text_align,
            &self.text_baseline,
            &self.text_line_height,
        ]
    }

    fn properties_mut(&mut self) -> Vec<&mut dyn AnyProperty> {
        vec![
            &mut self.text_color as &mut dyn AnyProperty,
            &mut self.text_alpha,
            &mut self.text_font,
            &mut self.text_font_size,
            &mut self.text_font_style,
            &mut self.text_align,
            &mut self.text_baseline,
            &mut self.text_line_height,
        ]
    }

    fn doit(&self) -> bool {
        let has_color = self.text_color.value().is_ok_and(Option::is_some);
        let alpha = self.text_alpha.value().copied().unwrap_or(0.0);
        has_color && visible_alpha(alpha)
    }
}

impl ScalarVisuals for TextScalar {
    fn set_value(&self, ctx: &mut dyn Context2d) -> PlotResult<()> {
        apply_text(
            ctx,
            color2rgba(self.text_color.value()?.as_ref()),
            *self.text_alpha.value()?,
            &self.font()?,
            *self.text_align.value()?,
            *self.text_baseline.value()?,
        );
        Ok(())
    }
}
