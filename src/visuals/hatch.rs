//! Hatch fills: built-in line patterns and image textures.
//!
//! Unlike the other groups, a hatch row may not be paintable yet: an image
//! texture has to finish loading first. [`HatchVector::doit2`] and
//! [`HatchScalar::doit2`] take a `ready` continuation (paint now) and a
//! `defer` continuation (texture still loading). Deferring registers one
//! load callback per texture that requests another render, guarded by a
//! weak reference to the renderer.

use crate::core::{
    AnyProperty, ColorArray, ColorSpec, NullStringSpec, NumberSpec, Property, ScalarSpec,
};
use crate::data::DataSource;
use crate::error::PlotResult;
use crate::render::{Context2d, FillStyle, Pattern, PatternSource};
use crate::types::TextureRepetition;
use crate::util::{Color, color2css, color2rgba};
use crate::visuals::{
    AttrSet, ContextProperties, HATCH, HatchDefaults, HatchPattern, RenderRequest, ScalarVisuals, TextureResource,
    TextureSpec, VectorVisuals, at, request_render_callback, select_rows, unresolved,
    visible_alpha,
};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Weak};

pub type HatchExtra = BTreeMap<String, TextureSpec>;

/// Outcome of looking up the pattern for one row
#[derive(Clone, Debug, PartialEq)]
pub enum PatternLookup {
    Ready(Pattern),
    /// A texture is still loading
    Pending,
    /// Unknown pattern name or failed texture
    Unavailable,
}

/// One resolved hatch state
struct HatchStyle<'a> {
    pattern: &'a str,
    rgba: [u8; 4],
    alpha: f64,
    scale: f64,
    weight: f64,
}

impl HatchStyle<'_> {
    fn is_visible(&self) -> bool {
        self.rgba[3] != 0 && visible_alpha(self.alpha) && !is_blank(self.pattern)
    }
}

fn is_blank(pattern: &str) -> bool {
    pattern.is_empty() || HatchPattern::parse(pattern).is_some_and(|p| p.is_blank())
}

/// Per-group pattern state: texture resources, created patterns and load
/// registrations. Cleared whenever the group is invalidated.
#[derive(Default)]
struct PatternCache {
    textures: RefCell<HashMap<String, (TextureSpec, TextureResource)>>,
    memo: RefCell<HashMap<String, Pattern>>,
    registered: RefCell<HashSet<String>>,
    render_request: Option<Weak<dyn Fn() + Send + Sync>>,
}

impl PatternCache {
    /// Create resources for new `hatch_extra` entries, keep unchanged ones
    fn sync_textures(&self, extra: &HatchExtra) {
        let mut textures = self.textures.borrow_mut();
        textures.retain(|name, (spec, _)| extra.get(name) == Some(spec));
        for (name, spec) in extra {
            textures
                .entry(name.clone())
                .or_insert_with(|| (spec.clone(), TextureResource::new(spec.url())));
        }
    }

    fn texture(&self, name: &str) -> Option<TextureResource> {
        self.textures.borrow().get(name).map(|(_, r)| r.clone())
    }

    fn lookup(&self, ctx: &mut dyn Context2d, style: &HatchStyle<'_>) -> PatternLookup {
        let textures = self.textures.borrow();
        if let Some((spec, resource)) = textures.get(style.pattern) {
            let Some(image) = resource.image() else {
                return if resource.is_pending() {
                    PatternLookup::Pending
                } else {
                    PatternLookup::Unavailable
                };
            };
            let key = format!("texture:{}", style.pattern);
            return PatternLookup::Ready(self.memoized(key, || {
                let source = PatternSource::Image {
                    url: spec.url().to_string(),
                    width: image.width(),
                    height: image.height(),
                };
                ctx.create_pattern(source, spec.repetition())
            }));
        }

        let Some(builtin) = HatchPattern::parse(style.pattern) else {
            return PatternLookup::Unavailable;
        };
        let color = color2css(style.rgba, style.alpha);
        let key = format!("{}:{color}:{}:{}", builtin.name(), style.scale, style.weight);
        PatternLookup::Ready(self.memoized(key, || {
            let source = PatternSource::Hatch {
                pattern: builtin.name().to_string(),
                color: color.clone(),
                scale: style.scale,
                weight: style.weight,
            };
            ctx.create_pattern(source, TextureRepetition::Repeat)
        }))
    }

    fn memoized(&self, key: String, create: impl FnOnce() -> Pattern) -> Pattern {
        self.memo.borrow_mut().entry(key).or_insert_with(create).clone()
    }

    /// Register (once per texture) a load callback requesting a render
    fn register_load(&self, name: &str) {
        let (Some(resource), Some(request)) = (self.texture(name), &self.render_request) else {
            return;
        };
        if self.registered.borrow_mut().insert(name.to_string()) {
            resource.on_load(request_render_callback(request));
        }
    }

    fn doit2(
        &self,
        ctx: &mut dyn Context2d,
        style: &HatchStyle<'_>,
        ready: impl FnOnce(&mut dyn Context2d) -> PlotResult<()>,
        defer: impl FnOnce(),
    ) -> PlotResult<()> {
        if !style.is_visible() {
            return Ok(());
        }
        match self.lookup(ctx, style) {
            PatternLookup::Ready(pattern) => {
                ctx.set_fill_style(FillStyle::Pattern(pattern));
                ready(ctx)
            }
            PatternLookup::Pending => {
                self.register_load(style.pattern);
                defer();
                Ok(())
            }
            PatternLookup::Unavailable => {
                tracing::debug!(pattern = style.pattern, "hatch pattern unavailable");
                Ok(())
            }
        }
    }

    fn clear(&self) {
        self.memo.borrow_mut().clear();
        self.registered.borrow_mut().clear();
    }
}

impl fmt::Debug for PatternCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternCache")
            .field("textures", &self.textures.borrow().len())
            .field("patterns", &self.memo.borrow().len())
            .finish()
    }
}

// ============================================================================
// Vector
// ============================================================================

#[derive(Debug)]
struct HatchCache {
    color: ColorArray,
    alpha: Vec<f64>,
    scale: Vec<f64>,
    pattern: Vec<String>,
    weight: Vec<f64>,
}

#[derive(Debug)]
pub struct HatchVector {
    prefix: String,
    pub hatch_color: ColorSpec,
    pub hatch_alpha: NumberSpec,
    pub hatch_scale: NumberSpec,
    pub hatch_pattern: NullStringSpec,
    pub hatch_weight: NumberSpec,
    pub hatch_extra: Property<HatchExtra>,
    cache: Option<HatchCache>,
    patterns: PatternCache,
}

impl HatchVector {
    pub fn new(owner: &'static str, attrs: &AttrSet, defaults: HatchDefaults) -> Self {
        Self {
            prefix: attrs.prefix().to_string(),
            hatch_color: ColorSpec::from_property(attrs.build(owner, "hatch_color", defaults.color)),
            hatch_alpha: NumberSpec::from_property(attrs.build(owner, "hatch_alpha", defaults.alpha)),
            hatch_scale: NumberSpec::from_property(attrs.build(owner, "hatch_scale", defaults.scale)),
            hatch_pattern: NullStringSpec::from_property(attrs.build(
                owner,
                "hatch_pattern",
                defaults.pattern,
            )),
            hatch_weight: NumberSpec::from_property(attrs.build(owner, "hatch_weight", defaults.weight)),
            hatch_extra: attrs.build(owner, "hatch_extra", defaults.extra),
            cache: None,
            patterns: PatternCache::default(),
        }
    }

    pub fn with_defaults(owner: &'static str) -> Self {
        Self::new(owner, &AttrSet::new(HATCH), HatchDefaults::default())
    }

    /// Render request fired when a pending texture finishes loading
    pub fn set_render_request(&mut self, request: &RenderRequest) {
        self.patterns.render_request = Some(Arc::downgrade(request));
    }

    /// Texture resource backing a `hatch_extra` entry, once resolved
    pub fn texture(&self, name: &str) -> Option<TextureResource> {
        self.patterns.texture(name)
    }

    fn style(&self, i: usize) -> Option<HatchStyle<'_>> {
        let cache = self.cache.as_ref()?;
        Some(HatchStyle {
            pattern: cache.pattern.get(i).map(String::as_str).unwrap_or(""),
            rgba: cache.color.rgba(i),
            alpha: at(&cache.alpha, i),
            scale: at(&cache.scale, i),
            weight: at(&cache.weight, i),
        })
    }

    /// Paint row `i` if its pattern is available, otherwise defer.
    ///
    /// `ready` runs with the hatch pattern installed as the fill style.
    /// `defer` runs when the row's texture is still loading; the load
    /// completing requests another render.
    pub fn doit2(
        &self,
        ctx: &mut dyn Context2d,
        i: usize,
        ready: impl FnOnce(&mut dyn Context2d) -> PlotResult<()>,
        defer: impl FnOnce(),
    ) -> PlotResult<()> {
        let style = self.style(i).ok_or_else(unresolved)?;
        self.patterns.doit2(ctx, &style, ready, defer)
    }
}

impl ContextProperties for HatchVector {
    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn properties(&self) -> Vec<&dyn AnyProperty> {
        vec![
            &self.hatch_color as &dyn AnyProperty,
            &self.hatch_alpha,
            &self.hatch_scale,
            &self.hatch_pattern,
            &self.hatch_weight,
            &self.hatch_extra,
        ]
    }

    fn properties_mut(&mut self) -> Vec<&mut dyn AnyProperty> {
        vec![
            &mut self.hatch_color as &mut dyn AnyProperty,
            &mut self.hatch_alpha,
            &mut self.hatch_scale,
            &mut self.hatch_pattern,
            &mut self.hatch_weight,
            &mut self.hatch_extra,
        ]
    }

    fn doit(&self) -> bool {
        let no_color = self.hatch_color.spec().as_value().is_some_and(Option::is_none);
        let no_alpha = self.hatch_alpha.spec().as_value().is_some_and(|a| *a == 0.0);
        let no_pattern = self
            .hatch_pattern
            .spec()
            .as_value()
            .is_some_and(|p| p.as_deref().is_none_or(is_blank));
        !(no_color || no_alpha || no_pattern)
    }
}

impl VectorVisuals for HatchVector {
    fn set_visuals(&mut self, source: &dyn DataSource, indices: &[usize]) -> PlotResult<()> {
        let color = self.hatch_color.array(source)?;
        let alpha = self.hatch_alpha.array(source)?;
        let scale = self.hatch_scale.array(source)?;
        let pattern = self.hatch_pattern.array(source)?;
        let weight = self.hatch_weight.array(source)?;
        self.patterns.sync_textures(self.hatch_extra.value()?);
        self.cache = Some(HatchCache {
            color: ColorArray(select_rows(&color.0, indices)),
            alpha: select_rows(&alpha, indices),
            scale: select_rows(&scale, indices),
            pattern: select_rows(&pattern, indices),
            weight: select_rows(&weight, indices),
        });
        Ok(())
    }

    fn doit_at(&self, i: usize) -> bool {
        self.style(i).is_some_and(|s| s.is_visible())
    }

    /// Installs the row's pattern as fill style; no-op while it is loading
    fn set_vectorize(&self, ctx: &mut dyn Context2d, i: usize) -> PlotResult<()> {
        let style = self.style(i).ok_or_else(unresolved)?;
        if let PatternLookup::Ready(pattern) = self.patterns.lookup(ctx, &style) {
            ctx.set_fill_style(FillStyle::Pattern(pattern));
        }
        Ok(())
    }

    fn invalidate(&mut self) {
        self.cache = None;
        self.patterns.clear();
    }
}

// ============================================================================
// Scalar
// ============================================================================

#[derive(Debug)]
pub struct HatchScalar {
    prefix: String,
    pub hatch_color: ScalarSpec<Option<Color>>,
    pub hatch_alpha: ScalarSpec<f64>,
    pub hatch_scale: ScalarSpec<f64>,
    pub hatch_pattern: ScalarSpec<Option<String>>,
    pub hatch_weight: ScalarSpec<f64>,
    pub hatch_extra: ScalarSpec<HatchExtra>,
    patterns: PatternCache,
}

impl HatchScalar {
    pub fn new(owner: &'static str, attrs: &AttrSet, defaults: HatchDefaults) -> Self {
        Self {
            prefix: attrs.prefix().to_string(),
            hatch_color: ScalarSpec::from_property(attrs.build(owner, "hatch_color", defaults.color)),
            hatch_alpha: ScalarSpec::from_property(attrs.build(owner, "hatch_alpha", defaults.alpha)),
            hatch_scale: ScalarSpec::from_property(attrs.build(owner, "hatch_scale", defaults.scale)),
            hatch_pattern: ScalarSpec::from_property(attrs.build(owner, "hatch_pattern", defaults.pattern)),
            hatch_weight: ScalarSpec::from_property(attrs.build(owner, "hatch_weight", defaults.weight)),
            hatch_extra: ScalarSpec::from_property(attrs.build(owner, "hatch_extra", defaults.extra)),
            patterns: PatternCache::default(),
        }
    }

    pub fn with_defaults(owner: &'static str) -> Self {
        Self::new(owner, &AttrSet::new(HATCH), HatchDefaults::default())
    }

    pub fn set_render_request(&mut self, request: &RenderRequest) {
        self.patterns.render_request = Some(Arc::downgrade(request));
    }

    pub fn texture(&self, name: &str) -> Option<TextureResource> {
        self.patterns.sync_textures(self.hatch_extra.value().ok()?);
        self.patterns.texture(name)
    }

    fn with_style<R>(&self, f: impl FnOnce(&HatchStyle<'_>) -> R) -> PlotResult<R> {
        self.patterns.sync_textures(self.hatch_extra.value()?);
        let pattern = self.hatch_pattern.value()?.clone().unwrap_or_default();
        let style = HatchStyle {
            pattern: &pattern,
            rgba: color2rgba(self.hatch_color.value()?.as_ref()),
            alpha: *self.hatch_alpha.value()?,
            scale: *self.hatch_scale.value()?,
            weight: *self.hatch_weight.value()?,
        };
        Ok(f(&style))
    }

    pub fn doit2(
        &self,
        ctx: &mut dyn Context2d,
        ready: impl FnOnce(&mut dyn Context2d) -> PlotResult<()>,
        defer: impl FnOnce(),
    ) -> PlotResult<()> {
        self.with_style(|style| self.patterns.doit2(ctx, style, ready, defer))?
    }
}

impl ContextProperties for HatchScalar {
    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn properties(&self) -> Vec<&dyn AnyProperty> {
        vec![
            &self.hatch_color as &dyn AnyProperty,
            &self.hatch_alpha,
            &self.hatch_scale,
            &self.hatch_pattern,
            &self.hatch_weight,
            &self.hatch_extra,
        ]
    }

    fn properties_mut(&mut self) -> Vec<&mut dyn AnyProperty> {
        vec![
            &mut self.hatch_color as &mut dyn AnyProperty,
            &mut self.hatch_alpha,
            &mut self.hatch_scale,
            &mut self.hatch_pattern,
            &mut self.hatch_weight,
            &mut self.hatch_extra,
        ]
    }

    fn doit(&self) -> bool {
        self.with_style(|style| style.is_visible()).unwrap_or(false)
    }
}

impl ScalarVisuals for HatchScalar {
    fn set_value(&self, ctx: &mut dyn Context2d) -> PlotResult<()> {
        self.with_style(|style| {
            if let PatternLookup::Ready(pattern) = self.patterns.lookup(ctx, style) {
                ctx.set_fill_style(FillStyle::Pattern(pattern));
            }
        })
    }
}
