//! The glyph trait and the arrays a view resolves for it.

use crate::core::{AnyProperty, DataProperty, Resolved};
use crate::data::DataSource;
use crate::error::PlotResult;
use crate::glyphs::{HitContext, Selection};
use crate::render::Context2d;
use crate::scales::Scale;
use crate::spatial_index::Rect;
use crate::types::{Dimension, MarkerType};
use crate::visuals::{RenderRequest, Visuals};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Resolved arrays of one view, indexed by position in [`indices`](Self::indices).
///
/// Raw arrays are shared through `Rc` so a view can alias the arrays of a
/// base view with identical specs.
#[derive(Clone, Debug, Default)]
pub struct GlyphData {
    indices: Vec<usize>,
    raw: BTreeMap<String, Rc<Resolved>>,
    screen: BTreeMap<String, Vec<f64>>,
}

impl GlyphData {
    pub(crate) fn new(indices: Vec<usize>) -> Self {
        Self {
            indices,
            ..Self::default()
        }
    }

    /// Number of rows selected by the last `set_data`
    pub fn size(&self) -> usize {
        self.indices.len()
    }

    /// Data source row of each position
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn raw(&self, attr: &str) -> Option<&Resolved> {
        self.raw.get(attr).map(Rc::as_ref)
    }

    pub(crate) fn raw_shared(&self, attr: &str) -> Option<Rc<Resolved>> {
        self.raw.get(attr).cloned()
    }

    pub fn has_raw(&self, attr: &str) -> bool {
        self.raw.contains_key(attr)
    }

    /// Numeric raw array; empty when absent or not numeric
    pub fn numbers(&self, attr: &str) -> &[f64] {
        match self.raw(attr) {
            Some(Resolved::Numbers(v)) => v,
            _ => &[],
        }
    }

    pub fn strings(&self, attr: &str) -> &[String] {
        match self.raw(attr) {
            Some(Resolved::Strings(v)) => v,
            _ => &[],
        }
    }

    pub fn markers(&self, attr: &str) -> &[MarkerType] {
        match self.raw(attr) {
            Some(Resolved::Markers(v)) => v,
            _ => &[],
        }
    }

    /// Screen-space array, e.g. `"sx"`; empty when not mapped
    pub fn screen(&self, name: &str) -> &[f64] {
        self.screen.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn set_raw(&mut self, attr: impl Into<String>, values: Resolved) {
        self.raw.insert(attr.into(), Rc::new(values));
    }

    pub(crate) fn set_raw_shared(&mut self, attr: impl Into<String>, values: Rc<Resolved>) {
        self.raw.insert(attr.into(), values);
    }

    pub fn set_screen(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.screen.insert(name.into(), values);
    }

    pub(crate) fn clear_screen(&mut self) {
        self.screen.clear();
    }

    /// Copy sharing the raw arrays, with no screen arrays
    pub(crate) fn without_screen(&self) -> GlyphData {
        GlyphData {
            indices: self.indices.clone(),
            raw: self.raw.clone(),
            screen: BTreeMap::new(),
        }
    }

    /// True when `attr` is backed by the same allocation in both
    pub fn shares_raw(&self, other: &GlyphData, attr: &str) -> bool {
        match (self.raw.get(attr), other.raw.get(attr)) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Screen name of a mapped attribute: `x` maps to `sx`, `x_start` to `sx_start`
pub fn screen_name(attr: &str) -> String {
    format!("s{attr}")
}

/// Value at `i`, NaN past the end
#[inline]
pub(crate) fn get(values: &[f64], i: usize) -> f64 {
    values.get(i).copied().unwrap_or(f64::NAN)
}

/// Geometry or visual property named `attr`
pub fn declared_property_mut<'a, G: Glyph + ?Sized>(
    glyph: &'a mut G,
    attr: &str,
) -> Option<&'a mut dyn AnyProperty> {
    if glyph.data_properties().iter().any(|p| p.attr() == attr) {
        return glyph
            .data_properties_mut()
            .into_iter()
            .find(|p| p.attr() == attr)
            .map(|p| p.as_property_mut());
    }
    glyph.visuals_mut().property_mut(attr)
}

/// A drawable type driven by a [`GlyphView`](crate::glyphs::GlyphView).
///
/// Implementors declare their geometry properties and visual groups and
/// draw one row at a time; resolution, projection and indexing are done by
/// the view.
pub trait Glyph {
    fn type_name(&self) -> &'static str;

    /// Geometry properties, resolved on every `set_data`
    fn data_properties(&self) -> Vec<&dyn DataProperty>;

    fn data_properties_mut(&mut self) -> Vec<&mut dyn DataProperty>;

    fn visuals(&self) -> &Visuals;

    fn visuals_mut(&mut self) -> &mut Visuals;

    /// Look up any attribute by name for dynamic assignment
    fn property_mut(&mut self, attr: &str) -> Option<&mut dyn AnyProperty> {
        declared_property_mut(self, attr)
    }

    /// Active specs of every attribute, keyed by attribute name
    fn spec_json(&self) -> serde_json::Value {
        let mut map: serde_json::Map<String, serde_json::Value> = self
            .data_properties()
            .into_iter()
            .map(|p| (p.attr().to_string(), p.spec_json()))
            .collect();
        if let serde_json::Value::Object(visuals) = self.visuals().spec_json() {
            map.extend(visuals);
        }
        map.into()
    }

    /// Called after `attr` was assigned dynamically
    fn on_property_change(&mut self, _attr: &str) {}

    fn connect_render_request(&mut self, request: &RenderRequest) {
        self.visuals_mut().connect_render_request(request);
    }

    /// Derive extra arrays once the declared properties are resolved
    fn post_set_data(&mut self, _source: &dyn DataSource, _data: &mut GlyphData) -> PlotResult<()> {
        Ok(())
    }

    /// Raw-space boxes to index, keyed by position; defaults to `x`/`y` points
    fn index_entries(&self, data: &GlyphData) -> Vec<(usize, Rect)> {
        let (x, y) = (data.numbers("x"), data.numbers("y"));
        x.iter()
            .zip(y)
            .enumerate()
            .map(|(i, (&x, &y))| (i, Rect::point(x, y)))
            .collect()
    }

    /// Derive screen quantities the per-axis projection does not cover
    fn post_map_data(
        &mut self,
        _data: &mut GlyphData,
        _x_scale: &dyn Scale,
        _y_scale: &dyn Scale,
    ) -> PlotResult<()> {
        Ok(())
    }

    /// Draw the rows at `indices` (positions into `data`)
    fn render(&self, ctx: &mut dyn Context2d, indices: &[usize], data: &GlyphData)
    -> PlotResult<()>;

    fn hit_point(&self, _hit: &HitContext<'_>, _sx: f64, _sy: f64) -> Option<Selection> {
        None
    }

    fn hit_span(&self, _hit: &HitContext<'_>, _dimension: Dimension, _at: f64) -> Option<Selection> {
        None
    }

    fn hit_rect(
        &self,
        _hit: &HitContext<'_>,
        _sx: (f64, f64),
        _sy: (f64, f64),
    ) -> Option<Selection> {
        None
    }

    fn hit_poly(&self, _hit: &HitContext<'_>, _sx: &[f64], _sy: &[f64]) -> Option<Selection> {
        None
    }
}
