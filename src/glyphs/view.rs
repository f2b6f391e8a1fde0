//! The per-renderer glyph pipeline.
//!
//! ```text
//! Uninitialized -- set_data --> DataBound -- index_data --> Indexed -- map_data --> Mapped
//!                                                              ^                       |
//!                                                              +------ set_scales -----+
//! ```
//!
//! Stages must run in order. Skipping one is a programming error reported
//! as [`PlotError::Precondition`].

use crate::core::{AnyProperty, DataRole, Resolved};
use crate::data::DataSource;
use crate::error::{PlotError, PlotResult};
use crate::glyphs::{Geometry, Glyph, GlyphData, HitContext, Selection, screen_name};
use crate::perf::{self, PipelineStats};
use crate::profile_scope;
use crate::render::Context2d;
use crate::scales::Scale;
use crate::settings::settings;
use crate::spatial_index::{Rect, SpatialIndex};
use crate::types::{Axis, SpatialUnits};
use crate::visuals::RenderRequest;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::rc::Rc;
use tracing::{debug, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineState {
    Uninitialized,
    DataBound,
    Indexed,
    Mapped,
}

impl PipelineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineState::Uninitialized => "uninitialized",
            PipelineState::DataBound => "data bound",
            PipelineState::Indexed => "indexed",
            PipelineState::Mapped => "mapped",
        }
    }
}

/// Raw arrays a view resolved last, with the specs they were resolved from.
///
/// Every view owns one behind an `Rc`; views given this view as their base
/// hold the same handle and read it whenever they run a stage.
#[derive(Default)]
struct Published {
    specs: BTreeMap<String, Value>,
    data: GlyphData,
    generation: u64,
}

/// Live link to the arrays of a base view
struct BaseLink {
    published: Rc<RefCell<Published>>,
    seen: u64,
    attrs: BTreeSet<String>,
}

/// Drives one [`Glyph`] through resolution, indexing, projection and paint.
pub struct GlyphView<G: Glyph> {
    glyph: G,
    x_scale: Box<dyn Scale>,
    y_scale: Box<dyn Scale>,
    state: PipelineState,
    data: GlyphData,
    index: SpatialIndex,
    stats: PipelineStats,
    published: Rc<RefCell<Published>>,
    base: Option<BaseLink>,
    render_request: Option<RenderRequest>,
    warned: HashSet<&'static str>,
}

impl<G: Glyph> GlyphView<G> {
    pub fn new(glyph: G, x_scale: Box<dyn Scale>, y_scale: Box<dyn Scale>) -> Self {
        Self {
            glyph,
            x_scale,
            y_scale,
            state: PipelineState::Uninitialized,
            data: GlyphData::default(),
            index: SpatialIndex::new(),
            stats: PipelineStats::default(),
            published: Rc::default(),
            base: None,
            render_request: None,
            warned: HashSet::new(),
        }
    }

    pub fn glyph(&self) -> &G {
        &self.glyph
    }

    /// Mutable access to the model; the view must be fed data again.
    pub fn glyph_mut(&mut self) -> &mut G {
        self.invalidate();
        &mut self.glyph
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn data(&self) -> &GlyphData {
        &self.data
    }

    /// Rows resolved by the last `set_data`
    pub fn data_size(&self) -> usize {
        self.data.size()
    }

    pub fn stats(&self) -> &PipelineStats {
        &self.stats
    }

    pub fn spec_json(&self) -> Value {
        self.glyph.spec_json()
    }

    fn require(&self, operation: &'static str, required: PipelineState) -> PlotResult<()> {
        if self.state >= required {
            return Ok(());
        }
        let required = match required {
            PipelineState::Uninitialized | PipelineState::DataBound => "set_data",
            PipelineState::Indexed => "index_data",
            PipelineState::Mapped => "map_data",
        };
        Err(PlotError::Precondition {
            operation,
            required,
            state: self.state.as_str(),
        })
    }

    fn timed<T>(
        &mut self,
        stage: &'static str,
        run: impl FnOnce(&mut Self) -> PlotResult<T>,
    ) -> PlotResult<T> {
        let (result, elapsed_ms) = perf::measure(|| run(self));
        self.stats.record(stage, elapsed_ms);
        let threshold_ms = settings().slow_stage_ms;
        if elapsed_ms > threshold_ms {
            warn!(
                glyph = self.glyph.type_name(),
                stage,
                elapsed_ms = format!("{elapsed_ms:.2}"),
                threshold_ms = format!("{threshold_ms:.2}"),
                "Slow pipeline stage"
            );
        }
        result
    }

    fn invalidate(&mut self) {
        self.state = PipelineState::Uninitialized;
        self.glyph.visuals_mut().invalidate();
    }

    // ========================================================================
    // Stages
    // ========================================================================

    /// Resolve every geometry property and visual group for `indices`
    /// (all rows when `None`).
    pub fn set_data(&mut self, source: &dyn DataSource, indices: Option<&[usize]>) -> PlotResult<()> {
        self.timed("set_data", |view| view.resolve(source, indices))
    }

    fn resolve(&mut self, source: &dyn DataSource, indices: Option<&[usize]>) -> PlotResult<()> {
        profile_scope!("glyph_set_data");
        let len = source.get_length().unwrap_or(1);
        let indices: Vec<usize> = match indices {
            Some(indices) => indices.to_vec(),
            None => (0..len).collect(),
        };
        if let Some(&bad) = indices.iter().find(|&&i| i >= len) {
            return Err(PlotError::validation("indices", &Value::from(bad)));
        }

        let mut data = GlyphData::new(indices);
        let mut aliased = BTreeSet::new();
        for prop in self.glyph.data_properties() {
            let attr = prop.attr().to_string();
            if prop.skip_resolution() {
                continue;
            }
            if let Some(shared) = self.aliased(&attr, &prop.spec_json(), data.indices()) {
                aliased.insert(attr.clone());
                data.set_raw_shared(attr, shared);
                continue;
            }
            let resolved = prop.resolve(source)?;
            if resolved.len() != len {
                return Err(PlotError::LengthMismatch {
                    attr,
                    expected: len,
                    actual: resolved.len(),
                });
            }
            let resolved = match (prop.role(), resolved) {
                (DataRole::Coordinate { axis, .. }, Resolved::Column(column)) => {
                    Resolved::Numbers(self.scale(axis).v_synthetic(&column)?)
                }
                (_, resolved) => resolved,
            };
            let selected = resolved.select(data.indices());
            data.set_raw(attr, selected);
        }

        self.glyph.post_set_data(source, &mut data)?;
        let rows = data.indices().to_vec();
        self.glyph.visuals_mut().set_visuals(source, &rows)?;

        debug!(
            glyph = self.glyph.type_name(),
            rows = data.size(),
            aliased = aliased.len(),
            "set_data"
        );
        if let Some(base) = self.base.as_mut() {
            base.seen = base.published.borrow().generation;
            base.attrs = aliased;
        }
        self.publish(&data);
        self.data = data;
        self.state = PipelineState::DataBound;
        Ok(())
    }

    fn publish(&self, data: &GlyphData) {
        let specs = match self.glyph.spec_json() {
            Value::Object(map) => map.into_iter().collect(),
            _ => BTreeMap::new(),
        };
        let mut published = self.published.borrow_mut();
        published.specs = specs;
        published.data = data.without_screen();
        published.generation += 1;
    }

    fn aliased(&self, attr: &str, spec: &Value, indices: &[usize]) -> Option<Rc<Resolved>> {
        let base = self.base.as_ref()?.published.borrow();
        if base.specs.get(attr) != Some(spec) || base.data.indices() != indices {
            return None;
        }
        base.data.raw_shared(attr)
    }

    /// Pick up arrays the base resolved since our last `set_data`.
    ///
    /// Only attributes that were aliased at `set_data` are refreshed, and only
    /// while the base still selects the same rows with the same specs.
    fn sync_base(&mut self) {
        let Some(base) = self.base.as_mut() else {
            return;
        };
        let published = base.published.borrow();
        if published.generation == base.seen {
            return;
        }
        base.seen = published.generation;
        if published.data.indices() != self.data.indices() {
            return;
        }
        let specs: BTreeMap<String, Value> = self
            .glyph
            .data_properties()
            .into_iter()
            .filter(|p| base.attrs.contains(p.attr()))
            .map(|p| (p.attr().to_string(), p.spec_json()))
            .collect();
        let mut refreshed = 0;
        for (attr, spec) in specs {
            if published.specs.get(&attr) != Some(&spec) {
                continue;
            }
            if let Some(shared) = published.data.raw_shared(&attr) {
                self.data.set_raw_shared(attr, shared);
                refreshed += 1;
            }
        }
        drop(published);
        if refreshed > 0 {
            debug!(glyph = self.glyph.type_name(), refreshed, "synced base arrays");
            self.publish(&self.data);
        }
    }

    /// Build the spatial index over the resolved raw geometry
    pub fn index_data(&mut self) -> PlotResult<()> {
        self.require("index_data", PipelineState::DataBound)?;
        self.timed("index_data", |view| {
            profile_scope!("glyph_index_data");
            view.sync_base();
            view.index = SpatialIndex::from_entries(view.glyph.index_entries(&view.data));
            view.state = view.state.max(PipelineState::Indexed);
            Ok(())
        })
    }

    /// Project raw coordinates and distances into screen space
    pub fn map_data(&mut self) -> PlotResult<()> {
        self.require("map_data", PipelineState::Indexed)?;
        self.timed("map_data", |view| view.project())
    }

    fn project(&mut self) -> PlotResult<()> {
        profile_scope!("glyph_map_data");
        if self.base_changed() {
            // The index was built over the arrays being replaced
            self.sync_base();
            self.index = SpatialIndex::from_entries(self.glyph.index_entries(&self.data));
        }
        self.data.clear_screen();
        let mut mapped = Vec::new();
        for prop in self.glyph.data_properties() {
            let attr = prop.attr();
            if !self.data.has_raw(attr) {
                continue;
            }
            let values = self.data.numbers(attr);
            let screen = match prop.role() {
                DataRole::Coordinate { units: SpatialUnits::Screen, .. }
                | DataRole::Distance { units: SpatialUnits::Screen, .. } => values.to_vec(),
                DataRole::Coordinate { axis, .. } => self.scale(axis).v_compute(values),
                DataRole::Distance { axis, center, .. } => {
                    sdist(self.scale(axis), self.data.numbers(center), values)
                }
                DataRole::Angle | DataRole::Value => continue,
            };
            mapped.push((screen_name(attr), screen));
        }
        for (name, values) in mapped {
            self.data.set_screen(name, values);
        }
        self.glyph
            .post_map_data(&mut self.data, self.x_scale.as_ref(), self.y_scale.as_ref())?;
        self.state = PipelineState::Mapped;
        Ok(())
    }

    /// Draw the rows at `indices`, typically the result of [`mask_data`](Self::mask_data)
    pub fn render(&mut self, ctx: &mut dyn Context2d, indices: &[usize]) -> PlotResult<()> {
        self.require("render", PipelineState::Mapped)?;
        self.timed("render", |view| {
            profile_scope!("glyph_render");
            let indices: Vec<usize> = indices
                .iter()
                .copied()
                .filter(|&i| i < view.data.size())
                .collect();
            view.glyph.render(ctx, &indices, &view.data)
        })
    }

    /// Draw every row
    pub fn render_all(&mut self, ctx: &mut dyn Context2d) -> PlotResult<()> {
        let all: Vec<usize> = (0..self.data.size()).collect();
        self.render(ctx, &all)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Raw-space extent of the indexed geometry
    pub fn bounds(&self) -> PlotResult<Option<Rect>> {
        self.require("bounds", PipelineState::Indexed)?;
        Ok(self.index.bounds())
    }

    /// Positions whose indexed box intersects a screen-space viewport
    pub fn mask_data(&self, viewport: Rect) -> PlotResult<Vec<usize>> {
        self.require("mask_data", PipelineState::Indexed)?;
        let (x0, x1) = self.x_scale.r_invert(viewport.x0, viewport.x1);
        let (y0, y1) = self.y_scale.r_invert(viewport.y0, viewport.y1);
        Ok(self.index.query_rect(Rect::from_corners((x0, y0), (x1, y1))))
    }

    /// Rows selected by `geometry`.
    ///
    /// Geometry kinds the glyph has no handler for select nothing and are
    /// reported once per kind.
    pub fn hit_test(&mut self, geometry: &Geometry) -> PlotResult<Selection> {
        self.require("hit_test", PipelineState::Mapped)?;
        let hit = HitContext {
            data: &self.data,
            index: &self.index,
            x_scale: self.x_scale.as_ref(),
            y_scale: self.y_scale.as_ref(),
        };
        let result = match geometry {
            Geometry::Point { sx, sy } => self.glyph.hit_point(&hit, *sx, *sy),
            Geometry::Span { dimension, at } => self.glyph.hit_span(&hit, *dimension, *at),
            Geometry::Rect { sx0, sx1, sy0, sy1 } => {
                self.glyph.hit_rect(&hit, (*sx0, *sx1), (*sy0, *sy1))
            }
            Geometry::Poly { sx, sy } => self.glyph.hit_poly(&hit, sx, sy),
        };
        match result {
            Some(selection) => Ok(selection),
            None => {
                let kind = geometry.kind();
                if self.warned.insert(kind) {
                    warn!(
                        glyph = self.glyph.type_name(),
                        geometry = kind,
                        "'{kind}' selection not available for {}",
                        self.glyph.type_name()
                    );
                }
                Ok(Selection::empty())
            }
        }
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Replace the scales; screen arrays must be mapped again
    pub fn set_scales(&mut self, x_scale: Box<dyn Scale>, y_scale: Box<dyn Scale>) {
        self.x_scale = x_scale;
        self.y_scale = y_scale;
        if self.state > PipelineState::Indexed {
            self.state = PipelineState::Indexed;
        }
    }

    fn scale(&self, axis: Axis) -> &dyn Scale {
        match axis {
            Axis::X => self.x_scale.as_ref(),
            Axis::Y => self.y_scale.as_ref(),
        }
    }

    /// Alias the raw geometry arrays of `base` wherever its specs match ours.
    ///
    /// The link is live: every `set_data` reads the arrays `base` resolved
    /// last, and `index_data`/`map_data` pick up arrays `base` resolved since.
    /// Arrays are shared read-only. Visual groups are always resolved per
    /// view, so a hover or selection view can restyle shared geometry.
    pub fn set_base<B: Glyph>(&mut self, base: &GlyphView<B>) {
        self.base = Some(BaseLink {
            published: base.published.clone(),
            seen: 0,
            attrs: BTreeSet::new(),
        });
    }

    fn base_changed(&self) -> bool {
        self.base
            .as_ref()
            .is_some_and(|b| !b.attrs.is_empty() && b.published.borrow().generation != b.seen)
    }

    pub fn clear_base(&mut self) {
        self.base = None;
    }

    /// Assign one attribute from JSON. The view returns to `Uninitialized`.
    pub fn update_property(&mut self, attr: &str, value: &Value) -> PlotResult<()> {
        let owner = self.glyph.type_name();
        let property = self
            .glyph
            .property_mut(attr)
            .ok_or_else(|| PlotError::UnknownAttribute {
                owner,
                attr: attr.to_string(),
            })?;
        property.set_json(value)?;
        self.glyph.on_property_change(attr);
        if let Some(request) = &self.render_request {
            self.glyph.connect_render_request(request);
        }
        self.invalidate();
        Ok(())
    }

    /// Hook fired when an asynchronously loaded resource needs a repaint
    pub fn set_render_request(&mut self, request: RenderRequest) {
        self.glyph.connect_render_request(&request);
        self.render_request = Some(request);
    }
}

/// Screen lengths of data-space distances measured from `center`
fn sdist(scale: &dyn Scale, center: &[f64], distance: &[f64]) -> Vec<f64> {
    center
        .iter()
        .zip(distance)
        .map(|(&c, &d)| (scale.compute(c + d) - scale.compute(c)).abs())
        .collect()
}
