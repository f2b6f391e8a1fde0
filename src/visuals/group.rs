//! The named set of vector visual groups a glyph owns.

use crate::core::AnyProperty;
use crate::data::DataSource;
use crate::error::PlotResult;
use crate::render::Context2d;
use crate::visuals::{
    ContextProperties, FillVector, HatchVector, LineVector, RenderRequest, TextVector,
    VectorVisuals,
};
use std::collections::BTreeMap;

#[derive(Debug)]
pub enum VisualGroup {
    Line(LineVector),
    Fill(FillVector),
    Hatch(HatchVector),
    Text(TextVector),
}

impl VisualGroup {
    fn visuals(&self) -> &dyn VectorVisuals {
        match self {
            VisualGroup::Line(g) => g,
            VisualGroup::Fill(g) => g,
            VisualGroup::Hatch(g) => g,
            VisualGroup::Text(g) => g,
        }
    }

    fn visuals_mut(&mut self) -> &mut dyn VectorVisuals {
        match self {
            VisualGroup::Line(g) => g,
            VisualGroup::Fill(g) => g,
            VisualGroup::Hatch(g) => g,
            VisualGroup::Text(g) => g,
        }
    }

    pub fn doit(&self) -> bool {
        self.visuals().doit()
    }

    pub fn doit_at(&self, i: usize) -> bool {
        self.visuals().doit_at(i)
    }

    pub fn set_vectorize(&self, ctx: &mut dyn Context2d, i: usize) -> PlotResult<()> {
        self.visuals().set_vectorize(ctx, i)
    }
}

/// Visual groups keyed by name (`"line"`, `"fill"`, `"border_line"`, ...).
#[derive(Debug, Default)]
pub struct Visuals {
    groups: BTreeMap<String, VisualGroup>,
}

impl Visuals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unprefixed line, fill and hatch groups, the usual set for markers
    pub fn line_fill_hatch(owner: &'static str) -> Self {
        Self::new()
            .with("line", VisualGroup::Line(LineVector::with_defaults(owner)))
            .with("fill", VisualGroup::Fill(FillVector::with_defaults(owner)))
            .with("hatch", VisualGroup::Hatch(HatchVector::with_defaults(owner)))
    }

    pub fn line_only(owner: &'static str) -> Self {
        Self::new().with("line", VisualGroup::Line(LineVector::with_defaults(owner)))
    }

    pub fn text_only(owner: &'static str) -> Self {
        Self::new().with("text", VisualGroup::Text(TextVector::with_defaults(owner)))
    }

    pub fn with(mut self, name: impl Into<String>, group: VisualGroup) -> Self {
        self.groups.insert(name.into(), group);
        self
    }

    pub fn get(&self, name: &str) -> Option<&VisualGroup> {
        self.groups.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn line(&self, name: &str) -> Option<&LineVector> {
        match self.groups.get(name) {
            Some(VisualGroup::Line(g)) => Some(g),
            _ => None,
        }
    }

    pub fn line_mut(&mut self, name: &str) -> Option<&mut LineVector> {
        match self.groups.get_mut(name) {
            Some(VisualGroup::Line(g)) => Some(g),
            _ => None,
        }
    }

    pub fn fill(&self, name: &str) -> Option<&FillVector> {
        match self.groups.get(name) {
            Some(VisualGroup::Fill(g)) => Some(g),
            _ => None,
        }
    }

    pub fn fill_mut(&mut self, name: &str) -> Option<&mut FillVector> {
        match self.groups.get_mut(name) {
            Some(VisualGroup::Fill(g)) => Some(g),
            _ => None,
        }
    }

    pub fn hatch(&self, name: &str) -> Option<&HatchVector> {
        match self.groups.get(name) {
            Some(VisualGroup::Hatch(g)) => Some(g),
            _ => None,
        }
    }

    pub fn hatch_mut(&mut self, name: &str) -> Option<&mut HatchVector> {
        match self.groups.get_mut(name) {
            Some(VisualGroup::Hatch(g)) => Some(g),
            _ => None,
        }
    }

    pub fn text(&self, name: &str) -> Option<&TextVector> {
        match self.groups.get(name) {
            Some(VisualGroup::Text(g)) => Some(g),
            _ => None,
        }
    }

    pub fn text_mut(&mut self, name: &str) -> Option<&mut TextVector> {
        match self.groups.get_mut(name) {
            Some(VisualGroup::Text(g)) => Some(g),
            _ => None,
        }
    }

    /// Resolve every group against `source` for the given rows
    pub fn set_visuals(&mut self, source: &dyn DataSource, indices: &[usize]) -> PlotResult<()> {
        for group in self.groups.values_mut() {
            group.visuals_mut().set_visuals(source, indices)?;
        }
        Ok(())
    }

    pub fn invalidate(&mut self) {
        for group in self.groups.values_mut() {
            group.visuals_mut().invalidate();
        }
    }

    /// Hand the render request to groups that can complete asynchronously
    pub fn connect_render_request(&mut self, request: &RenderRequest) {
        for group in self.groups.values_mut() {
            if let VisualGroup::Hatch(hatch) = group {
                hatch.set_render_request(request);
            }
        }
    }

    pub fn properties(&self) -> Vec<&dyn AnyProperty> {
        self.groups
            .values()
            .flat_map(|g| g.visuals().properties())
            .collect()
    }

    pub fn property_mut(&mut self, attr: &str) -> Option<&mut dyn AnyProperty> {
        self.groups
            .values_mut()
            .find_map(|g| g.visuals_mut().property_mut(attr))
    }

    /// Active specs of every attribute, keyed by attribute name
    pub fn spec_json(&self) -> serde_json::Value {
        self.properties()
            .into_iter()
            .map(|p| (p.attr().to_string(), p.spec_json()))
            .collect::<serde_json::Map<_, _>>()
            .into()
    }
}
