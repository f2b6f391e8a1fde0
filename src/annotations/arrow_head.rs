//! Arrow heads drawn at the ends of arrows and whiskers.
//!
//! A head is drawn around the origin pointing towards negative y; the
//! caller translates to the attachment point and rotates first.

use crate::constants::ARROW_HEAD_SIZE;
use crate::core::{AnyProperty, Kind, NumberSpec};
use crate::data::DataSource;
use crate::error::PlotResult;
use crate::render::Context2d;
use crate::util::Color;
use crate::visuals::{
    AttrSet, FILL, FillDefaults, FillVector, LineVector, VectorVisuals, VisualGroup, Visuals, at,
    select_rows,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArrowHeadKind {
    #[serde(rename = "OpenHead")]
    Open,
    #[serde(rename = "NormalHead")]
    Normal,
    #[serde(rename = "VeeHead")]
    Vee,
    #[serde(rename = "TeeHead")]
    Tee,
}

impl ArrowHeadKind {
    pub fn name(&self) -> &'static str {
        match self {
            ArrowHeadKind::Open => "OpenHead",
            ArrowHeadKind::Normal => "NormalHead",
            ArrowHeadKind::Vee => "VeeHead",
            ArrowHeadKind::Tee => "TeeHead",
        }
    }

    fn is_filled(&self) -> bool {
        matches!(self, ArrowHeadKind::Normal | ArrowHeadKind::Vee)
    }
}

#[derive(Debug)]
pub struct ArrowHead {
    kind: ArrowHeadKind,
    pub size: NumberSpec,
    visuals: Visuals,
    sizes: Vec<f64>,
}

impl ArrowHead {
    pub fn new(kind: ArrowHeadKind, size: f64) -> Self {
        let owner = kind.name();
        let mut visuals = Visuals::new().with("line", VisualGroup::Line(LineVector::with_defaults(owner)));
        if kind.is_filled() {
            let fill = FillDefaults {
                color: Some(Color::css("black")),
                ..Default::default()
            };
            let fill = FillVector::new(owner, &AttrSet::new(FILL), fill);
            visuals = visuals.with("fill", VisualGroup::Fill(fill));
        }
        Self {
            kind,
            size: NumberSpec::new(owner, "size", Kind::NonNegative, size),
            visuals,
            sizes: Vec::new(),
        }
    }

    pub fn open() -> Self {
        Self::new(ArrowHeadKind::Open, ARROW_HEAD_SIZE)
    }

    pub fn normal() -> Self {
        Self::new(ArrowHeadKind::Normal, ARROW_HEAD_SIZE)
    }

    pub fn vee() -> Self {
        Self::new(ArrowHeadKind::Vee, ARROW_HEAD_SIZE)
    }

    pub fn tee() -> Self {
        Self::new(ArrowHeadKind::Tee, ARROW_HEAD_SIZE)
    }

    pub fn kind(&self) -> ArrowHeadKind {
        self.kind
    }

    pub fn visuals(&self) -> &Visuals {
        &self.visuals
    }

    pub fn visuals_mut(&mut self) -> &mut Visuals {
        &mut self.visuals
    }

    pub fn property_mut(&mut self, attr: &str) -> Option<&mut dyn AnyProperty> {
        if attr == "size" {
            return Some(&mut self.size);
        }
        self.visuals.property_mut(attr)
    }

    pub fn spec_json(&self) -> serde_json::Value {
        let mut spec = self.visuals.spec_json();
        if let serde_json::Value::Object(map) = &mut spec {
            map.insert("type".into(), json!(self.kind.name()));
            map.insert("size".into(), self.size.spec_json());
        }
        spec
    }

    /// Resolve size and visuals for the rows of the owning annotation
    pub fn set_data(&mut self, source: &dyn DataSource, indices: &[usize]) -> PlotResult<()> {
        self.sizes = select_rows(&self.size.array(source)?, indices);
        self.visuals.set_visuals(source, indices)
    }

    pub fn invalidate(&mut self) {
        self.sizes.clear();
        self.visuals.invalidate();
    }

    /// Draw row `i` around the origin
    pub fn render(&self, ctx: &mut dyn Context2d, i: usize) -> PlotResult<()> {
        let size = at(&self.sizes, i);
        if !size.is_finite() {
            return Ok(());
        }
        ctx.begin_path();
        match self.kind {
            ArrowHeadKind::Open | ArrowHeadKind::Normal => {
                ctx.move_to(0.5 * size, size);
                ctx.line_to(0.0, 0.0);
                ctx.line_to(-0.5 * size, size);
            }
            ArrowHeadKind::Vee => {
                ctx.move_to(0.5 * size, size);
                ctx.line_to(0.0, 0.0);
                ctx.line_to(-0.5 * size, size);
                ctx.line_to(0.0, 0.5 * size);
            }
            ArrowHeadKind::Tee => {
                ctx.move_to(0.5 * size, 0.0);
                ctx.line_to(-0.5 * size, 0.0);
            }
        }
        if self.kind.is_filled() {
            ctx.close_path();
            if let Some(fill) = self.visuals.fill("fill").filter(|f| f.doit_at(i)) {
                fill.set_vectorize(ctx, i)?;
                ctx.fill();
            }
        }
        if let Some(line) = self.visuals.line("line").filter(|l| l.doit_at(i)) {
            line.set_vectorize(ctx, i)?;
            ctx.stroke();
        }
        Ok(())
    }
}
