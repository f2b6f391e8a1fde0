//! Straight line segments.

use crate::constants::MIN_HIT_DISTANCE;
use crate::core::{CoordinateSpec, DataProperty};
use crate::error::PlotResult;
use crate::glyphs::{Glyph, GlyphData, HitContext, Selection, dist_to_segment, get};
use crate::render::Context2d;
use crate::spatial_index::Rect;
use crate::types::{Axis, Dimension};
use crate::visuals::{VectorVisuals, Visuals};

const OWNER: &str = "Segment";

/// One segment per row from `(x0, y0)` to `(x1, y1)`
#[derive(Debug)]
pub struct Segment {
    pub x0: CoordinateSpec,
    pub y0: CoordinateSpec,
    pub x1: CoordinateSpec,
    pub y1: CoordinateSpec,
    visuals: Visuals,
}

impl Default for Segment {
    fn default() -> Self {
        Self::new()
    }
}

impl Segment {
    pub fn new() -> Self {
        Self {
            x0: CoordinateSpec::field(OWNER, "x0", Axis::X),
            y0: CoordinateSpec::field(OWNER, "y0", Axis::Y),
            x1: CoordinateSpec::field(OWNER, "x1", Axis::X),
            y1: CoordinateSpec::field(OWNER, "y1", Axis::Y),
            visuals: Visuals::line_only(OWNER),
        }
    }
}

struct Endpoints<'a> {
    sx0: &'a [f64],
    sy0: &'a [f64],
    sx1: &'a [f64],
    sy1: &'a [f64],
}

impl<'a> Endpoints<'a> {
    fn of(data: &'a GlyphData) -> Self {
        Self {
            sx0: data.screen("sx0"),
            sy0: data.screen("sy0"),
            sx1: data.screen("sx1"),
            sy1: data.screen("sy1"),
        }
    }

    fn at(&self, i: usize) -> ((f64, f64), (f64, f64)) {
        (
            (get(self.sx0, i), get(self.sy0, i)),
            (get(self.sx1, i), get(self.sy1, i)),
        )
    }
}

impl Glyph for Segment {
    fn type_name(&self) -> &'static str {
        OWNER
    }

    fn data_properties(&self) -> Vec<&dyn DataProperty> {
        vec![&self.x0 as &dyn DataProperty, &self.y0, &self.x1, &self.y1]
    }

    fn data_properties_mut(&mut self) -> Vec<&mut dyn DataProperty> {
        vec![
            &mut self.x0 as &mut dyn DataProperty,
            &mut self.y0,
            &mut self.x1,
            &mut self.y1,
        ]
    }

    fn visuals(&self) -> &Visuals {
        &self.visuals
    }

    fn visuals_mut(&mut self) -> &mut Visuals {
        &mut self.visuals
    }

    fn index_entries(&self, data: &GlyphData) -> Vec<(usize, Rect)> {
        let (x0, y0) = (data.numbers("x0"), data.numbers("y0"));
        let (x1, y1) = (data.numbers("x1"), data.numbers("y1"));
        (0..data.size())
            .map(|i| {
                let rect = Rect::from_corners((get(x0, i), get(y0, i)), (get(x1, i), get(y1, i)));
                (i, rect)
            })
            .collect()
    }

    fn render(&self, ctx: &mut dyn Context2d, indices: &[usize], data: &GlyphData) -> PlotResult<()> {
        let Some(line) = self.visuals.line("line") else {
            return Ok(());
        };
        let ends = Endpoints::of(data);
        for &i in indices {
            let ((x0, y0), (x1, y1)) = ends.at(i);
            if ![x0, y0, x1, y1].iter().all(|v| v.is_finite()) || !line.doit_at(i) {
                continue;
            }
            ctx.begin_path();
            ctx.move_to(x0, y0);
            ctx.line_to(x1, y1);
            line.set_vectorize(ctx, i)?;
            ctx.stroke();
        }
        Ok(())
    }

    fn hit_point(&self, hit: &HitContext<'_>, sx: f64, sy: f64) -> Option<Selection> {
        let d = MIN_HIT_DISTANCE;
        let ends = Endpoints::of(hit.data);
        let candidates = hit.candidates(sx - d, sx + d, sy - d, sy + d);
        Some(hit.selection(candidates.into_iter().filter(|&i| {
            let (a, b) = ends.at(i);
            dist_to_segment((sx, sy), a, b) <= d
        })))
    }

    fn hit_span(&self, hit: &HitContext<'_>, dimension: Dimension, at: f64) -> Option<Selection> {
        let ends = Endpoints::of(hit.data);
        let candidates = hit.span_candidates(dimension, at, 0.0);
        Some(hit.selection(candidates.into_iter().filter(|&i| {
            let ((x0, y0), (x1, y1)) = ends.at(i);
            let (lo, hi) = match dimension {
                Dimension::Height => (x0.min(x1), x0.max(x1)),
                Dimension::Width => (y0.min(y1), y0.max(y1)),
            };
            lo <= at && at <= hi
        })))
    }

    /// Segments lying entirely inside the rectangle
    fn hit_rect(&self, hit: &HitContext<'_>, sx: (f64, f64), sy: (f64, f64)) -> Option<Selection> {
        let (x0, x1) = (sx.0.min(sx.1), sx.0.max(sx.1));
        let (y0, y1) = (sy.0.min(sy.1), sy.0.max(sy.1));
        let inside = |(x, y): (f64, f64)| x >= x0 && x <= x1 && y >= y0 && y <= y1;
        let ends = Endpoints::of(hit.data);
        let candidates = hit.candidates(x0, x1, y0, y1);
        Some(hit.selection(candidates.into_iter().filter(|&i| {
            let (a, b) = ends.at(i);
            inside(a) && inside(b)
        })))
    }
}
