//! Scatter markers.

use crate::constants::DEFAULT_MARKER_SIZE;
use crate::core::{
    AngleSpec, CoordinateSpec, DataProperty, Kind, MarkerSpec, NullDistanceSpec,
    ScreenDistanceSpec,
};
use crate::error::PlotResult;
use crate::glyphs::markers::{is_fillable, trace};
use crate::glyphs::{
    Glyph, GlyphData, HitContext, Selection, get, point_in_poly, poly_bounds,
};
use crate::render::{Context2d, with_saved};
use crate::types::{Axis, Dimension, MarkerType};
use crate::visuals::{VectorVisuals, Visuals};
use tracing::debug;

const OWNER: &str = "Scatter";

const MARKER_TYPES: &[&str] = &[
    "asterisk",
    "circle",
    "circle_cross",
    "circle_x",
    "cross",
    "dash",
    "diamond",
    "dot",
    "inverted_triangle",
    "square",
    "square_x",
    "triangle",
    "x",
];

/// One marker per row at `(x, y)`.
///
/// `size` is the marker diameter in screen units. When `radius` is set it
/// takes over, measured along x in data units by default.
#[derive(Debug)]
pub struct Scatter {
    pub x: CoordinateSpec,
    pub y: CoordinateSpec,
    pub size: ScreenDistanceSpec,
    pub angle: AngleSpec,
    pub marker: MarkerSpec,
    pub radius: NullDistanceSpec,
    visuals: Visuals,
}

impl Default for Scatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Scatter {
    /// Markers at the `x` and `y` fields
    pub fn new() -> Self {
        Self {
            x: CoordinateSpec::field(OWNER, "x", Axis::X),
            y: CoordinateSpec::field(OWNER, "y", Axis::Y),
            size: ScreenDistanceSpec::new(OWNER, "size", Kind::NonNegative, DEFAULT_MARKER_SIZE)
                .along(Axis::X, "x"),
            angle: AngleSpec::new(OWNER, "angle", Kind::Angle, 0.0),
            marker: MarkerSpec::new(OWNER, "marker", Kind::Enum(MARKER_TYPES), MarkerType::Circle),
            radius: NullDistanceSpec::new(
                OWNER,
                "radius",
                Kind::Nullable(&Kind::NonNegative),
                None,
            )
            .optional()
            .along(Axis::X, "x"),
            visuals: Visuals::line_fill_hatch(OWNER),
        }
    }

    /// Per-row hit radius in screen units, and whether it is a true radius
    fn hit_radii(data: &GlyphData) -> (Vec<f64>, bool) {
        let sradius = data.screen("sradius");
        if !sradius.is_empty() {
            return (sradius.to_vec(), true);
        }
        (data.screen("ssize").iter().map(|s| s / 2.0).collect(), false)
    }

    fn within(data: &GlyphData, radii: &(Vec<f64>, bool), i: usize, sx: f64, sy: f64) -> bool {
        let (dx, dy) = (
            (get(data.screen("sx"), i) - sx).abs(),
            (get(data.screen("sy"), i) - sy).abs(),
        );
        let r = get(&radii.0, i);
        if radii.1 {
            dx.hypot(dy) <= r
        } else {
            dx <= r && dy <= r
        }
    }
}

fn max_finite(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max)
}

impl Glyph for Scatter {
    fn type_name(&self) -> &'static str {
        OWNER
    }

    fn data_properties(&self) -> Vec<&dyn DataProperty> {
        vec![
            &self.x as &dyn DataProperty,
            &self.y,
            &self.size,
            &self.angle,
            &self.marker,
            &self.radius,
        ]
    }

    fn data_properties_mut(&mut self) -> Vec<&mut dyn DataProperty> {
        vec![
            &mut self.x as &mut dyn DataProperty,
            &mut self.y,
            &mut self.size,
            &mut self.angle,
            &mut self.marker,
            &mut self.radius,
        ]
    }

    fn visuals(&self) -> &Visuals {
        &self.visuals
    }

    fn visuals_mut(&mut self) -> &mut Visuals {
        &mut self.visuals
    }

    fn render(&self, ctx: &mut dyn Context2d, indices: &[usize], data: &GlyphData) -> PlotResult<()> {
        let (sx, sy) = (data.screen("sx"), data.screen("sy"));
        let (ssize, sradius) = (data.screen("ssize"), data.screen("sradius"));
        let angle = data.numbers("angle");
        let markers = data.markers("marker");
        let line = self.visuals.line("line");
        let fill = self.visuals.fill("fill");
        let hatch = self.visuals.hatch("hatch");

        let mut deferred = 0usize;
        for &i in indices {
            let r = if sradius.is_empty() {
                get(ssize, i) / 2.0
            } else {
                get(sradius, i)
            };
            let (x, y) = (get(sx, i), get(sy, i));
            if !(x.is_finite() && y.is_finite() && r.is_finite()) {
                continue;
            }
            let marker = markers.get(i).copied().unwrap_or_default();

            with_saved(ctx, |ctx| {
                ctx.translate(x, y);
                let a = get(angle, i);
                if a.is_finite() && a != 0.0 {
                    ctx.rotate(a);
                }
                trace(ctx, marker, r);
                if is_fillable(marker) {
                    if let Some(fill) = fill.filter(|f| f.doit_at(i)) {
                        fill.set_vectorize(ctx, i)?;
                        ctx.fill();
                    }
                    if let Some(hatch) = hatch {
                        hatch.doit2(
                            ctx,
                            i,
                            |ctx| {
                                ctx.fill();
                                Ok(())
                            },
                            || deferred += 1,
                        )?;
                    }
                }
                if let Some(line) = line.filter(|l| l.doit_at(i)) {
                    line.set_vectorize(ctx, i)?;
                    ctx.stroke();
                }
                Ok(())
            })?;
        }
        if deferred > 0 {
            debug!(glyph = OWNER, deferred, "hatch textures pending");
        }
        Ok(())
    }

    fn hit_point(&self, hit: &HitContext<'_>, sx: f64, sy: f64) -> Option<Selection> {
        let radii = Self::hit_radii(hit.data);
        let r = max_finite(&radii.0);
        let candidates = hit.candidates(sx - r, sx + r, sy - r, sy + r);
        Some(hit.selection(
            candidates
                .into_iter()
                .filter(|&i| Self::within(hit.data, &radii, i, sx, sy)),
        ))
    }

    fn hit_span(&self, hit: &HitContext<'_>, dimension: Dimension, at: f64) -> Option<Selection> {
        let (radii, _) = Self::hit_radii(hit.data);
        let screen = match dimension {
            Dimension::Height => hit.data.screen("sx"),
            Dimension::Width => hit.data.screen("sy"),
        };
        let candidates = hit.span_candidates(dimension, at, max_finite(&radii));
        Some(hit.selection(
            candidates
                .into_iter()
                .filter(|&i| (get(screen, i) - at).abs() <= get(&radii, i)),
        ))
    }

    fn hit_rect(&self, hit: &HitContext<'_>, sx: (f64, f64), sy: (f64, f64)) -> Option<Selection> {
        let (x0, x1) = (sx.0.min(sx.1), sx.0.max(sx.1));
        let (y0, y1) = (sy.0.min(sy.1), sy.0.max(sy.1));
        let (xs, ys) = (hit.data.screen("sx"), hit.data.screen("sy"));
        let candidates = hit.candidates(x0, x1, y0, y1);
        Some(hit.selection(candidates.into_iter().filter(|&i| {
            let (x, y) = (get(xs, i), get(ys, i));
            x >= x0 && x <= x1 && y >= y0 && y <= y1
        })))
    }

    fn hit_poly(&self, hit: &HitContext<'_>, sx: &[f64], sy: &[f64]) -> Option<Selection> {
        let Some((x0, x1, y0, y1)) = poly_bounds(sx, sy) else {
            return Some(Selection::empty());
        };
        let (xs, ys) = (hit.data.screen("sx"), hit.data.screen("sy"));
        let candidates = hit.candidates(x0, x1, y0, y1);
        Some(hit.selection(
            candidates
                .into_iter()
                .filter(|&i| point_in_poly(get(xs, i), get(ys, i), sx, sy)),
        ))
    }
}
