//! Marker outlines traced around the origin.

use crate::render::Context2d;
use crate::types::MarkerType;
use std::f64::consts::{FRAC_1_SQRT_2, TAU};

const SQ3: f64 = 1.732_050_807_568_877_2;

/// Whether a marker encloses an area (line-only markers skip fill and hatch)
pub fn is_fillable(marker: MarkerType) -> bool {
    !matches!(
        marker,
        MarkerType::Asterisk | MarkerType::Cross | MarkerType::Dash | MarkerType::X
    )
}

/// Start a new path tracing `marker` with radius `r`, centered at the origin
pub fn trace(ctx: &mut dyn Context2d, marker: MarkerType, r: f64) {
    ctx.begin_path();
    match marker {
        MarkerType::Asterisk => {
            let r2 = r * 0.65;
            cross(ctx, r);
            segment(ctx, (-r2, r2), (r2, -r2));
            segment(ctx, (-r2, -r2), (r2, r2));
        }
        MarkerType::Circle => circle(ctx, r),
        MarkerType::CircleCross => {
            circle(ctx, r);
            cross(ctx, r);
        }
        MarkerType::CircleX => {
            circle(ctx, r);
            x(ctx, r * FRAC_1_SQRT_2);
        }
        MarkerType::Cross => cross(ctx, r),
        MarkerType::Dash => segment(ctx, (-r, 0.0), (r, 0.0)),
        MarkerType::Diamond => {
            let w = r / 1.5;
            ctx.move_to(0.0, r);
            ctx.line_to(w, 0.0);
            ctx.line_to(0.0, -r);
            ctx.line_to(-w, 0.0);
            ctx.close_path();
        }
        MarkerType::Dot => circle(ctx, r / 4.0),
        MarkerType::InvertedTriangle => {
            let h = r * SQ3;
            let a = h / 3.0;
            ctx.move_to(-r, -a);
            ctx.line_to(r, -a);
            ctx.line_to(0.0, -a + h);
            ctx.close_path();
        }
        MarkerType::Square => ctx.rect(-r, -r, 2.0 * r, 2.0 * r),
        MarkerType::SquareX => {
            ctx.rect(-r, -r, 2.0 * r, 2.0 * r);
            x(ctx, r);
        }
        MarkerType::Triangle => {
            let h = r * SQ3;
            let a = h / 3.0;
            ctx.move_to(-r, a);
            ctx.line_to(r, a);
            ctx.line_to(0.0, a - h);
            ctx.close_path();
        }
        MarkerType::X => x(ctx, r),
    }
}

fn circle(ctx: &mut dyn Context2d, r: f64) {
    ctx.move_to(r, 0.0);
    ctx.arc(0.0, 0.0, r, 0.0, TAU, false);
    ctx.close_path();
}

fn segment(ctx: &mut dyn Context2d, a: (f64, f64), b: (f64, f64)) {
    ctx.move_to(a.0, a.1);
    ctx.line_to(b.0, b.1);
}

fn cross(ctx: &mut dyn Context2d, r: f64) {
    segment(ctx, (0.0, r), (0.0, -r));
    segment(ctx, (-r, 0.0), (r, 0.0));
}

fn x(ctx: &mut dyn Context2d, r: f64) {
    segment(ctx, (-r, r), (r, -r));
    segment(ctx, (-r, -r), (r, r));
}
