//! Text labels, one per row.

use crate::constants::FALLBACK_FONT_SIZE_PX;
use crate::core::{AngleSpec, CoordinateSpec, DataProperty, Kind, NullStringSpec, NumberSpec};
use crate::error::PlotResult;
use crate::glyphs::{Glyph, GlyphData, get};
use crate::render::{Context2d, font_size_px, with_saved};
use crate::types::{Axis, TextBaseline};
use crate::visuals::{TextVector, VectorVisuals, Visuals};

const OWNER: &str = "Text";

#[derive(Debug)]
pub struct Text {
    pub x: CoordinateSpec,
    pub y: CoordinateSpec,
    pub text: NullStringSpec,
    pub angle: AngleSpec,
    /// Screen offsets applied after projection
    pub x_offset: NumberSpec,
    pub y_offset: NumberSpec,
    visuals: Visuals,
}

impl Default for Text {
    fn default() -> Self {
        Self::new()
    }
}

impl Text {
    pub fn new() -> Self {
        let text = NullStringSpec::new(OWNER, "text", Kind::NullString, None).with_field("text");
        Self {
            x: CoordinateSpec::field(OWNER, "x", Axis::X),
            y: CoordinateSpec::field(OWNER, "y", Axis::Y),
            text,
            angle: AngleSpec::new(OWNER, "angle", Kind::Angle, 0.0),
            x_offset: NumberSpec::new(OWNER, "x_offset", Kind::Number, 0.0),
            y_offset: NumberSpec::new(OWNER, "y_offset", Kind::Number, 0.0),
            visuals: Visuals::text_only(OWNER),
        }
    }
}

/// Vertical position of the first line of a multi-line block
fn first_line_offset(baseline: TextBaseline, block_height: f64) -> f64 {
    match baseline {
        TextBaseline::Top | TextBaseline::Hanging => 0.0,
        TextBaseline::Middle => -block_height / 2.0,
        TextBaseline::Bottom | TextBaseline::Alphabetic | TextBaseline::Ideographic => -block_height,
    }
}

fn render_lines(ctx: &mut dyn Context2d, visuals: &TextVector, i: usize, text: &str) {
    let lines: Vec<&str> = text.split('\n').collect();
    if lines.len() == 1 {
        ctx.fill_text(text, 0.0, 0.0);
        return;
    }
    let font_px = visuals
        .font_at(i)
        .and_then(font_size_px)
        .unwrap_or(FALLBACK_FONT_SIZE_PX);
    let line_height = font_px * visuals.line_height_at(i);
    let top = first_line_offset(visuals.baseline_at(i), line_height * (lines.len() - 1) as f64);
    for (k, line) in lines.iter().enumerate() {
        ctx.fill_text(line, 0.0, top + k as f64 * line_height);
    }
}

impl Glyph for Text {
    fn type_name(&self) -> &'static str {
        OWNER
    }

    fn data_properties(&self) -> Vec<&dyn DataProperty> {
        vec![
            &self.x as &dyn DataProperty,
            &self.y,
            &self.text,
            &self.angle,
            &self.x_offset,
            &self.y_offset,
        ]
    }

    fn data_properties_mut(&mut self) -> Vec<&mut dyn DataProperty> {
        vec![
            &mut self.x as &mut dyn DataProperty,
            &mut self.y,
            &mut self.text,
            &mut self.angle,
            &mut self.x_offset,
            &mut self.y_offset,
        ]
    }

    fn visuals(&self) -> &Visuals {
        &self.visuals
    }

    fn visuals_mut(&mut self) -> &mut Visuals {
        &mut self.visuals
    }

    fn render(&self, ctx: &mut dyn Context2d, indices: &[usize], data: &GlyphData) -> PlotResult<()> {
        let Some(visuals) = self.visuals.text("text") else {
            return Ok(());
        };
        let (sx, sy) = (data.screen("sx"), data.screen("sy"));
        let (x_offset, y_offset) = (data.numbers("x_offset"), data.numbers("y_offset"));
        let angle = data.numbers("angle");
        let texts = data.strings("text");

        for &i in indices {
            let text = texts.get(i).map(String::as_str).unwrap_or("");
            let (x, y) = (get(sx, i), get(sy, i));
            if text.is_empty() || !x.is_finite() || !y.is_finite() || !visuals.doit_at(i) {
                continue;
            }
            with_saved(ctx, |ctx| {
                ctx.translate(x + get(x_offset, i), y + get(y_offset, i));
                let a = get(angle, i);
                if a.is_finite() && a != 0.0 {
                    ctx.rotate(a);
                }
                visuals.set_vectorize(ctx, i)?;
                render_lines(ctx, visuals, i, text);
                Ok(())
            })?;
        }
        Ok(())
    }
}
