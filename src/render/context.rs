//! The drawing context glyphs and visual groups paint onto.
//!
//! Mirrors the state-machine style of a 2D canvas: style setters change the
//! current state, path primitives build a path, and `stroke`/`fill` paint it.
//! Callers bracket state changes with `save`/`restore`.

use crate::error::PlotResult;
use crate::types::{LineCap, LineJoin, TextAlign, TextBaseline, TextureRepetition};
use serde::Serialize;

/// Paint source for fills: a CSS color or a pattern made by
/// [`Context2d::create_pattern`]
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FillStyle {
    Color(String),
    Pattern(Pattern),
}

/// What a pattern tile is drawn from
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PatternSource {
    /// A built-in hatch drawn at `scale` pixels per tile
    Hatch {
        pattern: String,
        color: String,
        scale: f64,
        weight: f64,
    },
    /// A decoded texture image
    Image { url: String, width: u32, height: u32 },
}

/// Handle to a pattern owned by the context
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Pattern {
    pub id: usize,
    pub source: PatternSource,
    pub repetition: TextureRepetition,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct TextMetrics {
    pub width: f64,
    pub ascent: f64,
    pub descent: f64,
}

/// Run `draw` between `save` and `restore`. The state is restored even
/// when `draw` fails.
pub fn with_saved<T>(
    ctx: &mut dyn Context2d,
    draw: impl FnOnce(&mut dyn Context2d) -> PlotResult<T>,
) -> PlotResult<T> {
    ctx.save();
    let result = draw(&mut *ctx);
    ctx.restore();
    result
}

/// A mutable 2D drawing context.
pub trait Context2d {
    fn save(&mut self);
    fn restore(&mut self);

    // State
    fn set_stroke_style(&mut self, color: &str);
    fn set_fill_style(&mut self, style: FillStyle);
    fn set_line_width(&mut self, width: f64);
    fn set_line_join(&mut self, join: LineJoin);
    fn set_line_cap(&mut self, cap: LineCap);
    fn set_line_dash(&mut self, dash: &[f64]);
    fn set_line_dash_offset(&mut self, offset: f64);
    fn set_global_alpha(&mut self, alpha: f64);
    fn set_font(&mut self, font: &str);
    fn set_text_align(&mut self, align: TextAlign);
    fn set_text_baseline(&mut self, baseline: TextBaseline);

    // Paths
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64, anticlockwise: bool);
    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn close_path(&mut self);
    fn stroke(&mut self);
    fn fill(&mut self);
    fn clip(&mut self);

    // Transforms
    fn translate(&mut self, dx: f64, dy: f64);
    fn rotate(&mut self, angle: f64);

    // Text
    fn fill_text(&mut self, text: &str, x: f64, y: f64);
    fn measure_text(&self, text: &str) -> TextMetrics;

    fn create_pattern(&mut self, source: PatternSource, repetition: TextureRepetition) -> Pattern;
}

/// Pixel size of a CSS font shorthand such as `"bold 12px helvetica"`
pub fn font_size_px(font: &str) -> Option<f64> {
    font.split_whitespace()
        .find_map(|part| part.strip_suffix("px").and_then(|n| n.parse().ok()))
}
