//! A [`Context2d`] that records every call instead of rasterizing.
//!
//! Used by tests and by headless callers that replay the command list on a
//! real backend.

use crate::constants::{APPROX_CHAR_WIDTH, FALLBACK_FONT_SIZE_PX};
use crate::render::{Context2d, FillStyle, Pattern, PatternSource, TextMetrics, font_size_px};
use crate::types::{LineCap, LineJoin, TextAlign, TextBaseline, TextureRepetition};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Save,
    Restore,
    StrokeStyle { color: String },
    FillStyle { style: FillStyle },
    LineWidth { width: f64 },
    LineJoin { join: LineJoin },
    LineCap { cap: LineCap },
    LineDash { dash: Vec<f64> },
    LineDashOffset { offset: f64 },
    GlobalAlpha { alpha: f64 },
    Font { font: String },
    TextAlign { align: TextAlign },
    TextBaseline { baseline: TextBaseline },
    BeginPath,
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    Arc {
        x: f64,
        y: f64,
        radius: f64,
        start: f64,
        end: f64,
        anticlockwise: bool,
    },
    Rect { x: f64, y: f64, width: f64, height: f64 },
    ClosePath,
    Stroke,
    Fill,
    Clip,
    Translate { dx: f64, dy: f64 },
    Rotate { angle: f64 },
    FillText { text: String, x: f64, y: f64 },
    CreatePattern { id: usize },
}

#[derive(Debug, Default)]
pub struct RecordingContext {
    commands: Vec<DrawCommand>,
    fonts: Vec<String>,
    font: String,
    next_pattern: usize,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drain the recorded commands
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn count(&self, predicate: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| predicate(c)).count()
    }

    /// Rotation angles in call order
    pub fn rotations(&self) -> Vec<f64> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Rotate { angle } => Some(*angle),
                _ => None,
            })
            .collect()
    }

    /// True when every `save` has a matching `restore`
    pub fn is_balanced(&self) -> bool {
        let mut depth = 0i64;
        for command in &self.commands {
            match command {
                DrawCommand::Save => depth += 1,
                DrawCommand::Restore => depth -= 1,
                _ => {}
            }
            if depth < 0 {
                return false;
            }
        }
        depth == 0
    }

    fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

impl Context2d for RecordingContext {
    fn save(&mut self) {
        self.fonts.push(self.font.clone());
        self.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        if let Some(font) = self.fonts.pop() {
            self.font = font;
        }
        self.push(DrawCommand::Restore);
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.push(DrawCommand::StrokeStyle {
            color: color.to_string(),
        });
    }

    fn set_fill_style(&mut self, style: FillStyle) {
        self.push(DrawCommand::FillStyle { style });
    }

    fn set_line_width(&mut self, width: f64) {
        self.push(DrawCommand::LineWidth { width });
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.push(DrawCommand::LineJoin { join });
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.push(DrawCommand::LineCap { cap });
    }

    fn set_line_dash(&mut self, dash: &[f64]) {
        self.push(DrawCommand::LineDash { dash: dash.to_vec() });
    }

    fn set_line_dash_offset(&mut self, offset: f64) {
        self.push(DrawCommand::LineDashOffset { offset });
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.push(DrawCommand::GlobalAlpha { alpha });
    }

    fn set_font(&mut self, font: &str) {
        self.font = font.to_string();
        self.push(DrawCommand::Font {
            font: font.to_string(),
        });
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.push(DrawCommand::TextAlign { align });
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.push(DrawCommand::TextBaseline { baseline });
    }

    fn begin_path(&mut self) {
        self.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.push(DrawCommand::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.push(DrawCommand::LineTo { x, y });
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64, anticlockwise: bool) {
        self.push(DrawCommand::Arc {
            x,
            y,
            radius,
            start,
            end,
            anticlockwise,
        });
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.push(DrawCommand::Rect {
            x,
            y,
            width,
            height,
        });
    }

    fn close_path(&mut self) {
        self.push(DrawCommand::ClosePath);
    }

    fn stroke(&mut self) {
        self.push(DrawCommand::Stroke);
    }

    fn fill(&mut self) {
        self.push(DrawCommand::Fill);
    }

    fn clip(&mut self) {
        self.push(DrawCommand::Clip);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.push(DrawCommand::Translate { dx, dy });
    }

    fn rotate(&mut self, angle: f64) {
        self.push(DrawCommand::Rotate { angle });
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.push(DrawCommand::FillText {
            text: text.to_string(),
            x,
            y,
        });
    }

    /// Width is approximated from the current font size
    fn measure_text(&self, text: &str) -> TextMetrics {
        let size = font_size_px(&self.font).unwrap_or(FALLBACK_FONT_SIZE_PX);
        TextMetrics {
            width: text.chars().count() as f64 * size * APPROX_CHAR_WIDTH,
            ascent: size * 0.8,
            descent: size * 0.2,
        }
    }

    fn create_pattern(&mut self, source: PatternSource, repetition: TextureRepetition) -> Pattern {
        let id = self.next_pattern;
        self.next_pattern += 1;
        self.push(DrawCommand::CreatePattern { id });
        Pattern {
            id,
            source,
            repetition,
        }
    }
}
