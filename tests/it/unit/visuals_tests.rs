//! Unit tests for line, fill, hatch and text visual groups.

use crate::helpers::{run_pipeline, view, xy_source};
use image::RgbaImage;
use plotcore::data::{Column, ColumnDataSource};
use plotcore::glyphs::{Glyph, Scatter};
use plotcore::render::{DrawCommand, FillStyle, PatternSource, RecordingContext};
use plotcore::types::{FontStyle, LineDash, TextAlign};
use plotcore::util::Color;
use plotcore::visuals::{
    AttrSet, ContextProperties, FILL, FillDefaults, FillScalar, FillVector, HatchScalar,
    HatchVector, LINE, LineDefaults, LineScalar, LineVector, ScalarVisuals, TEXT, TextDefaults,
    TextScalar, TextVector, VectorVisuals,
};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

// ============================================================================
// doit
// ============================================================================

#[test]
fn test_fill_disabled_by_null_color_or_zero_alpha() {
    let mut fill = FillVector::with_defaults("Test");
    assert!(fill.doit());
    fill.fill_color.set_value(None).unwrap();
    assert!(!fill.doit());

    let mut fill = FillVector::with_defaults("Test");
    fill.fill_alpha.set_value(0.0).unwrap();
    assert!(!fill.doit());

    // A field-driven color may still be visible
    let mut fill = FillVector::with_defaults("Test");
    fill.fill_color.set_field("c").unwrap();
    assert!(fill.doit());
}

#[test]
fn test_hatch_needs_a_pattern() {
    let mut hatch = HatchVector::with_defaults("Test");
    assert!(!hatch.doit());
    hatch.hatch_pattern.set_value(Some("/".into())).unwrap();
    assert!(hatch.doit());
    hatch.hatch_pattern.set_value(Some(" ".into())).unwrap();
    assert!(!hatch.doit());
}

#[test]
fn test_text_scalar_needs_a_color() {
    let mut text = TextScalar::with_defaults("Test");
    assert!(text.doit());
    text.text_color.set_value(None).unwrap();
    assert!(!text.doit());
}

// ============================================================================
// Scalar application
// ============================================================================

#[test]
fn test_line_scalar_applies_every_attribute() {
    let mut line = LineScalar::with_defaults("Test");
    line.line_width.set_value(3.0).unwrap();
    line.line_dash.set_value(LineDash(vec![4.0, 2.0])).unwrap();

    let mut ctx = RecordingContext::new();
    line.set_value(&mut ctx).unwrap();
    let commands = ctx.commands();
    assert!(commands.contains(&DrawCommand::StrokeStyle {
        color: "rgba(0, 0, 0, 1)".into()
    }));
    assert!(commands.contains(&DrawCommand::LineWidth { width: 3.0 }));
    assert!(commands.contains(&DrawCommand::LineDash {
        dash: vec![4.0, 2.0]
    }));
}

#[test]
fn test_fill_scalar_combines_color_alpha() {
    let mut fill = FillScalar::with_defaults("Test");
    fill.fill_color.set_value(Some(Color::css("red"))).unwrap();
    fill.fill_alpha.set_value(0.5).unwrap();

    let mut ctx = RecordingContext::new();
    fill.set_value(&mut ctx).unwrap();
    assert_eq!(
        ctx.commands(),
        &[DrawCommand::FillStyle {
            style: FillStyle::Color("rgba(255, 0, 0, 0.5)".into())
        }]
    );
}

#[test]
fn test_text_scalar_font_shorthand() {
    let defaults = TextDefaults {
        font: "times".into(),
        ..Default::default()
    };
    let mut text = TextScalar::new("Test", &AttrSet::new(TEXT), defaults);
    text.text_font_style.set_value(FontStyle::Bold).unwrap();
    text.text_font_size.set_value("12px".into()).unwrap();
    text.text_align.set_value(TextAlign::Center).unwrap();
    assert_eq!(text.font().unwrap(), "bold 12px times");

    let mut ctx = RecordingContext::new();
    text.set_value(&mut ctx).unwrap();
    assert!(ctx.commands().contains(&DrawCommand::Font {
        font: "bold 12px times".into()
    }));
    assert!(ctx.commands().contains(&DrawCommand::TextAlign {
        align: TextAlign::Center
    }));
}

#[test]
fn test_prefixed_group_names() {
    let border = LineScalar::new("Label", &AttrSet::new(LINE).prefixed("border_"), LineDefaults::default());
    assert_eq!(border.prefix(), "border_");
    assert!(border.property("border_line_color").is_some());
    assert!(border.property("line_color").is_none());

    let background = FillScalar::new(
        "Label",
        &AttrSet::new(FILL).prefixed("background_"),
        FillDefaults::default(),
    );
    let names: Vec<&str> = background.properties().iter().map(|p| p.attr()).collect();
    assert_eq!(names, vec!["background_fill_color", "background_fill_alpha"]);
}

#[test]
fn test_owner_defaults_override_group_defaults() {
    let line = LineDefaults {
        color: Some(Color::css("#cccccc")),
        alpha: 0.3,
        ..Default::default()
    };
    let line = LineScalar::new("BoxAnnotation", &AttrSet::new(LINE), line);
    assert_eq!(line.line_alpha.value().unwrap(), &0.3);
    assert_eq!(line.line_width.value().unwrap(), &1.0);
    assert_eq!(line.line_color.spec_json(), json!({"value": "#cccccc"}));

    let fill = FillScalar::new("Label", &AttrSet::new(FILL), FillDefaults { color: None, alpha: 1.0 });
    assert!(!fill.doit());
    assert_eq!(FillVector::with_defaults("Test").fill_color.spec_json(), json!({"value": "gray"}));
}

// ============================================================================
// Vectorized application
// ============================================================================

#[test]
fn test_vector_groups_select_rows() {
    let source = ColumnDataSource::from_json_str(
        r#"{"c": ["red", "lime", "blue"], "w": [1, 2, 3]}"#,
    )
    .unwrap();
    let mut line = LineVector::with_defaults("Test");
    line.line_color.set_field("c").unwrap();
    line.line_width.set_field("w").unwrap();
    line.set_visuals(&source, &[2, 0]).unwrap();

    let mut ctx = RecordingContext::new();
    line.set_vectorize(&mut ctx, 0).unwrap();
    assert!(ctx.commands().contains(&DrawCommand::StrokeStyle {
        color: "rgba(0, 0, 255, 1)".into()
    }));
    assert!(ctx.commands().contains(&DrawCommand::LineWidth { width: 3.0 }));

    line.invalidate();
    assert!(line.set_vectorize(&mut ctx, 0).is_err());
}

#[test]
fn test_doit_at_tracks_per_row_alpha() {
    let mut source = ColumnDataSource::new();
    source.insert("a", Column::Numbers(vec![1.0, 0.0])).unwrap();
    let mut fill = FillVector::with_defaults("Test");
    fill.fill_alpha.set_field("a").unwrap();
    fill.set_visuals(&source, &[0, 1]).unwrap();
    assert!(fill.doit_at(0));
    assert!(!fill.doit_at(1));
}

#[test]
fn test_text_vector_line_height() {
    let mut text = TextVector::with_defaults("Test");
    text.text_line_height.set_value(1.5).unwrap();
    text.set_visuals(&ColumnDataSource::new(), &[0]).unwrap();
    assert_eq!(text.line_height_at(0), 1.5);
}

#[test]
fn test_builtin_hatch_pattern() {
    let mut hatch = HatchScalar::with_defaults("Test");
    hatch.hatch_pattern.set_value(Some("/".into())).unwrap();

    let mut ctx = RecordingContext::new();
    let mut painted = false;
    hatch
        .doit2(
            &mut ctx,
            |_| {
                painted = true;
                Ok(())
            },
            || panic!("built-in patterns never defer"),
        )
        .unwrap();
    assert!(painted);
    assert!(ctx.commands().iter().any(|c| matches!(
        c,
        DrawCommand::FillStyle {
            style: FillStyle::Pattern(p)
        } if matches!(&p.source, PatternSource::Hatch { .. })
    )));
}

// ============================================================================
// Hatch textures: defer, then request a render
// ============================================================================

#[test]
fn test_pending_texture_defers_then_requests_render() {
    let mut scatter = view(Scatter::new());
    let requests = Arc::new(AtomicUsize::new(0));
    let counter = requests.clone();
    scatter.set_render_request(Arc::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    }));
    scatter
        .update_property(
            "hatch_extra",
            &json!({"custom": {"type": "ImageURLTexture", "url": "https://example.com/tile.png"}}),
        )
        .unwrap();
    scatter.update_property("hatch_pattern", &json!("custom")).unwrap();
    run_pipeline(&mut scatter, &xy_source());

    let mut ctx = RecordingContext::new();
    scatter.render_all(&mut ctx).unwrap();
    // Only the solid fills ran; no pattern exists yet
    assert_eq!(ctx.count(|c| matches!(c, DrawCommand::Fill)), 3);
    assert_eq!(ctx.count(|c| matches!(c, DrawCommand::CreatePattern { .. })), 0);
    assert_eq!(requests.load(Ordering::SeqCst), 0);

    let texture = scatter
        .glyph()
        .visuals()
        .hatch("hatch")
        .and_then(|h| h.texture("custom"))
        .unwrap();
    assert!(texture.is_pending());
    texture.finish_with_image(RgbaImage::new(2, 2));
    assert_eq!(requests.load(Ordering::SeqCst), 1);

    let mut ctx = RecordingContext::new();
    scatter.render_all(&mut ctx).unwrap();
    assert_eq!(ctx.count(|c| matches!(c, DrawCommand::Fill)), 6);
    // One pattern, shared by every row
    assert_eq!(ctx.count(|c| matches!(c, DrawCommand::CreatePattern { .. })), 1);
}
