//! Unit tests for the glyph view pipeline: stage ordering, resolution,
//! projection and masking.

use crate::helpers::{WarnCounter, approx_eq, run_pipeline, source, view, xy_source, y_scale};
use plotcore::PlotError;
use plotcore::core::{AnyProperty, Resolved};
use plotcore::data::{Column, ColumnDataSource, FnTransform};
use plotcore::glyphs::{PipelineState, Scatter, Segment};
use plotcore::render::{DrawCommand, RecordingContext, with_saved};
use plotcore::scales::{CategoricalScale, LinearScale};
use plotcore::spatial_index::Rect;
use serde_json::json;
use std::rc::Rc;

// ============================================================================
// Stage ordering
// ============================================================================

#[test]
fn test_stages_must_run_in_order() {
    let mut view = view(Scatter::new());
    assert_eq!(view.state(), PipelineState::Uninitialized);

    let err = view.map_data().unwrap_err();
    assert!(matches!(
        err,
        PlotError::Precondition {
            operation: "map_data",
            ..
        }
    ));
    assert!(view.index_data().is_err());
    assert!(view.render_all(&mut RecordingContext::new()).is_err());

    view.set_data(&xy_source(), None).unwrap();
    assert_eq!(view.state(), PipelineState::DataBound);
    assert!(view.map_data().is_err());

    view.index_data().unwrap();
    assert_eq!(view.state(), PipelineState::Indexed);
    view.map_data().unwrap();
    assert_eq!(view.state(), PipelineState::Mapped);
}

#[test]
fn test_precondition_message_names_the_missing_stage() {
    let mut view = view(Scatter::new());
    let err = view.index_data().unwrap_err();
    assert_eq!(
        err.to_string(),
        "index_data requires set_data (view is uninitialized)"
    );
}

#[test]
fn test_set_scales_drops_back_to_indexed() {
    let mut view = view(Scatter::new());
    run_pipeline(&mut view, &xy_source());

    view.set_scales(
        Box::new(LinearScale::new((0.0, 10.0), (0.0, 200.0))),
        y_scale(),
    );
    assert_eq!(view.state(), PipelineState::Indexed);
    view.map_data().unwrap();
    assert_eq!(view.data().screen("sx"), &[20.0, 40.0, 60.0]);
}

#[test]
fn test_glyph_mut_requires_new_data() {
    let mut view = view(Scatter::new());
    run_pipeline(&mut view, &xy_source());
    view.glyph_mut().size.set_value(10.0).unwrap();
    assert_eq!(view.state(), PipelineState::Uninitialized);
    assert!(view.render_all(&mut RecordingContext::new()).is_err());
}

// ============================================================================
// set_data
// ============================================================================

#[test]
fn test_set_data_resolves_and_selects_rows() {
    let mut view = view(Scatter::new());
    view.set_data(&xy_source(), Some(&[2, 0])).unwrap();
    assert_eq!(view.data_size(), 2);
    assert_eq!(view.data().indices(), &[2, 0]);
    assert_eq!(view.data().numbers("x"), &[3.0, 1.0]);
    assert_eq!(view.data().numbers("size"), &[4.0, 4.0]);
}

#[test]
fn test_out_of_range_indices_are_rejected() {
    let mut view = view(Scatter::new());
    let err = view.set_data(&xy_source(), Some(&[0, 3])).unwrap_err();
    assert!(matches!(err, PlotError::Validation { ref attr, .. } if attr == "indices"));
    assert_eq!(view.state(), PipelineState::Uninitialized);
}

#[test]
fn test_transform_changing_length_is_an_error() {
    let mut scatter = Scatter::new();
    scatter.size.set_field("x").unwrap();
    scatter
        .size
        .set_transform(Some(Rc::new(FnTransform::new("drop_last", |c: &Column| {
            let mut values = c.to_numbers("size")?;
            values.pop();
            Ok(Column::Numbers(values))
        }))));
    let mut view = view(scatter);
    let err = view.set_data(&xy_source(), None).unwrap_err();
    assert!(matches!(err, PlotError::LengthMismatch { .. }));
}

#[test]
fn test_missing_field_warns_once_and_resolves_to_nan() {
    let counter = WarnCounter::new("nonexistent field");
    let mut view = view(Scatter::new());
    let data = source(&[("y", &[1.0, 2.0])]);

    counter.capture(|| view.set_data(&data, None)).unwrap();

    assert_eq!(counter.count(), 1);
    assert!(counter.messages()[0].contains("'x'"));
    let x = view.data().numbers("x");
    assert_eq!(x.len(), 2);
    assert!(x.iter().all(|v| v.is_nan()));
}

#[test]
fn test_missing_rows_are_skipped_when_rendering() {
    let mut view = view(Scatter::new());
    let data = source(&[("y", &[1.0, 2.0])]);
    run_pipeline(&mut view, &data);
    let mut ctx = RecordingContext::new();
    view.render_all(&mut ctx).unwrap();
    assert!(ctx.commands().is_empty());
}

#[test]
fn test_categorical_coordinates_use_synthetic_centers() {
    let data = ColumnDataSource::from_json_str(r#"{"x": ["a", "c"], "y": [1, 2]}"#).unwrap();
    let factors = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    let mut view = plotcore::glyphs::GlyphView::new(
        Scatter::new(),
        Box::new(CategoricalScale::new(factors, (0.0, 300.0))),
        y_scale(),
    );
    run_pipeline(&mut view, &data);
    assert_eq!(view.data().numbers("x"), &[0.5, 2.5]);
    assert_eq!(view.data().screen("sx"), &[50.0, 250.0]);
}

// ============================================================================
// map_data
// ============================================================================

#[test]
fn test_screen_names_are_prefixed() {
    let mut view = view(Segment::new());
    let data = source(&[
        ("x0", &[0.0]),
        ("y0", &[0.0]),
        ("x1", &[1.0]),
        ("y1", &[2.0]),
    ]);
    run_pipeline(&mut view, &data);
    assert_eq!(view.data().screen("sx1"), &[10.0]);
    assert_eq!(view.data().screen("sy1"), &[20.0]);
    assert!(view.data().screen("x1").is_empty());
}

#[test]
fn test_screen_unit_coordinates_bypass_the_scale() {
    let mut scatter = Scatter::new();
    scatter.x.set_units(plotcore::types::SpatialUnits::Screen);
    let mut view = view(scatter);
    run_pipeline(&mut view, &xy_source());
    assert_eq!(view.data().screen("sx"), &[1.0, 2.0, 3.0]);
    assert_eq!(view.data().screen("sy"), &[10.0, 20.0, 30.0]);
}

#[test]
fn test_angles_are_not_projected() {
    let mut scatter = Scatter::new();
    scatter.angle.set_json(&json!({"value": 90, "units": "deg"})).unwrap();
    let mut view = view(scatter);
    run_pipeline(&mut view, &xy_source());
    assert!(view.data().screen("sangle").is_empty());
    assert!(approx_eq(view.data().numbers("angle")[0], -std::f64::consts::FRAC_PI_2));
}

// ============================================================================
// Masking and rendering
// ============================================================================

#[test]
fn test_mask_data_selects_visible_rows() {
    let mut view = view(Scatter::new());
    run_pipeline(&mut view, &xy_source());

    // Screen 15..35 covers data 1.5..3.5
    let visible = view
        .mask_data(Rect::from_corners((15.0, 15.0), (35.0, 35.0)))
        .unwrap();
    assert_eq!(visible, vec![1, 2]);

    let bounds = view.bounds().unwrap().unwrap();
    assert_eq!((bounds.x0, bounds.x1), (1.0, 3.0));
}

#[test]
fn test_render_draws_only_requested_rows() {
    let mut view = view(Scatter::new());
    run_pipeline(&mut view, &xy_source());

    let mut ctx = RecordingContext::new();
    view.render(&mut ctx, &[1, 7]).unwrap();
    assert_eq!(
        ctx.commands().first(),
        Some(&DrawCommand::Save),
    );
    assert!(ctx.commands().contains(&DrawCommand::Translate { dx: 20.0, dy: 20.0 }));
    assert_eq!(ctx.count(|c| matches!(c, DrawCommand::Translate { .. })), 1);
    assert!(ctx.is_balanced());
}

#[test]
fn test_stage_timings_are_recorded() {
    let mut view = view(Scatter::new());
    run_pipeline(&mut view, &xy_source());
    view.render_all(&mut RecordingContext::new()).unwrap();

    for stage in ["set_data", "index_data", "map_data", "render"] {
        assert_eq!(view.stats().stage(stage).map(|s| s.count()), Some(1), "{stage}");
    }
}

// ============================================================================
// update_property
// ============================================================================

#[test]
fn test_update_property_invalidates_view() {
    let mut view = view(Scatter::new());
    run_pipeline(&mut view, &xy_source());

    view.update_property("fill_color", &json!("red")).unwrap();
    assert_eq!(view.state(), PipelineState::Uninitialized);
    assert_eq!(view.spec_json()["fill_color"], json!({"value": "red"}));

    view.update_property("size", &json!({"field": "x"})).unwrap();
    view.set_data(&xy_source(), None).unwrap();
    assert_eq!(view.data().raw("size"), Some(&Resolved::Numbers(vec![1.0, 2.0, 3.0])));
}

#[test]
fn test_update_unknown_attribute() {
    let mut view = view(Scatter::new());
    let err = view.update_property("wobble", &json!(1)).unwrap_err();
    assert_eq!(err.to_string(), "Scatter has no attribute wobble");
}

#[test]
fn test_value_only_attributes_refuse_fields() {
    let mut view = view(Scatter::new());
    run_pipeline(&mut view, &xy_source());

    for attr in ["line_join", "line_cap", "line_dash", "line_dash_offset", "hatch_extra"] {
        let err = view.update_property(attr, &json!({"field": "j"})).unwrap_err();
        assert!(matches!(err, PlotError::Validation { .. }), "{attr}");
    }
    assert_eq!(view.spec_json()["line_join"], json!({"value": "bevel"}));
    assert_eq!(view.state(), PipelineState::Mapped);

    let mut ctx = RecordingContext::new();
    view.render_all(&mut ctx).unwrap();
    assert!(ctx.is_balanced());
}

#[test]
fn test_failed_draw_restores_canvas_state() {
    let mut ctx = RecordingContext::new();
    let result: Result<(), PlotError> = with_saved(&mut ctx, |ctx| {
        ctx.translate(5.0, 5.0);
        Err(PlotError::InvalidState {
            attr: "line_width".into(),
        })
    });
    assert!(result.is_err());
    assert!(ctx.is_balanced());
    assert_eq!(ctx.commands().last(), Some(&DrawCommand::Restore));
}

#[test]
fn test_update_with_invalid_value_keeps_spec() {
    let mut view = view(Scatter::new());
    assert!(view.update_property("fill_alpha", &json!(3.0)).is_err());
    assert_eq!(view.spec_json()["fill_alpha"], json!({"value": 1.0}));
}
