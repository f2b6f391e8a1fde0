//! Integration tests: views sharing resolved arrays and following a
//! streaming data source.

use crate::helpers::{run_pipeline, source, view};
use plotcore::data::{Column, SourceChange};
use plotcore::glyphs::{Geometry, PipelineState, Scatter};
use plotcore::render::{DrawCommand, FillStyle, RecordingContext};
use serde_json::json;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

#[test]
fn test_matching_specs_share_raw_arrays() {
    let data = source(&[("x", &[1.0, 2.0, 3.0]), ("y", &[3.0, 2.0, 1.0]), ("s", &[4.0, 6.0, 8.0])]);
    let mut base = view(Scatter::new());
    run_pipeline(&mut base, &data);

    let mut hover = view(Scatter::new());
    hover.update_property("size", &json!({"field": "s"})).unwrap();
    hover.update_property("fill_color", &json!("orange")).unwrap();
    hover.set_base(&base);
    run_pipeline(&mut hover, &data);

    assert!(hover.data().shares_raw(base.data(), "x"));
    assert!(hover.data().shares_raw(base.data(), "y"));
    // Different spec, resolved separately
    assert!(!hover.data().shares_raw(base.data(), "size"));
    assert_eq!(hover.data().numbers("size"), &[4.0, 6.0, 8.0]);
    assert_eq!(base.data().numbers("size"), &[4.0, 4.0, 4.0]);

    hover.clear_base();
    run_pipeline(&mut hover, &data);
    assert!(!hover.data().shares_raw(base.data(), "x"));
    assert_eq!(hover.data().numbers("x"), base.data().numbers("x"));
}

#[test]
fn test_aliased_view_follows_base_after_patch() {
    let mut data = source(&[("x", &[1.0, 2.0, 3.0]), ("y", &[1.0, 2.0, 3.0])]);
    let mut base = view(Scatter::new());
    let mut hover = view(Scatter::new());
    hover.set_base(&base);
    run_pipeline(&mut base, &data);
    run_pipeline(&mut hover, &data);
    assert!(hover.data().shares_raw(base.data(), "x"));

    data.patch("x", &[(0, json!(9.0))]).unwrap();
    run_pipeline(&mut base, &data);
    run_pipeline(&mut hover, &data);
    assert_eq!(base.data().numbers("x"), &[9.0, 2.0, 3.0]);
    assert_eq!(hover.data().numbers("x"), &[9.0, 2.0, 3.0]);
    assert!(hover.data().shares_raw(base.data(), "x"));
}

#[test]
fn test_aliased_view_picks_up_base_on_remap() {
    let mut data = source(&[("x", &[1.0, 2.0, 3.0]), ("y", &[1.0, 2.0, 3.0])]);
    let mut base = view(Scatter::new());
    run_pipeline(&mut base, &data);
    let mut hover = view(Scatter::new());
    hover.set_base(&base);
    run_pipeline(&mut hover, &data);

    data.patch("x", &[(0, json!(9.0))]).unwrap();
    run_pipeline(&mut base, &data);
    // Only the projection runs again on the aliased view
    hover.map_data().unwrap();
    assert_eq!(hover.data().numbers("x"), &[9.0, 2.0, 3.0]);
    assert_eq!(hover.data().screen("sx"), &[90.0, 20.0, 30.0]);
    assert_eq!(hover.bounds().unwrap().map(|b| b.x1), Some(9.0));

    let hit = hover
        .hit_test(&Geometry::Point { sx: 90.0, sy: 10.0 })
        .unwrap();
    assert_eq!(hit.indices, vec![0]);
}

#[test]
fn test_visuals_resolve_per_view() {
    let data = source(&[("x", &[1.0]), ("y", &[1.0])]);
    let mut base = view(Scatter::new());
    run_pipeline(&mut base, &data);
    let mut hover = view(Scatter::new());
    hover.update_property("fill_color", &json!("orange")).unwrap();
    hover.set_base(&base);
    run_pipeline(&mut hover, &data);
    assert!(hover.data().shares_raw(base.data(), "x"));

    let orange = DrawCommand::FillStyle {
        style: FillStyle::Color("rgba(255, 165, 0, 1)".into()),
    };
    let mut base_ctx = RecordingContext::new();
    base.render_all(&mut base_ctx).unwrap();
    let mut hover_ctx = RecordingContext::new();
    hover.render_all(&mut hover_ctx).unwrap();
    assert!(hover_ctx.commands().contains(&orange));
    assert!(!base_ctx.commands().contains(&orange));
}

#[test]
fn test_subset_view_does_not_alias() {
    let data = source(&[("x", &[1.0, 2.0, 3.0]), ("y", &[1.0, 2.0, 3.0])]);
    let mut base = view(Scatter::new());
    run_pipeline(&mut base, &data);

    let mut selected = view(Scatter::new());
    selected.set_base(&base);
    selected.set_data(&data, Some(&[1])).unwrap();
    assert!(!selected.data().shares_raw(base.data(), "x"));
    assert_eq!(selected.data().numbers("x"), &[2.0]);
}

#[test]
fn test_views_follow_streamed_rows() {
    let mut data = source(&[("x", &[1.0, 2.0]), ("y", &[1.0, 2.0])]);
    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = changes.clone();
    data.change_mut()
        .connect(move |change: &SourceChange| sink.borrow_mut().push(change.clone()));

    let mut base = view(Scatter::new());
    run_pipeline(&mut base, &data);
    assert_eq!(base.data_size(), 2);

    let rows = BTreeMap::from([
        ("x".to_string(), Column::Numbers(vec![3.0, 4.0])),
        ("y".to_string(), Column::Numbers(vec![3.0, 4.0])),
    ]);
    data.stream(rows, Some(3)).unwrap();
    assert_eq!(changes.borrow().len(), 1);

    // Listeners re-run the pipeline on change
    run_pipeline(&mut base, &data);
    assert_eq!(base.data_size(), 3);
    assert_eq!(base.data().screen("sx"), &[20.0, 30.0, 40.0]);

    let mut overlay = view(Scatter::new());
    overlay.set_base(&base);
    run_pipeline(&mut overlay, &data);
    assert!(overlay.data().shares_raw(base.data(), "x"));
    assert_eq!(overlay.state(), PipelineState::Mapped);

    let hit = overlay
        .hit_test(&Geometry::Point { sx: 40.0, sy: 40.0 })
        .unwrap();
    assert_eq!(hit.indices, vec![2]);

    let mut ctx = RecordingContext::new();
    overlay.render_all(&mut ctx).unwrap();
    assert!(ctx.is_balanced());
}
