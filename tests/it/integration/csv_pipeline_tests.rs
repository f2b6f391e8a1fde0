//! Integration tests: load a CSV file and drive glyphs end to end.

use crate::helpers::{run_pipeline, view};
use plotcore::data::{Column, ColumnDataSource, DataSource};
use plotcore::glyphs::{Geometry, Scatter, Text};
use plotcore::render::{DrawCommand, RecordingContext};
use plotcore::spatial_index::Rect;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_csv_columns_keep_their_types() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "points.csv",
        "x,y,label,size\n1,1,a,6\n2,2,b,\n3,3,c,10\n",
    );

    let data = ColumnDataSource::from_csv(&path).unwrap();
    assert_eq!(data.get_length(), Some(3));
    assert_eq!(data.get_column("x"), Some(&Column::Numbers(vec![1.0, 2.0, 3.0])));
    assert_eq!(
        data.get_column("label"),
        Some(&Column::Strings(vec!["a".into(), "b".into(), "c".into()]))
    );
    let Some(Column::Numbers(size)) = data.get_column("size") else {
        panic!("size should be numeric");
    };
    assert!(size[1].is_nan());
}

#[test]
fn test_tsv_by_extension() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "points.tsv", "x\ty\n1\t2\n");
    let data = ColumnDataSource::from_csv(&path).unwrap();
    assert_eq!(data.get_column("y"), Some(&Column::Numbers(vec![2.0])));
}

#[test]
fn test_missing_csv_is_an_error() {
    let dir = TempDir::new().unwrap();
    assert!(ColumnDataSource::from_csv(&dir.path().join("absent.csv")).is_err());
}

#[test]
fn test_scatter_from_csv_renders_and_selects() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "points.csv",
        "x,y,size,color\n1,1,6,red\n2,2,8,lime\n3,3,10,blue\n9,9,4,red\n",
    );
    let data = ColumnDataSource::from_csv(&path).unwrap();

    let mut scatter = view(Scatter::new());
    scatter.update_property("size", &json!({"field": "size"})).unwrap();
    scatter.update_property("fill_color", &json!({"field": "color"})).unwrap();
    scatter.update_property("marker", &json!("square")).unwrap();
    run_pipeline(&mut scatter, &data);
    assert_eq!(scatter.data().screen("ssize"), &[6.0, 8.0, 10.0, 4.0]);

    // Viewport over the first three points only
    let visible = scatter
        .mask_data(Rect::from_corners((0.0, 0.0), (50.0, 50.0)))
        .unwrap();
    assert_eq!(visible, vec![0, 1, 2]);

    let mut ctx = RecordingContext::new();
    scatter.render(&mut ctx, &visible).unwrap();
    assert_eq!(ctx.count(|c| matches!(c, DrawCommand::Fill)), 3);
    assert_eq!(ctx.count(|c| matches!(c, DrawCommand::Stroke)), 3);
    assert!(ctx.commands().contains(&DrawCommand::FillStyle {
        style: plotcore::render::FillStyle::Color("rgba(0, 255, 0, 1)".into())
    }));
    assert!(ctx.is_balanced());

    let selection = scatter
        .hit_test(&Geometry::Rect {
            sx0: 15.0,
            sx1: 100.0,
            sy0: 15.0,
            sy1: 100.0,
        })
        .unwrap();
    assert_eq!(selection.indices, vec![1, 2, 3]);
}

#[test]
fn test_text_labels_from_csv() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "labels.csv", "x,y,text\n1,1,first\n2,2,second\n");
    let data = ColumnDataSource::from_csv(&path).unwrap();

    let mut labels = view(Text::new());
    run_pipeline(&mut labels, &data);

    let mut ctx = RecordingContext::new();
    labels.render_all(&mut ctx).unwrap();
    let texts: Vec<&str> = ctx
        .commands()
        .iter()
        .filter_map(|c| match c {
            DrawCommand::FillText { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(texts, vec!["first", "second"]);
}
