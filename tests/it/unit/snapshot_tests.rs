//! Snapshot tests using the insta crate.
//!
//! Draw command streams and hit-test geometries are serialized and compared
//! against inline snapshots. To update them after intentional changes:
//! ```sh
//! cargo insta test --accept
//! ```

use crate::helpers::{x_scale, y_scale};
use plotcore::annotations::{Annotation, BoxAnnotation};
use plotcore::glyphs::{Geometry, Selection};
use plotcore::render::RecordingContext;
use plotcore::spatial_index::Rect;
use plotcore::types::Dimension;

#[test]
fn snapshot_box_annotation_commands() {
    let shade = BoxAnnotation::new();
    let frame = Rect::from_corners((0.0, 0.0), (200.0, 100.0));
    let mut ctx = RecordingContext::new();
    shade.render(&mut ctx, &frame, &*x_scale(), &*y_scale()).unwrap();

    insta::assert_json_snapshot!(ctx.commands(), @r#"
    [
      {
        "op": "save"
      },
      {
        "op": "begin_path"
      },
      {
        "op": "rect",
        "x": 0.0,
        "y": 0.0,
        "width": 200.0,
        "height": 100.0
      },
      {
        "op": "fill_style",
        "style": {
          "color": "rgba(255, 249, 186, 0.4)"
        }
      },
      {
        "op": "fill"
      },
      {
        "op": "stroke_style",
        "color": "rgba(204, 204, 204, 0.3)"
      },
      {
        "op": "line_width",
        "width": 1.0
      },
      {
        "op": "line_join",
        "join": "bevel"
      },
      {
        "op": "line_cap",
        "cap": "butt"
      },
      {
        "op": "line_dash",
        "dash": []
      },
      {
        "op": "line_dash_offset",
        "offset": 0.0
      },
      {
        "op": "stroke"
      },
      {
        "op": "restore"
      }
    ]
    "#);
}

#[test]
fn snapshot_geometries() {
    let geometries = vec![
        Geometry::Point { sx: 1.5, sy: 2.5 },
        Geometry::Span {
            dimension: Dimension::Height,
            at: 3.5,
        },
        Geometry::Poly {
            sx: vec![0.5, 1.5],
            sy: vec![2.5, 3.5],
        },
    ];
    insta::assert_json_snapshot!(geometries, @r#"
    [
      {
        "type": "point",
        "sx": 1.5,
        "sy": 2.5
      },
      {
        "type": "span",
        "dimension": "height",
        "at": 3.5
      },
      {
        "type": "poly",
        "sx": [
          0.5,
          1.5
        ],
        "sy": [
          2.5,
          3.5
        ]
      }
    ]
    "#);
}

#[test]
fn snapshot_selection() {
    let selection = Selection {
        indices: vec![0, 4, 7],
    };
    insta::assert_json_snapshot!(selection, @r#"
    {
      "indices": [
        0,
        4,
        7
      ]
    }
    "#);
}
