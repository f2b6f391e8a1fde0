//! Spatial Index Module
//!
//! R-tree over the raw-space bounding boxes of a glyph's rows, used for
//! viewport masking and hit testing without a linear scan.

use rstar::{AABB, RTree, RTreeObject};
use serde::{Deserialize, Serialize};

/// Axis-aligned box in raw (data) space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    /// Box spanning two corners in any order
    pub fn from_corners(a: (f64, f64), b: (f64, f64)) -> Self {
        Self {
            x0: a.0.min(b.0),
            y0: a.1.min(b.1),
            x1: a.0.max(b.0),
            y1: a.1.max(b.1),
        }
    }

    pub fn point(x: f64, y: f64) -> Self {
        Self::from_corners((x, y), (x, y))
    }

    /// NaN or infinite corners cannot be indexed
    pub fn is_finite(&self) -> bool {
        [self.x0, self.y0, self.x1, self.y1].iter().all(|v| v.is_finite())
    }

    #[inline]
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

/// One indexed row
#[derive(Debug, Clone, Copy)]
pub struct SpatialEntry {
    pub index: usize,
    pub rect: Rect,
}

impl RTreeObject for SpatialEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.rect.x0, self.rect.y0], [self.rect.x1, self.rect.y1])
    }
}

impl PartialEq for SpatialEntry {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

/// Spatial index over row bounding boxes.
/// Provides O(log n) point queries and range queries for hit testing.
#[derive(Default)]
pub struct SpatialIndex {
    tree: RTree<SpatialEntry>,
    bounds: Option<Rect>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bulk-load an index; rows with non-finite boxes are left out.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (usize, Rect)>,
    {
        let entries: Vec<SpatialEntry> = entries
            .into_iter()
            .filter(|(_, rect)| rect.is_finite())
            .map(|(index, rect)| SpatialEntry { index, rect })
            .collect();

        let bounds = entries
            .iter()
            .map(|e| e.rect)
            .reduce(|acc, rect| acc.union(&rect));

        Self {
            tree: RTree::bulk_load(entries),
            bounds,
        }
    }

    /// Rows whose box contains the point, in ascending order
    pub fn query_point(&self, x: f64, y: f64) -> Vec<usize> {
        let point_envelope = AABB::from_point([x, y]);

        let mut hits: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&point_envelope)
            .filter(|entry| entry.rect.contains_point(x, y))
            .map(|entry| entry.index)
            .collect();
        hits.sort_unstable();
        hits
    }

    /// Rows whose box intersects the rectangle, in ascending order
    pub fn query_rect(&self, rect: Rect) -> Vec<usize> {
        let envelope = AABB::from_corners([rect.x0, rect.y0], [rect.x1, rect.y1]);

        let mut hits: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|entry| entry.index)
            .collect();
        hits.sort_unstable();
        hits.dedup();
        hits
    }

    /// Union of all indexed boxes; `None` when empty
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
