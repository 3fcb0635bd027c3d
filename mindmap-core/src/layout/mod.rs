// Radial layout for mindmap trees.
//
// Goals:
// - Pure: same tree + canvas size => same positioned list
// - Root at the canvas center, children on rings around their parent
// - Collapsed nodes keep their own position but their subtree is not laid out
// - Pre-order output: later entries draw (and hit-test) on top
//
// Submodules:
// - radial_placement: the placement walk
// - spatial_grid: bucketed disc lookup for hit testing
//
// Output:
// - Vec<PositionedNode> with logical (pre-transform) coordinates.

use serde::{Deserialize, Serialize};

use crate::model::{NodeRecord, NodeSize};

mod radial_placement;
pub mod spatial_grid;

pub use radial_placement::{angular_span, layout_radial};

#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointF {
    pub x: f64,
    pub y: f64,
}

impl PointF {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: PointF) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RectF {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl RectF {
    pub fn right(&self) -> f64 { self.x + self.w }
    pub fn bottom(&self) -> f64 { self.y + self.h }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Distance added per ring, independent of node size.
    pub ring_spacing: f64,
    /// Below the root, a level-n fan spans PI / (1 + n * span_narrowing).
    pub span_narrowing: f64,
    pub small_radius: f64,
    pub medium_radius: f64,
    pub large_radius: f64,
    /// Deepest level the layout walks before giving up.
    pub max_depth: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            ring_spacing: 200.0,
            span_narrowing: 0.5,
            small_radius: 50.0,
            medium_radius: 80.0,
            large_radius: 120.0,
            max_depth: 256,
        }
    }
}

impl LayoutConfig {
    pub fn radius_for(&self, size: NodeSize) -> f64 {
        match size {
            NodeSize::Small => self.small_radius,
            NodeSize::Medium => self.medium_radius,
            NodeSize::Large => self.large_radius,
        }
    }
}

/// A laid-out node: the record plus its logical center, disc radius and
/// visibility.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedNode {
    #[serde(flatten)]
    pub record: NodeRecord,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    /// False when any ancestor is collapsed.
    pub visible: bool,
}

impl PositionedNode {
    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn center(&self) -> PointF {
        PointF { x: self.x, y: self.y }
    }

    /// Nodes without usable geometry are skipped by rendering and hit tests.
    pub fn has_geometry(&self) -> bool {
        self.center().is_finite() && self.radius.is_finite()
    }

    pub fn contains(&self, point: PointF) -> bool {
        self.center().distance(point) <= self.radius
    }

    pub fn bounds(&self) -> RectF {
        RectF {
            x: self.x - self.radius,
            y: self.y - self.radius,
            w: self.radius * 2.0,
            h: self.radius * 2.0,
        }
    }
}
