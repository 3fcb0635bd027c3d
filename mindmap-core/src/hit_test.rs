//! Resolving screen points back to laid-out nodes.
//!
//! Later entries of a positioned list are drawn on top of earlier ones, so
//! every query here prefers the highest index among the discs that contain
//! the point.

use crate::layout::spatial_grid::SpatialGrid;
use crate::layout::{PointF, PositionedNode, RectF};
use crate::view::ViewTransform;

/// Visible nodes, in input order.
pub fn visible_nodes(nodes: &[PositionedNode]) -> Vec<&PositionedNode> {
    nodes.iter().filter(|n| n.visible).collect()
}

/// Topmost visible node whose disc contains the screen point.
pub fn find_node_at<'a>(
    nodes: &'a [PositionedNode],
    screen_x: f64,
    screen_y: f64,
    transform: &ViewTransform,
) -> Option<&'a PositionedNode> {
    let point = transform.to_logical(PointF::new(screen_x, screen_y));
    visible_nodes(nodes)
        .into_iter()
        .rev()
        .find(|n| n.has_geometry() && n.contains(point))
}

/// Grid-backed variant of [`find_node_at`] for repeated queries against
/// one positioned snapshot. Answers exactly like the linear scan.
#[derive(Debug, Clone)]
pub struct HitIndex {
    grid: SpatialGrid,
    len: usize,
}

impl HitIndex {
    pub fn build(nodes: &[PositionedNode]) -> Self {
        let cell_size = nodes
            .iter()
            .filter(|n| n.visible && n.has_geometry())
            .map(|n| n.radius * 2.0)
            .fold(0.0_f64, f64::max);
        let mut grid = SpatialGrid::new(cell_size);
        for (slot, node) in nodes.iter().enumerate() {
            if node.visible && node.has_geometry() {
                grid.insert(slot, &padded(node.bounds()));
            }
        }
        Self { grid, len: nodes.len() }
    }

    /// `nodes` must be the slice the index was built from.
    pub fn find<'a>(
        &self,
        nodes: &'a [PositionedNode],
        screen_x: f64,
        screen_y: f64,
        transform: &ViewTransform,
    ) -> Option<&'a PositionedNode> {
        debug_assert_eq!(nodes.len(), self.len, "hit index used with another snapshot");
        let point = transform.to_logical(PointF::new(screen_x, screen_y));
        self.grid
            .query_point(point)
            .into_iter()
            .filter_map(|slot| nodes.get(slot))
            .find(|n| n.contains(point))
    }
}

// Rounding in bounds() must not push an on-edge point out of the indexed cells.
fn padded(rect: RectF) -> RectF {
    RectF { x: rect.x - 1.0, y: rect.y - 1.0, w: rect.w + 2.0, h: rect.h + 2.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeRecord;

    fn disc(id: &str, x: f64, y: f64, radius: f64, visible: bool) -> PositionedNode {
        PositionedNode {
            record: NodeRecord::new(id, None, 0),
            x,
            y,
            radius,
            visible,
        }
    }

    fn both<'a>(
        nodes: &'a [PositionedNode],
        x: f64,
        y: f64,
        t: &ViewTransform,
    ) -> Option<&'a str> {
        let linear = find_node_at(nodes, x, y, t).map(|n| n.id());
        let indexed = HitIndex::build(nodes).find(nodes, x, y, t).map(|n| n.id());
        assert_eq!(linear, indexed, "index disagrees with scan at ({x}, {y})");
        linear
    }

    #[test]
    fn test_later_disc_wins_overlap() {
        let nodes = vec![disc("under", 100.0, 100.0, 80.0, true), disc("over", 110.0, 100.0, 50.0, true)];
        let t = ViewTransform::identity();
        assert_eq!(both(&nodes, 105.0, 100.0, &t), Some("over"));
        // Only the bigger disc reaches this far left.
        assert_eq!(both(&nodes, 30.0, 100.0, &t), Some("under"));
        assert_eq!(both(&nodes, 300.0, 300.0, &t), None);
    }

    #[test]
    fn test_invisible_nodes_are_ignored() {
        let nodes = vec![disc("shown", 0.0, 0.0, 80.0, true), disc("hidden", 0.0, 0.0, 80.0, false)];
        assert_eq!(both(&nodes, 0.0, 0.0, &ViewTransform::identity()), Some("shown"));
        assert_eq!(visible_nodes(&nodes).len(), 1);
    }

    #[test]
    fn test_query_goes_through_transform() {
        let nodes = vec![disc("n", 100.0, 100.0, 50.0, true)];
        let t = ViewTransform { x: 50.0, y: -20.0, scale: 2.0 };
        // Logical (100, 100) is screen (250, 180).
        assert_eq!(both(&nodes, 250.0, 180.0, &t), Some("n"));
        // Logical (100, 149) still inside; (100, 151) outside.
        assert_eq!(both(&nodes, 250.0, 278.0, &t), Some("n"));
        assert_eq!(both(&nodes, 250.0, 282.0, &t), None);
    }

    #[test]
    fn test_missing_geometry_is_skipped() {
        let nodes = vec![disc("ok", 0.0, 0.0, 50.0, true), disc("nan", f64::NAN, 0.0, 50.0, true)];
        assert_eq!(both(&nodes, 0.0, 0.0, &ViewTransform::identity()), Some("ok"));
    }

    #[test]
    fn test_empty_snapshot() {
        assert_eq!(both(&[], 0.0, 0.0, &ViewTransform::identity()), None);
    }
}
