// Radial placement ("orbital" mindmap layout)
//
// Each node fans its children over an arc centered on the angle it was
// placed at:
// 1. The root sits at the canvas center and fans over the full circle
// 2. Deeper fans narrow: PI / (1 + level * span_narrowing)
// 3. Children sit at evenly spaced angles strictly inside the fan
// 4. Every ring is `ring_spacing` farther out than the parent's ring
//
// The walk uses an explicit stack, so depth is bounded by
// `LayoutConfig::max_depth` rather than by the call stack.

use std::collections::HashMap;
use std::f64::consts::{PI, TAU};

use tracing::{debug, error};

use super::{LayoutConfig, PositionedNode};
use crate::error::{MindmapError, Result};
use crate::model::NodeRecord;
use crate::tree::{MindmapTree, TreeIndex};

/// A node waiting to be emitted, with the geometry its parent chose for it.
#[derive(Debug, Clone, Copy)]
struct Placement {
    index: TreeIndex,
    x: f64,
    y: f64,
    angle: f64,
    radius: f64,
    level: usize,
}

/// Angular width of the fan of children below a node at `level`.
pub fn angular_span(level: usize, cfg: &LayoutConfig) -> f64 {
    if level == 0 {
        TAU
    } else {
        PI / (1.0 + level as f64 * cfg.span_narrowing)
    }
}

/// Lay out a tree on a `width` x `height` canvas.
///
/// Output is pre-order. Children of collapsed nodes are never visited, so
/// they are absent from the result rather than hidden.
pub fn layout_radial(
    tree: Option<&MindmapTree>,
    width: f64,
    height: f64,
    cfg: &LayoutConfig,
) -> Result<Vec<PositionedNode>> {
    let Some(tree) = tree else {
        return Ok(Vec::new());
    };

    let mut placed: Vec<PositionedNode> = Vec::with_capacity(tree.len());
    // First emitted node per id; ancestry lookups go through this.
    let mut emitted: HashMap<&str, usize> = HashMap::with_capacity(tree.len());

    let mut stack = vec![Placement {
        index: tree.root,
        x: width / 2.0,
        y: height / 2.0,
        angle: 0.0,
        radius: 0.0,
        level: 0,
    }];

    while let Some(p) = stack.pop() {
        let node = tree.node(p.index);
        let record = &node.record;

        if p.level > cfg.max_depth {
            error!(id = %record.id, limit = cfg.max_depth, "layout depth limit exceeded");
            return Err(MindmapError::DepthLimitExceeded {
                id: record.id.clone(),
                limit: cfg.max_depth,
            });
        }

        let visible = !hidden_by_ancestor(record, &placed, &emitted);
        emitted.entry(record.id.as_str()).or_insert(placed.len());
        placed.push(PositionedNode {
            record: record.clone(),
            x: p.x,
            y: p.y,
            radius: cfg.radius_for(record.size),
            visible,
        });

        if record.is_collapsed || node.children.is_empty() {
            continue;
        }

        let span = angular_span(p.level, cfg);
        let start = p.angle - span / 2.0;
        let next_radius = p.radius + cfg.ring_spacing;
        let slots = (node.children.len() + 1) as f64;

        // Reverse push so the first child is popped (and emitted) first.
        for (i, &child) in node.children.iter().enumerate().rev() {
            let angle = start + span * (i + 1) as f64 / slots;
            stack.push(Placement {
                index: child,
                x: p.x + angle.cos() * next_radius,
                y: p.y + angle.sin() * next_radius,
                angle,
                radius: next_radius,
                level: p.level + 1,
            });
        }
    }

    debug!(nodes = placed.len(), width, height, "radial layout complete");
    Ok(placed)
}

/// True when the nearest emitted parent is collapsed or itself hidden.
///
/// The parent was emitted earlier (pre-order), so its `visible` flag already
/// folds in the rest of the chain.
fn hidden_by_ancestor(
    record: &NodeRecord,
    placed: &[PositionedNode],
    emitted: &HashMap<&str, usize>,
) -> bool {
    let Some(parent_id) = record.parent_id.as_deref() else {
        return false;
    };
    match emitted.get(parent_id) {
        Some(&slot) => {
            let parent = &placed[slot];
            parent.record.is_collapsed || !parent.visible
        }
        None => false,
    }
}
