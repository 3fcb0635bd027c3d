//! Pointer and wheel handling for the canvas view.
//!
//! [`CanvasView`] owns the positioned snapshot currently on screen plus the
//! transient UI state (pan/zoom, selection, hover, drag). Input handlers
//! return the [`ViewEvent`]s the host should react to.

use serde::Serialize;
use tracing::debug;

use crate::hit_test::HitIndex;
use crate::layout::{PointF, PositionedNode};
use crate::render::{RenderInput, Surface, Viewport, render_frame};
use crate::view::{ViewConfig, ViewTransform};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewEvent {
    NodeSelected { id: String },
    HoverChanged { id: Option<String>, tooltip: Option<String> },
    TransformChanged { transform: ViewTransform },
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct DragState {
    pointer_start: PointF,
    pan_start: PointF,
}

/// The node under the pointer and the tooltip last reported for it.
#[derive(Debug, Clone, PartialEq)]
struct Hover {
    id: String,
    tooltip: String,
}

#[derive(Debug, Clone)]
pub struct CanvasView {
    config: ViewConfig,
    nodes: Vec<PositionedNode>,
    hit_index: HitIndex,
    transform: ViewTransform,
    selected: Option<String>,
    hovered: Option<Hover>,
    pointer: Option<PointF>,
    drag: Option<DragState>,
}

impl Default for CanvasView {
    fn default() -> Self {
        Self::new(ViewConfig::default())
    }
}

impl CanvasView {
    pub fn new(config: ViewConfig) -> Self {
        Self {
            config,
            nodes: Vec::new(),
            hit_index: HitIndex::build(&[]),
            transform: ViewTransform::identity(),
            selected: None,
            hovered: None,
            pointer: None,
            drag: None,
        }
    }

    /// Replace the positioned snapshot. The hover is resolved again at the
    /// last pointer position, so a node that moved away or got a new summary
    /// is reported. The selection is kept so it survives collapse/expand.
    pub fn set_nodes(&mut self, nodes: Vec<PositionedNode>) -> Vec<ViewEvent> {
        self.hit_index = HitIndex::build(&nodes);
        self.nodes = nodes;
        debug!(nodes = self.nodes.len(), "view snapshot replaced");
        match self.pointer {
            Some(pointer) => self.update_hover(pointer.x, pointer.y),
            None => self.clear_hover(),
        }
    }

    pub fn nodes(&self) -> &[PositionedNode] {
        &self.nodes
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    pub fn set_transform(&mut self, transform: ViewTransform) {
        self.transform = transform.sanitized(&self.config);
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_ref().map(|h| h.id.as_str())
    }

    pub fn select(&mut self, id: Option<String>) {
        self.selected = id;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    fn node_at(&self, x: f64, y: f64) -> Option<&PositionedNode> {
        self.hit_index.find(&self.nodes, x, y, &self.transform)
    }

    /// Press on a node selects it; press on empty canvas starts a pan.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> Vec<ViewEvent> {
        self.pointer = Some(PointF::new(x, y));
        if let Some(id) = self.node_at(x, y).map(|n| n.id().to_string()) {
            debug!(id = %id, "node selected");
            self.selected = Some(id.clone());
            return vec![ViewEvent::NodeSelected { id }];
        }
        self.drag = Some(DragState {
            pointer_start: PointF::new(x, y),
            pan_start: self.transform.pan(),
        });
        Vec::new()
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> Vec<ViewEvent> {
        self.pointer = Some(PointF::new(x, y));
        if let Some(drag) = self.drag {
            let pan = PointF::new(
                drag.pan_start.x + (x - drag.pointer_start.x),
                drag.pan_start.y + (y - drag.pointer_start.y),
            );
            self.transform = self.transform.with_pan(pan);
            return vec![ViewEvent::TransformChanged { transform: self.transform }];
        }
        self.update_hover(x, y)
    }

    /// Report a hover change only when the node or its tooltip differs.
    fn update_hover(&mut self, x: f64, y: f64) -> Vec<ViewEvent> {
        let hit = self.node_at(x, y).map(|n| Hover {
            id: n.id().to_string(),
            tooltip: n.record.tooltip_text().to_string(),
        });
        if hit == self.hovered {
            return Vec::new();
        }

        self.hovered = hit.clone();
        let (id, tooltip) = match hit {
            Some(Hover { id, tooltip }) => (Some(id), Some(tooltip)),
            None => (None, None),
        };
        vec![ViewEvent::HoverChanged { id, tooltip }]
    }

    fn clear_hover(&mut self) -> Vec<ViewEvent> {
        if self.hovered.take().is_some() {
            return vec![ViewEvent::HoverChanged { id: None, tooltip: None }];
        }
        Vec::new()
    }

    pub fn pointer_up(&mut self) {
        self.drag = None;
    }

    /// Pointer left the canvas: end any drag and clear the hover.
    pub fn pointer_leave(&mut self) -> Vec<ViewEvent> {
        self.drag = None;
        self.pointer = None;
        self.clear_hover()
    }

    pub fn wheel(&mut self, x: f64, y: f64, delta_y: f64) -> Vec<ViewEvent> {
        self.transform = self.transform.wheel_zoom(PointF::new(x, y), delta_y, &self.config);
        vec![ViewEvent::TransformChanged { transform: self.transform }]
    }

    /// Back to the identity transform, where the layout is centred on the canvas.
    pub fn fit_view(&mut self) -> Vec<ViewEvent> {
        self.transform = ViewTransform::identity();
        vec![ViewEvent::TransformChanged { transform: self.transform }]
    }

    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S, viewport: Viewport) {
        render_frame(
            surface,
            &RenderInput {
                nodes: &self.nodes,
                transform: self.transform,
                selected: self.selected(),
                hovered: self.hovered(),
                viewport,
            },
        );
    }
}
