//! Radial mindmap layout and canvas interaction.
//!
//! Records in, positioned discs out: [`tree::build_tree`] turns a flat record
//! list into a tree, [`layout::layout_radial`] places it, and
//! [`interaction::CanvasView`] handles pan, zoom, hover and selection over
//! the result. [`session::MindmapSession`] ties a document to a view and
//! only commits edits that lay out. The browser build adds `wasm-bindgen`
//! exports on top.

pub mod color;
pub mod config;
pub mod document;
pub mod error;
pub mod hit_test;
pub mod interaction;
pub mod layout;
pub mod model;
pub mod output;
pub mod render;
pub mod session;
pub mod tree;
pub mod view;

#[cfg(target_arch = "wasm32")]
mod wasm;

pub use config::MindmapConfig;
pub use document::{MindmapDocument, NodeDraft};
pub use error::{MindmapError, Result};
pub use hit_test::{HitIndex, find_node_at};
pub use interaction::{CanvasView, ViewEvent};
pub use layout::{LayoutConfig, PointF, PositionedNode, layout_radial};
pub use model::{NodeRecord, NodeSize};
pub use render::{DisplayList, Surface, Viewport, render_frame};
pub use session::MindmapSession;
pub use tree::{MindmapTree, build_tree};
pub use view::{ViewConfig, ViewTransform};
