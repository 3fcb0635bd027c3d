//! Document, view and viewport kept in step.
//!
//! Edits run against a copy of the document. The copy replaces the live
//! document only once it lays out, so a rejected edit leaves the previous
//! records and the snapshot on screen untouched.

use tracing::{debug, warn};

use crate::config::MindmapConfig;
use crate::document::MindmapDocument;
use crate::error::Result;
use crate::interaction::{CanvasView, ViewEvent};
use crate::render::{Surface, Viewport};

#[derive(Debug, Clone)]
pub struct MindmapSession {
    config: MindmapConfig,
    document: MindmapDocument,
    view: CanvasView,
    viewport: Viewport,
    events: Vec<ViewEvent>,
}

impl MindmapSession {
    pub fn new(config: MindmapConfig, viewport: Viewport) -> Result<Self> {
        config.validate()?;
        let view = CanvasView::new(config.view.clone());
        Ok(Self {
            config,
            document: MindmapDocument::default(),
            view,
            viewport,
            events: Vec::new(),
        })
    }

    pub fn config(&self) -> &MindmapConfig {
        &self.config
    }

    pub fn document(&self) -> &MindmapDocument {
        &self.document
    }

    pub fn view(&self) -> &CanvasView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut CanvasView {
        &mut self.view
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Replace every record with a JSON array.
    pub fn load_json(&mut self, records_json: &str) -> Result<()> {
        let document = MindmapDocument::from_json(records_json)?;
        self.commit(document)
    }

    /// Lay the current document out for a new canvas size.
    pub fn resize(&mut self, viewport: Viewport) -> Result<()> {
        let nodes = self.document.layout(viewport.width, viewport.height, &self.config.layout)?;
        self.viewport = viewport;
        self.events.extend(self.view.set_nodes(nodes));
        Ok(())
    }

    /// Apply `command` to a copy of the document and keep the result only if
    /// both the command and the following layout succeed.
    pub fn edit<T, F>(&mut self, command: F) -> Result<T>
    where
        F: FnOnce(&mut MindmapDocument) -> Result<T>,
    {
        let mut draft = self.document.clone();
        let value = command(&mut draft)?;
        self.commit(draft)?;
        Ok(value)
    }

    /// Drill into the selected node; without a selection nothing happens.
    pub fn drill_down_selected(&mut self) -> Result<()> {
        let Some(selected) = self.view.selected().map(str::to_string) else {
            return Ok(());
        };
        self.edit(|doc| doc.drill_down(&selected))
    }

    /// Open the selected node's parent and move the selection there.
    pub fn drill_up_selected(&mut self) -> Result<Option<String>> {
        let Some(selected) = self.view.selected().map(str::to_string) else {
            return Ok(None);
        };
        let parent = self.edit(|doc| doc.drill_up(&selected))?;
        if parent.is_some() {
            self.view.select(parent.clone());
        }
        Ok(parent)
    }

    /// View events produced by relayouts since the last call.
    pub fn take_events(&mut self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        self.view.render(surface, self.viewport);
    }

    fn commit(&mut self, document: MindmapDocument) -> Result<()> {
        let nodes = document
            .layout(self.viewport.width, self.viewport.height, &self.config.layout)
            .inspect_err(|err| warn!(kind = err.kind(), "relayout failed, keeping previous document"))?;
        debug!(records = document.len(), nodes = nodes.len(), "document committed");
        self.document = document;
        self.events.extend(self.view.set_nodes(nodes));
        Ok(())
    }
}
