//! The flat record list and the editing commands applied to it.
//!
//! Commands rewrite records in place; trees and layouts are derived again
//! afterwards through [`MindmapDocument::layout`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MindmapError, Result};
use crate::layout::{LayoutConfig, PositionedNode, layout_radial};
use crate::model::{DEFAULT_NODE_COLOR, NodeRecord, NodeSize};
use crate::tree::build_tree;

/// Editable fields of a node, as filled in by the node editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeDraft {
    pub title: String,
    pub summary: String,
    pub description: String,
    pub color: String,
    pub size: NodeSize,
    pub parent_id: Option<String>,
}

impl Default for NodeDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            summary: String::new(),
            description: String::new(),
            color: DEFAULT_NODE_COLOR.to_string(),
            size: NodeSize::Medium,
            parent_id: None,
        }
    }
}

impl From<&NodeRecord> for NodeDraft {
    fn from(record: &NodeRecord) -> Self {
        Self {
            title: record.title.clone(),
            summary: record.summary.clone(),
            description: record.description.clone(),
            color: record.color.clone(),
            size: record.size,
            parent_id: record.parent_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MindmapDocument {
    records: Vec<NodeRecord>,
}

impl MindmapDocument {
    pub fn new(records: Vec<NodeRecord>) -> Self {
        Self { records }
    }

    pub fn from_json(input: &str) -> Result<Self> {
        let records: Vec<NodeRecord> = serde_json::from_str(input)?;
        debug!(records = records.len(), "loaded node records");
        Ok(Self::new(records))
    }

    /// Pretty-printed record array, the download format.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.records)?)
    }

    pub fn records(&self) -> &[NodeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&NodeRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut NodeRecord> {
        self.records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| MindmapError::UnknownNode(id.to_string()))
    }

    /// Build the tree and lay it out on a `width` x `height` canvas.
    pub fn layout(&self, width: f64, height: f64, cfg: &LayoutConfig) -> Result<Vec<PositionedNode>> {
        let tree = build_tree(&self.records);
        layout_radial(tree.as_ref(), width, height, cfg)
    }

    pub fn expand_all(&mut self) {
        for record in &mut self.records {
            record.is_collapsed = false;
        }
    }

    /// Collapse everything below the root level.
    pub fn collapse_all(&mut self) {
        for record in &mut self.records {
            record.is_collapsed = record.level != 0;
        }
    }

    /// Open `selected` and its direct children, collapse everything else.
    pub fn drill_down(&mut self, selected: &str) -> Result<()> {
        if self.get(selected).is_none() {
            return Err(MindmapError::UnknownNode(selected.to_string()));
        }
        for record in &mut self.records {
            let focused = record.id == selected || record.parent_id.as_deref() == Some(selected);
            record.is_collapsed = !focused;
        }
        debug!(selected, "drilled down");
        Ok(())
    }

    /// Expand the parent of `selected` and return it as the new selection.
    /// A root selection changes nothing and returns None.
    pub fn drill_up(&mut self, selected: &str) -> Result<Option<String>> {
        let record = self
            .get(selected)
            .ok_or_else(|| MindmapError::UnknownNode(selected.to_string()))?;
        let Some(parent_id) = record.parent_id.clone() else {
            return Ok(None);
        };
        for record in self.records.iter_mut().filter(|r| r.id == parent_id) {
            record.is_collapsed = false;
        }
        debug!(selected, parent = %parent_id, "drilled up");
        Ok(Some(parent_id))
    }

    /// Flip one node's collapsed flag and return the new value.
    pub fn toggle_collapsed(&mut self, id: &str) -> Result<bool> {
        let record = self.get_mut(id)?;
        record.is_collapsed = !record.is_collapsed;
        Ok(record.is_collapsed)
    }

    /// Append a new node below `draft.parent_id` and return its id.
    pub fn add_node(&mut self, draft: NodeDraft, timestamp: &str) -> Result<String> {
        let level = match draft.parent_id.as_deref() {
            Some(parent_id) => {
                let parent = self
                    .get(parent_id)
                    .ok_or_else(|| MindmapError::UnknownNode(parent_id.to_string()))?;
                parent.level + 1
            }
            None => {
                if let Some(root) = self.records.iter().find(|r| r.is_root()) {
                    return Err(MindmapError::RootExists(root.id.clone()));
                }
                0
            }
        };

        let order_index = self
            .records
            .iter()
            .filter(|r| r.parent_id == draft.parent_id)
            .map(|r| r.order_index)
            .max()
            .map_or(0, |max| max + 1);

        let id = self.next_id();
        self.records.push(NodeRecord {
            id: id.clone(),
            title: draft.title,
            summary: draft.summary,
            description: draft.description,
            parent_id: draft.parent_id,
            level,
            color: draft.color,
            size: draft.size,
            order_index,
            is_collapsed: false,
            created_at: timestamp.to_string(),
            updated_at: timestamp.to_string(),
        });
        debug!(id = %id, level, order_index, "added node");
        Ok(id)
    }

    /// Overwrite the editable fields of an existing node. Hierarchy fields
    /// (parent, level, order) are left alone.
    pub fn update_node(&mut self, id: &str, draft: NodeDraft, timestamp: &str) -> Result<()> {
        let record = self.get_mut(id)?;
        record.title = draft.title;
        record.summary = draft.summary;
        record.description = draft.description;
        record.color = draft.color;
        record.size = draft.size;
        record.updated_at = timestamp.to_string();
        debug!(id, "updated node");
        Ok(())
    }

    /// Save request from the editor: update when the id exists, add otherwise.
    /// Returns the id of the saved node.
    pub fn save(&mut self, record: NodeRecord, timestamp: &str) -> Result<String> {
        let draft = NodeDraft::from(&record);
        if self.get(&record.id).is_some() {
            self.update_node(&record.id, draft, timestamp)?;
            Ok(record.id)
        } else {
            self.add_node(draft, timestamp)
        }
    }

    fn next_id(&self) -> String {
        let taken: HashSet<&str> = self.records.iter().map(|r| r.id.as_str()).collect();
        let mut n = self.records.len() + 1;
        loop {
            let candidate = format!("node-{n}");
            if !taken.contains(candidate.as_str()) {
                return candidate;
            }
            n += 1;
        }
    }
}
