//! Flat node records, as supplied and persisted by the editor.
//!
//! A record list is the only persistent state of a mindmap. Trees and
//! positions are derived from it on every change.

use serde::{Deserialize, Serialize};

/// Color given to records that do not carry one (the editor's default).
pub const DEFAULT_NODE_COLOR: &str = "#86EFAC";

/// Size class of a node; selects the render radius.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl NodeSize {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

/// One node of the flat list. `parent_id == None` marks the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Nesting level, root = 0. Stored, not recomputed.
    #[serde(default)]
    pub level: i32,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub size: NodeSize,
    /// Sibling order; children are laid out ascending by this.
    #[serde(default)]
    pub order_index: i64,
    #[serde(default)]
    pub is_collapsed: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

fn default_color() -> String {
    DEFAULT_NODE_COLOR.to_string()
}

impl NodeRecord {
    /// A bare record with defaults for everything but the hierarchy fields.
    pub fn new(id: impl Into<String>, parent_id: Option<&str>, order_index: i64) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            summary: String::new(),
            description: String::new(),
            parent_id: parent_id.map(str::to_string),
            level: 0,
            color: default_color(),
            size: NodeSize::default(),
            order_index,
            is_collapsed: false,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Text shown while hovering: the summary, or the title when there is none.
    pub fn tooltip_text(&self) -> &str {
        if self.summary.is_empty() {
            &self.title
        } else {
            &self.summary
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_record() {
        let json = r##"{
            "id": "n1",
            "title": "Rust",
            "summary": "systems language",
            "description": "",
            "parent_id": null,
            "level": 0,
            "color": "#60A5FA",
            "size": "large",
            "order_index": 0,
            "is_collapsed": false,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-02T00:00:00Z"
        }"##;
        let record: NodeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "n1");
        assert!(record.is_root());
        assert_eq!(record.size, NodeSize::Large);
        assert_eq!(record.color, "#60A5FA");
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let record: NodeRecord = serde_json::from_str(r#"{"id": "a", "parent_id": "r"}"#).unwrap();
        assert_eq!(record.parent_id.as_deref(), Some("r"));
        assert_eq!(record.size, NodeSize::Medium);
        assert_eq!(record.color, DEFAULT_NODE_COLOR);
        assert!(!record.is_collapsed);
    }

    #[test]
    fn test_unknown_size_is_rejected() {
        let result: Result<NodeRecord, _> = serde_json::from_str(r#"{"id": "a", "size": "huge"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_tooltip_falls_back_to_title() {
        let mut record = NodeRecord::new("a", None, 0);
        record.title = "Title".to_string();
        assert_eq!(record.tooltip_text(), "Title");
        record.summary = "Summary".to_string();
        assert_eq!(record.tooltip_text(), "Summary");
    }
}
