//! Output types for the web frontend.
//!
//! These structs are serialized to JSON and handed across the wasm
//! boundary. Building them lives here so it can be tested natively.

use serde::Serialize;
use tracing::error;

use crate::error::{MindmapError, Result};
use crate::interaction::ViewEvent;
use crate::layout::{LayoutConfig, PositionedNode, layout_radial};
use crate::model::NodeRecord;
use crate::tree::build_tree;

/// Error shown to the user instead of a layout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorInfo {
    /// Machine-readable error kind, e.g. "invalid_json"
    pub kind: String,
    pub message: String,
}

impl From<&MindmapError> for ErrorInfo {
    fn from(err: &MindmapError) -> Self {
        Self { kind: err.kind().to_string(), message: err.to_string() }
    }
}

/// The combined output of a layout request
#[derive(Debug, Clone, Default, Serialize)]
pub struct LayoutOutput {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<PositionedNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl LayoutOutput {
    pub fn failed(err: &MindmapError) -> Self {
        error!(kind = err.kind(), "{err}");
        Self { nodes: Vec::new(), error: Some(err.into()) }
    }
}

/// Reply to a host command: its value or the error that rejected it, plus
/// view events the resulting relayout produced.
#[derive(Debug, Clone, Serialize)]
pub struct CommandOutput<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<T>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<ViewEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl<T> CommandOutput<T> {
    pub fn new(result: Result<T>, events: Vec<ViewEvent>) -> Self {
        match result {
            Ok(value) => Self { value: Some(value), events, error: None },
            Err(err) => {
                error!(kind = err.kind(), "{err}");
                Self { value: None, events, error: Some((&err).into()) }
            }
        }
    }
}

/// Parse a JSON record array and lay it out. Failures are reported in
/// `error` rather than returned.
pub fn layout_from_json(records_json: &str, width: f64, height: f64, cfg: &LayoutConfig) -> LayoutOutput {
    let records: Vec<NodeRecord> = match serde_json::from_str(records_json) {
        Ok(records) => records,
        Err(e) => return LayoutOutput::failed(&e.into()),
    };
    let tree = build_tree(&records);
    match layout_radial(tree.as_ref(), width, height, cfg) {
        Ok(nodes) => LayoutOutput { nodes, error: None },
        Err(e) => LayoutOutput::failed(&e),
    }
}

/// Serialize for the wasm boundary; a serializer failure becomes an error
/// payload instead of a panic.
pub fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        let info = ErrorInfo::from(&MindmapError::from(e));
        format!(
            r#"{{"error":{{"kind":"{}","message":{}}}}}"#,
            info.kind,
            serde_json::Value::String(info.message)
        )
    })
}

pub fn events_to_json(events: &[ViewEvent]) -> String {
    to_json(&events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn test_layout_from_json_success() {
        let input = r#"[
            {"id": "r", "title": "Root", "parent_id": null, "level": 0},
            {"id": "a", "title": "A", "parent_id": "r", "level": 1, "order_index": 0}
        ]"#;
        let output = layout_from_json(input, 1000.0, 800.0, &LayoutConfig::default());
        assert!(output.error.is_none());
        let value: Value = serde_json::from_str(&to_json(&output)).unwrap();
        assert_eq!(value["nodes"][0]["id"], "r");
        assert_eq!(value["nodes"][0]["x"], 500.0);
        assert_eq!(value["nodes"][0]["radius"], 80.0);
        assert_eq!(value["nodes"][1]["visible"], true);
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_layout_from_json_reports_bad_input() {
        let output = layout_from_json("not json", 100.0, 100.0, &LayoutConfig::default());
        let value: Value = serde_json::from_str(&to_json(&output)).unwrap();
        assert_eq!(value["error"]["kind"], "invalid_json");
        assert!(value.get("nodes").is_none());
    }

    #[test]
    fn test_layout_from_json_without_root_is_empty() {
        let output = layout_from_json(r#"[{"id": "a", "parent_id": "x"}]"#, 100.0, 100.0, &LayoutConfig::default());
        assert!(output.nodes.is_empty());
        assert!(output.error.is_none());
        assert_eq!(to_json(&output), "{}");
    }

    #[test]
    fn test_depth_limit_reported() {
        let input = r#"[{"id": "r"}, {"id": "a", "parent_id": "r"}, {"id": "b", "parent_id": "a"}]"#;
        let cfg = LayoutConfig { max_depth: 1, ..LayoutConfig::default() };
        let output = layout_from_json(input, 100.0, 100.0, &cfg);
        assert_eq!(output.error.map(|e| e.kind), Some("depth_limit_exceeded".to_string()));
    }

    #[test]
    fn test_command_output_value_or_error() {
        let ok = CommandOutput::new(Ok(true), Vec::new());
        assert_eq!(to_json(&ok), r#"{"value":true}"#);

        let err: CommandOutput<String> = CommandOutput::new(
            Err(MindmapError::DepthLimitExceeded { id: "n257".to_string(), limit: 256 }),
            Vec::new(),
        );
        let value: Value = serde_json::from_str(&to_json(&err)).unwrap();
        assert_eq!(value["error"]["kind"], "depth_limit_exceeded");
        assert!(value.get("value").is_none());

        let hover = vec![ViewEvent::HoverChanged { id: None, tooltip: None }];
        let value: Value = serde_json::from_str(&to_json(&CommandOutput::new(Ok(()), hover))).unwrap();
        assert_eq!(value["events"][0]["type"], "hover_changed");
    }

    #[test]
    fn test_events_json() {
        let events = vec![ViewEvent::HoverChanged { id: None, tooltip: None }];
        let value: Value = serde_json::from_str(&events_to_json(&events)).unwrap();
        assert_eq!(value, json!([{"type": "hover_changed", "id": null, "tooltip": null}]));
    }
}
