//! Error type shared by every fallible mindmap operation.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MindmapError {
    /// The hierarchy nests deeper than `LayoutConfig::max_depth`.
    /// Only a cyclic or pathological record list gets here.
    #[error("node `{id}` is nested deeper than the limit of {limit} levels")]
    DepthLimitExceeded { id: String, limit: usize },

    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("node `{0}` not found")]
    UnknownNode(String),

    #[error("a root node already exists (`{0}`)")]
    RootExists(String),

    #[error("invalid color `{0}`; expected #RRGGBB")]
    InvalidColor(String),
}

impl MindmapError {
    /// Stable snake_case name used in JSON error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DepthLimitExceeded { .. } => "depth_limit_exceeded",
            Self::InvalidJson(_) => "invalid_json",
            Self::InvalidConfig(_) => "invalid_config",
            Self::UnknownNode(_) => "unknown_node",
            Self::RootExists(_) => "root_exists",
            Self::InvalidColor(_) => "invalid_color",
        }
    }
}

impl From<serde_json::Error> for MindmapError {
    fn from(error: serde_json::Error) -> Self {
        Self::InvalidJson(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MindmapError>;
