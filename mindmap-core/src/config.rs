use serde::{Deserialize, Serialize};

use crate::error::{MindmapError, Result};
use crate::layout::LayoutConfig;
use crate::view::ViewConfig;

/// Host-tunable settings. Every key is optional in JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MindmapConfig {
    pub layout: LayoutConfig,
    pub view: ViewConfig,
}

impl MindmapConfig {
    pub fn from_json(input: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let layout = &self.layout;
        ensure_positive("layout.ring_spacing", layout.ring_spacing)?;
        ensure_positive("layout.small_radius", layout.small_radius)?;
        ensure_positive("layout.medium_radius", layout.medium_radius)?;
        ensure_positive("layout.large_radius", layout.large_radius)?;
        if !(layout.span_narrowing.is_finite() && layout.span_narrowing >= 0.0) {
            return Err(MindmapError::InvalidConfig(
                "layout.span_narrowing must be a finite number >= 0".to_string(),
            ));
        }
        if layout.max_depth == 0 {
            return Err(MindmapError::InvalidConfig(
                "layout.max_depth must be greater than 0".to_string(),
            ));
        }

        let view = &self.view;
        ensure_positive("view.min_scale", view.min_scale)?;
        ensure_positive("view.max_scale", view.max_scale)?;
        ensure_positive("view.zoom_in_factor", view.zoom_in_factor)?;
        ensure_positive("view.zoom_out_factor", view.zoom_out_factor)?;
        if view.min_scale > view.max_scale {
            return Err(MindmapError::InvalidConfig(format!(
                "view.min_scale ({}) exceeds view.max_scale ({})",
                view.min_scale, view.max_scale
            )));
        }
        Ok(())
    }
}

fn ensure_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MindmapError::InvalidConfig(format!(
            "{name} must be a finite number > 0, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_gives_defaults() {
        let config = MindmapConfig::from_json("{}").unwrap();
        assert_eq!(config, MindmapConfig::default());
        assert_eq!(config.layout.ring_spacing, 200.0);
        assert_eq!(config.view.max_scale, 3.0);
    }

    #[test]
    fn test_partial_override() {
        let config =
            MindmapConfig::from_json(r#"{"layout": {"ring_spacing": 150}, "view": {"max_scale": 5}}"#)
                .unwrap();
        assert_eq!(config.layout.ring_spacing, 150.0);
        assert_eq!(config.layout.medium_radius, 80.0);
        assert_eq!(config.view.max_scale, 5.0);
        assert_eq!(config.view.min_scale, 0.1);
    }

    #[test]
    fn test_rejects_inverted_scale_range() {
        let err = MindmapConfig::from_json(r#"{"view": {"min_scale": 4}}"#).unwrap_err();
        assert!(matches!(err, MindmapError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_non_positive_values() {
        for json in [
            r#"{"layout": {"ring_spacing": 0}}"#,
            r#"{"layout": {"small_radius": -1}}"#,
            r#"{"layout": {"max_depth": 0}}"#,
            r#"{"layout": {"span_narrowing": -0.5}}"#,
            r#"{"view": {"zoom_in_factor": 0}}"#,
        ] {
            let err = MindmapConfig::from_json(json).unwrap_err();
            assert!(matches!(err, MindmapError::InvalidConfig(_)), "{json}");
        }
    }

    #[test]
    fn test_malformed_json() {
        let err = MindmapConfig::from_json("{").unwrap_err();
        assert!(matches!(err, MindmapError::InvalidJson(_)));
    }
}
