//! Pan/zoom transform between screen pixels and logical layout space.
//!
//! `screen = logical * scale + pan`. The scale is clamped to
//! `[ViewConfig::min_scale, ViewConfig::max_scale]` whenever a transform
//! enters through a gesture or a setter, so hit testing never divides by a
//! zero or negative scale.

use serde::{Deserialize, Serialize};

use crate::layout::PointF;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub min_scale: f64,
    pub max_scale: f64,
    /// Scale multiplier for a wheel step towards the user (delta_y <= 0).
    pub zoom_in_factor: f64,
    /// Scale multiplier for a wheel step away from the user (delta_y > 0).
    pub zoom_out_factor: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.1,
            max_scale: 3.0,
            zoom_in_factor: 1.1,
            zoom_out_factor: 0.9,
        }
    }
}

impl ViewConfig {
    /// Force `scale` into `[min_scale, max_scale]`. NaN means 1.0. With an
    /// inverted range `max_scale` wins, and NaN bounds are ignored; a result
    /// that is still not a positive finite number becomes 1.0.
    pub fn clamp_scale(&self, scale: f64) -> f64 {
        let scale = if scale.is_nan() { 1.0 } else { scale };
        let clamped = scale.max(self.min_scale).min(self.max_scale);
        if clamped.is_finite() && clamped > 0.0 { clamped } else { 1.0 }
    }
}

/// Pan offset (`x`, `y`) plus uniform `scale`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ViewTransform {
    pub const fn identity() -> Self {
        Self { x: 0.0, y: 0.0, scale: 1.0 }
    }

    pub fn pan(&self) -> PointF {
        PointF { x: self.x, y: self.y }
    }

    pub fn to_logical(&self, screen: PointF) -> PointF {
        PointF {
            x: (screen.x - self.x) / self.scale,
            y: (screen.y - self.y) / self.scale,
        }
    }

    pub fn to_screen(&self, logical: PointF) -> PointF {
        PointF {
            x: logical.x * self.scale + self.x,
            y: logical.y * self.scale + self.y,
        }
    }

    /// Same transform with the scale forced into the configured range.
    pub fn sanitized(&self, cfg: &ViewConfig) -> Self {
        Self { scale: cfg.clamp_scale(self.scale), ..*self }
    }

    pub fn with_pan(&self, pan: PointF) -> Self {
        Self { x: pan.x, y: pan.y, scale: self.scale }
    }

    /// Rescale so the logical point under `cursor` stays under it.
    pub fn zoomed_at(&self, cursor: PointF, scale: f64, cfg: &ViewConfig) -> Self {
        let scale = cfg.clamp_scale(scale);
        let ratio = scale / self.scale;
        Self {
            x: cursor.x - (cursor.x - self.x) * ratio,
            y: cursor.y - (cursor.y - self.y) * ratio,
            scale,
        }
    }

    /// One wheel step at `cursor`. Positive `delta_y` zooms out.
    pub fn wheel_zoom(&self, cursor: PointF, delta_y: f64, cfg: &ViewConfig) -> Self {
        let factor = if delta_y > 0.0 { cfg.zoom_out_factor } else { cfg.zoom_in_factor };
        self.zoomed_at(cursor, self.scale * factor, cfg)
    }
}
