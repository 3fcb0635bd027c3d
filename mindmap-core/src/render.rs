//! Render pass: edges, node discs and labels onto a 2D drawing surface.
//!
//! The pass talks to a [`Surface`], a thin mirror of the Canvas 2D API.
//! The browser build implements it for `CanvasRenderingContext2d`;
//! [`DisplayList`] records the calls for headless use and tests.

use std::collections::HashMap;
use std::f64::consts::TAU;

use serde::Serialize;
use tracing::debug;

use crate::color::darken_color;
use crate::hit_test::visible_nodes;
use crate::layout::PositionedNode;
use crate::view::ViewTransform;

const EDGE_COLOR: &str = "#4B5563";
const EDGE_WIDTH: f64 = 2.0;
const SELECTION_COLOR: &str = "#FBBF24";
const SELECTION_WIDTH: f64 = 4.0;
const SELECTION_GAP: f64 = 5.0;
const HOVER_GLOW_COLOR: &str = "rgba(255, 255, 255, 0.5)";
const HOVER_GLOW_BLUR: f64 = 20.0;
const NO_SHADOW_COLOR: &str = "transparent";
const OUTLINE_WIDTH: f64 = 3.0;
const OUTLINE_DARKEN_PERCENT: f64 = 20.0;
const LABEL_COLOR: &str = "#1F2937";
const LABEL_MIN_FONT_PX: f64 = 12.0;

/// The subset of the Canvas 2D context the render pass needs.
pub trait Surface {
    fn reset_transform(&mut self);
    fn scale(&mut self, sx: f64, sy: f64);
    fn translate(&mut self, dx: f64, dy: f64);
    fn save(&mut self);
    fn restore(&mut self);
    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64);

    fn set_fill_style(&mut self, color: &str);
    fn set_stroke_style(&mut self, color: &str);
    fn set_line_width(&mut self, width: f64);
    fn set_shadow(&mut self, color: &str, blur: f64);
    fn set_font(&mut self, font: &str);
    /// Center labels horizontally and vertically on the anchor point.
    fn set_text_centered(&mut self);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64);
    fn fill(&mut self);
    fn stroke(&mut self);

    fn fill_text(&mut self, text: &str, x: f64, y: f64);
    /// Advance width of `text` in the current font.
    fn measure_text(&mut self, text: &str) -> f64;
}

/// Size of the drawing target in CSS pixels.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub device_pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, device_pixel_ratio: 1.0 }
    }
}

pub struct RenderInput<'a> {
    pub nodes: &'a [PositionedNode],
    pub transform: ViewTransform,
    pub selected: Option<&'a str>,
    pub hovered: Option<&'a str>,
    pub viewport: Viewport,
}

/// Draw one full frame.
pub fn render_frame<S: Surface + ?Sized>(surface: &mut S, input: &RenderInput<'_>) {
    let dpr = if input.viewport.device_pixel_ratio > 0.0 {
        input.viewport.device_pixel_ratio
    } else {
        1.0
    };

    surface.reset_transform();
    surface.scale(dpr, dpr);
    surface.clear_rect(0.0, 0.0, input.viewport.width, input.viewport.height);

    surface.save();
    surface.translate(input.transform.x, input.transform.y);
    surface.scale(input.transform.scale, input.transform.scale);

    let visible: Vec<&PositionedNode> = visible_nodes(input.nodes)
        .into_iter()
        .filter(|n| n.has_geometry())
        .collect();

    draw_edges(surface, &visible);
    for node in &visible {
        draw_node(surface, node, input.selected, input.hovered);
    }

    surface.restore();
    debug!(nodes = visible.len(), "rendered frame");
}

fn draw_edges<S: Surface + ?Sized>(surface: &mut S, visible: &[&PositionedNode]) {
    let mut by_id: HashMap<&str, &PositionedNode> = HashMap::with_capacity(visible.len());
    for node in visible {
        by_id.entry(node.id()).or_insert(node);
    }

    surface.set_stroke_style(EDGE_COLOR);
    surface.set_line_width(EDGE_WIDTH);

    for node in visible {
        let Some(parent_id) = node.record.parent_id.as_deref() else {
            continue;
        };
        let Some(parent) = by_id.get(parent_id) else {
            continue;
        };
        surface.begin_path();
        surface.move_to(parent.x, parent.y);
        surface.line_to(node.x, node.y);
        surface.stroke();
    }
}

fn draw_node<S: Surface + ?Sized>(
    surface: &mut S,
    node: &PositionedNode,
    selected: Option<&str>,
    hovered: Option<&str>,
) {
    let (x, y, radius) = (node.x, node.y, node.radius);

    if selected == Some(node.id()) {
        surface.set_stroke_style(SELECTION_COLOR);
        surface.set_line_width(SELECTION_WIDTH);
        surface.begin_path();
        surface.arc(x, y, radius + SELECTION_GAP, 0.0, TAU);
        surface.stroke();
    }

    if hovered == Some(node.id()) {
        surface.set_shadow(HOVER_GLOW_COLOR, HOVER_GLOW_BLUR);
    }

    surface.set_fill_style(&node.record.color);
    surface.begin_path();
    surface.arc(x, y, radius, 0.0, TAU);
    surface.fill();

    let outline = darken_color(&node.record.color, OUTLINE_DARKEN_PERCENT)
        .unwrap_or_else(|_| node.record.color.clone());
    surface.set_stroke_style(&outline);
    surface.set_line_width(OUTLINE_WIDTH);
    surface.stroke();

    // The glow must not bleed into the next node.
    surface.set_shadow(NO_SHADOW_COLOR, 0.0);

    surface.set_fill_style(LABEL_COLOR);
    surface.set_font(&label_font(radius));
    surface.set_text_centered();

    let line_height = radius / 5.0;
    let lines = wrap_lines(&node.record.title, radius * 1.6, |text| surface.measure_text(text));
    let start_y = y - (lines.len().saturating_sub(1) as f64 * line_height) / 2.0;
    for (i, line) in lines.iter().enumerate() {
        surface.fill_text(line, x, start_y + i as f64 * line_height);
    }
}

pub fn label_font(radius: f64) -> String {
    format!("bold {}px sans-serif", LABEL_MIN_FONT_PX.max(radius / 4.0))
}

/// Greedy word wrap on single spaces. A word wider than `max_width` gets a
/// line of its own rather than being split.
pub fn wrap_lines<F>(text: &str, max_width: f64, mut measure: F) -> Vec<String>
where
    F: FnMut(&str) -> f64,
{
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split(' ') {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if measure(&candidate) > max_width && !current.is_empty() {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    ResetTransform,
    Scale { sx: f64, sy: f64 },
    Translate { dx: f64, dy: f64 },
    Save,
    Restore,
    ClearRect { x: f64, y: f64, w: f64, h: f64 },
    FillStyle { color: String },
    StrokeStyle { color: String },
    LineWidth { width: f64 },
    Shadow { color: String, blur: f64 },
    Font { font: String },
    TextCentered,
    BeginPath,
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    Arc { x: f64, y: f64, radius: f64, start: f64, end: f64 },
    Fill,
    Stroke,
    FillText { text: String, x: f64, y: f64 },
}

/// Headless surface that records every call. Text is measured as a fixed
/// advance per character.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayList {
    pub commands: Vec<DrawCommand>,
    #[serde(skip)]
    char_width: f64,
}

impl DisplayList {
    pub fn new(char_width: f64) -> Self {
        Self { commands: Vec::new(), char_width }
    }

    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Default for DisplayList {
    fn default() -> Self {
        Self::new(8.0)
    }
}

impl Surface for DisplayList {
    fn reset_transform(&mut self) { self.commands.push(DrawCommand::ResetTransform) }
    fn scale(&mut self, sx: f64, sy: f64) { self.commands.push(DrawCommand::Scale { sx, sy }) }
    fn translate(&mut self, dx: f64, dy: f64) { self.commands.push(DrawCommand::Translate { dx, dy }) }
    fn save(&mut self) { self.commands.push(DrawCommand::Save) }
    fn restore(&mut self) { self.commands.push(DrawCommand::Restore) }

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.commands.push(DrawCommand::ClearRect { x, y, w, h })
    }

    fn set_fill_style(&mut self, color: &str) {
        self.commands.push(DrawCommand::FillStyle { color: color.to_string() })
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.commands.push(DrawCommand::StrokeStyle { color: color.to_string() })
    }

    fn set_line_width(&mut self, width: f64) { self.commands.push(DrawCommand::LineWidth { width }) }

    fn set_shadow(&mut self, color: &str, blur: f64) {
        self.commands.push(DrawCommand::Shadow { color: color.to_string(), blur })
    }

    fn set_font(&mut self, font: &str) {
        self.commands.push(DrawCommand::Font { font: font.to_string() })
    }

    fn set_text_centered(&mut self) { self.commands.push(DrawCommand::TextCentered) }
    fn begin_path(&mut self) { self.commands.push(DrawCommand::BeginPath) }
    fn move_to(&mut self, x: f64, y: f64) { self.commands.push(DrawCommand::MoveTo { x, y }) }
    fn line_to(&mut self, x: f64, y: f64) { self.commands.push(DrawCommand::LineTo { x, y }) }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64) {
        self.commands.push(DrawCommand::Arc { x, y, radius, start, end })
    }

    fn fill(&mut self) { self.commands.push(DrawCommand::Fill) }
    fn stroke(&mut self) { self.commands.push(DrawCommand::Stroke) }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.commands.push(DrawCommand::FillText { text: text.to_string(), x, y })
    }

    fn measure_text(&mut self, text: &str) -> f64 {
        text.chars().count() as f64 * self.char_width
    }
}
