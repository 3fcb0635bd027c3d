//! WASM bindings for the mindmap-core library.
//!
//! All functions exposed to JavaScript via wasm-bindgen are defined here.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use serde::Serialize;

use crate::config::MindmapConfig;
use crate::error::{self, MindmapError};
use crate::interaction::ViewEvent;
use crate::layout::LayoutConfig;
use crate::model::NodeRecord;
use crate::output::{CommandOutput, events_to_json, layout_from_json, to_json};
use crate::render::{Surface, Viewport};
use crate::session::MindmapSession;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = error)]
    pub fn console_error(s: &str);
}

fn report(result: Result<(), JsValue>, op: &str) {
    if let Err(e) = result {
        console_error(&format!("canvas {op} failed: {e:?}"));
    }
}

fn to_js_error(err: MindmapError) -> JsValue {
    console_error(&format!("{}: {err}", err.kind()));
    JsValue::from_str(&err.to_string())
}

fn now_iso() -> String {
    String::from(js_sys::Date::new_0().to_iso_string())
}

// Inherent methods share names with the trait, so calls go through the
// type path to avoid recursing into `Surface`.
impl Surface for CanvasRenderingContext2d {
    fn reset_transform(&mut self) {
        report(CanvasRenderingContext2d::set_transform(self, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0), "setTransform");
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        report(CanvasRenderingContext2d::scale(self, sx, sy), "scale");
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        report(CanvasRenderingContext2d::translate(self, dx, dy), "translate");
    }

    fn save(&mut self) {
        CanvasRenderingContext2d::save(self);
    }

    fn restore(&mut self) {
        CanvasRenderingContext2d::restore(self);
    }

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        CanvasRenderingContext2d::clear_rect(self, x, y, w, h);
    }

    fn set_fill_style(&mut self, color: &str) {
        self.set_fill_style_str(color);
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.set_stroke_style_str(color);
    }

    fn set_line_width(&mut self, width: f64) {
        CanvasRenderingContext2d::set_line_width(self, width);
    }

    fn set_shadow(&mut self, color: &str, blur: f64) {
        self.set_shadow_color(color);
        self.set_shadow_blur(blur);
    }

    fn set_font(&mut self, font: &str) {
        CanvasRenderingContext2d::set_font(self, font);
    }

    fn set_text_centered(&mut self) {
        self.set_text_align("center");
        self.set_text_baseline("middle");
    }

    fn begin_path(&mut self) {
        CanvasRenderingContext2d::begin_path(self);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        CanvasRenderingContext2d::move_to(self, x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        CanvasRenderingContext2d::line_to(self, x, y);
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64) {
        report(CanvasRenderingContext2d::arc(self, x, y, radius, start, end), "arc");
    }

    fn fill(&mut self) {
        CanvasRenderingContext2d::fill(self);
    }

    fn stroke(&mut self) {
        CanvasRenderingContext2d::stroke(self);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        report(CanvasRenderingContext2d::fill_text(self, text, x, y), "fillText");
    }

    fn measure_text(&mut self, text: &str) -> f64 {
        match CanvasRenderingContext2d::measure_text(self, text) {
            Ok(metrics) => metrics.width(),
            Err(e) => {
                console_error(&format!("canvas measureText failed: {e:?}"));
                0.0
            }
        }
    }
}

/// Stateless layout: JSON record array in, `{ nodes, error? }` out.
#[wasm_bindgen]
pub fn compute_layout(records_json: &str, width: f64, height: f64) -> String {
    let output = layout_from_json(records_json, width, height, &LayoutConfig::default());
    if let Some(error) = &output.error {
        console_error(&format!("Error computing layout: {}", error.message));
    }
    to_json(&output)
}

/// A mindmap bound to one `<canvas>` element.
///
/// Editing methods return `{ value?, events?, error? }` JSON. A rejected
/// edit reports `error` and leaves the previous document on screen.
#[wasm_bindgen]
pub struct MindmapCanvas {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    session: MindmapSession,
}

#[wasm_bindgen]
impl MindmapCanvas {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, config_json: Option<String>) -> Result<MindmapCanvas, JsValue> {
        let config = match config_json.as_deref() {
            Some(json) => MindmapConfig::from_json(json).map_err(to_js_error)?,
            None => MindmapConfig::default(),
        };
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let viewport = Viewport::new(f64::from(canvas.width()), f64::from(canvas.height()));
        let session = MindmapSession::new(config, viewport).map_err(to_js_error)?;
        Ok(Self { canvas, ctx, session })
    }

    /// Replace all records with a JSON array and redraw.
    #[wasm_bindgen(js_name = loadNodes)]
    pub fn load_nodes(&mut self, records_json: &str) -> String {
        let result = self.session.load_json(records_json);
        self.reply(result)
    }

    /// Current records as pretty-printed JSON.
    #[wasm_bindgen(js_name = exportNodes)]
    pub fn export_nodes(&self) -> String {
        self.session
            .document()
            .to_json()
            .unwrap_or_else(|err| to_json(&CommandOutput::<()>::new(Err(err), Vec::new())))
    }

    /// `width`/`height` are CSS pixels; the backing store is scaled by `dpr`.
    pub fn resize(&mut self, width: f64, height: f64, dpr: f64) -> String {
        let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        let result = self.session.resize(Viewport { width, height, device_pixel_ratio: dpr });
        if result.is_ok() {
            self.canvas.set_width((width * dpr).round().max(0.0) as u32);
            self.canvas.set_height((height * dpr).round().max(0.0) as u32);
        }
        self.reply(result)
    }

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f64, y: f64) -> String {
        let events = self.session.view_mut().pointer_down(x, y);
        self.after_events(&events)
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f64, y: f64) -> String {
        let events = self.session.view_mut().pointer_move(x, y);
        self.after_events(&events)
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self) {
        self.session.view_mut().pointer_up();
    }

    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self) -> String {
        let events = self.session.view_mut().pointer_leave();
        self.after_events(&events)
    }

    pub fn wheel(&mut self, x: f64, y: f64, delta_y: f64) -> String {
        let events = self.session.view_mut().wheel(x, y, delta_y);
        self.after_events(&events)
    }

    #[wasm_bindgen(js_name = fitView)]
    pub fn fit_view(&mut self) -> String {
        let events = self.session.view_mut().fit_view();
        self.after_events(&events)
    }

    pub fn render(&mut self) {
        self.session.render(&mut self.ctx);
    }

    pub fn select(&mut self, id: Option<String>) {
        self.session.view_mut().select(id);
        self.render();
    }

    #[wasm_bindgen(getter)]
    pub fn selected(&self) -> Option<String> {
        self.session.view().selected().map(str::to_string)
    }

    #[wasm_bindgen(js_name = expandAll)]
    pub fn expand_all(&mut self) -> String {
        let result = self.session.edit(|doc| {
            doc.expand_all();
            Ok(())
        });
        self.reply(result)
    }

    #[wasm_bindgen(js_name = collapseAll)]
    pub fn collapse_all(&mut self) -> String {
        let result = self.session.edit(|doc| {
            doc.collapse_all();
            Ok(())
        });
        self.reply(result)
    }

    /// Focus the selected node; a no-op without a selection.
    #[wasm_bindgen(js_name = drillDown)]
    pub fn drill_down(&mut self) -> String {
        let result = self.session.drill_down_selected();
        self.reply(result)
    }

    /// Move the selection to its parent; `value` is the new selection.
    #[wasm_bindgen(js_name = drillUp)]
    pub fn drill_up(&mut self) -> String {
        let result = self.session.drill_up_selected();
        self.reply(result)
    }

    /// `value` is the node's new collapsed flag.
    #[wasm_bindgen(js_name = toggleCollapsed)]
    pub fn toggle_collapsed(&mut self, id: &str) -> String {
        let result = self.session.edit(|doc| doc.toggle_collapsed(id));
        self.reply(result)
    }

    /// Create or update a node from the editor's JSON record; `value` is its id.
    #[wasm_bindgen(js_name = saveNode)]
    pub fn save_node(&mut self, record_json: &str) -> String {
        let result = serde_json::from_str::<NodeRecord>(record_json)
            .map_err(MindmapError::from)
            .and_then(|record| {
                let timestamp = now_iso();
                self.session.edit(|doc| doc.save(record, &timestamp))
            });
        self.reply(result)
    }
}

impl MindmapCanvas {
    /// Redraw after a committed edit, log a rejected one, and serialize the reply.
    fn reply<T: Serialize>(&mut self, result: error::Result<T>) -> String {
        match &result {
            Ok(_) => self.render(),
            Err(err) => console_error(&format!("{}: {err}", err.kind())),
        }
        to_json(&CommandOutput::new(result, self.session.take_events()))
    }

    fn after_events(&mut self, events: &[ViewEvent]) -> String {
        if !events.is_empty() {
            self.render();
        }
        events_to_json(events)
    }
}
