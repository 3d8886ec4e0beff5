//! `Surface` backed by a browser `CanvasRenderingContext2d`

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::surface::{Surface, TextAlign, TextBaseline};
use crate::error::GameError;

pub struct Canvas2d {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Canvas2d {
    /// Look up a `<canvas>` by id and take its 2D context
    pub fn from_element_id(id: &str) -> Result<Self, GameError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| GameError::SurfaceUnavailable("no document".into()))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(id)
            .ok_or_else(|| GameError::SurfaceUnavailable(format!("no element #{id}")))?
            .dyn_into()
            .map_err(|_| GameError::SurfaceUnavailable(format!("#{id} is not a canvas")))?;
        Self::new(canvas)
    }

    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, GameError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| GameError::SurfaceUnavailable(format!("{:?}", e)))?
            .ok_or_else(|| GameError::SurfaceUnavailable("2d context refused".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| GameError::SurfaceUnavailable("unexpected context type".into()))?;
        log::info!("Canvas ready: {}x{}", canvas.width(), canvas.height());
        Ok(Self { canvas, ctx })
    }

    /// Set the backing store size to the logical game resolution
    pub fn resize(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }
}

impl Surface for Canvas2d {
    fn set_fill_style(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
    }

    fn set_stroke_style(&mut self, color: &str, line_width: f64) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(line_width);
    }

    fn set_font(&mut self, font: &str) {
        self.ctx.set_font(font);
    }

    fn set_text_layout(&mut self, align: TextAlign, baseline: TextBaseline) {
        self.ctx.set_text_align(align.as_str());
        self.ctx.set_text_baseline(baseline.as_str());
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.fill_rect(x, y, w, h);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) {
        self.ctx.quadratic_curve_to(cpx, cpy, x, y);
    }

    fn circle(&mut self, x: f64, y: f64, radius: f64) {
        if let Err(e) = self.ctx.arc(x, y, radius.max(0.0), 0.0, std::f64::consts::TAU) {
            log::warn!("arc failed: {:?}", e);
        }
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn fill(&mut self) {
        self.ctx.fill();
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        let _ = self.ctx.fill_text(text, x, y);
    }

    fn measure_text(&mut self, text: &str) -> f64 {
        self.ctx
            .measure_text(text)
            .map(|m| m.width())
            .unwrap_or(0.0)
    }
}
