//! [`Surface`] on a browser 2D canvas context

use tracing::trace;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::core::{Rgba, Size, Stop, Surface, Vec2};
use crate::error::MountError;

const TAU: f64 = std::f64::consts::TAU;

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    size: Size,
    dpr: f64,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, id: &str) -> Result<Self, MountError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| MountError::NoContext(id.to_string()))?
            .ok_or_else(|| MountError::NoContext(id.to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| MountError::NoContext(id.to_string()))?;
        Ok(Self { canvas, ctx, size: Size::default(), dpr: 1.0 })
    }

    /// Size the backing store to `css × dpr` and return the logical size
    /// read back from it, which is what effects draw in.
    pub fn fit(&mut self, css: Size, dpr: f64) -> Size {
        self.dpr = if dpr > 0.0 { dpr } else { 1.0 };
        self.canvas.set_width((css.width * self.dpr).max(0.0) as u32);
        self.canvas.set_height((css.height * self.dpr).max(0.0) as u32);
        self.size = Size::from_physical(self.canvas.width() as f64, self.canvas.height() as f64, self.dpr);
        trace!(width = self.size.width, height = self.size.height, dpr = self.dpr, "Canvas resized");
        self.size
    }

    /// Reset the transform to logical coordinates. Called at the start of
    /// every frame so the DPR scale never accumulates.
    pub fn begin_frame(&self) {
        let _ = self.ctx.set_transform(self.dpr, 0.0, 0.0, self.dpr, 0.0, 0.0);
    }

    #[allow(deprecated)]
    fn set_fill(&self, color: Rgba) {
        self.ctx.set_fill_style(&JsValue::from_str(&color.css()));
    }

    #[allow(deprecated)]
    fn set_stroke(&self, color: Rgba, width: f64) {
        self.ctx.set_stroke_style(&JsValue::from_str(&color.css()));
        self.ctx.set_line_width(width);
    }

    fn trace_path(&self, points: &[Vec2]) {
        self.ctx.begin_path();
        let mut iter = points.iter();
        if let Some(first) = iter.next() {
            self.ctx.move_to(first.x, first.y);
        }
        for p in iter {
            self.ctx.line_to(p.x, p.y);
        }
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, self.size.width, self.size.height);
    }

    #[allow(deprecated)]
    fn fill_vertical_gradient(&mut self, stops: &[Stop]) {
        let gradient = self.ctx.create_linear_gradient(0.0, 0.0, 0.0, self.size.height);
        for (offset, color) in stops {
            let _ = gradient.add_color_stop(*offset as f32, &color.css());
        }
        self.ctx.set_fill_style(&gradient);
        self.ctx.fill_rect(0.0, 0.0, self.size.width, self.size.height);
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f64) {
        self.set_stroke(color, width);
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.stroke();
    }

    fn stroke_path(&mut self, points: &[Vec2], closed: bool, color: Rgba, width: f64) {
        self.set_stroke(color, width);
        self.trace_path(points);
        if closed {
            self.ctx.close_path();
        }
        self.ctx.stroke();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f64, color: Rgba) {
        self.set_fill(color);
        self.ctx.begin_path();
        let _ = self.ctx.arc(center.x, center.y, radius.max(0.0), 0.0, TAU);
        self.ctx.fill();
    }

    #[allow(deprecated)]
    fn fill_glow(&mut self, center: Vec2, radius: f64, stops: &[Stop]) {
        let radius = radius.max(0.0);
        let Ok(gradient) =
            self.ctx.create_radial_gradient(center.x, center.y, 0.0, center.x, center.y, radius)
        else {
            return;
        };
        for (offset, color) in stops {
            let _ = gradient.add_color_stop(*offset as f32, &color.css());
        }
        self.ctx.set_fill_style(&gradient);
        self.ctx.begin_path();
        let _ = self.ctx.arc(center.x, center.y, radius, 0.0, TAU);
        self.ctx.fill();
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, size_px: f64, color: Rgba) {
        self.set_fill(color);
        self.ctx.set_font(&format!("{size_px}px monospace"));
        let _ = self.ctx.fill_text(text, pos.x, pos.y);
    }
}
