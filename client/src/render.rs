use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use relayboard_shared::{CanvasSize, Segment, Surface};

/// The page's 2d canvas as a drawing surface.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("Missing canvas context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Changing the backing size also wipes the bitmap.
    pub fn resize(&mut self, size: CanvasSize) {
        self.canvas.set_width(size.width as u32);
        self.canvas.set_height(size.height as u32);
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> CanvasSize {
        CanvasSize::new(self.canvas.width() as f64, self.canvas.height() as f64)
    }

    fn stroke_segment(&mut self, segment: &Segment) {
        let ctx = &self.ctx;
        ctx.begin_path();
        ctx.move_to(segment.x0, segment.y0);
        ctx.line_to(segment.x1, segment.y1);
        ctx.set_stroke_style_str(&segment.color);
        ctx.set_line_width(segment.width);
        ctx.set_line_cap("round");
        ctx.set_line_join("round");
        ctx.stroke();
        ctx.close_path();
    }

    fn clear(&mut self) {
        let size = self.size();
        self.ctx.clear_rect(0.0, 0.0, size.width, size.height);
    }
}
