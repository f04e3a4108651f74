use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlCanvasElement, HtmlElement, HtmlSpanElement, Window};

use relayboard_shared::{layout_size, Point, Tool, Whiteboard};

use crate::render::CanvasSurface;

pub fn get_element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element: {id}")))?;
    element
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Invalid element type: {id}")))
}

pub fn query_element<T: JsCast>(document: &Document, selector: &str) -> Result<T, JsValue> {
    let element = document
        .query_selector(selector)?
        .ok_or_else(|| JsValue::from_str(&format!("Missing element: {selector}")))?;
    element
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Invalid element type: {selector}")))
}

/// Viewport coordinates to canvas pixels.
pub fn client_to_canvas(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> Point {
    let rect = canvas.get_bounding_client_rect();
    Point::new(
        client_x as f64 - rect.left(),
        client_y as f64 - rect.top(),
    )
}

/// Fits the canvas to the window below the toolbar. The browser wipes the
/// bitmap when its size changes.
pub fn resize_canvas(window: &Window, toolbar: &HtmlElement, board: &mut Whiteboard<CanvasSurface>) {
    let width = window
        .inner_width()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0);
    let height = window
        .inner_height()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0);
    let size = layout_size(width, height, toolbar.offset_height() as f64);
    log::debug!("Resizing canvas to {}x{}", size.width, size.height);
    board.surface_mut().resize(size);
}

/// Slider values arrive as strings.
pub fn parse_width(value: &str) -> Option<f64> {
    let width = value.trim().parse::<f64>().ok()?;
    (width.is_finite() && width > 0.0).then_some(width)
}

pub fn update_width_label(label: &HtmlSpanElement, width: f64) {
    label.set_text_content(Some(&format!("{width}px")));
}

pub fn set_tool_buttons(pencil: &HtmlElement, eraser: &HtmlElement, tool: Tool) {
    let (active, inactive) = match tool {
        Tool::Pencil => (pencil, eraser),
        Tool::Eraser => (eraser, pencil),
    };
    let _ = active.class_list().add_1("active");
    let _ = inactive.class_list().remove_1("active");
}

/// The floating brush preview that follows the mouse.
pub struct Cursor {
    element: HtmlElement,
}

impl Cursor {
    pub fn new(element: HtmlElement) -> Self {
        Self { element }
    }

    fn set(&self, property: &str, value: &str) {
        let _ = self.element.style().set_property(property, value);
    }

    pub fn move_to(&self, client_x: i32, client_y: i32) {
        self.set("left", &format!("{client_x}px"));
        self.set("top", &format!("{client_y}px"));
    }

    pub fn show(&self) {
        self.set("display", "block");
    }

    pub fn hide(&self) {
        self.set("display", "none");
    }

    pub fn set_size(&self, width: f64) {
        self.set("width", &format!("{width}px"));
        self.set("height", &format!("{width}px"));
    }

    fn set_fill(&self, color: &str) {
        self.set("background-color", color);
    }

    pub fn style_for(&self, tool: Tool, color: &str) {
        match tool {
            Tool::Pencil => {
                self.set("border", "2px solid #fff");
                self.set_fill(color);
            }
            Tool::Eraser => {
                self.set("border", "2px solid #000");
                self.set_fill("rgba(255, 255, 255, 0.5)");
            }
        }
    }
}
