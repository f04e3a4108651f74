use serde::{Deserialize, Serialize};

mod board;
mod capture;
mod render;
mod throttle;
mod wire;

pub use board::Whiteboard;
pub use capture::{CaptureConfig, GestureState, StrokeCapture, Tool, ToolSettings};
pub use render::{draw_line, Relay, Surface};
pub use throttle::Throttle;
pub use wire::{decode, encode, WireError, WireEvent, WireSegment, DRAWING_EVENT, MAX_COLOR_LEN};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A straight line between two points in local canvas pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub color: String,
    pub width: f64,
}

impl Segment {
    pub fn between(from: Point, to: Point, color: impl Into<String>, width: f64) -> Self {
        Self {
            x0: from.x,
            y0: from.y,
            x1: to.x,
            y1: to.y,
            color: color.into(),
            width,
        }
    }

    pub fn start(&self) -> Point {
        Point::new(self.x0, self.y0)
    }

    pub fn end(&self) -> Point {
        Point::new(self.x1, self.y1)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Canvas dimensions for a window, leaving room for the toolbar above the board.
pub fn layout_size(window_width: f64, window_height: f64, toolbar_height: f64) -> CanvasSize {
    CanvasSize {
        width: window_width.max(0.0).floor(),
        height: (window_height - toolbar_height).max(0.0).floor(),
    }
}
