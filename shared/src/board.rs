use crate::{
    decode, draw_line, CaptureConfig, Point, Relay, Segment, StrokeCapture, Surface, Tool,
    WireError, WireEvent, WireSegment,
};

struct LocalOnly;

impl Relay for LocalOnly {
    fn publish(&self, _event: &WireEvent) {}
}

/// One client's drawing session: its surface plus the capture state feeding it.
pub struct Whiteboard<S> {
    surface: S,
    capture: StrokeCapture,
}

impl<S: Surface> Whiteboard<S> {
    pub fn new(surface: S, config: &CaptureConfig) -> Self {
        Self {
            surface,
            capture: StrokeCapture::new(config),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn capture(&self) -> &StrokeCapture {
        &self.capture
    }

    pub fn pointer_down(&mut self, point: Point) {
        self.capture.begin(point);
    }

    pub fn pointer_move(&mut self, point: Point, now_ms: f64, relay: &impl Relay) {
        let segment = self.capture.sample(point, now_ms);
        self.commit(segment, relay);
    }

    pub fn pointer_up(&mut self, point: Point, relay: &impl Relay) {
        let segment = self.capture.end(Some(point));
        self.commit(segment, relay);
    }

    pub fn touch_start(&mut self, point: Point) {
        self.capture.touch_start(point);
    }

    pub fn touch_move(&mut self, point: Point, now_ms: f64, relay: &impl Relay) {
        let segment = self.capture.touch_move(point, now_ms);
        self.commit(segment, relay);
    }

    pub fn touch_end(&mut self, relay: &impl Relay) {
        let segment = self.capture.touch_end();
        self.commit(segment, relay);
    }

    pub fn set_color(&mut self, color: impl Into<String>) {
        self.capture.set_color(color);
    }

    pub fn set_width(&mut self, width: f64) {
        self.capture.set_width(width);
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.capture.set_tool(tool);
    }

    /// Erases this client's surface only. Peers keep their pixels.
    pub fn clear(&mut self) {
        self.surface.clear();
    }

    /// Draws a peer's segment scaled to this canvas. Gesture state is not touched.
    pub fn replay(&mut self, wire: &WireSegment) {
        let segment = decode(wire, self.surface.size());
        draw_line(&mut self.surface, &LocalOnly, &segment, false);
    }

    pub fn receive(&mut self, text: &str) -> Result<(), WireError> {
        match WireEvent::from_json(text) {
            Ok(WireEvent::Drawing(wire)) => {
                self.replay(&wire);
                Ok(())
            }
            Err(error) => {
                log::warn!("dropping relay frame: {error}");
                Err(error)
            }
        }
    }

    fn commit(&mut self, segment: Option<Segment>, relay: &impl Relay) {
        if let Some(segment) = segment {
            draw_line(&mut self.surface, relay, &segment, true);
        }
    }
}
