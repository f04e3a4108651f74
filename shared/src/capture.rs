use serde::{Deserialize, Serialize};

use crate::{Point, Segment, Throttle};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct CaptureConfig {
    pub throttle_delay_ms: f64,
    pub background_color: String,
    pub initial_color: String,
    pub initial_width: f64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            throttle_delay_ms: 10.0,
            background_color: "#FFFFFF".to_string(),
            initial_color: "black".to_string(),
            initial_width: 2.0,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Pencil,
    Eraser,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ToolSettings {
    pub tool: Tool,
    pub picker_color: String,
    pub background_color: String,
    pub width: f64,
}

impl ToolSettings {
    /// The eraser paints with the background; the pencil always reads the
    /// picker's latest value.
    pub fn active_color(&self) -> &str {
        match self.tool {
            Tool::Pencil => &self.picker_color,
            Tool::Eraser => &self.background_color,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GestureState {
    pub drawing: bool,
    pub current: Point,
}

/// Turns one client's pointer and touch input into committed segments.
pub struct StrokeCapture {
    gesture: GestureState,
    tools: ToolSettings,
    mouse_throttle: Throttle,
    touch_throttle: Throttle,
}

impl StrokeCapture {
    pub fn new(config: &CaptureConfig) -> Self {
        Self {
            gesture: GestureState::default(),
            tools: ToolSettings {
                tool: Tool::Pencil,
                picker_color: config.initial_color.clone(),
                background_color: config.background_color.clone(),
                width: config.initial_width,
            },
            mouse_throttle: Throttle::new(config.throttle_delay_ms),
            touch_throttle: Throttle::new(config.throttle_delay_ms),
        }
    }

    pub fn gesture(&self) -> GestureState {
        self.gesture
    }

    pub fn tools(&self) -> &ToolSettings {
        &self.tools
    }

    pub fn is_drawing(&self) -> bool {
        self.gesture.drawing
    }

    pub fn begin(&mut self, point: Point) {
        self.gesture.drawing = true;
        self.gesture.current = point;
    }

    /// Mouse move. Runs through the throttle even when no gesture is active.
    pub fn sample(&mut self, point: Point, now_ms: f64) -> Option<Segment> {
        if !self.mouse_throttle.ready(now_ms) {
            return None;
        }
        self.advance(point)
    }

    pub fn end(&mut self, point: Option<Point>) -> Option<Segment> {
        if !self.gesture.drawing {
            return None;
        }
        self.gesture.drawing = false;
        let to = point.unwrap_or(self.gesture.current);
        Some(self.segment_to(to))
    }

    pub fn touch_start(&mut self, point: Point) {
        self.begin(point);
    }

    pub fn touch_move(&mut self, point: Point, now_ms: f64) -> Option<Segment> {
        if !self.touch_throttle.ready(now_ms) {
            return None;
        }
        self.advance(point)
    }

    /// Touch end and cancel carry no coordinates; the last committed point closes the gesture.
    pub fn touch_end(&mut self) -> Option<Segment> {
        self.end(None)
    }

    pub fn set_color(&mut self, color: impl Into<String>) {
        self.tools.picker_color = color.into();
    }

    pub fn set_width(&mut self, width: f64) {
        self.tools.width = width;
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tools.tool = tool;
    }

    pub fn active_color(&self) -> &str {
        self.tools.active_color()
    }

    fn advance(&mut self, point: Point) -> Option<Segment> {
        if !self.gesture.drawing {
            return None;
        }
        let segment = self.segment_to(point);
        self.gesture.current = point;
        Some(segment)
    }

    fn segment_to(&self, to: Point) -> Segment {
        Segment::between(
            self.gesture.current,
            to,
            self.tools.active_color(),
            self.tools.width,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture() -> StrokeCapture {
        StrokeCapture::new(&CaptureConfig::default())
    }

    #[test]
    fn gesture_with_n_moves_yields_n_plus_one_segments() {
        let mut capture = capture();
        let mut segments = Vec::new();
        capture.begin(Point::new(0.0, 0.0));
        for (i, t) in [0.0, 20.0, 40.0].into_iter().enumerate() {
            segments.extend(capture.sample(Point::new(i as f64 + 1.0, 0.0), t));
        }
        segments.extend(capture.end(Some(Point::new(9.0, 9.0))));

        assert_eq!(segments.len(), 4);
        assert_eq!(segments[0].start(), Point::new(0.0, 0.0));
        assert_eq!(segments[0].end(), Point::new(1.0, 0.0));
        assert_eq!(segments[2].end(), Point::new(3.0, 0.0));
        assert_eq!(segments[3].start(), Point::new(3.0, 0.0));
        assert_eq!(segments[3].end(), Point::new(9.0, 9.0));
        assert!(!capture.is_drawing());
    }

    #[test]
    fn throttled_moves_are_lost_not_coalesced() {
        let mut capture = capture();
        capture.begin(Point::new(0.0, 0.0));
        let first = capture.sample(Point::new(1.0, 1.0), 100.0);
        let dropped = capture.sample(Point::new(2.0, 2.0), 105.0);
        let second = capture.sample(Point::new(3.0, 3.0), 110.0);

        assert!(first.is_some());
        assert!(dropped.is_none());
        let second = second.unwrap();
        assert_eq!(second.start(), Point::new(1.0, 1.0));
        assert_eq!(second.end(), Point::new(3.0, 3.0));
    }

    #[test]
    fn stray_move_and_end_are_ignored() {
        let mut capture = capture();
        assert!(capture.sample(Point::new(5.0, 5.0), 0.0).is_none());
        assert!(capture.end(Some(Point::new(5.0, 5.0))).is_none());
        assert!(capture.touch_end().is_none());
        assert_eq!(capture.gesture(), GestureState::default());
    }

    #[test]
    fn second_start_restarts_from_latest_point() {
        let mut capture = capture();
        capture.begin(Point::new(1.0, 1.0));
        capture.begin(Point::new(7.0, 8.0));
        let end = capture.end(Some(Point::new(10.0, 10.0))).unwrap();
        assert_eq!(end.start(), Point::new(7.0, 8.0));
        assert!(capture.end(None).is_none());
    }

    #[test]
    fn touch_end_closes_at_last_point() {
        let mut capture = capture();
        capture.touch_start(Point::new(4.0, 4.0));
        let moved = capture.touch_move(Point::new(6.0, 5.0), 0.0).unwrap();
        assert_eq!(moved.end(), Point::new(6.0, 5.0));
        let end = capture.touch_end().unwrap();
        assert_eq!(end.start(), Point::new(6.0, 5.0));
        assert_eq!(end.end(), Point::new(6.0, 5.0));
    }

    #[test]
    fn mouse_and_touch_streams_throttle_independently() {
        let mut capture = capture();
        capture.begin(Point::new(0.0, 0.0));
        assert!(capture.sample(Point::new(1.0, 0.0), 50.0).is_some());
        assert!(capture.touch_move(Point::new(2.0, 0.0), 51.0).is_some());
        assert!(capture.sample(Point::new(3.0, 0.0), 52.0).is_none());
    }

    #[test]
    fn eraser_uses_background_and_pencil_reads_current_picker() {
        let mut capture = capture();
        capture.set_color("#ff0000");
        capture.set_tool(Tool::Eraser);
        capture.set_color("#00ff00");
        capture.begin(Point::new(0.0, 0.0));
        let erased = capture.sample(Point::new(1.0, 1.0), 0.0).unwrap();
        assert_eq!(erased.color, "#FFFFFF");

        capture.set_tool(Tool::Pencil);
        let drawn = capture.sample(Point::new(2.0, 2.0), 10.0).unwrap();
        assert_eq!(drawn.color, "#00ff00");
    }

    #[test]
    fn tool_switch_mid_gesture_only_affects_later_segments() {
        let mut capture = capture();
        capture.set_width(6.0);
        capture.begin(Point::new(0.0, 0.0));
        let before = capture.sample(Point::new(1.0, 1.0), 0.0).unwrap();
        capture.set_tool(Tool::Eraser);
        capture.set_width(20.0);
        let after = capture.end(Some(Point::new(2.0, 2.0))).unwrap();

        assert_eq!(before.color, "black");
        assert_eq!(before.width, 6.0);
        assert_eq!(after.color, "#FFFFFF");
        assert_eq!(after.width, 20.0);
    }

    #[test]
    fn config_fields_default_when_missing() {
        let config: CaptureConfig = serde_json::from_str(r#"{"initial_width": 5}"#).unwrap();
        assert_eq!(config.initial_width, 5.0);
        assert_eq!(config.throttle_delay_ms, 10.0);
        assert_eq!(capture().tools().tool, Tool::Pencil);
    }
}
