use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{CanvasSize, Segment};

pub const DRAWING_EVENT: &str = "drawing";
pub const MAX_COLOR_LEN: usize = 64;

/// A segment expressed as fractions of the sender's canvas size.
///
/// Coordinates are not clamped: a gesture that leaves the canvas produces
/// values outside `[0, 1]`. The width stays in sender pixels and is not
/// rescaled on decode, so the same stroke looks thicker on a smaller canvas.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WireSegment {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub color: String,
    #[serde(deserialize_with = "width_from_number_or_string")]
    pub width: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum WireEvent {
    #[serde(rename = "drawing")]
    Drawing(WireSegment),
}

#[derive(Debug, Error)]
pub enum WireError {
    #[error("malformed event: {0}")]
    Json(#[from] serde_json::Error),
    #[error("field `{0}` is not a finite number")]
    NonFinite(&'static str),
    #[error("color is empty")]
    EmptyColor,
    #[error("color is {0} bytes long, limit is {MAX_COLOR_LEN}")]
    ColorTooLong(usize),
    #[error("width must be positive, got {0}")]
    InvalidWidth(f64),
}

pub fn encode(segment: &Segment, size: CanvasSize) -> WireSegment {
    WireSegment {
        x0: segment.x0 / size.width,
        y0: segment.y0 / size.height,
        x1: segment.x1 / size.width,
        y1: segment.y1 / size.height,
        color: segment.color.clone(),
        width: segment.width,
    }
}

pub fn decode(wire: &WireSegment, size: CanvasSize) -> Segment {
    Segment {
        x0: wire.x0 * size.width,
        y0: wire.y0 * size.height,
        x1: wire.x1 * size.width,
        y1: wire.y1 * size.height,
        color: wire.color.clone(),
        width: wire.width,
    }
}

impl WireSegment {
    /// Rejects payloads that would poison the canvas state. Coordinates outside
    /// the unit square are accepted.
    pub fn validate(&self) -> Result<(), WireError> {
        for (field, value) in [
            ("x0", self.x0),
            ("y0", self.y0),
            ("x1", self.x1),
            ("y1", self.y1),
            ("width", self.width),
        ] {
            if !value.is_finite() {
                return Err(WireError::NonFinite(field));
            }
        }
        if self.color.trim().is_empty() {
            return Err(WireError::EmptyColor);
        }
        if self.color.len() > MAX_COLOR_LEN {
            return Err(WireError::ColorTooLong(self.color.len()));
        }
        if self.width <= 0.0 {
            return Err(WireError::InvalidWidth(self.width));
        }
        Ok(())
    }
}

impl WireEvent {
    pub fn name(&self) -> &'static str {
        match self {
            WireEvent::Drawing(_) => DRAWING_EVENT,
        }
    }

    pub fn from_json(text: &str) -> Result<Self, WireError> {
        let event = serde_json::from_str::<WireEvent>(text)?;
        match &event {
            WireEvent::Drawing(segment) => segment.validate()?,
        }
        Ok(event)
    }

    pub fn to_json(&self) -> Result<String, WireError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

fn width_from_number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(value) => Ok(value),
        NumberOrString::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| de::Error::custom(format!("width {text:?} is not numeric"))),
    }
}
