use crate::{encode, CanvasSize, Segment, WireEvent};

/// Something a segment can be stroked onto.
///
/// Implementations stroke a single path from `(x0, y0)` to `(x1, y1)` with
/// round caps and joins, in the segment's color and width.
pub trait Surface {
    fn size(&self) -> CanvasSize;
    fn stroke_segment(&mut self, segment: &Segment);
    fn clear(&mut self);
}

/// Outbound half of the relay. Publishing is fire-and-forget.
pub trait Relay {
    fn publish(&self, event: &WireEvent);
}

/// Shared by local drawing and replay so both render identically.
pub fn draw_line<S, R>(surface: &mut S, relay: &R, segment: &Segment, emit: bool)
where
    S: Surface + ?Sized,
    R: Relay + ?Sized,
{
    surface.stroke_segment(segment);
    if !emit {
        return;
    }
    let size = surface.size();
    if !size.is_drawable() {
        log::debug!(
            "not publishing segment from a {}x{} canvas",
            size.width,
            size.height
        );
        return;
    }
    relay.publish(&WireEvent::Drawing(encode(segment, size)));
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    struct Recorder {
        size: CanvasSize,
        stroked: Vec<Segment>,
    }

    impl Surface for Recorder {
        fn size(&self) -> CanvasSize {
            self.size
        }

        fn stroke_segment(&mut self, segment: &Segment) {
            self.stroked.push(segment.clone());
        }

        fn clear(&mut self) {
            self.stroked.clear();
        }
    }

    #[derive(Default)]
    struct Outbox(RefCell<Vec<WireEvent>>);

    impl Relay for Outbox {
        fn publish(&self, event: &WireEvent) {
            self.0.borrow_mut().push(event.clone());
        }
    }

    fn segment() -> Segment {
        Segment {
            x0: 100.0,
            y0: 50.0,
            x1: 200.0,
            y1: 150.0,
            color: "blue".to_string(),
            width: 3.0,
        }
    }

    #[test]
    fn emit_strokes_then_publishes_normalized() {
        let mut surface = Recorder {
            size: CanvasSize::new(400.0, 200.0),
            stroked: Vec::new(),
        };
        let outbox = Outbox::default();
        draw_line(&mut surface, &outbox, &segment(), true);

        assert_eq!(surface.stroked, vec![segment()]);
        let sent = outbox.0.borrow();
        assert_eq!(sent.len(), 1);
        let WireEvent::Drawing(wire) = &sent[0];
        assert_eq!((wire.x0, wire.y0, wire.x1, wire.y1), (0.25, 0.25, 0.5, 0.75));
        assert_eq!(wire.width, 3.0);
    }

    #[test]
    fn local_only_redraw_does_not_publish() {
        let mut surface = Recorder {
            size: CanvasSize::new(400.0, 200.0),
            stroked: Vec::new(),
        };
        let outbox = Outbox::default();
        draw_line(&mut surface, &outbox, &segment(), false);

        assert_eq!(surface.stroked.len(), 1);
        assert!(outbox.0.borrow().is_empty());
    }

    #[test]
    fn zero_area_canvas_rasterizes_without_publishing() {
        let mut surface = Recorder {
            size: CanvasSize::new(400.0, 0.0),
            stroked: Vec::new(),
        };
        let outbox = Outbox::default();
        draw_line(&mut surface, &outbox, &segment(), true);

        assert_eq!(surface.stroked.len(), 1);
        assert!(outbox.0.borrow().is_empty());
    }
}
