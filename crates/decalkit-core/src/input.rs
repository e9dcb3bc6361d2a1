//! Pointer events delivered by the host surface.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Pointer event type for unified mouse/touch handling.
///
/// Positions are client (screen) coordinates; the engine subtracts the
/// surface origin before hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    Down { position: Point },
    Move { position: Point },
    Up { position: Point },
    /// Wheel notch; positive `delta_y` scrolls down.
    Wheel { delta_y: f64 },
}

impl PointerEvent {
    /// Position of the event, if it carries one.
    pub fn position(&self) -> Option<Point> {
        match *self {
            PointerEvent::Down { position }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position } => Some(position),
            PointerEvent::Wheel { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_from_json() {
        let event: PointerEvent =
            serde_json::from_str(r#"{ "type": "down", "position": { "x": 3.0, "y": 4.0 } }"#).unwrap();
        assert_eq!(event, PointerEvent::Down { position: Point::new(3.0, 4.0) });
        assert_eq!(event.position(), Some(Point::new(3.0, 4.0)));

        let wheel: PointerEvent = serde_json::from_str(r#"{ "type": "wheel", "delta_y": -120.0 }"#).unwrap();
        assert_eq!(wheel.position(), None);
    }
}
