//! Pointer input for mouse and touch.
//!
//! Mouse and touch events carry different payloads but resolve through the
//! same path: a touch is treated as a mouse at its first contact point.

use crate::viewport::{SurfaceRect, Viewport};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Where a pointer sample came from, in client coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "device", rename_all = "lowercase")]
pub enum PointerSource {
    Mouse { x: f64, y: f64 },
    /// Active touch points; only the first one is honored.
    Touch { touches: Vec<Point> },
}

impl PointerSource {
    pub fn mouse(x: f64, y: f64) -> Self {
        PointerSource::Mouse { x, y }
    }

    pub fn touch(touches: Vec<Point>) -> Self {
        PointerSource::Touch { touches }
    }

    /// The client position this sample stands for.
    pub fn client_position(&self) -> Option<Point> {
        match self {
            PointerSource::Mouse { x, y } => Some(Point::new(*x, *y)),
            PointerSource::Touch { touches } => touches.first().copied(),
        }
    }
}

/// Pointer event type for unified mouse/touch handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PointerEvent {
    Down(PointerSource),
    Move(PointerSource),
    Up,
    /// Pointer left the surface; ends the gesture like `Up`.
    Leave,
}

/// Resolve a pointer sample into buffer space.
///
/// Returns `None` when the surface has no pixels yet or a touch event
/// arrived without any touch points.
pub fn resolve_position(
    source: &PointerSource,
    viewport: &Viewport,
    rect: &SurfaceRect,
) -> Option<Point> {
    let client = source.client_position()?;
    viewport.display_to_buffer(client, rect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;

    fn setup() -> (Viewport, SurfaceRect) {
        (
            Viewport::new(Size::new(400.0, 300.0)),
            SurfaceRect::new(10.0, 20.0, 400.0, 300.0),
        )
    }

    #[test]
    fn test_mouse_and_touch_agree() {
        let (viewport, rect) = setup();
        let mouse = resolve_position(&PointerSource::mouse(60.0, 70.0), &viewport, &rect);
        let touch = resolve_position(
            &PointerSource::touch(vec![Point::new(60.0, 70.0)]),
            &viewport,
            &rect,
        );
        assert_eq!(mouse, touch);
        assert_eq!(mouse, Some(Point::new(50.0, 50.0)));
    }

    #[test]
    fn test_only_first_touch_counts() {
        let (viewport, rect) = setup();
        let p = resolve_position(
            &PointerSource::touch(vec![Point::new(30.0, 40.0), Point::new(300.0, 200.0)]),
            &viewport,
            &rect,
        );
        assert_eq!(p, Some(Point::new(20.0, 20.0)));
    }

    #[test]
    fn test_touch_without_points() {
        let (viewport, rect) = setup();
        assert!(resolve_position(&PointerSource::touch(vec![]), &viewport, &rect).is_none());
    }

    #[test]
    fn test_event_serde() {
        let event: PointerEvent =
            serde_json::from_str(r#"{ "kind": "down", "device": "mouse", "x": 1.0, "y": 2.0 }"#)
                .unwrap();
        assert_eq!(event, PointerEvent::Down(PointerSource::mouse(1.0, 2.0)));

        let up: PointerEvent = serde_json::from_str(r#"{ "kind": "up" }"#).unwrap();
        assert_eq!(up, PointerEvent::Up);
    }
}
