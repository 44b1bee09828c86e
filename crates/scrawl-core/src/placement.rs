//! Background image placement and its manipulation handles.

use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Smallest width or height a resize can produce.
pub const MIN_IMAGE_SIZE: f64 = 50.0;
/// Side of the square at the image's bottom-right corner that grabs a resize.
pub const RESIZE_HIT_SIZE: f64 = 10.0;
/// Side of the drawn resize handle.
pub const RESIZE_HANDLE_SIZE: f64 = 8.0;
/// Width of the frame drawn around the image.
pub const FRAME_WIDTH: f64 = 2.0;

/// What part of the image a press landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageHit {
    /// The bottom-right resize zone.
    ResizeHandle,
    /// Anywhere else inside the image.
    Body,
}

/// Where the background image sits on the surface, in buffer units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImagePlacement {
    /// Top-left corner.
    pub position: Point,
    pub size: Size,
}

impl ImagePlacement {
    pub fn new(position: Point, size: Size) -> Self {
        Self { position, size }
    }

    /// Placement for a freshly loaded image: natural size at the origin.
    pub fn at_origin(width: u32, height: u32) -> Self {
        Self::new(Point::ZERO, Size::new(width as f64, height as f64))
    }

    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    /// The drawn handle square, inset into the bottom-right corner.
    pub fn handle_rect(&self) -> Rect {
        let rect = self.rect();
        Rect::new(
            rect.x1 - RESIZE_HANDLE_SIZE,
            rect.y1 - RESIZE_HANDLE_SIZE,
            rect.x1,
            rect.y1,
        )
    }

    /// Hit test a buffer-space point. Edges are inclusive.
    pub fn hit_test(&self, point: Point) -> Option<ImageHit> {
        let rect = self.rect();
        let inside = point.x >= rect.x0
            && point.x <= rect.x1
            && point.y >= rect.y0
            && point.y <= rect.y1;
        if !inside {
            return None;
        }
        if point.x >= rect.x1 - RESIZE_HIT_SIZE && point.y >= rect.y1 - RESIZE_HIT_SIZE {
            Some(ImageHit::ResizeHandle)
        } else {
            Some(ImageHit::Body)
        }
    }

    /// Offset from the top-left corner to a grab point.
    pub fn grab_offset(&self, point: Point) -> Vec2 {
        point - self.position
    }

    /// Size produced by dragging the bottom-right corner to `cursor`.
    pub fn resized_to(&self, cursor: Point) -> Size {
        Size::new(
            (cursor.x - self.position.x).max(MIN_IMAGE_SIZE),
            (cursor.y - self.position.y).max(MIN_IMAGE_SIZE),
        )
    }

    /// Top-left produced by dragging with `grab` held at `cursor`, kept
    /// inside a surface of size `surface`.
    pub fn dragged_to(&self, cursor: Point, grab: Vec2, surface: Size) -> Point {
        let target = cursor - grab;
        Point::new(
            target.x.min(surface.width - self.size.width).max(0.0),
            target.y.min(surface.height - self.size.height).max(0.0),
        )
    }
}
