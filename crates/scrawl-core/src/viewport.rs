//! Display-to-buffer coordinate transform.
//!
//! The surface keeps its pixels at `OVERSAMPLING` times the displayed size.
//! All drawing happens in buffer space (logical units); the raster layer
//! applies [`Viewport::pixel_transform`] to reach physical pixels.

use kurbo::{Affine, Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Physical pixels per logical unit.
pub const OVERSAMPLING: f64 = 2.0;

/// The surface's rectangle on screen, in display (client) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl SurfaceRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// A rect at the client origin with the given displayed size.
    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }
}

/// Logical and physical dimensions of the surface buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    logical: Size,
    factor: f64,
}

impl Viewport {
    /// Viewport for a container of the given displayed size.
    pub fn new(logical: Size) -> Self {
        Self::with_factor(logical, OVERSAMPLING)
    }

    pub fn with_factor(logical: Size, factor: f64) -> Self {
        let clean = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
        Self {
            logical: Size::new(clean(logical.width), clean(logical.height)),
            factor: if factor.is_finite() && factor > 0.0 {
                factor
            } else {
                OVERSAMPLING
            },
        }
    }

    pub fn logical_size(&self) -> Size {
        self.logical
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Buffer dimensions in physical pixels.
    pub fn physical_size(&self) -> (u32, u32) {
        (
            (self.logical.width * self.factor).round() as u32,
            (self.logical.height * self.factor).round() as u32,
        )
    }

    /// No pixels to draw into (container not laid out yet).
    pub fn is_empty(&self) -> bool {
        let (w, h) = self.physical_size();
        w == 0 || h == 0
    }

    pub fn bounds(&self) -> Rect {
        self.logical.to_rect()
    }

    /// Buffer space to physical pixels.
    pub fn pixel_transform(&self) -> Affine {
        Affine::scale(self.factor)
    }

    /// Per-axis scale from display units to buffer units for an on-screen rect.
    fn display_scale(&self, rect: &SurfaceRect) -> Option<(f64, f64)> {
        if rect.width <= 0.0 || rect.height <= 0.0 || self.is_empty() {
            return None;
        }
        let (pw, ph) = self.physical_size();
        Some((
            pw as f64 / rect.width / self.factor,
            ph as f64 / rect.height / self.factor,
        ))
    }

    /// Convert a client-space point to buffer space.
    pub fn display_to_buffer(&self, client: Point, rect: &SurfaceRect) -> Option<Point> {
        let (sx, sy) = self.display_scale(rect)?;
        Some(Point::new(
            (client.x - rect.left) * sx,
            (client.y - rect.top) * sy,
        ))
    }

    /// Convert a buffer-space point back to client space.
    pub fn buffer_to_display(&self, point: Point, rect: &SurfaceRect) -> Option<Point> {
        let (sx, sy) = self.display_scale(rect)?;
        Some(Point::new(
            point.x / sx + rect.left,
            point.y / sy + rect.top,
        ))
    }
}
