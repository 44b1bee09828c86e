//! Oversampled pixel buffer.
//!
//! Every drawing call takes geometry in buffer space (logical units) and
//! goes through the viewport's pixel transform, so callers never deal with
//! the oversampling factor.

use crate::image::DecodedImage;
use kurbo::{BezPath, PathEl, Rect};
use scrawl_core::{Rgba, Viewport};
use std::fmt;
use tiny_skia::{
    FillRule, FilterQuality, LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, PixmapPaint,
    Stroke, StrokeDash, Transform,
};

/// How a path outline is stroked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub width: f64,
    /// On/off dash lengths in buffer units.
    pub dash: Option<(f64, f64)>,
    /// Round caps and joins (paint tools) instead of butt/miter (overlays).
    pub round: bool,
}

impl LineStyle {
    pub fn solid(width: f64) -> Self {
        Self {
            width,
            dash: None,
            round: false,
        }
    }

    pub fn round(width: f64) -> Self {
        Self {
            round: true,
            ..Self::solid(width)
        }
    }

    pub fn dashed(width: f64, on: f64, off: f64) -> Self {
        Self {
            dash: Some((on, off)),
            ..Self::solid(width)
        }
    }

    fn to_stroke(self) -> Stroke {
        let (line_cap, line_join) = if self.round {
            (LineCap::Round, LineJoin::Round)
        } else {
            (LineCap::Butt, LineJoin::Miter)
        };
        Stroke {
            width: self.width as f32,
            line_cap,
            line_join,
            dash: self
                .dash
                .and_then(|(on, off)| StrokeDash::new(vec![on as f32, off as f32], 0.0)),
            ..Stroke::default()
        }
    }
}

/// The surface's raster target plus the pre-stroke snapshot used by shape
/// previews.
#[derive(Clone)]
pub struct RasterBuffer {
    pixmap: Pixmap,
    viewport: Viewport,
    snapshot: Option<Pixmap>,
}

impl fmt::Debug for RasterBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterBuffer")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .field("viewport", &self.viewport)
            .field("has_snapshot", &self.snapshot.is_some())
            .finish()
    }
}

impl RasterBuffer {
    /// Allocate a buffer for the viewport. `None` while the viewport is empty.
    pub fn new(viewport: Viewport) -> Option<Self> {
        let (width, height) = viewport.physical_size();
        let pixmap = Pixmap::new(width, height)?;
        Some(Self {
            pixmap,
            viewport,
            snapshot: None,
        })
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Physical width in pixels.
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Physical height in pixels.
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Raw premultiplied RGBA bytes, row-major, physical resolution.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Straight-alpha RGBA bytes, suitable for encoders.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect()
    }

    /// Color at a physical pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some(Rgba::new(c.red(), c.green(), c.blue(), c.alpha()))
    }

    pub(crate) fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    fn transform(&self) -> Transform {
        let f = self.viewport.factor() as f32;
        Transform::from_scale(f, f)
    }

    /// Overwrite every pixel.
    pub fn fill(&mut self, color: Rgba) {
        self.pixmap
            .fill(tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.a));
    }

    pub fn fill_path(&mut self, path: &BezPath, color: Rgba) {
        let Some(path) = to_skia_path(path) else {
            return;
        };
        let transform = self.transform();
        self.pixmap
            .fill_path(&path, &paint(color), FillRule::Winding, transform, None);
    }

    pub fn stroke_path(&mut self, path: &BezPath, color: Rgba, style: LineStyle) {
        let Some(path) = to_skia_path(path) else {
            return;
        };
        let transform = self.transform();
        self.pixmap
            .stroke_path(&path, &paint(color), &style.to_stroke(), transform, None);
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        let Some(rect) = tiny_skia::Rect::from_ltrb(
            rect.x0 as f32,
            rect.y0 as f32,
            rect.x1 as f32,
            rect.y1 as f32,
        ) else {
            return;
        };
        let transform = self.transform();
        self.pixmap.fill_rect(rect, &paint(color), transform, None);
    }

    /// Draw an image scaled into `dest`.
    pub fn draw_image(&mut self, image: &DecodedImage, dest: Rect) {
        let f = self.viewport.factor();
        let sx = dest.width() / image.width() as f64;
        let sy = dest.height() / image.height() as f64;
        let transform = Transform::from_row(
            (sx * f) as f32,
            0.0,
            0.0,
            (sy * f) as f32,
            (dest.x0 * f) as f32,
            (dest.y0 * f) as f32,
        );
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        self.pixmap
            .draw_pixmap(0, 0, image.pixmap().as_ref(), &paint, transform, None);
    }

    /// Copy the current pixels aside.
    pub fn snapshot(&mut self) {
        self.snapshot = Some(self.pixmap.clone());
    }

    pub fn has_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Put the snapshot pixels back. The snapshot is kept for the next move.
    pub fn restore_snapshot(&mut self) -> bool {
        match &self.snapshot {
            Some(snapshot) => {
                self.pixmap.data_mut().copy_from_slice(snapshot.data());
                true
            }
            None => false,
        }
    }

    pub fn discard_snapshot(&mut self) {
        self.snapshot = None;
    }
}

fn paint(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

/// Convert a kurbo path. Returns `None` for paths the rasterizer rejects
/// (empty, or without a valid bounding box).
fn to_skia_path(path: &BezPath) -> Option<Path> {
    let mut builder = PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => builder.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => builder.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(p1, p2) => {
                builder.quad_to(p1.x as f32, p1.y as f32, p2.x as f32, p2.y as f32)
            }
            PathEl::CurveTo(p1, p2, p3) => builder.cubic_to(
                p1.x as f32,
                p1.y as f32,
                p2.x as f32,
                p2.y as f32,
                p3.x as f32,
                p3.y as f32,
            ),
            PathEl::ClosePath => builder.close(),
        }
    }
    builder.finish()
}
