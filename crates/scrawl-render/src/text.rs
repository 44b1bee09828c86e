//! Table text rasterization.
//!
//! Glyphs are rasterized with fontdue at physical resolution and blended
//! straight onto the pixmap, so text stays crisp under oversampling.
//! DejaVu Sans ships embedded as the default face.

use crate::buffer::RasterBuffer;
use fontdue::{Font, FontSettings};
use kurbo::Point;
use scrawl_core::Rgba;
use std::fmt;
use std::sync::{Arc, OnceLock};
use thiserror::Error;
use tiny_skia::{IntSize, Pixmap, PixmapPaint, Transform};

#[derive(Debug, Error)]
pub enum FontError {
    #[error("Failed to parse font: {0}")]
    Parse(String),
    #[error("Failed to read font file: {0}")]
    Io(#[from] std::io::Error),
}

/// Embedded DejaVu Sans, parsed on first use.
static EMBEDDED: OnceLock<Option<Arc<Font>>> = OnceLock::new();

/// Font used for table cell text.
#[derive(Clone)]
pub struct TableFont {
    font: Arc<Font>,
}

impl fmt::Debug for TableFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableFont")
            .field("name", &self.font.name())
            .finish()
    }
}

impl TableFont {
    /// Parse a TrueType/OpenType font.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FontError> {
        let font = Font::from_bytes(bytes, FontSettings::default())
            .map_err(|e| FontError::Parse(e.to_string()))?;
        Ok(Self {
            font: Arc::new(font),
        })
    }

    /// The embedded default face. `None` only if the bundled file fails to
    /// parse, in which case cells are drawn without text.
    pub fn embedded() -> Option<Self> {
        EMBEDDED
            .get_or_init(|| {
                let bytes = include_bytes!("../assets/DejaVuSans.ttf");
                match Font::from_bytes(bytes as &[u8], FontSettings::default()) {
                    Ok(font) => Some(Arc::new(font)),
                    Err(err) => {
                        log::warn!("Embedded table font unusable: {err}");
                        None
                    }
                }
            })
            .clone()
            .map(|font| Self { font })
    }

    pub fn load(path: &std::path::Path) -> Result<Self, FontError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Advance width of `text` in logical units.
    pub fn text_width(&self, text: &str, size: f64) -> f64 {
        text.chars()
            .map(|ch| self.font.metrics(ch, size as f32).advance_width as f64)
            .sum()
    }

    /// Draw `text` with its baseline starting at `origin` (buffer space).
    pub(crate) fn draw(
        &self,
        buffer: &mut RasterBuffer,
        text: &str,
        origin: Point,
        size: f64,
        color: Rgba,
    ) {
        let factor = buffer.viewport().factor();
        let px = (size * factor) as f32;
        let mut pen_x = origin.x * factor;
        let baseline = origin.y * factor;

        for ch in text.chars() {
            let (metrics, coverage) = self.font.rasterize(ch, px);
            if let Some(glyph) = glyph_pixmap(&coverage, metrics.width, metrics.height, color) {
                let x = pen_x.round() as i32 + metrics.xmin;
                let y = baseline.round() as i32 - metrics.height as i32 - metrics.ymin;
                buffer.pixmap_mut().draw_pixmap(
                    x,
                    y,
                    glyph.as_ref(),
                    &PixmapPaint::default(),
                    Transform::identity(),
                    None,
                );
            }
            pen_x += metrics.advance_width as f64;
        }
    }
}

/// Turn a coverage mask into a premultiplied color pixmap.
fn glyph_pixmap(coverage: &[u8], width: usize, height: usize, color: Rgba) -> Option<Pixmap> {
    let size = IntSize::from_wh(width as u32, height as u32)?;
    let mut data = Vec::with_capacity(width * height * 4);
    for &c in coverage {
        let a = (c as u16 * color.a as u16 + 127) / 255;
        let premul = |v: u8| ((v as u16 * a + 127) / 255) as u8;
        data.extend_from_slice(&[premul(color.r), premul(color.g), premul(color.b), a as u8]);
    }
    Pixmap::from_vec(data, size)
}
