//! Full-surface redraw from board state.
//!
//! A composite is destructive: it repaints the whole buffer, so anything
//! painted freehand since the last composite is lost. Layers, bottom to top:
//! background, image with frame and handle, table, ruler.

use crate::buffer::{LineStyle, RasterBuffer};
use crate::image::DecodedImage;
use crate::text::TableFont;
use kurbo::{BezPath, Shape as _};
use scrawl_core::placement::FRAME_WIDTH;
use scrawl_core::table::{self, FONT_SIZE};
use scrawl_core::{Board, ImagePlacement, Theme};

/// Ruler dash pattern and width.
const RULER_DASH: (f64, f64) = (5.0, 5.0);
const RULER_WIDTH: f64 = 2.0;
/// Table cell border width.
const CELL_BORDER_WIDTH: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct Compositor {
    theme: Theme,
    font: Option<TableFont>,
    font_size: f64,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

impl Compositor {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            font: TableFont::embedded(),
            font_size: FONT_SIZE,
        }
    }

    /// Replace the embedded table font.
    pub fn with_font(mut self, font: TableFont) -> Self {
        self.font = Some(font);
        self
    }

    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Redraw everything. `image` is drawn only when the board still has an
    /// image source and a placement for it.
    pub fn composite(
        &self,
        buffer: &mut RasterBuffer,
        board: &Board<'_>,
        image: Option<&DecodedImage>,
    ) {
        buffer.fill(self.theme.background);

        if let (Some(image), Some(placement)) = (image, board.image_placement()) {
            self.draw_image(buffer, image, &placement);
        }

        self.draw_table(buffer, board);

        if let Some((start, end)) = board.ruler() {
            let mut path = BezPath::new();
            path.move_to(start);
            path.line_to(end);
            buffer.stroke_path(
                &path,
                self.theme.primary,
                LineStyle::dashed(RULER_WIDTH, RULER_DASH.0, RULER_DASH.1),
            );
        }
    }

    fn draw_image(
        &self,
        buffer: &mut RasterBuffer,
        image: &DecodedImage,
        placement: &ImagePlacement,
    ) {
        let rect = placement.rect();
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return;
        }
        buffer.draw_image(image, rect);
        buffer.stroke_path(
            &rect.to_path(0.1),
            self.theme.primary,
            LineStyle::solid(FRAME_WIDTH),
        );
        buffer.fill_rect(placement.handle_rect(), self.theme.primary);
    }

    fn draw_table(&self, buffer: &mut RasterBuffer, board: &Board<'_>) {
        let height = buffer.viewport().logical_size().height;
        for cell in table::layout(board.table, height) {
            buffer.stroke_path(
                &cell.rect.to_path(0.1),
                self.theme.primary,
                LineStyle::solid(CELL_BORDER_WIDTH),
            );
            if let Some(font) = &self.font {
                font.draw(
                    buffer,
                    &cell.cell.content,
                    cell.text_origin,
                    self.font_size,
                    self.theme.primary,
                );
            }
        }
    }
}
