//! The drawing surface: gesture state machine bound to a raster buffer.
//!
//! A shell owns the board state and a [`Surface`]. Every entry point takes
//! a borrowed [`Board`] describing that state and returns the
//! [`BoardRequest`]s the shell should apply. The surface applies the same
//! requests to its own copy of the view before compositing, so the pixels
//! are already correct when the call returns.

use crate::buffer::{LineStyle, RasterBuffer};
use crate::compositor::Compositor;
use crate::image::{DecodeTicket, DecodedImage, ImageResult, ImageSlot, decode_source};
use crate::text::TableFont;
use kurbo::{Point, Size};
use scrawl_core::table::FONT_SIZE;
use scrawl_core::{
    Board, BoardRequest, Ink, Interaction, OVERSAMPLING, Outcome, PointerEvent, PointerSource,
    Rgba, SurfaceAction, SurfaceRect, Theme, Viewport, resolve_position,
};

/// Surface settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceConfig {
    /// Physical pixels per logical unit.
    pub oversampling: f64,
    pub theme: Theme,
    /// Table text size in logical units.
    pub font_size: f64,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            oversampling: OVERSAMPLING,
            theme: Theme::default(),
            font_size: FONT_SIZE,
        }
    }
}

impl SurfaceConfig {
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Surface {
    config: SurfaceConfig,
    viewport: Viewport,
    /// `None` until the surface has a non-empty size.
    buffer: Option<RasterBuffer>,
    interaction: Interaction,
    compositor: Compositor,
    image: ImageSlot,
    /// A decode finished mid-gesture; composite on release.
    composite_deferred: bool,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new(SurfaceConfig::default())
    }
}

impl Surface {
    pub fn new(config: SurfaceConfig) -> Self {
        Self {
            viewport: Viewport::with_factor(Size::ZERO, config.oversampling),
            buffer: None,
            interaction: Interaction::new(),
            compositor: Compositor::new(config.theme).with_font_size(config.font_size),
            image: ImageSlot::new(),
            composite_deferred: false,
            config,
        }
    }

    /// Use `font` for table text instead of the embedded face.
    pub fn with_font(mut self, font: TableFont) -> Self {
        self.compositor = self.compositor.with_font(font);
        self
    }

    /// Whether there is a buffer to draw into.
    pub fn is_ready(&self) -> bool {
        self.buffer.is_some()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn logical_size(&self) -> Size {
        self.viewport.logical_size()
    }

    pub fn physical_size(&self) -> (u32, u32) {
        self.buffer
            .as_ref()
            .map_or((0, 0), |buffer| (buffer.width(), buffer.height()))
    }

    /// Premultiplied RGBA bytes at physical resolution.
    pub fn pixels(&self) -> Option<&[u8]> {
        self.buffer.as_ref().map(RasterBuffer::data)
    }

    /// Straight-alpha RGBA bytes at physical resolution.
    pub fn to_rgba8(&self) -> Option<Vec<u8>> {
        self.buffer.as_ref().map(RasterBuffer::to_rgba8)
    }

    /// Color of a physical pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        self.buffer.as_ref()?.pixel(x, y)
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn theme(&self) -> Theme {
        self.compositor.theme()
    }

    pub fn image_slot(&self) -> &ImageSlot {
        &self.image
    }

    /// Recreate the buffer for a new logical size. Any gesture in progress
    /// is abandoned.
    pub fn resize(&mut self, size: Size, board: &Board<'_>) {
        self.interaction.cancel();
        self.composite_deferred = false;
        self.viewport = Viewport::with_factor(size, self.config.oversampling);
        self.buffer = RasterBuffer::new(self.viewport);
        match &self.buffer {
            Some(buffer) => log::info!(
                "Surface resized to {}x{} ({}x{} px)",
                size.width,
                size.height,
                buffer.width(),
                buffer.height()
            ),
            None => log::debug!("Surface has no area; drawing disabled"),
        }
        self.composite(board);
    }

    /// Map a pointer sample to buffer space given the surface's on-screen rect.
    pub fn resolve_position(&self, source: &PointerSource, rect: &SurfaceRect) -> Option<Point> {
        resolve_position(source, &self.viewport, rect)
    }

    /// Route a raw pointer event.
    pub fn handle_pointer(
        &mut self,
        event: &PointerEvent,
        rect: &SurfaceRect,
        board: &Board<'_>,
    ) -> Vec<BoardRequest> {
        match event {
            PointerEvent::Down(source) => match self.resolve_position(source, rect) {
                Some(position) => self.press(board, position),
                None => Vec::new(),
            },
            PointerEvent::Move(source) => match self.resolve_position(source, rect) {
                Some(position) => self.drag(board, position),
                None => Vec::new(),
            },
            PointerEvent::Up | PointerEvent::Leave => self.release(board),
        }
    }

    pub fn press(&mut self, board: &Board<'_>, position: Point) -> Vec<BoardRequest> {
        if !self.is_ready() {
            return Vec::new();
        }
        let outcome = self.interaction.press(board, position);
        self.run(outcome, board)
    }

    pub fn drag(&mut self, board: &Board<'_>, position: Point) -> Vec<BoardRequest> {
        if !self.is_ready() {
            return Vec::new();
        }
        let outcome = self
            .interaction
            .drag(board, position, self.viewport.logical_size());
        self.run(outcome, board)
    }

    pub fn release(&mut self, board: &Board<'_>) -> Vec<BoardRequest> {
        if !self.is_ready() {
            return Vec::new();
        }
        let outcome = self.interaction.release(board);
        if let Some(buffer) = &mut self.buffer {
            buffer.discard_snapshot();
        }
        let requests = self.run(outcome, board);
        if self.composite_deferred {
            log::debug!("Running composite deferred by an image decode");
            self.composite_view(&view_after(board, &requests));
        }
        requests
    }

    /// Redraw background, image, table and ruler.
    pub fn composite(&mut self, board: &Board<'_>) {
        self.composite_view(board);
    }

    /// Switch the background image. Returns a ticket for the decode the
    /// shell should run, or `None` when the image was cleared.
    pub fn set_background_image(
        &mut self,
        source: Option<&str>,
        board: &Board<'_>,
    ) -> Option<DecodeTicket> {
        let ticket = self.image.request(source);
        self.composite(board);
        ticket
    }

    /// Hand back a finished decode. Stale tickets are dropped. A fresh
    /// image with no placement yet is placed at the origin at its natural
    /// size.
    pub fn image_decoded(
        &mut self,
        ticket: DecodeTicket,
        result: ImageResult<DecodedImage>,
        board: &Board<'_>,
    ) -> ImageResult<Vec<BoardRequest>> {
        if !self.image.complete(ticket, &result) {
            log::debug!("Dropping stale image decode {ticket:?}");
            return Ok(Vec::new());
        }

        let mut requests = Vec::new();
        let failure = match result {
            Ok(image) => {
                if board.placement.is_none() {
                    requests.push(BoardRequest::PlaceImage(image.natural_placement()));
                }
                None
            }
            Err(err) => {
                log::warn!("Background image failed to decode: {err}");
                Some(err)
            }
        };

        if self.interaction.is_active() {
            self.composite_deferred = true;
        } else {
            self.composite_view(&view_after(board, &requests));
        }

        match failure {
            Some(err) => Err(err),
            None => Ok(requests),
        }
    }

    /// Set an image and decode it right away.
    pub fn load_background_image(
        &mut self,
        source: &str,
        board: &Board<'_>,
    ) -> ImageResult<Vec<BoardRequest>> {
        match self.set_background_image(Some(source), board) {
            Some(ticket) => self.image_decoded(ticket, decode_source(source), board),
            None => Ok(Vec::new()),
        }
    }

    /// Wipe the drawing and drop the background image.
    pub fn clear(&mut self, board: &Board<'_>) -> Vec<BoardRequest> {
        self.image.request(None);
        let requests = vec![BoardRequest::ClearImage];
        self.composite_view(&view_after(board, &requests));
        requests
    }

    pub fn set_theme(&mut self, theme: Theme, board: &Board<'_>) {
        self.compositor.set_theme(theme);
        self.composite(board);
    }

    /// Carry out an outcome from the state machine.
    fn run(&mut self, outcome: Outcome, board: &Board<'_>) -> Vec<BoardRequest> {
        let Outcome { action, requests } = outcome;
        let background = self.compositor.theme().background;
        match action {
            SurfaceAction::None => {}
            SurfaceAction::Composite => self.composite_view(&view_after(board, &requests)),
            SurfaceAction::Snapshot => {
                if let Some(buffer) = &mut self.buffer {
                    buffer.snapshot();
                }
            }
            SurfaceAction::Stroke(segment) => {
                if let Some(buffer) = &mut self.buffer {
                    let color = match segment.ink {
                        Ink::Color(color) => color,
                        Ink::Background => background,
                    };
                    buffer.stroke_path(&segment.to_path(), color, LineStyle::round(segment.width));
                }
            }
            SurfaceAction::Preview(preview) => {
                if let Some(buffer) = &mut self.buffer {
                    buffer.restore_snapshot();
                    let path = preview.to_path();
                    if preview.fills() {
                        buffer.fill_path(&path, preview.style.color);
                    }
                    buffer.stroke_path(
                        &path,
                        preview.style.color,
                        LineStyle::round(preview.style.width),
                    );
                }
            }
        }
        requests
    }

    fn composite_view(&mut self, view: &Board<'_>) {
        let Some(buffer) = &mut self.buffer else {
            return;
        };
        // A running shape preview restores onto the fresh composite.
        let refresh_snapshot = buffer.has_snapshot();
        let image = self.image.image_for(view.image_source);
        self.compositor.composite(buffer, view, image);
        if refresh_snapshot {
            buffer.snapshot();
        }
        self.composite_deferred = false;
    }
}

/// The board as it will look once the shell applies `requests`.
fn view_after<'a>(board: &Board<'a>, requests: &[BoardRequest]) -> Board<'a> {
    let mut view = *board;
    for request in requests {
        view.apply(request);
    }
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageError;
    use crate::image::tests::png_data_uri;
    use scrawl_core::{
        BoardState, DrawingConfig, ImagePlacement, InteractionMode, TableCell, ToolKind,
    };

    const RED: Rgba = Rgba::rgb(255, 0, 0);

    /// A minimal shell: board state plus a surface, requests applied back.
    struct Shell {
        state: BoardState,
        surface: Surface,
    }

    impl Shell {
        fn new(config: DrawingConfig) -> Self {
            let state = BoardState::new(config);
            let mut surface = Surface::new(SurfaceConfig::default().with_theme(Theme::light()));
            surface.resize(Size::new(300.0, 200.0), &state.board());
            Self { state, surface }
        }

        fn press(&mut self, x: f64, y: f64) -> Vec<BoardRequest> {
            let requests = self.surface.press(&self.state.board(), Point::new(x, y));
            self.state.apply_all(&requests);
            requests
        }

        fn drag(&mut self, x: f64, y: f64) -> Vec<BoardRequest> {
            let requests = self.surface.drag(&self.state.board(), Point::new(x, y));
            self.state.apply_all(&requests);
            requests
        }

        fn release(&mut self) -> Vec<BoardRequest> {
            let requests = self.surface.release(&self.state.board());
            self.state.apply_all(&requests);
            requests
        }

        /// Color at a logical point.
        fn at(&self, x: f64, y: f64) -> Rgba {
            let f = self.surface.viewport().factor();
            self.surface.pixel((x * f) as u32, (y * f) as u32).unwrap()
        }

        fn with_image(mut self, placement: ImagePlacement) -> (Self, DecodeTicket) {
            let source = "data:image/png;base64,AAAA".to_string();
            self.state.image_source = Some(source.clone());
            self.state.placement = Some(placement);
            let ticket = self
                .surface
                .set_background_image(Some(&source), &self.state.board())
                .unwrap();
            (self, ticket)
        }
    }

    fn green_image() -> DecodedImage {
        DecodedImage::from_rgba8(2, 2, [0, 255, 0, 255].repeat(4)).unwrap()
    }

    #[test]
    fn test_red_filled_rectangle() {
        let config = DrawingConfig::new()
            .with_tool(ToolKind::Rectangle)
            .with_color(RED)
            .with_fill(true)
            .with_brush_width(2.0);
        let mut shell = Shell::new(config);
        shell.press(10.0, 10.0);
        shell.drag(60.0, 30.0);
        shell.drag(110.0, 60.0);
        shell.release();

        assert_eq!(shell.at(60.0, 35.0), RED);
        assert_eq!(shell.at(10.0, 35.0), RED);
        assert_eq!(shell.at(200.0, 100.0), Theme::light().background);
        assert_eq!(shell.surface.interaction().mode(), InteractionMode::Idle);
    }

    #[test]
    fn test_preview_erases_previous_shape() {
        let config = DrawingConfig::new()
            .with_tool(ToolKind::Rectangle)
            .with_color(RED)
            .with_brush_width(2.0);
        let mut shell = Shell::new(config);
        shell.press(10.0, 10.0);
        shell.drag(150.0, 150.0);
        assert_eq!(shell.at(150.0, 100.0), RED);
        shell.drag(110.0, 60.0);
        assert_eq!(shell.at(150.0, 100.0), Theme::light().background);
        assert_eq!(shell.at(110.0, 40.0), RED);
        // Outline only.
        assert_eq!(shell.at(60.0, 35.0), Theme::light().background);
    }

    #[test]
    fn test_many_moves_equal_one() {
        let config = DrawingConfig::new()
            .with_tool(ToolKind::Triangle)
            .with_color(RED)
            .with_fill(true);

        let mut many = Shell::new(config.clone());
        many.press(150.0, 40.0);
        for (x, y) in [(20.0, 190.0), (280.0, 60.0), (160.0, 41.0), (200.0, 150.0)] {
            many.drag(x, y);
        }
        many.release();

        let mut one = Shell::new(config);
        one.press(150.0, 40.0);
        one.drag(200.0, 150.0);
        one.release();

        assert_eq!(many.surface.pixels(), one.surface.pixels());
    }

    #[test]
    fn test_eraser_restores_background() {
        let mut shell = Shell::new(DrawingConfig::new().with_color(RED).with_brush_width(4.0));
        shell.press(20.0, 100.0);
        shell.drag(280.0, 100.0);
        shell.release();
        assert_eq!(shell.at(150.0, 100.0), RED);

        shell.state.config.tool = ToolKind::Eraser;
        shell.state.config.set_brush_width(12.0);
        shell.press(10.0, 100.0);
        shell.drag(290.0, 100.0);
        shell.release();
        assert_eq!(shell.at(150.0, 100.0), Theme::light().background);
        assert_eq!(shell.at(150.0, 98.0), Theme::light().background);
    }

    #[test]
    fn test_brush_reads_config_per_move() {
        let mut shell = Shell::new(DrawingConfig::new().with_color(RED).with_brush_width(4.0));
        shell.press(20.0, 50.0);
        shell.drag(100.0, 50.0);
        shell.state.config.color = Rgba::rgb(0, 0, 255);
        shell.drag(180.0, 50.0);
        assert_eq!(shell.at(60.0, 50.0), RED);
        assert_eq!(shell.at(140.0, 50.0), Rgba::rgb(0, 0, 255));
    }

    #[test]
    fn test_ruler_is_momentary() {
        let mut shell = Shell::new(DrawingConfig::new().with_tool(ToolKind::Ruler));
        let primary = Theme::light().primary;

        shell.press(0.0, 100.0);
        assert_eq!(shell.surface.interaction().mode(), InteractionMode::DraggingRuler);
        shell.drag(300.0, 100.0);
        assert_eq!(
            shell.state.board().ruler(),
            Some((Point::new(0.0, 100.0), Point::new(300.0, 100.0)))
        );
        assert_eq!(shell.at(2.5, 100.0), primary);

        let requests = shell.release();
        assert_eq!(
            requests,
            vec![BoardRequest::SetRuler {
                start: None,
                end: None
            }]
        );
        assert!(shell.state.board().ruler().is_none());
        assert_eq!(shell.at(2.5, 100.0), Theme::light().background);
    }

    #[test]
    fn test_idle_ruler_release_keeps_strokes() {
        let mut shell = Shell::new(
            DrawingConfig::new()
                .with_tool(ToolKind::Brush)
                .with_color(RED)
                .with_brush_width(4.0),
        );
        shell.press(20.0, 100.0);
        shell.drag(280.0, 100.0);
        shell.release();
        assert_eq!(shell.at(150.0, 100.0), RED);

        shell.state.config.tool = ToolKind::Ruler;
        let requests = shell.release();
        assert!(requests.is_empty());
        assert_eq!(shell.at(150.0, 100.0), RED);

        let rect = SurfaceRect::from_size(Size::new(300.0, 200.0));
        let board = shell.state.board();
        let requests = shell.surface.handle_pointer(&PointerEvent::Leave, &rect, &board);
        assert!(requests.is_empty());
        assert_eq!(shell.at(150.0, 100.0), RED);
    }

    #[test]
    fn test_image_drag_is_clamped() {
        let placement = ImagePlacement::new(Point::new(10.0, 10.0), Size::new(100.0, 80.0));
        let (mut shell, _) = Shell::new(DrawingConfig::default()).with_image(placement);

        shell.press(20.0, 20.0);
        assert_eq!(shell.surface.interaction().mode(), InteractionMode::DraggingImage);
        let requests = shell.drag(500.0, 500.0);
        assert_eq!(requests, vec![BoardRequest::MoveImage(Point::new(200.0, 120.0))]);
        shell.drag(-50.0, -50.0);
        assert_eq!(shell.state.placement.map(|p| p.position), Some(Point::ZERO));
        shell.release();
    }

    #[test]
    fn test_image_resize_floor() {
        let placement = ImagePlacement::new(Point::new(10.0, 10.0), Size::new(100.0, 80.0));
        let (mut shell, _) = Shell::new(DrawingConfig::default()).with_image(placement);

        shell.press(108.0, 88.0);
        assert_eq!(shell.surface.interaction().mode(), InteractionMode::ResizingImage);
        let requests = shell.drag(0.0, 0.0);
        assert_eq!(requests, vec![BoardRequest::ResizeImage(Size::new(50.0, 50.0))]);
        shell.drag(210.0, 150.0);
        assert_eq!(shell.state.placement.map(|p| p.size), Some(Size::new(200.0, 140.0)));
    }

    #[test]
    fn test_decoded_image_is_placed_and_drawn() {
        let mut shell = Shell::new(DrawingConfig::default());
        let source = png_data_uri(40, 30, [0, 255, 0, 255]);
        shell.state.image_source = Some(source.clone());
        let requests = shell
            .surface
            .load_background_image(&source, &shell.state.board())
            .unwrap();
        assert_eq!(requests, vec![BoardRequest::PlaceImage(ImagePlacement::at_origin(40, 30))]);
        shell.state.apply_all(&requests);
        assert_eq!(shell.at(20.0, 15.0), Rgba::rgb(0, 255, 0));
    }

    #[test]
    fn test_stale_decode_is_dropped() {
        let placement = ImagePlacement::new(Point::new(10.0, 10.0), Size::new(100.0, 80.0));
        let (mut shell, ticket) = Shell::new(DrawingConfig::default()).with_image(placement);

        let cleared = shell.surface.clear(&shell.state.board());
        shell.state.apply_all(&cleared);
        assert!(shell.state.image_source.is_none());

        let requests = shell
            .surface
            .image_decoded(ticket, Ok(green_image()), &shell.state.board())
            .unwrap();
        assert!(requests.is_empty());
        assert_eq!(shell.at(50.0, 50.0), Theme::light().background);
    }

    #[test]
    fn test_decode_during_gesture_is_deferred() {
        let placement = ImagePlacement::new(Point::new(10.0, 10.0), Size::new(100.0, 80.0));
        let (mut shell, ticket) =
            Shell::new(DrawingConfig::new().with_tool(ToolKind::Circle)).with_image(placement);

        shell.press(250.0, 150.0);
        shell.drag(260.0, 150.0);
        shell
            .surface
            .image_decoded(ticket, Ok(green_image()), &shell.state.board())
            .unwrap();
        assert_eq!(shell.at(50.0, 50.0), Theme::light().background);

        shell.release();
        assert_eq!(shell.at(50.0, 50.0), Rgba::rgb(0, 255, 0));
    }

    #[test]
    fn test_decode_failure_is_reported() {
        let placement = ImagePlacement::new(Point::new(10.0, 10.0), Size::new(100.0, 80.0));
        let (mut shell, ticket) = Shell::new(DrawingConfig::default()).with_image(placement);
        let result = shell.surface.image_decoded(
            ticket,
            Err(ImageError::UnsupportedSource("x".to_string())),
            &shell.state.board(),
        );
        assert!(result.is_err());
        assert_eq!(shell.at(50.0, 50.0), Theme::light().background);
    }

    #[test]
    fn test_resize_abandons_gesture() {
        let mut shell = Shell::new(DrawingConfig::default());
        shell.press(10.0, 10.0);
        assert!(shell.surface.interaction().is_active());
        shell.surface.resize(Size::new(400.0, 300.0), &shell.state.board());
        assert!(!shell.surface.interaction().is_active());
        assert_eq!(shell.surface.physical_size(), (800, 600));
        assert!(shell.drag(50.0, 50.0).is_empty());
    }

    #[test]
    fn test_no_buffer_is_noop() {
        let state = BoardState::default();
        let board = state.board();
        let mut surface = Surface::default();
        assert!(!surface.is_ready());
        assert!(surface.press(&board, Point::new(1.0, 1.0)).is_empty());
        assert!(surface.release(&board).is_empty());
        assert!(surface.pixels().is_none());
        surface.composite(&board);

        surface.resize(Size::new(0.0, 100.0), &board);
        assert!(!surface.is_ready());
        assert_eq!(surface.physical_size(), (0, 0));
    }

    #[test]
    fn test_pointer_events_scale_to_buffer() {
        let mut shell = Shell::new(DrawingConfig::new().with_color(RED).with_brush_width(4.0));
        // Displayed at half size, offset on the page.
        let rect = SurfaceRect::new(10.0, 20.0, 150.0, 100.0);
        let board = shell.state.board();
        shell
            .surface
            .handle_pointer(&PointerEvent::Down(PointerSource::mouse(15.0, 45.0)), &rect, &board);
        let stroke = shell.surface.interaction().stroke().unwrap();
        assert_eq!(stroke.last_point, Point::new(10.0, 50.0));

        shell.surface.handle_pointer(
            &PointerEvent::Move(PointerSource::touch(vec![
                Point::new(85.0, 45.0),
                Point::new(0.0, 0.0),
            ])),
            &rect,
            &board,
        );
        assert_eq!(shell.at(80.0, 50.0), RED);

        shell
            .surface
            .handle_pointer(&PointerEvent::Move(PointerSource::touch(Vec::new())), &rect, &board);
        shell.surface.handle_pointer(&PointerEvent::Leave, &rect, &board);
        assert!(!shell.surface.interaction().is_active());
    }

    #[test]
    fn test_theme_switch_recomposites() {
        let mut shell = Shell::new(DrawingConfig::default());
        shell.state.table.push(TableCell::new(1, "x"));
        shell.surface.set_theme(Theme::dark(), &shell.state.board());
        assert_eq!(shell.at(200.0, 50.0), Theme::dark().background);
        assert_eq!(shell.surface.theme(), Theme::dark());
        // Cell border at x = 10 in the primary color.
        assert_eq!(shell.at(10.0, 175.0), Theme::dark().primary);
    }

    #[test]
    fn test_composite_during_preview_keeps_new_content() {
        let mut shell = Shell::new(DrawingConfig::new().with_tool(ToolKind::Line).with_color(RED));
        shell.press(20.0, 20.0);
        shell.drag(100.0, 20.0);
        shell.state.table.push(TableCell::new(1, "late"));
        shell.surface.composite(&shell.state.board());
        shell.drag(100.0, 40.0);
        assert_eq!(shell.at(10.0, 175.0), Theme::light().primary);
    }
}
