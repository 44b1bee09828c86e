//! Headless shell: owns the board state and the surface, feeds events in
//! and applies every request the surface hands back.

use crate::config::AppConfig;
use crate::session::{ScriptError, Session, SessionEvent};
use kurbo::{Point, Size};
use scrawl_core::table::push_cell;
use scrawl_core::{BoardRequest, BoardState, PointerEvent, PointerSource, SurfaceRect};
use scrawl_render::{ImageFormat, Surface, TableFont, decode_source, encode_data_uri};
use std::path::Path;

pub struct Shell {
    config: AppConfig,
    state: BoardState,
    surface: Surface,
    display: SurfaceRect,
}

impl Shell {
    /// Build a shell for a session: load the font, size the surface and
    /// draw the initial board.
    pub fn new(session: &Session) -> Result<Self, ScriptError> {
        let config = session.config.clone();
        let mut surface = Surface::new(config.surface_config());
        if let Some(path) = &config.font_path {
            surface = surface.with_font(TableFont::load(path)?);
            log::debug!("Loaded table font {}", path.display());
        }

        let mut state = BoardState::new(session.drawing.clone());
        state.table = session.table.clone();
        surface.resize(config.size(), &state.board());

        Ok(Self {
            display: config.display_rect(),
            config,
            state,
            surface,
        })
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run every event of a session in order.
    pub fn replay(&mut self, events: &[SessionEvent]) -> Result<(), ScriptError> {
        for event in events {
            self.apply_event(event)?;
        }
        Ok(())
    }

    pub fn apply_event(&mut self, event: &SessionEvent) -> Result<(), ScriptError> {
        log::debug!("Event: {event:?}");
        match event {
            SessionEvent::Press { x, y, touch } => {
                self.pointer(PointerEvent::Down(pointer_source(*x, *y, *touch)));
            }
            SessionEvent::Move { x, y, touch } => {
                self.pointer(PointerEvent::Move(pointer_source(*x, *y, *touch)));
            }
            SessionEvent::Release => self.pointer(PointerEvent::Up),
            SessionEvent::Leave => self.pointer(PointerEvent::Leave),
            SessionEvent::Resize { width, height } => {
                let size = Size::new(*width, *height);
                // The surface keeps filling its container.
                if self.config.display.is_none() {
                    self.display = SurfaceRect::from_size(size);
                }
                self.surface.resize(size, &self.state.board());
            }
            SessionEvent::SetTool { tool } => self.state.config.tool = *tool,
            SessionEvent::SetColor { color } => self.state.config.color = *color,
            SessionEvent::SetBrushWidth { width } => self.state.config.set_brush_width(*width),
            SessionEvent::SetFill { enabled } => self.state.config.fill_enabled = *enabled,
            SessionEvent::SetImage { source } => self.set_image(source)?,
            SessionEvent::ClearImage => {
                self.state.apply(&BoardRequest::ClearImage);
                self.surface.set_background_image(None, &self.state.board());
            }
            SessionEvent::AddCell { content } => {
                if push_cell(&mut self.state.table, content) {
                    self.surface.composite(&self.state.board());
                }
            }
            SessionEvent::Clear => {
                let requests = self.surface.clear(&self.state.board());
                self.state.apply_all(&requests);
            }
            SessionEvent::SetTheme { theme } => {
                self.surface.set_theme(theme.theme(), &self.state.board());
            }
        }
        Ok(())
    }

    fn pointer(&mut self, event: PointerEvent) {
        let requests = self
            .surface
            .handle_pointer(&event, &self.display, &self.state.board());
        self.state.apply_all(&requests);
    }

    /// Swap in a new background image. The old placement goes with the old
    /// image, so the new one lands at its natural size.
    fn set_image(&mut self, source: &str) -> Result<(), ScriptError> {
        let uri = image_uri(source)?;
        self.state.image_source = Some(uri.clone());
        self.state.placement = None;

        let Some(ticket) = self.surface.set_background_image(Some(&uri), &self.state.board())
        else {
            return Ok(());
        };
        match self
            .surface
            .image_decoded(ticket, decode_source(&uri), &self.state.board())
        {
            Ok(requests) => self.state.apply_all(&requests),
            // The board keeps the source; the surface just draws without it.
            Err(err) => log::warn!("Image not shown: {err}"),
        }
        Ok(())
    }
}

fn pointer_source(x: f64, y: f64, touch: bool) -> PointerSource {
    if touch {
        PointerSource::touch(vec![Point::new(x, y)])
    } else {
        PointerSource::mouse(x, y)
    }
}

/// Data URIs pass through; anything else is read as an image file.
fn image_uri(source: &str) -> Result<String, ScriptError> {
    if source.starts_with("data:") {
        return Ok(source.to_string());
    }
    let path = Path::new(source);
    let bytes = std::fs::read(path).map_err(|err| ScriptError::Io {
        path: path.to_path_buf(),
        source: err,
    })?;
    let format = ImageFormat::from_magic_bytes(&bytes)
        .or_else(|| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .and_then(ImageFormat::from_extension)
        })
        .ok_or_else(|| ScriptError::UnsupportedImage(path.to_path_buf()))?;
    Ok(encode_data_uri(format, &bytes))
}
