//! Scrawl Core Library
//!
//! Platform-agnostic data model and interaction logic for the Scrawl drawing
//! surface: tool configuration, coordinate transforms, pointer gestures,
//! image placement and the table overlay layout. Pixels live in
//! `scrawl-render`.

pub mod board;
pub mod color;
pub mod config;
pub mod input;
pub mod interaction;
pub mod placement;
pub mod shapes;
pub mod table;
pub mod viewport;

pub use board::{Board, BoardRequest, BoardState};
pub use color::{ColorParseError, Rgba, Theme, ThemeKind};
pub use config::{DrawingConfig, ToolKind};
pub use input::{PointerEvent, PointerSource, resolve_position};
pub use interaction::{Interaction, InteractionMode, Outcome, SurfaceAction};
pub use placement::{ImageHit, ImagePlacement};
pub use shapes::{BrushSegment, Ink, ShapeKind, ShapePreview, ShapeStyle};
pub use table::TableCell;
pub use viewport::{OVERSAMPLING, SurfaceRect, Viewport};
