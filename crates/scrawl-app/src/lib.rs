//! Scrawl Application
//!
//! A headless shell around the Scrawl surface. It owns the board state,
//! replays recorded pointer sessions into the surface, applies the requests
//! the surface returns, and exports the result as PNG.

mod config;
mod export;
mod session;
mod shell;

pub use config::AppConfig;
pub use export::{ExportError, encode_png, export_png, surface_png};
pub use session::{ScriptError, Session, SessionEvent};
pub use shell::Shell;
