//! Recorded sessions: a config plus a list of shell events to replay.

use crate::config::AppConfig;
use crate::export::ExportError;
use scrawl_core::{DrawingConfig, Rgba, TableCell, ThemeKind, ToolKind};
use scrawl_render::FontError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid session: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Table font: {0}")]
    Font(#[from] FontError),
    #[error("Unsupported image file: {}", .0.display())]
    UnsupportedImage(PathBuf),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// One thing that happens to the shell. Pointer coordinates are client
/// coordinates, resolved against the configured display rect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    Press {
        x: f64,
        y: f64,
        #[serde(default)]
        touch: bool,
    },
    Move {
        x: f64,
        y: f64,
        #[serde(default)]
        touch: bool,
    },
    Release,
    Leave,
    /// New logical surface size.
    Resize { width: f64, height: f64 },
    SetTool { tool: ToolKind },
    SetColor { color: Rgba },
    SetBrushWidth { width: f64 },
    SetFill { enabled: bool },
    /// A data URI, or a path to a PNG/JPEG/WebP file.
    SetImage { source: String },
    ClearImage,
    AddCell { content: String },
    /// Wipe the drawing and remove the image.
    Clear,
    SetTheme { theme: ThemeKind },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    pub config: AppConfig,
    pub drawing: DrawingConfig,
    pub table: Vec<TableCell>,
    pub events: Vec<SessionEvent>,
}

impl Session {
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let json = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let session = Self::from_json(&json)?;
        log::info!(
            "Loaded session {} ({} events)",
            path.display(),
            session.events.len()
        );
        Ok(session)
    }
}
