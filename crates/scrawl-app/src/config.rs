//! Shell configuration.

use kurbo::Size;
use scrawl_core::{SurfaceRect, ThemeKind, OVERSAMPLING};
use scrawl_render::SurfaceConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration, read from the `config` block of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logical surface width.
    pub width: u32,
    /// Logical surface height.
    pub height: u32,
    pub oversampling: f64,
    pub theme: ThemeKind,
    /// TrueType font for table text. The embedded face is used when unset.
    pub font_path: Option<PathBuf>,
    /// Where the surface sits on screen. Pointer coordinates in the session
    /// are client coordinates relative to this rect. Defaults to the
    /// surface's own size at the origin.
    pub display: Option<SurfaceRect>,
    /// PNG written after replay, unless overridden on the command line.
    pub output: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 800,
            oversampling: OVERSAMPLING,
            theme: ThemeKind::default(),
            font_path: None,
            display: None,
            output: None,
        }
    }
}

impl AppConfig {
    pub fn size(&self) -> Size {
        Size::new(self.width as f64, self.height as f64)
    }

    pub fn display_rect(&self) -> SurfaceRect {
        self.display
            .unwrap_or_else(|| SurfaceRect::from_size(self.size()))
    }

    pub fn surface_config(&self) -> SurfaceConfig {
        SurfaceConfig {
            oversampling: self.oversampling,
            ..SurfaceConfig::default().with_theme(self.theme.theme())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: AppConfig =
            serde_json::from_str(r#"{"width": 320, "theme": "light"}"#).unwrap();
        assert_eq!(config.width, 320);
        assert_eq!(config.height, 800);
        assert_eq!(config.theme, ThemeKind::Light);
        assert!(config.font_path.is_none());
        assert_eq!(config.display_rect(), SurfaceRect::new(0.0, 0.0, 320.0, 800.0));
    }

    #[test]
    fn test_surface_config() {
        let config = AppConfig {
            theme: ThemeKind::Light,
            oversampling: 3.0,
            ..AppConfig::default()
        };
        let surface = config.surface_config();
        assert_eq!(surface.theme, scrawl_core::Theme::light());
        assert!((surface.oversampling - 3.0).abs() < f64::EPSILON);
    }
}
