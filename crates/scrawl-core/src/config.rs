//! Drawing configuration supplied by the shell.

use crate::color::Rgba;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Thinnest stroke the surface will draw.
pub const MIN_BRUSH_WIDTH: f64 = 0.5;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Brush,
    Eraser,
    Rectangle,
    Circle,
    Triangle,
    Line,
    Ruler,
}

impl ToolKind {
    pub const ALL: [ToolKind; 7] = [
        ToolKind::Brush,
        ToolKind::Eraser,
        ToolKind::Rectangle,
        ToolKind::Circle,
        ToolKind::Triangle,
        ToolKind::Line,
        ToolKind::Ruler,
    ];

    /// Tools that paint incrementally along the pointer path.
    pub fn is_freehand(self) -> bool {
        matches!(self, ToolKind::Brush | ToolKind::Eraser)
    }

    /// Tools that rasterize a primitive from press point to cursor.
    pub fn is_shape(self) -> bool {
        matches!(
            self,
            ToolKind::Rectangle | ToolKind::Circle | ToolKind::Triangle | ToolKind::Line
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Brush => "brush",
            ToolKind::Eraser => "eraser",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Circle => "circle",
            ToolKind::Triangle => "triangle",
            ToolKind::Line => "line",
            ToolKind::Ruler => "ruler",
        }
    }
}

/// Tool, color and ruler state owned by the shell.
///
/// The surface only ever reads this. Ruler changes come back out of the
/// surface as [`BoardRequest::SetRuler`](crate::board::BoardRequest::SetRuler).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawingConfig {
    pub tool: ToolKind,
    pub color: Rgba,
    pub brush_width: f64,
    pub fill_enabled: bool,
    pub ruler_start: Option<Point>,
    pub ruler_end: Option<Point>,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            tool: ToolKind::Brush,
            color: Rgba::white(),
            brush_width: 5.0,
            fill_enabled: false,
            ruler_start: None,
            ruler_end: None,
        }
    }
}

impl DrawingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tool(mut self, tool: ToolKind) -> Self {
        self.tool = tool;
        self
    }

    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    pub fn with_brush_width(mut self, width: f64) -> Self {
        self.set_brush_width(width);
        self
    }

    pub fn with_fill(mut self, fill_enabled: bool) -> Self {
        self.fill_enabled = fill_enabled;
        self
    }

    pub fn set_brush_width(&mut self, width: f64) {
        self.brush_width = width.max(MIN_BRUSH_WIDTH);
    }

    /// Stroke width to rasterize with. Guards against configs that were
    /// deserialized with a zero or negative width.
    pub fn stroke_width(&self) -> f64 {
        if self.brush_width.is_finite() {
            self.brush_width.max(MIN_BRUSH_WIDTH)
        } else {
            MIN_BRUSH_WIDTH
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_categories() {
        for tool in ToolKind::ALL {
            let categories = [tool.is_freehand(), tool.is_shape(), tool == ToolKind::Ruler];
            assert_eq!(categories.iter().filter(|c| **c).count(), 1, "{}", tool.name());
        }
    }

    #[test]
    fn test_default_config() {
        let config = DrawingConfig::default();
        assert_eq!(config.tool, ToolKind::Brush);
        assert_eq!(config.color, Rgba::white());
        assert!(config.ruler_start.is_none() && config.ruler_end.is_none());
    }

    #[test]
    fn test_brush_width_floor() {
        let config = DrawingConfig::new().with_brush_width(0.0);
        assert!((config.brush_width - MIN_BRUSH_WIDTH).abs() < f64::EPSILON);

        let mut raw = DrawingConfig::new();
        raw.brush_width = -3.0;
        assert!((raw.stroke_width() - MIN_BRUSH_WIDTH).abs() < f64::EPSILON);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: DrawingConfig =
            serde_json::from_str(r##"{ "tool": "triangle", "color": "#FF0000" }"##).unwrap();
        assert_eq!(config.tool, ToolKind::Triangle);
        assert_eq!(config.color, Rgba::rgb(255, 0, 0));
        assert!((config.brush_width - 5.0).abs() < f64::EPSILON);
    }
}
