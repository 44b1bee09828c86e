//! Geometry for the primitive shape tools and freehand segments.
//!
//! Shapes are never kept as objects: a [`ShapePreview`] is built from the
//! press point and the cursor, turned into a path, rasterized, and dropped.

use crate::color::Rgba;
use crate::config::{DrawingConfig, ToolKind};
use kurbo::{BezPath, Circle, Point, Rect, Shape as KurboShape};

/// Flattening tolerance for curved primitives.
const PATH_TOLERANCE: f64 = 0.1;

/// Primitive produced by a shape tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Triangle,
    Line,
}

impl ShapeKind {
    pub fn from_tool(tool: ToolKind) -> Option<Self> {
        match tool {
            ToolKind::Rectangle => Some(ShapeKind::Rectangle),
            ToolKind::Circle => Some(ShapeKind::Circle),
            ToolKind::Triangle => Some(ShapeKind::Triangle),
            ToolKind::Line => Some(ShapeKind::Line),
            ToolKind::Brush | ToolKind::Eraser | ToolKind::Ruler => None,
        }
    }

    /// Lines have no interior to fill.
    pub fn is_fillable(self) -> bool {
        !matches!(self, ShapeKind::Line)
    }
}

/// What a stroke paints with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ink {
    Color(Rgba),
    /// The surface background; used by the eraser to overwrite pixels.
    Background,
}

/// Stroke and fill for a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStyle {
    pub color: Rgba,
    pub width: f64,
    pub filled: bool,
}

impl ShapeStyle {
    pub fn from_config(config: &DrawingConfig) -> Self {
        Self {
            color: config.color,
            width: config.stroke_width(),
            filled: config.fill_enabled,
        }
    }
}

/// A provisional shape between the press point and the cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapePreview {
    pub kind: ShapeKind,
    pub p0: Point,
    pub p1: Point,
    pub style: ShapeStyle,
}

impl ShapePreview {
    pub fn new(kind: ShapeKind, p0: Point, p1: Point, style: ShapeStyle) -> Self {
        Self {
            kind,
            p0,
            p1,
            style,
        }
    }

    /// Whether the fill pass should run.
    pub fn fills(&self) -> bool {
        self.style.filled && self.kind.is_fillable()
    }

    pub fn to_path(&self) -> BezPath {
        shape_path(self.kind, self.p0, self.p1)
    }
}

/// Build the outline of a primitive dragged from `p0` to `p1`.
pub fn shape_path(kind: ShapeKind, p0: Point, p1: Point) -> BezPath {
    match kind {
        ShapeKind::Rectangle => Rect::from_points(p0, p1).to_path(PATH_TOLERANCE),
        ShapeKind::Circle => Circle::new(p0, p0.distance(p1)).to_path(PATH_TOLERANCE),
        ShapeKind::Triangle => {
            let mut path = BezPath::new();
            path.move_to(p0);
            path.line_to(p1);
            path.line_to(triangle_apex(p0, p1));
            path.close_path();
            path
        }
        ShapeKind::Line => {
            let mut path = BezPath::new();
            path.move_to(p0);
            path.line_to(p1);
            path
        }
    }
}

/// Third triangle vertex: `p1` mirrored across the vertical through `p0`.
pub fn triangle_apex(p0: Point, p1: Point) -> Point {
    Point::new(p0.x - (p1.x - p0.x), p1.y)
}

/// One incremental piece of a freehand stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushSegment {
    pub from: Point,
    pub to: Point,
    pub width: f64,
    pub ink: Ink,
}

impl BrushSegment {
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.from);
        path.line_to(self.to);
        path
    }
}
