//! Pointer gesture state machine.
//!
//! `Idle → {Drawing, DraggingImage, ResizingImage, DraggingRuler} → Idle`.
//! A press picks exactly one gesture, moves feed it, and the release (or a
//! surface resize) returns to `Idle`. The machine itself never touches
//! pixels: each step returns a [`SurfaceAction`] for the raster side and any
//! [`BoardRequest`]s for the shell.

use crate::board::{Board, BoardRequest};
use crate::config::ToolKind;
use crate::placement::ImageHit;
use crate::shapes::{BrushSegment, Ink, ShapeKind, ShapePreview, ShapeStyle};
use kurbo::{Point, Size, Vec2};

/// What the raster side must do after an input step.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SurfaceAction {
    #[default]
    None,
    /// Redraw background, image, table and ruler from board state.
    Composite,
    /// Copy the buffer so shape previews can be undone.
    Snapshot,
    /// Paint one freehand segment on top of the buffer.
    Stroke(BrushSegment),
    /// Restore the snapshot and draw this shape over it.
    Preview(ShapePreview),
}

/// Result of feeding one input step to the machine.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Outcome {
    pub action: SurfaceAction,
    pub requests: Vec<BoardRequest>,
}

impl Outcome {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn action(action: SurfaceAction) -> Self {
        Self {
            action,
            requests: Vec::new(),
        }
    }

    /// A board change followed by a composite that shows it.
    pub fn composite_with(request: BoardRequest) -> Self {
        Self {
            action: SurfaceAction::Composite,
            requests: vec![request],
        }
    }
}

/// Discriminant of [`Interaction`], for logging and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionMode {
    Idle,
    Drawing,
    DraggingImage,
    ResizingImage,
    DraggingRuler,
}

/// An in-progress paint or shape gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    /// Tool captured at press time.
    pub tool: ToolKind,
    /// Press position; the fixed corner/center/apex of shapes.
    pub last_point: Point,
    /// Most recent pointer position.
    pub cursor: Point,
}

/// State of a pointer interaction.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    Drawing(Stroke),
    DraggingImage {
        /// Offset from the image's top-left to the grab point.
        grab: Vec2,
    },
    ResizingImage,
    DraggingRuler,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> InteractionMode {
        match self {
            Interaction::Idle => InteractionMode::Idle,
            Interaction::Drawing(_) => InteractionMode::Drawing,
            Interaction::DraggingImage { .. } => InteractionMode::DraggingImage,
            Interaction::ResizingImage => InteractionMode::ResizingImage,
            Interaction::DraggingRuler => InteractionMode::DraggingRuler,
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Interaction::Idle)
    }

    /// The stroke being drawn, if any.
    pub fn stroke(&self) -> Option<&Stroke> {
        match self {
            Interaction::Drawing(stroke) => Some(stroke),
            _ => None,
        }
    }

    /// Start a gesture at a buffer-space position.
    ///
    /// Image manipulation wins over the ruler, which wins over drawing.
    /// A press while a gesture is already running (a second finger) is
    /// ignored.
    pub fn press(&mut self, board: &Board<'_>, position: Point) -> Outcome {
        if self.is_active() {
            log::debug!("Ignoring press while {:?}", self.mode());
            return Outcome::none();
        }

        if let Some(placement) = board.image_placement() {
            match placement.hit_test(position) {
                Some(ImageHit::ResizeHandle) => {
                    *self = Interaction::ResizingImage;
                    return Outcome::none();
                }
                Some(ImageHit::Body) => {
                    *self = Interaction::DraggingImage {
                        grab: placement.grab_offset(position),
                    };
                    return Outcome::none();
                }
                None => {}
            }
        }

        let tool = board.config.tool;
        if tool == ToolKind::Ruler {
            *self = Interaction::DraggingRuler;
            return Outcome::composite_with(BoardRequest::SetRuler {
                start: Some(position),
                end: Some(position),
            });
        }

        *self = Interaction::Drawing(Stroke {
            tool,
            last_point: position,
            cursor: position,
        });

        if tool.is_shape() {
            Outcome::action(SurfaceAction::Snapshot)
        } else {
            Outcome::none()
        }
    }

    /// Feed a pointer move. `surface` is the logical surface size, used to
    /// keep a dragged image on screen.
    pub fn drag(&mut self, board: &Board<'_>, position: Point, surface: Size) -> Outcome {
        match self {
            Interaction::Idle => Outcome::none(),
            Interaction::ResizingImage => match board.image_placement() {
                Some(placement) => Outcome::composite_with(BoardRequest::ResizeImage(
                    placement.resized_to(position),
                )),
                None => Outcome::none(),
            },
            Interaction::DraggingImage { grab } => match board.image_placement() {
                Some(placement) => Outcome::composite_with(BoardRequest::MoveImage(
                    placement.dragged_to(position, *grab, surface),
                )),
                None => Outcome::none(),
            },
            Interaction::DraggingRuler => {
                Outcome::composite_with(BoardRequest::SetRulerEnd(position))
            }
            Interaction::Drawing(stroke) => {
                let config = board.config;
                if stroke.tool.is_freehand() {
                    let ink = if stroke.tool == ToolKind::Eraser {
                        Ink::Background
                    } else {
                        Ink::Color(config.color)
                    };
                    let segment = BrushSegment {
                        from: stroke.cursor,
                        to: position,
                        width: config.stroke_width(),
                        ink,
                    };
                    stroke.cursor = position;
                    Outcome::action(SurfaceAction::Stroke(segment))
                } else if let Some(kind) = ShapeKind::from_tool(stroke.tool) {
                    stroke.cursor = position;
                    Outcome::action(SurfaceAction::Preview(ShapePreview::new(
                        kind,
                        stroke.last_point,
                        position,
                        ShapeStyle::from_config(config),
                    )))
                } else {
                    Outcome::none()
                }
            }
        }
    }

    /// End the gesture. With the ruler tool active the ruler is momentary
    /// and both endpoints are cleared. Nothing is redrawn when no ruler is
    /// showing, since a composite would wipe the freehand layer.
    pub fn release(&mut self, board: &Board<'_>) -> Outcome {
        let finished = std::mem::take(self);
        if finished.is_active() {
            log::debug!("Finished {:?}", finished.mode());
        }

        let ruler_shown = finished == Interaction::DraggingRuler
            || board.ruler_start.is_some()
            || board.ruler_end.is_some();
        if board.config.tool == ToolKind::Ruler && ruler_shown {
            Outcome::composite_with(BoardRequest::SetRuler {
                start: None,
                end: None,
            })
        } else {
            Outcome::none()
        }
    }

    /// Abandon any gesture without side effects (surface resize).
    pub fn cancel(&mut self) {
        if self.is_active() {
            log::debug!("Abandoning {:?}", self.mode());
        }
        *self = Interaction::Idle;
    }
}
