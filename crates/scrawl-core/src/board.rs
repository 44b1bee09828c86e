//! The shell-owned state the surface reads, and the changes it asks for.
//!
//! The surface never mutates shell state. Each handler gets a borrowed
//! [`Board`] view and answers with [`BoardRequest`]s that the shell applies.

use crate::config::DrawingConfig;
use crate::placement::ImagePlacement;
use crate::table::TableCell;
use kurbo::{Point, Size};

/// A change the surface wants made to shell state.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardRequest {
    /// Replace both ruler endpoints.
    SetRuler {
        start: Option<Point>,
        end: Option<Point>,
    },
    /// Move the ruler's end point.
    SetRulerEnd(Point),
    /// New top-left for the background image.
    MoveImage(Point),
    /// New size for the background image.
    ResizeImage(Size),
    /// Initial placement for a freshly decoded image.
    PlaceImage(ImagePlacement),
    /// Drop the background image and its placement.
    ClearImage,
}

/// Borrowed view of shell state for one event.
#[derive(Debug, Clone, Copy)]
pub struct Board<'a> {
    pub config: &'a DrawingConfig,
    /// Encoded image reference (data URI).
    pub image_source: Option<&'a str>,
    pub placement: Option<ImagePlacement>,
    pub table: &'a [TableCell],
    pub ruler_start: Option<Point>,
    pub ruler_end: Option<Point>,
}

impl<'a> Board<'a> {
    pub fn new(config: &'a DrawingConfig) -> Self {
        Self {
            config,
            image_source: None,
            placement: None,
            table: &[],
            ruler_start: config.ruler_start,
            ruler_end: config.ruler_end,
        }
    }

    pub fn with_image(
        mut self,
        source: Option<&'a str>,
        placement: Option<ImagePlacement>,
    ) -> Self {
        self.image_source = source;
        self.placement = placement;
        self
    }

    pub fn with_table(mut self, table: &'a [TableCell]) -> Self {
        self.table = table;
        self
    }

    /// Placement of the image, if an image is actually set.
    pub fn image_placement(&self) -> Option<ImagePlacement> {
        self.image_source.and(self.placement)
    }

    /// Both ruler endpoints, when the ruler is showing.
    pub fn ruler(&self) -> Option<(Point, Point)> {
        self.ruler_start.zip(self.ruler_end)
    }

    /// Apply a request to this view, so a composite can reflect it before
    /// the shell has caught up.
    pub fn apply(&mut self, request: &BoardRequest) {
        let clears_image = apply_request(
            request,
            &mut self.ruler_start,
            &mut self.ruler_end,
            &mut self.placement,
        );
        if clears_image {
            self.image_source = None;
        }
    }
}

/// Applies `request` to the ruler and placement fields. Returns true when
/// the image source must be dropped as well.
fn apply_request(
    request: &BoardRequest,
    ruler_start: &mut Option<Point>,
    ruler_end: &mut Option<Point>,
    placement: &mut Option<ImagePlacement>,
) -> bool {
    match request {
        BoardRequest::SetRuler { start, end } => {
            *ruler_start = *start;
            *ruler_end = *end;
        }
        BoardRequest::SetRulerEnd(end) => *ruler_end = Some(*end),
        BoardRequest::MoveImage(position) => {
            if let Some(placement) = placement {
                placement.position = *position;
            }
        }
        BoardRequest::ResizeImage(size) => {
            if let Some(placement) = placement {
                placement.size = *size;
            }
        }
        BoardRequest::PlaceImage(new) => *placement = Some(*new),
        BoardRequest::ClearImage => {
            *placement = None;
            return true;
        }
    }
    false
}

/// Owned shell state. A minimal shell keeps one of these next to its
/// surface and feeds every returned request back through [`apply`].
///
/// [`apply`]: BoardState::apply
#[derive(Debug, Clone, Default)]
pub struct BoardState {
    pub config: DrawingConfig,
    pub image_source: Option<String>,
    pub placement: Option<ImagePlacement>,
    pub table: Vec<TableCell>,
}

impl BoardState {
    pub fn new(config: DrawingConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn board(&self) -> Board<'_> {
        Board::new(&self.config)
            .with_image(self.image_source.as_deref(), self.placement)
            .with_table(&self.table)
    }

    pub fn apply(&mut self, request: &BoardRequest) {
        let clears_image = apply_request(
            request,
            &mut self.config.ruler_start,
            &mut self.config.ruler_end,
            &mut self.placement,
        );
        if clears_image {
            self.image_source = None;
        }
    }

    pub fn apply_all(&mut self, requests: &[BoardRequest]) {
        for request in requests {
            self.apply(request);
        }
    }
}
