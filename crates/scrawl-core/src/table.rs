//! Text table overlay: cell records and their layout on the surface.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

pub const CELL_WIDTH: f64 = 100.0;
pub const CELL_HEIGHT: f64 = 30.0;
/// Gap between the table and the left/bottom surface edges.
pub const TABLE_MARGIN: f64 = 10.0;
/// Text origin (baseline-left) relative to the cell's top-left.
pub const TEXT_INSET_X: f64 = 5.0;
pub const TEXT_BASELINE: f64 = 20.0;
pub const FONT_SIZE: f64 = 12.0;

/// One table entry, owned by the shell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableCell {
    pub id: u64,
    pub content: String,
}

impl TableCell {
    pub fn new(id: u64, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
        }
    }
}

/// Append a cell unless the text is blank. Returns whether a cell was added.
pub fn push_cell(table: &mut Vec<TableCell>, content: &str) -> bool {
    let content = content.trim();
    if content.is_empty() {
        return false;
    }
    let id = table.iter().map(|c| c.id).max().map_or(1, |id| id + 1);
    table.push(TableCell::new(id, content));
    true
}

/// A cell positioned on the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellLayout<'a> {
    pub cell: &'a TableCell,
    pub rect: Rect,
    /// Left end of the text baseline.
    pub text_origin: Point,
}

/// Lay the table out against the bottom-left corner of a surface of the
/// given height. Entries run top to bottom in list order, so the stack
/// grows upward as entries are added.
pub fn layout(cells: &[TableCell], surface_height: f64) -> Vec<CellLayout<'_>> {
    let top = surface_height - cells.len() as f64 * CELL_HEIGHT - TABLE_MARGIN;
    cells
        .iter()
        .enumerate()
        .map(|(index, cell)| {
            let x = TABLE_MARGIN;
            let y = top + index as f64 * CELL_HEIGHT;
            CellLayout {
                cell,
                rect: Rect::new(x, y, x + CELL_WIDTH, y + CELL_HEIGHT),
                text_origin: Point::new(x + TEXT_INSET_X, y + TEXT_BASELINE),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_trims_and_skips_blank() {
        let mut table = Vec::new();
        assert!(!push_cell(&mut table, "   "));
        assert!(push_cell(&mut table, "  alpha "));
        assert!(push_cell(&mut table, "beta"));
        assert_eq!(table, vec![TableCell::new(1, "alpha"), TableCell::new(2, "beta")]);
    }

    #[test]
    fn test_ids_follow_max() {
        let mut table = vec![TableCell::new(41, "x")];
        push_cell(&mut table, "y");
        assert_eq!(table[1].id, 42);
    }

    #[test]
    fn test_layout_anchored_bottom_left() {
        let table = vec![TableCell::new(1, "a"), TableCell::new(2, "b")];
        let cells = layout(&table, 500.0);
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].rect, Rect::new(10.0, 430.0, 110.0, 460.0));
        assert_eq!(cells[1].rect, Rect::new(10.0, 460.0, 110.0, 490.0));
        assert_eq!(cells[1].text_origin, Point::new(15.0, 480.0));
        // Last row sits one margin above the bottom edge.
        assert!((500.0 - cells[1].rect.y1 - TABLE_MARGIN).abs() < f64::EPSILON);
    }

    #[test]
    fn test_layout_grows_upward() {
        let mut table = vec![TableCell::new(1, "a")];
        let before = layout(&table, 300.0)[0].rect;
        table.push(TableCell::new(2, "b"));
        let after = layout(&table, 300.0);
        assert!((before.y0 - after[0].rect.y0 - CELL_HEIGHT).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_layout() {
        assert!(layout(&[], 100.0).is_empty());
    }
}
