//! Mapping from scene units to terminal cells.
//!
//! Scenes are authored in a 16:9 frame that is `FRAME_HEIGHT` units tall with
//! the origin at its centre, x to the right and y up. The viewport stretches
//! that frame over the cell grid.

use kurbo::Point;

use crate::types::TerminalContract;

pub const FRAME_HEIGHT: f64 = 8.0;
pub const FRAME_WIDTH: f64 = FRAME_HEIGHT * 16.0 / 9.0;

#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
}

impl Viewport {
    pub fn new(contract: TerminalContract) -> Self {
        Viewport {
            cols: contract.width,
            rows: contract.height,
        }
    }

    /// Scene units covered by one column.
    pub fn unit_x(&self) -> f64 {
        FRAME_WIDTH / f64::from(self.cols.max(1))
    }

    /// Scene units covered by one row.
    pub fn unit_y(&self) -> f64 {
        FRAME_HEIGHT / f64::from(self.rows.max(1))
    }

    /// Cell containing `p`. May be off-grid (negative or past the edge).
    pub fn to_cell(&self, p: Point) -> (i32, i32) {
        let col = ((p.x + FRAME_WIDTH / 2.0) / self.unit_x()).floor();
        let row = ((FRAME_HEIGHT / 2.0 - p.y) / self.unit_y()).floor();
        (col as i32, row as i32)
    }

    /// Scene-space centre of a cell.
    pub fn cell_center(&self, col: i32, row: i32) -> Point {
        Point::new(
            (f64::from(col) + 0.5) * self.unit_x() - FRAME_WIDTH / 2.0,
            FRAME_HEIGHT / 2.0 - (f64::from(row) + 0.5) * self.unit_y(),
        )
    }

    pub fn contains(&self, col: i32, row: i32) -> bool {
        col >= 0 && row >= 0 && col < i32::from(self.cols) && row < i32::from(self.rows)
    }

    /// Sampling step along a path so that consecutive samples never skip a cell.
    pub fn sample_step(&self) -> f64 {
        self.unit_x().min(self.unit_y()) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(TerminalContract {
            width: 96,
            height: 30,
        })
    }

    #[test]
    fn origin_maps_to_grid_centre() {
        let (col, row) = viewport().to_cell(Point::ORIGIN);
        assert_eq!((col, row), (48, 15));
    }

    #[test]
    fn corners_map_to_grid_edges() {
        let vp = viewport();
        let top_left = Point::new(-FRAME_WIDTH / 2.0 + 1e-9, FRAME_HEIGHT / 2.0 - 1e-9);
        assert_eq!(vp.to_cell(top_left), (0, 0));
        let bottom_right = Point::new(FRAME_WIDTH / 2.0 - 1e-9, -FRAME_HEIGHT / 2.0 + 1e-9);
        assert_eq!(vp.to_cell(bottom_right), (95, 29));
    }

    #[test]
    fn cell_center_round_trips() {
        let vp = viewport();
        let p = vp.cell_center(10, 7);
        assert_eq!(vp.to_cell(p), (10, 7));
    }
}
