use kurbo::{Point, Vec2};

use super::{Drawable, NOMINAL_CELL_H, NOMINAL_CELL_W, Paint, Pen};

/// Horizontal padding on each side of a cell's text.
const CELL_PAD: usize = 1;

/// A grid of text cells with box-drawing borders. `rows[0]` is the header row.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub center: Point,
    pub rows: Vec<Vec<String>>,
    /// Render the first row in bold.
    pub header_bold: bool,
    pub paint: Paint,
}

impl Table {
    pub fn new<R, S>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Table {
            center: Point::ORIGIN,
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
            header_bold: true,
            paint: Paint::default(),
        }
    }

    fn col_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Content width of each column, padding included.
    fn col_widths(&self) -> Vec<usize> {
        (0..self.col_count())
            .map(|c| {
                let widest = self
                    .rows
                    .iter()
                    .filter_map(|r| r.get(c))
                    .map(|s| s.chars().count())
                    .max()
                    .unwrap_or(0);
                widest + 2 * CELL_PAD
            })
            .collect()
    }

    /// Size of the whole table in cells, borders included.
    fn cell_size(&self) -> (usize, usize) {
        let widths = self.col_widths();
        let w = widths.iter().sum::<usize>() + widths.len() + 1;
        let h = 2 * self.rows.len() + 1;
        (w, h)
    }

    pub(super) fn morph(&self, other: &Table, t: f64) -> Table {
        let src = if t < 0.5 { self } else { other };
        Table {
            center: self.center.lerp(other.center, t),
            paint: self.paint.lerp(&other.paint, t),
            ..src.clone()
        }
    }
}

/// One horizontal border line: `left`, `mid` at column joins, `right`.
fn border_line(widths: &[usize], left: char, mid: char, right: char) -> String {
    let mut line = String::new();
    line.push(left);
    for (i, &w) in widths.iter().enumerate() {
        line.extend(std::iter::repeat_n('─', w));
        line.push(if i + 1 == widths.len() { right } else { mid });
    }
    line
}

impl Drawable for Table {
    fn kind(&self) -> &'static str {
        "table"
    }

    fn anchor(&self) -> Point {
        self.center
    }

    fn shift(&mut self, by: Vec2) {
        self.center += by;
    }

    fn paint(&self) -> &Paint {
        &self.paint
    }

    fn paint_mut(&mut self) -> &mut Paint {
        &mut self.paint
    }

    fn bounds(&self) -> kurbo::Rect {
        let (w, h) = self.cell_size();
        kurbo::Rect::from_center_size(
            self.center,
            (w as f64 * NOMINAL_CELL_W, h as f64 * NOMINAL_CELL_H),
        )
    }

    fn check(&self) -> Result<(), String> {
        let cols = self.col_count();
        if cols == 0 {
            return Err("table needs at least one row and column".to_string());
        }
        if let Some(i) = self.rows.iter().position(|r| r.len() != cols) {
            return Err(format!(
                "row {i} has {} cells, expected {cols}",
                self.rows[i].len()
            ));
        }
        Ok(())
    }

    fn resolve(&self, pen: &mut Pen<'_>, reveal: f64) {
        let widths = self.col_widths();
        let (w, h) = self.cell_size();
        let (col, row) = pen.viewport().to_cell(self.center);
        let left = col - w as i32 / 2;
        let top = row - h as i32 / 2;

        // Rows appear top to bottom.
        let shown = ((self.rows.len() as f64 * reveal).ceil() as usize).min(self.rows.len());
        pen.text(left, top, &border_line(&widths, '┌', '┬', '┐'));
        for (r, cells) in self.rows.iter().take(shown).enumerate() {
            let y = top + 1 + 2 * r as i32;
            let mut x = left;
            pen.cell(x, y, '│');
            for (text, &cw) in cells.iter().zip(&widths) {
                let len = text.chars().count();
                let at = x + 1 + ((cw - len) / 2) as i32;
                if r == 0 && self.header_bold {
                    pen.emphasized(|pen| pen.text(at, y, text));
                } else {
                    pen.text(at, y, text);
                }
                x += cw as i32 + 1;
                pen.cell(x, y, '│');
            }
            let (l, m, rt) = if r + 1 == self.rows.len() {
                ('└', '┴', '┘')
            } else {
                ('├', '┼', '┤')
            };
            pen.text(left, y + 1, &border_line(&widths, l, m, rt));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::viewport::Viewport;
    use crate::types::{DrawOp, TerminalContract};

    fn stocks() -> Table {
        Table::new([
            vec!["Day", "1", "2"],
            vec!["Coca-Cola", "0.5%", "-0.3%"],
        ])
    }

    fn render(table: &Table, reveal: f64) -> Vec<DrawOp> {
        let vp = Viewport::new(TerminalContract {
            width: 96,
            height: 30,
        });
        let mut ops = Vec::new();
        let mut pen = Pen::new(&vp, &mut ops, &table.paint, 1.0, 1);
        table.resolve(&mut pen, reveal);
        ops
    }

    #[test]
    fn columns_fit_widest_cell() {
        assert_eq!(stocks().col_widths(), vec![11, 6, 7]);
        // 24 content + 4 borders, 2 rows of text + 3 border lines
        assert_eq!(stocks().cell_size(), (28, 5));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let t = Table::new([vec!["a", "b"], vec!["c"]]);
        assert!(t.check().unwrap_err().contains("row 1"));
        assert!(Table::new(Vec::<Vec<&str>>::new()).check().is_err());
    }

    #[test]
    fn header_is_bold_and_rows_reveal_in_order() {
        let ops = render(&stocks(), 1.0);
        let day = ops.iter().find(|op| op.ch == 'D').unwrap();
        assert!(day.style.bold);
        assert!(ops.iter().any(|op| op.ch == '┘'));

        let half = render(&stocks(), 0.5);
        assert!(!half.iter().any(|op| op.ch == 'C'));
        assert!(half.iter().any(|op| op.ch == '├'));
    }
}
