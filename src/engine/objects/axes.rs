use kurbo::{Point, Vec2};

use super::{Drawable, NOMINAL_CELL_H, NOMINAL_CELL_W, Paint, Pen, lerp};

/// Upper bound on ticks per axis.
const MAX_TICKS: usize = 1000;

/// Axis domain `[min, max]` with tick spacing `step`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl AxisRange {
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        AxisRange { min, max, step }
    }

    fn span(&self) -> f64 {
        self.max - self.min
    }

    fn mid(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// Where the perpendicular axis crosses: zero, clamped into the range.
    fn origin(&self) -> f64 {
        0.0_f64.clamp(self.min, self.max)
    }

    fn ticks(&self) -> Vec<f64> {
        let n = (self.span() / self.step + 1e-9).floor() as usize;
        (0..=n).map(|i| self.min + i as f64 * self.step).collect()
    }

    fn check(&self, axis: &str) -> Result<(), String> {
        if !(self.min.is_finite() && self.max.is_finite() && self.step.is_finite()) {
            return Err(format!("{axis} range must be finite"));
        }
        if self.max <= self.min {
            return Err(format!(
                "{axis} range must be increasing (got {}..{})",
                self.min, self.max
            ));
        }
        if self.step <= 0.0 {
            return Err(format!("{axis} step must be > 0 (got {})", self.step));
        }
        if self.span() / self.step > MAX_TICKS as f64 {
            return Err(format!(
                "{axis} step {} gives more than {MAX_TICKS} ticks over {}..{}",
                self.step, self.min, self.max
            ));
        }
        Ok(())
    }
}

/// A pair of number lines, optionally with tick labels, arrow tips and a background grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Axes {
    pub center: Point,
    pub x_range: AxisRange,
    pub y_range: AxisRange,
    /// On-screen length of each axis in scene units.
    pub x_length: f64,
    pub y_length: f64,
    pub numbers: bool,
    pub tips: bool,
    pub grid: bool,
    pub paint: Paint,
}

impl Axes {
    pub fn new(x_range: AxisRange, y_range: AxisRange) -> Self {
        Axes {
            center: Point::ORIGIN,
            x_range,
            y_range,
            x_length: 12.0,
            y_length: 6.0,
            numbers: false,
            tips: true,
            grid: false,
            paint: Paint::default(),
        }
    }

    pub fn lengths(mut self, x_length: f64, y_length: f64) -> Self {
        self.x_length = x_length;
        self.y_length = y_length;
        self
    }

    pub fn with_numbers(mut self) -> Self {
        self.numbers = true;
        self
    }

    pub fn without_tips(mut self) -> Self {
        self.tips = false;
        self
    }

    /// Background grid, number-plane style.
    pub fn with_grid(mut self) -> Self {
        self.grid = true;
        self
    }

    /// Uniform scale about the centre.
    pub fn scale(mut self, factor: f64) -> Self {
        self.x_length *= factor;
        self.y_length *= factor;
        self
    }

    /// Coordinates to scene point.
    pub fn c2p(&self, x: f64, y: f64) -> Point {
        Point::new(
            self.center.x + (x - self.x_range.mid()) * self.x_length / self.x_range.span(),
            self.center.y + (y - self.y_range.mid()) * self.y_length / self.y_range.span(),
        )
    }

    /// Far end of the x axis, where a label goes.
    pub fn x_axis_end(&self) -> Point {
        self.c2p(self.x_range.max, self.y_range.origin())
    }

    pub fn y_axis_end(&self) -> Point {
        self.c2p(self.x_range.origin(), self.y_range.max)
    }

    pub(super) fn morph(&self, other: &Axes, t: f64) -> Axes {
        let src = if t < 0.5 { self } else { other };
        Axes {
            center: self.center.lerp(other.center, t),
            x_length: lerp(self.x_length, other.x_length, t),
            y_length: lerp(self.y_length, other.y_length, t),
            paint: self.paint.lerp(&other.paint, t),
            ..src.clone()
        }
    }

    fn resolve_grid(&self, pen: &mut Pen<'_>) {
        let vp = *pen.viewport();
        for x in self.x_range.ticks() {
            let (col, _) = vp.to_cell(self.c2p(x, 0.0));
            let (_, r0) = vp.to_cell(self.c2p(0.0, self.y_range.max));
            let (_, r1) = vp.to_cell(self.c2p(0.0, self.y_range.min));
            for row in r0..=r1 {
                pen.cell(col, row, '·');
            }
        }
        for y in self.y_range.ticks() {
            let (_, row) = vp.to_cell(self.c2p(0.0, y));
            let (c0, _) = vp.to_cell(self.c2p(self.x_range.min, 0.0));
            let (c1, _) = vp.to_cell(self.c2p(self.x_range.max, 0.0));
            for col in c0..=c1 {
                pen.cell(col, row, '·');
            }
        }
    }
}

fn format_tick(v: f64) -> String {
    if (v - v.round()).abs() < 1e-9 {
        format!("{}", v.round() as i64)
    } else {
        format!("{v:.1}")
    }
}

impl Drawable for Axes {
    fn kind(&self) -> &'static str {
        "axes"
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
        let pad_x = if self.numbers { 2.0 * NOMINAL_CELL_W } else { 0.0 };
        let pad_y = if self.numbers { NOMINAL_CELL_H } else { 0.0 };
        kurbo::Rect::from_center_size(self.center, (self.x_length, self.y_length))
            .inflate(pad_x, pad_y)
    }

    fn check(&self) -> Result<(), String> {
        self.x_range.check("x")?;
        self.y_range.check("y")?;
        super::check_positive("x length", self.x_length)?;
        super::check_positive("y length", self.y_length)
    }

    fn resolve(&self, pen: &mut Pen<'_>, reveal: f64) {
        let vp = *pen.viewport();
        let x0 = self.x_range.origin();
        let y0 = self.y_range.origin();

        // Grid first so the axis lines overwrite it.
        if self.grid && reveal >= 1.0 {
            pen.softened(|pen| self.resolve_grid(pen));
        }

        let x_start = self.c2p(self.x_range.min, y0);
        let x_end = self.c2p(self.x_range.max, y0);
        let y_start = self.c2p(x0, self.y_range.min);
        let y_end = self.c2p(x0, self.y_range.max);
        let x_tip = x_start.lerp(x_end, reveal);
        let y_tip = y_start.lerp(y_end, reveal);
        pen.segment(x_start, x_tip, false);
        pen.segment(y_start, y_tip, false);

        if reveal < 1.0 {
            return;
        }

        for x in self.x_range.ticks() {
            let p = self.c2p(x, y0);
            let (col, row) = vp.to_cell(p);
            pen.cell(col, row, '┬');
            if self.numbers && (x - x0).abs() > 1e-9 {
                let label = format_tick(x);
                pen.text(col - label.chars().count() as i32 / 2, row + 1, &label);
            }
        }
        for y in self.y_range.ticks() {
            let p = self.c2p(x0, y);
            let (col, row) = vp.to_cell(p);
            pen.cell(col, row, '┤');
            if self.numbers && (y - y0).abs() > 1e-9 {
                let label = format_tick(y);
                pen.text(col - 1 - label.chars().count() as i32, row, &label);
            }
        }
        let (oc, or) = vp.to_cell(self.c2p(x0, y0));
        pen.cell(oc, or, '┼');

        if self.tips {
            pen.point(x_end, '▶');
            pen.point(y_end, '▲');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::viewport::Viewport;
    use crate::types::TerminalContract;

    fn axes() -> Axes {
        Axes::new(AxisRange::new(0.0, 5.0, 1.0), AxisRange::new(0.0, 5.0, 1.0)).lengths(5.0, 5.0)
    }

    #[test]
    fn c2p_maps_range_onto_lengths() {
        let a = axes();
        assert_eq!(a.c2p(0.0, 0.0), Point::new(-2.5, -2.5));
        assert_eq!(a.c2p(5.0, 5.0), Point::new(2.5, 2.5));
        let scaled = axes().scale(0.5);
        assert_eq!(scaled.c2p(5.0, 0.0), Point::new(1.25, -1.25));
    }

    #[test]
    fn ticks_cover_range_inclusive() {
        assert_eq!(AxisRange::new(0.0, 5.0, 1.0).ticks().len(), 6);
        assert_eq!(AxisRange::new(-3.0, 3.0, 1.5).ticks().len(), 5);
    }

    #[test]
    fn check_rejects_empty_ranges() {
        let bad = Axes::new(AxisRange::new(2.0, 2.0, 1.0), AxisRange::new(0.0, 1.0, 1.0));
        assert!(bad.check().unwrap_err().contains("increasing"));
        let no_step = Axes::new(AxisRange::new(0.0, 2.0, 0.0), AxisRange::new(0.0, 1.0, 1.0));
        assert!(no_step.check().is_err());
        let dense = Axes::new(AxisRange::new(0.0, 1e6, 1e-9), AxisRange::new(0.0, 1.0, 1.0));
        assert!(dense.check().unwrap_err().contains("ticks"));
        let fine = Axes::new(AxisRange::new(0.0, 10.0, 0.01), AxisRange::new(0.0, 1.0, 1.0));
        assert!(fine.check().is_ok());
    }

    #[test]
    fn numbers_and_tips_draw_when_complete() {
        let vp = Viewport::new(TerminalContract {
            width: 96,
            height: 30,
        });
        let a = axes().with_numbers();
        let mut ops = Vec::new();
        let mut pen = Pen::new(&vp, &mut ops, &a.paint, 1.0, 1);
        a.resolve(&mut pen, 1.0);
        assert!(ops.iter().any(|op| op.ch == '▶'));
        assert!(ops.iter().any(|op| op.ch == '5'));

        let mut partial = Vec::new();
        let mut pen = Pen::new(&vp, &mut partial, &a.paint, 1.0, 1);
        a.resolve(&mut pen, 0.5);
        assert!(!partial.iter().any(|op| op.ch == '▶' || op.ch == '5'));
    }
}
