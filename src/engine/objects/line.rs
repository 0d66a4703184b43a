use kurbo::{Point, Vec2};

use super::{Drawable, Paint, Pen};

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub start: Point,
    pub end: Point,
    pub dashed: bool,
    pub paint: Paint,
}

impl Line {
    pub fn new(start: Point, end: Point) -> Self {
        Line {
            start,
            end,
            dashed: false,
            paint: Paint::default(),
        }
    }

    pub fn dashed(start: Point, end: Point) -> Self {
        Line {
            dashed: true,
            ..Line::new(start, end)
        }
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    pub(super) fn morph(&self, other: &Line, t: f64) -> Line {
        Line {
            start: self.start.lerp(other.start, t),
            end: self.end.lerp(other.end, t),
            dashed: if t < 0.5 { self.dashed } else { other.dashed },
            paint: self.paint.lerp(&other.paint, t),
        }
    }
}

impl Drawable for Line {
    fn kind(&self) -> &'static str {
        "line"
    }

    fn anchor(&self) -> Point {
        self.start.midpoint(self.end)
    }

    fn shift(&mut self, by: Vec2) {
        self.start += by;
        self.end += by;
    }

    fn paint(&self) -> &Paint {
        &self.paint
    }

    fn paint_mut(&mut self) -> &mut Paint {
        &mut self.paint
    }

    fn bounds(&self) -> kurbo::Rect {
        kurbo::Rect::from_points(self.start, self.end)
    }

    fn check(&self) -> Result<(), String> {
        if !self.end.x.is_finite() || !self.end.y.is_finite() {
            return Err("end point must be finite".to_string());
        }
        Ok(())
    }

    fn resolve(&self, pen: &mut Pen<'_>, reveal: f64) {
        let end = self.start.lerp(self.end, reveal);
        pen.segment(self.start, end, self.dashed);
    }
}

// Heads by octant, counter-clockwise starting at +x (right).
const HEADS: [char; 8] = ['→', '↗', '↑', '↖', '←', '↙', '↓', '↘'];

/// Head glyph for a scene-space direction.
fn head_char(dir: Vec2) -> char {
    if dir.length() < 1e-9 {
        return '•';
    }
    let angle = dir.y.atan2(dir.x).rem_euclid(std::f64::consts::TAU);
    let octant = ((angle / (std::f64::consts::TAU / 8.0)).round() as usize) % 8;
    HEADS[octant]
}

/// A vector from `start` to `end` with a head at `end`.
#[derive(Debug, Clone, PartialEq)]
pub struct Arrow {
    pub start: Point,
    pub end: Point,
    pub paint: Paint,
}

impl Arrow {
    pub fn new(start: Point, end: Point) -> Self {
        Arrow {
            start,
            end,
            paint: Paint::default(),
        }
    }

    pub(super) fn morph(&self, other: &Arrow, t: f64) -> Arrow {
        Arrow {
            start: self.start.lerp(other.start, t),
            end: self.end.lerp(other.end, t),
            paint: self.paint.lerp(&other.paint, t),
        }
    }
}

impl Drawable for Arrow {
    fn kind(&self) -> &'static str {
        "arrow"
    }

    fn anchor(&self) -> Point {
        self.start.midpoint(self.end)
    }

    fn shift(&mut self, by: Vec2) {
        self.start += by;
        self.end += by;
    }

    fn paint(&self) -> &Paint {
        &self.paint
    }

    fn paint_mut(&mut self) -> &mut Paint {
        &mut self.paint
    }

    fn bounds(&self) -> kurbo::Rect {
        kurbo::Rect::from_points(self.start, self.end)
    }

    fn resolve(&self, pen: &mut Pen<'_>, reveal: f64) {
        // Grows out of the tail, head always leading.
        let tip = self.start.lerp(self.end, reveal);
        pen.segment(self.start, tip, false);
        pen.point(tip, head_char(self.end - self.start));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::viewport::Viewport;
    use crate::types::TerminalContract;

    #[test]
    fn head_follows_direction() {
        assert_eq!(head_char(Vec2::new(1.0, 0.0)), '→');
        assert_eq!(head_char(Vec2::new(0.0, 1.0)), '↑');
        assert_eq!(head_char(Vec2::new(-1.0, 0.0)), '←');
        assert_eq!(head_char(Vec2::new(1.0, -1.0)), '↘');
    }

    #[test]
    fn partial_line_covers_fewer_cells() {
        let vp = Viewport::new(TerminalContract {
            width: 96,
            height: 30,
        });
        let line = Line::new(Point::new(-3.0, 0.0), Point::new(3.0, 0.0));
        let cells = |reveal: f64| {
            let mut ops = Vec::new();
            let mut pen = Pen::new(&vp, &mut ops, &line.paint, 1.0, 1);
            line.resolve(&mut pen, reveal);
            let mut xs: Vec<u16> = ops.iter().map(|op| op.x).collect();
            xs.dedup();
            xs.len()
        };
        assert!(cells(0.5) < cells(1.0));
        assert!(cells(1.0) >= 40);
    }

    #[test]
    fn dashed_line_skips_cells() {
        let vp = Viewport::new(TerminalContract {
            width: 96,
            height: 30,
        });
        let count = |line: &Line| {
            let mut ops = Vec::new();
            let mut pen = Pen::new(&vp, &mut ops, &line.paint, 1.0, 1);
            line.resolve(&mut pen, 1.0);
            ops.len()
        };
        let a = Point::new(-3.0, 0.0);
        let b = Point::new(3.0, 0.0);
        assert!(count(&Line::dashed(a, b)) < count(&Line::new(a, b)));
    }
}
