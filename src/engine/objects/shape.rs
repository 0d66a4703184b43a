use std::f64::consts::TAU;

use kurbo::{Point, Vec2};

use super::{Drawable, Paint, Pen, Primitive, check_positive, lerp, slope_char};

// ---------------------------------------------------------------------------
// Rect
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    pub center: Point,
    pub width: f64,
    pub height: f64,
    pub paint: Paint,
}

impl Rect {
    pub fn new(width: f64, height: f64) -> Self {
        Rect {
            center: Point::ORIGIN,
            width,
            height,
            paint: Paint::default(),
        }
    }

    pub fn square(side: f64) -> Self {
        Rect::new(side, side)
    }

    /// Highlight box around another primitive, `buff` units away from its bounds.
    pub fn surrounding(target: &Primitive, buff: f64) -> Self {
        Rect::around(target.bounds(), buff)
    }

    /// Yellow outline around an arbitrary region.
    pub fn around(region: kurbo::Rect, buff: f64) -> Self {
        let b = region.inflate(buff, buff);
        Rect {
            center: b.center(),
            width: b.width(),
            height: b.height(),
            paint: Paint {
                color: super::paint::YELLOW,
                ..Paint::default()
            },
        }
    }

    pub(super) fn morph(&self, other: &Rect, t: f64) -> Rect {
        Rect {
            center: self.center.lerp(other.center, t),
            width: lerp(self.width, other.width, t),
            height: lerp(self.height, other.height, t),
            paint: self.paint.lerp(&other.paint, t),
        }
    }

    /// Border cells in clockwise order from the top-left corner.
    fn perimeter(c0: i32, r0: i32, c1: i32, r1: i32) -> Vec<(i32, i32, char)> {
        let mut cells = Vec::new();
        if c0 == c1 {
            for r in r0..=r1 {
                cells.push((c0, r, '│'));
            }
            return cells;
        }
        if r0 == r1 {
            for c in c0..=c1 {
                cells.push((c, r0, '─'));
            }
            return cells;
        }
        cells.push((c0, r0, '┌'));
        for c in c0 + 1..c1 {
            cells.push((c, r0, '─'));
        }
        cells.push((c1, r0, '┐'));
        for r in r0 + 1..r1 {
            cells.push((c1, r, '│'));
        }
        cells.push((c1, r1, '┘'));
        for c in (c0 + 1..c1).rev() {
            cells.push((c, r1, '─'));
        }
        cells.push((c0, r1, '└'));
        for r in (r0 + 1..r1).rev() {
            cells.push((c0, r, '│'));
        }
        cells
    }
}

impl Drawable for Rect {
    fn kind(&self) -> &'static str {
        "rect"
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
        kurbo::Rect::from_center_size(self.center, (self.width, self.height))
    }

    fn check(&self) -> Result<(), String> {
        check_positive("width", self.width)?;
        check_positive("height", self.height)
    }

    fn resolve(&self, pen: &mut Pen<'_>, reveal: f64) {
        let b = self.bounds();
        let vp = *pen.viewport();
        let (c0, r0) = vp.to_cell(Point::new(b.x0, b.y1));
        let (c1, r1) = vp.to_cell(Point::new(b.x1, b.y0));

        if reveal >= 1.0 && pen.has_fill() {
            for r in r0 + 1..r1 {
                for c in c0 + 1..c1 {
                    pen.fill_cell(c, r);
                }
            }
        }

        let cells = Self::perimeter(c0, r0, c1, r1);
        let shown = (cells.len() as f64 * reveal).ceil() as usize;
        for &(c, r, ch) in cells.iter().take(shown) {
            pen.cell(c, r, ch);
        }
    }
}

// ---------------------------------------------------------------------------
// Circle / Arc
// ---------------------------------------------------------------------------

/// Trace an arc from `start` sweeping `sweep` radians (positive is counter-clockwise).
fn trace_arc(pen: &mut Pen<'_>, center: Point, radius: f64, start: f64, sweep: f64) {
    let vp = *pen.viewport();
    let steps = ((radius * sweep.abs()) / vp.sample_step()).ceil().max(1.0) as usize;
    for i in 0..=steps {
        let theta = start + sweep * (i as f64 / steps as f64);
        let p = center + Vec2::from_angle(theta) * radius;
        // Tangent in cell space: rows grow downward.
        let dx = -theta.sin() / vp.unit_x();
        let dy = -theta.cos() / vp.unit_y();
        pen.point(p, slope_char(dx, dy));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
    pub paint: Paint,
}

impl Circle {
    pub fn new(radius: f64) -> Self {
        Circle {
            center: Point::ORIGIN,
            radius,
            paint: Paint::default(),
        }
    }

    /// Point on the circle at `angle` radians from +x.
    pub fn point_at_angle(&self, angle: f64) -> Point {
        self.center + Vec2::from_angle(angle) * self.radius
    }

    pub(super) fn morph(&self, other: &Circle, t: f64) -> Circle {
        Circle {
            center: self.center.lerp(other.center, t),
            radius: lerp(self.radius, other.radius, t),
            paint: self.paint.lerp(&other.paint, t),
        }
    }
}

impl Drawable for Circle {
    fn kind(&self) -> &'static str {
        "circle"
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
        kurbo::Rect::from_center_size(self.center, (self.radius * 2.0, self.radius * 2.0))
    }

    fn check(&self) -> Result<(), String> {
        check_positive("radius", self.radius)
    }

    fn resolve(&self, pen: &mut Pen<'_>, reveal: f64) {
        if reveal >= 1.0 && pen.has_fill() {
            let vp = *pen.viewport();
            let b = self.bounds();
            let (c0, r0) = vp.to_cell(Point::new(b.x0, b.y1));
            let (c1, r1) = vp.to_cell(Point::new(b.x1, b.y0));
            for r in r0..=r1 {
                for c in c0..=c1 {
                    if vp.cell_center(c, r).distance(self.center) < self.radius * 0.9 {
                        pen.fill_cell(c, r);
                    }
                }
            }
        }
        trace_arc(pen, self.center, self.radius, 0.0, TAU * reveal);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    pub center: Point,
    pub radius: f64,
    pub start_angle: f64,
    /// Signed sweep in radians; positive is counter-clockwise.
    pub angle: f64,
    pub paint: Paint,
}

impl Arc {
    pub fn new(radius: f64, start_angle: f64, angle: f64) -> Self {
        Arc {
            center: Point::ORIGIN,
            radius,
            start_angle,
            angle,
            paint: Paint::default(),
        }
    }

    /// Angle marker between two directions, swept counter-clockwise from `from` to `to`.
    pub fn between(center: Point, from: Vec2, to: Vec2, radius: f64) -> Self {
        let start = from.y.atan2(from.x);
        let end = to.y.atan2(to.x);
        let sweep = (end - start).rem_euclid(TAU);
        Arc {
            center,
            ..Arc::new(radius, start, sweep)
        }
    }

    /// Point halfway along the arc, pushed out to `radius`. Handy for labels.
    pub fn mid_point_at(&self, radius: f64) -> Point {
        self.center + Vec2::from_angle(self.start_angle + self.angle / 2.0) * radius
    }

    pub(super) fn morph(&self, other: &Arc, t: f64) -> Arc {
        Arc {
            center: self.center.lerp(other.center, t),
            radius: lerp(self.radius, other.radius, t),
            start_angle: lerp(self.start_angle, other.start_angle, t),
            angle: lerp(self.angle, other.angle, t),
            paint: self.paint.lerp(&other.paint, t),
        }
    }
}

impl Drawable for Arc {
    fn kind(&self) -> &'static str {
        "arc"
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
        kurbo::Rect::from_center_size(self.center, (self.radius * 2.0, self.radius * 2.0))
    }

    fn check(&self) -> Result<(), String> {
        check_positive("radius", self.radius)?;
        if !self.start_angle.is_finite() || !self.angle.is_finite() {
            return Err("angles must be finite".to_string());
        }
        Ok(())
    }

    fn resolve(&self, pen: &mut Pen<'_>, reveal: f64) {
        trace_arc(
            pen,
            self.center,
            self.radius,
            self.start_angle,
            self.angle * reveal,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::objects::Dot;

    #[test]
    fn arc_between_sweeps_counter_clockwise() {
        let arc = Arc::between(Point::ORIGIN, Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0), 0.5);
        assert!((arc.start_angle - 0.0).abs() < 1e-9);
        assert!((arc.angle - TAU / 4.0).abs() < 1e-9);

        let wrapped = Arc::between(Point::ORIGIN, Vec2::new(0.0, 1.0), Vec2::new(1.0, 0.0), 0.5);
        assert!((wrapped.angle - 3.0 * TAU / 4.0).abs() < 1e-9);
    }

    #[test]
    fn surrounding_rect_encloses_target() {
        let dot: Primitive = Dot::at(2.0, 1.0).radius(0.1).into();
        let rect = Rect::surrounding(&dot, 0.2);
        assert!((rect.width - 0.6).abs() < 1e-9);
        assert!(rect.center.distance(Point::new(2.0, 1.0)) < 1e-9);
    }

    #[test]
    fn perimeter_is_closed_box() {
        let cells = Rect::perimeter(0, 0, 3, 2);
        // 4 top + 1 right side + 4 bottom + 1 left side
        assert_eq!(cells.len(), 10);
        assert_eq!(cells[0], (0, 0, '┌'));
        assert!(cells.contains(&(3, 2, '┘')));
    }

    #[test]
    fn circle_rejects_non_positive_radius() {
        assert!(Circle::new(0.0).check().is_err());
        assert!(Circle::new(1.0).check().is_ok());
    }
}
