use kurbo::{Point, Vec2};

use super::{Drawable, Paint, Pen, check_positive, lerp};

pub const DEFAULT_DOT_RADIUS: f64 = 0.08;

#[derive(Debug, Clone, PartialEq)]
pub struct Dot {
    pub center: Point,
    pub radius: f64,
    pub paint: Paint,
}

impl Dot {
    pub fn at(x: f64, y: f64) -> Self {
        Dot::new(Point::new(x, y))
    }

    pub fn new(center: Point) -> Self {
        Dot {
            center,
            radius: DEFAULT_DOT_RADIUS,
            paint: Paint::default(),
        }
    }

    pub fn radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub(super) fn morph(&self, other: &Dot, t: f64) -> Dot {
        Dot {
            center: self.center.lerp(other.center, t),
            radius: lerp(self.radius, other.radius, t),
            paint: self.paint.lerp(&other.paint, t),
        }
    }
}

impl Drawable for Dot {
    fn kind(&self) -> &'static str {
        "dot"
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
        // Grows from a speck to its full glyph.
        let ch = if reveal < 0.5 {
            '·'
        } else if self.radius >= 0.1 {
            '●'
        } else {
            '•'
        };
        pen.point(self.center, ch);
    }
}
