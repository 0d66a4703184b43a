//! Primitive types and their resolve implementations.
//!
//! Each primitive lives in its own module with its struct definition and
//! `Drawable` implementation side by side. `Primitive` is the closed set the
//! scene graph stores; it dispatches to the variant.

pub mod font;
pub mod paint;
pub mod tex;
mod axes;
mod dot;
mod line;
mod shape;
mod table;
mod text;

pub use axes::{AxisRange, Axes};
pub use dot::Dot;
pub use line::{Arrow, Line};
pub use paint::Paint;
pub use shape::{Arc, Circle, Rect};
pub use table::Table;
pub use text::{Formula, Text};

use kurbo::{Point, Vec2};

use crate::types::{Color, DrawOp, Style};

use super::error::{ScriptError, ScriptResult};
use super::viewport::{FRAME_HEIGHT, FRAME_WIDTH, Viewport};

/// Scene-unit size of one character on the reference 96x30 grid. Used for
/// bounds of text-like primitives, which are laid out in cells.
pub const NOMINAL_CELL_W: f64 = FRAME_WIDTH / 96.0;
pub const NOMINAL_CELL_H: f64 = FRAME_HEIGHT / 30.0;

/// Capability interface shared by every primitive variant.
pub trait Drawable {
    fn kind(&self) -> &'static str;
    fn anchor(&self) -> Point;
    fn shift(&mut self, by: Vec2);
    fn paint(&self) -> &Paint;
    fn paint_mut(&mut self) -> &mut Paint;
    /// Text or formula source, for primitives that carry any.
    fn content(&self) -> Option<&str> {
        None
    }
    fn bounds(&self) -> kurbo::Rect;
    /// Variant-specific parameter checks.
    fn check(&self) -> Result<(), String> {
        Ok(())
    }
    /// Emit cells. `reveal` in 0..=1 is how much of the primitive has been drawn in.
    fn resolve(&self, pen: &mut Pen<'_>, reveal: f64);

    fn move_to(&mut self, to: Point) {
        let by = to - self.anchor();
        self.shift(by);
    }
}

pub const UP: Vec2 = Vec2::new(0.0, 1.0);
pub const DOWN: Vec2 = Vec2::new(0.0, -1.0);
pub const LEFT: Vec2 = Vec2::new(-1.0, 0.0);
pub const RIGHT: Vec2 = Vec2::new(1.0, 0.0);

/// Default gap for `next_to`.
pub const NEXT_TO_BUFF: f64 = 0.25;
/// Default margin for `to_edge`.
pub const EDGE_BUFF: f64 = 0.5;

/// Point on the edge of `r` in direction `dir` (a corner for diagonals).
fn edge_point(r: kurbo::Rect, dir: Vec2) -> Point {
    let c = r.center();
    Point::new(
        c.x + dir.x.signum() * r.width() / 2.0 * f64::from(dir.x != 0.0),
        c.y + dir.y.signum() * r.height() / 2.0 * f64::from(dir.y != 0.0),
    )
}

/// Builder-style paint and placement setters for every drawable.
pub trait PaintExt: Drawable + Sized {
    fn color(mut self, color: Color) -> Self {
        self.paint_mut().color = color;
        self
    }

    fn fill(mut self, color: Color, opacity: f64) -> Self {
        let paint = self.paint_mut();
        paint.fill = Some(color);
        paint.fill_opacity = opacity;
        self
    }

    fn stroke_width(mut self, width: f64) -> Self {
        self.paint_mut().stroke_width = width;
        self
    }

    fn opacity(mut self, opacity: f64) -> Self {
        self.paint_mut().opacity = opacity;
        self
    }

    fn placed(mut self, to: Point) -> Self {
        self.move_to(to);
        self
    }

    fn shifted(mut self, by: Vec2) -> Self {
        self.shift(by);
        self
    }

    /// Place beside `target` in direction `dir`, `buff` units from its edge.
    fn next_to(mut self, target: kurbo::Rect, dir: Vec2, buff: f64) -> Self {
        let own = self.bounds();
        let to = edge_point(target, dir) + dir * buff;
        let from = edge_point(own, -dir);
        self.shift(to - from);
        self
    }

    /// Push against the frame edge in direction `dir`, keeping the other axis.
    fn to_edge(mut self, dir: Vec2, buff: f64) -> Self {
        let frame = kurbo::Rect::from_center_size(Point::ORIGIN, (FRAME_WIDTH, FRAME_HEIGHT));
        let to = edge_point(frame, dir) - dir * buff;
        let from = edge_point(self.bounds(), dir);
        let by = Vec2::new(
            if dir.x != 0.0 { to.x - from.x } else { 0.0 },
            if dir.y != 0.0 { to.y - from.y } else { 0.0 },
        );
        self.shift(by);
        self
    }
}

/// Zero-size bounds at a point, for placing things next to a coordinate.
pub fn at_point(p: Point) -> kurbo::Rect {
    kurbo::Rect::from_points(p, p)
}

impl<T: Drawable + Sized> PaintExt for T {}

// ---------------------------------------------------------------------------
// Pen: cell emission for one primitive
// ---------------------------------------------------------------------------

pub struct Pen<'a> {
    viewport: &'a Viewport,
    ops: &'a mut Vec<DrawOp>,
    stroke: Option<Style>,
    fill: Option<Style>,
    z_order: i32,
}

/// Dash period in scene units: half drawn, half skipped.
const DASH_PERIOD: f64 = 0.3;

impl<'a> Pen<'a> {
    pub fn new(
        viewport: &'a Viewport,
        ops: &'a mut Vec<DrawOp>,
        paint: &Paint,
        opacity: f64,
        z_order: i32,
    ) -> Self {
        Pen {
            viewport,
            ops,
            stroke: paint.stroke_style(opacity),
            fill: paint.fill_style(opacity),
            z_order,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        self.viewport
    }

    pub fn is_blank(&self) -> bool {
        self.stroke.is_none() && self.fill.is_none()
    }

    pub fn has_fill(&self) -> bool {
        self.fill.is_some()
    }

    /// Draw subsequent strokes bold.
    pub fn emphasize(&mut self) {
        if let Some(s) = &mut self.stroke {
            s.bold = true;
        }
    }

    /// Draw subsequent strokes dim.
    pub fn soften(&mut self) {
        if let Some(s) = &mut self.stroke {
            s.dim = true;
        }
    }

    /// Run `f` with strokes drawn bold, then restore the previous stroke style.
    pub fn emphasized<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.scoped(Self::emphasize, f)
    }

    /// Run `f` with strokes drawn dim, then restore the previous stroke style.
    pub fn softened<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.scoped(Self::soften, f)
    }

    fn scoped<R>(&mut self, set: fn(&mut Self), f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = self.stroke.clone();
        set(self);
        let out = f(self);
        self.stroke = saved;
        out
    }

    pub fn cell(&mut self, col: i32, row: i32, ch: char) {
        let Some(style) = &self.stroke else {
            return;
        };
        if self.viewport.contains(col, row) {
            self.ops.push(DrawOp {
                x: col as u16,
                y: row as u16,
                ch,
                style: style.clone(),
                z_order: self.z_order,
            });
        }
    }

    /// Interior fill, drawn one z-level below the primitive's strokes.
    pub fn fill_cell(&mut self, col: i32, row: i32) {
        let Some(style) = &self.fill else {
            return;
        };
        if self.viewport.contains(col, row) {
            self.ops.push(DrawOp {
                x: col as u16,
                y: row as u16,
                ch: '░',
                style: style.clone(),
                z_order: self.z_order - 1,
            });
        }
    }

    pub fn point(&mut self, p: Point, ch: char) {
        let (col, row) = self.viewport.to_cell(p);
        self.cell(col, row, ch);
    }

    /// Straight stroke from `a` to `b`, glyph chosen from its on-screen slope.
    pub fn segment(&mut self, a: Point, b: Point, dashed: bool) {
        let len = a.distance(b);
        let dx = (b.x - a.x) / self.viewport.unit_x();
        let dy = (a.y - b.y) / self.viewport.unit_y();
        let ch = slope_char(dx, dy);
        let steps = (len / self.viewport.sample_step()).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            if dashed && ((t * len / (DASH_PERIOD / 2.0)).floor() as i64) % 2 == 1 {
                continue;
            }
            self.point(a.lerp(b, t), ch);
        }
    }

    /// One line of text starting at a cell.
    pub fn text(&mut self, col: i32, row: i32, text: &str) {
        for (i, ch) in text.chars().enumerate() {
            if ch != ' ' {
                self.cell(col + i as i32, row, ch);
            }
        }
    }

    /// One line of text centred on `p`.
    pub fn text_centered(&mut self, p: Point, text: &str) {
        let (col, row) = self.viewport.to_cell(p);
        let len = text.chars().count() as i32;
        self.text(col - len / 2, row, text);
    }
}

/// Box-drawing glyph for a direction given in columns and rows (rows grow downward).
pub fn slope_char(dx: f64, dy: f64) -> char {
    if dx.abs() < 1e-9 && dy.abs() < 1e-9 {
        '·'
    } else if dx.abs() >= 2.0 * dy.abs() {
        '─'
    } else if dy.abs() >= 2.0 * dx.abs() {
        '│'
    } else if dx * dy > 0.0 {
        '╲'
    } else {
        '╱'
    }
}

// ---------------------------------------------------------------------------
// Primitive: the closed set
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Dot(Dot),
    Line(Line),
    Arrow(Arrow),
    Rect(Rect),
    Circle(Circle),
    Arc(Arc),
    Text(Text),
    Formula(Formula),
    Axes(Axes),
    Table(Table),
}

macro_rules! impl_from_variant {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Primitive {
                fn from(v: $variant) -> Self {
                    Primitive::$variant(v)
                }
            }
        )*
    };
}

impl_from_variant!(Dot, Line, Arrow, Rect, Circle, Arc, Text, Formula, Axes, Table);

impl Primitive {
    pub fn as_drawable(&self) -> &dyn Drawable {
        match self {
            Primitive::Dot(o) => o,
            Primitive::Line(o) => o,
            Primitive::Arrow(o) => o,
            Primitive::Rect(o) => o,
            Primitive::Circle(o) => o,
            Primitive::Arc(o) => o,
            Primitive::Text(o) => o,
            Primitive::Formula(o) => o,
            Primitive::Axes(o) => o,
            Primitive::Table(o) => o,
        }
    }

    pub fn as_drawable_mut(&mut self) -> &mut dyn Drawable {
        match self {
            Primitive::Dot(o) => o,
            Primitive::Line(o) => o,
            Primitive::Arrow(o) => o,
            Primitive::Rect(o) => o,
            Primitive::Circle(o) => o,
            Primitive::Arc(o) => o,
            Primitive::Text(o) => o,
            Primitive::Formula(o) => o,
            Primitive::Axes(o) => o,
            Primitive::Table(o) => o,
        }
    }

    pub fn kind(&self) -> &'static str {
        self.as_drawable().kind()
    }

    pub fn anchor(&self) -> Point {
        self.as_drawable().anchor()
    }

    pub fn paint(&self) -> &Paint {
        self.as_drawable().paint()
    }

    pub fn paint_mut(&mut self) -> &mut Paint {
        self.as_drawable_mut().paint_mut()
    }

    pub fn content(&self) -> Option<&str> {
        self.as_drawable().content()
    }

    pub fn bounds(&self) -> kurbo::Rect {
        self.as_drawable().bounds()
    }

    pub fn shift(&mut self, by: Vec2) {
        self.as_drawable_mut().shift(by);
    }

    pub fn move_to(&mut self, to: Point) {
        self.as_drawable_mut().move_to(to);
    }

    pub fn validate(&self) -> ScriptResult<()> {
        let d = self.as_drawable();
        let anchor = d.anchor();
        let fail = |msg: String| ScriptError::construction(format!("{}: {msg}", d.kind()));
        if !anchor.x.is_finite() || !anchor.y.is_finite() {
            return Err(fail("position must be finite".to_string()));
        }
        d.paint().validate().map_err(fail)?;
        d.check().map_err(fail)
    }

    /// Geometric in-between of two primitives of the same variant. Different
    /// variants cannot morph; callers cross-fade them instead.
    pub fn morph(&self, other: &Primitive, t: f64) -> Option<Primitive> {
        let morphed = match (self, other) {
            (Primitive::Dot(a), Primitive::Dot(b)) => Primitive::Dot(a.morph(b, t)),
            (Primitive::Line(a), Primitive::Line(b)) => Primitive::Line(a.morph(b, t)),
            (Primitive::Arrow(a), Primitive::Arrow(b)) => Primitive::Arrow(a.morph(b, t)),
            (Primitive::Rect(a), Primitive::Rect(b)) => Primitive::Rect(a.morph(b, t)),
            (Primitive::Circle(a), Primitive::Circle(b)) => Primitive::Circle(a.morph(b, t)),
            (Primitive::Arc(a), Primitive::Arc(b)) => Primitive::Arc(a.morph(b, t)),
            (Primitive::Text(a), Primitive::Text(b)) => Primitive::Text(a.morph(b, t)),
            (Primitive::Formula(a), Primitive::Formula(b)) => Primitive::Formula(a.morph(b, t)),
            (Primitive::Axes(a), Primitive::Axes(b)) => Primitive::Axes(a.morph(b, t)),
            (Primitive::Table(a), Primitive::Table(b)) => Primitive::Table(a.morph(b, t)),
            _ => return None,
        };
        Some(morphed)
    }

    /// Emit cells for this primitive at the given reveal fraction and opacity.
    pub fn resolve(
        &self,
        viewport: &Viewport,
        reveal: f64,
        opacity: f64,
        z_order: i32,
        ops: &mut Vec<DrawOp>,
    ) {
        let d = self.as_drawable();
        let mut pen = Pen::new(viewport, ops, d.paint(), opacity, z_order);
        if pen.is_blank() || reveal <= 0.0 {
            return;
        }
        d.resolve(&mut pen, reveal.min(1.0));
    }
}

pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

pub(crate) fn check_positive(what: &str, v: f64) -> Result<(), String> {
    if !v.is_finite() || v <= 0.0 {
        return Err(format!("{what} must be finite and > 0 (got {v})"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TerminalContract;

    fn viewport() -> Viewport {
        Viewport::new(TerminalContract {
            width: 96,
            height: 30,
        })
    }

    #[test]
    fn slope_chars_follow_direction() {
        assert_eq!(slope_char(10.0, 0.0), '─');
        assert_eq!(slope_char(0.0, 5.0), '│');
        assert_eq!(slope_char(3.0, 3.0), '╲');
        assert_eq!(slope_char(3.0, -3.0), '╱');
    }

    #[test]
    fn resolve_skips_invisible_primitives() {
        let vp = viewport();
        let mut ops = Vec::new();
        let dot: Primitive = Dot::at(0.0, 0.0).into();
        dot.resolve(&vp, 1.0, 0.0, 1, &mut ops);
        assert!(ops.is_empty());
        dot.resolve(&vp, 0.0, 1.0, 1, &mut ops);
        assert!(ops.is_empty());
        dot.resolve(&vp, 1.0, 1.0, 1, &mut ops);
        assert_eq!(ops.len(), 1);
    }

    #[test]
    fn validate_reports_kind_in_message() {
        let circle: Primitive = Circle::new(-1.0).into();
        let err = circle.validate().unwrap_err();
        assert!(err.to_string().contains("circle"));
    }

    #[test]
    fn morph_requires_matching_variants() {
        let a: Primitive = Dot::at(0.0, 0.0).into();
        let b: Primitive = Dot::at(2.0, 0.0).into();
        let c: Primitive = Circle::new(1.0).into();
        let mid = a.morph(&b, 0.5).unwrap();
        assert!((mid.anchor().x - 1.0).abs() < 1e-9);
        assert!(a.morph(&c, 0.5).is_none());
    }

    #[test]
    fn next_to_keeps_a_gap() {
        let dot = Dot::at(1.0, 1.0);
        let label = Text::new("A", 24.0).next_to(dot.bounds(), DOWN, 0.2);
        let gap = dot.bounds().y0 - label.bounds().y1;
        assert!((gap - 0.2).abs() < 1e-9);
        assert!((label.position.x - 1.0).abs() < 1e-9);
    }

    #[test]
    fn to_edge_moves_one_axis() {
        let title = Text::new("Title", 32.0).placed(Point::new(2.0, 0.0)).to_edge(UP, EDGE_BUFF);
        assert!((title.bounds().y1 - (FRAME_HEIGHT / 2.0 - EDGE_BUFF)).abs() < 1e-9);
        assert_eq!(title.position.x, 2.0);
    }

    #[test]
    fn paint_setters_chain() {
        let dot = Dot::at(1.0, 1.0).color(paint::RED).opacity(0.5);
        assert_eq!(dot.paint.color, paint::RED);
        assert_eq!(dot.paint.opacity, 0.5);
    }
}
