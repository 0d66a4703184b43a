use kurbo::{Point, Vec2};

use super::{Drawable, NOMINAL_CELL_H, NOMINAL_CELL_W, Paint, Pen, check_positive, font, lerp, tex};
use crate::engine::viewport::FRAME_WIDTH;

/// At or above this size single-line text is drawn in the block font, if it fits.
const BLOCK_FONT_SIZE: f64 = 60.0;
/// At or above this size text is drawn bold.
const BOLD_FONT_SIZE: f64 = 40.0;
/// Below this size text is drawn dim.
const SMALL_FONT_SIZE: f64 = 24.0;
const BLOCK_CHAR: char = '█';

/// Plain text, centred on `position`. Newlines start new centred lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub text: String,
    pub position: Point,
    pub font_size: f64,
    /// Stack characters top to bottom, for rotated axis labels.
    pub vertical: bool,
    pub paint: Paint,
}

impl Text {
    pub fn new(text: impl Into<String>, font_size: f64) -> Self {
        Text {
            text: text.into(),
            position: Point::ORIGIN,
            font_size,
            vertical: false,
            paint: Paint::default(),
        }
    }

    pub fn vertical(mut self) -> Self {
        self.vertical = true;
        self
    }

    fn lines(&self) -> Vec<&str> {
        self.text.lines().collect()
    }

    /// Whether this text renders in the block font.
    pub fn is_block(&self) -> bool {
        self.font_size >= BLOCK_FONT_SIZE
            && !self.vertical
            && !self.text.contains('\n')
            && self.text.chars().all(|c| font::glyph(c).is_some())
            && font::text_width(&self.text) as f64 * NOMINAL_CELL_W <= FRAME_WIDTH * 0.95
    }

    pub(super) fn morph(&self, other: &Text, t: f64) -> Text {
        let src = if t < 0.5 { self } else { other };
        Text {
            text: src.text.clone(),
            position: self.position.lerp(other.position, t),
            font_size: lerp(self.font_size, other.font_size, t),
            vertical: src.vertical,
            paint: self.paint.lerp(&other.paint, t),
        }
    }

    fn resolve_block(&self, pen: &mut Pen<'_>, reveal: f64) {
        let (col, row) = pen.viewport().to_cell(self.position);
        let top = row - font::GLYPH_HEIGHT as i32 / 2;
        let total = self.text.chars().count();
        let shown = (total as f64 * reveal).ceil() as usize;

        let mut cursor = col - font::text_width(&self.text) as i32 / 2;
        for glyph in self.text.chars().take(shown).filter_map(font::glyph) {
            for dy in 0..font::GLYPH_HEIGHT {
                for dx in 0..glyph.width {
                    if glyph.filled(dx, dy) {
                        pen.cell(cursor + dx as i32, top + dy as i32, BLOCK_CHAR);
                    }
                }
            }
            cursor += glyph.width as i32 + 1;
        }
    }
}

/// Emit a prefix of `lines` covering `reveal` of their characters, each line centred.
fn resolve_lines(pen: &mut Pen<'_>, center: Point, lines: &[&str], reveal: f64) {
    let total: usize = lines.iter().map(|l| l.chars().count()).sum();
    let mut budget = (total as f64 * reveal).ceil() as usize;
    let (col, row) = pen.viewport().to_cell(center);
    let top = row - lines.len() as i32 / 2;
    for (i, line) in lines.iter().enumerate() {
        if budget == 0 {
            break;
        }
        let len = line.chars().count();
        let visible: String = line.chars().take(budget).collect();
        budget = budget.saturating_sub(len);
        pen.text(col - len as i32 / 2, top + i as i32, &visible);
    }
}

fn apply_size(pen: &mut Pen<'_>, font_size: f64) {
    if font_size >= BOLD_FONT_SIZE {
        pen.emphasize();
    } else if font_size < SMALL_FONT_SIZE {
        pen.soften();
    }
}

fn text_bounds(center: Point, cols: usize, rows: usize) -> kurbo::Rect {
    kurbo::Rect::from_center_size(
        center,
        (cols as f64 * NOMINAL_CELL_W, rows as f64 * NOMINAL_CELL_H),
    )
}

impl Drawable for Text {
    fn kind(&self) -> &'static str {
        "text"
    }

    fn anchor(&self) -> Point {
        self.position
    }

    fn shift(&mut self, by: Vec2) {
        self.position += by;
    }

    fn paint(&self) -> &Paint {
        &self.paint
    }

    fn paint_mut(&mut self) -> &mut Paint {
        &mut self.paint
    }

    fn content(&self) -> Option<&str> {
        Some(&self.text)
    }

    fn bounds(&self) -> kurbo::Rect {
        if self.is_block() {
            return text_bounds(
                self.position,
                font::text_width(&self.text),
                font::GLYPH_HEIGHT,
            );
        }
        let lines = self.lines();
        let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        if self.vertical {
            text_bounds(self.position, 1, self.text.chars().count())
        } else {
            text_bounds(self.position, widest, lines.len().max(1))
        }
    }

    fn check(&self) -> Result<(), String> {
        check_positive("font size", self.font_size)
    }

    fn resolve(&self, pen: &mut Pen<'_>, reveal: f64) {
        if self.is_block() {
            self.resolve_block(pen, reveal);
            return;
        }
        apply_size(pen, self.font_size);
        if self.vertical {
            let chars: Vec<char> = self.text.chars().collect();
            let shown = (chars.len() as f64 * reveal).ceil() as usize;
            let (col, row) = pen.viewport().to_cell(self.position);
            let top = row - chars.len() as i32 / 2;
            for (i, &ch) in chars.iter().take(shown).enumerate() {
                if ch != ' ' {
                    pen.cell(col, top + i as i32, ch);
                }
            }
            return;
        }
        resolve_lines(pen, self.position, &self.lines(), reveal);
    }
}

/// A formula written in a TeX-like notation, drawn as Unicode. `\\` breaks lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    pub tex: String,
    pub position: Point,
    pub font_size: f64,
    pub paint: Paint,
}

impl Formula {
    pub fn new(tex: impl Into<String>, font_size: f64) -> Self {
        Formula {
            tex: tex.into(),
            position: Point::ORIGIN,
            font_size,
            paint: Paint::default(),
        }
    }

    /// The rendered Unicode form, one entry per line.
    pub fn rendered_lines(&self) -> Vec<String> {
        self.tex
            .split(r"\\")
            .map(|line| tex::to_unicode(line).trim().to_string())
            .filter(|line| !line.is_empty())
            .collect()
    }

    pub fn rendered(&self) -> String {
        self.rendered_lines().join("\n")
    }

    /// Scene-space box around the first occurrence of `part` in a single-line
    /// rendering. `part` is matched against the rendered Unicode.
    pub fn span_bounds(&self, part: &str) -> Option<kurbo::Rect> {
        let lines = self.rendered_lines();
        let [line] = lines.as_slice() else {
            return None;
        };
        let byte = line.find(part)?;
        let start = line[..byte].chars().count();
        let len = line.chars().count();
        let left = self.position.x - (len / 2) as f64 * NOMINAL_CELL_W;
        let x0 = left + start as f64 * NOMINAL_CELL_W;
        let x1 = x0 + part.chars().count() as f64 * NOMINAL_CELL_W;
        Some(kurbo::Rect::new(
            x0,
            self.position.y - NOMINAL_CELL_H / 2.0,
            x1,
            self.position.y + NOMINAL_CELL_H / 2.0,
        ))
    }

    pub(super) fn morph(&self, other: &Formula, t: f64) -> Formula {
        Formula {
            tex: if t < 0.5 { self.tex.clone() } else { other.tex.clone() },
            position: self.position.lerp(other.position, t),
            font_size: lerp(self.font_size, other.font_size, t),
            paint: self.paint.lerp(&other.paint, t),
        }
    }
}

impl Drawable for Formula {
    fn kind(&self) -> &'static str {
        "formula"
    }

    fn anchor(&self) -> Point {
        self.position
    }

    fn shift(&mut self, by: Vec2) {
        self.position += by;
    }

    fn paint(&self) -> &Paint {
        &self.paint
    }

    fn paint_mut(&mut self) -> &mut Paint {
        &mut self.paint
    }

    fn content(&self) -> Option<&str> {
        Some(&self.tex)
    }

    fn bounds(&self) -> kurbo::Rect {
        let lines = self.rendered_lines();
        let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        text_bounds(self.position, widest, lines.len().max(1))
    }

    fn check(&self) -> Result<(), String> {
        if self.tex.trim().is_empty() {
            return Err("formula source is empty".to_string());
        }
        check_positive("font size", self.font_size)
    }

    fn resolve(&self, pen: &mut Pen<'_>, reveal: f64) {
        apply_size(pen, self.font_size);
        let rendered = self.rendered_lines();
        let lines: Vec<&str> = rendered.iter().map(String::as_str).collect();
        resolve_lines(pen, self.position, &lines, reveal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::objects::PaintExt;
    use crate::engine::viewport::Viewport;
    use crate::types::TerminalContract;

    fn render(d: &dyn Drawable, reveal: f64) -> Vec<crate::types::DrawOp> {
        let vp = Viewport::new(TerminalContract {
            width: 96,
            height: 30,
        });
        let mut ops = Vec::new();
        let mut pen = Pen::new(&vp, &mut ops, d.paint(), 1.0, 1);
        d.resolve(&mut pen, reveal);
        ops
    }

    #[test]
    fn text_is_centred_on_position() {
        let text = Text::new("abc", 36.0);
        let ops = render(&text, 1.0);
        let xs: Vec<u16> = ops.iter().map(|op| op.x).collect();
        assert_eq!(xs, vec![47, 48, 49]);
        assert!(ops.iter().all(|op| op.y == 15));
    }

    #[test]
    fn write_reveals_a_prefix() {
        let text = Text::new("abcd", 36.0);
        let ops = render(&text, 0.5);
        let chars: String = ops.iter().map(|op| op.ch).collect();
        assert_eq!(chars, "ab");
    }

    #[test]
    fn large_titles_use_block_font() {
        let title = Text::new("COSINE", 72.0);
        assert!(title.is_block());
        let ops = render(&title, 1.0);
        assert!(ops.iter().all(|op| op.ch == BLOCK_CHAR));
        let rows: std::collections::BTreeSet<u16> = ops.iter().map(|op| op.y).collect();
        assert_eq!(rows.len(), font::GLYPH_HEIGHT);

        let long = Text::new("A TITLE MUCH TOO LONG FOR THE BLOCK FONT", 72.0);
        assert!(!long.is_block());
    }

    #[test]
    fn size_sets_weight() {
        let big = render(&Text::new("x", 48.0), 1.0);
        assert!(big[0].style.bold);
        let small = render(&Text::new("x", 20.0), 1.0);
        assert!(small[0].style.dim);
    }

    #[test]
    fn formula_renders_unicode_and_keeps_source() {
        let f = Formula::new(r"x^2", 36.0).color(crate::engine::objects::paint::YELLOW);
        assert_eq!(f.rendered(), "x²");
        assert_eq!(f.content(), Some("x^2"));
        assert!(Formula::new("  ", 36.0).check().is_err());

        let steps = Formula::new(r"A = [1, 2] \\ B = [3, 4]", 30.0);
        assert_eq!(steps.rendered_lines(), vec!["A = [1, 2]", "B = [3, 4]"]);
        assert_eq!(render(&steps, 1.0).iter().map(|op| op.y).max(), Some(15));
    }

    #[test]
    fn span_bounds_locate_a_part() {
        let f = Formula::new(r"\cos(\theta) = \frac{A\cdot B}{\|A\|\cdot\|B\|}", 36.0);
        let whole = f.bounds();
        let part = f.span_bounds("(A·B)").unwrap();
        assert!(part.x0 > whole.x0 && part.x1 < whole.x1);
        assert!((part.width() - 5.0 * NOMINAL_CELL_W).abs() < 1e-9);
        assert!(f.span_bounds("missing").is_none());
    }

    #[test]
    fn morph_switches_text_at_midpoint() {
        let a = Text::new("one", 36.0);
        let b = Text::new("two", 36.0).placed(Point::new(2.0, 0.0));
        assert_eq!(a.morph(&b, 0.4).text, "one");
        let late = a.morph(&b, 0.6);
        assert_eq!(late.text, "two");
        assert!((late.position.x - 1.2).abs() < 1e-9);
    }
}
