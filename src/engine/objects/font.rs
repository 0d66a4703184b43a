//! 5-row block font for large titles.
//!
//! Each glyph is stored as one bitmask per row, most significant bit on the
//! left, plus its width in columns. Lookup is case-insensitive.

pub const GLYPH_HEIGHT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub width: usize,
    rows: [u8; GLYPH_HEIGHT],
}

impl Glyph {
    pub fn filled(&self, col: usize, row: usize) -> bool {
        col < self.width && row < GLYPH_HEIGHT && (self.rows[row] >> (self.width - 1 - col)) & 1 == 1
    }
}

/// Block glyph for `ch`, or `None` when the font has no such character.
pub fn glyph(ch: char) -> Option<Glyph> {
    let (width, rows) = match ch.to_ascii_uppercase() {
        'A' => (5, [0b01110, 0b10001, 0b11111, 0b10001, 0b10001]),
        'B' => (5, [0b11110, 0b10001, 0b11110, 0b10001, 0b11110]),
        'C' => (5, [0b01110, 0b10001, 0b10000, 0b10001, 0b01110]),
        'D' => (5, [0b11110, 0b10001, 0b10001, 0b10001, 0b11110]),
        'E' => (5, [0b11111, 0b10000, 0b11100, 0b10000, 0b11111]),
        'F' => (5, [0b11111, 0b10000, 0b11100, 0b10000, 0b10000]),
        'G' => (5, [0b01110, 0b10000, 0b10011, 0b10001, 0b01110]),
        'H' => (5, [0b10001, 0b10001, 0b11111, 0b10001, 0b10001]),
        'I' => (3, [0b111, 0b010, 0b010, 0b010, 0b111]),
        'J' => (5, [0b00111, 0b00010, 0b00010, 0b10010, 0b01100]),
        'K' => (5, [0b10001, 0b10010, 0b11100, 0b10010, 0b10001]),
        'L' => (5, [0b10000, 0b10000, 0b10000, 0b10000, 0b11111]),
        'M' => (5, [0b10001, 0b11011, 0b10101, 0b10001, 0b10001]),
        'N' => (5, [0b10001, 0b11001, 0b10101, 0b10011, 0b10001]),
        'O' => (5, [0b01110, 0b10001, 0b10001, 0b10001, 0b01110]),
        'P' => (5, [0b11110, 0b10001, 0b11110, 0b10000, 0b10000]),
        'Q' => (5, [0b01110, 0b10001, 0b10101, 0b10010, 0b01101]),
        'R' => (5, [0b11110, 0b10001, 0b11110, 0b10010, 0b10001]),
        'S' => (5, [0b01111, 0b10000, 0b01110, 0b00001, 0b11110]),
        'T' => (5, [0b11111, 0b00100, 0b00100, 0b00100, 0b00100]),
        'U' => (5, [0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
        'V' => (5, [0b10001, 0b10001, 0b10001, 0b01010, 0b00100]),
        'W' => (5, [0b10001, 0b10001, 0b10101, 0b11011, 0b10001]),
        'X' => (5, [0b10001, 0b01010, 0b00100, 0b01010, 0b10001]),
        'Y' => (5, [0b10001, 0b01010, 0b00100, 0b00100, 0b00100]),
        'Z' => (5, [0b11111, 0b00010, 0b00100, 0b01000, 0b11111]),
        '0' => (5, [0b01110, 0b10001, 0b10001, 0b10001, 0b01110]),
        '1' => (3, [0b010, 0b110, 0b010, 0b010, 0b111]),
        '2' => (5, [0b01110, 0b10001, 0b00110, 0b01000, 0b11111]),
        '3' => (5, [0b01110, 0b10001, 0b00110, 0b10001, 0b01110]),
        '4' => (5, [0b10010, 0b10010, 0b11111, 0b00010, 0b00010]),
        '5' => (5, [0b11111, 0b10000, 0b11110, 0b00001, 0b11110]),
        '6' => (5, [0b01110, 0b10000, 0b11110, 0b10001, 0b01110]),
        '7' => (5, [0b11111, 0b00010, 0b00100, 0b01000, 0b01000]),
        '8' => (5, [0b01110, 0b10001, 0b01110, 0b10001, 0b01110]),
        '9' => (5, [0b01110, 0b10001, 0b01111, 0b00010, 0b01110]),
        ' ' => (3, [0b000, 0b000, 0b000, 0b000, 0b000]),
        '!' => (1, [0b1, 0b1, 0b1, 0b0, 0b1]),
        '.' => (1, [0b0, 0b0, 0b0, 0b0, 0b1]),
        '-' => (5, [0b00000, 0b00000, 0b11111, 0b00000, 0b00000]),
        '?' => (5, [0b01110, 0b10001, 0b00110, 0b00000, 0b00100]),
        ':' => (1, [0b0, 0b1, 0b0, 0b1, 0b0]),
        '%' => (5, [0b10001, 0b00010, 0b00100, 0b01000, 0b10001]),
        '=' => (5, [0b00000, 0b11111, 0b00000, 0b11111, 0b00000]),
        ',' => (2, [0b00, 0b00, 0b00, 0b01, 0b10]),
        '\'' => (1, [0b1, 0b0, 0b0, 0b0, 0b0]),
        '(' => (2, [0b01, 0b10, 0b10, 0b10, 0b01]),
        ')' => (2, [0b10, 0b01, 0b01, 0b01, 0b10]),
        '/' => (5, [0b00001, 0b00010, 0b00100, 0b01000, 0b10000]),
        _ => return None,
    };
    Some(Glyph { width, rows })
}

/// Width of `text` in columns with a one-column gap between glyphs.
/// Characters outside the font are skipped.
pub fn text_width(text: &str) -> usize {
    let widths: Vec<usize> = text.chars().filter_map(glyph).map(|g| g.width).collect();
    widths.iter().sum::<usize>() + widths.len().saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(glyph('a'), glyph('A'));
        assert!(glyph('~').is_none());
    }

    #[test]
    fn bitmask_reads_left_to_right() {
        let t = glyph('T').unwrap();
        assert!((0..5).all(|c| t.filled(c, 0)));
        assert!(t.filled(2, 4));
        assert!(!t.filled(0, 4));
        assert!(!t.filled(5, 0));
    }

    #[test]
    fn width_includes_gaps() {
        // I is 3 wide, gap, 1 is 3 wide
        assert_eq!(text_width("I1"), 7);
        assert_eq!(text_width(""), 0);
    }
}
