//! Shared boundary types for the scene pipeline.
//!
//! This module defines the two key data contracts:
//! - Executor → Renderer (in-memory): `ResolvedScene` containing `DrawOp`s
//! - Renderer → Player (file): `PlayablePresentation` containing `Frame`s

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Shared style primitives
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    Named(NamedColor),
    Rgb { r: u8, g: u8, b: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamedColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl NamedColor {
    /// Approximate sRGB value, used when a named colour has to be blended.
    pub fn to_rgb(self) -> (u8, u8, u8) {
        match self {
            NamedColor::Black => (0, 0, 0),
            NamedColor::Red => (252, 98, 85),
            NamedColor::Green => (131, 193, 103),
            NamedColor::Yellow => (255, 255, 0),
            NamedColor::Blue => (88, 196, 221),
            NamedColor::Magenta => (154, 114, 172),
            NamedColor::Cyan => (92, 208, 179),
            NamedColor::White => (255, 255, 255),
        }
    }
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb { r, g, b }
    }

    pub fn to_rgb(self) -> (u8, u8, u8) {
        match self {
            Color::Named(n) => n.to_rgb(),
            Color::Rgb { r, g, b } => (r, g, b),
        }
    }

    /// Blend towards `other`. Endpoints return the original values untouched so
    /// named colours survive a finished animation.
    pub fn lerp(self, other: Color, t: f64) -> Color {
        if t <= 0.0 {
            return self;
        }
        if t >= 1.0 {
            return other;
        }
        fn mix(a: u8, b: u8, t: f64) -> u8 {
            let a = f64::from(a);
            let b = f64::from(b);
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        }
        let (r0, g0, b0) = self.to_rgb();
        let (r1, g1, b1) = other.to_rgb();
        Color::Rgb {
            r: mix(r0, r1, t),
            g: mix(g0, g1, t),
            b: mix(b0, b1, t),
        }
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fg: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg: Option<Color>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub dim: bool,
}

impl Style {
    pub fn is_default(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && !self.bold && !self.dim
    }
}

// ---------------------------------------------------------------------------
// Executor → Renderer boundary (in-memory only, never serialized)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct DrawOp {
    pub x: u16,
    pub y: u16,
    pub ch: char,
    pub style: Style,
    pub z_order: i32,
}

#[derive(Debug, Clone)]
pub struct ResolvedScene {
    pub width: u16,
    pub height: u16,
    pub ops: Vec<DrawOp>,
}

// ---------------------------------------------------------------------------
// Renderer → Player boundary (serialized to the playable file)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalContract {
    pub width: u16,
    pub height: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub ch: char,
    #[serde(default, skip_serializing_if = "Style::is_default")]
    pub style: Style,
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            ch: ' ',
            style: Style::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellChange {
    pub x: u16,
    pub y: u16,
    pub cell: Cell,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Frame {
    Full { cells: Vec<Vec<Cell>> },
    Diff { changes: Vec<CellChange> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub frame_index: usize,
    pub label: String,
}

fn default_fps() -> u32 {
    24
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayablePresentation {
    pub contract: TerminalContract,
    #[serde(default = "default_fps")]
    pub fps: u32,
    pub frames: Vec<Frame>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub markers: Vec<Marker>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_keeps_named_colors_at_endpoints() {
        let a = Color::Named(NamedColor::Blue);
        let b = Color::Named(NamedColor::Red);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert!(matches!(a.lerp(b, 0.5), Color::Rgb { .. }));
    }

    #[test]
    fn presentation_defaults_fps_when_missing() {
        let json = r#"{"contract":{"width":4,"height":2},"frames":[]}"#;
        let p: PlayablePresentation = serde_json::from_str(json).unwrap();
        assert_eq!(p.fps, 24);
        assert!(p.markers.is_empty());
    }
}
