use serde::{Deserialize, Serialize};

use crate::types::{Color, NamedColor, Style};

pub const WHITE: Color = Color::Named(NamedColor::White);
pub const BLACK: Color = Color::Named(NamedColor::Black);
pub const RED: Color = Color::Named(NamedColor::Red);
pub const GREEN: Color = Color::Named(NamedColor::Green);
pub const BLUE: Color = Color::Named(NamedColor::Blue);
pub const YELLOW: Color = Color::Named(NamedColor::Yellow);
pub const ORANGE: Color = Color::rgb(255, 134, 47);
pub const PURPLE: Color = Color::rgb(154, 114, 172);
pub const TEAL: Color = Color::rgb(92, 208, 179);
pub const GREY: Color = Color::rgb(136, 136, 136);
pub const BLUE_A: Color = Color::rgb(199, 233, 241);
pub const BLUE_D: Color = Color::rgb(41, 171, 202);
pub const GREEN_B: Color = Color::rgb(166, 207, 140);
pub const PURPLE_B: Color = Color::rgb(177, 137, 198);
pub const RED_A: Color = Color::rgb(247, 161, 163);
pub const RED_B: Color = Color::rgb(255, 128, 128);

/// Below this effective opacity nothing is drawn.
const INVISIBLE_BELOW: f64 = 0.12;
/// Below this effective opacity cells are drawn dim.
const DIM_BELOW: f64 = 0.55;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paint {
    pub color: Color,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Color>,
    #[serde(default)]
    pub fill_opacity: f64,
    pub stroke_width: f64,
    pub opacity: f64,
}

impl Default for Paint {
    fn default() -> Self {
        Paint {
            color: WHITE,
            fill: None,
            fill_opacity: 0.0,
            stroke_width: 4.0,
            opacity: 1.0,
        }
    }
}

impl Paint {
    pub fn lerp(&self, other: &Paint, t: f64) -> Paint {
        let fill = match (self.fill, other.fill) {
            (Some(a), Some(b)) => Some(a.lerp(b, t)),
            (a, b) => {
                if t < 0.5 {
                    a
                } else {
                    b
                }
            }
        };
        Paint {
            color: self.color.lerp(other.color, t),
            fill,
            fill_opacity: self.fill_opacity + (other.fill_opacity - self.fill_opacity) * t,
            stroke_width: self.stroke_width + (other.stroke_width - self.stroke_width) * t,
            opacity: self.opacity + (other.opacity - self.opacity) * t,
        }
    }

    /// Cell style for strokes, or `None` when the stroke is effectively invisible.
    pub fn stroke_style(&self, opacity: f64) -> Option<Style> {
        let alpha = self.opacity * opacity;
        if alpha < INVISIBLE_BELOW {
            return None;
        }
        Some(Style {
            fg: Some(self.color),
            bg: None,
            bold: self.stroke_width >= 6.0,
            dim: alpha < DIM_BELOW,
        })
    }

    /// Cell style for interior fill, or `None` when unfilled.
    pub fn fill_style(&self, opacity: f64) -> Option<Style> {
        let fill = self.fill?;
        let alpha = self.fill_opacity * self.opacity * opacity;
        if alpha < INVISIBLE_BELOW {
            return None;
        }
        Some(Style {
            fg: Some(fill),
            bg: None,
            bold: false,
            dim: alpha < DIM_BELOW,
        })
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(format!("opacity must be within 0..=1 (got {})", self.opacity));
        }
        if !(0.0..=1.0).contains(&self.fill_opacity) {
            return Err(format!(
                "fill opacity must be within 0..=1 (got {})",
                self.fill_opacity
            ));
        }
        if !self.stroke_width.is_finite() || self.stroke_width < 0.0 {
            return Err(format!(
                "stroke width must be finite and >= 0 (got {})",
                self.stroke_width
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faint_paint_is_dim_or_hidden() {
        let paint = Paint::default();
        assert_eq!(paint.stroke_style(1.0).map(|s| s.dim), Some(false));
        assert_eq!(paint.stroke_style(0.3).map(|s| s.dim), Some(true));
        assert!(paint.stroke_style(0.05).is_none());
    }

    #[test]
    fn unfilled_paint_has_no_fill_style() {
        assert!(Paint::default().fill_style(1.0).is_none());
        let filled = Paint {
            fill: Some(BLUE),
            fill_opacity: 0.2,
            ..Paint::default()
        };
        assert_eq!(filled.fill_style(1.0).map(|s| s.dim), Some(true));
    }

    #[test]
    fn validate_rejects_out_of_range_opacity() {
        let paint = Paint {
            opacity: 1.5,
            ..Paint::default()
        };
        assert!(paint.validate().is_err());
    }
}
