//! Text styles and measurement

use serde::{Deserialize, Serialize};

use sd_core::Size;

/// 24-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Color = Color(0xffffff);
    pub const BLACK: Color = Color(0x000000);

    /// Parse `#rrggbb`, `rrggbb` or `#rgb`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        match digits.len() {
            6 => u32::from_str_radix(digits, 16).ok().map(Color),
            3 => {
                let short = u32::from_str_radix(digits, 16).ok()?;
                let (r, g, b) = ((short >> 8) & 0xf, (short >> 4) & 0xf, short & 0xf);
                Some(Color((r * 0x11) << 16 | (g * 0x11) << 8 | b * 0x11))
            }
            _ => None,
        }
    }

    /// CSS form, `#rrggbb`
    pub fn to_css(&self) -> String {
        format!("#{:06x}", self.0 & 0xffffff)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontStyle {
    pub family: String,
    pub size: f64,
    pub weight: FontWeight,
    pub fill: Color,
    pub align: TextAlign,
}

impl Default for FontStyle {
    fn default() -> Self {
        Self {
            family: "Arial".into(),
            size: 26.0,
            weight: FontWeight::Normal,
            fill: Color::BLACK,
            align: TextAlign::Left,
        }
    }
}

impl FontStyle {
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
            ..Self::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.weight = FontWeight::Bold;
        self
    }

    pub fn fill(mut self, fill: Color) -> Self {
        self.fill = fill;
        self
    }

    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    /// CSS `font` shorthand at `size` pixels
    pub fn css_font(&self, size: f64) -> String {
        let weight = match self.weight {
            FontWeight::Normal => "normal",
            FontWeight::Bold => "bold",
        };
        format!("{} {}px {}", weight, size, self.family)
    }
}

/// Measures unscaled text extents
pub trait TextMeasure {
    fn measure(&self, text: &str, style: &FontStyle, font_size: f64) -> Size;
}

/// Glyph-count estimate for environments without a font rasterizer
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxTextMeasure;

impl ApproxTextMeasure {
    const ADVANCE: f64 = 0.6;
    const BOLD_ADVANCE: f64 = 0.65;
    const LINE_HEIGHT: f64 = 1.2;
}

impl TextMeasure for ApproxTextMeasure {
    fn measure(&self, text: &str, style: &FontStyle, font_size: f64) -> Size {
        let advance = match style.weight {
            FontWeight::Normal => Self::ADVANCE,
            FontWeight::Bold => Self::BOLD_ADVANCE,
        };
        let lines: Vec<&str> = text.split('\n').collect();
        let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        Size::new(
            widest as f64 * font_size * advance,
            lines.len() as f64 * font_size * Self::LINE_HEIGHT,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_color_hex() {
        assert_eq!(Color::from_hex("#aaaaaa"), Some(Color(0xaaaaaa)));
        assert_eq!(Color::from_hex("fff"), Some(Color::WHITE));
        assert_eq!(Color::from_hex("#12"), None);
        assert_eq!(Color(0xaaaaaa).to_css(), "#aaaaaa");
    }

    #[test]
    fn test_approx_measure() {
        let style = FontStyle::new("Arial", 40.0).bold();
        let size = ApproxTextMeasure.measure("SPIN", &style, 40.0);
        assert_relative_eq!(size.width, 104.0);
        assert_relative_eq!(size.height, 48.0);
        let two = ApproxTextMeasure.measure("A\nBB", &FontStyle::default(), 10.0);
        assert_relative_eq!(two.width, 12.0);
        assert_relative_eq!(two.height, 24.0);
    }

    #[test]
    fn test_css_font() {
        let style = FontStyle::new("Arial", 40.0).bold();
        assert_eq!(style.css_font(40.0), "bold 40px Arial");
    }
}
