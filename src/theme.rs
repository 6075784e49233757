//! Attribute table for styled text.
//!
//! Colors, fonts and paragraph spacing are plain data. A [`Theme`] is built
//! once and handed to the engine by value, so two engines never share state.

use std::fmt;

/// An sRGB color with alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Self = Self::opaque(0xff, 0xff, 0xff);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    /// Parse `#rrggbb` (the `#` is optional).
    ///
    /// Anything that is not six hex digits yields opaque white.
    pub fn from_hex(hex: &str) -> Self {
        let cleaned: String = hex.chars().filter(char::is_ascii_alphanumeric).collect();
        if cleaned.len() != 6 {
            return Self::WHITE;
        }
        let Ok(value) = u32::from_str_radix(&cleaned, 16) else {
            return Self::WHITE;
        };
        let [_, r, g, b] = value.to_be_bytes();
        Self::opaque(r, g, b)
    }

    /// Same color with alpha scaled from a 0..1 fraction.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..self
        }
    }

    /// Linear blend toward `other`; `t` is clamped to 0..1.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn blend(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| {
            f32::from(b)
                .mul_add(t, f32::from(a) * (1.0 - t))
                .round()
                .clamp(0.0, 255.0) as u8
        };
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 0xff {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFamily {
    Monospace,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FontWeight {
    Regular,
    Medium,
    Semibold,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Font {
    pub family: FontFamily,
    /// Point size.
    pub size: u16,
    pub weight: FontWeight,
}

impl Font {
    pub const fn new(family: FontFamily, size: u16, weight: FontWeight) -> Self {
        Self {
            family,
            size,
            weight,
        }
    }
}

/// Paragraph-level spacing, in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ParagraphStyle {
    pub line_spacing: u16,
    pub paragraph_spacing: u16,
    pub paragraph_spacing_before: u16,
}

/// The full attribute set applied to a character range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeSet {
    pub font: Font,
    pub foreground: Rgba,
    pub paragraph: ParagraphStyle,
}

/// Palette and type scale for the note pad.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub accent: Rgba,
    pub cursor: Rgba,
    pub background: Rgba,
    pub foreground: Rgba,
    pub heading_foreground: Rgba,
    /// Color typed characters glow toward.
    pub glow: Rgba,
    pub body_font: Font,
    pub body_paragraph: ParagraphStyle,
}

impl Default for Theme {
    fn default() -> Self {
        Self::nopad()
    }
}

impl Theme {
    /// The purple glass palette the note pad ships with.
    pub fn nopad() -> Self {
        let cursor = Rgba::from_hex("#e0aaff");
        Self {
            accent: Rgba::from_hex("#b44dff"),
            cursor,
            background: Rgba::from_hex("#1a0533"),
            foreground: Rgba::from_hex("#e8e0f0"),
            heading_foreground: Rgba::WHITE.with_alpha(0.96),
            glow: cursor,
            body_font: Font::new(FontFamily::Monospace, 18, FontWeight::Regular),
            body_paragraph: ParagraphStyle {
                line_spacing: 5,
                paragraph_spacing: 7,
                paragraph_spacing_before: 0,
            },
        }
    }

    /// Attributes every character starts from before headings are applied.
    pub const fn base_attributes(&self) -> AttributeSet {
        AttributeSet {
            font: self.body_font,
            foreground: self.foreground,
            paragraph: self.body_paragraph,
        }
    }

    /// Attributes for a whole heading line. Levels above 6 use the level 6 style.
    pub const fn heading_attributes(&self, level: u8) -> AttributeSet {
        AttributeSet {
            font: Self::heading_font(level),
            foreground: self.heading_foreground,
            paragraph: Self::heading_paragraph(level),
        }
    }

    /// Attributes for the `#` run of a heading.
    pub const fn marker_attributes(&self, level: u8) -> AttributeSet {
        AttributeSet {
            foreground: self.accent,
            ..self.heading_attributes(level)
        }
    }

    const fn heading_font(level: u8) -> Font {
        match level {
            1 => Font::new(FontFamily::System, 36, FontWeight::Bold),
            2 => Font::new(FontFamily::System, 31, FontWeight::Semibold),
            3 => Font::new(FontFamily::System, 27, FontWeight::Semibold),
            4 => Font::new(FontFamily::System, 23, FontWeight::Medium),
            5 => Font::new(FontFamily::System, 20, FontWeight::Medium),
            _ => Font::new(FontFamily::System, 18, FontWeight::Medium),
        }
    }

    const fn heading_paragraph(level: u8) -> ParagraphStyle {
        let major = level <= 2;
        ParagraphStyle {
            line_spacing: 5,
            paragraph_spacing: if major { 10 } else { 8 },
            paragraph_spacing_before: if major { 4 } else { 2 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_parses_six_digits() {
        assert_eq!(Rgba::from_hex("#b44dff"), Rgba::opaque(0xb4, 0x4d, 0xff));
        assert_eq!(Rgba::from_hex("1a0533"), Rgba::opaque(0x1a, 0x05, 0x33));
    }

    #[test]
    fn test_from_hex_invalid_falls_back_to_white() {
        assert_eq!(Rgba::from_hex("#fff"), Rgba::WHITE);
        assert_eq!(Rgba::from_hex("#zzzzzz"), Rgba::WHITE);
        assert_eq!(Rgba::from_hex(""), Rgba::WHITE);
    }

    #[test]
    fn test_display_round_trips_hex() {
        assert_eq!(Rgba::from_hex("#e8e0f0").to_string(), "#e8e0f0");
        assert_eq!(Rgba::WHITE.with_alpha(0.96).to_string(), "#fffffff5");
    }

    #[test]
    fn test_blend_endpoints() {
        let a = Rgba::opaque(0, 0, 0);
        let b = Rgba::opaque(200, 100, 50);
        assert_eq!(a.blend(b, 0.0), a);
        assert_eq!(a.blend(b, 1.0), b);
        assert_eq!(a.blend(b, 0.5), Rgba::opaque(100, 50, 25));
    }

    #[test]
    fn test_heading_fonts_shrink_with_level() {
        let theme = Theme::nopad();
        let sizes: Vec<u16> = (1..=6)
            .map(|level| theme.heading_attributes(level).font.size)
            .collect();
        assert_eq!(sizes, vec![36, 31, 27, 23, 20, 18]);
        assert_eq!(theme.heading_attributes(1).font.weight, FontWeight::Bold);
    }

    #[test]
    fn test_marker_differs_from_heading_only_in_color() {
        let theme = Theme::nopad();
        let heading = theme.heading_attributes(2);
        let marker = theme.marker_attributes(2);
        assert_eq!(marker.font, heading.font);
        assert_eq!(marker.paragraph, heading.paragraph);
        assert_eq!(marker.foreground, theme.accent);
    }

    #[test]
    fn test_heading_paragraph_spacing_by_level() {
        let theme = Theme::nopad();
        assert_eq!(theme.heading_attributes(2).paragraph.paragraph_spacing, 10);
        assert_eq!(theme.heading_attributes(3).paragraph.paragraph_spacing, 8);
        assert_eq!(
            theme.heading_attributes(3).paragraph.paragraph_spacing_before,
            2
        );
    }
}
