//! Mapping from the engine's attribute sets to terminal styles.
//!
//! Terminals have one font size, so the type scale collapses to weight:
//! anything heavier than regular renders bold. Alpha is flattened over the
//! theme background, and glowing characters blend toward the glow color.

use ratatui::style::{Color, Modifier, Style};

use crate::theme::{AttributeSet, FontWeight, Rgba, Theme};

pub const fn to_color(color: Rgba) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

/// Composite `color` over an opaque `background`.
pub fn flatten(color: Rgba, background: Rgba) -> Rgba {
    let opaque = Rgba { a: 0xff, ..color };
    let background = Rgba { a: 0xff, ..background };
    background.blend(opaque, f32::from(color.a) / 255.0)
}

/// Style for the text area behind every character.
pub fn base_style(theme: &Theme) -> Style {
    Style::new()
        .fg(to_color(theme.foreground))
        .bg(to_color(theme.background))
}

/// Style for one character with `attributes`, glowing at `glow` opacity.
pub fn char_style(attributes: &AttributeSet, glow: Option<f32>, theme: &Theme) -> Style {
    let mut foreground = flatten(attributes.foreground, theme.background);
    if let Some(opacity) = glow {
        foreground = foreground.blend(flatten(theme.glow, theme.background), opacity);
    }
    let style = Style::new()
        .fg(to_color(foreground))
        .bg(to_color(theme.background));
    if attributes.font.weight > FontWeight::Regular {
        style.add_modifier(Modifier::BOLD)
    } else {
        style
    }
}

pub fn cursor_style(theme: &Theme) -> Style {
    Style::new()
        .fg(to_color(theme.background))
        .bg(to_color(theme.cursor))
}

pub fn status_style(theme: &Theme) -> Style {
    Style::new().fg(Color::White).bg(to_color(theme.accent))
}
