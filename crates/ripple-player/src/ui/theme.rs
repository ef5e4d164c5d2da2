//! Colour palettes for ripple
//!
//! Two palettes, dark and light, defined as hex strings. Each provides the
//! seek bar's three colours and the iced `Theme` for the rest of the window.

use iced::theme::Palette;
use iced::{Color, Theme};
use ripple_widgets::{hsl, SeekBarColors};

use crate::config::ThemeMode;

/// Window colours
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RipplePalette {
    pub background: Color,
    /// Accent and played part of the seek bar
    pub primary: Color,
    /// Seek handle and secondary controls
    pub secondary: Color,
    pub font: Color,
    /// Glow behind the seek bar
    pub main: Color,
    pub tooltip: Color,
}

impl RipplePalette {
    pub fn dark() -> Self {
        Self {
            background: hsl(233.0, 0.38, 0.13),
            primary: hsl(332.0, 0.76, 0.53),
            secondary: Color::WHITE,
            font: Color::WHITE,
            main: parse_hex_color("#000000"),
            tooltip: parse_hex_color("#FFFFFF"),
        }
    }

    pub fn light() -> Self {
        Self {
            main: parse_hex_color("#FFFFFF"),
            tooltip: parse_hex_color("#757575"),
            ..Self::dark()
        }
    }

    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        }
    }

    pub fn seek_bar_colors(&self) -> SeekBarColors {
        SeekBarColors {
            track: self.primary,
            handle: self.secondary,
            shadow: self.main,
        }
    }

    /// iced theme built on this palette
    pub fn theme(&self, mode: ThemeMode) -> Theme {
        let (name, base) = match mode {
            ThemeMode::Dark => ("Ripple Dark", Palette::DARK),
            ThemeMode::Light => ("Ripple Light", Palette::LIGHT),
        };
        Theme::custom(
            name.to_string(),
            Palette {
                background: self.background,
                text: self.font,
                primary: self.primary,
                ..base
            },
        )
    }
}

/// Parse a hex color string to an iced Color
///
/// Supports formats: "#RRGGBB" or "RRGGBB"
/// Returns white on parse failure
fn parse_hex_color(hex: &str) -> Color {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        log::warn!("Invalid hex color '{}', using white", hex);
        return Color::WHITE;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
    let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
    let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);

    Color::from_rgb8(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        let color = parse_hex_color("#FF0000");
        assert_eq!(color.r, 1.0);
        assert_eq!(color.g, 0.0);

        assert_eq!(parse_hex_color("garbage"), Color::WHITE);
    }

    #[test]
    fn test_palettes_differ_in_glow_and_tooltip() {
        let dark = RipplePalette::dark();
        let light = RipplePalette::light();
        assert_eq!(dark.main, Color::BLACK);
        assert_eq!(light.main, Color::WHITE);
        assert_eq!(light.tooltip, Color::from_rgb8(117, 117, 117));
        assert_eq!(dark.primary, light.primary);
    }

    #[test]
    fn test_seek_bar_colors() {
        let colors = RipplePalette::dark().seek_bar_colors();
        assert_eq!(colors.handle, Color::WHITE);
        assert_eq!(colors.shadow, Color::BLACK);
        assert_eq!(colors, SeekBarColors::default());
    }
}
