//! Colour helpers shared by ripple UI components
//!
//! The seek bar takes three colours from the application theme and derives
//! the rest: the inactive part is the track colour with its saturation
//! removed, and the reflection under each bar is a translucent copy.

use iced::Color;

/// The three colours the seek bar is painted with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeekBarColors {
    /// Played part of the waveform and line
    pub track: Color,
    /// Seek handle fill
    pub handle: Color,
    /// Glow drawn behind bars and line
    pub shadow: Color,
}

impl Default for SeekBarColors {
    fn default() -> Self {
        Self {
            track: hsl(332.0, 0.76, 0.53),
            handle: Color::WHITE,
            shadow: Color::BLACK,
        }
    }
}

/// Same colour with its alpha replaced
pub fn with_opacity(color: Color, alpha: f32) -> Color {
    Color {
        a: alpha.clamp(0.0, 1.0),
        ..color
    }
}

/// Grey of the same HSL lightness (saturation set to zero)
pub fn desaturate(color: Color) -> Color {
    let max = color.r.max(color.g).max(color.b);
    let min = color.r.min(color.g).min(color.b);
    let lightness = (max + min) / 2.0;
    Color {
        r: lightness,
        g: lightness,
        b: lightness,
        a: color.a,
    }
}

/// Colour from hue in degrees, saturation and lightness in [0, 1]
pub fn hsl(hue: f32, saturation: f32, lightness: f32) -> Color {
    let s = saturation.clamp(0.0, 1.0);
    let l = lightness.clamp(0.0, 1.0);
    if s == 0.0 {
        return Color::from_rgb(l, l, l);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let h = hue.rem_euclid(360.0) / 360.0;

    Color::from_rgb(
        hue_to_channel(p, q, h + 1.0 / 3.0),
        hue_to_channel(p, q, h),
        hue_to_channel(p, q, h - 1.0 / 3.0),
    )
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}
