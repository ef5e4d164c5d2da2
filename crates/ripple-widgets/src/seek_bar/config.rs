//! Seek bar geometry and animation settings

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Seek bar canvas height in pixels
pub const SEEK_BAR_HEIGHT: f32 = 80.0;

/// Geometry and timing of the waveform seek bar
///
/// Every field defaults independently, so a config file may set any subset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeekBarConfig {
    /// Gap between bars in pixels
    pub bar_gap: f32,
    /// Width of each bar in pixels
    pub bar_width: f32,
    /// Size of the glow behind bars and line
    pub shadow_blur: f32,
    /// Reflection length as a fraction of the bar's upper half, in [0, 1]
    pub shadow_length: f32,
    /// Handle radius while grabbed, also the grab hit radius
    pub handle_active_radius: f32,
    /// Handle radius at rest
    pub handle_inactive_radius: f32,
    /// Inset on every side of the canvas
    pub padding: f32,
    /// Morph multiplier change per frame
    pub morph_step: f32,
    /// Frames a click takes to slide the handle to its target
    pub click_slide_steps: u32,
    /// Quiet period after the last resize before geometry is rebuilt
    pub resize_debounce_ms: u64,
    /// Time for the bars to contract before a new track is sampled
    pub recalc_settle_ms: u64,
}

impl Default for SeekBarConfig {
    fn default() -> Self {
        Self {
            bar_gap: 1.0,
            bar_width: 1.0,
            shadow_blur: 10.0,
            shadow_length: 0.5,
            handle_active_radius: 7.0,
            handle_inactive_radius: 5.0,
            padding: 10.0,
            morph_step: 0.05,
            click_slide_steps: 10,
            resize_debounce_ms: 250,
            recalc_settle_ms: 500,
        }
    }
}

impl SeekBarConfig {
    /// Clamp out-of-range values into something drawable
    ///
    /// Returns true if anything was changed.
    pub fn validate(&mut self) -> bool {
        let before = *self;
        let defaults = Self::default();

        let non_negative = |value: f32, fallback: f32| {
            if value.is_finite() {
                value.max(0.0)
            } else {
                fallback
            }
        };

        self.bar_gap = non_negative(self.bar_gap, defaults.bar_gap);
        self.bar_width = non_negative(self.bar_width, defaults.bar_width);
        // Bars need a positive pitch to be counted
        if self.bar_gap + self.bar_width <= 0.0 {
            self.bar_width = defaults.bar_width;
        }
        self.shadow_blur = non_negative(self.shadow_blur, defaults.shadow_blur);
        self.shadow_length = non_negative(self.shadow_length, defaults.shadow_length).min(1.0);
        self.handle_active_radius =
            non_negative(self.handle_active_radius, defaults.handle_active_radius);
        self.handle_inactive_radius =
            non_negative(self.handle_inactive_radius, defaults.handle_inactive_radius);
        self.padding = non_negative(self.padding, defaults.padding);

        if !self.morph_step.is_finite() || self.morph_step <= 0.0 {
            self.morph_step = defaults.morph_step;
        }
        self.morph_step = self.morph_step.min(1.0);
        self.click_slide_steps = self.click_slide_steps.max(1);

        let changed = *self != before;
        if changed {
            log::warn!("SeekBarConfig: out-of-range values clamped: {:?}", self);
        }
        changed
    }

    /// Distance from one bar's centre to the next
    pub fn bar_pitch(&self) -> f32 {
        self.bar_width + self.bar_gap
    }

    /// Shortest half-height a bar is drawn with
    pub fn min_half_height(&self) -> f32 {
        ((self.bar_gap + self.bar_width) * 0.5).max(1.0)
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    pub fn recalc_settle(&self) -> Duration {
        Duration::from_millis(self.recalc_settle_ms)
    }
}
