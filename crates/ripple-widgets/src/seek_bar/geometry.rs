//! Canvas geometry for the seek bar
//!
//! All positions are in canvas-local pixels. The content box is the canvas
//! minus `padding` on every side; bars are laid out left to right from
//! `padding + gap / 2` at a pitch of `width + gap`.

use iced::{Point, Size};

use super::config::SeekBarConfig;
use super::SeekBarError;

/// Measurements derived from the canvas size and config
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawingContext {
    /// Full canvas size
    pub size: Size,
    /// Content box width (canvas width minus padding on both sides)
    pub max_width: f32,
    /// Content box height
    pub max_height: f32,
    /// Number of bars that fit the content box
    pub bar_count: usize,
    pub padding: f32,
    pub bar_gap: f32,
    pub bar_width: f32,
}

impl DrawingContext {
    /// Measure a canvas
    ///
    /// Fails when the canvas or its content box has no area.
    pub fn measure(size: Size, config: &SeekBarConfig) -> Result<Self, SeekBarError> {
        let max_width = size.width - 2.0 * config.padding;
        let max_height = size.height - 2.0 * config.padding;

        if !(max_width > 0.0 && max_height > 0.0) {
            return Err(SeekBarError::EmptyCanvas {
                width: size.width,
                height: size.height,
            });
        }

        let pitch = config.bar_pitch();
        let fitting = ((max_width - config.bar_gap) / pitch).floor();
        let bar_count = if fitting >= 0.0 { 1 + fitting as usize } else { 0 };

        Ok(Self {
            size,
            max_width,
            max_height,
            bar_count,
            padding: config.padding,
            bar_gap: config.bar_gap,
            bar_width: config.bar_width,
        })
    }

    pub fn pitch(&self) -> f32 {
        self.bar_width + self.bar_gap
    }

    /// Vertical middle of the content box; bars grow up and reflect down from it
    pub fn center_y(&self) -> f32 {
        self.padding + self.max_height / 2.0
    }

    /// Horizontal centre of bar `index`
    pub fn bar_x(&self, index: usize) -> f32 {
        self.line_start() + index as f32 * self.pitch()
    }

    /// Left end of the seek line
    pub fn line_start(&self) -> f32 {
        self.padding + self.bar_gap / 2.0
    }

    /// Right end of the seek line
    pub fn line_end(&self) -> f32 {
        self.size.width - self.line_start()
    }

    /// Where the handle is drawn for a progress value
    pub fn handle_center(&self, progress: f32) -> Point {
        let x1 = self.line_start();
        let x3 = self.line_end();
        Point::new(x1 + progress * (x3 - x1), self.center_y())
    }

    /// Pointer x as a fraction of the content box, unclamped
    pub fn normalized_x(&self, x: f32) -> f32 {
        (x - self.padding) / self.max_width
    }

    /// Full upper half-height of a bar at the given eased multiplier
    pub fn bar_scale(&self, eased: f32) -> f32 {
        eased * (self.center_y() - self.padding)
    }

    /// Gradient span: top and bottom of the content box
    pub fn gradient_span(&self) -> (Point, Point) {
        (
            Point::new(self.padding, self.padding),
            Point::new(self.padding, self.padding + self.max_height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(width: f32, height: f32) -> DrawingContext {
        DrawingContext::measure(Size::new(width, height), &SeekBarConfig::default()).unwrap()
    }

    #[test]
    fn test_bar_count() {
        // 200 px wide, 10 px padding: 180 px content, pitch 2
        let ctx = context(200.0, 80.0);
        assert_eq!(ctx.max_width, 180.0);
        assert_eq!(ctx.max_height, 60.0);
        assert_eq!(ctx.bar_count, 1 + 89);

        let config = SeekBarConfig {
            bar_width: 3.0,
            bar_gap: 2.0,
            ..SeekBarConfig::default()
        };
        let ctx = DrawingContext::measure(Size::new(120.0, 40.0), &config).unwrap();
        // (100 - 2) / 5 = 19.6
        assert_eq!(ctx.bar_count, 20);
    }

    #[test]
    fn test_empty_canvas_is_an_error() {
        let config = SeekBarConfig::default();
        assert!(matches!(
            DrawingContext::measure(Size::ZERO, &config),
            Err(SeekBarError::EmptyCanvas { .. })
        ));
        // Padding eats the whole canvas
        assert!(DrawingContext::measure(Size::new(20.0, 100.0), &config).is_err());
        assert!(DrawingContext::measure(Size::new(f32::NAN, 100.0), &config).is_err());
    }

    #[test]
    fn test_positions() {
        let ctx = context(200.0, 80.0);
        assert_eq!(ctx.center_y(), 40.0);
        assert_eq!(ctx.line_start(), 10.5);
        assert_eq!(ctx.line_end(), 189.5);
        assert_eq!(ctx.bar_x(0), 10.5);
        assert_eq!(ctx.bar_x(3), 16.5);
        assert_eq!(ctx.handle_center(0.0), Point::new(10.5, 40.0));
        assert_eq!(ctx.handle_center(1.0), Point::new(189.5, 40.0));
        assert_eq!(ctx.normalized_x(100.0), 0.5);
        assert_eq!(ctx.normalized_x(0.0), -10.0 / 180.0);
        assert_eq!(ctx.bar_scale(1.0), 30.0);
        assert_eq!(ctx.bar_scale(0.0), 0.0);
    }
}
