//! Canvas program for the waveform seek bar
//!
//! Translates iced events into `SeekBarMessage`s and paints whatever
//! `SeekBarState` last drew. No state is mutated here besides the small
//! interaction record iced keeps per canvas.

use std::f32::consts::PI;

use iced::widget::canvas::{
    self, gradient, path, Event, Frame, Geometry, LineCap, Path, Program, Stroke, Style,
};
use iced::{mouse, window, Color, Point, Radians, Rectangle, Size, Theme};

use super::geometry::DrawingContext;
use super::message::SeekBarMessage;
use super::state::SeekBarState;
use super::DrawMode;
use crate::theme::{desaturate, with_opacity, SeekBarColors};

/// Translucent strokes stacked to approximate the glow
const SHADOW_LAYERS: usize = 4;

/// Peak opacity of the innermost glow layer, relative to the shadow colour
const SHADOW_ALPHA: f32 = 0.12;

/// Line mode is never thinner than this
const MIN_LINE_WIDTH: f32 = 4.0;

/// Offset of the hard stop between a bar and its reflection
const REFLECTION_STOP: f32 = 0.5;

/// Per-canvas interaction record kept by iced
#[derive(Debug, Clone, Copy, Default)]
pub struct SeekBarInteraction {
    /// Size last reported to the state
    last_size: Option<Size>,
    /// Whether the cursor was over the canvas on the last move
    inside: bool,
    /// Whether the current left press started on the canvas
    pressed: bool,
}

/// Canvas program wrapping a `SeekBarState`
///
/// `on_message` maps seek bar messages into the host's message type.
pub struct SeekBarCanvas<'a, Message, F>
where
    F: Fn(SeekBarMessage) -> Message,
{
    pub state: &'a SeekBarState,
    pub colors: SeekBarColors,
    pub on_message: F,
}

impl<'a, Message, F> Program<Message> for SeekBarCanvas<'a, Message, F>
where
    Message: Clone,
    F: Fn(SeekBarMessage) -> Message,
{
    type State = SeekBarInteraction;

    fn update(
        &self,
        interaction: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        let size = bounds.size();
        if interaction.last_size != Some(size)
            && matches!(
                event,
                Event::Window(window::Event::RedrawRequested(_))
                    | Event::Mouse(mouse::Event::CursorMoved { .. })
            )
        {
            interaction.last_size = Some(size);
            return Some(canvas::Action::publish((self.on_message)(
                SeekBarMessage::Resized(size),
            )));
        }

        let message = match event {
            Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                match cursor.position_in(bounds) {
                    Some(position) => {
                        interaction.inside = true;
                        Some(SeekBarMessage::CursorMoved {
                            position,
                            inside: true,
                        })
                    }
                    None if interaction.inside => {
                        interaction.inside = false;
                        let position = cursor
                            .position()
                            .map(|p| Point::new(p.x - bounds.x, p.y - bounds.y))
                            .unwrap_or(Point::ORIGIN);
                        Some(SeekBarMessage::CursorMoved {
                            position,
                            inside: false,
                        })
                    }
                    None => None,
                }
            }
            Event::Mouse(mouse::Event::CursorLeft) => {
                if interaction.inside {
                    interaction.inside = false;
                    Some(SeekBarMessage::CursorLeft)
                } else {
                    None
                }
            }
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                cursor.position_in(bounds).map(|position| {
                    interaction.pressed = true;
                    SeekBarMessage::Pressed(position)
                })
            }
            Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                if interaction.pressed {
                    interaction.pressed = false;
                    let inside = cursor.position_in(bounds);
                    let position = inside
                        .or_else(|| {
                            cursor
                                .position()
                                .map(|p| Point::new(p.x - bounds.x, p.y - bounds.y))
                        })
                        .unwrap_or(Point::ORIGIN);
                    Some(SeekBarMessage::Released {
                        position,
                        inside: inside.is_some(),
                    })
                } else {
                    None
                }
            }
            _ => None,
        };

        message.map(|m| canvas::Action::publish((self.on_message)(m)))
    }

    fn mouse_interaction(
        &self,
        _interaction: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if self.state.is_dragging() {
            mouse::Interaction::Grabbing
        } else if cursor.is_over(bounds) {
            mouse::Interaction::Pointer
        } else {
            mouse::Interaction::default()
        }
    }

    fn draw(
        &self,
        _interaction: &Self::State,
        renderer: &iced::Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());

        let Some(ctx) = self.state.context() else {
            return vec![frame.into_geometry()];
        };

        match self.state.drawn() {
            DrawMode::Bar => draw_bars(&mut frame, ctx, self.state, &self.colors),
            DrawMode::Line => draw_line(&mut frame, ctx, self.state, &self.colors),
        }

        vec![frame.into_geometry()]
    }
}

// =============================================================================
// Layout
// =============================================================================

/// One bar stroke: vertical segment from `top` to `bottom` at `x`
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct BarStroke {
    pub x: f32,
    pub top: f32,
    pub bottom: f32,
    /// Left of the progress cursor
    pub played: bool,
}

/// Lay out the bars for the current morph and progress
pub(crate) fn layout_bars(
    ctx: &DrawingContext,
    values: &[f32],
    eased: f32,
    progress: f32,
    shadow_length: f32,
    min_half_height: f32,
) -> Vec<BarStroke> {
    let center_y = ctx.center_y();
    let factor = ctx.bar_scale(eased);
    let slice = (progress * values.len() as f32).floor() as usize;

    values
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let change = min_half_height.max(value * factor);
            BarStroke {
                x: ctx.bar_x(i),
                top: center_y - change,
                bottom: center_y + change * shadow_length,
                played: i < slice,
            }
        })
        .collect()
}

/// Stroke width of bars at the given eased multiplier
pub(crate) fn bar_stroke_width(ctx: &DrawingContext, eased: f32) -> f32 {
    ctx.bar_width + (1.0 - eased) * ctx.bar_gap
}

// =============================================================================
// Drawing
// =============================================================================

/// Bar on top, translucent reflection below the centre line
fn reflection_gradient(ctx: &DrawingContext, color: Color, morph: f32) -> Style {
    let (start, end) = ctx.gradient_span();
    let reflection = with_opacity(color, color.a * (1.0 - morph * 0.5));
    let linear = gradient::Linear::new(start, end)
        .add_stop(0.0, color)
        .add_stop(REFLECTION_STOP, color)
        .add_stop(REFLECTION_STOP + 1e-4, reflection)
        .add_stop(1.0, reflection);
    Style::Gradient(linear.into())
}

fn bars_path(strokes: &[BarStroke], played: bool) -> Path {
    Path::new(|b| {
        for s in strokes.iter().filter(|s| s.played == played) {
            b.move_to(Point::new(s.x, s.top));
            b.line_to(Point::new(s.x, s.bottom));
        }
    })
}

/// Stack widening translucent strokes under `path` to fake a blur
fn draw_glow(frame: &mut Frame, path: &Path, width: f32, blur: f32, shadow: Color) {
    if blur <= 0.0 || shadow.a <= 0.0 {
        return;
    }
    for layer in (1..=SHADOW_LAYERS).rev() {
        let spread = blur * layer as f32 / SHADOW_LAYERS as f32;
        let alpha = shadow.a * SHADOW_ALPHA * (1.0 - (layer - 1) as f32 / SHADOW_LAYERS as f32);
        frame.stroke(
            path,
            Stroke::default()
                .with_color(with_opacity(shadow, alpha))
                .with_width(width + spread)
                .with_line_cap(LineCap::Round),
        );
    }
}

fn draw_bars(frame: &mut Frame, ctx: &DrawingContext, state: &SeekBarState, colors: &SeekBarColors) {
    let config = state.config();
    let eased = state.eased_morph();
    let strokes = layout_bars(
        ctx,
        &state.bars().values,
        eased,
        state.progress(),
        config.shadow_length,
        config.min_half_height(),
    );
    let width = bar_stroke_width(ctx, eased);

    let played = bars_path(&strokes, true);
    let unplayed = bars_path(&strokes, false);

    draw_glow(frame, &played, width, config.shadow_blur, colors.shadow);
    draw_glow(frame, &unplayed, width, config.shadow_blur, colors.shadow);

    let morph = state.morph();
    for (path, color) in [(&played, colors.track), (&unplayed, desaturate(colors.track))] {
        frame.stroke(
            path,
            Stroke {
                style: reflection_gradient(ctx, color, morph),
                width,
                line_cap: LineCap::Round,
                ..Stroke::default()
            },
        );
    }
}

fn draw_line(frame: &mut Frame, ctx: &DrawingContext, state: &SeekBarState, colors: &SeekBarColors) {
    let config = state.config();
    let y = ctx.center_y();
    let x1 = ctx.line_start();
    let x3 = ctx.line_end();
    let handle = ctx.handle_center(state.progress());
    let width = MIN_LINE_WIDTH.max(ctx.bar_width + ctx.bar_gap);

    let played = Path::line(Point::new(x1, y), handle);
    let unplayed = Path::line(handle, Point::new(x3, y));
    let whole = Path::line(Point::new(x1, y), Point::new(x3, y));

    draw_glow(frame, &whole, width, config.shadow_blur, colors.shadow);

    for (path, color) in [(&played, colors.track), (&unplayed, desaturate(colors.track))] {
        frame.stroke(
            path,
            Stroke::default()
                .with_color(color)
                .with_width(width)
                .with_line_cap(LineCap::Round),
        );
    }

    let radius = state.handle_radius();
    frame.fill(&Path::circle(handle, radius), colors.handle);

    // Lower half-disc highlight
    let highlight = Path::new(|b| {
        b.arc(path::Arc {
            center: handle,
            radius: radius / 2.0,
            start_angle: Radians(0.0),
            end_angle: Radians(PI),
        });
        b.close();
    });
    frame.fill(&highlight, Color::WHITE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seek_bar::SeekBarConfig;

    fn context() -> DrawingContext {
        DrawingContext::measure(Size::new(200.0, 80.0), &SeekBarConfig::default()).unwrap()
    }

    #[test]
    fn test_layout_bars_expanded() {
        let ctx = context();
        let strokes = layout_bars(&ctx, &[1.0, 0.5, 0.0, 0.25], 1.0, 0.5, 0.5, 1.0);
        assert_eq!(strokes.len(), 4);

        // Full bar reaches the top of the content box, reflection half as long
        assert_eq!(strokes[0].top, 10.0);
        assert_eq!(strokes[0].bottom, 55.0);
        assert_eq!(strokes[1].top, 25.0);
        // Silent bars keep the minimum height
        assert_eq!(strokes[2].top, 39.0);
        assert_eq!(strokes[2].bottom, 40.5);

        assert_eq!(strokes[3].x, 16.5);
        let played: Vec<bool> = strokes.iter().map(|s| s.played).collect();
        assert_eq!(played, vec![true, true, false, false]);
    }

    #[test]
    fn test_layout_bars_collapsed() {
        let ctx = context();
        let strokes = layout_bars(&ctx, &[1.0, 0.5], 0.0, 0.0, 0.5, 1.0);
        assert!(strokes.iter().all(|s| s.top == 39.0 && !s.played));
        assert_eq!(bar_stroke_width(&ctx, 0.0), 2.0);
        assert_eq!(bar_stroke_width(&ctx, 1.0), 1.0);
    }

    #[test]
    fn test_layout_bars_end_of_track() {
        let ctx = context();
        let strokes = layout_bars(&ctx, &[0.2; 5], 1.0, 1.0, 0.0, 1.0);
        assert!(strokes.iter().all(|s| s.played && s.bottom == 40.0));
    }
}
