//! Waveform seek bar
//!
//! A horizontal canvas that shows the loaded track as a row of amplitude bars
//! with a soft reflection. Hovering morphs the bars into a thin seek line with
//! a draggable handle; leaving grows them back. Dragging the handle or
//! clicking the line moves the playback position.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐ SeekBarMessage ┌───────────────┐ SeekBarEvent ┌──────┐
//! │ SeekBarCanvas│───────────────▶│ SeekBarState  │─────────────▶│ host │
//! │ (iced canvas)│◀───────────────│ (pure data)   │◀─────────────│      │
//! └──────────────┘     draw       └───────────────┘ set_progress └──────┘
//!                                        ▲
//!                                        │ Frame(Instant)
//!                                 window::frames()
//! ```
//!
//! The canvas only translates pointer events; every animation step and
//! timer lives in `SeekBarState`, advanced by the host's frame subscription
//! while `needs_frames()` is true.

mod animation;
mod canvas;
mod config;
mod geometry;
mod message;
mod sampler;
mod state;
mod view;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub use animation::{ease, FrameScheduler, FrameToken, Timer};
pub use canvas::{SeekBarCanvas, SeekBarInteraction};
pub use config::{SeekBarConfig, SEEK_BAR_HEIGHT};
pub use geometry::DrawingContext;
pub use message::{SeekBarEvent, SeekBarMessage};
pub use sampler::{sample, BarSample, SamplerCache};
pub use state::{SeekBarState, ViewState};
pub use view::seek_bar;

/// Errors raised by the seek bar
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeekBarError {
    #[error("Invalid seek bar mode: {0:?}")]
    InvalidMode(String),

    #[error("Canvas has no drawable area ({width}x{height})")]
    EmptyCanvas { width: f32, height: f32 },
}

/// How the seek bar is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawMode {
    /// Thin seek line with handle
    Line,
    /// Amplitude bars with reflection
    #[default]
    Bar,
}

impl DrawMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DrawMode::Line => "line",
            DrawMode::Bar => "bar",
        }
    }
}

impl fmt::Display for DrawMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DrawMode {
    type Err = SeekBarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "line" => Ok(DrawMode::Line),
            "bar" => Ok(DrawMode::Bar),
            other => Err(SeekBarError::InvalidMode(other.to_string())),
        }
    }
}
