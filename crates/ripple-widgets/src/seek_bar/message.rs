//! Seek bar message and event types

use std::time::Instant;

use iced::{Point, Size};

/// Input to the seek bar state
///
/// Pointer messages are published by the canvas in canvas-local coordinates;
/// `Frame` comes from the host's frame subscription.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeekBarMessage {
    /// Cursor moved; `inside` is false once it has left the canvas
    CursorMoved { position: Point, inside: bool },
    /// Cursor left the window
    CursorLeft,
    /// Left button pressed over the canvas
    Pressed(Point),
    /// Left button released after a press on the canvas
    Released { position: Point, inside: bool },
    /// Canvas bounds changed
    Resized(Size),
    /// A display frame is about to be drawn
    Frame(Instant),
}

/// Output of the seek bar for the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeekBarEvent {
    /// The user picked a new playback position in [0, 1]
    SeekCommitted(f32),
    /// Hover feedback for a time tooltip
    Tooltip {
        /// Pointer in canvas-local coordinates
        pointer: Point,
        /// Pointer as a clamped fraction of the track
        position: f32,
        /// Whether the pointer is horizontally over the track
        over_track: bool,
    },
}
