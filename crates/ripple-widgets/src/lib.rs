//! Shared UI widgets for the ripple audio player
//!
//! ## Architecture (iced 0.14 patterns)
//!
//! - **State structs**: Pure data driven by explicit methods (`SeekBarState`)
//! - **View functions**: Take state + callbacks, return `Element<Message>`
//! - **Canvas Programs**: Handle custom rendering and event-to-callback translation
//!
//! ## View Functions
//!
//! - `seek_bar`: Waveform seek bar that morphs between amplitude bars and a
//!   draggable seek line

pub mod seek_bar;
pub mod theme;

pub use theme::{desaturate, hsl, with_opacity, SeekBarColors};

pub use seek_bar::{
    seek_bar, BarSample, DrawMode, DrawingContext, SeekBarConfig, SeekBarError, SeekBarEvent,
    SeekBarMessage, SeekBarState, SEEK_BAR_HEIGHT,
};
