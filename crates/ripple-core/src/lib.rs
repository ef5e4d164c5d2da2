//! Ripple Core - audio, metadata and playlist library for the Ripple player

pub mod audio;
pub mod audio_file;
pub mod metadata;
pub mod playlist;
pub mod time;
pub mod types;

pub use types::*;
