//! Playback output for Ripple
//!
//! The audio system follows a lock-free design for real-time safety:
//!
//! - **UI Thread**: Sends [`TransportCommand`]s via a lock-free ringbuffer
//! - **Audio Thread**: Owns the [`Playhead`] exclusively, processes commands
//! - **Atomics**: UI reads playback state via relaxed atomics (no locks)
//!
//! # Example Usage
//!
//! ```ignore
//! use ripple_core::audio::{gc_handle, start_audio_system, OutputConfig};
//!
//! let (mut transport, _handle) = start_audio_system(&OutputConfig::default())?;
//!
//! transport.load(Shared::new(&gc_handle(), decoded));
//! transport.play();
//! let progress = transport.progress();
//! ```

mod cpal_backend;
mod error;
pub mod gc;
mod transport;

pub use cpal_backend::{
    start_audio_system, AudioHandle, OutputConfig, MAX_BUFFER_SIZE, MIN_BUFFER_SIZE,
};
pub use error::{AudioError, AudioResult};
pub use gc::gc_handle;
pub use transport::{
    command_channel, CommandSender, Playhead, Transport, TransportAtomics, TransportCommand,
    COMMAND_QUEUE_CAPACITY,
};
