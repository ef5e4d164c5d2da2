//! UI module for ripple
//!
//! Built with iced - a cross-platform GUI library for Rust.
//! Talks to the audio thread through the transport's command queue.

pub mod app;
pub mod message;
pub mod player_view;
pub mod theme;

pub use app::RippleApp;
