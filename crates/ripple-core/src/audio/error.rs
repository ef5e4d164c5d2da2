//! Audio backend error types

use thiserror::Error;

/// Errors that can occur while starting audio output
#[derive(Error, Debug)]
pub enum AudioError {
    /// No output device on the default host
    #[error("No audio output device available")]
    NoDevice,

    /// Failed to get device configuration
    #[error("Failed to get device config: {0}")]
    ConfigError(String),

    /// Failed to build audio stream
    #[error("Failed to build audio stream: {0}")]
    StreamBuildError(String),

    /// Failed to start/play stream
    #[error("Failed to start audio stream: {0}")]
    StreamPlayError(String),

    /// Device only offers sample formats the stream can't write
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),
}

/// Result type for audio operations
pub type AudioResult<T> = Result<T, AudioError>;
