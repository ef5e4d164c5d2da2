//! Common types for Ripple
//!
//! Fundamental audio types shared by the decoder, the playback transport and
//! the waveform widgets.

use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};

/// Fallback sample rate when a source doesn't report one
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Audio sample type
pub type Sample = f32;

/// A single stereo frame (left and right channels)
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StereoSample {
    pub left: Sample,
    pub right: Sample,
}

impl StereoSample {
    /// Create a new stereo sample
    #[inline]
    pub fn new(left: Sample, right: Sample) -> Self {
        Self { left, right }
    }

    /// Same value in both channels
    #[inline]
    pub fn mono(value: Sample) -> Self {
        Self { left: value, right: value }
    }

    /// Scale both channels by a factor
    #[inline]
    pub fn scale(&self, factor: Sample) -> Self {
        Self {
            left: self.left * factor,
            right: self.right * factor,
        }
    }

    /// Linear interpolation towards `other`
    #[inline]
    pub fn lerp(&self, other: &Self, t: Sample) -> Self {
        Self {
            left: self.left + (other.left - self.left) * t,
            right: self.right + (other.right - self.right) * t,
        }
    }

    /// Average of both channels
    #[inline]
    pub fn to_mono(&self) -> Sample {
        0.5 * (self.left + self.right)
    }
}

/// Source of process-unique buffer identities
static NEXT_BUFFER_ID: AtomicU64 = AtomicU64::new(1);

/// Mono amplitude data for a whole track
///
/// Immutable once built. Every buffer gets a process-unique `id` so derived
/// data (bar samples) can be cached without hashing millions of floats.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    id: u64,
    samples: Vec<Sample>,
    sample_rate: u32,
}

impl SampleBuffer {
    /// Wrap decoded mono samples
    pub fn new(samples: Vec<Sample>, sample_rate: u32) -> Self {
        Self {
            id: NEXT_BUFFER_ID.fetch_add(1, Ordering::Relaxed),
            samples,
            sample_rate,
        }
    }

    /// Placeholder buffer shown before any track is loaded
    pub fn silence(len: usize) -> Self {
        Self::new(vec![0.0; len], DEFAULT_SAMPLE_RATE)
    }

    /// Identity used as a cache key
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn as_slice(&self) -> &[Sample] {
        &self.samples
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

impl Deref for SampleBuffer {
    type Target = [Sample];

    fn deref(&self) -> &Self::Target {
        &self.samples
    }
}
