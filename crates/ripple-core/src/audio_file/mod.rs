//! Audio file decoding
//!
//! Decodes a whole file into memory with Symphonia. The result carries two
//! views of the same audio:
//!
//! - **frames**: stereo frames for the playback transport
//! - **mono**: the mono-mixed `SampleBuffer` the waveform seek bar samples
//!
//! Mono sources are duplicated into both channels; sources with more than two
//! channels keep their first two.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;

use symphonia::core::audio::SampleBuffer as SymphoniaBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;

use crate::types::{SampleBuffer, StereoSample, DEFAULT_SAMPLE_RATE};

/// Errors that can occur while decoding an audio file
#[derive(Error, Debug)]
pub enum DecodeError {
    /// File could not be opened
    #[error("Failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Container or codec not supported by the enabled Symphonia features
    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    /// File contained no decodable audio track
    #[error("No audio track found")]
    NoAudioTrack,

    /// Every packet failed to decode
    #[error("No audio could be decoded")]
    Empty,
}

/// Result type for decoding
pub type DecodeResult<T> = Result<T, DecodeError>;

/// A fully decoded track
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Stereo frames at `sample_rate`
    pub frames: Vec<StereoSample>,
    /// Source sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels in the source
    pub channels: usize,
    /// Mono mixdown for waveform display
    pub mono: SampleBuffer,
}

impl DecodedAudio {
    /// Build from interleaved samples
    pub fn from_interleaved(samples: &[f32], channels: usize, sample_rate: u32) -> Self {
        let frames = interleaved_to_stereo(samples, channels);
        let mono = SampleBuffer::new(mix_to_mono(&frames), sample_rate);
        Self {
            frames,
            sample_rate,
            channels,
            mono,
        }
    }

    /// Number of stereo frames
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames.len() as f64 / self.sample_rate as f64
    }
}

/// Group interleaved samples into stereo frames
///
/// A trailing partial frame is dropped.
pub fn interleaved_to_stereo(samples: &[f32], channels: usize) -> Vec<StereoSample> {
    match channels {
        0 => Vec::new(),
        1 => samples.iter().map(|&s| StereoSample::mono(s)).collect(),
        n => samples
            .chunks_exact(n)
            .map(|frame| StereoSample::new(frame[0], frame[1]))
            .collect(),
    }
}

/// Average each stereo frame into a single amplitude
pub fn mix_to_mono(frames: &[StereoSample]) -> Vec<f32> {
    frames.iter().map(StereoSample::to_mono).collect()
}

/// Decode an audio file completely into memory
pub fn decode_file(path: &Path) -> DecodeResult<DecodedAudio> {
    let start = Instant::now();

    let file = File::open(path).map_err(|e| DecodeError::Open {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    // Create a hint with the file extension
    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| DecodeError::UnsupportedFormat(e.to_string()))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(DecodeError::NoAudioTrack)?;

    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(DEFAULT_SAMPLE_RATE);
    let mut channels = track
        .codec_params
        .channels
        .map(|c| c.count())
        .unwrap_or(2);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| DecodeError::UnsupportedFormat(e.to_string()))?;

    let mut samples: Vec<f32> = Vec::new();
    let mut sample_buf: Option<SymphoniaBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(e) => {
                log::warn!("Error reading packet: {}", e);
                break;
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(e)) => {
                log::warn!("Skipping undecodable packet: {}", e);
                continue;
            }
            Err(e) => {
                log::warn!("Decoder failed: {}", e);
                break;
            }
        };

        // Initialize sample buffer on first decode
        if sample_buf.is_none() {
            let spec = *decoded.spec();
            sample_rate = spec.rate;
            channels = spec.channels.count();
            sample_buf = Some(SymphoniaBuffer::new(decoded.capacity() as u64, spec));
        }

        if let Some(ref mut buf) = sample_buf {
            buf.copy_interleaved_ref(decoded);
            samples.extend_from_slice(buf.samples());
        }
    }

    if samples.is_empty() {
        return Err(DecodeError::Empty);
    }

    let audio = DecodedAudio::from_interleaved(&samples, channels, sample_rate);

    log::debug!(
        "Decoded {:?}: {} frames, {} ch @ {}Hz in {:?}",
        path,
        audio.len(),
        channels,
        sample_rate,
        start.elapsed()
    );

    Ok(audio)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stereo_is_averaged() {
        let audio = DecodedAudio::from_interleaved(&[1.0, 0.0, -1.0, -1.0, 0.5, 0.5], 2, 44100);
        assert_eq!(audio.len(), 3);
        assert_eq!(audio.mono.as_slice(), &[0.5, -1.0, 0.5]);
        assert_eq!(audio.mono.sample_rate(), 44100);
    }

    #[test]
    fn test_mono_source_is_duplicated() {
        let frames = interleaved_to_stereo(&[0.25, -0.5], 1);
        assert_eq!(frames, vec![StereoSample::mono(0.25), StereoSample::mono(-0.5)]);
        assert_eq!(mix_to_mono(&frames), vec![0.25, -0.5]);
    }

    #[test]
    fn test_surround_keeps_front_pair() {
        // 4 channels, trailing partial frame dropped
        let frames = interleaved_to_stereo(&[0.1, 0.2, 0.9, 0.9, 0.3, 0.4, 0.9, 0.9, 0.5], 4);
        assert_eq!(frames, vec![StereoSample::new(0.1, 0.2), StereoSample::new(0.3, 0.4)]);
    }

    #[test]
    fn test_zero_channels() {
        assert!(interleaved_to_stereo(&[1.0, 2.0], 0).is_empty());
    }

    #[test]
    fn test_missing_file() {
        let err = decode_file(Path::new("/definitely/not/here.mp3")).unwrap_err();
        assert!(matches!(err, DecodeError::Open { .. }));
    }

    #[test]
    fn test_duration() {
        let audio = DecodedAudio::from_interleaved(&vec![0.0; 88200 * 2], 2, 44100);
        assert!((audio.duration_secs() - 2.0).abs() < 1e-9);
        assert!(!audio.is_empty());
    }
}
