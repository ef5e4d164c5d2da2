//! CPAL output stream
//!
//! ```text
//! ┌──────────────────┐                     ┌─────────────────────┐
//! │     UI Thread    │───push()───────────►│   Command Queue     │
//! │   (~33ms tick)   │                     │  (lock-free SPSC)   │
//! └──────────────────┘                     └──────────┬──────────┘
//!         │                                           │
//!         │ Relaxed atomics                           │ pop()
//!         ▼                                           ▼
//! ┌──────────────────┐                     ┌─────────────────────┐
//! │ TransportAtomics │◄────────────────────│  CPAL Audio Thread  │
//! │   (lock-free)    │     sync writes     │   (owns Playhead)   │
//! └──────────────────┘                     └─────────────────────┘
//! ```

use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, SampleFormat, Stream, StreamConfig};

use super::error::{AudioError, AudioResult};
use super::transport::{command_channel, CommandSender, Playhead, Transport, TransportAtomics};
use crate::types::DEFAULT_SAMPLE_RATE;

/// Keeps the output stream alive. Drop this to stop audio.
pub struct AudioHandle {
    _stream: Stream,
    sample_rate: u32,
}

impl AudioHandle {
    /// Device sample rate
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// Output stream preferences
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputConfig {
    /// Device sample rate to request (44.1kHz when unset)
    pub sample_rate: Option<u32>,
    /// Buffer size in frames (device default when unset)
    pub buffer_size: Option<u32>,
}

/// Smallest and largest buffer sizes accepted from config
pub const MIN_BUFFER_SIZE: u32 = 64;
pub const MAX_BUFFER_SIZE: u32 = 8192;

/// Open the default output device and start the transport stream
///
/// The preferred rate is used when the device supports it; otherwise the
/// device's maximum rate is used and tracks are rate-stepped to it.
pub fn start_audio_system(config: &OutputConfig) -> AudioResult<(Transport, AudioHandle)> {
    let host = cpal::default_host();
    let device = host.default_output_device().ok_or(AudioError::NoDevice)?;

    let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());
    log::info!("Using audio device: {}", device_name);

    let supported_config = get_output_config(&device, config.sample_rate)?;
    let sample_rate = supported_config.sample_rate().0;
    let buffer_size = match config.buffer_size {
        Some(frames) => BufferSize::Fixed(frames.clamp(MIN_BUFFER_SIZE, MAX_BUFFER_SIZE)),
        None => BufferSize::Default,
    };
    let stream_config = StreamConfig {
        channels: supported_config.channels(),
        sample_rate: supported_config.sample_rate(),
        buffer_size,
    };

    log::info!(
        "Audio config: {} channels, {}Hz, buffer {:?}",
        stream_config.channels,
        sample_rate,
        stream_config.buffer_size
    );

    let atomics = Arc::new(TransportAtomics::new());
    let (command_tx, command_rx) = command_channel();
    let playhead = Playhead::new(sample_rate, atomics.clone());

    let stream = build_output_stream(&device, &stream_config, playhead, command_rx)?;
    stream
        .play()
        .map_err(|e| AudioError::StreamPlayError(e.to_string()))?;

    log::info!("Audio stream started");

    Ok((
        Transport::new(CommandSender::new(command_tx), atomics),
        AudioHandle {
            _stream: stream,
            sample_rate,
        },
    ))
}

/// Pick an f32 stereo config at the preferred rate, falling back gracefully
fn get_output_config(
    device: &cpal::Device,
    preferred_rate: Option<u32>,
) -> AudioResult<cpal::SupportedStreamConfig> {
    let supported_configs: Vec<_> = device
        .supported_output_configs()
        .map_err(|e| AudioError::ConfigError(e.to_string()))?
        .filter(|c| c.sample_format() == SampleFormat::F32)
        .collect();

    let target_sample_rate = preferred_rate.unwrap_or(DEFAULT_SAMPLE_RATE);
    let in_range = |c: &cpal::SupportedStreamConfigRange| {
        target_sample_rate >= c.min_sample_rate().0 && target_sample_rate <= c.max_sample_rate().0
    };

    let best_config = supported_configs
        .iter()
        .find(|c| c.channels() >= 2 && in_range(c))
        .or_else(|| supported_configs.iter().find(|c| c.channels() >= 2))
        .or_else(|| supported_configs.first())
        .ok_or_else(|| AudioError::UnsupportedFormat("device offers no f32 output".to_string()))?;

    let sample_rate = if in_range(best_config) {
        cpal::SampleRate(target_sample_rate)
    } else {
        let fallback = best_config.max_sample_rate();
        log::warn!(
            "Audio device doesn't support {}Hz, falling back to {}Hz",
            target_sample_rate,
            fallback.0
        );
        fallback
    };

    Ok(best_config.clone().with_sample_rate(sample_rate))
}

fn build_output_stream(
    device: &cpal::Device,
    config: &StreamConfig,
    mut playhead: Playhead,
    mut command_rx: rtrb::Consumer<super::transport::TransportCommand>,
) -> AudioResult<Stream> {
    let channels = config.channels as usize;

    device
        .build_output_stream(
            config,
            move |data: &mut [f32], _info: &cpal::OutputCallbackInfo| {
                playhead.process_commands(&mut command_rx);
                playhead.render_interleaved(data, channels);
            },
            move |err| {
                log::error!("Audio stream error: {}", err);
            },
            None,
        )
        .map_err(|e| AudioError::StreamBuildError(e.to_string()))
}
