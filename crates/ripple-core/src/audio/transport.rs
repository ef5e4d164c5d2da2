//! Lock-free playback transport
//!
//! - Commands go UI → audio over an `rtrb` SPSC ringbuffer
//! - State goes audio → UI through relaxed atomics
//! - The audio thread owns the [`Playhead`] and the current track exclusively
//!
//! The track's sample rate rarely matches the device's. The playhead advances
//! by `source_rate / device_rate` source frames per output frame and linearly
//! interpolates between neighbouring frames.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

use basedrop::Shared;

use crate::audio_file::DecodedAudio;
use crate::types::StereoSample;

/// Ringbuffer capacity; the UI never sends more than a handful per tick
pub const COMMAND_QUEUE_CAPACITY: usize = 64;

/// Commands sent from UI to audio thread
pub enum TransportCommand {
    /// Replace the current track; playback pauses at the start
    Load(Box<Shared<DecodedAudio>>),
    /// Drop the current track
    Unload,
    Play,
    Pause,
    /// Seek to a normalized position in [0, 1]
    Seek(f64),
    /// Linear gain in [0, 1]
    SetVolume(f32),
    SetMuted(bool),
    /// Loop the current track instead of stopping at the end
    SetLoop(bool),
}

impl std::fmt::Debug for TransportCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load(_) => f.write_str("Load(..)"),
            Self::Unload => f.write_str("Unload"),
            Self::Play => f.write_str("Play"),
            Self::Pause => f.write_str("Pause"),
            Self::Seek(pos) => f.debug_tuple("Seek").field(pos).finish(),
            Self::SetVolume(v) => f.debug_tuple("SetVolume").field(v).finish(),
            Self::SetMuted(m) => f.debug_tuple("SetMuted").field(m).finish(),
            Self::SetLoop(l) => f.debug_tuple("SetLoop").field(l).finish(),
        }
    }
}

/// Create a transport command channel
pub fn command_channel() -> (
    rtrb::Producer<TransportCommand>,
    rtrb::Consumer<TransportCommand>,
) {
    rtrb::RingBuffer::new(COMMAND_QUEUE_CAPACITY)
}

/// Command sender for the UI thread
pub struct CommandSender {
    producer: rtrb::Producer<TransportCommand>,
}

impl CommandSender {
    pub fn new(producer: rtrb::Producer<TransportCommand>) -> Self {
        Self { producer }
    }

    /// Send a command to the audio thread
    ///
    /// Returns Err with the command if the queue is full
    pub fn send(&mut self, cmd: TransportCommand) -> Result<(), TransportCommand> {
        self.producer.push(cmd).map_err(|e| match e {
            rtrb::PushError::Full(value) => value,
        })
    }
}

/// Lock-free atomics for the UI to read transport state
#[derive(Debug)]
pub struct TransportAtomics {
    /// Playhead in source frames
    pub position: AtomicU64,
    /// Track length in source frames
    pub length: AtomicU64,
    /// Source sample rate of the loaded track
    pub sample_rate: AtomicU32,
    pub playing: AtomicBool,
    /// Set when a non-looping track reaches its end, cleared by the UI
    pub ended: AtomicBool,
}

impl TransportAtomics {
    pub fn new() -> Self {
        Self {
            position: AtomicU64::new(0),
            length: AtomicU64::new(0),
            sample_rate: AtomicU32::new(0),
            playing: AtomicBool::new(false),
            ended: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn position(&self) -> u64 {
        self.position.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn length(&self) -> u64 {
        self.length.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Relaxed)
    }

    /// Playhead as a fraction of the track (0.0 with nothing loaded)
    pub fn progress(&self) -> f64 {
        let length = self.length();
        if length == 0 {
            return 0.0;
        }
        (self.position() as f64 / length as f64).clamp(0.0, 1.0)
    }

    /// Playhead in seconds
    pub fn position_secs(&self) -> f64 {
        self.frames_to_secs(self.position())
    }

    /// Track length in seconds
    pub fn duration_secs(&self) -> f64 {
        self.frames_to_secs(self.length())
    }

    fn frames_to_secs(&self, frames: u64) -> f64 {
        match self.sample_rate.load(Ordering::Relaxed) {
            0 => 0.0,
            rate => frames as f64 / rate as f64,
        }
    }
}

impl Default for TransportAtomics {
    fn default() -> Self {
        Self::new()
    }
}

/// Audio-thread side of the transport
///
/// Owns the current track and renders it frame by frame. Track data is never
/// freed here: a replaced track's `Shared` only enqueues itself for collection.
pub struct Playhead {
    track: Option<Shared<DecodedAudio>>,
    /// Fractional position in source frames
    position: f64,
    /// Source frames per output frame
    step: f64,
    device_rate: u32,
    playing: bool,
    looping: bool,
    volume: f32,
    muted: bool,
    atomics: Arc<TransportAtomics>,
}

impl Playhead {
    pub fn new(device_rate: u32, atomics: Arc<TransportAtomics>) -> Self {
        Self {
            track: None,
            position: 0.0,
            step: 1.0,
            device_rate: device_rate.max(1),
            playing: false,
            looping: false,
            volume: 1.0,
            muted: false,
            atomics,
        }
    }

    fn length(&self) -> usize {
        self.track.as_ref().map_or(0, |t| t.len())
    }

    /// Drain pending commands from the UI
    pub fn process_commands(&mut self, rx: &mut rtrb::Consumer<TransportCommand>) {
        while let Ok(cmd) = rx.pop() {
            self.apply(cmd);
        }
    }

    pub fn apply(&mut self, cmd: TransportCommand) {
        match cmd {
            TransportCommand::Load(track) => {
                let track = *track;
                self.step = track.sample_rate.max(1) as f64 / self.device_rate as f64;
                self.atomics.length.store(track.len() as u64, Ordering::Relaxed);
                self.atomics
                    .sample_rate
                    .store(track.sample_rate, Ordering::Relaxed);
                self.track = Some(track);
                self.position = 0.0;
                self.set_playing(false);
                self.atomics.ended.store(false, Ordering::Relaxed);
                self.sync_position();
            }
            TransportCommand::Unload => {
                self.track = None;
                self.position = 0.0;
                self.set_playing(false);
                self.atomics.length.store(0, Ordering::Relaxed);
                self.atomics.sample_rate.store(0, Ordering::Relaxed);
                self.sync_position();
            }
            TransportCommand::Play => {
                let length = self.length();
                if length > 0 {
                    // Restart a finished track
                    if self.position >= length as f64 {
                        self.position = 0.0;
                        self.sync_position();
                    }
                    self.atomics.ended.store(false, Ordering::Relaxed);
                    self.set_playing(true);
                }
            }
            TransportCommand::Pause => self.set_playing(false),
            TransportCommand::Seek(progress) => {
                let progress = if progress.is_finite() {
                    progress.clamp(0.0, 1.0)
                } else {
                    0.0
                };
                self.position = progress * self.length() as f64;
                self.atomics.ended.store(false, Ordering::Relaxed);
                self.sync_position();
            }
            TransportCommand::SetVolume(volume) => self.volume = volume.clamp(0.0, 1.0),
            TransportCommand::SetMuted(muted) => self.muted = muted,
            TransportCommand::SetLoop(looping) => self.looping = looping,
        }
    }

    fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
        self.atomics.playing.store(playing, Ordering::Relaxed);
    }

    fn sync_position(&self) {
        self.atomics
            .position
            .store(self.position as u64, Ordering::Relaxed);
    }

    /// Render the next output frame and advance the playhead
    pub fn next_frame(&mut self) -> StereoSample {
        if !self.playing {
            return StereoSample::default();
        }
        let Some(track) = self.track.as_ref() else {
            return StereoSample::default();
        };

        let frames = &track.frames;
        let length = frames.len();
        let index = self.position as usize;
        if index >= length {
            return StereoSample::default();
        }

        let frac = (self.position - index as f64) as f32;
        let current = frames[index];
        let next = frames.get(index + 1).copied().unwrap_or(current);
        let gain = if self.muted { 0.0 } else { self.volume };
        let out = current.lerp(&next, frac).scale(gain);

        self.position += self.step;
        if self.position >= length as f64 {
            if self.looping {
                self.position -= length as f64;
            } else {
                self.position = length as f64;
                self.set_playing(false);
                self.atomics.ended.store(true, Ordering::Relaxed);
            }
        }

        out
    }

    /// Fill an interleaved device buffer
    ///
    /// Channels beyond the first two are silenced.
    pub fn render_interleaved(&mut self, data: &mut [f32], channels: usize) {
        if channels == 0 {
            return;
        }
        for frame in data.chunks_mut(channels) {
            let sample = self.next_frame();
            frame[0] = sample.left;
            if channels > 1 {
                frame[1] = sample.right;
            }
            for ch in frame.iter_mut().skip(2) {
                *ch = 0.0;
            }
        }
        self.sync_position();
    }
}

/// UI-side transport handle
///
/// Holds the command sender and the atomics. A disconnected transport (no
/// audio device) accepts every call and reports an empty track.
pub struct Transport {
    command_sender: Option<CommandSender>,
    atomics: Arc<TransportAtomics>,
}

impl Transport {
    pub fn new(sender: CommandSender, atomics: Arc<TransportAtomics>) -> Self {
        Self {
            command_sender: Some(sender),
            atomics,
        }
    }

    /// Transport with no audio thread behind it
    pub fn disconnected() -> Self {
        Self {
            command_sender: None,
            atomics: Arc::new(TransportAtomics::new()),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.command_sender.is_some()
    }

    pub fn is_playing(&self) -> bool {
        self.atomics.is_playing()
    }

    pub fn progress(&self) -> f64 {
        self.atomics.progress()
    }

    pub fn position_secs(&self) -> f64 {
        self.atomics.position_secs()
    }

    pub fn duration_secs(&self) -> f64 {
        self.atomics.duration_secs()
    }

    /// Whether the track reached its end since the last call
    pub fn take_ended(&self) -> bool {
        self.atomics.ended.swap(false, Ordering::Relaxed)
    }

    fn send(&mut self, cmd: TransportCommand) {
        if let Some(ref mut sender) = self.command_sender {
            if sender.send(cmd).is_err() {
                log::warn!("Transport: command queue full, command dropped");
            }
        }
    }

    pub fn load(&mut self, track: Shared<DecodedAudio>) {
        let frames = track.len();
        self.send(TransportCommand::Load(Box::new(track)));
        log::info!("Transport: load command sent, {} frames", frames);
    }

    pub fn unload(&mut self) {
        self.send(TransportCommand::Unload);
    }

    pub fn play(&mut self) {
        self.send(TransportCommand::Play);
    }

    pub fn pause(&mut self) {
        self.send(TransportCommand::Pause);
    }

    pub fn toggle(&mut self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Seek to a normalized position
    pub fn seek(&mut self, progress: f64) {
        self.send(TransportCommand::Seek(progress));
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.send(TransportCommand::SetVolume(volume));
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.send(TransportCommand::SetMuted(muted));
    }

    pub fn set_loop(&mut self, looping: bool) {
        self.send(TransportCommand::SetLoop(looping));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::gc::gc_handle;

    fn track(frames: &[f32], sample_rate: u32) -> Box<Shared<DecodedAudio>> {
        let interleaved: Vec<f32> = frames.iter().flat_map(|&s| [s, s]).collect();
        let audio = DecodedAudio::from_interleaved(&interleaved, 2, sample_rate);
        Box::new(Shared::new(&gc_handle(), audio))
    }

    fn playhead(device_rate: u32) -> (Playhead, Arc<TransportAtomics>) {
        let atomics = Arc::new(TransportAtomics::new());
        (Playhead::new(device_rate, atomics.clone()), atomics)
    }

    #[test]
    fn test_command_channel() {
        let (tx, mut rx) = command_channel();
        let mut sender = CommandSender::new(tx);
        sender.send(TransportCommand::Play).unwrap();
        assert!(matches!(rx.pop(), Ok(TransportCommand::Play)));
        assert!(rx.pop().is_err());
    }

    #[test]
    fn test_command_queue_full() {
        let (tx, _rx) = command_channel();
        let mut sender = CommandSender::new(tx);
        for _ in 0..COMMAND_QUEUE_CAPACITY {
            sender.send(TransportCommand::Pause).unwrap();
        }
        assert!(sender.send(TransportCommand::Pause).is_err());
    }

    #[test]
    fn test_silent_until_played() {
        let (mut head, atomics) = playhead(4);
        head.apply(TransportCommand::Load(track(&[1.0, 1.0], 4)));
        assert_eq!(atomics.length(), 2);
        assert_eq!(head.next_frame(), StereoSample::default());
        head.apply(TransportCommand::Play);
        assert!(atomics.is_playing());
        assert_eq!(head.next_frame(), StereoSample::mono(1.0));
    }

    #[test]
    fn test_play_without_track_is_ignored() {
        let (mut head, atomics) = playhead(44100);
        head.apply(TransportCommand::Play);
        assert!(!atomics.is_playing());
    }

    #[test]
    fn test_stops_and_flags_end() {
        let (mut head, atomics) = playhead(4);
        head.apply(TransportCommand::Load(track(&[0.1, 0.2, 0.3], 4)));
        head.apply(TransportCommand::Play);
        let mut out = [0.0f32; 8];
        head.render_interleaved(&mut out, 2);
        assert_eq!(out, [0.1, 0.1, 0.2, 0.2, 0.3, 0.3, 0.0, 0.0]);
        assert!(!atomics.is_playing());
        assert!(atomics.ended.load(Ordering::Relaxed));
        assert_eq!(atomics.progress(), 1.0);

        // Playing again restarts from the top
        head.apply(TransportCommand::Play);
        assert!(!atomics.ended.load(Ordering::Relaxed));
        assert_eq!(head.next_frame(), StereoSample::mono(0.1));
    }

    #[test]
    fn test_loop_wraps() {
        let (mut head, atomics) = playhead(4);
        head.apply(TransportCommand::Load(track(&[0.1, 0.2], 4)));
        head.apply(TransportCommand::SetLoop(true));
        head.apply(TransportCommand::Play);
        let samples: Vec<f32> = (0..5).map(|_| head.next_frame().left).collect();
        assert_eq!(samples, vec![0.1, 0.2, 0.1, 0.2, 0.1]);
        assert!(atomics.is_playing());
        assert!(!atomics.ended.load(Ordering::Relaxed));
    }

    #[test]
    fn test_rate_stepping_interpolates() {
        // 2 Hz source on a 4 Hz device: half-frame steps
        let (mut head, _) = playhead(4);
        head.apply(TransportCommand::Load(track(&[0.0, 1.0], 2)));
        head.apply(TransportCommand::Play);
        let samples: Vec<f32> = (0..4).map(|_| head.next_frame().left).collect();
        assert_eq!(samples, vec![0.0, 0.5, 1.0, 1.0]);
    }

    #[test]
    fn test_seek_clamps_and_reports_progress() {
        let (mut head, atomics) = playhead(100);
        head.apply(TransportCommand::Load(track(&[0.0; 100], 100)));
        head.apply(TransportCommand::Seek(0.25));
        assert_eq!(atomics.position(), 25);
        assert!((atomics.progress() - 0.25).abs() < 1e-9);
        assert!((atomics.position_secs() - 0.25).abs() < 1e-9);
        assert!((atomics.duration_secs() - 1.0).abs() < 1e-9);
        head.apply(TransportCommand::Seek(3.0));
        assert_eq!(atomics.position(), 100);
        head.apply(TransportCommand::Seek(f64::NAN));
        assert_eq!(atomics.position(), 0);
    }

    #[test]
    fn test_volume_and_mute() {
        let (mut head, _) = playhead(4);
        head.apply(TransportCommand::Load(track(&[1.0, 1.0, 1.0], 4)));
        head.apply(TransportCommand::Play);
        head.apply(TransportCommand::SetVolume(0.5));
        assert_eq!(head.next_frame(), StereoSample::mono(0.5));
        head.apply(TransportCommand::SetMuted(true));
        assert_eq!(head.next_frame(), StereoSample::default());
    }

    #[test]
    fn test_extra_channels_silenced() {
        let (mut head, _) = playhead(4);
        head.apply(TransportCommand::Load(track(&[0.5], 4)));
        head.apply(TransportCommand::Play);
        let mut out = [9.0f32; 4];
        head.render_interleaved(&mut out, 4);
        assert_eq!(out, [0.5, 0.5, 0.0, 0.0]);
    }

    #[test]
    fn test_unload_resets_state() {
        let (mut head, atomics) = playhead(4);
        head.apply(TransportCommand::Load(track(&[0.5; 8], 4)));
        head.apply(TransportCommand::Seek(0.5));
        head.apply(TransportCommand::Unload);
        assert_eq!(atomics.length(), 0);
        assert_eq!(atomics.position(), 0);
        assert_eq!(atomics.progress(), 0.0);
        assert_eq!(atomics.duration_secs(), 0.0);
    }

    #[test]
    fn test_disconnected_transport() {
        let mut transport = Transport::disconnected();
        assert!(!transport.is_connected());
        transport.play();
        transport.seek(0.5);
        transport.toggle();
        assert!(!transport.is_playing());
        assert_eq!(transport.progress(), 0.0);
        assert!(!transport.take_ended());
    }

    #[test]
    fn test_take_ended_clears_flag() {
        let atomics = Arc::new(TransportAtomics::new());
        let (tx, _rx) = command_channel();
        let transport = Transport::new(CommandSender::new(tx), atomics.clone());
        atomics.ended.store(true, Ordering::Relaxed);
        assert!(transport.take_ended());
        assert!(!transport.take_ended());
    }
}
