//! Main iced application for ripple
//!
//! This is the entry point for the GUI. It manages:
//! - The playlist and the repeat/shuffle policy
//! - The playback transport (commands out, atomics in)
//! - The waveform seek bar state and its frame subscription

use std::path::PathBuf;
use std::time::{Duration, Instant};

use iced::widget::{button, column, container, image, row, text, Space};
use iced::{time, window, Center, Element, Fill, Subscription, Task, Theme};
use ripple_core::audio::Transport;
use ripple_core::metadata::Song;
use ripple_core::playlist::{Playlist, RepeatMode, SongEndAction};
use ripple_widgets::{seek_bar, SeekBarEvent, SeekBarMessage, SeekBarState};

use super::message::Message;
use super::player_view::{
    album_art, song_details, time_row, transport_row, volume_control, SeekTooltip,
};
use super::theme::RipplePalette;
use crate::config::{save_config, PlayerConfig, ThemeMode};
use crate::loader::{decode_song, pick_files, read_songs, LoadedTrack};

/// UI refresh interval for reading the transport atomics
const TICK_INTERVAL: Duration = Duration::from_millis(33);

/// Application state
pub struct RippleApp {
    config: PlayerConfig,
    config_path: PathBuf,
    palette: RipplePalette,
    playlist: Playlist,
    transport: Transport,
    seek_bar: SeekBarState,
    repeat: RepeatMode,
    volume: f32,
    muted: bool,
    /// Path of the song the transport currently holds
    loaded_path: Option<PathBuf>,
    /// Start playback once the pending decode arrives
    play_on_load: bool,
    album_art: Option<image::Handle>,
    tooltip: Option<SeekTooltip>,
    status: String,
}

impl RippleApp {
    pub fn new(config: PlayerConfig, config_path: PathBuf, mut transport: Transport) -> Self {
        let volume = config.audio.volume;
        let muted = config.audio.muted;
        transport.set_volume(volume);
        transport.set_muted(muted);

        let status = if transport.is_connected() {
            String::from("Ready")
        } else {
            String::from("No audio device, playback disabled")
        };

        Self {
            palette: RipplePalette::for_mode(config.theme),
            seek_bar: SeekBarState::new(config.seek_bar),
            config,
            config_path,
            playlist: Playlist::new(),
            transport,
            repeat: RepeatMode::Off,
            volume,
            muted,
            loaded_path: None,
            play_on_load: false,
            album_art: None,
            tooltip: None,
            status,
        }
    }

    /// Update state based on message
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => return self.on_tick(),
            Message::SeekBar(seek_message) => {
                let now = match seek_message {
                    SeekBarMessage::Frame(at) => at,
                    _ => Instant::now(),
                };
                if let Some(event) = self.seek_bar.update(seek_message, now) {
                    self.on_seek_bar_event(event);
                }
            }

            // Loading
            Message::LoadSongs => {
                return Task::perform(pick_files(), Message::FilesPicked);
            }
            Message::FilesPicked(paths) => {
                if paths.is_empty() {
                    return Task::none();
                }
                self.status = format!("Reading {} files...", paths.len());
                return Task::perform(read_songs(paths), Message::SongsLoaded);
            }
            Message::SongsLoaded(songs) => {
                if songs.is_empty() {
                    self.status = String::from("No songs could be read");
                    return Task::none();
                }
                self.playlist.set_songs(songs);
                return self.load_current(false);
            }
            Message::TrackDecoded(Ok(track)) => self.on_track_decoded(track),
            Message::TrackDecoded(Err(e)) => {
                log::error!("Track decode failed: {}", e);
                self.status = format!("Could not play: {}", e);
            }

            // Transport
            Message::PlayPause => {
                if self.loaded_path.is_some() {
                    self.transport.toggle();
                }
            }
            Message::Next => {
                let playing = self.transport.is_playing();
                self.playlist.next(true);
                return self.load_current(playing);
            }
            Message::Previous => {
                let playing = self.transport.is_playing();
                self.playlist.previous();
                return self.load_current(playing);
            }
            Message::ToggleShuffle => self.playlist.toggle_shuffle(),
            Message::CycleRepeat => {
                self.repeat = self.repeat.cycle();
                self.transport.set_loop(self.repeat.loops_song());
                log::debug!("Repeat mode: {}", self.repeat);
            }

            // Volume
            Message::SetVolume(volume) => {
                self.volume = volume;
                self.transport.set_volume(volume);
            }
            Message::VolumeReleased => {
                self.config.audio.volume = self.volume;
                self.save_config();
            }
            Message::ToggleMute => {
                self.muted = !self.muted;
                self.transport.set_muted(self.muted);
                self.config.audio.muted = self.muted;
                self.save_config();
            }

            Message::ToggleTheme => {
                self.config.theme = match self.config.theme {
                    ThemeMode::Dark => ThemeMode::Light,
                    ThemeMode::Light => ThemeMode::Dark,
                };
                self.palette = RipplePalette::for_mode(self.config.theme);
                self.save_config();
            }
        }

        Task::none()
    }

    /// Poll the transport and feed the seek bar
    fn on_tick(&mut self) -> Task<Message> {
        if self.transport.take_ended() {
            return self.on_song_end();
        }
        self.seek_bar
            .set_progress(self.transport.progress() as f32, false, Instant::now());
        Task::none()
    }

    fn on_song_end(&mut self) -> Task<Message> {
        match self.playlist.on_song_end(self.repeat) {
            SongEndAction::PlayNext => self.load_current(true),
            SongEndAction::Stop => self.load_current(false),
            // The transport loops by itself
            SongEndAction::Loop => Task::none(),
        }
    }

    fn on_seek_bar_event(&mut self, event: SeekBarEvent) {
        match event {
            SeekBarEvent::SeekCommitted(position) => {
                log::debug!("Seek committed: {:.3}", position);
                self.transport.seek(position as f64);
            }
            SeekBarEvent::Tooltip {
                pointer,
                position,
                over_track,
            } => {
                self.tooltip = over_track.then(|| SeekTooltip {
                    x: pointer.x,
                    seconds: (position as f64 * self.transport.duration_secs()).round(),
                });
            }
        }
    }

    /// Start decoding the playlist's current song
    fn load_current(&mut self, play: bool) -> Task<Message> {
        let Some(song) = self.playlist.current() else {
            return Task::none();
        };

        self.album_art = song
            .album_art()
            .map(|art| image::Handle::from_bytes(art.data.clone()));
        self.status = format!("Loading {}", song.display_title());
        self.play_on_load = play;

        let path = song.path.clone();
        self.transport.unload();
        self.loaded_path = None;

        Task::perform(decode_song(path), Message::TrackDecoded)
    }

    fn on_track_decoded(&mut self, track: LoadedTrack) {
        let current = self.playlist.current().map(|song| &song.path);
        if current != Some(&track.path) {
            log::debug!("Dropping stale decode of {:?}", track.path);
            return;
        }

        log::info!(
            "Track ready: {:?} ({} frames)",
            track.path,
            track.audio.len()
        );

        self.transport.load(track.audio);
        self.seek_bar.set_samples(track.samples);
        self.seek_bar.set_progress(0.0, true, Instant::now());
        if self.play_on_load {
            self.transport.play();
        }
        self.loaded_path = Some(track.path);
        self.status = String::from("Ready");
    }

    fn save_config(&self) {
        if let Err(e) = save_config(&self.config, &self.config_path) {
            log::warn!("Failed to save config: {:#}", e);
        }
    }

    fn current_song(&self) -> Option<&Song> {
        self.playlist.current()
    }

    /// Subscribe to periodic ticks, plus display frames while the seek bar animates
    pub fn subscription(&self) -> Subscription<Message> {
        let tick = time::every(TICK_INTERVAL).map(|_| Message::Tick);

        if self.seek_bar.needs_frames() {
            let frames =
                window::frames().map(|at| Message::SeekBar(SeekBarMessage::Frame(at)));
            Subscription::batch([tick, frames])
        } else {
            tick
        }
    }

    /// Build the view
    pub fn view(&self) -> Element<'_, Message> {
        let header = self.view_header();

        let seek = seek_bar(
            &self.seek_bar,
            self.palette.seek_bar_colors(),
            Message::SeekBar,
        );

        let content = column![
            header,
            album_art(self.album_art.as_ref()),
            song_details(self.current_song()),
            container(transport_row(
                self.transport.is_playing(),
                self.playlist.is_shuffled(),
                self.repeat,
                !self.playlist.is_empty(),
            ))
            .center_x(Fill),
            time_row(
                self.transport.position_secs(),
                self.transport.duration_secs(),
                self.tooltip,
                seek,
            ),
            container(volume_control(self.volume, self.muted)).center_x(Fill),
        ]
        .spacing(12)
        .padding(20);

        container(content).width(Fill).height(Fill).into()
    }

    fn view_header(&self) -> Element<'_, Message> {
        let theme_label = match self.config.theme {
            ThemeMode::Dark => "Light",
            ThemeMode::Light => "Dark",
        };

        row![
            button(text("Load songs").size(14))
                .on_press(Message::LoadSongs)
                .padding(6),
            Space::new().width(Fill),
            text(&self.status).size(12),
            Space::new().width(Fill),
            button(text(theme_label).size(12))
                .on_press(Message::ToggleTheme)
                .padding(6),
        ]
        .spacing(20)
        .align_y(Center)
        .into()
    }

    /// Get the theme
    pub fn theme(&self) -> Theme {
        self.palette.theme(self.config.theme)
    }
}
