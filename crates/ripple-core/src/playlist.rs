//! Playlist, play order and repeat/shuffle bookkeeping
//!
//! The playlist never owns audio; it only decides which song comes next.
//! Shuffling permutes a separate play order so the song list itself keeps the
//! order the user picked files in.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::metadata::Song;

/// Errors from playlist state parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaylistError {
    /// A repeat mode tag that isn't `off`, `all` or `one`
    #[error("Invalid repeat mode: {0:?}")]
    InvalidRepeatMode(String),
}

/// Repeat behaviour at the end of a song
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop after the last song
    #[default]
    Off,
    /// Wrap around to the first song
    All,
    /// Loop the current song
    One,
}

impl RepeatMode {
    /// Next mode in the button cycle: off → all → one → off
    pub fn cycle(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }

    /// Whether the transport should loop the current song
    pub fn loops_song(self) -> bool {
        matches!(self, RepeatMode::One)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RepeatMode::Off => "off",
            RepeatMode::All => "all",
            RepeatMode::One => "one",
        }
    }
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepeatMode {
    type Err = PlaylistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" => Ok(RepeatMode::Off),
            "all" => Ok(RepeatMode::All),
            "one" => Ok(RepeatMode::One),
            other => Err(PlaylistError::InvalidRepeatMode(other.to_string())),
        }
    }
}

/// What the player should do once the current song finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SongEndAction {
    /// Start playing the (new) current song
    PlayNext,
    /// Stop playback; the current song was reset to the first one
    Stop,
    /// The transport loops the song on its own
    Loop,
}

/// Ordered songs plus the order they are played in
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    songs: Vec<Song>,
    /// Indices into `songs`
    play_order: Vec<usize>,
    /// Position in `play_order`
    play_index: usize,
    shuffle: bool,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all songs, keeping the shuffle setting
    pub fn set_songs(&mut self, songs: Vec<Song>) {
        self.songs = songs;
        self.play_order = (0..self.songs.len()).collect();
        self.play_index = 0;
        if self.shuffle {
            self.reshuffle(&mut rand::thread_rng());
        }
        log::info!("Playlist: {} songs loaded", self.songs.len());
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn is_shuffled(&self) -> bool {
        self.shuffle
    }

    pub fn play_index(&self) -> usize {
        self.play_index
    }

    pub fn play_order(&self) -> &[usize] {
        &self.play_order
    }

    /// The song at the current play position
    pub fn current(&self) -> Option<&Song> {
        self.play_order
            .get(self.play_index)
            .and_then(|&i| self.songs.get(i))
    }

    /// Advance to the next song
    ///
    /// Past the last song the play position wraps to the start and `repeat`
    /// is returned, telling the caller whether playback should continue.
    pub fn next(&mut self, repeat: bool) -> bool {
        if self.play_index + 1 < self.play_order.len() {
            self.play_index += 1;
            return true;
        }
        self.play_index = 0;
        repeat
    }

    /// Step back one song, staying on the first one
    pub fn previous(&mut self) {
        self.play_index = self.play_index.saturating_sub(1);
    }

    /// Toggle shuffle on or off
    pub fn toggle_shuffle(&mut self) {
        self.set_shuffle(!self.shuffle);
    }

    /// Enable or disable shuffle
    ///
    /// Enabling keeps the current song playing by moving it to the front of
    /// the shuffled order. Disabling restores the natural order positioned at
    /// the current song.
    pub fn set_shuffle(&mut self, enabled: bool) {
        self.set_shuffle_with(enabled, &mut rand::thread_rng());
    }

    fn set_shuffle_with<R: Rng>(&mut self, enabled: bool, rng: &mut R) {
        if enabled == self.shuffle {
            return;
        }
        self.shuffle = enabled;

        if enabled {
            self.reshuffle(rng);
        } else {
            let current = self.play_order.get(self.play_index).copied().unwrap_or(0);
            self.play_order = (0..self.songs.len()).collect();
            self.play_index = current.min(self.songs.len().saturating_sub(1));
        }
    }

    /// Shuffle the play order with the current song first
    fn reshuffle<R: Rng>(&mut self, rng: &mut R) {
        let current = self.play_order.get(self.play_index).copied();
        self.play_order = (0..self.songs.len()).collect();
        let start = match current {
            Some(index) => {
                self.play_order.swap(0, index);
                1
            }
            None => 0,
        };
        shuffle_from(&mut self.play_order, start, rng);
        self.play_index = 0;
    }

    /// Decide what happens when the current song finishes playing
    pub fn on_song_end(&mut self, repeat: RepeatMode) -> SongEndAction {
        match repeat {
            RepeatMode::One => SongEndAction::Loop,
            RepeatMode::All => {
                self.next(true);
                SongEndAction::PlayNext
            }
            RepeatMode::Off => {
                if self.next(false) {
                    SongEndAction::PlayNext
                } else {
                    SongEndAction::Stop
                }
            }
        }
    }
}

/// Fisher–Yates shuffle of `items[start..]`
fn shuffle_from<T, R: Rng>(items: &mut [T], start: usize, rng: &mut R) {
    for i in start..items.len() {
        let j = rng.gen_range(i..items.len());
        items.swap(i, j);
    }
}
