//! Application messages for ripple
//!
//! All message types that can be dispatched in the ripple application.

use std::path::PathBuf;

use ripple_core::metadata::Song;
use ripple_widgets::SeekBarMessage;

use crate::loader::LoadedTrack;

/// Messages that can be sent to the application
#[derive(Debug, Clone)]
pub enum Message {
    /// Tick for periodic UI updates (transport atomics reading)
    Tick,
    /// Seek bar input and frame callbacks
    SeekBar(SeekBarMessage),

    // Loading
    /// Open the file dialog
    LoadSongs,
    /// File dialog closed (empty if cancelled)
    FilesPicked(Vec<PathBuf>),
    /// Tags read for the picked files
    SongsLoaded(Vec<Song>),
    /// Background decode finished
    TrackDecoded(Result<LoadedTrack, String>),

    // Transport
    PlayPause,
    Next,
    Previous,
    ToggleShuffle,
    /// off -> all -> one -> off
    CycleRepeat,

    // Volume
    SetVolume(f32),
    /// Volume slider released; persist the level
    VolumeReleased,
    ToggleMute,

    /// Switch between the dark and light palette
    ToggleTheme,
}
