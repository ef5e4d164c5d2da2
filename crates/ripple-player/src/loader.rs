//! Background song loading
//!
//! File dialogs, tag reading and decoding run off the UI thread. Each
//! function here is an async body for `Task::perform`; the blocking parts go
//! through `tokio::task::spawn_blocking`.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use basedrop::Shared;
use ripple_core::audio::gc_handle;
use ripple_core::audio_file::{decode_file, DecodedAudio};
use ripple_core::metadata::{read_song, Song};
use ripple_core::SampleBuffer;

/// Extensions offered by the file dialog
const AUDIO_EXTENSIONS: [&str; 8] = ["mp3", "flac", "wav", "ogg", "m4a", "aac", "aiff", "opus"];

/// A decoded song ready for the transport and the seek bar
#[derive(Clone)]
pub struct LoadedTrack {
    pub path: PathBuf,
    /// Stereo frames for the audio thread
    pub audio: Shared<DecodedAudio>,
    /// Mono mixdown for the seek bar
    pub samples: Arc<SampleBuffer>,
}

impl fmt::Debug for LoadedTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedTrack")
            .field("path", &self.path)
            .field("frames", &self.audio.len())
            .field("samples", &self.samples.len())
            .finish()
    }
}

/// Ask the user for audio files
pub async fn pick_files() -> Vec<PathBuf> {
    rfd::AsyncFileDialog::new()
        .set_title("Load songs")
        .add_filter("Audio files", &AUDIO_EXTENSIONS)
        .pick_files()
        .await
        .map(|files| files.iter().map(|f| f.path().to_path_buf()).collect())
        .unwrap_or_default()
}

/// Read tags for every path
///
/// Files whose tags can't be read are kept with an empty title.
pub async fn read_songs(paths: Vec<PathBuf>) -> Vec<Song> {
    let result = tokio::task::spawn_blocking(move || {
        paths
            .iter()
            .map(|path| match read_song(path) {
                Ok(song) => song,
                Err(e) => {
                    log::warn!("read_songs: {:?}: {}", path, e);
                    Song::untagged(path)
                }
            })
            .collect::<Vec<_>>()
    })
    .await;

    match result {
        Ok(songs) => {
            log::info!("read_songs: {} songs", songs.len());
            songs
        }
        Err(e) => {
            log::error!("read_songs: metadata task failed: {}", e);
            Vec::new()
        }
    }
}

/// Decode a song's audio
pub async fn decode_song(path: PathBuf) -> Result<LoadedTrack, String> {
    tokio::task::spawn_blocking(move || {
        let mut decoded = decode_file(&path).map_err(|e| e.to_string())?;

        // The seek bar keeps the mono mixdown; the audio thread only needs frames
        let sample_rate = decoded.sample_rate;
        let mono = std::mem::replace(&mut decoded.mono, SampleBuffer::new(Vec::new(), sample_rate));

        Ok(LoadedTrack {
            path,
            audio: Shared::new(&gc_handle(), decoded),
            samples: Arc::new(mono),
        })
    })
    .await
    .map_err(|e| format!("decode task failed: {}", e))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_missing_file_is_an_error() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let path = std::env::temp_dir().join("ripple-test-missing").join("nothing.flac");
        let result = runtime.block_on(decode_song(path));
        assert!(result.is_err());
    }
}
