//! Song metadata extraction
//!
//! Reads embedded tags with lofty: title, artists, album and cover art, plus
//! the duration from the stream properties. Missing tags are not an error; a
//! file without any tag yields a song with an empty title and the file stem
//! as a display fallback.

use std::borrow::Cow;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use lofty::picture::{Picture, PictureType};
use lofty::prelude::*;
use lofty::tag::Tag;
use thiserror::Error;

/// Errors that can occur while reading metadata
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("File not found: {0:?}")]
    FileNotFound(PathBuf),

    #[error("Failed to read tags: {0}")]
    Lofty(#[from] lofty::error::LoftyError),
}

/// Result type for metadata reads
pub type MetadataResult<T> = Result<T, MetadataError>;

/// An artist credit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artist {
    pub id: String,
    pub name: String,
}

impl Artist {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: stable_id(&name),
            name,
        }
    }
}

/// Embedded cover image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumArt {
    /// MIME type as stored in the tag (e.g. "image/jpeg"), if any
    pub mime_type: Option<String>,
    /// Raw encoded image bytes
    pub data: Vec<u8>,
}

/// Album a song belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album {
    pub id: String,
    pub title: String,
    pub album_art: Option<AlbumArt>,
}

/// A playable song with its metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    pub id: String,
    pub title: String,
    pub path: PathBuf,
    /// Duration in seconds (0.0 when unknown)
    pub duration: f64,
    pub main_artist: Artist,
    pub other_artists: Vec<Artist>,
    pub album: Option<Album>,
}

impl Song {
    /// Song with no tags, identified only by its path
    pub fn untagged(path: &Path) -> Self {
        Self {
            id: stable_id(""),
            title: String::new(),
            path: path.to_path_buf(),
            duration: 0.0,
            main_artist: Artist::new(""),
            other_artists: Vec::new(),
            album: None,
        }
    }

    /// Title for display, falling back to the file name
    pub fn display_title(&self) -> Cow<'_, str> {
        if !self.title.is_empty() {
            return Cow::Borrowed(&self.title);
        }
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy())
            .unwrap_or(Cow::Borrowed(""))
    }

    /// Cover art bytes, if the song has any
    pub fn album_art(&self) -> Option<&AlbumArt> {
        self.album.as_ref().and_then(|a| a.album_art.as_ref())
    }
}

/// Stable string identifier derived from a tag value
///
/// Equal strings map to equal ids, so two songs from the same album share the
/// album id.
pub fn stable_id(value: &str) -> String {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish().to_string()
}

/// Read a song's metadata from an audio file
pub fn read_song(path: &Path) -> MetadataResult<Song> {
    if !path.exists() {
        return Err(MetadataError::FileNotFound(path.to_path_buf()));
    }

    let tagged_file = lofty::read_from_path(path)?;
    let duration = tagged_file.properties().duration().as_secs_f64();

    let mut song = Song::untagged(path);
    song.duration = duration;

    let tag = tagged_file.primary_tag().or_else(|| tagged_file.first_tag());
    if let Some(tag) = tag {
        apply_tag(&mut song, tag);
    } else {
        log::debug!("read_song: {:?} has no tags", path);
    }

    Ok(song)
}

fn apply_tag(song: &mut Song, tag: &Tag) {
    let title = tag.title().map(|s| s.into_owned()).unwrap_or_default();
    song.id = stable_id(&title);
    song.title = title;

    if let Some(artist) = tag.artist() {
        song.main_artist = Artist::new(artist.into_owned());
    }

    // Multi-valued artist fields; the first entry is the main artist
    song.other_artists = tag
        .get_strings(&ItemKey::TrackArtist)
        .skip(1)
        .map(Artist::new)
        .collect();

    if let Some(album_title) = tag.album() {
        let album_title = album_title.into_owned();
        song.album = Some(Album {
            id: stable_id(&album_title),
            title: album_title,
            album_art: pick_cover(tag.pictures()).map(|picture| AlbumArt {
                mime_type: picture.mime_type().map(|m| m.as_str().to_string()),
                data: picture.data().to_vec(),
            }),
        });
    }
}

/// Prefer the front cover, otherwise the first embedded picture
fn pick_cover(pictures: &[Picture]) -> Option<&Picture> {
    pictures
        .iter()
        .find(|p| p.pic_type() == PictureType::CoverFront)
        .or_else(|| pictures.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stable_id_is_deterministic() {
        assert_eq!(stable_id("Abbey Road"), stable_id("Abbey Road"));
        assert_ne!(stable_id("Abbey Road"), stable_id("Let It Be"));
    }

    #[test]
    fn test_missing_file() {
        let err = read_song(Path::new("/no/such/song.flac")).unwrap_err();
        assert!(matches!(err, MetadataError::FileNotFound(_)));
    }

    #[test]
    fn test_display_title_falls_back_to_file_name() {
        let mut song = Song::untagged(Path::new("/music/01 - Intro.mp3"));
        assert_eq!(song.display_title(), "01 - Intro");
        song.title = String::from("Intro");
        assert_eq!(song.display_title(), "Intro");
        assert!(song.album_art().is_none());
    }
}
