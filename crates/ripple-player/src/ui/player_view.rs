//! Player layout pieces
//!
//! Small view functions composed by `RippleApp::view`. Each takes exactly the
//! values it shows so it can be read without the application state.

use iced::widget::{button, column, container, image, row, slider, text, Space};
use iced::{Center, Element, Fill, Length};
use ripple_core::metadata::Song;
use ripple_core::playlist::RepeatMode;
use ripple_core::time::format_time;

use super::message::Message;

/// Album art edge length
const ART_SIZE: f32 = 180.0;

/// Width reserved for the hover time label
const TOOLTIP_WIDTH: f32 = 48.0;

/// Icon level shown on the mute button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeLevel {
    Mute,
    Low,
    High,
}

impl VolumeLevel {
    pub fn from_volume(volume: f32, muted: bool) -> Self {
        if muted || volume <= 0.0 {
            VolumeLevel::Mute
        } else if volume <= 0.5 {
            VolumeLevel::Low
        } else {
            VolumeLevel::High
        }
    }

    fn label(self) -> &'static str {
        match self {
            VolumeLevel::Mute => "🔇",
            VolumeLevel::Low => "🔉",
            VolumeLevel::High => "🔊",
        }
    }
}

/// Hover label above the seek bar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeekTooltip {
    /// Pointer x in seek bar coordinates
    pub x: f32,
    /// Track time under the pointer
    pub seconds: f64,
}

/// Album art, or a placeholder when the song has none
pub fn album_art(handle: Option<&image::Handle>) -> Element<'static, Message> {
    let content: Element<'static, Message> = match handle {
        Some(handle) => image(handle.clone())
            .width(Length::Fixed(ART_SIZE))
            .height(Length::Fixed(ART_SIZE))
            .into(),
        None => container(text("♪").size(64))
            .center(Length::Fixed(ART_SIZE))
            .into(),
    };
    container(content).center_x(Fill).into()
}

/// Title and artists
pub fn song_details(song: Option<&Song>) -> Element<'_, Message> {
    let Some(song) = song else {
        return column![text("No songs loaded").size(20)]
            .align_x(Center)
            .width(Fill)
            .into();
    };

    let mut artists = song.main_artist.name.clone();
    for other in &song.other_artists {
        artists.push_str(", ");
        artists.push_str(&other.name);
    }

    column![text(song.display_title()).size(20), text(artists).size(14)]
        .spacing(4)
        .align_x(Center)
        .width(Fill)
        .into()
}

/// Shuffle, previous, play/pause, next, repeat
pub fn transport_row(
    is_playing: bool,
    shuffle: bool,
    repeat: RepeatMode,
    has_songs: bool,
) -> Element<'static, Message> {
    let shuffle_label = if shuffle { "Shuffle: on" } else { "Shuffle: off" };
    let play_label = if is_playing { "⏸" } else { "▶" };
    let repeat_label = format!("Repeat: {}", repeat);

    let enabled = |message: Message| has_songs.then_some(message);

    row![
        button(text(shuffle_label).size(12))
            .on_press(Message::ToggleShuffle)
            .padding(6),
        button(text("⏮").size(16))
            .on_press_maybe(enabled(Message::Previous))
            .padding(6),
        button(text(play_label).size(20))
            .on_press_maybe(enabled(Message::PlayPause))
            .padding(8),
        button(text("⏭").size(16))
            .on_press_maybe(enabled(Message::Next))
            .padding(6),
        button(text(repeat_label).size(12))
            .on_press(Message::CycleRepeat)
            .padding(6),
    ]
    .spacing(10)
    .align_y(Center)
    .into()
}

/// Time label riding above the pointer while it hovers the track
fn tooltip_row(tooltip: Option<SeekTooltip>) -> Element<'static, Message> {
    let Some(tooltip) = tooltip else {
        return Space::new().height(18).into();
    };

    let offset = (tooltip.x - TOOLTIP_WIDTH / 2.0).max(0.0);
    row![
        Space::new().width(Length::Fixed(offset)),
        container(text(format_time(tooltip.seconds)).size(12))
            .center_x(Length::Fixed(TOOLTIP_WIDTH)),
    ]
    .height(18)
    .into()
}

/// Seek bar with its hover label, flanked by elapsed and total time
pub fn time_row<'a>(
    position_secs: f64,
    duration_secs: f64,
    tooltip: Option<SeekTooltip>,
    seek_bar: Element<'a, Message>,
) -> Element<'a, Message> {
    row![
        text(format_time(position_secs)).size(12),
        column![tooltip_row(tooltip), seek_bar].width(Fill),
        text(format_time(duration_secs)).size(12),
    ]
    .spacing(8)
    .align_y(Center)
    .into()
}

/// Mute button and volume slider
pub fn volume_control(volume: f32, muted: bool) -> Element<'static, Message> {
    let level = VolumeLevel::from_volume(volume, muted);

    row![
        button(text(level.label()).size(14))
            .on_press(Message::ToggleMute)
            .padding(6),
        slider(0.0..=1.0, volume, Message::SetVolume)
            .step(0.001)
            .on_release(Message::VolumeReleased)
            .width(160),
    ]
    .spacing(10)
    .align_y(Center)
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_level() {
        assert_eq!(VolumeLevel::from_volume(0.0, false), VolumeLevel::Mute);
        assert_eq!(VolumeLevel::from_volume(0.8, true), VolumeLevel::Mute);
        assert_eq!(VolumeLevel::from_volume(0.5, false), VolumeLevel::Low);
        assert_eq!(VolumeLevel::from_volume(0.51, false), VolumeLevel::High);
    }
}
