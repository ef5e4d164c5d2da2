//! View function for the waveform seek bar

use iced::widget::Canvas;
use iced::{Element, Length};

use super::canvas::SeekBarCanvas;
use super::config::SEEK_BAR_HEIGHT;
use super::message::SeekBarMessage;
use super::state::SeekBarState;
use crate::theme::SeekBarColors;

/// Create a waveform seek bar element
///
/// Fills the available width at a fixed height. Pointer input and resizes
/// come back through `on_message`; feed them to `SeekBarState::update`
/// together with frames from `iced::window::frames()` while
/// `SeekBarState::needs_frames()` is true.
pub fn seek_bar<'a, Message>(
    state: &'a SeekBarState,
    colors: SeekBarColors,
    on_message: impl Fn(SeekBarMessage) -> Message + 'a,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    Canvas::new(SeekBarCanvas {
        state,
        colors,
        on_message,
    })
    .width(Length::Fill)
    .height(Length::Fixed(SEEK_BAR_HEIGHT))
    .into()
}
