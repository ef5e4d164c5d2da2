//! Ripple - desktop audio player with a waveform seek bar
//!
//! This is the main entry point for the GUI application. It:
//! 1. Loads the YAML config
//! 2. Opens the default output device through cpal
//! 3. Launches the iced GUI with the transport handle

// Hide the console window on Windows unless built with the `console` feature
#![cfg_attr(all(windows, not(feature = "console")), windows_subsystem = "windows")]

mod config;
mod loader;
mod ui;

use std::cell::RefCell;

use iced::{Size, Task};
use ripple_core::audio::{start_audio_system, Transport};

use ui::{message::Message, RippleApp};

fn main() -> iced::Result {
    // Initialize logger - set RUST_LOG=debug for verbose output
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!("ripple starting up");

    let config_path = config::default_config_path();
    let config = config::load_config(&config_path);

    let (transport, audio_handle) = match start_audio_system(&config.audio.output()) {
        Ok((transport, handle)) => {
            log::info!("Audio output started at {} Hz", handle.sample_rate());
            (transport, Some(handle))
        }
        Err(e) => {
            log::warn!("Could not start audio output: {}", e);
            log::warn!("Running in UI-only mode (no audio output)");
            (Transport::disconnected(), None)
        }
    };

    // Wrap resources in cells so the boot closure can be Fn (required by iced)
    // The boot function is only called once, but iced requires Fn for API consistency
    let boot_cell = RefCell::new(Some((config, config_path, transport)));

    let result = iced::application(
        move || {
            let app = match boot_cell.borrow_mut().take() {
                Some((config, config_path, transport)) => {
                    RippleApp::new(config, config_path, transport)
                }
                None => {
                    log::warn!("Boot called twice, starting without audio");
                    RippleApp::new(
                        config::PlayerConfig::default(),
                        config::default_config_path(),
                        Transport::disconnected(),
                    )
                }
            };
            (app, Task::none())
        },
        update,
        view,
    )
    .subscription(subscription)
    .theme(theme)
    .title("Ripple")
    .window_size(Size::new(520.0, 640.0))
    .run();

    // Keep the output stream alive until we're done (it will be dropped here)
    drop(audio_handle);
    log::info!("ripple stopped");

    result
}

/// Update function for iced
fn update(app: &mut RippleApp, message: Message) -> Task<Message> {
    app.update(message)
}

/// View function for iced
fn view(app: &RippleApp) -> iced::Element<'_, Message> {
    app.view()
}

/// Subscription function for iced
fn subscription(app: &RippleApp) -> iced::Subscription<Message> {
    app.subscription()
}

/// Theme function for iced
fn theme(app: &RippleApp) -> iced::Theme {
    app.theme()
}
