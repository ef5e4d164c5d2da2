//! Player configuration for ripple
//!
//! Configuration is stored as YAML in the user's config directory.
//! Default location: ~/.config/ripple/config.yaml

use anyhow::{Context, Result};
use ripple_core::audio::{OutputConfig, MAX_BUFFER_SIZE, MIN_BUFFER_SIZE};
use ripple_widgets::SeekBarConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Seek bar geometry and animation timing
    pub seek_bar: SeekBarConfig,
    /// Output device and initial volume
    pub audio: AudioConfig,
    /// Colour scheme
    pub theme: ThemeMode,
}

/// Audio configuration section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Volume at startup, 0.0 to 1.0
    pub volume: f32,
    /// Start muted
    pub muted: bool,
    /// Output buffer size in frames (device default when unset)
    pub buffer_size: Option<u32>,
    /// Output sample rate (44.1kHz when unset)
    pub sample_rate: Option<u32>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            volume: 0.5,
            muted: false,
            buffer_size: None,
            sample_rate: None,
        }
    }
}

impl AudioConfig {
    /// Output stream preferences for the audio backend
    pub fn output(&self) -> OutputConfig {
        OutputConfig {
            sample_rate: self.sample_rate,
            buffer_size: self.buffer_size,
        }
    }
}

/// Light or dark palette
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl PlayerConfig {
    /// Clamp out-of-range values
    ///
    /// Returns true if anything was changed.
    pub fn validate(&mut self) -> bool {
        let mut changed = self.seek_bar.validate();

        let volume = if self.audio.volume.is_finite() {
            self.audio.volume.clamp(0.0, 1.0)
        } else {
            AudioConfig::default().volume
        };
        if volume != self.audio.volume {
            log::warn!(
                "PlayerConfig: volume {} out of range, using {}",
                self.audio.volume,
                volume
            );
            self.audio.volume = volume;
            changed = true;
        }

        if let Some(size) = self.audio.buffer_size {
            let clamped = size.clamp(MIN_BUFFER_SIZE, MAX_BUFFER_SIZE);
            if clamped != size {
                log::warn!(
                    "PlayerConfig: buffer size {} out of range, using {}",
                    size,
                    clamped
                );
                self.audio.buffer_size = Some(clamped);
                changed = true;
            }
        }

        if self.audio.sample_rate == Some(0) {
            log::warn!("PlayerConfig: sample rate 0 ignored");
            self.audio.sample_rate = None;
            changed = true;
        }

        changed
    }
}

/// Get the default config file path
///
/// Returns: ~/.config/ripple/config.yaml
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
        .join("ripple")
        .join("config.yaml")
}

/// Load configuration from a YAML file
///
/// If the file doesn't exist, returns default config.
/// If the file exists but is invalid, logs a warning and returns default config.
pub fn load_config(path: &Path) -> PlayerConfig {
    log::info!("load_config: Loading from {:?}", path);

    if !path.exists() {
        log::info!("load_config: Config file doesn't exist, using defaults");
        return PlayerConfig::default();
    }

    let mut config = match std::fs::read_to_string(path) {
        Ok(contents) => match serde_yaml::from_str::<PlayerConfig>(&contents) {
            Ok(config) => {
                log::info!(
                    "load_config: Loaded config - Volume: {:.2}, Muted: {}, Theme: {:?}",
                    config.audio.volume,
                    config.audio.muted,
                    config.theme
                );
                config
            }
            Err(e) => {
                log::warn!("load_config: Failed to parse config: {}, using defaults", e);
                PlayerConfig::default()
            }
        },
        Err(e) => {
            log::warn!(
                "load_config: Failed to read config file: {}, using defaults",
                e
            );
            PlayerConfig::default()
        }
    };

    config.validate();
    config
}

/// Save configuration to a YAML file
///
/// Creates parent directories if they don't exist.
pub fn save_config(config: &PlayerConfig, path: &Path) -> Result<()> {
    log::info!("save_config: Saving to {:?}", path);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
    }

    let yaml = serde_yaml::to_string(config).context("Failed to serialize config to YAML")?;

    std::fs::write(path, yaml)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    log::info!("save_config: Config saved successfully");
    Ok(())
}
