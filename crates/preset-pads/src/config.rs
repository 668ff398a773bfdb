//! Preset mode configuration schema and loader
//!
//! Configuration is stored as YAML in the user's config directory.
//! Default location: ~/.config/preset-pads/config.yaml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "preset-pads";

/// Root configuration for the preset selection mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetModeConfig {
    /// JSON file holding favourite presets per instrument
    pub favourites_path: PathBuf,
    /// MIDI channel for bank select / program change (0-15)
    pub midi_channel: u8,
}

impl Default for PresetModeConfig {
    fn default() -> Self {
        Self {
            favourites_path: default_favourites_path(),
            midi_channel: 0,
        }
    }
}

fn config_root() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
        .join(APP_DIR)
}

/// Get the default config file path
///
/// Returns: ~/.config/preset-pads/config.yaml
pub fn default_config_path() -> PathBuf {
    config_root().join("config.yaml")
}

/// Get the default favourites file path
///
/// Returns: ~/.config/preset-pads/favourite_presets.json
pub fn default_favourites_path() -> PathBuf {
    config_root().join("favourite_presets.json")
}

/// Load configuration from a YAML file
///
/// If the file doesn't exist, returns default config.
/// If the file exists but is invalid, logs a warning and returns default config.
pub fn load_config(path: &Path) -> PresetModeConfig {
    log::info!("load_config: Loading from {:?}", path);

    if !path.exists() {
        log::info!("load_config: Config file doesn't exist, using defaults");
        return PresetModeConfig::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_yaml::from_str::<PresetModeConfig>(&contents) {
            Ok(mut config) => {
                if config.midi_channel > 15 {
                    log::warn!(
                        "load_config: MIDI channel {} out of range, using channel 0",
                        config.midi_channel
                    );
                    config.midi_channel = 0;
                }
                log::info!(
                    "load_config: Loaded config - favourites: {:?}, channel: {}",
                    config.favourites_path,
                    config.midi_channel
                );
                config
            }
            Err(e) => {
                log::warn!("load_config: Failed to parse config: {}, using defaults", e);
                PresetModeConfig::default()
            }
        },
        Err(e) => {
            log::warn!(
                "load_config: Failed to read config file: {}, using defaults",
                e
            );
            PresetModeConfig::default()
        }
    }
}

/// Save configuration to a YAML file
///
/// Creates parent directories if they don't exist.
pub fn save_config(config: &PresetModeConfig, path: &Path) -> Result<()> {
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
