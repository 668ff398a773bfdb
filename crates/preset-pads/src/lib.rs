//! Preset selection mode for 8x8 pad grid MIDI controllers
//!
//! This crate provides:
//! - Pad-to-preset mapping across pages (two pages per 128-preset bank)
//! - Bank paging with the controller's page left/right buttons
//! - Per-instrument favourite presets persisted as JSON
//! - Bank select / program change messages for the selected instrument
//! - Display notifications describing the current page and selection
//!
//! # Architecture
//!
//! ```text
//! Pad / button press → PresetSelectionMode → ModeHost (MIDI out, display, pad colors)
//!                              │
//!                              └──► FavouriteStore → favourite_presets.json
//! ```
//!
//! Everything that touches hardware or transport lives behind [`ModeHost`],
//! implemented by the application that owns the controller.

mod config;
mod favourites;
mod host;
mod messages;
mod mode;
mod paging;
mod types;

pub use config::{
    default_config_path, default_favourites_path, load_config, save_config, PresetModeConfig,
};
pub use favourites::{FavouriteMap, FavouriteStore};
pub use host::{ModeHost, PadColorMatrix};
pub use messages::{OutboundMessage, BANK_SELECT_CC};
pub use mode::{ControllerMode, PresetSelectionMode};
pub use paging::{bank_label, num_pages, pad_to_preset, preset_range_label, PageState, PresetSlot};
pub use types::{
    Button, ButtonLight, PadColor, PadPosition, PressModifiers, TrackInfo, GRID_COLS, GRID_ROWS,
    PAGES_PER_BANK, PRESETS_PER_PAGE,
};

/// Error type for preset mode operations
#[derive(Debug, thiserror::Error)]
pub enum PresetModeError {
    #[error("MIDI {what} value {value} out of range (max {max})")]
    ValueOutOfRange {
        what: &'static str,
        value: u32,
        max: u32,
    },

    #[error("Failed to encode MIDI message: {0}")]
    EncodeError(#[from] std::io::Error),
}
