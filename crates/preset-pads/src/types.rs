//! Pad grid and controller vocabulary
//!
//! These types describe what the controller reports (pad positions, buttons,
//! gesture modifiers) and what the mode asks the host to render (pad colors,
//! button lights). They carry no device-specific encoding; the host
//! translates them to whatever its hardware binding expects.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of pad rows on the grid
pub const GRID_ROWS: u8 = 8;
/// Number of pad columns on the grid
pub const GRID_COLS: u8 = 8;
/// Presets shown on one page of the grid
pub const PRESETS_PER_PAGE: u8 = GRID_ROWS * GRID_COLS;
/// A bank of 128 presets spans two grid pages
pub const PAGES_PER_BANK: u32 = 2;

/// Position of a pad on the 8x8 grid
///
/// Row 0 is the top row, column 0 the leftmost column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PadPosition {
    row: u8,
    col: u8,
}

impl PadPosition {
    /// Create a pad position, returning None if outside the grid
    pub fn new(row: u8, col: u8) -> Option<Self> {
        if row < GRID_ROWS && col < GRID_COLS {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// Create a pad position from a row-major pad number (0-63)
    pub fn from_index(index: u8) -> Option<Self> {
        if index < PRESETS_PER_PAGE {
            Some(Self {
                row: index / GRID_COLS,
                col: index % GRID_COLS,
            })
        } else {
            None
        }
    }

    /// Row-major pad number (0-63)
    pub fn index(&self) -> u8 {
        self.row * GRID_COLS + self.col
    }

    pub fn row(&self) -> u8 {
        self.row
    }

    pub fn col(&self) -> u8 {
        self.col
    }

    /// Iterate over every pad, row by row
    pub fn all() -> impl Iterator<Item = PadPosition> {
        (0..PRESETS_PER_PAGE).filter_map(PadPosition::from_index)
    }
}

/// Controller buttons this mode cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// Page left (previous page of presets)
    PageLeft,
    /// Page right (next page of presets)
    PageRight,
    /// Any other controller button, identified by its raw control number
    Other(u8),
}

/// Gesture flags delivered alongside a pad or button press
///
/// The host's gesture detection fills these in. Only `long_press` changes
/// what this mode does; the rest are accepted so every mode shares one
/// event signature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PressModifiers {
    /// Loop button held
    pub loop_held: bool,
    /// Quantize button held
    pub quantize_held: bool,
    /// Shift button held
    pub shift: bool,
    /// Select button held
    pub select: bool,
    /// Press was held past the long-press threshold
    pub long_press: bool,
    /// Second press within the double-press window
    pub double_press: bool,
}

impl PressModifiers {
    /// Modifiers for a plain long press
    pub fn long_press() -> Self {
        Self {
            long_press: true,
            ..Self::default()
        }
    }
}

/// Pad color requested from the host
///
/// Colors are palette names owned by the host. A dimmed track color maps to
/// the palette's `<name>_darker2` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PadColor {
    /// Full track color
    Track(String),
    /// Darker shade of the track color
    TrackDimmed(String),
    /// Pad off
    Black,
}

impl PadColor {
    /// Host palette key for this color
    pub fn palette_name(&self) -> String {
        match self {
            PadColor::Track(name) => name.clone(),
            PadColor::TrackDimmed(name) => format!("{}_darker2", name),
            PadColor::Black => "black".to_string(),
        }
    }
}

impl fmt::Display for PadColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.palette_name())
    }
}

/// Button backlight state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonLight {
    On,
    #[default]
    Off,
}

impl ButtonLight {
    /// Light when the condition holds
    pub fn when(condition: bool) -> Self {
        if condition {
            ButtonLight::On
        } else {
            ButtonLight::Off
        }
    }
}

/// Instrument metadata for the currently selected track
///
/// Supplied by the host. Deserializable so hosts that keep instrument
/// definitions on disk can hand them over unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackInfo {
    /// Number of preset banks the instrument exposes (None = 1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_banks: Option<u32>,
    /// Human-readable bank names, indexed by bank number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_names: Option<Vec<String>>,
}

impl TrackInfo {
    /// Number of banks, never less than one
    pub fn num_banks(&self) -> u32 {
        self.n_banks.unwrap_or(1).max(1)
    }
}
