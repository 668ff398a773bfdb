//! Preset paging for the pad grid
//!
//! Each bank of 128 presets is split across two grid pages:
//!
//! ```text
//! page 0 ──► bank 0, presets   0-63
//! page 1 ──► bank 0, presets 64-127
//! page 2 ──► bank 1, presets   0-63
//! page 3 ──► bank 1, presets 64-127
//! ...
//! ```
//!
//! The number of pages depends on how many banks the selected instrument has.

use crate::types::{PadPosition, GRID_COLS, PAGES_PER_BANK, PRESETS_PER_PAGE};
use serde::{Deserialize, Serialize};

/// A (preset, bank) address, both 0-indexed
///
/// Serialized as a `[preset, bank]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(u8, u32)", into = "(u8, u32)")]
pub struct PresetSlot {
    /// Program number within the bank (0-127)
    pub preset: u8,
    /// Bank number
    pub bank: u32,
}

impl PresetSlot {
    pub fn new(preset: u8, bank: u32) -> Self {
        Self { preset, bank }
    }
}

impl From<(u8, u32)> for PresetSlot {
    fn from((preset, bank): (u8, u32)) -> Self {
        Self { preset, bank }
    }
}

impl From<PresetSlot> for (u8, u32) {
    fn from(slot: PresetSlot) -> Self {
        (slot.preset, slot.bank)
    }
}

/// Total number of pages for an instrument (two per bank, at least one bank)
///
/// Saturates at `u32::MAX` for absurd bank counts.
pub fn num_pages(n_banks: u32) -> u32 {
    n_banks.max(1).saturating_mul(PAGES_PER_BANK)
}

/// Map a pad on a given page to the preset it selects
pub fn pad_to_preset(page: u32, pad: PadPosition) -> PresetSlot {
    let half = (page % PAGES_PER_BANK) as u8;
    PresetSlot {
        preset: half * PRESETS_PER_PAGE + pad.row() * GRID_COLS + pad.col(),
        bank: page / PAGES_PER_BANK,
    }
}

/// Display label for a bank
///
/// Uses the instrument's bank name when one exists for the index,
/// otherwise the 1-based bank number.
pub fn bank_label(bank: u32, bank_names: Option<&[String]>) -> String {
    bank_names
        .and_then(|names| names.get(bank as usize))
        .cloned()
        .unwrap_or_else(|| (bank + 1).to_string())
}

/// Display label for the 1-based preset range shown on a page
pub fn preset_range_label(page: u32) -> &'static str {
    if page % PAGES_PER_BANK == 0 {
        "1-64"
    } else {
        "65-128"
    }
}

/// Current page state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageState {
    current: u32,
}

impl PageState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current page index
    pub fn current(&self) -> u32 {
        self.current
    }

    /// Bank shown by the current page
    pub fn current_bank(&self) -> u32 {
        self.current / PAGES_PER_BANK
    }

    /// Advance one page, clamping to the last page
    pub fn next(&mut self, n_banks: u32) {
        let last = num_pages(n_banks) - 1;
        if self.current < last {
            self.current += 1;
        } else {
            self.current = last;
        }
    }

    /// Go back one page, stopping at page 0
    pub fn prev(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    /// Whether previous / next pages exist, as `(has_prev, has_next)`
    pub fn has_prev_next(&self, n_banks: u32) -> (bool, bool) {
        let has_prev = self.current > 0;
        let has_next = self.current < num_pages(n_banks) - 1;
        (has_prev, has_next)
    }

    /// Back to the first page
    pub fn reset(&mut self) {
        self.current = 0;
    }
}
