//! Favourite preset storage
//!
//! Favourites are kept per instrument (keyed by the instrument's short name)
//! and written back to a JSON file after every change:
//!
//! ```json
//! {"Surge": [[12, 0], [3, 1]], "Dexed": [[0, 0]]}
//! ```

use crate::paging::PresetSlot;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Instrument short name -> favourite slots, in the order they were added
pub type FavouriteMap = BTreeMap<String, Vec<PresetSlot>>;

/// JSON-backed favourite preset store
#[derive(Debug, Clone)]
pub struct FavouriteStore {
    /// File the store persists to
    path: PathBuf,
    /// Loaded favourites
    favourites: FavouriteMap,
}

impl FavouriteStore {
    /// Create an empty store that will persist to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            favourites: FavouriteMap::new(),
        }
    }

    /// Load favourites from a JSON file
    ///
    /// If the file doesn't exist, returns an empty store.
    /// If the file exists but is invalid, logs a warning and returns an empty store.
    /// Individual malformed entries are skipped with a warning.
    pub fn load(path: &Path) -> Self {
        let mut store = Self::new(path);
        store.reload();
        store
    }

    /// Re-read the backing file, replacing the in-memory favourites
    pub fn reload(&mut self) {
        self.favourites = read_favourites(&self.path);
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether `slot` is a favourite of `instrument`
    pub fn contains(&self, instrument: &str, slot: PresetSlot) -> bool {
        self.favourites
            .get(instrument)
            .is_some_and(|slots| slots.contains(&slot))
    }

    /// Favourite slots for an instrument (empty if it has none)
    pub fn favourites_for(&self, instrument: &str) -> &[PresetSlot] {
        self.favourites
            .get(instrument)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All favourites, by instrument
    pub fn all(&self) -> &FavouriteMap {
        &self.favourites
    }

    /// Add a favourite and save
    pub fn add(&mut self, instrument: &str, slot: PresetSlot) -> Result<()> {
        self.favourites
            .entry(instrument.to_string())
            .or_default()
            .push(slot);
        log::debug!(
            "favourites: Added preset {} bank {} for '{}'",
            slot.preset,
            slot.bank,
            instrument
        );
        self.save()
    }

    /// Remove every matching favourite and save
    ///
    /// Unknown instruments are left alone and nothing is written.
    pub fn remove(&mut self, instrument: &str, slot: PresetSlot) -> Result<()> {
        let Some(slots) = self.favourites.get_mut(instrument) else {
            return Ok(());
        };
        slots.retain(|s| *s != slot);
        log::debug!(
            "favourites: Removed preset {} bank {} for '{}'",
            slot.preset,
            slot.bank,
            instrument
        );
        self.save()
    }

    /// Add the slot if absent, remove it if present
    ///
    /// Returns whether the slot is a favourite afterwards. The in-memory
    /// state is updated even if saving fails.
    pub fn toggle(&mut self, instrument: &str, slot: PresetSlot) -> Result<bool> {
        if self.contains(instrument, slot) {
            self.remove(instrument, slot)?;
            Ok(false)
        } else {
            self.add(instrument, slot)?;
            Ok(true)
        }
    }

    /// Write all favourites to the backing file
    ///
    /// Creates parent directories if they don't exist.
    pub fn save(&self) -> Result<()> {
        log::info!("favourites: Saving to {:?}", self.path);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create favourites directory: {:?}", parent))?;
        }

        let json = serde_json::to_string(&self.favourites)
            .context("Failed to serialize favourite presets to JSON")?;

        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write favourites file: {:?}", self.path))?;

        Ok(())
    }
}

fn read_favourites(path: &Path) -> FavouriteMap {
    log::info!("favourites: Loading from {:?}", path);

    if !path.exists() {
        log::info!("favourites: File doesn't exist, starting with no favourites");
        return FavouriteMap::new();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str::<RawFavouriteMap>(&contents) {
            Ok(raw) => {
                let favourites = parse_entries(raw);
                log::info!(
                    "favourites: Loaded favourites for {} instrument(s)",
                    favourites.len()
                );
                favourites
            }
            Err(e) => {
                log::warn!("favourites: Failed to parse favourites file: {}", e);
                FavouriteMap::new()
            }
        },
        Err(e) => {
            log::warn!("favourites: Failed to read favourites file: {}", e);
            FavouriteMap::new()
        }
    }
}

/// File contents before per-entry validation
type RawFavouriteMap = BTreeMap<String, Vec<serde_json::Value>>;

/// Highest valid program number
const MAX_PRESET: u8 = 127;

/// Convert raw entries to slots, skipping malformed ones
///
/// A bad entry only costs that entry; the rest of the file is kept so the
/// next save doesn't wipe other instruments.
fn parse_entries(raw: RawFavouriteMap) -> FavouriteMap {
    raw.into_iter()
        .map(|(instrument, entries)| {
            let slots = entries
                .into_iter()
                .filter_map(|entry| match serde_json::from_value::<PresetSlot>(entry.clone()) {
                    Ok(slot) if slot.preset <= MAX_PRESET => Some(slot),
                    _ => {
                        log::warn!(
                            "favourites: Skipping invalid entry {} for '{}'",
                            entry,
                            instrument
                        );
                        None
                    }
                })
                .collect();
            (instrument, slots)
        })
        .collect()
}
