//! Preset selection mode
//!
//! Turns the pad grid into a preset browser for the instrument on the
//! selected track. A short press selects the preset under the pad; a long
//! press marks it as a favourite (or unmarks it). Favourites are shown in
//! the full track color, everything else in a dimmed shade. The page
//! left/right buttons step through the instrument's banks, two pages per bank.

use crate::config::PresetModeConfig;
use crate::favourites::FavouriteStore;
use crate::host::{ModeHost, PadColorMatrix};
use crate::messages::OutboundMessage;
use crate::paging::{self, PageState, PresetSlot};
use crate::types::{Button, ButtonLight, PadColor, PadPosition, PressModifiers};

/// Behaviour shared by all controller modes
///
/// Modes in the same exclusive group (e.g. everything that owns the pads)
/// are never active at the same time; the host switches between them.
pub trait ControllerMode {
    /// Exclusive group this mode belongs to, if any
    fn xor_group(&self) -> Option<&'static str> {
        None
    }

    /// Buttons this mode lights and responds to
    fn buttons_used(&self) -> &[Button];

    fn activate(&mut self, _host: &mut dyn ModeHost) {}

    /// Turn off every button the mode uses
    fn deactivate(&mut self, host: &mut dyn ModeHost) {
        self.release_buttons(host);
    }

    fn update_buttons(&mut self, _host: &mut dyn ModeHost) {}

    fn update_pads(&mut self, _host: &mut dyn ModeHost) {}

    fn new_track_selected(&mut self, _host: &mut dyn ModeHost) {}

    /// Handle a pad press; returns true when the event is consumed
    fn on_pad_pressed(
        &mut self,
        _host: &mut dyn ModeHost,
        _pad: PadPosition,
        _velocity: u8,
        _modifiers: PressModifiers,
    ) -> bool {
        false
    }

    /// Handle a button press; returns true when the event is consumed
    fn on_button_pressed(
        &mut self,
        _host: &mut dyn ModeHost,
        _button: Button,
        _modifiers: PressModifiers,
    ) -> bool {
        false
    }

    /// Switch off every button in `buttons_used`
    fn release_buttons(&self, host: &mut dyn ModeHost) {
        for &button in self.buttons_used() {
            host.set_button_light(button, ButtonLight::Off);
        }
    }

    /// Light a button when the condition holds, otherwise switch it off
    fn light_button_if(&self, host: &mut dyn ModeHost, button: Button, condition: bool) {
        host.set_button_light(button, ButtonLight::when(condition));
    }
}

const PAGE_BUTTONS: [Button; 2] = [Button::PageLeft, Button::PageRight];

/// Pad-grid preset browser with per-instrument favourites
pub struct PresetSelectionMode {
    /// MIDI channel for outgoing bank/program messages
    midi_channel: u8,
    /// Favourite presets, persisted after every change
    favourites: FavouriteStore,
    /// Current grid page
    page: PageState,
}

impl PresetSelectionMode {
    /// Create the mode and load favourites from the configured file
    pub fn new(config: &PresetModeConfig) -> Self {
        Self {
            midi_channel: config.midi_channel,
            favourites: FavouriteStore::load(&config.favourites_path),
            page: PageState::new(),
        }
    }

    /// Create the mode around an already loaded favourite store
    pub fn with_store(favourites: FavouriteStore, midi_channel: u8) -> Self {
        Self {
            midi_channel,
            favourites,
            page: PageState::new(),
        }
    }

    /// Re-read favourites from disk
    pub fn initialize(&mut self) {
        self.favourites.reload();
    }

    pub fn favourites(&self) -> &FavouriteStore {
        &self.favourites
    }

    /// Current grid page
    ///
    /// Page 0 = bank 0 presets 0-63, page 1 = bank 0 presets 64-127,
    /// page 2 = bank 1 presets 0-63, and so on.
    pub fn current_page(&self) -> u32 {
        self.page.current()
    }

    /// Banks available on the selected instrument (at least one)
    pub fn num_banks(&self, host: &dyn ModeHost) -> u32 {
        host.current_track_info().num_banks()
    }

    /// Bank names of the selected instrument, if it provides them
    pub fn bank_names(&self, host: &dyn ModeHost) -> Option<Vec<String>> {
        host.current_track_info().bank_names
    }

    /// Pages available on the selected instrument (two per bank)
    pub fn num_pages(&self, host: &dyn ModeHost) -> u32 {
        paging::num_pages(self.num_banks(host))
    }

    pub fn next_page(&mut self, host: &mut dyn ModeHost) {
        let n_banks = self.num_banks(host);
        self.page.next(n_banks);
        log::debug!(
            "preset mode: Page {} of {}",
            self.page.current(),
            paging::num_pages(n_banks)
        );
        host.request_pads_update();
        host.request_buttons_update();
        self.notify_status_in_display(host);
    }

    pub fn prev_page(&mut self, host: &mut dyn ModeHost) {
        self.page.prev();
        log::debug!("preset mode: Page {}", self.page.current());
        host.request_pads_update();
        host.request_buttons_update();
        self.notify_status_in_display(host);
    }

    /// Whether previous / next pages exist, as `(has_prev, has_next)`
    pub fn has_prev_next_pages(&self, host: &dyn ModeHost) -> (bool, bool) {
        self.page.has_prev_next(self.num_banks(host))
    }

    /// Preset and bank selected by a pad on the current page
    pub fn pad_to_preset(&self, pad: PadPosition) -> PresetSlot {
        paging::pad_to_preset(self.page.current(), pad)
    }

    /// Whether a slot is a favourite of the selected instrument
    pub fn is_favourite(&self, host: &dyn ModeHost, slot: PresetSlot) -> bool {
        self.favourites
            .contains(&host.current_instrument_short_name(), slot)
    }

    pub fn add_favourite_preset(&mut self, host: &dyn ModeHost, slot: PresetSlot) {
        let instrument = host.current_instrument_short_name();
        if let Err(e) = self.favourites.add(&instrument, slot) {
            log::warn!("preset mode: Failed to save favourites: {:#}", e);
        }
    }

    pub fn remove_favourite_preset(&mut self, host: &dyn ModeHost, slot: PresetSlot) {
        let instrument = host.current_instrument_short_name();
        if let Err(e) = self.favourites.remove(&instrument, slot) {
            log::warn!("preset mode: Failed to save favourites: {:#}", e);
        }
    }

    /// Send a program change for the preset
    pub fn send_select_new_preset(&self, host: &mut dyn ModeHost, preset: u8) {
        match OutboundMessage::program_change(self.midi_channel, preset) {
            Ok(msg) => host.send_midi(&msg),
            Err(e) => log::warn!("preset mode: Not sending program change: {}", e),
        }
    }

    /// Send a bank select, unless the instrument only has one bank
    pub fn send_select_new_bank(&self, host: &mut dyn ModeHost, bank: u32) {
        if self.num_banks(host) <= 1 {
            return;
        }
        match OutboundMessage::bank_select(self.midi_channel, bank) {
            Ok(msg) => host.send_midi(&msg),
            Err(e) => log::warn!("preset mode: Not sending bank select: {}", e),
        }
    }

    /// Show the current bank and preset range on the display
    pub fn notify_status_in_display(&self, host: &mut dyn ModeHost) {
        let bank_names = self.bank_names(host);
        let text = format!(
            "Preset selection: bank {}, presets {}",
            paging::bank_label(self.page.current_bank(), bank_names.as_deref()),
            paging::preset_range_label(self.page.current())
        );
        host.add_display_notification(&text);
    }

    fn select_preset(&self, host: &mut dyn ModeHost, slot: PresetSlot) {
        self.send_select_new_bank(host, slot.bank);
        self.send_select_new_preset(host, slot.preset);

        let bank_names = self.bank_names(host);
        let text = format!(
            "Selected bank {}, preset {}",
            paging::bank_label(slot.bank, bank_names.as_deref()),
            u32::from(slot.preset) + 1
        );
        host.add_display_notification(&text);
    }
}

impl ControllerMode for PresetSelectionMode {
    fn xor_group(&self) -> Option<&'static str> {
        Some("pads")
    }

    fn buttons_used(&self) -> &[Button] {
        &PAGE_BUTTONS
    }

    fn activate(&mut self, host: &mut dyn ModeHost) {
        self.update_buttons(host);
        self.update_pads(host);
        self.notify_status_in_display(host);
    }

    fn deactivate(&mut self, host: &mut dyn ModeHost) {
        self.release_buttons(host);
        host.set_all_pads(PadColor::Black);
    }

    fn update_buttons(&mut self, host: &mut dyn ModeHost) {
        let (show_prev, show_next) = self.has_prev_next_pages(host);
        self.light_button_if(host, Button::PageLeft, show_prev);
        self.light_button_if(host, Button::PageRight, show_next);
    }

    fn update_pads(&mut self, host: &mut dyn ModeHost) {
        let instrument = host.current_instrument_short_name();
        let track_color = host.current_track_color();
        let page = self.page.current();

        let colors: PadColorMatrix = std::array::from_fn(|row| {
            std::array::from_fn(|col| {
                let slot = PadPosition::new(row as u8, col as u8)
                    .map(|pad| paging::pad_to_preset(page, pad));
                match slot {
                    Some(slot) if self.favourites.contains(&instrument, slot) => {
                        PadColor::Track(track_color.clone())
                    }
                    _ => PadColor::TrackDimmed(track_color.clone()),
                }
            })
        });
        host.set_pads_color(&colors);
    }

    fn new_track_selected(&mut self, host: &mut dyn ModeHost) {
        self.page.reset();
        host.request_pads_update();
        host.request_buttons_update();
    }

    fn on_pad_pressed(
        &mut self,
        host: &mut dyn ModeHost,
        pad: PadPosition,
        _velocity: u8,
        modifiers: PressModifiers,
    ) -> bool {
        let slot = self.pad_to_preset(pad);
        if modifiers.long_press {
            // Favourite toggle only, no MIDI
            if self.is_favourite(host, slot) {
                self.remove_favourite_preset(host, slot);
            } else {
                self.add_favourite_preset(host, slot);
            }
        } else {
            self.select_preset(host, slot);
        }
        host.request_pads_update();
        true
    }

    fn on_button_pressed(
        &mut self,
        host: &mut dyn ModeHost,
        button: Button,
        _modifiers: PressModifiers,
    ) -> bool {
        let (show_prev, show_next) = self.has_prev_next_pages(host);
        match button {
            Button::PageLeft => {
                if show_prev {
                    self.prev_page(host);
                }
                true
            }
            Button::PageRight => {
                if show_next {
                    self.next_page(host);
                }
                true
            }
            Button::Other(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::testing::RecordingHost;
    use crate::types::TrackInfo;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn pad(row: u8, col: u8) -> PadPosition {
        PadPosition::new(row, col).unwrap()
    }

    fn mode_in(dir: &tempfile::TempDir) -> PresetSelectionMode {
        init_logging();
        let config = PresetModeConfig {
            favourites_path: dir.path().join("favourite_presets.json"),
            midi_channel: 0,
        };
        PresetSelectionMode::new(&config)
    }

    #[test]
    fn test_mode_identity() {
        let dir = tempfile::tempdir().unwrap();
        let mode = mode_in(&dir);
        assert_eq!(mode.xor_group(), Some("pads"));
        assert_eq!(mode.buttons_used(), &[Button::PageLeft, Button::PageRight]);
        assert_eq!(mode.current_page(), 0);
    }

    #[test]
    fn test_short_press_single_bank_sends_program_change_only() {
        let dir = tempfile::tempdir().unwrap();
        let mut mode = mode_in(&dir);
        let mut host = RecordingHost::with_banks("Surge", 1);

        assert!(mode.on_pad_pressed(&mut host, pad(2, 3), 100, PressModifiers::default()));

        assert_eq!(
            host.sent,
            vec![OutboundMessage::ProgramChange { channel: 0, program: 19 }]
        );
        assert_eq!(host.last_notification(), Some("Selected bank 1, preset 20"));
        assert_eq!(host.pads_update_requests, 1);
    }

    #[test]
    fn test_short_press_multi_bank_sends_bank_then_program() {
        let dir = tempfile::tempdir().unwrap();
        let mut mode = mode_in(&dir);
        let mut host = RecordingHost::new(
            "Dexed",
            "blue",
            TrackInfo {
                n_banks: Some(3),
                bank_names: Some(vec!["Factory".into(), "User".into(), "Live".into()]),
            },
        );

        mode.on_button_pressed(&mut host, Button::PageRight, PressModifiers::default());
        mode.on_button_pressed(&mut host, Button::PageRight, PressModifiers::default());
        mode.on_button_pressed(&mut host, Button::PageRight, PressModifiers::default());
        assert_eq!(mode.current_page(), 3);

        mode.on_pad_pressed(&mut host, pad(0, 5), 90, PressModifiers::default());
        assert_eq!(
            host.sent,
            vec![
                OutboundMessage::BankSelect { channel: 0, bank: 1 },
                OutboundMessage::ProgramChange { channel: 0, program: 69 },
            ]
        );
        assert_eq!(host.last_notification(), Some("Selected bank User, preset 70"));
    }

    #[test]
    fn test_long_press_toggles_favourite_without_midi() {
        let dir = tempfile::tempdir().unwrap();
        let mut mode = mode_in(&dir);
        let mut host = RecordingHost::with_banks("Surge", 2);
        let slot = PresetSlot::new(9, 0);

        assert!(mode.on_pad_pressed(&mut host, pad(1, 1), 127, PressModifiers::long_press()));
        assert!(mode.is_favourite(&host, slot));
        assert!(host.sent.is_empty());
        assert!(host.notifications.is_empty());

        let saved = FavouriteStore::load(&dir.path().join("favourite_presets.json"));
        assert!(saved.contains("Surge", slot));

        mode.on_pad_pressed(&mut host, pad(1, 1), 127, PressModifiers::long_press());
        assert!(!mode.is_favourite(&host, slot));
        assert_eq!(host.pads_update_requests, 2);
    }

    #[test]
    fn test_bank_above_midi_range_sends_program_change_only() {
        let dir = tempfile::tempdir().unwrap();
        let mut mode = mode_in(&dir);
        let mut host = RecordingHost::with_banks("Surge", 200);

        for _ in 0..300 {
            mode.next_page(&mut host);
        }
        assert_eq!(mode.current_page(), 300);

        mode.on_pad_pressed(&mut host, pad(0, 0), 100, PressModifiers::default());
        assert_eq!(
            host.sent,
            vec![OutboundMessage::ProgramChange { channel: 0, program: 0 }]
        );
        assert_eq!(host.last_notification(), Some("Selected bank 151, preset 1"));
    }

    #[test]
    fn test_huge_bank_count_keeps_buttons_working() {
        let dir = tempfile::tempdir().unwrap();
        let mut mode = mode_in(&dir);
        let mut host = RecordingHost::with_banks("Surge", u32::MAX);

        mode.update_buttons(&mut host);
        assert_eq!(host.button(Button::PageLeft), Some(ButtonLight::Off));
        assert_eq!(host.button(Button::PageRight), Some(ButtonLight::On));

        assert!(mode.on_button_pressed(&mut host, Button::PageRight, PressModifiers::default()));
        assert_eq!(mode.current_page(), 1);
    }

    #[test]
    fn test_unwritable_favourites_file_keeps_in_memory_toggle() {
        init_logging();
        let dir = tempfile::tempdir().unwrap();
        // A directory can't be written as a file, so every save fails
        let config = PresetModeConfig {
            favourites_path: dir.path().to_path_buf(),
            midi_channel: 0,
        };
        let mut mode = PresetSelectionMode::new(&config);
        let mut host = RecordingHost::with_banks("Surge", 1);
        let slot = PresetSlot::new(10, 0);

        assert!(mode.on_pad_pressed(&mut host, pad(1, 2), 127, PressModifiers::long_press()));
        assert!(mode.is_favourite(&host, slot));

        assert!(mode.on_pad_pressed(&mut host, pad(1, 2), 127, PressModifiers::long_press()));
        assert!(!mode.is_favourite(&host, slot));
        assert!(host.sent.is_empty());
        assert_eq!(host.pads_update_requests, 2);
    }

    #[test]
    fn test_favourites_are_per_instrument() {
        let dir = tempfile::tempdir().unwrap();
        let mut mode = mode_in(&dir);
        let mut surge = RecordingHost::with_banks("Surge", 1);
        let dexed = RecordingHost::with_banks("Dexed", 1);

        mode.on_pad_pressed(&mut surge, pad(0, 0), 127, PressModifiers::long_press());
        assert!(mode.is_favourite(&surge, PresetSlot::new(0, 0)));
        assert_eq!(
            mode.favourites().favourites_for("Surge"),
            &[PresetSlot::new(0, 0)]
        );
        assert!(mode.favourites().favourites_for("Dexed").is_empty());
        assert!(!mode.is_favourite(&dexed, PresetSlot::new(0, 0)));
    }

    #[test]
    fn test_update_pads_highlights_favourites() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("favourite_presets.json"),
            r#"{"Surge": [[3, 0], [64, 0], [3, 1]]}"#,
        )
        .unwrap();
        let mut mode = mode_in(&dir);
        let mut host = RecordingHost::with_banks("Surge", 2);

        mode.update_pads(&mut host);
        let pads = host.pads.clone().unwrap();
        assert_eq!(pads[0][3], PadColor::Track("green".into()));
        assert_eq!(pads[0][0], PadColor::TrackDimmed("green".into()));
        let lit = pads.iter().flatten().filter(|c| matches!(c, PadColor::Track(_))).count();
        assert_eq!(lit, 1);

        // Page 1 shows presets 64-127 of bank 0
        mode.next_page(&mut host);
        mode.update_pads(&mut host);
        let pads = host.pads.clone().unwrap();
        assert_eq!(pads[0][0], PadColor::Track("green".into()));
        assert_eq!(pads[0][3], PadColor::TrackDimmed("green".into()));
    }

    #[test]
    fn test_page_buttons_and_notifications() {
        let dir = tempfile::tempdir().unwrap();
        let mut mode = mode_in(&dir);
        let mut host = RecordingHost::with_banks("Surge", 2);

        // Nothing before page 0, but the button is still consumed
        assert!(mode.on_button_pressed(&mut host, Button::PageLeft, PressModifiers::default()));
        assert_eq!(mode.current_page(), 0);
        assert!(host.notifications.is_empty());

        assert!(mode.on_button_pressed(&mut host, Button::PageRight, PressModifiers::default()));
        assert_eq!(mode.current_page(), 1);
        assert_eq!(
            host.last_notification(),
            Some("Preset selection: bank 1, presets 65-128")
        );
        assert_eq!(host.pads_update_requests, 1);
        assert_eq!(host.buttons_update_requests, 1);

        mode.on_button_pressed(&mut host, Button::PageRight, PressModifiers::default());
        mode.on_button_pressed(&mut host, Button::PageRight, PressModifiers::default());
        mode.on_button_pressed(&mut host, Button::PageRight, PressModifiers::default());
        assert_eq!(mode.current_page(), 3);
        assert_eq!(
            host.last_notification(),
            Some("Preset selection: bank 2, presets 65-128")
        );

        mode.on_button_pressed(&mut host, Button::PageLeft, PressModifiers::default());
        assert_eq!(mode.current_page(), 2);
        assert_eq!(
            host.last_notification(),
            Some("Preset selection: bank 2, presets 1-64")
        );
    }

    #[test]
    fn test_other_buttons_not_consumed() {
        let dir = tempfile::tempdir().unwrap();
        let mut mode = mode_in(&dir);
        let mut host = RecordingHost::with_banks("Surge", 1);
        assert!(!mode.on_button_pressed(&mut host, Button::Other(85), PressModifiers::default()));
    }

    #[test]
    fn test_update_buttons_reflects_available_pages() {
        let dir = tempfile::tempdir().unwrap();
        let mut mode = mode_in(&dir);
        let mut host = RecordingHost::with_banks("Surge", 1);

        mode.update_buttons(&mut host);
        assert_eq!(host.button(Button::PageLeft), Some(ButtonLight::Off));
        assert_eq!(host.button(Button::PageRight), Some(ButtonLight::On));

        mode.next_page(&mut host);
        mode.update_buttons(&mut host);
        assert_eq!(host.button(Button::PageLeft), Some(ButtonLight::On));
        assert_eq!(host.button(Button::PageRight), Some(ButtonLight::Off));
    }

    #[test]
    fn test_new_track_resets_page() {
        let dir = tempfile::tempdir().unwrap();
        let mut mode = mode_in(&dir);
        let mut host = RecordingHost::with_banks("Surge", 4);

        mode.next_page(&mut host);
        mode.next_page(&mut host);
        assert_eq!(mode.current_page(), 2);

        mode.new_track_selected(&mut host);
        assert_eq!(mode.current_page(), 0);
        assert_eq!(host.pads_update_requests, 3);
        assert_eq!(host.buttons_update_requests, 3);
    }

    #[test]
    fn test_activate_and_deactivate() {
        let dir = tempfile::tempdir().unwrap();
        let mut mode = mode_in(&dir);
        let mut host = RecordingHost::new(
            "Surge",
            "red",
            TrackInfo {
                n_banks: None,
                bank_names: Some(vec!["Init".into()]),
            },
        );

        mode.activate(&mut host);
        assert!(host.pads.is_some());
        assert_eq!(host.button(Button::PageRight), Some(ButtonLight::On));
        assert_eq!(
            host.last_notification(),
            Some("Preset selection: bank Init, presets 1-64")
        );

        mode.deactivate(&mut host);
        assert_eq!(host.button(Button::PageLeft), Some(ButtonLight::Off));
        assert_eq!(host.button(Button::PageRight), Some(ButtonLight::Off));
        assert_eq!(host.all_pads, Some(PadColor::Black));
    }

    #[test]
    fn test_initialize_reloads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut mode = mode_in(&dir);
        let host = RecordingHost::with_banks("Surge", 1);
        assert!(!mode.is_favourite(&host, PresetSlot::new(7, 0)));

        std::fs::write(
            dir.path().join("favourite_presets.json"),
            r#"{"Surge": [[7, 0]]}"#,
        )
        .unwrap();
        mode.initialize();
        assert!(mode.is_favourite(&host, PresetSlot::new(7, 0)));
    }

    #[test]
    fn test_configured_channel_used() {
        let dir = tempfile::tempdir().unwrap();
        let store = FavouriteStore::new(dir.path().join("f.json"));
        let mut mode = PresetSelectionMode::with_store(store, 4);
        let mut host = RecordingHost::with_banks("Surge", 2);

        mode.on_pad_pressed(&mut host, pad(0, 0), 100, PressModifiers::default());
        assert!(host.sent.iter().all(|m| m.channel() == 4));
        assert_eq!(host.sent.len(), 2);
    }
}
