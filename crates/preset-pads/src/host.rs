//! Host application interface
//!
//! The mode never touches hardware or MIDI ports itself. Track metadata,
//! display notifications, pad/button rendering and MIDI transport all go
//! through the host that owns the controller.

use crate::messages::OutboundMessage;
use crate::types::{Button, ButtonLight, PadColor, TrackInfo, GRID_COLS, GRID_ROWS};

/// Pad colors for the full grid, indexed `[row][col]`
pub type PadColorMatrix = [[PadColor; GRID_COLS as usize]; GRID_ROWS as usize];

/// Services a controller mode needs from the host application
pub trait ModeHost {
    /// Short name of the instrument on the selected track (favourites key)
    fn current_instrument_short_name(&self) -> String;

    /// Palette name of the selected track's color
    fn current_track_color(&self) -> String;

    /// Bank metadata for the instrument on the selected track
    fn current_track_info(&self) -> TrackInfo;

    /// Send a MIDI message to the selected track's instrument
    fn send_midi(&mut self, message: &OutboundMessage);

    /// Show a short notification on the controller display
    fn add_display_notification(&mut self, text: &str);

    /// Set every pad color at once
    fn set_pads_color(&mut self, colors: &PadColorMatrix);

    /// Set all pads to a single color
    fn set_all_pads(&mut self, color: PadColor);

    /// Set a button backlight
    fn set_button_light(&mut self, button: Button, light: ButtonLight);

    /// Ask the host to redraw pads on its next update pass
    fn request_pads_update(&mut self);

    /// Ask the host to redraw buttons on its next update pass
    fn request_buttons_update(&mut self);
}
