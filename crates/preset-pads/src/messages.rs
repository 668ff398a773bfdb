//! Outbound MIDI messages
//!
//! The mode only ever emits two kinds of message to the instrument:
//! bank select (Control Change #0) and program change. Both are 0-indexed.
//! Encoding to raw bytes goes through midly's live events so the host
//! can hand the bytes straight to its MIDI transport.

use crate::PresetModeError;
use midly::live::LiveEvent;
use midly::num::{u4, u7};
use midly::MidiMessage as MidlyMessage;

/// Control Change number for Bank Select (MSB)
pub const BANK_SELECT_CC: u8 = 0;

const MAX_CHANNEL: u8 = 15;
const MAX_DATA_VALUE: u32 = 127;

/// Message sent to the instrument on the selected track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboundMessage {
    /// Program Change: select a preset within the current bank
    ProgramChange {
        /// MIDI channel (0-15)
        channel: u8,
        /// Program number (0-127)
        program: u8,
    },
    /// Bank Select: Control Change #0 with the bank number as value
    BankSelect {
        /// MIDI channel (0-15)
        channel: u8,
        /// Bank number (0-127)
        bank: u8,
    },
}

impl OutboundMessage {
    /// Create a program change message
    pub fn program_change(channel: u8, program: u8) -> Result<Self, PresetModeError> {
        check_channel(channel)?;
        let program = check_data_value("program", program.into())?;
        Ok(Self::ProgramChange { channel, program })
    }

    /// Create a bank select message
    pub fn bank_select(channel: u8, bank: u32) -> Result<Self, PresetModeError> {
        check_channel(channel)?;
        let bank = check_data_value("bank", bank)?;
        Ok(Self::BankSelect { channel, bank })
    }

    /// MIDI channel the message is sent on
    pub fn channel(&self) -> u8 {
        match self {
            Self::ProgramChange { channel, .. } => *channel,
            Self::BankSelect { channel, .. } => *channel,
        }
    }

    /// Encode to raw MIDI bytes
    ///
    /// - Program Change: `0xCn pp`
    /// - Bank Select: `0xBn 00 vv`
    pub fn to_bytes(&self) -> Result<Vec<u8>, PresetModeError> {
        let event = self.to_live_event();
        let mut bytes = Vec::with_capacity(3);
        event.write_std(&mut bytes)?;
        Ok(bytes)
    }

    fn to_live_event(&self) -> LiveEvent<'static> {
        match *self {
            Self::ProgramChange { channel, program } => LiveEvent::Midi {
                channel: u4::new(channel),
                message: MidlyMessage::ProgramChange {
                    program: u7::new(program),
                },
            },
            Self::BankSelect { channel, bank } => LiveEvent::Midi {
                channel: u4::new(channel),
                message: MidlyMessage::Controller {
                    controller: u7::new(BANK_SELECT_CC),
                    value: u7::new(bank),
                },
            },
        }
    }
}

fn check_channel(channel: u8) -> Result<(), PresetModeError> {
    if channel > MAX_CHANNEL {
        return Err(PresetModeError::ValueOutOfRange {
            what: "channel",
            value: channel.into(),
            max: MAX_CHANNEL.into(),
        });
    }
    Ok(())
}

fn check_data_value(what: &'static str, value: u32) -> Result<u8, PresetModeError> {
    if value > MAX_DATA_VALUE {
        return Err(PresetModeError::ValueOutOfRange {
            what,
            value,
            max: MAX_DATA_VALUE,
        });
    }
    Ok(value as u8)
}
