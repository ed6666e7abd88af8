//! Input events
//!
//! Hardware and host events can be produced on any thread and are queued
//! on a flume channel. [`Device::poll`](crate::Device::poll) drains the
//! queue in order before applying the tick.

use midly::live::LiveEvent;
use midly::MidiMessage;

/// An input event for the surface
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    /// Pot `pot` (0-3) moved to a raw reading
    Pot { pot: usize, raw: f32 },
    /// Encoder turned; the sign gives the direction
    Encoder(i32),
    /// Encoder button pressed or released
    Button { pressed: bool },
    /// MIDI control change
    MidiCc { cc: u8, value: u8 },
    /// Unparsed MIDI bytes, decoded when drained
    RawMidi(Vec<u8>),
    /// Keyboard key
    Key { code: u8, value: u8 },
    /// Switch the active module
    SetModule(String),
    /// Apply a preset to the active rack
    LoadPreset(String),
    /// Restore the active rack's saved settings
    LoadSettings,
}

impl SurfaceEvent {
    /// Decode raw MIDI bytes
    ///
    /// Only control changes are of interest; everything else (notes, clock,
    /// sysex) and malformed input yields `None`.
    pub fn from_midi(bytes: &[u8]) -> Option<Self> {
        match LiveEvent::parse(bytes) {
            Ok(LiveEvent::Midi {
                message: MidiMessage::Controller { controller, value },
                ..
            }) => Some(Self::MidiCc {
                cc: controller.as_int(),
                value: value.as_int(),
            }),
            Ok(other) => {
                log::trace!("MIDI: ignoring {:?}", other);
                None
            }
            Err(e) => {
                log::trace!("MIDI: unparseable message {:02X?}: {}", bytes, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_change_on_any_channel() {
        assert_eq!(
            SurfaceEvent::from_midi(&[0xB0, 21, 100]),
            Some(SurfaceEvent::MidiCc { cc: 21, value: 100 })
        );
        assert_eq!(
            SurfaceEvent::from_midi(&[0xBF, 7, 0]),
            Some(SurfaceEvent::MidiCc { cc: 7, value: 0 })
        );
    }

    #[test]
    fn test_other_messages_ignored() {
        // Note on
        assert_eq!(SurfaceEvent::from_midi(&[0x90, 60, 100]), None);
        // Timing clock
        assert_eq!(SurfaceEvent::from_midi(&[0xF8]), None);
    }

    #[test]
    fn test_malformed_input_ignored() {
        assert_eq!(SurfaceEvent::from_midi(&[]), None);
        // Data byte without a status byte
        assert_eq!(SurfaceEvent::from_midi(&[0x15, 0x40]), None);
    }
}
