//! Messages from the surface to the host patch

use std::fmt;

/// Side effect the host patch should carry out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostMessage {
    /// Leave the rack and return to the host's home screen
    GoHome,
    /// Open or close the host's MIDI output gate
    MidiOutGate(bool),
    /// Let the host route encoder input to this surface's menus
    EnableSubMenu(bool),
}

impl HostMessage {
    /// Message name as the host patch receives it
    pub fn name(&self) -> &'static str {
        match self {
            Self::GoHome => "goHome",
            Self::MidiOutGate(_) => "midiOutGate",
            Self::EnableSubMenu(_) => "enableSubMenu",
        }
    }

    /// Numeric argument
    pub fn value(&self) -> i32 {
        match self {
            Self::GoHome => 1,
            Self::MidiOutGate(on) | Self::EnableSubMenu(on) => i32::from(*on),
        }
    }
}

impl fmt::Display for HostMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name(), self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_form() {
        assert_eq!(HostMessage::GoHome.to_string(), "goHome 1");
        assert_eq!(HostMessage::MidiOutGate(false).to_string(), "midiOutGate 0");
        assert_eq!(HostMessage::EnableSubMenu(true).to_string(), "enableSubMenu 1");
    }
}
