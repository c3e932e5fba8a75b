//! Beo4 remote code tables.
//!
//! The Beo4 is a multi-source remote: most of its source keys (TV, RADIO,
//! CD, DVD, ...) switch B&O equipment into a mode.  Only one source key, the
//! "PC" key, is meant for us.  Pressing it engages the bridge; pressing any
//! other source key hands the remote back to the B&O gear.
//!
//! Codes are the six-digit values printed by the IR eye firmware.
//!
//! | Table                | Meaning                                         |
//! |----------------------|-------------------------------------------------|
//! | [`POWER_CODE`]       | Standby key: always toggles playback            |
//! | [`ACTIVATION_CODE`]  | PC source key: engages the bridge               |
//! | [`DEACTIVATION_CODES`] | Other source keys: disengage the bridge       |
//! | [`Button`]           | Keys the bridge maps to player commands        |

use super::SignalCode;

/// Standby key.  Toggles playback in any mode and disengages the bridge.
pub const POWER_CODE: SignalCode = SignalCode::from_static("00001C");

/// "PC" source key.  Engages the bridge.
pub const ACTIVATION_CODE: SignalCode = SignalCode::from_static("00008B");

/// Source keys that switch the Beo4 to other equipment.
///
/// While the bridge is engaged, any of these disengages it without
/// performing an action.
pub const DEACTIVATION_CODES: [SignalCode; 21] = [
    SignalCode::from_static("000080"),
    SignalCode::from_static("001B9B"),
    SignalCode::from_static("000181"),
    SignalCode::from_static("00008A"),
    SignalCode::from_static("000086"),
    SignalCode::from_static("000192"),
    SignalCode::from_static("000585"),
    SignalCode::from_static("000537"),
    SignalCode::from_static("000191"),
    SignalCode::from_static("000158"),
    SignalCode::from_static("0001F7"),
    SignalCode::from_static("0001C1"),
    SignalCode::from_static("000144"),
    SignalCode::from_static("000135"),
    SignalCode::from_static("00018B"),
    SignalCode::from_static("000087"),
    SignalCode::from_static("00008D"),
    SignalCode::from_static("000058"),
    SignalCode::from_static("000183"),
    SignalCode::from_static("0001BF"),
    SignalCode::from_static("000044"),
];

/// A Beo4 key the bridge translates into a player command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// MENU key.
    Menu,
    /// STOP key.
    Stop,
    /// Volume up + down pressed together (mute).
    Mute,
    /// Green colour key.
    Green,
    /// Red colour key.
    Red,
    /// GO key.
    Go,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// TEXT key.
    Text,
}

impl Button {
    /// Every mapped button, in table order.
    pub const ALL: [Button; 11] = [
        Button::Mute,
        Button::Menu,
        Button::Stop,
        Button::Green,
        Button::Red,
        Button::Go,
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
        Button::Text,
    ];

    /// Looks up the button for a code.
    ///
    /// Returns `None` if the code is not in the mapped set.
    pub fn from_code(code: SignalCode) -> Option<Button> {
        Button::ALL.into_iter().find(|b| b.code() == code)
    }

    /// Returns the IR code the Beo4 sends for this button.
    pub const fn code(self) -> SignalCode {
        match self {
            Button::Mute => SignalCode::from_static("00000D"),
            Button::Menu => SignalCode::from_static("00005C"),
            Button::Stop => SignalCode::from_static("000036"),
            Button::Green => SignalCode::from_static("0000D5"),
            Button::Red => SignalCode::from_static("0000D9"),
            Button::Go => SignalCode::from_static("000035"),
            Button::Up => SignalCode::from_static("00001E"),
            Button::Down => SignalCode::from_static("00001F"),
            Button::Left => SignalCode::from_static("000032"),
            Button::Right => SignalCode::from_static("000034"),
            Button::Text => SignalCode::from_static("000088"),
        }
    }
}

/// Returns `true` if `code` is one of the [`DEACTIVATION_CODES`].
pub fn is_deactivation_code(code: SignalCode) -> bool {
    DEACTIVATION_CODES.contains(&code)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_button_round_trips_through_its_code() {
        for button in Button::ALL {
            assert_eq!(Button::from_code(button.code()), Some(button));
        }
    }

    #[test]
    fn test_mapped_and_deactivation_sets_are_disjoint() {
        for button in Button::ALL {
            assert!(
                !is_deactivation_code(button.code()),
                "{button:?} must not disengage the bridge"
            );
        }
    }

    #[test]
    fn test_special_codes_are_in_neither_set() {
        for code in [POWER_CODE, ACTIVATION_CODE] {
            assert_eq!(Button::from_code(code), None);
            assert!(!is_deactivation_code(code));
        }
    }

    #[test]
    fn test_unknown_code_has_no_button() {
        assert_eq!(Button::from_code(SignalCode::from_static("ABCDEF")), None);
    }
}
