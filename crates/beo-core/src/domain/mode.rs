//! Remote activation state machine.
//!
//! The Beo4 talks to many devices at once, so the bridge must ignore every
//! press until the user selects it with the activation ("PC") key, and must
//! stop listening as soon as another source key is pressed.
//!
//! ```text
//!                  activation code
//!   ┌──────────┐ ─────────────────────▶ ┌──────────────────┐
//!   │ Inactive │                        │ ActivatedBy(code)│──┐ mapped code:
//!   └──────────┘ ◀───────────────────── └──────────────────┘ ◀┘ forward
//!        ▲          deactivation code           │
//!        └──────────── power code (any state) ──┘
//! ```
//!
//! [`RemoteState::accept`] is the only way to change the mode.  It is pure:
//! the returned [`Gate`] tells the caller which side effect (if any) to run.

use tracing::{debug, trace};

use crate::keymap::beo4::{is_deactivation_code, Button, ACTIVATION_CODE, POWER_CODE};
use crate::keymap::SignalCode;

/// Whether the bridge is currently listening to the remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemoteMode {
    /// Not listening; only the power and activation codes have an effect.
    #[default]
    Inactive,
    /// Listening, engaged by the given activation code.
    ActivatedBy(SignalCode),
}

/// Result of feeding one code through the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Power key: toggle playback regardless of mode.  The mode is now inactive.
    PowerToggle,
    /// The bridge was just engaged.  Show the on-screen display.
    Activated,
    /// The bridge was disengaged by another source key.  No action.
    Deactivated,
    /// Code received while inactive.  Silently discarded.
    Ignored,
    /// A mapped button while active.  Resolve it against the player context.
    Forward(Button),
    /// A code that is neither mapped nor a source key while active.
    Unmapped(SignalCode),
}

/// The bridge's only piece of mutable dispatch state.
///
/// Owned by the dispatcher; nothing else may hold a mutable reference.
#[derive(Debug, Default)]
pub struct RemoteState {
    mode: RemoteMode,
}

impl RemoteState {
    /// Creates a state in [`RemoteMode::Inactive`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> RemoteMode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        matches!(self.mode, RemoteMode::ActivatedBy(_))
    }

    /// Applies the transition for `code` and reports what to do next.
    ///
    /// The power code is checked first and wins over every other rule.
    pub fn accept(&mut self, code: SignalCode) -> Gate {
        if code == POWER_CODE {
            self.mode = RemoteMode::Inactive;
            return Gate::PowerToggle;
        }

        match self.mode {
            RemoteMode::Inactive => {
                if code == ACTIVATION_CODE {
                    self.mode = RemoteMode::ActivatedBy(code);
                    debug!("remote activated by {code}");
                    Gate::Activated
                } else {
                    trace!("remote inactive; discarding {code}");
                    Gate::Ignored
                }
            }
            RemoteMode::ActivatedBy(_) => {
                if is_deactivation_code(code) {
                    self.mode = RemoteMode::Inactive;
                    debug!("remote deactivated by source key {code}");
                    Gate::Deactivated
                } else if let Some(button) = Button::from_code(code) {
                    Gate::Forward(button)
                } else {
                    Gate::Unmapped(code)
                }
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::beo4::DEACTIVATION_CODES;

    fn active_state() -> RemoteState {
        let mut state = RemoteState::new();
        assert_eq!(state.accept(ACTIVATION_CODE), Gate::Activated);
        state
    }

    #[test]
    fn test_initial_state_is_inactive() {
        assert_eq!(RemoteState::new().mode(), RemoteMode::Inactive);
    }

    #[test]
    fn test_activation_code_engages_remote() {
        let mut state = RemoteState::new();
        assert_eq!(state.accept(ACTIVATION_CODE), Gate::Activated);
        assert_eq!(state.mode(), RemoteMode::ActivatedBy(ACTIVATION_CODE));
    }

    #[test]
    fn test_mapped_code_is_ignored_while_inactive() {
        let mut state = RemoteState::new();
        assert_eq!(state.accept(Button::Up.code()), Gate::Ignored);
        assert!(!state.is_active());
    }

    #[test]
    fn test_power_code_while_inactive_toggles_playback() {
        let mut state = RemoteState::new();
        assert_eq!(state.accept(POWER_CODE), Gate::PowerToggle);
        assert!(!state.is_active());
    }

    #[test]
    fn test_power_code_while_active_deactivates() {
        let mut state = active_state();
        assert_eq!(state.accept(POWER_CODE), Gate::PowerToggle);
        assert_eq!(state.mode(), RemoteMode::Inactive);
    }

    #[test]
    fn test_every_deactivation_code_disengages() {
        for code in DEACTIVATION_CODES {
            let mut state = active_state();
            assert_eq!(state.accept(code), Gate::Deactivated, "{code}");
            assert!(!state.is_active());
        }
    }

    #[test]
    fn test_mapped_code_is_forwarded_without_transition() {
        let mut state = active_state();
        assert_eq!(state.accept(Button::Left.code()), Gate::Forward(Button::Left));
        assert!(state.is_active());
    }

    #[test]
    fn test_unknown_code_while_active_is_unmapped() {
        let mut state = active_state();
        let code = SignalCode::from_static("000123");
        assert_eq!(state.accept(code), Gate::Unmapped(code));
        assert!(state.is_active());
    }

    #[test]
    fn test_activation_code_while_active_is_unmapped() {
        let mut state = active_state();
        assert_eq!(state.accept(ACTIVATION_CODE), Gate::Unmapped(ACTIVATION_CODE));
        assert!(state.is_active());
    }
}
