//! Context-sensitive mapping from Beo4 buttons to player actions.
//!
//! The same arrow key means "move the focus" in a menu, "seek" while a video
//! plays full screen and "skip track" while music plays.  [`resolve`] makes
//! that decision from the focused window and a fresh [`PlayerSnapshot`].
//!
//! Rules are applied in a fixed order; the first match wins:
//!
//! 1. MENU and STOP never look at the context ([`context_free_action`]).
//! 2. Everything else is resolved against the window context and snapshot.
//!
//! This module only *decides*.  Executing a [`PlayerAction`] is up to the
//! caller, which keeps every rule testable without a player.

use std::time::Duration;

use thiserror::Error;

use super::player::{NamedAction, Navigation, PlayerId, PlayerKind, PlayerSnapshot, WindowContext};
use super::timecode::{seek_backward, seek_forward, TimeOffset};
use crate::keymap::Button;

/// Step used by UP/DOWN while a video plays full screen.
pub const LONG_SEEK: Duration = Duration::from_secs(10 * 60);

/// Step used by LEFT/RIGHT on a non-audio player.
pub const SHORT_SEEK: Duration = Duration::from_secs(10);

/// How long the subtitle notification stays on screen, in milliseconds.
pub const SUBTITLE_NOTICE_MS: u32 = 1500;

/// Title of the subtitle notification.
pub const SUBTITLE_NOTICE_TITLE: &str = "Subtitles";

/// Errors raised while resolving a button.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MappingError {
    /// The action needs a player but nothing is playing.
    #[error("{0:?} needs an active player")]
    NoActivePlayer(Button),
}

/// A single player operation chosen by the mapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerAction {
    PlayPause { player_id: PlayerId },
    Stop { player_id: PlayerId },
    Seek { player_id: PlayerId, to: TimeOffset },
    Navigate(Navigation),
    ShowOsd,
    Execute(NamedAction),
    /// Turn subtitles on or off and tell the user about it.
    SetSubtitles { player_id: PlayerId, enabled: bool },
    /// The button has no meaning in the current context.
    Nothing,
}

impl PlayerAction {
    /// User-visible notification text for [`PlayerAction::SetSubtitles`].
    pub fn subtitle_notice(enabled: bool) -> &'static str {
        if enabled {
            "Subtitles ENABLED"
        } else {
            "Subtitles DISABLED"
        }
    }
}

/// Actions that are valid without fetching the context or the player.
///
/// Returns `None` for buttons that need [`resolve`].
pub fn context_free_action(button: Button) -> Option<PlayerAction> {
    match button {
        Button::Menu => Some(PlayerAction::Navigate(Navigation::Home)),
        Button::Stop => Some(PlayerAction::Navigate(Navigation::Back)),
        _ => None,
    }
}

/// Resolves `button` against the focused window and the active player.
///
/// `snapshot` is `None` when no player is active.
///
/// # Errors
///
/// Returns [`MappingError::NoActivePlayer`] if the chosen action needs a
/// player id (play/pause, stop, seek, subtitles) and `snapshot` is `None`.
pub fn resolve(
    button: Button,
    context: &WindowContext,
    snapshot: Option<&PlayerSnapshot>,
) -> Result<PlayerAction, MappingError> {
    let player = || snapshot.ok_or(MappingError::NoActivePlayer(button));
    let playback = context.is_playback_surface();
    let fullscreen = context.is_fullscreen_video();

    let action = match button {
        Button::Menu => PlayerAction::Navigate(Navigation::Home),
        Button::Stop => PlayerAction::Navigate(Navigation::Back),
        Button::Mute | Button::Green => PlayerAction::PlayPause {
            player_id: player()?.player_id,
        },
        Button::Red => PlayerAction::Stop {
            player_id: player()?.player_id,
        },
        Button::Go if playback => PlayerAction::ShowOsd,
        Button::Go => PlayerAction::Navigate(Navigation::Select),

        Button::Up if fullscreen => {
            let p = player()?;
            seek_to(p, seek_forward(p.position, p.total, LONG_SEEK))
        }
        Button::Up => PlayerAction::Navigate(Navigation::Up),
        Button::Down if fullscreen => {
            let p = player()?;
            seek_to(p, seek_backward(p.position, LONG_SEEK))
        }
        Button::Down => PlayerAction::Navigate(Navigation::Down),

        Button::Left if playback => {
            let p = player()?;
            if p.kind == PlayerKind::Audio {
                PlayerAction::Execute(NamedAction::SkipPrevious)
            } else {
                seek_to(p, seek_backward(p.position, SHORT_SEEK))
            }
        }
        Button::Left => PlayerAction::Navigate(Navigation::Left),
        Button::Right if playback => {
            let p = player()?;
            if p.kind == PlayerKind::Audio {
                PlayerAction::Execute(NamedAction::SkipNext)
            } else {
                seek_to(p, seek_forward(p.position, p.total, SHORT_SEEK))
            }
        }
        Button::Right => PlayerAction::Navigate(Navigation::Right),

        Button::Text if fullscreen => {
            let p = player()?;
            PlayerAction::SetSubtitles {
                player_id: p.player_id,
                enabled: !p.subtitles_enabled,
            }
        }
        Button::Text => PlayerAction::Nothing,
    };
    Ok(action)
}

fn seek_to(player: &PlayerSnapshot, to: TimeOffset) -> PlayerAction {
    PlayerAction::Seek {
        player_id: player.player_id,
        to,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
