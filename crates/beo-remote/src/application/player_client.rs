//! The player capability set the dispatcher drives.
//!
//! [`PlayerClient`] is the seam between the dispatch logic and the media
//! player.  The production implementation speaks Kodi JSON-RPC over HTTP
//! ([`crate::infrastructure::kodi::KodiClient`]); tests and `--dry-run` use
//! [`crate::infrastructure::kodi::mock::RecordingPlayer`].

use async_trait::async_trait;
use beo_core::protocol::{ActivePlayer, PlayerProperties};
use beo_core::{NamedAction, Navigation, PlayerId, TimeOffset, WindowContext};
use thiserror::Error;

/// Failure of a single player operation.
///
/// The variants separate what the dispatcher can shrug off from what an
/// operator needs to see.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PlayerError {
    /// Nothing is playing.  Expected whenever the user is in a menu.
    #[error("no active player")]
    NoActivePlayer,

    /// The player could not be reached (refused, timed out, reset).
    #[error("connection to player lost: {0}")]
    ConnectionLost(String),

    /// The player refused our credentials.
    #[error("player rejected credentials")]
    Unauthorized,

    /// The player answered, but not with what we asked for.
    #[error("malformed response from player: {0}")]
    MalformedResponse(String),

    /// The player understood the call and refused it.
    #[error("{method} failed with code {code}: {message}")]
    Rejected {
        method: String,
        code: i64,
        message: String,
    },
}

/// Operations the bridge needs from a media player.
#[async_trait]
pub trait PlayerClient: Send + Sync {
    /// Liveness check.  Kodi answers `"pong"`.
    async fn ping(&self) -> Result<String, PlayerError>;

    /// Lists the players that currently have media loaded.
    async fn active_players(&self) -> Result<Vec<ActivePlayer>, PlayerError>;

    /// Fetches elapsed time, total time and the subtitle flag of a player.
    async fn player_properties(&self, player_id: PlayerId) -> Result<PlayerProperties, PlayerError>;

    async fn play_pause(&self, player_id: PlayerId) -> Result<(), PlayerError>;

    async fn stop(&self, player_id: PlayerId) -> Result<(), PlayerError>;

    /// Seeks to an absolute position.
    async fn seek(&self, player_id: PlayerId, to: TimeOffset) -> Result<(), PlayerError>;

    async fn set_subtitles(&self, player_id: PlayerId, enabled: bool) -> Result<(), PlayerError>;

    /// Label of the focused window, e.g. `"Fullscreen video"`.
    async fn current_window(&self) -> Result<WindowContext, PlayerError>;

    async fn navigate(&self, nav: Navigation) -> Result<(), PlayerError>;

    /// Shows the on-screen playback controls.
    async fn show_osd(&self) -> Result<(), PlayerError>;

    async fn execute_action(&self, action: NamedAction) -> Result<(), PlayerError>;

    /// Pops up a transient notification for `display_ms` milliseconds.
    async fn show_notification(
        &self,
        title: &str,
        message: &str,
        display_ms: u32,
    ) -> Result<(), PlayerError>;
}
