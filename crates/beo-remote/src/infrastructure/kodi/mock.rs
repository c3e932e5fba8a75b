//! In-memory player that records what it is asked to do.
//!
//! Used by the dispatcher tests and by `--dry-run`, where it stands in for
//! Kodi and logs every action instead of sending it.  Queries are answered
//! from a small scripted state (focused window, one optional player).

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use beo_core::protocol::{ActivePlayer, PlayerProperties, PONG};
use beo_core::{NamedAction, Navigation, PlayerId, TimeOffset, WindowContext};
use tracing::info;

use crate::application::player_client::{PlayerClient, PlayerError};

/// One side-effecting call received by [`RecordingPlayer`].
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCall {
    PlayPause(PlayerId),
    Stop(PlayerId),
    Seek(PlayerId, TimeOffset),
    SetSubtitles(PlayerId, bool),
    Navigate(Navigation),
    ShowOsd,
    ExecuteAction(NamedAction),
    ShowNotification {
        title: String,
        message: String,
        display_ms: u32,
    },
}

#[derive(Debug)]
struct LoadedPlayer {
    active: ActivePlayer,
    properties: PlayerProperties,
}

#[derive(Debug)]
struct State {
    window: WindowContext,
    player: Option<LoadedPlayer>,
    failure: Option<PlayerError>,
    calls: Vec<PlayerCall>,
    queries: usize,
}

/// A [`PlayerClient`] that records actions and answers queries from script.
#[derive(Debug)]
pub struct RecordingPlayer {
    state: Mutex<State>,
}

impl RecordingPlayer {
    /// Starts on the home screen with nothing playing.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                window: WindowContext::new("Home"),
                player: None,
                failure: None,
                calls: Vec::new(),
                queries: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sets the label reported as the focused window.
    pub fn set_window(&self, label: &str) {
        self.lock().window = WindowContext::new(label);
    }

    /// Loads a player of `kind` (`"audio"`, `"video"`, ...) at `position` of `total`.
    pub fn set_player(
        &self,
        player_id: PlayerId,
        kind: &str,
        position: TimeOffset,
        total: TimeOffset,
        subtitles_enabled: bool,
    ) {
        self.lock().player = Some(LoadedPlayer {
            active: ActivePlayer {
                player_id,
                kind: kind.to_string(),
            },
            properties: PlayerProperties {
                time: position,
                total_time: total,
                subtitle_enabled: subtitles_enabled,
            },
        });
    }

    /// Unloads the player; `active_players` then returns an empty list.
    pub fn clear_player(&self) {
        self.lock().player = None;
    }

    /// Makes every subsequent call fail with `err`, or succeed again with `None`.
    pub fn fail_with(&self, err: Option<PlayerError>) {
        self.lock().failure = err;
    }

    /// Side-effecting calls received so far, oldest first.
    pub fn calls(&self) -> Vec<PlayerCall> {
        self.lock().calls.clone()
    }

    /// Number of query calls (`active_players`, `player_properties`, `current_window`).
    pub fn queries(&self) -> usize {
        self.lock().queries
    }

    fn query(&self) -> Result<MutexGuard<'_, State>, PlayerError> {
        let mut state = self.lock();
        if let Some(err) = &state.failure {
            return Err(err.clone());
        }
        state.queries += 1;
        Ok(state)
    }

    fn record(&self, call: PlayerCall) -> Result<(), PlayerError> {
        let mut state = self.lock();
        if let Some(err) = &state.failure {
            return Err(err.clone());
        }
        info!("dry run: {call:?}");

        if let Some(player) = state.player.as_mut() {
            match &call {
                PlayerCall::Seek(id, to) if *id == player.active.player_id => {
                    player.properties.time = *to;
                }
                PlayerCall::SetSubtitles(id, enabled) if *id == player.active.player_id => {
                    player.properties.subtitle_enabled = *enabled;
                }
                _ => {}
            }
        }
        state.calls.push(call);
        Ok(())
    }
}

impl Default for RecordingPlayer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlayerClient for RecordingPlayer {
    async fn ping(&self) -> Result<String, PlayerError> {
        self.query().map(|_| PONG.to_string())
    }

    async fn active_players(&self) -> Result<Vec<ActivePlayer>, PlayerError> {
        let state = self.query()?;
        Ok(state.player.iter().map(|p| p.active.clone()).collect())
    }

    async fn player_properties(&self, player_id: PlayerId) -> Result<PlayerProperties, PlayerError> {
        let state = self.query()?;
        match &state.player {
            Some(p) if p.active.player_id == player_id => Ok(p.properties.clone()),
            _ => Err(PlayerError::Rejected {
                method: "Player.GetProperties".to_string(),
                code: -32100,
                message: "Failed to execute method.".to_string(),
            }),
        }
    }

    async fn play_pause(&self, player_id: PlayerId) -> Result<(), PlayerError> {
        self.record(PlayerCall::PlayPause(player_id))
    }

    async fn stop(&self, player_id: PlayerId) -> Result<(), PlayerError> {
        self.record(PlayerCall::Stop(player_id))
    }

    async fn seek(&self, player_id: PlayerId, to: TimeOffset) -> Result<(), PlayerError> {
        self.record(PlayerCall::Seek(player_id, to))
    }

    async fn set_subtitles(&self, player_id: PlayerId, enabled: bool) -> Result<(), PlayerError> {
        self.record(PlayerCall::SetSubtitles(player_id, enabled))
    }

    async fn current_window(&self) -> Result<WindowContext, PlayerError> {
        self.query().map(|state| state.window.clone())
    }

    async fn navigate(&self, nav: Navigation) -> Result<(), PlayerError> {
        self.record(PlayerCall::Navigate(nav))
    }

    async fn show_osd(&self) -> Result<(), PlayerError> {
        self.record(PlayerCall::ShowOsd)
    }

    async fn execute_action(&self, action: NamedAction) -> Result<(), PlayerError> {
        self.record(PlayerCall::ExecuteAction(action))
    }

    async fn show_notification(
        &self,
        title: &str,
        message: &str,
        display_ms: u32,
    ) -> Result<(), PlayerError> {
        self.record(PlayerCall::ShowNotification {
            title: title.to_string(),
            message: message.to_string(),
            display_ms,
        })
    }
}
