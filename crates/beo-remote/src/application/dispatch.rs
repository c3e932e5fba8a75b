//! Dispatcher: turns queued remote codes into player calls.
//!
//! This use case is the heart of the bridge.  For every code it:
//!
//! 1. feeds the code to the [`RemoteState`] machine (which may flip the mode),
//! 2. for a forwarded button, fetches the focused window and a fresh
//!    [`PlayerSnapshot`] and lets [`resolve`] pick an action,
//! 3. executes that action through the injected [`PlayerClient`].
//!
//! # Concurrency
//!
//! Exactly one dispatcher exists and it owns the [`RemoteState`].  Commands
//! are handled one at a time in queue order, so mode transitions never race.
//!
//! # Failure handling
//!
//! [`Dispatcher::run`] is the error boundary: a failing command is logged
//! and dropped, the loop carries on, and the mode stays whatever the state
//! machine made it before the failure.

use std::sync::Arc;

use beo_core::domain::mapping::{SUBTITLE_NOTICE_MS, SUBTITLE_NOTICE_TITLE};
use beo_core::protocol::ActivePlayer;
use beo_core::{
    context_free_action, resolve, Button, Gate, MappingError, PlayerAction, PlayerKind,
    PlayerSnapshot, RemoteState, SignalCode,
};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::command_queue::CommandReceiver;
use super::player_client::{PlayerClient, PlayerError};

/// Backlog length at which the dispatcher starts warning.
pub const DEFAULT_BACKLOG_WARN_THRESHOLD: usize = 32;

/// Error type for a single dispatched command.
#[derive(Debug, Error, PartialEq)]
pub enum DispatchError {
    #[error(transparent)]
    Player(#[from] PlayerError),
    #[error(transparent)]
    Mapping(#[from] MappingError),
}

impl DispatchError {
    /// `true` for failures that are part of normal operation (nothing playing).
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            DispatchError::Player(PlayerError::NoActivePlayer)
                | DispatchError::Mapping(MappingError::NoActivePlayer(_))
        )
    }
}

/// Tunables for the dispatch loop.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Warn once the queue holds this many pending commands.  `0` disables the warning.
    pub backlog_warn_threshold: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            backlog_warn_threshold: DEFAULT_BACKLOG_WARN_THRESHOLD,
        }
    }
}

/// Counters reported when the dispatch loop ends.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSummary {
    pub dispatched: u64,
    pub failed: u64,
    /// Times the backlog crossed the warning threshold.
    pub backlog_warnings: u64,
}

/// Edge-triggered backlog check.
///
/// Fires once when the backlog reaches the threshold and stays quiet until
/// it has dropped below the threshold again.
#[derive(Debug, Clone, Copy)]
pub struct BacklogMonitor {
    threshold: usize,
    warned: bool,
}

impl BacklogMonitor {
    /// A `threshold` of `0` never fires.
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold,
            warned: false,
        }
    }

    /// Records the current backlog; `true` if a warning is due now.
    pub fn observe(&mut self, backlog: usize) -> bool {
        if self.threshold == 0 || backlog < self.threshold {
            self.warned = false;
            return false;
        }
        !std::mem::replace(&mut self.warned, true)
    }
}

/// The dispatch use case.
pub struct Dispatcher {
    state: RemoteState,
    player: Arc<dyn PlayerClient>,
    config: DispatchConfig,
}

impl Dispatcher {
    /// Creates a dispatcher with the remote in the inactive mode.
    pub fn new(player: Arc<dyn PlayerClient>, config: DispatchConfig) -> Self {
        Self {
            state: RemoteState::new(),
            player,
            config,
        }
    }

    /// Read-only view of the remote mode.
    pub fn state(&self) -> &RemoteState {
        &self.state
    }

    /// Drains `queue` until every sender is gone.
    ///
    /// Never returns early because of a failed command.
    pub async fn run(mut self, mut queue: CommandReceiver) -> DispatchSummary {
        info!("dispatcher started");
        let mut summary = DispatchSummary::default();
        let mut backlog = BacklogMonitor::new(self.config.backlog_warn_threshold);

        while let Some(cmd) = queue.dequeue().await {
            let waiting = queue.len();
            if backlog.observe(waiting) {
                summary.backlog_warnings += 1;
                warn!("{waiting} commands waiting; the player is slower than the remote");
            }

            debug!(
                "dispatching {} (queued for {:?})",
                cmd.code,
                cmd.received_at.elapsed()
            );
            summary.dispatched += 1;

            match self.handle_code(cmd.code).await {
                Ok(Some(action)) => debug!("{} -> {action:?}", cmd.code),
                Ok(None) => {}
                Err(e) => {
                    summary.failed += 1;
                    log_failure(cmd.code, &e);
                }
            }
        }

        info!(
            "command queue closed; dispatcher stopping ({} dispatched, {} failed)",
            summary.dispatched, summary.failed
        );
        summary
    }

    /// Runs one code through the state machine and the mapper.
    ///
    /// Returns the action that was executed, or `None` if the code had no
    /// player-side effect.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] if fetching context or executing the action
    /// fails.  The mode transition has already been applied by then.
    pub async fn handle_code(
        &mut self,
        code: SignalCode,
    ) -> Result<Option<PlayerAction>, DispatchError> {
        match self.state.accept(code) {
            Gate::PowerToggle => {
                let player = self
                    .active_player()
                    .await?
                    .ok_or(PlayerError::NoActivePlayer)?;
                let action = PlayerAction::PlayPause {
                    player_id: player.player_id,
                };
                self.execute(&action).await?;
                Ok(Some(action))
            }
            Gate::Activated => {
                info!("remote activated");
                self.execute(&PlayerAction::ShowOsd).await?;
                Ok(Some(PlayerAction::ShowOsd))
            }
            Gate::Deactivated => {
                info!("remote deactivated by {code}");
                Ok(None)
            }
            Gate::Ignored => Ok(None),
            Gate::Unmapped(code) => {
                debug!("unmapped code {code}");
                Ok(None)
            }
            Gate::Forward(button) => self.forward(button).await.map(Some),
        }
    }

    async fn forward(&self, button: Button) -> Result<PlayerAction, DispatchError> {
        if let Some(action) = context_free_action(button) {
            self.execute(&action).await?;
            return Ok(action);
        }

        let context = self.player.current_window().await?;
        let snapshot = self.snapshot().await?;
        debug!("context {context:?}, player {snapshot:?}");

        let action = resolve(button, &context, snapshot.as_ref())?;
        self.execute(&action).await?;
        Ok(action)
    }

    /// The most recently activated player, if any.
    async fn active_player(&self) -> Result<Option<ActivePlayer>, PlayerError> {
        match self.player.active_players().await {
            Ok(mut players) => Ok(players.pop()),
            Err(PlayerError::NoActivePlayer) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn snapshot(&self) -> Result<Option<PlayerSnapshot>, PlayerError> {
        let Some(active) = self.active_player().await? else {
            return Ok(None);
        };
        let props = self.player.player_properties(active.player_id).await?;
        Ok(Some(PlayerSnapshot {
            player_id: active.player_id,
            kind: PlayerKind::from_kodi(&active.kind),
            position: props.time,
            total: props.total_time,
            subtitles_enabled: props.subtitle_enabled,
        }))
    }

    async fn execute(&self, action: &PlayerAction) -> Result<(), PlayerError> {
        match *action {
            PlayerAction::PlayPause { player_id } => self.player.play_pause(player_id).await,
            PlayerAction::Stop { player_id } => self.player.stop(player_id).await,
            PlayerAction::Seek { player_id, to } => self.player.seek(player_id, to).await,
            PlayerAction::Navigate(nav) => self.player.navigate(nav).await,
            PlayerAction::ShowOsd => self.player.show_osd().await,
            PlayerAction::Execute(named) => self.player.execute_action(named).await,
            PlayerAction::SetSubtitles { player_id, enabled } => {
                self.player.set_subtitles(player_id, enabled).await?;
                self.player
                    .show_notification(
                        SUBTITLE_NOTICE_TITLE,
                        PlayerAction::subtitle_notice(enabled),
                        SUBTITLE_NOTICE_MS,
                    )
                    .await
            }
            PlayerAction::Nothing => Ok(()),
        }
    }
}

/// Logs a failed command at a level matching how worrying it is.
fn log_failure(code: SignalCode, err: &DispatchError) {
    match err {
        e if e.is_expected() => debug!("{code} dropped: {e}"),
        DispatchError::Player(PlayerError::ConnectionLost(_))
        | DispatchError::Player(PlayerError::Unauthorized) => {
            error!("{code} dropped: {err}")
        }
        _ => warn!("{code} dropped: {err}"),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
