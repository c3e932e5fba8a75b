//! Integration tests for the dispatch pipeline.
//!
//! These tests exercise beo-remote end-to-end without hardware:
//! `MockSignalSource` → `CommandQueue` → `Dispatcher` → `RecordingPlayer`.

use std::sync::Arc;

use beo_core::keymap::beo4::{ACTIVATION_CODE, DEACTIVATION_CODES, POWER_CODE};
use beo_core::{Button, NamedAction, Navigation, SignalCode, TimeOffset};
use beo_remote::application::command_queue::command_queue;
use beo_remote::application::dispatch::{DispatchConfig, DispatchSummary, Dispatcher};
use beo_remote::application::player_client::{PlayerClient, PlayerError};
use beo_remote::infrastructure::ir_receiver::mock::MockSignalSource;
use beo_remote::infrastructure::ir_receiver::SignalSource;
use beo_remote::infrastructure::kodi::mock::{PlayerCall, RecordingPlayer};

/// Feeds raw `lines` through a mock IR source and runs the dispatcher until
/// the queue is drained.
async fn run_lines(player: &Arc<RecordingPlayer>, lines: &[&str]) -> DispatchSummary {
    let source = MockSignalSource::new();
    let (tx, rx) = command_queue();
    source.start(tx).expect("start should succeed");
    for line in lines {
        source.inject_line(line);
    }
    source.stop();

    let client: Arc<dyn PlayerClient> = Arc::clone(player) as Arc<dyn PlayerClient>;
    Dispatcher::new(client, DispatchConfig::default())
        .run(rx)
        .await
}

async fn run_session(player: &Arc<RecordingPlayer>, codes: &[SignalCode]) -> DispatchSummary {
    let lines: Vec<&str> = codes.iter().map(|c| c.as_str()).collect();
    run_lines(player, &lines).await
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_fullscreen_up_seeks_ten_minutes_forward() {
    // Arrange
    let player = Arc::new(RecordingPlayer::new());
    player.set_window("Fullscreen video");
    player.set_player(1, "video", TimeOffset::hms(0, 5, 0), TimeOffset::hms(0, 20, 0), false);

    // Act
    run_session(&player, &[ACTIVATION_CODE, Button::Up.code()]).await;

    // Assert
    assert_eq!(
        player.calls(),
        vec![
            PlayerCall::ShowOsd,
            PlayerCall::Seek(1, TimeOffset::hms(0, 15, 0))
        ]
    );
}

#[tokio::test]
async fn test_repeated_seeks_clamp_at_both_ends() {
    let player = Arc::new(RecordingPlayer::new());
    player.set_window("Fullscreen video");
    player.set_player(1, "video", TimeOffset::hms(0, 5, 0), TimeOffset::hms(0, 20, 0), false);

    let up = Button::Up.code();
    let down = Button::Down.code();
    run_session(&player, &[ACTIVATION_CODE, up, up, up, down, down, down, down]).await;

    let seeks: Vec<TimeOffset> = player
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            PlayerCall::Seek(_, to) => Some(to),
            _ => None,
        })
        .collect();
    assert_eq!(
        seeks,
        vec![
            TimeOffset::hms(0, 15, 0),
            TimeOffset::hms(0, 20, 0),
            TimeOffset::hms(0, 20, 0),
            TimeOffset::hms(0, 10, 0),
            TimeOffset::hms(0, 0, 0),
            TimeOffset::ZERO,
            TimeOffset::ZERO,
        ]
    );
}

#[tokio::test]
async fn test_home_up_navigates_instead_of_seeking() {
    let player = Arc::new(RecordingPlayer::new());
    player.set_window("Home");
    player.set_player(1, "video", TimeOffset::hms(0, 5, 0), TimeOffset::hms(0, 20, 0), false);

    run_session(&player, &[ACTIVATION_CODE, Button::Up.code()]).await;

    assert_eq!(
        player.calls(),
        vec![PlayerCall::ShowOsd, PlayerCall::Navigate(Navigation::Up)]
    );
}

#[tokio::test]
async fn test_audio_left_right_skip_tracks() {
    // Arrange
    let player = Arc::new(RecordingPlayer::new());
    player.set_window("Audio visualisation");
    player.set_player(0, "audio", TimeOffset::hms(0, 1, 0), TimeOffset::hms(0, 4, 0), false);

    // Act
    run_session(&player, &[ACTIVATION_CODE, Button::Right.code(), Button::Left.code()]).await;

    // Assert
    assert_eq!(
        player.calls(),
        vec![
            PlayerCall::ShowOsd,
            PlayerCall::ExecuteAction(NamedAction::SkipNext),
            PlayerCall::ExecuteAction(NamedAction::SkipPrevious),
        ]
    );
}

#[tokio::test]
async fn test_activation_shows_osd_exactly_once() {
    let player = Arc::new(RecordingPlayer::new());

    run_lines(&player, &["00008b\r\n"]).await;

    assert_eq!(player.calls(), vec![PlayerCall::ShowOsd]);
}

#[tokio::test]
async fn test_inactive_remote_ignores_everything_but_activation_and_power() {
    let player = Arc::new(RecordingPlayer::new());
    player.set_window("Fullscreen video");
    player.set_player(1, "video", TimeOffset::ZERO, TimeOffset::hms(1, 0, 0), false);

    let codes: Vec<SignalCode> = Button::ALL.iter().map(|b| b.code()).collect();
    let summary = run_session(&player, &codes).await;

    assert_eq!(summary.failed, 0);
    assert!(player.calls().is_empty());
    assert_eq!(player.queries(), 0);
}

#[tokio::test]
async fn test_deactivation_code_stops_forwarding() {
    for code in DEACTIVATION_CODES {
        let player = Arc::new(RecordingPlayer::new());

        run_session(&player, &[ACTIVATION_CODE, code, Button::Menu.code()]).await;

        assert_eq!(player.calls(), vec![PlayerCall::ShowOsd], "{code}");
    }
}

#[tokio::test]
async fn test_power_pauses_and_deactivates_from_any_mode() {
    // Arrange
    let player = Arc::new(RecordingPlayer::new());
    player.set_player(1, "video", TimeOffset::ZERO, TimeOffset::hms(1, 0, 0), false);

    // Act: power while inactive, then power while active, then a forwarded key.
    run_session(
        &player,
        &[
            POWER_CODE,
            ACTIVATION_CODE,
            POWER_CODE,
            Button::Menu.code(),
        ],
    )
    .await;

    // Assert
    assert_eq!(
        player.calls(),
        vec![
            PlayerCall::PlayPause(1),
            PlayerCall::ShowOsd,
            PlayerCall::PlayPause(1),
        ]
    );
}

#[tokio::test]
async fn test_text_outside_fullscreen_makes_no_player_action() {
    let player = Arc::new(RecordingPlayer::new());
    player.set_window("Videos");
    player.set_player(1, "video", TimeOffset::ZERO, TimeOffset::hms(1, 0, 0), false);

    run_session(&player, &[ACTIVATION_CODE, Button::Text.code()]).await;

    assert_eq!(player.calls(), vec![PlayerCall::ShowOsd]);
}

#[tokio::test]
async fn test_text_in_fullscreen_toggles_subtitles_with_notice() {
    let player = Arc::new(RecordingPlayer::new());
    player.set_window("Fullscreen video");
    player.set_player(1, "video", TimeOffset::ZERO, TimeOffset::hms(1, 0, 0), false);

    let text = Button::Text.code();
    run_session(&player, &[ACTIVATION_CODE, text, text]).await;

    assert_eq!(
        player.calls(),
        vec![
            PlayerCall::ShowOsd,
            PlayerCall::SetSubtitles(1, true),
            PlayerCall::ShowNotification {
                title: "Subtitles".to_string(),
                message: "Subtitles ENABLED".to_string(),
                display_ms: 1500,
            },
            PlayerCall::SetSubtitles(1, false),
            PlayerCall::ShowNotification {
                title: "Subtitles".to_string(),
                message: "Subtitles DISABLED".to_string(),
                display_ms: 1500,
            },
        ]
    );
}

#[tokio::test]
async fn test_failures_are_dropped_and_later_commands_still_run() {
    // Arrange: Kodi unreachable while the first Go is dispatched.
    let player = Arc::new(RecordingPlayer::new());
    let (tx, rx) = command_queue();
    let client: Arc<dyn PlayerClient> = Arc::clone(&player) as Arc<dyn PlayerClient>;
    let mut dispatcher = Dispatcher::new(client, DispatchConfig::default());

    // Act
    tokio_test::assert_ok!(dispatcher.handle_code(ACTIVATION_CODE).await);
    player.fail_with(Some(PlayerError::ConnectionLost("refused".to_string())));
    tokio_test::assert_err!(dispatcher.handle_code(Button::Go.code()).await);
    player.fail_with(None);
    tx.enqueue(Button::Go.code()).unwrap();
    drop(tx);
    let summary = dispatcher.run(rx).await;

    // Assert
    assert_eq!(summary.failed, 0);
    assert_eq!(
        player.calls(),
        vec![PlayerCall::ShowOsd, PlayerCall::Navigate(Navigation::Select)]
    );
}

#[tokio::test]
async fn test_stop_in_fullscreen_goes_back_without_stopping_playback() {
    let player = Arc::new(RecordingPlayer::new());
    player.set_window("Fullscreen video");
    player.set_player(1, "video", TimeOffset::ZERO, TimeOffset::hms(1, 0, 0), false);

    run_session(&player, &[ACTIVATION_CODE, Button::Stop.code(), Button::Red.code()]).await;

    assert_eq!(
        player.calls(),
        vec![
            PlayerCall::ShowOsd,
            PlayerCall::Navigate(Navigation::Back),
            PlayerCall::Stop(1),
        ]
    );
}
