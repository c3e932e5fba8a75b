//! beo-remote: drive Kodi with a Bang & Olufsen Beo4 remote.
//!
//! An Arduino-based IR eye prints one hex code per button press on a USB
//! serial port.  This daemon reads those codes, tracks whether the remote
//! is currently addressing the media centre, and turns button presses into
//! Kodi JSON-RPC calls that depend on what Kodi is showing.
//!
//! # Usage
//!
//! ```text
//! beo-remote [OPTIONS]
//!
//! Options:
//!   --config <PATH>          Config file [default: platform config dir]
//!   --kodi-host <HOST>       Kodi host name or IP
//!   --kodi-port <PORT>       Kodi web server port
//!   --kodi-user <USER>       Kodi web server user
//!   --kodi-password <PASS>   Kodi web server password
//!   --ir-device <PATH>       IR eye serial device, or a capture file to replay
//!   --log-level <FILTER>     Log filter when RUST_LOG is unset
//!   --dry-run                Log player calls instead of sending them
//! ```
//!
//! # Environment variable overrides
//!
//! CLI args take precedence over environment variables, which take
//! precedence over the config file.
//!
//! | Variable            | Overrides             |
//! |---------------------|-----------------------|
//! | `BEO_KODI_HOST`     | `kodi.host`           |
//! | `BEO_KODI_PORT`     | `kodi.port`           |
//! | `BEO_KODI_USER`     | `kodi.username`       |
//! | `BEO_KODI_PASSWORD` | `kodi.password`       |
//! | `BEO_IR_DEVICE`     | `ir.device`           |
//!
//! # Architecture overview
//!
//! ```text
//! IR eye (serial, one hex code per line)
//!       ↓  ir-reader thread
//! CommandQueue (FIFO)
//!       ↓  dispatcher task
//! RemoteState + resolve()  (beo-core)
//!       ↓
//! KodiClient  (JSON-RPC over HTTP)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use beo_core::protocol::PONG;
use beo_remote::application::command_queue::command_queue;
use beo_remote::application::dispatch::Dispatcher;
use beo_remote::application::player_client::PlayerClient;
use beo_remote::infrastructure::ir_receiver::device::DeviceSignalSource;
use beo_remote::infrastructure::ir_receiver::SignalSource;
use beo_remote::infrastructure::kodi::mock::RecordingPlayer;
use beo_remote::infrastructure::kodi::KodiClient;
use beo_remote::infrastructure::storage::config::{load_config, AppConfig};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Beo4 remote to Kodi bridge.
///
/// Every option is optional; unset options fall back to the config file.
#[derive(Debug, Parser)]
#[command(
    name = "beo-remote",
    about = "Bridges a Beo4 IR remote to Kodi's JSON-RPC API",
    version
)]
struct Cli {
    /// Path of the TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Host name or IP address of the Kodi box.
    #[arg(long, env = "BEO_KODI_HOST")]
    kodi_host: Option<String>,

    /// Port of Kodi's web server.
    #[arg(long, env = "BEO_KODI_PORT")]
    kodi_port: Option<u16>,

    /// User for Kodi's web server (enables basic auth).
    #[arg(long, env = "BEO_KODI_USER")]
    kodi_user: Option<String>,

    #[arg(long, env = "BEO_KODI_PASSWORD", hide_env_values = true)]
    kodi_password: Option<String>,

    /// Serial device of the IR eye, or a recorded capture to replay.
    #[arg(long, env = "BEO_IR_DEVICE")]
    ir_device: Option<PathBuf>,

    /// `tracing` filter used when `RUST_LOG` is unset.
    #[arg(long)]
    log_level: Option<String>,

    /// Log player calls instead of sending them to Kodi.
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Writes every option that was given over the file values.
    fn apply(&self, config: &mut AppConfig) {
        if let Some(host) = &self.kodi_host {
            config.kodi.host = Some(host.clone());
        }
        if let Some(port) = self.kodi_port {
            config.kodi.port = port;
        }
        if let Some(user) = &self.kodi_user {
            config.kodi.username = Some(user.clone());
        }
        if let Some(password) = &self.kodi_password {
            config.kodi.password = Some(password.clone());
        }
        if let Some(device) = &self.ir_device {
            config.ir.device = device.clone();
        }
        if let Some(level) = &self.log_level {
            config.general.log_level = level.clone();
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// # What happens at startup
///
/// 1. CLI arguments are parsed and laid over the config file.
/// 2. `tracing_subscriber` is initialised; `RUST_LOG` wins over the
///    configured level.
/// 3. The player is pinged.  Anything but `"pong"` is fatal.
/// 4. The dispatcher task and the IR reader thread are started.
/// 5. The process runs until Ctrl+C, or until a replayed capture file ends
///    and the dispatcher has drained the queue.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref()).context("failed to load configuration")?;
    cli.apply(&mut config);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level)),
        )
        .init();

    let player: Arc<dyn PlayerClient> = if cli.dry_run {
        info!("dry run: player calls are logged, not sent");
        Arc::new(RecordingPlayer::new())
    } else {
        let settings = config.kodi_settings().context("invalid configuration")?;
        info!("using Kodi at {}", settings.url);
        Arc::new(KodiClient::new(settings).context("failed to build HTTP client")?)
    };

    let pong = player
        .ping()
        .await
        .context("Kodi did not answer JSONRPC.Ping")?;
    if pong != PONG {
        anyhow::bail!("unexpected reply to JSONRPC.Ping: {pong:?}");
    }
    info!("player is alive");

    let (tx, rx) = command_queue();
    let dispatcher = Dispatcher::new(Arc::clone(&player), config.dispatch_config());
    let mut dispatch_task = tokio::spawn(dispatcher.run(rx));

    let source = DeviceSignalSource::new(&config.ir.device, config.ir.idle_poll());
    source.start(tx).context("failed to start IR reader")?;

    tokio::select! {
        joined = &mut dispatch_task => {
            joined.context("dispatcher task failed")?;
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for Ctrl+C")?;
            info!("received Ctrl+C; shutting down");
            source.stop();
        }
    }

    info!("beo-remote stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_leave_everything_unset() {
        // Arrange: parse with no arguments
        let cli = Cli::parse_from(["beo-remote"]);

        // Assert
        assert_eq!(cli.config, None);
        assert_eq!(cli.kodi_port, None);
        assert_eq!(cli.log_level, None);
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_cli_without_flags_keeps_file_values() {
        // Arrange
        let cli = Cli::parse_from(["beo-remote"]);
        let mut config = AppConfig::default();
        config.kodi.port = 9000;
        let before = config.clone();

        // Act
        cli.apply(&mut config);

        // Assert
        assert_eq!(config.kodi.port, before.kodi.port);
        assert_eq!(config.ir.device, before.ir.device);
    }

    #[test]
    fn test_cli_kodi_overrides_win_over_file() {
        // Arrange
        let cli = Cli::parse_from([
            "beo-remote",
            "--kodi-host",
            "10.0.0.5",
            "--kodi-port",
            "8081",
            "--kodi-user",
            "kodi",
            "--kodi-password",
            "secret",
        ]);
        let mut config = AppConfig::default();
        config.kodi.host = Some("old-host".to_string());

        // Act
        cli.apply(&mut config);

        // Assert
        assert_eq!(config.kodi.host.as_deref(), Some("10.0.0.5"));
        assert_eq!(config.kodi.port, 8081);
        assert_eq!(config.kodi.username.as_deref(), Some("kodi"));
        assert_eq!(config.kodi.password.as_deref(), Some("secret"));
    }

    #[test]
    fn test_cli_ir_device_and_log_level_override() {
        let cli = Cli::parse_from([
            "beo-remote",
            "--ir-device",
            "/tmp/capture.txt",
            "--log-level",
            "debug",
        ]);
        let mut config = AppConfig::default();

        cli.apply(&mut config);

        assert_eq!(config.ir.device, PathBuf::from("/tmp/capture.txt"));
        assert_eq!(config.general.log_level, "debug");
    }

    #[test]
    fn test_cli_dry_run_flag() {
        let cli = Cli::parse_from(["beo-remote", "--dry-run"]);
        assert!(cli.dry_run);
    }

    #[test]
    fn test_cli_host_override_satisfies_validation() {
        let cli = Cli::parse_from(["beo-remote", "--kodi-host", "kodi.local"]);
        let mut config = AppConfig::default();
        assert!(config.validate().is_err());

        cli.apply(&mut config);

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_rejects_non_numeric_port() {
        let result = Cli::try_parse_from(["beo-remote", "--kodi-port", "eighty"]);
        assert!(result.is_err());
    }
}
