//! TOML configuration for the bridge.
//!
//! Read from `--config <path>` or from the platform-appropriate file:
//! - Linux:    `$XDG_CONFIG_HOME/beo-remote/config.toml` (`~/.config/...`)
//! - macOS:    `~/Library/Application Support/BeoRemote/config.toml`
//! - Windows:  `%APPDATA%\BeoRemote\config.toml`
//!
//! ```toml
//! [general]
//! log_level = "info"
//!
//! [kodi]
//! host = "192.168.1.20"
//! port = 8080
//! username = "kodi"
//! password = "secret"
//! request_timeout_ms = 3000
//!
//! [ir]
//! device = "/dev/ttyACM0"
//! idle_poll_ms = 50
//!
//! [dispatch]
//! backlog_warn_threshold = 32
//! ```
//!
//! Every field except `kodi.host` has a default, so a missing section or a
//! missing file is fine.  There is no sensible default for the media centre's
//! address; [`AppConfig::validate`] rejects a config without one.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::dispatch::{DispatchConfig, DEFAULT_BACKLOG_WARN_THRESHOLD};
use crate::infrastructure::kodi::KodiSettings;

/// Error type for configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// A required setting is absent.
    #[error("missing required setting `{0}`")]
    Missing(&'static str),

    /// A setting is present but unusable.
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub kodi: KodiConfig,
    #[serde(default)]
    pub ir: IrConfig,
    #[serde(default)]
    pub dispatch: DispatchSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// `tracing` filter used when `RUST_LOG` is unset, e.g. `"info"` or `"beo_remote=debug"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Where and how to reach Kodi's JSON-RPC endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KodiConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default = "default_kodi_port")]
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

/// The IR receiver's serial device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IrConfig {
    /// Character device (or a recorded capture file to replay).
    #[serde(default = "default_ir_device")]
    pub device: PathBuf,
    /// Sleep after an empty read before trying again.
    #[serde(default = "default_idle_poll_ms")]
    pub idle_poll_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DispatchSection {
    #[serde(default = "default_backlog_warn_threshold")]
    pub backlog_warn_threshold: usize,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_kodi_port() -> u16 {
    8080
}
fn default_request_timeout_ms() -> u64 {
    3000
}
fn default_ir_device() -> PathBuf {
    PathBuf::from("/dev/ttyACM0")
}
fn default_idle_poll_ms() -> u64 {
    50
}
fn default_backlog_warn_threshold() -> usize {
    DEFAULT_BACKLOG_WARN_THRESHOLD
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for KodiConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: default_kodi_port(),
            username: None,
            password: None,
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl Default for IrConfig {
    fn default() -> Self {
        Self {
            device: default_ir_device(),
            idle_poll_ms: default_idle_poll_ms(),
        }
    }
}

impl Default for DispatchSection {
    fn default() -> Self {
        Self {
            backlog_warn_threshold: default_backlog_warn_threshold(),
        }
    }
}

// ── Derived settings ──────────────────────────────────────────────────────────

impl AppConfig {
    /// Checks the settings that have no usable default.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Missing`] without a Kodi host, [`ConfigError::Invalid`]
    /// for a zero port or timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.kodi.host.as_deref().map(str::trim) {
            None | Some("") => return Err(ConfigError::Missing("kodi.host")),
            Some(_) => {}
        }
        if self.kodi.port == 0 {
            return Err(ConfigError::Invalid {
                field: "kodi.port",
                reason: "port 0 is not reachable".to_string(),
            });
        }
        if self.kodi.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "kodi.request_timeout_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Connection settings for [`crate::infrastructure::kodi::KodiClient`].
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::validate`].
    pub fn kodi_settings(&self) -> Result<KodiSettings, ConfigError> {
        self.validate()?;
        let host = self
            .kodi
            .host
            .as_deref()
            .ok_or(ConfigError::Missing("kodi.host"))?
            .trim();
        Ok(KodiSettings {
            url: format!("http://{host}:{}/jsonrpc", self.kodi.port),
            username: self.kodi.username.clone(),
            password: self.kodi.password.clone(),
            timeout: Duration::from_millis(self.kodi.request_timeout_ms),
        })
    }

    pub fn dispatch_config(&self) -> DispatchConfig {
        DispatchConfig {
            backlog_warn_threshold: self.dispatch.backlog_warn_threshold,
        }
    }
}

impl IrConfig {
    pub fn idle_poll(&self) -> Duration {
        Duration::from_millis(self.idle_poll_ms)
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Resolves the default config file path for this platform.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the base directory
/// cannot be determined from the environment.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    platform_config_dir()
        .map(|dir| dir.join("config.toml"))
        .ok_or(ConfigError::NoPlatformConfigDir)
}

/// Parses a configuration from TOML text.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if the TOML is malformed.
pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Loads the configuration.
///
/// An explicit `path` must exist.  Without one the platform default is
/// used, and a missing default file yields [`AppConfig::default()`].
/// The result is not validated; command-line overrides are applied first.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors and
/// [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let (path, must_exist) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (config_file_path()?, false),
    };

    match std::fs::read_to_string(&path) {
        Ok(content) => parse_config(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && !must_exist => {
            Ok(AppConfig::default())
        }
        Err(source) => Err(ConfigError::Io { path, source }),
    }
}

fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("BeoRemote"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("beo-remote"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("BeoRemote")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
