//! Kodi JSON-RPC adapter.
//!
//! [`KodiClient`] implements [`PlayerClient`] by POSTing JSON-RPC 2.0
//! requests to `http://{host}:{port}/jsonrpc`.  Each call is one HTTP
//! request; there is no persistent session to lose, so a Kodi restart costs
//! at most the commands sent while it was down.
//!
//! # Error mapping
//!
//! | Failure                                   | [`PlayerError`]        |
//! |-------------------------------------------|------------------------|
//! | connect refused, timeout, reset           | `ConnectionLost`       |
//! | HTTP 401                                  | `Unauthorized`         |
//! | other non-2xx, bad JSON, wrong shape      | `MalformedResponse`    |
//! | JSON-RPC `error` object                   | `Rejected`             |

pub mod mock;

use std::time::Duration;

use async_trait::async_trait;
use beo_core::protocol::{
    decode_result, encode_request, ActivePlayer, GuiProperties, PlayerProperties, ProtocolError,
    RequestIdCounter, SNAPSHOT_PROPERTIES,
};
use beo_core::{NamedAction, Navigation, PlayerId, TimeOffset, WindowContext};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::trace;

use crate::application::player_client::{PlayerClient, PlayerError};

/// Everything needed to reach one Kodi instance.
#[derive(Debug, Clone, PartialEq)]
pub struct KodiSettings {
    /// Full endpoint URL, e.g. `http://192.168.1.20:8080/jsonrpc`.
    pub url: String,
    /// Enables HTTP basic auth when set.
    pub username: Option<String>,
    pub password: Option<String>,
    /// Upper bound on a whole request, connect included.
    pub timeout: Duration,
}

/// Production [`PlayerClient`] speaking Kodi JSON-RPC over HTTP.
pub struct KodiClient {
    http: reqwest::Client,
    settings: KodiSettings,
    ids: RequestIdCounter,
}

impl KodiClient {
    /// Builds the client.  Does not contact Kodi; call [`PlayerClient::ping`] for that.
    ///
    /// # Errors
    ///
    /// Fails only if the HTTP client cannot be constructed (e.g. no TLS backend).
    pub fn new(settings: KodiSettings) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(settings.timeout).build()?;
        Ok(Self {
            http,
            settings,
            ids: RequestIdCounter::new(),
        })
    }

    pub fn url(&self) -> &str {
        &self.settings.url
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, PlayerError> {
        let id = self.ids.next();
        let body = encode_request(method, params, id).map_err(|e| protocol_error(method, e))?;
        trace!("-> {method} #{id}");

        let mut request = self
            .http
            .post(&self.settings.url)
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        if let Some(user) = &self.settings.username {
            request = request.basic_auth(user, self.settings.password.as_ref());
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(PlayerError::Unauthorized);
        }
        if !status.is_success() {
            return Err(PlayerError::MalformedResponse(format!("{method}: HTTP {status}")));
        }

        let bytes = response.bytes().await.map_err(transport_error)?;
        trace!("<- {method} #{id} ({} bytes)", bytes.len());
        decode_result(&bytes, id).map_err(|e| protocol_error(method, e))
    }

    /// Calls a method whose result we do not need (`"OK"` or a status object).
    async fn invoke(&self, method: &str, params: Value) -> Result<(), PlayerError> {
        self.call::<Value>(method, params).await.map(drop)
    }
}

fn transport_error(e: reqwest::Error) -> PlayerError {
    if e.is_decode() {
        PlayerError::MalformedResponse(e.to_string())
    } else {
        PlayerError::ConnectionLost(e.to_string())
    }
}

fn protocol_error(method: &str, e: ProtocolError) -> PlayerError {
    match e {
        ProtocolError::Rpc { code, message } => PlayerError::Rejected {
            method: method.to_string(),
            code,
            message,
        },
        other => PlayerError::MalformedResponse(format!("{method}: {other}")),
    }
}

#[async_trait]
impl PlayerClient for KodiClient {
    async fn ping(&self) -> Result<String, PlayerError> {
        self.call("JSONRPC.Ping", Value::Null).await
    }

    async fn active_players(&self) -> Result<Vec<ActivePlayer>, PlayerError> {
        self.call("Player.GetActivePlayers", Value::Null).await
    }

    async fn player_properties(&self, player_id: PlayerId) -> Result<PlayerProperties, PlayerError> {
        self.call(
            "Player.GetProperties",
            json!({ "playerid": player_id, "properties": SNAPSHOT_PROPERTIES }),
        )
        .await
    }

    async fn play_pause(&self, player_id: PlayerId) -> Result<(), PlayerError> {
        self.invoke("Player.PlayPause", json!({ "playerid": player_id }))
            .await
    }

    async fn stop(&self, player_id: PlayerId) -> Result<(), PlayerError> {
        self.invoke("Player.Stop", json!({ "playerid": player_id }))
            .await
    }

    async fn seek(&self, player_id: PlayerId, to: TimeOffset) -> Result<(), PlayerError> {
        self.invoke(
            "Player.Seek",
            json!({ "playerid": player_id, "value": { "time": to } }),
        )
        .await
    }

    async fn set_subtitles(&self, player_id: PlayerId, enabled: bool) -> Result<(), PlayerError> {
        let subtitle = if enabled { "on" } else { "off" };
        self.invoke(
            "Player.SetSubtitle",
            json!({ "playerid": player_id, "subtitle": subtitle, "enable": enabled }),
        )
        .await
    }

    async fn current_window(&self) -> Result<WindowContext, PlayerError> {
        let props: GuiProperties = self
            .call("GUI.GetProperties", json!({ "properties": ["currentwindow"] }))
            .await?;
        Ok(WindowContext::new(props.current_window.label))
    }

    async fn navigate(&self, nav: Navigation) -> Result<(), PlayerError> {
        self.invoke(nav.method(), Value::Null).await
    }

    async fn show_osd(&self) -> Result<(), PlayerError> {
        self.invoke("Input.ShowOSD", Value::Null).await
    }

    async fn execute_action(&self, action: NamedAction) -> Result<(), PlayerError> {
        self.invoke("Input.ExecuteAction", json!({ "action": action.as_str() }))
            .await
    }

    async fn show_notification(
        &self,
        title: &str,
        message: &str,
        display_ms: u32,
    ) -> Result<(), PlayerError> {
        self.invoke(
            "GUI.ShowNotification",
            json!({ "title": title, "message": message, "displaytime": display_ms }),
        )
        .await
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
