//! Kodi JSON-RPC 2.0 message shapes.
//!
//! Only the subset the bridge uses is modelled.  Requests carry free-form
//! `params` (a `serde_json::Value`) because every method has its own
//! parameter object; responses are decoded into the typed result structs
//! below.
//!
//! Reference: <https://kodi.wiki/view/JSON-RPC_API/v12>

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::player::PlayerId;
use crate::domain::timecode::TimeOffset;

/// JSON-RPC protocol version string sent with every request.
pub const JSONRPC_VERSION: &str = "2.0";

/// Reply `JSONRPC.Ping` returns when Kodi is alive.
pub const PONG: &str = "pong";

/// Player properties requested on every snapshot.
pub const SNAPSHOT_PROPERTIES: [&str; 3] = ["time", "totaltime", "subtitleenabled"];

/// An outbound JSON-RPC request.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub method: &'a str,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub params: Value,
    pub id: u64,
}

/// The `error` member of a failed JSON-RPC response.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
}

/// An inbound JSON-RPC response envelope.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RpcResponse {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcErrorObject>,
}

/// One entry of `Player.GetActivePlayers`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ActivePlayer {
    #[serde(rename = "playerid")]
    pub player_id: PlayerId,
    /// `"audio"`, `"video"` or `"picture"`.
    #[serde(rename = "type")]
    pub kind: String,
}

/// Result of `Player.GetProperties` for [`SNAPSHOT_PROPERTIES`].
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PlayerProperties {
    pub time: TimeOffset,
    #[serde(rename = "totaltime")]
    pub total_time: TimeOffset,
    #[serde(rename = "subtitleenabled", default)]
    pub subtitle_enabled: bool,
}

/// `currentwindow` member of `GUI.GetProperties`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CurrentWindow {
    #[serde(default)]
    pub id: i64,
    pub label: String,
}

/// Result of `GUI.GetProperties` for `["currentwindow"]`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GuiProperties {
    #[serde(rename = "currentwindow")]
    pub current_window: CurrentWindow,
}
