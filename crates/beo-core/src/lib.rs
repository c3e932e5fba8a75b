//! # beo-core
//!
//! Shared library for the Beo4 → Kodi bridge: the Beo4 code tables, the
//! remote activation state machine, the context-sensitive button mapping,
//! seek arithmetic and the Kodi JSON-RPC message types.
//!
//! It has no dependencies on serial ports, HTTP clients or async runtimes;
//! the `beo-remote` daemon supplies those.
//!
//! - **`keymap`**   – validated [`SignalCode`]s and which code means what.
//! - **`domain`**   – the mode state machine and the mapping rules.
//! - **`protocol`** – JSON-RPC envelopes and typed Kodi results.

pub mod domain;
pub mod keymap;
pub mod protocol;

pub use domain::mapping::{context_free_action, resolve, MappingError, PlayerAction};
pub use domain::mode::{Gate, RemoteMode, RemoteState};
pub use domain::player::{
    NamedAction, Navigation, PlayerId, PlayerKind, PlayerSnapshot, WindowContext,
};
pub use domain::timecode::{seek_backward, seek_forward, TimeOffset};
pub use keymap::{Button, CodeError, SignalCode};
pub use protocol::ProtocolError;
