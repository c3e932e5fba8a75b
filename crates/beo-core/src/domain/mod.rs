//! Domain logic for the Beo4 → Kodi bridge.
//!
//! Everything in here is pure: no sockets, no serial ports, no async.  The
//! daemon crate feeds codes in and executes the decisions that come out.
//!
//! - **`mode`**     – whether the bridge is listening to the remote.
//! - **`mapping`**  – which player action a button means in the current context.
//! - **`timecode`** – playback positions and clamped seek arithmetic.
//! - **`player`**   – value types describing the player and the focused window.

pub mod mapping;
pub mod mode;
pub mod player;
pub mod timecode;
