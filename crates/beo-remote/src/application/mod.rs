//! Application layer use cases for the remote bridge.
//!
//! Nothing in here touches the serial port or the network directly.  The
//! player is reached through the [`player_client::PlayerClient`] trait and
//! codes arrive through the [`command_queue`].
//!
//! # Sub-modules
//!
//! - **`player_client`** – The capability set the bridge needs from a media
//!   player, and its error type.
//!
//! - **`command_queue`** – FIFO hand-off from the IR reader thread to the
//!   dispatcher task.
//!
//! - **`dispatch`** – Runs every code through the mode state machine and the
//!   context mapper, then calls the player.  Runs once per button press.

pub mod command_queue;
pub mod dispatch;
pub mod player_client;
