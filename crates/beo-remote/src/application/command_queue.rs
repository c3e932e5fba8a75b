//! Ordered hand-off between the IR reader thread and the dispatcher task.
//!
//! The reader runs on a plain OS thread blocked in `read_line`; the
//! dispatcher is a Tokio task.  An unbounded Tokio channel bridges the two:
//! `send` never blocks (safe to call from a non-async thread) and `recv`
//! suspends the dispatcher instead of spinning while the queue is empty.
//!
//! # Guarantees
//!
//! - Strict FIFO: codes come out in the order they went in.
//! - One producer ([`CommandSender`]), one consumer ([`CommandReceiver`]).
//!   The receiver is not `Clone`, so a second consumer cannot exist.
//! - Unbounded.  A slow player makes the queue grow; nothing is dropped.
//!   The dispatcher warns when the backlog gets long.

use std::time::Instant;

use beo_core::SignalCode;
use thiserror::Error;
use tokio::sync::mpsc;

/// Returned by [`CommandSender::enqueue`] once the dispatcher has gone away.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("command queue closed; dropped {0}")]
pub struct QueueClosed(pub SignalCode);

/// One queued button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueuedCommand {
    pub code: SignalCode,
    /// When the reader saw the code; used to log queueing latency.
    pub received_at: Instant,
}

/// Producer half of the queue.
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: mpsc::UnboundedSender<QueuedCommand>,
}

/// Consumer half of the queue.
#[derive(Debug)]
pub struct CommandReceiver {
    rx: mpsc::UnboundedReceiver<QueuedCommand>,
}

/// Creates a connected sender/receiver pair.
pub fn command_queue() -> (CommandSender, CommandReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (CommandSender { tx }, CommandReceiver { rx })
}

impl CommandSender {
    /// Appends `code` to the tail of the queue.  Never blocks.
    ///
    /// # Errors
    ///
    /// Returns [`QueueClosed`] if the receiver has been dropped.
    pub fn enqueue(&self, code: SignalCode) -> Result<(), QueueClosed> {
        self.tx
            .send(QueuedCommand {
                code,
                received_at: Instant::now(),
            })
            .map_err(|e| QueueClosed(e.0.code))
    }
}

impl CommandReceiver {
    /// Removes and returns the head of the queue, or `None` if it is empty.
    pub fn try_dequeue(&mut self) -> Option<QueuedCommand> {
        self.rx.try_recv().ok()
    }

    /// Waits for the next command.
    ///
    /// Returns `None` once every sender has been dropped and the queue is
    /// drained.
    pub async fn dequeue(&mut self) -> Option<QueuedCommand> {
        self.rx.recv().await
    }

    /// Number of commands waiting.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
