//! Mock signal source for unit testing.
//!
//! Allows tests to inject raw device lines without a serial port.  Lines go
//! through the same normalisation as the real reader.

use std::sync::{Mutex, PoisonError};

use beo_core::SignalCode;

use super::{SignalError, SignalSource};
use crate::application::command_queue::CommandSender;

/// A mock implementation of [`SignalSource`] that lets tests inject lines.
pub struct MockSignalSource {
    sender: Mutex<Option<CommandSender>>,
}

impl MockSignalSource {
    pub fn new() -> Self {
        Self {
            sender: Mutex::new(None),
        }
    }

    /// Injects a raw line, as if read from the device.
    ///
    /// Returns `true` if the line produced a queued code.  Blank and
    /// malformed lines return `false`.
    ///
    /// Panics if `start()` has not been called or if `stop()` has been called.
    pub fn inject_line(&self, line: &str) -> bool {
        let guard = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(sender) = guard.as_ref() else {
            panic!("MockSignalSource::inject_line called before start()");
        };
        match SignalCode::parse_line(line) {
            Ok(Some(code)) => {
                sender
                    .enqueue(code)
                    .expect("receiver has been dropped; keep it alive in the test");
                true
            }
            Ok(None) | Err(_) => false,
        }
    }
}

impl Default for MockSignalSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalSource for MockSignalSource {
    fn start(&self, queue: CommandSender) -> Result<(), SignalError> {
        let mut guard = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
        if guard.is_some() {
            return Err(SignalError::AlreadyStarted);
        }
        *guard = Some(queue);
        Ok(())
    }

    fn stop(&self) {
        // Dropping the sender closes the queue.
        *self.sender.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
