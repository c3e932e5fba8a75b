//! Serial-device signal source.
//!
//! Reads the IR eye's character device (e.g. `/dev/ttyACM0`) on a dedicated
//! OS thread.  Line settings (baud rate etc.) are left to the OS, typically
//! configured once with `stty`.
//!
//! # End of input
//!
//! - On a character device, a zero-byte read only means nothing arrived this
//!   tick.  The reader sleeps `idle_poll` and reads the same handle again.
//! - A read error on a character device (`EIO` once the cable is pulled) drops
//!   the handle.  The device is re-opened when it reappears.
//! - On a regular file (a recorded capture being replayed), EOF ends the
//!   reader.  The sender is dropped, so the dispatcher drains and exits.
//!
//! # Stopping
//!
//! [`SignalSource::stop`] clears a flag that is checked between lines.  A
//! thread blocked inside `read` on a quiet device only notices once the next
//! line arrives; the process exits without joining it.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::{pump, EofPolicy, PumpEnd, SignalError, SignalSource};
use crate::application::command_queue::CommandSender;

/// Delay between re-open attempts once the device has disappeared.
const REOPEN_RETRY: Duration = Duration::from_secs(1);

/// [`SignalSource`] backed by a device node or a capture file.
pub struct DeviceSignalSource {
    path: PathBuf,
    idle_poll: Duration,
    running: Arc<AtomicBool>,
}

impl DeviceSignalSource {
    pub fn new(path: impl Into<PathBuf>, idle_poll: Duration) -> Self {
        Self {
            path: path.into(),
            idle_poll,
            running: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl SignalSource for DeviceSignalSource {
    fn start(&self, queue: CommandSender) -> Result<(), SignalError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(SignalError::AlreadyStarted);
        }

        // Open up front so a wrong path fails startup instead of a background thread.
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(source) => {
                self.running.store(false, Ordering::SeqCst);
                return Err(SignalError::Open {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        let is_device = is_char_device(&file);
        info!(
            "reading IR codes from {} ({})",
            self.path.display(),
            if is_device { "device" } else { "replay" }
        );

        let reader = Reader {
            path: self.path.clone(),
            idle_poll: self.idle_poll,
            is_device,
            running: Arc::clone(&self.running),
            queue,
        };
        std::thread::Builder::new()
            .name("ir-reader".to_string())
            .spawn(move || reader.run(file))
            .map_err(|e| {
                self.running.store(false, Ordering::SeqCst);
                SignalError::Spawn(e)
            })?;
        Ok(())
    }

    fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

/// State owned by the reader thread.
struct Reader {
    path: PathBuf,
    idle_poll: Duration,
    is_device: bool,
    running: Arc<AtomicBool>,
    queue: CommandSender,
}

impl Reader {
    fn run(self, file: File) {
        let on_eof = if self.is_device {
            EofPolicy::Idle
        } else {
            EofPolicy::Finish
        };
        let mut reader = BufReader::new(file);
        loop {
            match pump(&mut reader, &self.queue, &self.running, self.idle_poll, on_eof) {
                Ok(PumpEnd::Eof) => {
                    info!("end of {}; reader stopping", self.path.display());
                    return;
                }
                Ok(PumpEnd::Stopped) => {
                    debug!("reader stopped");
                    return;
                }
                Ok(PumpEnd::QueueClosed) => {
                    debug!("command queue closed; reader stopping");
                    return;
                }
                Err(e) if self.is_device => {
                    warn!("read error on {}: {e}; reopening", self.path.display());
                }
                Err(e) => {
                    error!("read error on {}: {e}", self.path.display());
                    return;
                }
            }

            match self.reopen() {
                Some(file) => reader = BufReader::new(file),
                None => return,
            }
        }
    }

    /// Waits for the device to come back.  `None` once stopped.
    fn reopen(&self) -> Option<File> {
        std::thread::sleep(self.idle_poll);
        while self.running.load(Ordering::Relaxed) {
            match File::open(&self.path) {
                Ok(file) => {
                    info!("reopened {}", self.path.display());
                    return Some(file);
                }
                Err(e) => {
                    debug!("{} not available yet: {e}", self.path.display());
                    std::thread::sleep(REOPEN_RETRY);
                }
            }
        }
        None
    }
}

#[cfg(unix)]
fn is_char_device(file: &File) -> bool {
    use std::os::unix::fs::FileTypeExt;
    file.metadata()
        .map(|m| m.file_type().is_char_device())
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_char_device(_file: &File) -> bool {
    false
}

// ── Tests ─────────────────────────────────────────────────────────────────────
