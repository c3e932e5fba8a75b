//! IR receiver infrastructure.
//!
//! The Beo4 eye is an Arduino on a USB serial port that prints one line per
//! received button: six hex digits, e.g. `00001E`.  A dedicated OS thread
//! blocks on that device and pushes every well-formed code into the
//! [`CommandSender`].
//!
//! # Line handling
//!
//! - trailing whitespace and `\r\n` are stripped, hex is uppercased;
//! - an empty line means "no signal" and costs an idle sleep;
//! - anything else that is not six hex digits is logged at `warn` and dropped;
//! - a zero-byte read on a serial device is also "no signal" (see [`EofPolicy`]).
//!
//! # Testability
//!
//! The [`SignalSource`] trait lets tests feed codes through
//! [`mock::MockSignalSource`] without a serial device.

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use beo_core::SignalCode;
use thiserror::Error;
use tracing::{debug, warn};

use crate::application::command_queue::CommandSender;

pub mod device;
pub mod mock;

/// Error type for signal source operations.
#[derive(Debug, Error)]
pub enum SignalError {
    #[error("failed to open IR device {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to spawn reader thread: {0}")]
    Spawn(#[source] io::Error),
    #[error("signal source has already been started")]
    AlreadyStarted,
}

/// Produces remote codes into the command queue.
///
/// The production implementation reads a serial device; tests use
/// [`mock::MockSignalSource`].
pub trait SignalSource: Send {
    /// Starts producing into `queue`.  Returns once production is under way.
    fn start(&self, queue: CommandSender) -> Result<(), SignalError>;
    /// Asks the source to stop producing.  Dropping its sender closes the queue.
    fn stop(&self);
}

/// Result of reading one line from the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Signal(SignalCode),
    /// An empty line.
    NoSignal,
    /// A line that is not a code; carries the offending text.
    Malformed(String),
    /// The device or file has nothing more to give.
    Eof,
}

/// Reads and normalises one line.
///
/// Invalid UTF-8 is reported as [`ReadOutcome::Malformed`], not as an I/O error.
///
/// # Errors
///
/// Propagates I/O errors from the underlying reader.
pub fn read_signal<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<ReadOutcome> {
    buf.clear();
    if reader.read_until(b'\n', buf)? == 0 {
        return Ok(ReadOutcome::Eof);
    }
    let line = String::from_utf8_lossy(buf);
    Ok(match SignalCode::parse_line(&line) {
        Ok(Some(code)) => ReadOutcome::Signal(code),
        Ok(None) => ReadOutcome::NoSignal,
        Err(e) => ReadOutcome::Malformed(format!("{:?} ({e})", line.trim())),
    })
}

/// What a zero-byte read means to [`pump`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EofPolicy {
    /// A tty with nothing to say yet: sleep and read the same handle again.
    Idle,
    /// A capture file: reading is over.
    Finish,
}

/// Why [`pump`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpEnd {
    Eof,
    Stopped,
    QueueClosed,
}

/// Moves codes from `reader` into `queue` until `running` clears, the
/// dispatcher goes away, or (with [`EofPolicy::Finish`]) the input ends.
///
/// # Errors
///
/// Propagates I/O errors from the underlying reader.
pub fn pump<R: BufRead>(
    reader: &mut R,
    queue: &CommandSender,
    running: &AtomicBool,
    idle_poll: Duration,
    on_eof: EofPolicy,
) -> io::Result<PumpEnd> {
    let mut buf = Vec::with_capacity(16);
    while running.load(Ordering::Relaxed) {
        match read_signal(reader, &mut buf)? {
            ReadOutcome::Signal(code) => {
                debug!("received {code}");
                if queue.enqueue(code).is_err() {
                    return Ok(PumpEnd::QueueClosed);
                }
            }
            ReadOutcome::NoSignal => std::thread::sleep(idle_poll),
            ReadOutcome::Malformed(line) => warn!("ignoring malformed IR line {line}"),
            ReadOutcome::Eof => match on_eof {
                EofPolicy::Idle => std::thread::sleep(idle_poll),
                EofPolicy::Finish => return Ok(PumpEnd::Eof),
            },
        }
    }
    Ok(PumpEnd::Stopped)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::io::{BufReader, Cursor, Read};

    use crate::application::command_queue::command_queue;

    /// A quiet serial port: each read hands out the next chunk, where an
    /// empty chunk is a zero-byte read.  Clears `running` once out of chunks.
    struct QuietTty<'a> {
        chunks: VecDeque<&'static str>,
        running: &'a AtomicBool,
        reads: usize,
    }

    impl Read for QuietTty<'_> {
        fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
            self.reads += 1;
            let Some(chunk) = self.chunks.pop_front() else {
                self.running.store(false, Ordering::Relaxed);
                return Ok(0);
            };
            out[..chunk.len()].copy_from_slice(chunk.as_bytes());
            Ok(chunk.len())
        }
    }

    fn outcomes(input: &[u8]) -> Vec<ReadOutcome> {
        let mut reader = Cursor::new(input.to_vec());
        let mut buf = Vec::new();
        let mut out = Vec::new();
        loop {
            let outcome = read_signal(&mut reader, &mut buf).unwrap();
            let done = outcome == ReadOutcome::Eof;
            out.push(outcome);
            if done {
                return out;
            }
        }
    }

    #[test]
    fn test_read_signal_normalises_crlf_and_case() {
        assert_eq!(
            outcomes(b"00001e\r\n"),
            vec![
                ReadOutcome::Signal(SignalCode::from_static("00001E")),
                ReadOutcome::Eof
            ]
        );
    }

    #[test]
    fn test_read_signal_blank_line_is_no_signal() {
        assert_eq!(outcomes(b"\n  \r\n"), vec![
            ReadOutcome::NoSignal,
            ReadOutcome::NoSignal,
            ReadOutcome::Eof
        ]);
    }

    #[test]
    fn test_read_signal_rejects_garbage_and_invalid_utf8() {
        let out = outcomes(b"XYZ\n\xff\xfe\n");
        assert!(matches!(&out[0], ReadOutcome::Malformed(l) if l.contains("XYZ")));
        assert!(matches!(&out[1], ReadOutcome::Malformed(_)));
        assert_eq!(out[2], ReadOutcome::Eof);
    }

    #[test]
    fn test_read_signal_accepts_last_line_without_newline() {
        assert_eq!(
            outcomes(b"00008B"),
            vec![
                ReadOutcome::Signal(SignalCode::from_static("00008B")),
                ReadOutcome::Eof
            ]
        );
    }

    #[test]
    fn test_pump_enqueues_only_valid_codes_in_order() {
        // Arrange
        let (tx, mut rx) = command_queue();
        let running = AtomicBool::new(true);
        let mut reader = Cursor::new(b"00008B\n\nnoise\n00001e\r\n000035\n".to_vec());

        // Act
        let end = pump(&mut reader, &tx, &running, Duration::ZERO, EofPolicy::Finish).unwrap();

        // Assert
        assert_eq!(end, PumpEnd::Eof);
        let codes: Vec<String> = std::iter::from_fn(|| rx.try_dequeue())
            .map(|c| c.code.to_string())
            .collect();
        assert_eq!(codes, vec!["00008B", "00001E", "000035"]);
    }

    #[test]
    fn test_pump_keeps_reading_an_idle_tty_until_stopped() {
        // Arrange: zero-byte reads around a single press.
        let (tx, mut rx) = command_queue();
        let running = AtomicBool::new(true);
        let tty = QuietTty {
            chunks: VecDeque::from(["", "", "00008B\n", "", ""]),
            running: &running,
            reads: 0,
        };
        let mut reader = BufReader::new(tty);

        // Act
        let end = pump(&mut reader, &tx, &running, Duration::ZERO, EofPolicy::Idle).unwrap();

        // Assert
        assert_eq!(end, PumpEnd::Stopped);
        assert_eq!(reader.get_ref().reads, 6);
        let cmd = rx.try_dequeue().expect("press queued");
        assert_eq!(cmd.code, SignalCode::from_static("00008B"));
        assert!(rx.try_dequeue().is_none());
    }

    #[test]
    fn test_pump_finishes_replay_at_eof() {
        let (tx, rx) = command_queue();
        let running = AtomicBool::new(true);
        let mut reader = Cursor::new(Vec::new());

        let end = pump(&mut reader, &tx, &running, Duration::ZERO, EofPolicy::Finish).unwrap();

        assert_eq!(end, PumpEnd::Eof);
        assert!(running.load(Ordering::Relaxed));
        assert!(rx.is_empty());
    }

    #[test]
    fn test_pump_stops_when_flag_cleared() {
        let (tx, rx) = command_queue();
        let running = AtomicBool::new(false);
        let mut reader = Cursor::new(b"00008B\n".to_vec());

        let end = pump(&mut reader, &tx, &running, Duration::ZERO, EofPolicy::Finish).unwrap();

        assert_eq!(end, PumpEnd::Stopped);
        assert!(rx.is_empty());
    }

    #[test]
    fn test_pump_reports_closed_queue() {
        let (tx, rx) = command_queue();
        drop(rx);
        let running = AtomicBool::new(true);
        let mut reader = Cursor::new(b"00008B\n00001E\n".to_vec());

        let end = pump(&mut reader, &tx, &running, Duration::ZERO, EofPolicy::Finish).unwrap();

        assert_eq!(end, PumpEnd::QueueClosed);
    }
}
