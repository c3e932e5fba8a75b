//! Signal codes received from the IR eye and the Beo4 code tables.
//!
//! The IR eye (an Arduino running a Beo4 decoder sketch) writes one line per
//! button press to its serial port.  Each line is a six-digit hexadecimal
//! code such as `00001E`.  This module turns those raw lines into validated
//! [`SignalCode`] values; [`beo4`] knows which codes mean what.
//!
//! # Normalisation rules
//!
//! - Surrounding whitespace (including the trailing `\n` or `\r\n`) is removed.
//! - The remaining text is uppercased.
//! - An empty line means "no signal this tick" and yields `Ok(None)`.
//! - Anything that is not exactly [`SIGNAL_CODE_WIDTH`] hex digits is a
//!   [`CodeError`].

use std::fmt;

use thiserror::Error;

pub mod beo4;

pub use beo4::Button;

/// Number of hex digits in every code produced by the IR eye.
pub const SIGNAL_CODE_WIDTH: usize = 6;

/// Error returned when a device line is not a valid signal code.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodeError {
    /// The line has the wrong number of characters.
    #[error("signal code must be {expected} hex digits, got {actual:?}")]
    BadWidth { expected: usize, actual: String },

    /// The line contains a character outside `0-9A-F`.
    #[error("signal code contains non-hex characters: {0:?}")]
    NotHex(String),
}

/// A single normalised remote-control code, e.g. `00001E`.
///
/// Always exactly [`SIGNAL_CODE_WIDTH`] uppercase hex digits.  Stored inline
/// so the type is `Copy` and cheap to move through the command queue.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignalCode([u8; SIGNAL_CODE_WIDTH]);

impl SignalCode {
    /// Builds a code from a string that is already known to be well formed.
    ///
    /// Used for the compile-time code tables in [`beo4`].
    ///
    /// # Panics
    ///
    /// Panics (at compile time when used in a `const`) if `code` is not six
    /// uppercase hex digits.
    pub const fn from_static(code: &'static str) -> Self {
        let bytes = code.as_bytes();
        assert!(bytes.len() == SIGNAL_CODE_WIDTH, "signal code must be 6 digits");
        let mut out = [0u8; SIGNAL_CODE_WIDTH];
        let mut i = 0;
        while i < SIGNAL_CODE_WIDTH {
            let b = bytes[i];
            assert!(
                b.is_ascii_digit() || (b >= b'A' && b <= b'F'),
                "signal code must be uppercase hex"
            );
            out[i] = b;
            i += 1;
        }
        Self(out)
    }

    /// Normalises one line read from the signal device.
    ///
    /// Returns `Ok(None)` for a blank line ("no signal this tick").
    ///
    /// # Errors
    ///
    /// Returns [`CodeError`] if the trimmed line is not six hex digits.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use beo_core::keymap::SignalCode;
    ///
    /// let code = SignalCode::parse_line("00001e\r\n").unwrap().unwrap();
    /// assert_eq!(code.as_str(), "00001E");
    /// assert_eq!(SignalCode::parse_line("\n").unwrap(), None);
    /// ```
    pub fn parse_line(line: &str) -> Result<Option<Self>, CodeError> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if trimmed.len() != SIGNAL_CODE_WIDTH {
            return Err(CodeError::BadWidth {
                expected: SIGNAL_CODE_WIDTH,
                actual: trimmed.to_string(),
            });
        }
        if !trimmed.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CodeError::NotHex(trimmed.to_string()));
        }

        let mut out = [0u8; SIGNAL_CODE_WIDTH];
        for (slot, b) in out.iter_mut().zip(trimmed.bytes()) {
            *slot = b.to_ascii_uppercase();
        }
        Ok(Some(Self(out)))
    }

    /// Returns the code as a string slice (always ASCII).
    pub fn as_str(&self) -> &str {
        // Construction only ever stores ASCII hex digits.
        std::str::from_utf8(&self.0).unwrap_or("??????")
    }
}

impl fmt::Display for SignalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for SignalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignalCode({})", self.as_str())
    }
}

impl std::str::FromStr for SignalCode {
    type Err = CodeError;

    /// Parses a code, treating a blank string as a width error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_line(s)?.ok_or_else(|| CodeError::BadWidth {
            expected: SIGNAL_CODE_WIDTH,
            actual: String::new(),
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
