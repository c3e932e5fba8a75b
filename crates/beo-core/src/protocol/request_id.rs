//! Thread-safe JSON-RPC request id generator.
//!
//! Every request the bridge sends gets a fresh id so a response can be
//! matched to the call that produced it (see
//! [`decode_response`](super::codec::decode_response)).  Ids start at 1;
//! Kodi echoes them back verbatim.

use std::sync::atomic::{AtomicU64, Ordering};

/// A lock-free, monotonically increasing id source.
///
/// # Examples
///
/// ```rust
/// use beo_core::protocol::RequestIdCounter;
///
/// let ids = RequestIdCounter::new();
/// assert_eq!(ids.next(), 1);
/// assert_eq!(ids.next(), 2);
/// ```
#[derive(Debug)]
pub struct RequestIdCounter {
    inner: AtomicU64,
}

impl RequestIdCounter {
    /// Creates a counter whose first id is 1.
    pub fn new() -> Self {
        Self {
            inner: AtomicU64::new(1),
        }
    }

    /// Returns the next id.  Wraps around at `u64::MAX` without panicking.
    ///
    /// `Relaxed` is enough: ids only need to be unique, they do not order
    /// any other memory access.
    pub fn next(&self) -> u64 {
        self.inner.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for RequestIdCounter {
    fn default() -> Self {
        Self::new()
    }
}
