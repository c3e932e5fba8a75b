//! Playback positions and clamped seek arithmetic.
//!
//! Kodi reports and accepts positions as an object with `hours`, `minutes`,
//! `seconds` and `milliseconds`.  [`TimeOffset`] mirrors that shape so it can
//! be (de)serialised directly, while ordering and arithmetic treat it as a
//! plain duration.
//!
//! Seeks are computed at whole-second granularity: the sub-second part of
//! the current position is dropped, which is invisible at the 10 s / 10 min
//! step sizes the remote uses.

use std::cmp::Ordering;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A playback position or duration in Kodi's time-object format.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TimeOffset {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    #[serde(default)]
    pub milliseconds: u32,
}

impl TimeOffset {
    /// The zero position.
    pub const ZERO: TimeOffset = TimeOffset {
        hours: 0,
        minutes: 0,
        seconds: 0,
        milliseconds: 0,
    };

    /// Builds an offset from hours, minutes and seconds.
    pub const fn hms(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            hours,
            minutes,
            seconds,
            milliseconds: 0,
        }
    }

    /// Builds a normalised offset (minutes and seconds below 60) from whole seconds.
    pub fn from_secs(total: u64) -> Self {
        let hours = total / 3600;
        let minutes = (total % 3600) / 60;
        let seconds = total % 60;
        Self {
            hours: u32::try_from(hours).unwrap_or(u32::MAX),
            minutes: minutes as u32,
            seconds: seconds as u32,
            milliseconds: 0,
        }
    }

    /// Whole seconds, ignoring milliseconds.
    pub fn as_secs(&self) -> u64 {
        u64::from(self.hours) * 3600 + u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }

    fn as_millis(&self) -> u64 {
        self.as_secs() * 1000 + u64::from(self.milliseconds)
    }
}

impl PartialEq for TimeOffset {
    fn eq(&self, other: &Self) -> bool {
        self.as_millis() == other.as_millis()
    }
}

impl Eq for TimeOffset {}

impl PartialOrd for TimeOffset {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeOffset {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_millis().cmp(&other.as_millis())
    }
}

impl std::fmt::Display for TimeOffset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let n = TimeOffset::from_secs(self.as_secs());
        write!(f, "{:02}:{:02}:{:02}", n.hours, n.minutes, n.seconds)
    }
}

/// Position after seeking forward by `step`, clamped to `total`.
///
/// Returns `min(position + step, total)`.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use beo_core::domain::timecode::{seek_forward, TimeOffset};
///
/// let to = seek_forward(TimeOffset::hms(0, 5, 0), TimeOffset::hms(0, 20, 0), Duration::from_secs(600));
/// assert_eq!(to, TimeOffset::hms(0, 15, 0));
/// ```
pub fn seek_forward(position: TimeOffset, total: TimeOffset, step: Duration) -> TimeOffset {
    let target = position.as_secs().saturating_add(step.as_secs());
    TimeOffset::from_secs(target.min(total.as_secs()))
}

/// Position after seeking backward by `step`, clamped to zero.
///
/// Returns `max(position - step, 0)`.
pub fn seek_backward(position: TimeOffset, step: Duration) -> TimeOffset {
    TimeOffset::from_secs(position.as_secs().saturating_sub(step.as_secs()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
