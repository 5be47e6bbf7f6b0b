//! Time-of-day windows and wall clock sanity checks
//!
//! All scheduling inside the core runs on a monotonic millisecond counter
//! supplied by the caller. Only the daily on-windows look at local wall
//! time, and only at its hour and minute.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Monotonic milliseconds since process start
pub type Millis = u64;

/// Backwards wall-clock movement tolerated between two observations
pub const CLOCK_SKEW_TOLERANCE_MS: i64 = 2_000;

/// Local time of day with minute resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TimeOfDay {
    minutes: u16,
}

/// Errors parsing an `HH:MM` string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TimeParseError {
    /// Not of the form `HH:MM`
    #[error("expected HH:MM")]
    Format,
    /// Hour above 23 or minute above 59
    #[error("hour or minute out of range")]
    Range,
}

impl TimeOfDay {
    /// Midnight
    pub const MIDNIGHT: Self = Self { minutes: 0 };

    /// Create a time of day, or None if out of range
    pub const fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self {
                minutes: hour as u16 * 60 + minute as u16,
            })
        } else {
            None
        }
    }

    /// Minutes elapsed since midnight
    pub const fn minutes_since_midnight(self) -> u16 {
        self.minutes
    }

    pub const fn hour(self) -> u8 {
        (self.minutes / 60) as u8
    }

    pub const fn minute(self) -> u8 {
        (self.minutes % 60) as u8
    }
}

fn parse_component(s: &str) -> Result<u8, TimeParseError> {
    if s.is_empty() || s.len() > 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimeParseError::Format);
    }
    s.parse().map_err(|_| TimeParseError::Format)
}

impl FromStr for TimeOfDay {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (h, m) = s.trim().split_once(':').ok_or(TimeParseError::Format)?;
        let hour = parse_component(h)?;
        let minute = parse_component(m)?;
        TimeOfDay::new(hour, minute).ok_or(TimeParseError::Range)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Daily window during which the display should be lit
///
/// Both bounds are inclusive. A window whose start lies after its end does
/// not wrap past midnight; it simply never matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TimeWindow {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl TimeWindow {
    pub const fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { start, end }
    }

    /// Check whether `now` falls inside this window
    pub fn contains(&self, now: TimeOfDay) -> bool {
        self.start <= now && now <= self.end
    }
}

/// Check whether `now` falls inside any of the given windows
pub fn in_any_window(windows: &[TimeWindow], now: TimeOfDay) -> bool {
    windows.iter().any(|w| w.contains(now))
}

/// Wall clock moved backwards between two observations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockSkew {
    /// How far the clock went back, in milliseconds
    pub backwards_ms: i64,
}

/// Watches local wall time for backwards jumps
///
/// Window evaluation assumes wall time only moves forward. Nothing is
/// corrected here; a detected jump is reported so it can be logged.
#[derive(Debug, Clone, Default)]
pub struct WallClockMonitor {
    last_unix_ms: Option<i64>,
}

impl WallClockMonitor {
    pub const fn new() -> Self {
        Self { last_unix_ms: None }
    }

    /// Record a wall clock reading (Unix milliseconds)
    ///
    /// Returns the size of the jump if time moved back by more than
    /// [`CLOCK_SKEW_TOLERANCE_MS`].
    pub fn observe(&mut self, unix_ms: i64) -> Option<ClockSkew> {
        let previous = self.last_unix_ms.replace(unix_ms)?;
        let backwards_ms = previous - unix_ms;
        if backwards_ms > CLOCK_SKEW_TOLERANCE_MS {
            Some(ClockSkew { backwards_ms })
        } else {
            None
        }
    }
}
