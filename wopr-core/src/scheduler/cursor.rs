//! Per-source refresh bookkeeping

use crate::clock::Millis;

/// Refresh progress of one source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefreshCursor {
    /// Dispatch time of the last completed attempt, success or failure
    pub last_refresh_ms: Option<Millis>,
    /// Dispatch time of the attempt currently running
    pub in_flight_since: Option<Millis>,
}

impl RefreshCursor {
    pub const fn new() -> Self {
        Self {
            last_refresh_ms: None,
            in_flight_since: None,
        }
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight_since.is_some()
    }

    /// Check whether `interval_ms` has passed since the last attempt
    ///
    /// A source that was never refreshed is always due.
    pub fn elapsed(&self, now: Millis, interval_ms: Millis) -> bool {
        match self.last_refresh_ms {
            None => true,
            Some(last) => now.saturating_sub(last) >= interval_ms,
        }
    }

    /// Mark an attempt as started
    pub fn dispatch(&mut self, now: Millis) {
        self.in_flight_since = Some(now);
    }

    /// Mark the running attempt as finished
    ///
    /// Returns the dispatch time, or None if nothing was in flight.
    pub fn finish(&mut self) -> Option<Millis> {
        let started = self.in_flight_since.take()?;
        self.last_refresh_ms = Some(started);
        Some(started)
    }
}
