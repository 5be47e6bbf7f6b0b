//! Idle tracking

use crate::clock::Millis;

/// Time of the last recognized input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityClock {
    last_activity_ms: Millis,
}

impl ActivityClock {
    /// Start counting idle time from `now`
    pub const fn new(now: Millis) -> Self {
        Self {
            last_activity_ms: now,
        }
    }

    /// Record input activity
    pub fn record(&mut self, now: Millis) {
        self.last_activity_ms = self.last_activity_ms.max(now);
    }

    pub fn last_activity_ms(&self) -> Millis {
        self.last_activity_ms
    }

    /// Time since the last activity
    pub fn idle_ms(&self, now: Millis) -> Millis {
        now.saturating_sub(self.last_activity_ms)
    }
}
