//! Temperature trend tracking
//!
//! Keeps the last few temperature samples of the tracking source and
//! classifies their direction by comparing the oldest and newest sample.

use heapless::HistoryBuffer;

#[cfg(feature = "serde")]
use serde::{Serialize, Serializer};

/// Number of samples kept
pub const TREND_HISTORY_LEN: usize = 12;

/// Minimum samples before a direction is reported
pub const TREND_MIN_SAMPLES: usize = 3;

/// Change (°C) between oldest and newest sample that counts as movement
pub const TREND_THRESHOLD_C: f32 = 0.3;

/// Direction of the temperature history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Trend {
    /// Not enough samples yet
    #[default]
    Unknown,
    Rising,
    Falling,
    Flat,
}

impl Trend {
    /// Text label, empty while unknown
    pub const fn as_str(self) -> &'static str {
        match self {
            Trend::Unknown => "",
            Trend::Rising => "rising",
            Trend::Falling => "falling",
            Trend::Flat => "flat",
        }
    }

    /// Single-character arrow, empty while unknown
    pub const fn glyph(self) -> &'static str {
        match self {
            Trend::Unknown => "",
            Trend::Rising => "^",
            Trend::Falling => "v",
            Trend::Flat => "-",
        }
    }
}

#[cfg(feature = "serde")]
impl Serialize for Trend {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Bounded ring of recent temperature samples
#[derive(Debug, Clone)]
pub struct TemperatureHistory {
    samples: HistoryBuffer<f32, TREND_HISTORY_LEN>,
}

impl Default for TemperatureHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl TemperatureHistory {
    pub const fn new() -> Self {
        Self {
            samples: HistoryBuffer::new(),
        }
    }

    /// Append a sample, evicting the oldest once full
    ///
    /// Non-finite readings are dropped.
    pub fn push(&mut self, celsius: f32) {
        if celsius.is_finite() {
            self.samples.write(celsius);
        }
    }

    /// Number of samples held
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Classify the current history
    pub fn trend(&self) -> Trend {
        if self.samples.len() < TREND_MIN_SAMPLES {
            return Trend::Unknown;
        }

        let first = self.samples.oldest_ordered().next().copied();
        let last = self.samples.recent().copied();
        let (Some(first), Some(last)) = (first, last) else {
            return Trend::Unknown;
        };

        let delta = last - first;
        if delta > TREND_THRESHOLD_C {
            Trend::Rising
        } else if delta < -TREND_THRESHOLD_C {
            Trend::Falling
        } else {
            Trend::Flat
        }
    }
}
