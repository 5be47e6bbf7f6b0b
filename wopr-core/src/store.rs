//! Shared state store
//!
//! One slot per configured source plus the derived temperature trend.
//! The refresh side is the only writer; the UI side only takes snapshots.
//! Every operation holds the lock for exactly that operation and never
//! across a fetch.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::Vec;

use crate::config::{Name, SourceConfig, MAX_SOURCES};
use crate::traits::{FetchError, Payload};
use crate::trend::{TemperatureHistory, Trend};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Latest known state of one source
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "status", content = "value", rename_all = "snake_case"))]
pub enum Reading<V> {
    /// Never fetched
    #[default]
    Loading,
    /// Last fetch succeeded
    Ready(V),
    /// Last fetch failed; shown until the next success
    Failed(FetchError),
}

impl<V> Reading<V> {
    pub fn value(&self) -> Option<&V> {
        match self {
            Reading::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            Reading::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Reading::Loading)
    }
}

impl<V> From<Result<V, FetchError>> for Reading<V> {
    fn from(result: Result<V, FetchError>) -> Self {
        match result {
            Ok(v) => Reading::Ready(v),
            Err(e) => Reading::Failed(e),
        }
    }
}

/// Store operation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("no source at index {0}")]
    UnknownIndex(usize),
    #[error("no source with that name")]
    UnknownName,
}

/// One named slot in a snapshot
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SourceReading<V> {
    pub name: Name,
    pub reading: Reading<V>,
}

/// Consistent copy of the store taken under one lock
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Snapshot<V> {
    /// Bumped on every write
    pub revision: u64,
    /// Temperature trend of the tracking source
    pub trend: Trend,
    /// Per-source readings in configuration order
    pub sources: Vec<SourceReading<V>, MAX_SOURCES>,
}

impl<V> Snapshot<V> {
    /// Look up a source by name
    pub fn get(&self, name: &str) -> Option<&Reading<V>> {
        self.sources
            .iter()
            .find(|s| s.name.as_str() == name)
            .map(|s| &s.reading)
    }
}

struct Inner<V> {
    slots: Vec<SourceReading<V>, MAX_SOURCES>,
    history: TemperatureHistory,
    trend: Trend,
    revision: u64,
}

/// Lock-guarded per-source state
pub struct StateStore<V> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Inner<V>>>,
}

impl<V: Payload> StateStore<V> {
    /// Create a store with a `Loading` slot for every source
    pub fn new(sources: &[SourceConfig]) -> Self {
        let mut slots = Vec::new();
        for source in sources.iter().take(MAX_SOURCES) {
            let _ = slots.push(SourceReading {
                name: source.name.clone(),
                reading: Reading::Loading,
            });
        }

        Self {
            inner: Mutex::new(RefCell::new(Inner {
                slots,
                history: TemperatureHistory::new(),
                trend: Trend::Unknown,
                revision: 0,
            })),
        }
    }

    /// Number of source slots
    pub fn len(&self) -> usize {
        self.inner.lock(|cell| cell.borrow().slots.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slot index for a source name
    pub fn position(&self, name: &str) -> Option<usize> {
        self.inner
            .lock(|cell| cell.borrow().slots.iter().position(|s| s.name.as_str() == name))
    }

    /// Replace the reading of one source
    pub fn set(&self, index: usize, reading: Reading<V>) -> Result<(), StoreError> {
        self.write(index, reading, false)
    }

    /// Replace the reading of one source by name
    pub fn set_named(&self, name: &str, reading: Reading<V>) -> Result<(), StoreError> {
        let index = self.position(name).ok_or(StoreError::UnknownName)?;
        self.set(index, reading)
    }

    /// Replace the reading of the temperature-tracking source
    ///
    /// A ready value with a temperature is pushed into the history and the
    /// trend is recomputed in the same locked operation as the write.
    pub fn set_with_trend(&self, index: usize, reading: Reading<V>) -> Result<(), StoreError> {
        self.write(index, reading, true)
    }

    fn write(&self, index: usize, reading: Reading<V>, track: bool) -> Result<(), StoreError> {
        self.inner.lock(|cell| {
            let mut inner = cell.borrow_mut();
            let inner = &mut *inner;
            let slot = inner
                .slots
                .get_mut(index)
                .ok_or(StoreError::UnknownIndex(index))?;

            if track {
                if let Some(temp) = reading.value().and_then(|v| v.temperature()) {
                    inner.history.push(temp);
                    inner.trend = inner.history.trend();
                }
            }

            slot.reading = reading;
            inner.revision = inner.revision.wrapping_add(1);
            Ok(())
        })
    }

    /// Current revision without copying the readings
    pub fn revision(&self) -> u64 {
        self.inner.lock(|cell| cell.borrow().revision)
    }

    /// Copy of one source's reading
    pub fn get(&self, name: &str) -> Option<Reading<V>> {
        self.inner.lock(|cell| {
            cell.borrow()
                .slots
                .iter()
                .find(|s| s.name.as_str() == name)
                .map(|s| s.reading.clone())
        })
    }

    /// Consistent copy of everything
    pub fn snapshot(&self) -> Snapshot<V> {
        self.inner.lock(|cell| {
            let inner = cell.borrow();
            Snapshot {
                revision: inner.revision,
                trend: inner.trend,
                sources: inner.slots.clone(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[derive(Debug, Clone, PartialEq)]
    struct Temp(Option<f32>);

    impl Payload for Temp {
        fn temperature(&self) -> Option<f32> {
            self.0
        }
    }

    fn store() -> StateStore<Temp> {
        let sources = [
            SourceConfig::new("weather", 300).unwrap().tracking_temperature(),
            SourceConfig::new("transit", 20).unwrap(),
            SourceConfig::new("prices", 600).unwrap(),
        ];
        StateStore::new(&sources)
    }

    #[test]
    fn test_starts_loading() {
        let store = store();
        let snap = store.snapshot();
        assert_eq!(snap.revision, 0);
        assert_eq!(snap.trend, Trend::Unknown);
        assert_eq!(snap.sources.len(), 3);
        assert!(snap.sources.iter().all(|s| s.reading.is_loading()));
    }

    #[test]
    fn test_write_then_snapshot() {
        let store = store();
        store.set_named("transit", Reading::Ready(Temp(None))).unwrap();

        let snap = store.snapshot();
        assert_eq!(snap.get("transit"), Some(&Reading::Ready(Temp(None))));
        assert_eq!(snap.get("weather"), Some(&Reading::Loading));
        assert_eq!(snap.get("prices"), Some(&Reading::Loading));
        assert_eq!(snap.revision, 1);
    }

    #[test]
    fn test_failure_replaces_value() {
        let store = store();
        store.set(1, Reading::Ready(Temp(None))).unwrap();
        store
            .set(1, Err(FetchError::Transport("down".to_string())).into())
            .unwrap();

        let reading = store.get("transit").unwrap();
        assert_eq!(reading.error(), Some(&FetchError::Transport("down".to_string())));
        assert_eq!(store.get("weather"), Some(Reading::Loading));
    }

    #[test]
    fn test_unknown_slot() {
        let store = store();
        assert_eq!(
            store.set(7, Reading::Loading),
            Err(StoreError::UnknownIndex(7))
        );
        assert_eq!(
            store.set_named("nope", Reading::Loading),
            Err(StoreError::UnknownName)
        );
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_trend_updated_with_value() {
        let store = store();
        for t in [10.0, 10.1, 10.5] {
            store.set_with_trend(0, Reading::Ready(Temp(Some(t)))).unwrap();
        }
        let snap = store.snapshot();
        assert_eq!(snap.trend, Trend::Rising);
        assert_eq!(snap.get("weather"), Some(&Reading::Ready(Temp(Some(10.5)))));
    }

    #[test]
    fn test_trend_ignores_failures_and_plain_writes() {
        let store = store();
        store.set_with_trend(0, Reading::Ready(Temp(Some(10.5)))).unwrap();
        store
            .set_with_trend(0, Reading::Failed(FetchError::Timeout(10)))
            .unwrap();
        store.set(0, Reading::Ready(Temp(Some(99.0)))).unwrap();
        store.set_with_trend(0, Reading::Ready(Temp(Some(10.3)))).unwrap();
        store.set_with_trend(0, Reading::Ready(Temp(Some(10.1)))).unwrap();
        assert_eq!(store.snapshot().trend, Trend::Falling);
    }
}
