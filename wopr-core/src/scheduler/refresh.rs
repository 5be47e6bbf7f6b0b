//! Per-source refresh cadence evaluation
//!
//! Manages the refresh cursors of all configured sources. Each pass picks
//! the sources that are due, marks them in flight, and later applies the
//! fetch results to the state store.

use heapless::Vec;

use super::cursor::RefreshCursor;
use super::flags::ForceFlags;
use crate::clock::Millis;
use crate::config::{SourceConfig, MAX_SOURCES};
use crate::store::{Reading, StateStore, StoreError};
use crate::traits::{Fetch, FetchError, Payload};

/// Period between scheduler passes
pub const SCHEDULER_TICK_MS: Millis = 1_000;

/// Source indices picked by one pass
pub type DueList = Vec<usize, MAX_SOURCES>;

/// Refresh scheduler
#[derive(Debug, Clone)]
pub struct RefreshScheduler {
    sources: Vec<SourceConfig, MAX_SOURCES>,
    cursors: Vec<RefreshCursor, MAX_SOURCES>,
}

impl RefreshScheduler {
    /// Create a scheduler with every source never refreshed
    pub fn new(sources: &[SourceConfig]) -> Self {
        let mut s = Vec::new();
        let mut cursors = Vec::new();
        for source in sources.iter().take(MAX_SOURCES) {
            let _ = s.push(source.clone());
            let _ = cursors.push(RefreshCursor::new());
        }
        Self {
            sources: s,
            cursors,
        }
    }

    pub fn sources(&self) -> &[SourceConfig] {
        &self.sources
    }

    pub fn source(&self, index: usize) -> Option<&SourceConfig> {
        self.sources.get(index)
    }

    pub fn cursor(&self, index: usize) -> Option<&RefreshCursor> {
        self.cursors.get(index)
    }

    /// Number of fetches currently running
    pub fn in_flight(&self) -> usize {
        self.cursors.iter().filter(|c| c.in_flight()).count()
    }

    /// Evaluate one pass
    ///
    /// A source is due when its effective interval has elapsed or the pass
    /// is forced. Sources gated off by display power and sources with a
    /// fetch already running are skipped even when forced. Every returned
    /// source is marked in flight as of `now`.
    pub fn due(&mut self, now: Millis, display_on: bool, forced: bool) -> DueList {
        let mut due = DueList::new();

        for (index, (source, cursor)) in self
            .sources
            .iter()
            .zip(self.cursors.iter_mut())
            .enumerate()
        {
            if cursor.in_flight() {
                continue;
            }
            let Some(interval_ms) = source.effective_interval_ms(display_on) else {
                continue;
            };

            if forced || cursor.elapsed(now, interval_ms) {
                cursor.dispatch(now);
                let _ = due.push(index);
            }
        }

        due
    }

    /// Apply a finished fetch
    ///
    /// The result replaces the source's reading (a failure included) and
    /// the cursor records the attempt at its dispatch time. The
    /// temperature-tracking source also feeds the trend in the same write.
    pub fn complete<V: Payload>(
        &mut self,
        index: usize,
        result: Result<V, FetchError>,
        store: &StateStore<V>,
    ) -> Result<(), StoreError> {
        let source = self
            .sources
            .get(index)
            .ok_or(StoreError::UnknownIndex(index))?;
        let cursor = self
            .cursors
            .get_mut(index)
            .ok_or(StoreError::UnknownIndex(index))?;

        cursor.finish();

        let reading = Reading::from(result);
        if source.tracks_temperature {
            store.set_with_trend(index, reading)
        } else {
            store.set(index, reading)
        }
    }

    /// Run one complete pass inline, fetching each due source in turn
    ///
    /// `fetchers` is indexed like the configured sources. Returns the
    /// number of sources refreshed.
    pub fn run_pass<V, F>(
        &mut self,
        now: Millis,
        display_on: bool,
        flags: &ForceFlags,
        fetchers: &[F],
        store: &StateStore<V>,
    ) -> usize
    where
        V: Payload,
        F: Fetch<V>,
    {
        let forced = flags.take();
        let due = self.due(now, display_on, forced);

        for &index in &due {
            let result = match fetchers.get(index) {
                Some(fetcher) => fetcher.fetch(),
                None => Err(FetchError::Unconfigured(alloc::string::String::from(
                    self.sources[index].name.as_str(),
                ))),
            };
            let _ = self.complete(index, result, store);
        }

        due.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trend::Trend;
    use core::cell::Cell;

    #[derive(Debug, Clone, PartialEq)]
    struct Value(Option<f32>);

    impl Payload for Value {
        fn temperature(&self) -> Option<f32> {
            self.0
        }
    }

    /// Counts calls and returns a fixed result
    struct Counting {
        calls: Cell<u32>,
        fail: bool,
        temp: Cell<f32>,
    }

    impl Counting {
        fn ok() -> Self {
            Self {
                calls: Cell::new(0),
                fail: false,
                temp: Cell::new(10.0),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::ok()
            }
        }
    }

    impl Fetch<Value> for Counting {
        fn fetch(&self) -> Result<Value, FetchError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                Err(FetchError::Status(1))
            } else {
                let t = self.temp.get();
                self.temp.set(t + 0.2);
                Ok(Value(Some(t)))
            }
        }
    }

    fn sources() -> [SourceConfig; 3] {
        [
            SourceConfig::new("weather", 300)
                .unwrap()
                .display_on_only()
                .tracking_temperature(),
            SourceConfig::new("transit", 20).unwrap().with_interval_off(40),
            SourceConfig::new("prices", 600).unwrap(),
        ]
    }

    fn setup() -> (RefreshScheduler, StateStore<Value>, ForceFlags) {
        let sources = sources();
        (
            RefreshScheduler::new(&sources),
            StateStore::new(&sources),
            ForceFlags::new(),
        )
    }

    fn calls(fetchers: &[Counting]) -> [u32; 3] {
        [
            fetchers[0].calls.get(),
            fetchers[1].calls.get(),
            fetchers[2].calls.get(),
        ]
    }

    #[test]
    fn test_initial_pass_fetches_everything() {
        let (mut sched, store, flags) = setup();
        let fetchers = [Counting::ok(), Counting::ok(), Counting::ok()];

        assert_eq!(sched.run_pass(0, true, &flags, &fetchers, &store), 3);
        assert_eq!(calls(&fetchers), [1, 1, 1]);
        assert!(store.snapshot().sources.iter().all(|s| s.reading.value().is_some()));
    }

    #[test]
    fn test_no_fetch_before_interval() {
        let (mut sched, store, flags) = setup();
        let fetchers = [Counting::ok(), Counting::ok(), Counting::ok()];
        sched.run_pass(0, true, &flags, &fetchers, &store);

        for now in (1_000..20_000).step_by(1_000) {
            assert_eq!(sched.run_pass(now, true, &flags, &fetchers, &store), 0);
        }
        assert_eq!(calls(&fetchers), [1, 1, 1]);

        // Transit is due again at exactly 20 s
        assert_eq!(sched.run_pass(20_000, true, &flags, &fetchers, &store), 1);
        assert_eq!(calls(&fetchers), [1, 2, 1]);
    }

    #[test]
    fn test_off_interval_and_gating() {
        let (mut sched, store, flags) = setup();
        let fetchers = [Counting::ok(), Counting::ok(), Counting::ok()];
        sched.run_pass(0, true, &flags, &fetchers, &store);

        // Display off: transit slows to 40 s, weather never refreshes
        sched.run_pass(20_000, false, &flags, &fetchers, &store);
        assert_eq!(calls(&fetchers), [1, 1, 1]);
        sched.run_pass(40_000, false, &flags, &fetchers, &store);
        assert_eq!(calls(&fetchers), [1, 2, 1]);
        sched.run_pass(600_000, false, &flags, &fetchers, &store);
        assert_eq!(calls(&fetchers), [1, 3, 2]);
    }

    #[test]
    fn test_force_refreshes_once() {
        let (mut sched, store, flags) = setup();
        let fetchers = [Counting::ok(), Counting::ok(), Counting::ok()];
        sched.run_pass(0, true, &flags, &fetchers, &store);

        flags.request();
        assert_eq!(sched.run_pass(1_000, true, &flags, &fetchers, &store), 3);
        assert!(!flags.pending());
        assert_eq!(sched.run_pass(2_000, true, &flags, &fetchers, &store), 0);
        assert_eq!(calls(&fetchers), [2, 2, 2]);
    }

    #[test]
    fn test_force_respects_display_gating() {
        let (mut sched, store, flags) = setup();
        let fetchers = [Counting::ok(), Counting::ok(), Counting::ok()];

        // Initial pass while off skips the display-only source
        assert_eq!(sched.run_pass(0, false, &flags, &fetchers, &store), 2);
        assert_eq!(calls(&fetchers), [0, 1, 1]);
        assert_eq!(store.get("weather"), Some(Reading::Loading));
    }

    #[test]
    fn test_failure_counts_as_refresh() {
        let (mut sched, store, flags) = setup();
        let fetchers = [Counting::ok(), Counting::failing(), Counting::ok()];
        sched.run_pass(0, true, &flags, &fetchers, &store);

        assert_eq!(
            store.get("transit"),
            Some(Reading::Failed(FetchError::Status(1)))
        );
        assert_eq!(sched.cursor(1).unwrap().last_refresh_ms, Some(0));
        // Retried on normal cadence, not sooner
        sched.run_pass(10_000, true, &flags, &fetchers, &store);
        assert_eq!(fetchers[1].calls.get(), 1);
        sched.run_pass(20_000, true, &flags, &fetchers, &store);
        assert_eq!(fetchers[1].calls.get(), 2);
        // Other sources unaffected
        assert!(store.get("prices").unwrap().value().is_some());
    }

    #[test]
    fn test_in_flight_not_redispatched() {
        let (mut sched, store, _) = setup();

        let due = sched.due(0, true, true);
        assert_eq!(due.as_slice(), &[0, 1, 2]);
        assert_eq!(sched.in_flight(), 3);

        // Transit hangs; later passes (forced or not) skip it
        sched.complete(0, Ok(Value(None)), &store).unwrap();
        sched.complete(2, Ok(Value(None)), &store).unwrap();
        assert_eq!(sched.due(30_000, true, false).as_slice(), &[] as &[usize]);
        assert_eq!(sched.due(31_000, true, true).as_slice(), &[0, 2]);

        sched.complete(1, Ok(Value(None)), &store).unwrap();
        // Last refresh is the dispatch time, so it is due straight away
        assert_eq!(sched.cursor(1).unwrap().last_refresh_ms, Some(0));
        assert_eq!(sched.due(32_000, true, false).as_slice(), &[1]);
    }

    #[test]
    fn test_trend_tracked_for_weather_only() {
        let (mut sched, store, flags) = setup();
        let fetchers = [Counting::ok(), Counting::ok(), Counting::ok()];

        // 10.0, 10.2, 10.4 -> rising by 0.4
        for pass in 0..3 {
            flags.request();
            sched.run_pass(pass * 1_000, true, &flags, &fetchers, &store);
        }
        assert_eq!(store.snapshot().trend, Trend::Rising);
    }

    #[test]
    fn test_complete_unknown_index() {
        let (mut sched, store, _) = setup();
        assert_eq!(
            sched.complete(9, Ok(Value(None)), &store),
            Err(StoreError::UnknownIndex(9))
        );
    }
}
