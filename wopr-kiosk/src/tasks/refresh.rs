//! Refresh task
//!
//! Sole writer of the state store. Runs a scheduler pass every second
//! (or immediately on a force request), hands due sources to their
//! worker threads and applies completions as they arrive.

use embassy_futures::select::{select3, Either3};
use embassy_time::{Duration, Instant, Ticker};
use log::{debug, info, warn};

use wopr_core::scheduler::{RefreshScheduler, SCHEDULER_TICK_MS};
use wopr_core::{FetchError, StateStore};

use crate::channels::{self, FETCH_DONE, FORCE_FLAGS, FORCE_SIGNAL};
use crate::fetch::{FetchDone, FetchWorker, JsonPayload};

/// Refresh task - drives all data sources
#[embassy_executor::task]
pub async fn refresh_task(
    store: &'static StateStore<JsonPayload>,
    scheduler: RefreshScheduler,
    workers: Vec<Option<FetchWorker>>,
) {
    info!("Refresh task started ({} sources)", scheduler.sources().len());

    let mut scheduler = scheduler;
    let mut ticker = Ticker::every(Duration::from_millis(SCHEDULER_TICK_MS));

    // Initial refresh flag is pending, so this dispatches every eligible source
    run_pass(&mut scheduler, &workers, store);

    loop {
        match select3(ticker.next(), FETCH_DONE.receive(), FORCE_SIGNAL.wait()).await {
            Either3::First(()) | Either3::Third(()) => {
                run_pass(&mut scheduler, &workers, store);
            }
            Either3::Second(done) => {
                apply(&mut scheduler, store, done);
            }
        }
    }
}

/// Evaluate one pass and dispatch every due source
fn run_pass(
    scheduler: &mut RefreshScheduler,
    workers: &[Option<FetchWorker>],
    store: &StateStore<JsonPayload>,
) {
    let now = Instant::now().as_millis();
    let forced = FORCE_FLAGS.take();
    let display_on = channels::display_on();

    let due = scheduler.due(now, display_on, forced);
    if forced {
        info!("Forced refresh: {} sources dispatched", due.len());
    }

    for index in due {
        let name = scheduler
            .source(index)
            .map(|s| s.name.as_str())
            .unwrap_or("?");
        debug!("Dispatching {}", name);

        let sent = workers
            .get(index)
            .and_then(Option::as_ref)
            .is_some_and(FetchWorker::dispatch);
        if !sent {
            warn!("No fetch worker for {}", name);
            let error = FetchError::Transport("fetch worker not running".into());
            if let Err(e) = scheduler.complete(index, Err(error), store) {
                warn!("Store update failed: {}", e);
            }
        }
    }
}

/// Apply a finished fetch to the store
fn apply(scheduler: &mut RefreshScheduler, store: &StateStore<JsonPayload>, done: FetchDone) {
    let name = scheduler
        .source(done.index)
        .map(|s| s.name.as_str())
        .unwrap_or("?");
    match &done.result {
        Ok(_) => debug!("{} refreshed", name),
        Err(e) => warn!("{} fetch failed: {}", name, e),
    }

    if let Err(e) = scheduler.complete(done.index, done.result, store) {
        warn!("Store update failed: {}", e);
    }
}
