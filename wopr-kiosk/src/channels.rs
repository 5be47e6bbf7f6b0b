//! Inter-task communication channels
//!
//! Defines the static channels used between the Embassy tasks and the
//! blocking helper threads (input readers, fetch workers).
//! Uses embassy-sync primitives for safe async communication.

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use wopr_core::config::MAX_SOURCES;
use wopr_core::input::PointerEvent;
use wopr_core::scheduler::ForceFlags;

use crate::fetch::FetchDone;

/// Channel capacity for input events between UI ticks
const INPUT_CHANNEL_SIZE: usize = 32;

/// Raw input events from the reader threads
pub static INPUT_CHANNEL: Channel<CriticalSectionRawMutex, PointerEvent, INPUT_CHANNEL_SIZE> =
    Channel::new();

/// Finished fetches from the worker threads
///
/// One slot per source: a source never has more than one fetch in flight.
pub static FETCH_DONE: Channel<CriticalSectionRawMutex, FetchDone, MAX_SOURCES> = Channel::new();

/// Wakes the refresh task early when a forced refresh is requested
pub static FORCE_SIGNAL: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// One-shot refresh flags (initial refresh pending at startup)
pub static FORCE_FLAGS: ForceFlags = ForceFlags::new();

/// Display power as last decided by the UI task
pub static DISPLAY_ON: AtomicBool = AtomicBool::new(true);

/// Request a forced refresh of all eligible sources
pub fn request_force_refresh() {
    FORCE_FLAGS.request();
    FORCE_SIGNAL.signal(());
}

/// Publish the display power for the refresh task
pub fn publish_display_on(on: bool) {
    DISPLAY_ON.store(on, Ordering::Release);
}

/// Display power as seen by the refresh task
pub fn display_on() -> bool {
    DISPLAY_ON.load(Ordering::Acquire)
}
