//! Refresh scheduler
//!
//! Decides once per tick which sources are due, tracks in-flight fetches
//! and applies their results to the state store.

pub mod cursor;
pub mod flags;
pub mod refresh;

pub use cursor::RefreshCursor;
pub use flags::ForceFlags;
pub use refresh::{DueList, RefreshScheduler, SCHEDULER_TICK_MS};
