//! Per-source fetch worker threads
//!
//! The refresh task marks a source in flight and pokes its worker; the
//! worker runs the blocking fetch and posts the result to
//! [`FETCH_DONE`](crate::channels::FETCH_DONE).

use std::io;
use std::sync::mpsc;
use std::thread;

use log::{debug, error};

use wopr_core::{Fetch, FetchError};

use super::payload::JsonPayload;
use crate::channels::FETCH_DONE;

/// Result of one fetch attempt
#[derive(Debug)]
pub struct FetchDone {
    /// Source index
    pub index: usize,
    pub result: Result<JsonPayload, FetchError>,
}

/// Handle used to start a fetch on a source's worker thread
#[derive(Debug)]
pub struct FetchWorker {
    tx: mpsc::Sender<()>,
}

impl FetchWorker {
    /// Ask the worker to fetch once
    ///
    /// Returns false if the worker thread is gone.
    pub fn dispatch(&self) -> bool {
        self.tx.send(()).is_ok()
    }
}

/// Start the worker thread for one source
pub fn spawn_worker(
    index: usize,
    name: &str,
    fetcher: Box<dyn Fetch<JsonPayload> + Send>,
) -> io::Result<FetchWorker> {
    let (tx, rx) = mpsc::channel::<()>();
    let thread_name = format!("fetch-{}", name);

    thread::Builder::new().name(thread_name).spawn(move || {
        while rx.recv().is_ok() {
            let result = fetcher.fetch();
            debug!("source {} fetch finished (ok: {})", index, result.is_ok());

            // At most one fetch per source is in flight and the channel
            // holds one slot per source, so this only fails on a logic error
            if FETCH_DONE.try_send(FetchDone { index, result }).is_err() {
                error!("Completion queue full, dropping result of source {}", index);
            }
        }
    })?;

    Ok(FetchWorker { tx })
}
