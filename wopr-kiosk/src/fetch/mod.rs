//! Data source fetchers
//!
//! Every source is fetched by running an external command that prints one
//! JSON document. Each source gets its own worker thread so a slow or hung
//! fetch never holds up the others or the executor.

pub mod command;
pub mod payload;
pub mod worker;

pub use command::{CommandConfig, CommandSource, DEFAULT_TEMPERATURE_FIELD, DEFAULT_TIMEOUT_S};
pub use payload::JsonPayload;
pub use worker::{spawn_worker, FetchDone, FetchWorker};
