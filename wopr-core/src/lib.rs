//! Board-agnostic core logic for the WOPR kiosk
//!
//! This crate contains all application logic that does not depend on
//! the host it runs on:
//!
//! - Collaborator traits (data source fetchers, backlight power switch)
//! - Refresh scheduler with per-source cadences and one-shot force flags
//! - Shared state store read by the renderer
//! - Temperature trend history
//! - Display power state machine and idle tracking
//! - Touch gesture recognition and view rotation
//! - Wake greeting timeline
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod clock;
pub mod config;
pub mod controller;
pub mod greeting;
pub mod input;
pub mod power;
pub mod scheduler;
pub mod store;
pub mod traits;
pub mod trend;
pub mod views;

pub use controller::{Controller, InputOutcome, TickOutcome, UiState};
pub use store::{Reading, Snapshot, StateStore};
pub use traits::{Fetch, FetchError, Payload, PowerSwitch};
