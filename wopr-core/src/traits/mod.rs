//! Collaborator traits
//!
//! These traits define the interface between the refresh/power logic
//! and the host-specific implementations that talk to the outside world.

pub mod fetch;
pub mod power;

pub use fetch::{Fetch, FetchError, Payload};
pub use power::{PowerSwitch, PowerWriteError};
