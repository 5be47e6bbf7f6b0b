//! Configuration types
//!
//! Board-agnostic configuration structures. Reading them from disk is the
//! host's job.

pub mod types;

pub use types::*;
