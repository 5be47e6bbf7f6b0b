//! Input devices
//!
//! Reads Linux evdev devices on blocking threads and forwards recognized
//! events to [`INPUT_CHANNEL`](crate::channels::INPUT_CHANNEL).

pub mod evdev;
pub mod reader;

pub use reader::spawn_reader;
