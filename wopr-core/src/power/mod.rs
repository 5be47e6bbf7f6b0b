//! Display power management
//!
//! The display is either lit on the daily schedule, lit by an explicit
//! wake (override), playing the wake greeting, or off. Transitions are a
//! pure function of the current state and an event; the edge-triggered
//! output and the idle clock live alongside.

pub mod activity;
pub mod events;
pub mod machine;
pub mod output;

pub use activity::ActivityClock;
pub use events::PowerEvent;
pub use machine::PowerState;
pub use output::PowerOutput;
