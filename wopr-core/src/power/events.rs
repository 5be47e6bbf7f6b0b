//! Events that drive display power transitions

use crate::clock::Millis;

/// Events that can trigger power transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerEvent {
    /// Periodic UI tick
    Tick {
        /// Time since the last recognized input
        idle_ms: Millis,
        /// Local time is inside a daily on-window
        in_window: bool,
        /// Idle time after which the display may blank
        timeout_ms: Millis,
    },
    /// Press received while the display is off
    WakeTouch,
    /// Wake greeting played to the end
    GreetingFinished,
}
