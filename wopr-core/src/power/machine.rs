//! Display power state machine

use super::events::PowerEvent;

/// Display power states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    /// Lit, following the daily windows and idle timeout
    Scheduled,
    /// Lit by an explicit wake until the idle timeout passes
    Override,
    /// Lit, override held, wake greeting playing
    Greeting,
    /// Backlight off
    Off,
}

impl PowerState {
    /// Power-on state: lit with the override held
    pub const INITIAL: Self = PowerState::Override;

    /// Check if the display is energized
    pub fn display_on(&self) -> bool {
        !matches!(self, PowerState::Off)
    }

    /// Check if the idle override is held
    pub fn override_active(&self) -> bool {
        matches!(self, PowerState::Override | PowerState::Greeting)
    }

    /// Check if the wake greeting is playing
    pub fn in_greeting(&self) -> bool {
        matches!(self, PowerState::Greeting)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: PowerEvent) -> Self {
        use PowerEvent::*;
        use PowerState::*;

        match (self, event) {
            // Override ends on idle; the display stays lit this tick and the
            // schedule takes over from the next one
            (
                Override,
                Tick {
                    idle_ms,
                    timeout_ms,
                    ..
                },
            ) if idle_ms > timeout_ms => Scheduled,

            // Scheduled: windows force the display on, otherwise it blanks
            // once idle
            (Scheduled, Tick { in_window: true, .. }) => Scheduled,
            (
                Scheduled,
                Tick {
                    idle_ms,
                    timeout_ms,
                    ..
                },
            ) if idle_ms > timeout_ms => Off,

            // Off: a window relights the display, a touch wakes it
            (Off, Tick { in_window: true, .. }) => Scheduled,
            (Off, WakeTouch) => Greeting,

            // Greeting runs to completion regardless of ticks
            (Greeting, GreetingFinished) => Override,

            // Default: stay in current state
            _ => self,
        }
    }
}
