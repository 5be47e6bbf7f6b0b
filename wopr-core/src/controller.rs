//! UI controller coordinating power, input and views
//!
//! The controller is the UI side's single piece of state:
//! - Feeds presses to the wake path or to double-tap recognition
//! - Tracks idle time for the power timeout
//! - Runs the power state machine once per UI tick
//! - Plays the boot sequence and the wake greeting without blocking the tick
//! - Produces the edge-triggered backlight requests
//!
//! It never touches the state store; the renderer pairs a store snapshot
//! with [`UiState`] itself.

use crate::clock::Millis;
use crate::config::{Name, PowerConfig};
use crate::greeting::{BootFrame, BootScript, GreetingFrame, GreetingScript};
use crate::input::{GestureState, InputEvent};
use crate::power::{ActivityClock, PowerEvent, PowerOutput, PowerState};
use crate::views::ViewRotation;

/// What an input event did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// Display was off and has been woken
    Woke,
    /// Double tap moved to the view at this index
    ViewChanged(usize),
    /// Activity recorded, nothing else changed
    Ignored,
    /// Quit requested
    Quit,
}

/// What a UI tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// State before the tick
    pub previous: PowerState,
    /// State after the tick
    pub state: PowerState,
    /// Level to hand to the power primitive, only on change
    pub power_edge: Option<bool>,
}

impl TickOutcome {
    pub fn changed(&self) -> bool {
        self.previous != self.state
    }
}

/// Everything the renderer needs besides the store snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiState {
    pub display_on: bool,
    pub override_active: bool,
    pub view_index: usize,
    /// Boot frame while the boot sequence plays
    pub boot: Option<BootFrame>,
    /// Greeting frame while the greeting plays
    pub greeting: Option<GreetingFrame>,
}

/// UI controller
#[derive(Debug, Clone)]
pub struct Controller {
    /// Current power state
    power: PowerState,
    /// Last level requested from the backlight
    output: PowerOutput,
    /// Idle tracking
    activity: ActivityClock,
    /// Double-tap recognition
    gesture: GestureState,
    /// Current view
    views: ViewRotation,
    /// Idle time before the override ends or the display blanks
    timeout_ms: Millis,
    /// Play the greeting on wake
    wake_greeting: bool,
    /// Start of the running greeting
    greeting_started_ms: Option<Millis>,
    /// Start of the boot sequence, until it has played
    boot_started_ms: Option<Millis>,
    /// A wake happened since the last tick; the rest of that input batch is dropped
    woke_this_tick: bool,
}

impl Controller {
    /// Create a controller in the power-on state (lit, override held)
    pub fn new(power: &PowerConfig, views: &[Name], now: Millis) -> Self {
        Self {
            power: PowerState::INITIAL,
            output: PowerOutput::new(),
            activity: ActivityClock::new(now),
            gesture: GestureState::new(),
            views: ViewRotation::new(views),
            timeout_ms: power.backlight_timeout_ms(),
            wake_greeting: power.wake_greeting,
            greeting_started_ms: None,
            boot_started_ms: Some(now),
            woke_this_tick: false,
        }
    }

    /// Get current power state
    pub fn state(&self) -> PowerState {
        self.power
    }

    pub fn view_index(&self) -> usize {
        self.views.index()
    }

    /// Name of the current view
    pub fn view_name(&self) -> &str {
        self.views.current()
    }

    /// Time since the last recognized input
    pub fn idle_ms(&self, now: Millis) -> Millis {
        self.activity.idle_ms(now)
    }

    /// Process one normalized input event
    ///
    /// Every press counts as activity. While off, a press wakes the display
    /// and never reaches gesture recognition, and neither do the other
    /// presses handled before the next tick. During the boot sequence and
    /// the greeting presses only count as activity.
    pub fn handle_input(&mut self, event: InputEvent, now: Millis) -> InputOutcome {
        match event {
            InputEvent::Quit => InputOutcome::Quit,
            InputEvent::Press => {
                self.activity.record(now);

                match self.power {
                    PowerState::Off => {
                        self.wake(now);
                        InputOutcome::Woke
                    }
                    _ if self.woke_this_tick || self.boot_started_ms.is_some() => {
                        InputOutcome::Ignored
                    }
                    PowerState::Greeting => InputOutcome::Ignored,
                    PowerState::Scheduled | PowerState::Override => {
                        if self.gesture.press(now) {
                            InputOutcome::ViewChanged(self.views.advance())
                        } else {
                            InputOutcome::Ignored
                        }
                    }
                }
            }
        }
    }

    fn wake(&mut self, now: Millis) {
        self.woke_this_tick = true;
        self.power = self.power.transition(PowerEvent::WakeTouch);
        if self.wake_greeting {
            self.greeting_started_ms = Some(now);
        } else {
            self.power = self.power.transition(PowerEvent::GreetingFinished);
        }
    }

    /// Advance power state by one UI tick
    pub fn tick(&mut self, now: Millis, in_window: bool) -> TickOutcome {
        let previous = self.power;
        self.woke_this_tick = false;

        if let Some(started) = self.boot_started_ms {
            if BootScript::frame_at(now.saturating_sub(started)).finished {
                self.boot_started_ms = None;
            }
        }

        if let Some(started) = self.greeting_started_ms {
            if GreetingScript::frame_at(now.saturating_sub(started)).finished {
                self.greeting_started_ms = None;
                self.power = self.power.transition(PowerEvent::GreetingFinished);
            }
        }

        self.power = self.power.transition(PowerEvent::Tick {
            idle_ms: self.activity.idle_ms(now),
            in_window,
            timeout_ms: self.timeout_ms,
        });

        TickOutcome {
            previous,
            state: self.power,
            power_edge: self.output.update(self.power.display_on()),
        }
    }

    /// Level to restore on shutdown, if it differs from the last request
    pub fn shutdown_edge(&mut self) -> Option<bool> {
        self.output.update(true)
    }

    /// Snapshot of the UI-side state for rendering
    pub fn ui_state(&self, now: Millis) -> UiState {
        UiState {
            display_on: self.power.display_on(),
            override_active: self.power.override_active(),
            view_index: self.views.index(),
            boot: self
                .boot_started_ms
                .map(|started| BootScript::frame_at(now.saturating_sub(started))),
            greeting: self
                .greeting_started_ms
                .map(|started| GreetingScript::frame_at(now.saturating_sub(started))),
        }
    }
}
