//! UI tick task
//!
//! Runs every `ui_tick_ms`:
//! - Drains input collected since the previous tick
//! - Advances the power state machine and drives the backlight on edges
//! - Publishes display power for the refresh task
//! - Hands a frame to the sinks when anything visible changed
//!
//! Never waits on a fetch; the store lock is held only for the snapshot.

use embassy_time::{Duration, Instant, Ticker};
use heapless::Vec as HVec;
use log::{debug, info, warn};

use wopr_core::clock::{in_any_window, Millis, TimeWindow, WallClockMonitor};
use wopr_core::config::MAX_WINDOWS;
use wopr_core::input::PointerEvent;
use wopr_core::traits::PowerSwitch;
use wopr_core::{Controller, InputOutcome, StateStore, UiState};

use crate::channels::{publish_display_on, request_force_refresh, INPUT_CHANNEL};
use crate::clock::local_now;
use crate::fetch::JsonPayload;
use crate::render::{Frame, FrameSink};

/// Everything the UI task owns
pub struct UiContext {
    pub store: &'static StateStore<JsonPayload>,
    pub controller: Controller,
    pub windows: HVec<TimeWindow, MAX_WINDOWS>,
    pub tick_ms: u32,
    pub backlight: Box<dyn PowerSwitch + Send>,
    pub sinks: Vec<Box<dyn FrameSink + Send>>,
}

/// UI task - power, input and frame production
#[embassy_executor::task]
pub async fn ui_task(ctx: UiContext) {
    info!("UI task started ({} ms tick)", ctx.tick_ms);

    let UiContext {
        store,
        mut controller,
        windows,
        tick_ms,
        mut backlight,
        mut sinks,
    } = ctx;

    let mut ticker = Ticker::every(Duration::from_millis(tick_ms as u64));
    let mut wall_clock = WallClockMonitor::new();
    let mut last_drawn: Option<(u64, UiState)> = None;

    loop {
        ticker.next().await;
        let now = Instant::now().as_millis();

        // Input batch since the previous tick
        let batch = core::iter::from_fn(|| INPUT_CHANNEL.try_receive().ok());
        let effects = process_batch(&mut controller, batch, now);
        if effects.force_refresh {
            request_force_refresh();
        }
        if effects.quit {
            info!("Quit requested, shutting down");
            if let Some(on) = controller.shutdown_edge() {
                set_backlight(backlight.as_mut(), on);
            }
            std::process::exit(0);
        }

        // Power
        let wall = local_now();
        if let Some(skew) = wall_clock.observe(wall.unix_ms) {
            warn!(
                "Wall clock moved back by {} ms; window checks may be off until it catches up",
                skew.backwards_ms
            );
        }
        let in_window = in_any_window(&windows, wall.time_of_day);
        publish_display_on(advance_power(&mut controller, backlight.as_mut(), now, in_window));

        // Frame
        let ui = controller.ui_state(now);
        let revision = store.revision();
        if last_drawn != Some((revision, ui)) {
            let frame = Frame::new(store.snapshot(), &ui, controller.view_name());
            for sink in sinks.iter_mut() {
                if let Err(e) = sink.render(&frame) {
                    warn!("{} sink: {}", sink.name(), e);
                }
            }
            last_drawn = Some((frame.revision, ui));
        }
    }
}

/// What one input batch asks of the runtime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct BatchEffects {
    /// A wake happened; refresh every eligible source now
    force_refresh: bool,
    /// Quit key seen; later events in the batch were not processed
    quit: bool,
}

/// Feed one batch of input events to the controller
fn process_batch(
    controller: &mut Controller,
    events: impl IntoIterator<Item = PointerEvent>,
    now: Millis,
) -> BatchEffects {
    let mut effects = BatchEffects::default();
    for event in events {
        match controller.handle_input(event.into(), now) {
            InputOutcome::Woke => {
                info!("Display woken by touch");
                effects.force_refresh = true;
            }
            InputOutcome::ViewChanged(index) => {
                debug!("Double tap, view {} ({})", index, controller.view_name());
            }
            InputOutcome::Ignored => {}
            InputOutcome::Quit => {
                effects.quit = true;
                break;
            }
        }
    }
    effects
}

/// Run one power tick, writing the backlight on edges
///
/// Returns whether the display is on, for publishing to the refresh task.
fn advance_power(
    controller: &mut Controller,
    backlight: &mut (dyn PowerSwitch + Send),
    now: Millis,
    in_window: bool,
) -> bool {
    let out = controller.tick(now, in_window);
    if out.changed() {
        info!("Power {:?} -> {:?}", out.previous, out.state);
    }
    if let Some(on) = out.power_edge {
        set_backlight(backlight, on);
    }
    out.state.display_on()
}

/// Best-effort backlight write; failures are logged and otherwise ignored
fn set_backlight(backlight: &mut (dyn PowerSwitch + Send), on: bool) {
    match backlight.set_power(on) {
        Ok(()) => debug!("Backlight {}", if on { "on" } else { "off" }),
        Err(e) => warn!("Backlight: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wopr_core::config::{make_name, PowerConfig};
    use wopr_core::greeting::BootScript;
    use wopr_core::power::PowerState;
    use wopr_core::traits::PowerWriteError;

    const TIMEOUT_MS: Millis = 60_000;

    /// Backlight that records every write
    #[derive(Default)]
    struct Recorder {
        writes: std::vec::Vec<bool>,
    }

    impl PowerSwitch for Recorder {
        fn set_power(&mut self, on: bool) -> Result<(), PowerWriteError> {
            self.writes.push(on);
            Ok(())
        }
    }

    fn controller(wake_greeting: bool) -> Controller {
        let power = PowerConfig {
            backlight_timeout_s: 60,
            wake_greeting,
            ..PowerConfig::default()
        };
        let views = [make_name("transit").unwrap(), make_name("flights").unwrap()];
        Controller::new(&power, &views, 0)
    }

    /// Idle the controller until the display is off
    fn sleeping(wake_greeting: bool, backlight: &mut Recorder) -> Controller {
        let mut c = controller(wake_greeting);
        assert!(advance_power(&mut c, backlight, 0, false));
        advance_power(&mut c, backlight, BootScript::duration_ms(), false);
        advance_power(&mut c, backlight, TIMEOUT_MS + 1_000, false);
        assert!(!advance_power(&mut c, backlight, TIMEOUT_MS + 1_050, false));
        assert_eq!(c.state(), PowerState::Off);
        c
    }

    #[test]
    fn test_backlight_written_on_edges_only() {
        let mut backlight = Recorder::default();
        let _ = sleeping(true, &mut backlight);
        assert_eq!(backlight.writes, [true, false]);
    }

    #[test]
    fn test_wake_requests_forced_refresh() {
        let mut backlight = Recorder::default();
        let mut c = sleeping(false, &mut backlight);
        let now = TIMEOUT_MS + 2_000;

        let batch = [
            PointerEvent::TouchDown,
            PointerEvent::TouchDown,
            PointerEvent::MouseDown,
        ];
        let effects = process_batch(&mut c, batch, now);
        assert_eq!(
            effects,
            BatchEffects {
                force_refresh: true,
                quit: false
            }
        );
        // The rest of the waking batch never reaches double-tap recognition
        assert_eq!(c.view_index(), 0);

        assert!(advance_power(&mut c, &mut backlight, now + 50, false));
        assert_eq!(backlight.writes, [true, false, true]);
    }

    #[test]
    fn test_presses_while_on_do_not_force_refresh() {
        let mut backlight = Recorder::default();
        let mut c = controller(true);
        advance_power(&mut c, &mut backlight, BootScript::duration_ms(), false);

        let now = BootScript::duration_ms() + 100;
        let effects = process_batch(&mut c, [PointerEvent::TouchDown], now);
        assert_eq!(effects, BatchEffects::default());
        let effects = process_batch(&mut c, [PointerEvent::TouchDown], now + 200);
        assert!(!effects.force_refresh);
        assert_eq!(c.view_index(), 1);
    }

    #[test]
    fn test_quit_stops_batch() {
        let mut backlight = Recorder::default();
        let mut c = sleeping(true, &mut backlight);

        let batch = [PointerEvent::QuitKey, PointerEvent::TouchDown];
        let effects = process_batch(&mut c, batch, TIMEOUT_MS + 2_000);
        assert!(effects.quit);
        assert!(!effects.force_refresh);
        assert_eq!(c.state(), PowerState::Off);
    }
}
