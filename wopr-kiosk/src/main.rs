//! WOPR - Always-on information kiosk
//!
//! Host runtime for a Linux touch panel showing transit, flight, weather
//! and price boards. Two Embassy tasks share the state store: the refresh
//! task keeps every source current on its own cadence, the UI task runs
//! display power, touch input and frame production.
//!
//! Named after the War Operation Plan Response terminal, whose greeting
//! the kiosk replays whenever someone wakes the panel.

mod backlight;
mod channels;
mod clock;
mod config;
mod fetch;
mod input;
mod render;
mod tasks;

#[cfg(test)]
#[path = "../build_support.rs"]
mod build_support;

use embassy_executor::Spawner;
use embassy_time::Instant;
use log::{error, info, warn};
use static_cell::StaticCell;

use wopr_core::scheduler::RefreshScheduler;
use wopr_core::{Controller, StateStore};

use crate::config::{load_config, ConfigSource, CONFIG_ENV};
use crate::fetch::{spawn_worker, CommandSource, JsonPayload};
use crate::input::spawn_reader;
use crate::render::{FrameSink, JsonFileSink, LogSink};
use crate::tasks::UiContext;

/// Exit status for configuration errors
const EXIT_CONFIG: i32 = 2;

// Shared between the refresh and UI tasks for the life of the process
static STORE: StaticCell<StateStore<JsonPayload>> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("WOPR kiosk starting...");

    let source = ConfigSource::resolve(std::env::args().nth(1), std::env::var(CONFIG_ENV).ok());
    let settings = match load_config(&source) {
        Ok(settings) => settings,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    let kiosk = &settings.kiosk;

    let store: &'static StateStore<JsonPayload> = STORE.init(StateStore::new(&kiosk.sources));

    // One blocking worker per source
    let workers = kiosk
        .sources
        .iter()
        .zip(&settings.commands)
        .enumerate()
        .map(|(index, (source, command))| {
            let fetcher = Box::new(CommandSource::new(&source.name, command.clone()));
            spawn_worker(index, &source.name, fetcher)
                .map_err(|e| error!("Cannot start fetch worker for {}: {}", source.name, e))
                .ok()
        })
        .collect::<Vec<_>>();

    // Input readers
    if settings.input_devices.is_empty() {
        warn!("No input devices configured");
    }
    for device in &settings.input_devices {
        if let Err(e) = spawn_reader(device) {
            warn!("Cannot open input device {}: {}", device.display(), e);
        }
    }

    // Frame sinks
    let mut sinks: Vec<Box<dyn FrameSink + Send>> = vec![Box::new(LogSink::new())];
    if let Some(path) = &settings.snapshot_path {
        info!("Writing frames to {}", path.display());
        sinks.push(Box::new(JsonFileSink::new(path)));
    }

    let backlight = backlight::from_config(settings.backlight_path.as_deref());
    let controller = Controller::new(&kiosk.power, &kiosk.views, Instant::now().as_millis());

    spawner
        .spawn(tasks::refresh_task(
            store,
            RefreshScheduler::new(&kiosk.sources),
            workers,
        ))
        .unwrap();
    spawner
        .spawn(tasks::ui_task(UiContext {
            store,
            controller,
            windows: kiosk.power.windows.clone(),
            tick_ms: kiosk.ui_tick_ms,
            backlight,
            sinks,
        }))
        .unwrap();

    info!("All tasks spawned");
}
