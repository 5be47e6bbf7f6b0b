//! Log frame sink

use log::info;

use super::{Frame, FrameSink, RenderError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Seen {
    display_on: bool,
    view_index: usize,
    boot: bool,
    greeting: bool,
    revision: u64,
}

/// Logs power, view and greeting changes
#[derive(Debug, Default)]
pub struct LogSink {
    last: Option<Seen>,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameSink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    fn render(&mut self, frame: &Frame) -> Result<(), RenderError> {
        let seen = Seen {
            display_on: frame.display_on,
            view_index: frame.view_index,
            boot: frame.boot.is_some(),
            greeting: frame.greeting.is_some(),
            revision: frame.revision,
        };
        let last = self.last.replace(seen);

        if last.map(|l| l.display_on) != Some(seen.display_on) {
            info!("Display {}", if seen.display_on { "on" } else { "off" });
        }
        if last.map(|l| l.view_index) != Some(seen.view_index) {
            info!("Showing view {} ({})", frame.view, frame.view_index);
        }
        if last.is_some_and(|l| l.boot && !seen.boot) {
            info!("Boot sequence finished");
        }
        if last.map(|l| l.greeting) != Some(seen.greeting) && seen.greeting {
            info!("Greeting started");
        }
        if last.is_some_and(|l| l.greeting && !seen.greeting) {
            info!("Greeting finished");
        }
        if last.map(|l| l.revision) != Some(seen.revision) {
            let failed = frame
                .sources
                .iter()
                .filter(|s| s.reading.error().is_some())
                .count();
            info!(
                "Data revision {}: {} sources, {} failing, trend {}",
                frame.revision,
                frame.sources.len(),
                failed,
                if frame.trend.is_empty() { "-" } else { frame.trend }
            );
        }
        Ok(())
    }
}
