//! Frame sinks
//!
//! Drawing pixels is outside the kiosk runtime. What it produces is a
//! [`Frame`]: a store snapshot paired with the UI state, handed to each
//! configured sink whenever it changes.

pub mod json;
pub mod logger;

use heapless::Vec;
use serde::Serialize;

use wopr_core::config::MAX_SOURCES;
use wopr_core::store::{Snapshot, SourceReading};
use wopr_core::UiState;

use crate::fetch::JsonPayload;

pub use self::json::JsonFileSink;
pub use self::logger::LogSink;

/// Frame sink errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// Output could not be written
    #[error("write failed: {0}")]
    Io(String),
    /// Frame could not be encoded
    #[error("encode failed: {0}")]
    Encode(String),
}

/// Boot text visible in this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BootText {
    pub title: &'static str,
    pub message: &'static str,
}

/// Greeting text visible in this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GreetingText {
    pub line1: &'static str,
    pub line2: &'static str,
}

/// Everything drawn in one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub display_on: bool,
    pub override_active: bool,
    pub view: String,
    pub view_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boot: Option<BootText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub greeting: Option<GreetingText>,
    pub trend: &'static str,
    pub trend_glyph: &'static str,
    pub revision: u64,
    pub sources: Vec<SourceReading<JsonPayload>, MAX_SOURCES>,
}

impl Frame {
    pub fn new(snapshot: Snapshot<JsonPayload>, ui: &UiState, view: &str) -> Self {
        Self {
            display_on: ui.display_on,
            override_active: ui.override_active,
            view: view.to_string(),
            view_index: ui.view_index,
            boot: ui.boot.map(|b| BootText {
                title: b.title(),
                message: b.message(),
            }),
            greeting: ui.greeting.map(|g| GreetingText {
                line1: g.line1(),
                line2: g.line2(),
            }),
            trend: snapshot.trend.as_str(),
            trend_glyph: snapshot.trend.glyph(),
            revision: snapshot.revision,
            sources: snapshot.sources,
        }
    }
}

/// Frame consumer
///
/// Implementations decide for themselves what changed and whether to
/// output anything.
pub trait FrameSink {
    /// Short name for log messages
    fn name(&self) -> &str;

    /// Consume one frame
    fn render(&mut self, frame: &Frame) -> Result<(), RenderError>;
}
