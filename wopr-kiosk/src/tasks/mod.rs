//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod refresh;
pub mod ui;

pub use refresh::refresh_task;
pub use ui::{ui_task, UiContext};
