//! Input handling
//!
//! Raw pointer events are normalized into presses; presses drive the wake
//! path and double-tap view rotation.

pub mod events;
pub mod gesture;

pub use events::{InputEvent, PointerEvent};
pub use gesture::{GestureState, DOUBLE_TAP_WINDOW_MS};
