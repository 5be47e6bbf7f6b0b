//! Input event types

/// Raw events delivered by input devices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    /// Finger touched the panel
    TouchDown,
    /// Mouse button pressed
    MouseDown,
    /// Quit key pressed (`q` or `Esc`)
    QuitKey,
}

/// Normalized input seen by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Any press, touch or mouse
    Press,
    /// End the kiosk
    Quit,
}

impl From<PointerEvent> for InputEvent {
    fn from(event: PointerEvent) -> Self {
        match event {
            PointerEvent::TouchDown | PointerEvent::MouseDown => InputEvent::Press,
            PointerEvent::QuitKey => InputEvent::Quit,
        }
    }
}
