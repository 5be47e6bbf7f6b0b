//! Display power trait

use alloc::string::String;

/// Errors writing the display power level
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PowerWriteError {
    /// Power control file could not be written
    #[error("backlight write failed: {0}")]
    Io(String),
}

/// Trait for the display power primitive
///
/// Best effort: callers log failures and keep their logical power state.
pub trait PowerSwitch {
    /// Energize (`true`) or blank (`false`) the display
    fn set_power(&mut self, on: bool) -> Result<(), PowerWriteError>;
}
