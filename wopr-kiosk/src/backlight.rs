//! Backlight power control through sysfs

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use wopr_core::traits::{PowerSwitch, PowerWriteError};

/// Panel backlight driven through a `bl_power` file
///
/// The file takes `0` for powered and `1` for blanked.
#[derive(Debug, Clone)]
pub struct SysfsBacklight {
    path: PathBuf,
}

impl SysfsBacklight {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PowerSwitch for SysfsBacklight {
    fn set_power(&mut self, on: bool) -> Result<(), PowerWriteError> {
        let level = if on { "0" } else { "1" };
        fs::write(&self.path, level)
            .map_err(|e| PowerWriteError::Io(format!("{}: {}", self.path.display(), e)))
    }
}

/// Stand-in when backlight control is disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBacklight;

impl PowerSwitch for NoBacklight {
    fn set_power(&mut self, on: bool) -> Result<(), PowerWriteError> {
        debug!("Backlight control disabled, ignoring request (on: {})", on);
        Ok(())
    }
}

/// Build the configured backlight control
pub fn from_config(path: Option<&Path>) -> Box<dyn PowerSwitch + Send> {
    match path {
        Some(path) => Box::new(SysfsBacklight::new(path)),
        None => Box::new(NoBacklight),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_levels() {
        let path = std::env::temp_dir().join(format!("wopr-bl-{}", std::process::id()));
        let mut backlight = SysfsBacklight::new(&path);

        backlight.set_power(false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "1");
        backlight.set_power(true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "0");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_write_failure_reported() {
        let mut backlight = SysfsBacklight::new("/nonexistent/wopr/bl_power");
        assert!(matches!(
            backlight.set_power(true),
            Err(PowerWriteError::Io(_))
        ));
    }

    #[test]
    fn test_disabled() {
        let mut backlight = from_config(None);
        assert_eq!(backlight.set_power(false), Ok(()));
    }
}
