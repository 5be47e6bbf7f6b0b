//! Edge-triggered power output

/// Tracks the last level requested from the power primitive
///
/// Nothing has been requested at startup, so the first update always
/// produces a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PowerOutput {
    last_requested: Option<bool>,
}

impl PowerOutput {
    pub const fn new() -> Self {
        Self {
            last_requested: None,
        }
    }

    /// Level last handed to the primitive
    pub fn last_requested(&self) -> Option<bool> {
        self.last_requested
    }

    /// Feed the desired level, returning it only when it changed
    pub fn update(&mut self, on: bool) -> Option<bool> {
        if self.last_requested == Some(on) {
            None
        } else {
            self.last_requested = Some(on);
            Some(on)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_update_emits() {
        let mut output = PowerOutput::new();
        assert_eq!(output.update(true), Some(true));
        assert_eq!(output.update(true), None);
    }

    #[test]
    fn test_edges_only() {
        let mut output = PowerOutput::new();
        assert_eq!(output.update(false), Some(false));
        assert_eq!(output.update(false), None);
        assert_eq!(output.update(true), Some(true));
        assert_eq!(output.update(false), Some(false));
        assert_eq!(output.last_requested(), Some(false));
    }
}
