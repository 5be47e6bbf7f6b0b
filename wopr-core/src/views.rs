//! View rotation

use heapless::Vec;

use crate::config::{Name, MAX_VIEWS};

/// Cyclic index over the configured views
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRotation {
    names: Vec<Name, MAX_VIEWS>,
    index: usize,
}

impl ViewRotation {
    /// Start at the first view
    ///
    /// An empty list is treated as a single unnamed view so the index
    /// arithmetic never divides by zero.
    pub fn new(names: &[Name]) -> Self {
        let mut list = Vec::new();
        for name in names.iter().take(MAX_VIEWS) {
            let _ = list.push(name.clone());
        }
        if list.is_empty() {
            let _ = list.push(Name::new());
        }
        Self {
            names: list,
            index: 0,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn count(&self) -> usize {
        self.names.len()
    }

    /// Name of the current view
    pub fn current(&self) -> &str {
        self.names
            .get(self.index)
            .map(|n| n.as_str())
            .unwrap_or_default()
    }

    /// Move to the next view, wrapping around
    pub fn advance(&mut self) -> usize {
        self.index = (self.index + 1) % self.names.len();
        self.index
    }
}
