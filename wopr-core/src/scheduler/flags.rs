//! One-shot refresh flags

use core::sync::atomic::{AtomicBool, Ordering};

/// "Refresh everything now" requests
///
/// `initial` is set exactly once at construction; `force` is set by anyone
/// (typically the wake path). The scheduler is the only consumer and takes
/// both together at the start of a pass.
#[derive(Debug)]
pub struct ForceFlags {
    force: AtomicBool,
    initial: AtomicBool,
}

impl Default for ForceFlags {
    fn default() -> Self {
        Self::new()
    }
}

impl ForceFlags {
    /// Flags with the initial refresh pending
    pub const fn new() -> Self {
        Self {
            force: AtomicBool::new(false),
            initial: AtomicBool::new(true),
        }
    }

    /// Request one forced pass
    pub fn request(&self) {
        self.force.store(true, Ordering::Release);
    }

    /// Check without consuming
    pub fn pending(&self) -> bool {
        self.force.load(Ordering::Acquire) || self.initial.load(Ordering::Acquire)
    }

    /// Consume both flags, returning whether either was set
    pub fn take(&self) -> bool {
        let force = self.force.swap(false, Ordering::AcqRel);
        let initial = self.initial.swap(false, Ordering::AcqRel);
        force || initial
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_consumed_once() {
        let flags = ForceFlags::new();
        assert!(flags.pending());
        assert!(flags.take());
        assert!(!flags.take());
        assert!(!flags.pending());
    }

    #[test]
    fn test_force_consumed_once() {
        let flags = ForceFlags::new();
        flags.take();

        flags.request();
        flags.request();
        assert!(flags.take());
        assert!(!flags.take());
    }
}
