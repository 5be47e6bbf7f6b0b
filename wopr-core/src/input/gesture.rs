//! Double-tap recognition

use crate::clock::Millis;

/// Maximum gap between the two taps of a double tap
pub const DOUBLE_TAP_WINDOW_MS: Millis = 400;

/// Tap counter for double-tap detection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GestureState {
    last_tap_ms: Option<Millis>,
    tap_count: u8,
}

impl GestureState {
    pub const fn new() -> Self {
        Self {
            last_tap_ms: None,
            tap_count: 0,
        }
    }

    pub fn tap_count(&self) -> u8 {
        self.tap_count
    }

    /// Register a press, returning true when it completes a double tap
    pub fn press(&mut self, now: Millis) -> bool {
        let within = self
            .last_tap_ms
            .is_some_and(|last| now.saturating_sub(last) <= DOUBLE_TAP_WINDOW_MS);

        self.tap_count = if within {
            self.tap_count.saturating_add(1)
        } else {
            1
        };
        self.last_tap_ms = Some(now);

        if self.tap_count >= 2 {
            self.tap_count = 0;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_double_tap() {
        let mut gesture = GestureState::new();
        assert!(!gesture.press(1_000));
        assert!(gesture.press(1_200));
        assert_eq!(gesture.tap_count(), 0);
    }

    #[test]
    fn test_slow_taps() {
        let mut gesture = GestureState::new();
        assert!(!gesture.press(1_000));
        assert!(!gesture.press(1_500));
        assert_eq!(gesture.tap_count(), 1);
    }

    #[test]
    fn test_window_inclusive() {
        let mut gesture = GestureState::new();
        gesture.press(0);
        assert!(gesture.press(400));
    }

    #[test]
    fn test_third_tap_starts_over() {
        let mut gesture = GestureState::new();
        gesture.press(0);
        assert!(gesture.press(100));
        // The count was reset, so the next press is a first tap
        assert!(!gesture.press(200));
        assert_eq!(gesture.tap_count(), 1);
        assert!(gesture.press(300));
    }

    proptest! {
        #[test]
        fn count_stays_below_two(gaps in proptest::collection::vec(0u64..1_000, 1..50)) {
            let mut gesture = GestureState::new();
            let mut now = 10_000;
            let mut fired = 0;
            for gap in gaps.iter() {
                now += gap;
                if gesture.press(now) {
                    fired += 1;
                }
                prop_assert!(gesture.tap_count() < 2);
            }
            // Every double tap takes two presses
            prop_assert!(fired * 2 <= gaps.len());
        }
    }
}
