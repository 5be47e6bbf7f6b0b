//! Boot and wake greeting timelines
//!
//! Both are fixed scripts expressed as data, so the UI tick can sample
//! them at any elapsed time without blocking:
//! - Boot: a title line, one typewriter line, then a short hold
//! - Wake: a blank pause, two typewriter lines with a pause between, then a hold

use crate::clock::Millis;

/// First greeting line
pub const GREETING_LINE_1: &str = "GREETINGS PROFESSOR FALKEN.";

/// Second greeting line
pub const GREETING_LINE_2: &str = "HOW ARE YOU FEELING TODAY?";

/// Blank screen before typing starts
pub const BLANK_MS: Millis = 600;

/// Time per typed character
pub const CHAR_MS: Millis = 60;

/// Pause between the two lines
pub const LINE_PAUSE_MS: Millis = 800;

/// Hold after the last character
pub const HOLD_MS: Millis = 1_200;

/// What the greeting shows at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GreetingFrame {
    /// Visible characters of line 1
    pub line1_chars: usize,
    /// Visible characters of line 2
    pub line2_chars: usize,
    /// Script has run to the end
    pub finished: bool,
}

impl GreetingFrame {
    pub fn line1(&self) -> &'static str {
        &GREETING_LINE_1[..self.line1_chars.min(GREETING_LINE_1.len())]
    }

    pub fn line2(&self) -> &'static str {
        &GREETING_LINE_2[..self.line2_chars.min(GREETING_LINE_2.len())]
    }
}

/// Characters typed `elapsed` into a line that starts at `start`
///
/// Each character appears at the start of its slot.
fn typed(elapsed: Millis, start: Millis, len: usize) -> usize {
    if elapsed < start {
        0
    } else {
        (((elapsed - start) / CHAR_MS) as usize + 1).min(len)
    }
}

/// Greeting script timing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GreetingScript;

impl GreetingScript {
    const fn line1_start() -> Millis {
        BLANK_MS
    }

    const fn line2_start() -> Millis {
        Self::line1_start() + GREETING_LINE_1.len() as Millis * CHAR_MS + LINE_PAUSE_MS
    }

    /// Total running time
    pub const fn duration_ms() -> Millis {
        Self::line2_start() + GREETING_LINE_2.len() as Millis * CHAR_MS + HOLD_MS
    }

    /// Sample the script `elapsed_ms` after the wake
    pub fn frame_at(elapsed_ms: Millis) -> GreetingFrame {
        GreetingFrame {
            line1_chars: typed(elapsed_ms, Self::line1_start(), GREETING_LINE_1.len()),
            line2_chars: typed(elapsed_ms, Self::line2_start(), GREETING_LINE_2.len()),
            finished: elapsed_ms >= Self::duration_ms(),
        }
    }
}

/// Title shown for the whole boot sequence
pub const BOOT_TITLE: &str = "INITIALISING WOPR TERMINAL...";

/// Line typed under the title at boot
pub const BOOT_MESSAGE: &str = "GREETINGS PROFESSOR FALKEN...";

/// Title alone before the message starts typing
pub const BOOT_TITLE_MS: Millis = 1_200;

/// Hold after the boot message is complete
pub const BOOT_HOLD_MS: Millis = 600;

/// What the boot sequence shows at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BootFrame {
    /// Visible characters of the message; the title is always shown
    pub message_chars: usize,
    /// Sequence has run to the end
    pub finished: bool,
}

impl BootFrame {
    pub fn title(&self) -> &'static str {
        BOOT_TITLE
    }

    pub fn message(&self) -> &'static str {
        &BOOT_MESSAGE[..self.message_chars.min(BOOT_MESSAGE.len())]
    }
}

/// Boot sequence timing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BootScript;

impl BootScript {
    /// Total running time
    pub const fn duration_ms() -> Millis {
        BOOT_TITLE_MS + BOOT_MESSAGE.len() as Millis * CHAR_MS + BOOT_HOLD_MS
    }

    /// Sample the sequence `elapsed_ms` after start
    pub fn frame_at(elapsed_ms: Millis) -> BootFrame {
        BootFrame {
            message_chars: typed(elapsed_ms, BOOT_TITLE_MS, BOOT_MESSAGE.len()),
            finished: elapsed_ms >= Self::duration_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration() {
        // 600 + 27 * 60 + 800 + 26 * 60 + 1200
        assert_eq!(GreetingScript::duration_ms(), 5_780);
    }

    #[test]
    fn test_blank_start() {
        let frame = GreetingScript::frame_at(0);
        assert_eq!(frame, GreetingFrame::default());
        assert_eq!(GreetingScript::frame_at(599).line1_chars, 0);
    }

    #[test]
    fn test_typewriter_line_one() {
        assert_eq!(GreetingScript::frame_at(600).line1_chars, 1);
        assert_eq!(GreetingScript::frame_at(659).line1_chars, 1);
        assert_eq!(GreetingScript::frame_at(660).line1_chars, 2);
        assert_eq!(GreetingScript::frame_at(720).line1(), "GRE");
    }

    #[test]
    fn test_pause_between_lines() {
        // Line 1 complete, line 2 not started
        let frame = GreetingScript::frame_at(2_500);
        assert_eq!(frame.line1(), GREETING_LINE_1);
        assert_eq!(frame.line2_chars, 0);

        let frame = GreetingScript::frame_at(3_020);
        assert_eq!(frame.line2(), "H");
    }

    #[test]
    fn test_hold_then_finish() {
        let frame = GreetingScript::frame_at(4_600);
        assert_eq!(frame.line2(), GREETING_LINE_2);
        assert!(!frame.finished);

        assert!(!GreetingScript::frame_at(5_779).finished);
        assert!(GreetingScript::frame_at(5_780).finished);
    }

    #[test]
    fn test_boot_duration() {
        // 1200 + 29 * 60 + 600
        assert_eq!(BootScript::duration_ms(), 3_540);
    }

    #[test]
    fn test_boot_title_first() {
        let frame = BootScript::frame_at(0);
        assert_eq!(frame.title(), BOOT_TITLE);
        assert_eq!(frame.message(), "");
        assert_eq!(BootScript::frame_at(1_199).message_chars, 0);
    }

    #[test]
    fn test_boot_typewriter() {
        assert_eq!(BootScript::frame_at(1_200).message_chars, 1);
        assert_eq!(BootScript::frame_at(1_259).message_chars, 1);
        assert_eq!(BootScript::frame_at(1_320).message(), "GRE");

        // Last character lands at 1200 + 28 * 60
        assert_eq!(BootScript::frame_at(2_879).message_chars, 28);
        assert_eq!(BootScript::frame_at(2_880).message(), BOOT_MESSAGE);
    }

    #[test]
    fn test_boot_hold_then_finish() {
        let frame = BootScript::frame_at(3_000);
        assert_eq!(frame.message(), BOOT_MESSAGE);
        assert!(!frame.finished);

        assert!(!BootScript::frame_at(3_539).finished);
        assert!(BootScript::frame_at(3_540).finished);
    }
}
