//! Linux input event decoding
//!
//! Each record is a `struct input_event`: a `timeval` (two native longs)
//! followed by `u16 type`, `u16 code` and `i32 value`, all native-endian.

use std::mem::size_of;
use std::os::raw::c_long;

use wopr_core::input::PointerEvent;

/// Size of the timestamp prefix
const TIMEVAL_SIZE: usize = 2 * size_of::<c_long>();

/// Size of one input_event record
pub const EVENT_SIZE: usize = TIMEVAL_SIZE + 8;

/// Key/button event type
pub const EV_KEY: u16 = 0x01;

/// Touchscreen contact
pub const BTN_TOUCH: u16 = 0x14a;
/// Left mouse button
pub const BTN_LEFT: u16 = 0x110;
/// `q` key
pub const KEY_Q: u16 = 16;
/// `Esc` key
pub const KEY_ESC: u16 = 1;

/// Key value for a press (0 is release, 2 is autorepeat)
const KEY_PRESSED: i32 = 1;

/// Decoding errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Record shorter than an input_event
    #[error("short input record: {0} bytes")]
    Truncated(usize),
}

/// Decode one record
///
/// Returns `Ok(None)` for well-formed events the kiosk does not act on.
pub fn decode_event(record: &[u8]) -> Result<Option<PointerEvent>, DecodeError> {
    if record.len() < EVENT_SIZE {
        return Err(DecodeError::Truncated(record.len()));
    }

    let body = &record[TIMEVAL_SIZE..EVENT_SIZE];
    let event_type = u16::from_ne_bytes([body[0], body[1]]);
    let code = u16::from_ne_bytes([body[2], body[3]]);
    let value = i32::from_ne_bytes([body[4], body[5], body[6], body[7]]);

    if event_type != EV_KEY || value != KEY_PRESSED {
        return Ok(None);
    }

    Ok(match code {
        BTN_TOUCH => Some(PointerEvent::TouchDown),
        BTN_LEFT => Some(PointerEvent::MouseDown),
        KEY_Q | KEY_ESC => Some(PointerEvent::QuitKey),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(event_type: u16, code: u16, value: i32) -> Vec<u8> {
        let mut buf = vec![0xAA; TIMEVAL_SIZE];
        buf.extend_from_slice(&event_type.to_ne_bytes());
        buf.extend_from_slice(&code.to_ne_bytes());
        buf.extend_from_slice(&value.to_ne_bytes());
        buf
    }

    #[test]
    fn test_record_size() {
        assert_eq!(record(0, 0, 0).len(), EVENT_SIZE);
    }

    #[test]
    fn test_touch_down() {
        assert_eq!(
            decode_event(&record(EV_KEY, BTN_TOUCH, 1)),
            Ok(Some(PointerEvent::TouchDown))
        );
    }

    #[test]
    fn test_mouse_down() {
        assert_eq!(
            decode_event(&record(EV_KEY, BTN_LEFT, 1)),
            Ok(Some(PointerEvent::MouseDown))
        );
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(
            decode_event(&record(EV_KEY, KEY_Q, 1)),
            Ok(Some(PointerEvent::QuitKey))
        );
        assert_eq!(
            decode_event(&record(EV_KEY, KEY_ESC, 1)),
            Ok(Some(PointerEvent::QuitKey))
        );
    }

    #[test]
    fn test_release_and_repeat_ignored() {
        assert_eq!(decode_event(&record(EV_KEY, BTN_TOUCH, 0)), Ok(None));
        assert_eq!(decode_event(&record(EV_KEY, KEY_Q, 2)), Ok(None));
    }

    #[test]
    fn test_other_events_ignored() {
        // EV_SYN and EV_ABS
        assert_eq!(decode_event(&record(0x00, 0, 0)), Ok(None));
        assert_eq!(decode_event(&record(0x03, 0x35, 400)), Ok(None));
        assert_eq!(decode_event(&record(EV_KEY, 30, 1)), Ok(None));
    }

    #[test]
    fn test_truncated() {
        let rec = record(EV_KEY, BTN_TOUCH, 1);
        assert_eq!(
            decode_event(&rec[..EVENT_SIZE - 1]),
            Err(DecodeError::Truncated(EVENT_SIZE - 1))
        );
    }
}
