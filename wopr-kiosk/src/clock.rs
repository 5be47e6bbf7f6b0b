//! Local wall-clock time

use jiff::Zoned;

use wopr_core::clock::TimeOfDay;

/// Wall-clock reading used by the UI tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallTime {
    /// Local hour and minute
    pub time_of_day: TimeOfDay,
    /// Unix time in milliseconds
    pub unix_ms: i64,
}

/// Read the local wall clock
pub fn local_now() -> WallTime {
    wall_time(&Zoned::now())
}

pub fn wall_time(now: &Zoned) -> WallTime {
    let time_of_day =
        TimeOfDay::new(now.hour() as u8, now.minute() as u8).unwrap_or(TimeOfDay::MIDNIGHT);
    WallTime {
        time_of_day,
        unix_ms: now.timestamp().as_millisecond(),
    }
}
