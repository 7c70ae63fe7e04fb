//! Millisecond time base.
//!
//! Everything in the core runs off a free-running `u32` millisecond counter
//! that wraps after ~49 days; differences are always taken with
//! [`ticks_diff`] so a wrap never looks like a huge negative interval.

use embedded_hal::delay::DelayNs;

/// Monotonic millisecond clock that can also block for short pauses.
///
/// The firmware backs this with `embassy_time`; tests use a manual clock
/// whose delays advance time.
pub trait Clock: DelayNs {
    fn now_ms(&self) -> u32;
}

/// Milliseconds elapsed from `earlier` to `now`, wraparound-safe.
#[inline]
pub fn ticks_diff(now: u32, earlier: u32) -> u32 {
    now.wrapping_sub(earlier)
}

/// A repeating timer checked by polling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interval {
    period_ms: u32,
    last_ms: u32,
}

impl Interval {
    pub const fn new(period_ms: u32, now_ms: u32) -> Self {
        Self {
            period_ms,
            last_ms: now_ms,
        }
    }

    /// Returns `true` once per elapsed period and re-arms from `now_ms`.
    pub fn due(&mut self, now_ms: u32) -> bool {
        if ticks_diff(now_ms, self.last_ms) >= self.period_ms {
            self.last_ms = now_ms;
            true
        } else {
            false
        }
    }

    pub fn restart(&mut self, now_ms: u32) {
        self.last_ms = now_ms;
    }

    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Wall time
// ═══════════════════════════════════════════════════════════════════════════

const SECONDS_PER_DAY: u64 = 86_400;

/// Local time of day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl TimeOfDay {
    /// Time of day for a count of seconds since a midnight.
    pub fn from_seconds(seconds: u64) -> Self {
        let day = seconds % SECONDS_PER_DAY;
        Self {
            hour: (day / 3600) as u8,
            minute: ((day % 3600) / 60) as u8,
            second: (day % 60) as u8,
        }
    }

    /// Hour on a 12-hour dial (midnight and noon are 12) and `AM`/`PM`.
    pub fn hour12(&self) -> (u8, &'static str) {
        let period = if self.hour < 12 { "AM" } else { "PM" };
        match self.hour % 12 {
            0 => (12, period),
            h => (h, period),
        }
    }
}

/// Unix time from the last network sync, carried forward on the
/// millisecond counter. Resync at least once per counter wrap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WallClock {
    /// `(unix_seconds, now_ms)` at the last sync.
    synced: Option<(u64, u32)>,
}

impl WallClock {
    pub const fn new() -> Self {
        Self { synced: None }
    }

    pub fn sync(&mut self, unix_seconds: u64, now_ms: u32) {
        self.synced = Some((unix_seconds, now_ms));
    }

    pub fn is_synced(&self) -> bool {
        self.synced.is_some()
    }

    pub fn unix_seconds(&self, now_ms: u32) -> Option<u64> {
        self.synced
            .map(|(unix, at)| unix + (ticks_diff(now_ms, at) / 1000) as u64)
    }

    /// Local time of day, `offset_s` seconds from UTC.
    pub fn local_time(&self, now_ms: u32, offset_s: i32) -> Option<TimeOfDay> {
        self.unix_seconds(now_ms)
            .map(|unix| TimeOfDay::from_seconds(unix.wrapping_add_signed(offset_s as i64)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_diff_survives_wraparound() {
        assert_eq!(ticks_diff(5, u32::MAX - 4), 10);
        assert_eq!(ticks_diff(1_000, 400), 600);
        assert_eq!(ticks_diff(7, 7), 0);
    }

    #[test]
    fn interval_fires_at_period_and_rearms() {
        let mut iv = Interval::new(100, 0);
        assert!(!iv.due(99));
        assert!(iv.due(100));
        assert!(!iv.due(150));
        assert!(iv.due(200));
    }

    #[test]
    fn interval_across_counter_wrap() {
        let start = u32::MAX - 50;
        let mut iv = Interval::new(100, start);
        assert!(!iv.due(start.wrapping_add(99)));
        assert!(iv.due(start.wrapping_add(100)));
    }

    #[test]
    fn restart_pushes_next_deadline() {
        let mut iv = Interval::new(100, 0);
        iv.restart(80);
        assert!(!iv.due(150));
        assert!(iv.due(180));
    }

    #[test]
    fn twelve_hour_dial() {
        let at = |h| TimeOfDay {
            hour: h,
            minute: 0,
            second: 0,
        };
        assert_eq!(at(0).hour12(), (12, "AM"));
        assert_eq!(at(9).hour12(), (9, "AM"));
        assert_eq!(at(12).hour12(), (12, "PM"));
        assert_eq!(at(23).hour12(), (11, "PM"));
    }

    #[test]
    fn wall_clock_runs_on_from_sync_with_offset() {
        let mut wall = WallClock::new();
        assert_eq!(wall.local_time(0, 0), None);

        // 2024-01-01 14:30:00 UTC.
        wall.sync(1_704_119_400, u32::MAX - 999);
        // 61.5 s later, across the counter wrap.
        let now = 60_500;
        assert_eq!(wall.unix_seconds(now), Some(1_704_119_461));
        assert_eq!(
            wall.local_time(now, -5 * 3600),
            Some(TimeOfDay {
                hour: 9,
                minute: 31,
                second: 1
            })
        );
    }
}
