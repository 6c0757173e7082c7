// ⏰ Clock Abstraction
// "Time must be explicit" - status derivation never reads the wall clock
// directly; it is handed a clock so tests can pin "now" to a fixed instant.

use chrono::{Local, NaiveDate, NaiveDateTime};

/// Source of the current local time.
///
/// Everything that derives freshness state takes `today()` as an input;
/// the scheduler additionally needs the time of day to aim at midnight.
pub trait Clock: Send + Sync {
    /// Current local date-time (naive: scheduling and day math are local).
    fn now(&self) -> NaiveDateTime;

    /// Current local calendar date.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Production clock - reads the system's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Test clock - always reports the instant it was built with.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    /// Pin the clock to noon on a given date (time of day rarely matters
    /// outside the midnight scheduler).
    pub fn on_date(date: NaiveDate) -> Self {
        FixedClock(date.and_hms_opt(12, 0, 0).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
