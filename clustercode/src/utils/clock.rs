//! Injectable wall clock.
//!
//! Code that derives names from the current time takes a [`Clock`] instead
//! of calling `Local::now()` directly, so tests can pin the time.

use chrono::{DateTime, Local, TimeZone, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// Production clock using the system time in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock frozen at a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Local>);

impl FixedClock {
    pub fn new(at: DateTime<Local>) -> Self {
        Self(at)
    }

    /// Fixed clock at the given local date and time.
    ///
    /// Falls back to the Unix epoch for times that do not exist locally.
    pub fn at(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Self {
        let at = Local
            .with_ymd_and_hms(year, month, day, hour, min, sec)
            .earliest()
            .unwrap_or_else(|| DateTime::<Utc>::UNIX_EPOCH.with_timezone(&Local));
        Self(at)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}
