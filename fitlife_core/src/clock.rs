//! Time source abstraction.
//!
//! Reminder evaluation and history windows depend on "now"; taking it from a
//! [`Clock`] keeps those paths deterministic under test.

use chrono::{DateTime, FixedOffset, Local};

pub trait Clock {
    /// Current wall-clock time, carrying the local UTC offset.
    fn now(&self) -> DateTime<FixedOffset>;
}

/// The system clock in the machine's local time zone
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A clock frozen at one instant
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}
