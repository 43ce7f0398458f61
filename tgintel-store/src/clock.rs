//! Wall-clock source for period computation.

use chrono::{Local, NaiveDate};
use std::sync::{Mutex, PoisonError};
use tgintel_core::Period;

/// Supplies today's local date.
pub trait Clock: Send + Sync {
    /// Today's date in local time.
    fn today(&self) -> NaiveDate;

    /// The calendar month containing today.
    fn current_period(&self) -> Period {
        Period::from_date(self.today())
    }
}

/// Reads the system clock in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock pinned to a settable date.
#[derive(Debug)]
pub struct FixedClock {
    date: Mutex<NaiveDate>,
}

impl FixedClock {
    /// Pins the clock to `date`.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date: Mutex::new(date),
        }
    }

    /// Moves the clock.
    pub fn set(&self, date: NaiveDate) {
        *self.date.lock().unwrap_or_else(PoisonError::into_inner) = date;
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        *self.date.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_period() {
        let clock = FixedClock::new(NaiveDate::from_ymd_opt(2026, 10, 17).unwrap());
        assert_eq!(clock.current_period().to_string(), "2026-10");

        clock.set(NaiveDate::from_ymd_opt(2026, 11, 1).unwrap());
        assert_eq!(clock.current_period().to_string(), "2026-11");
    }
}
