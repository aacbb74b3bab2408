use chrono::{Local, NaiveDate};
use std::fmt::Debug;

/// Source of "today" for due-date checks
pub trait Clock: Send + Sync + Debug {
    fn today(&self) -> NaiveDate;
}

/// The host's local calendar date
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always returns the same date. Used in tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
