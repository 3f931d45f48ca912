//! Assignment date synthesis.
//!
//! The export carries no dates, so each assignment gets a working day
//! drawn at random from `[start, today]`. The draw is per assignment: every
//! student's record for that assignment shares the date.

use chrono::{Datelike, NaiveDate, Weekday};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::INPUT_DATE_FORMAT;
use crate::error::DateError;
use crate::models::Assignment;

/// Candidate dates for assignment dating.
#[derive(Debug, Clone, PartialEq)]
pub struct DateWindow {
    start: NaiveDate,
    days: Vec<NaiveDate>,
    start_in_future: bool,
}

impl DateWindow {
    /// Working days in the inclusive range `[start, today]`.
    ///
    /// Collapses to `{start}` when start is after today or the range holds
    /// no weekday.
    pub fn new(start: NaiveDate, today: NaiveDate) -> Self {
        let start_in_future = start > today;
        let mut days: Vec<NaiveDate> = if start_in_future {
            Vec::new()
        } else {
            start
                .iter_days()
                .take_while(|day| *day <= today)
                .filter(|day| is_working_day(*day))
                .collect()
        };
        if days.is_empty() {
            days.push(start);
        }

        Self {
            start,
            days,
            start_in_future,
        }
    }

    pub fn days(&self) -> &[NaiveDate] {
        &self.days
    }

    /// True when the start date lies after today; callers should warn.
    pub fn start_in_future(&self) -> bool {
        self.start_in_future
    }

    /// Draw one date uniformly.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> NaiveDate {
        self.days.choose(rng).copied().unwrap_or(self.start)
    }

    /// One date per assignment, index-aligned with `assignments`.
    pub fn assign<R: Rng + ?Sized>(
        &self,
        assignments: &[Assignment],
        rng: &mut R,
    ) -> Vec<NaiveDate> {
        assignments.iter().map(|_| self.pick(rng)).collect()
    }
}

/// Monday through Friday.
pub fn is_working_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Parse a `yyyy-mm-dd` start date.
pub fn parse_start_date(value: &str) -> Result<NaiveDate, DateError> {
    NaiveDate::parse_from_str(value.trim(), INPUT_DATE_FORMAT)
        .map_err(|_| DateError::InvalidFormat(value.to_string()))
}
