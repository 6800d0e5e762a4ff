use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The closed calendar-month interval used to scope an aggregation.
///
/// Both bounds are inclusive: `start` is the first instant of the month
/// (`00:00:00.000` on day 1) and `end` the last representable instant
/// (`23:59:59.999` on the last day). Transactions carry calendar dates, so
/// containment checks compare against the window's first and last day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MonthWindow {
    /// First instant of the month.
    pub start: NaiveDateTime,
    /// Last instant of the month, millisecond precision.
    pub end: NaiveDateTime,
}

impl MonthWindow {
    /// The window of the calendar month containing `reference`.
    pub fn containing(reference: NaiveDate) -> Self {
        // Day 1 of an existing date's month always exists.
        let first = reference.with_day(1).unwrap();
        let last = last_day_of_month(reference.year(), reference.month());

        Self {
            start: first.and_hms_milli_opt(0, 0, 0, 0).unwrap(),
            end: last.and_hms_milli_opt(23, 59, 59, 999).unwrap(),
        }
    }

    /// The window of the calendar month immediately before the one
    /// containing `reference`. January rolls over to December of the
    /// prior year.
    pub fn preceding(reference: NaiveDate) -> Self {
        let (year, month) = if reference.month() == 1 {
            (reference.year() - 1, 12)
        } else {
            (reference.year(), reference.month() - 1)
        };

        Self::containing(NaiveDate::from_ymd_opt(year, month, 1).unwrap())
    }

    /// First calendar day of the window.
    pub fn first_day(&self) -> NaiveDate {
        self.start.date()
    }

    /// Last calendar day of the window.
    pub fn last_day(&self) -> NaiveDate {
        self.end.date()
    }

    /// Whether a calendar date falls inside the window, inclusive on both
    /// ends.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first_day() && date <= self.last_day()
    }
}

fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    // First day of the next month, minus one day.
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap()
        .pred_opt()
        .unwrap()
}
