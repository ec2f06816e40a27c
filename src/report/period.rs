//! Calendar-aligned date windows used to scope aggregation.

use serde::{Deserialize, Serialize};
use time::{Date, Duration, Month, OffsetDateTime, Time};

/// The reporting window kinds supported by the aggregation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Monday through Sunday of the week containing the anchor date.
    Week,
    /// The calendar month containing the anchor date.
    Month,
    /// The calendar year containing the anchor date.
    Year,
}

impl From<crate::models::BudgetPeriod> for Period {
    fn from(period: crate::models::BudgetPeriod) -> Self {
        match period {
            crate::models::BudgetPeriod::Week => Self::Week,
            crate::models::BudgetPeriod::Month => Self::Month,
            crate::models::BudgetPeriod::Year => Self::Year,
        }
    }
}

/// An inclusive range of instants used to scope aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTimeRange {
    /// The first instant inside the window.
    pub start: OffsetDateTime,
    /// The last instant inside the window.
    pub end: OffsetDateTime,
}

impl DateTimeRange {
    /// Whether `instant` falls inside the window (inclusive on both ends).
    pub fn contains(&self, instant: OffsetDateTime) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// Compute the inclusive window for `period` containing `anchor`.
///
/// The window runs from midnight on the first day through the last nanosecond
/// of the last day, in UTC.
pub fn period_bounds(period: Period, anchor: Date) -> DateTimeRange {
    let (start, end) = match period {
        Period::Week => week_bounds(anchor),
        Period::Month => month_bounds(anchor.year(), anchor.month()),
        Period::Year => year_bounds(anchor.year()),
    };

    DateTimeRange {
        start: OffsetDateTime::new_utc(start, Time::MIDNIGHT),
        end: OffsetDateTime::new_utc(end, end_of_day()),
    }
}

/// The date one calendar month before `anchor`.
///
/// The day of the month is clamped to the length of the target month, so e.g.
/// March 31 maps to February 29 in a leap year and February 28 otherwise.
/// January rolls over into December of the previous year.
pub fn previous_month(anchor: Date) -> Date {
    let (year, month) = match anchor.month() {
        Month::January => (anchor.year() - 1, Month::December),
        month => (anchor.year(), month.previous()),
    };
    let day = anchor.day().min(last_day_of_month(year, month));

    Date::from_calendar_date(year, month, day).expect("invalid previous month date")
}

fn end_of_day() -> Time {
    Time::from_hms_nano(23, 59, 59, 999_999_999).expect("invalid end-of-day time")
}

fn week_bounds(anchor: Date) -> (Date, Date) {
    // Weeks are computed purely from day-of-week arithmetic so that weeks
    // spanning a month or year boundary stay intact.
    let weekday_number = anchor.weekday().number_from_monday() as i64;
    let start = anchor - Duration::days(weekday_number - 1);
    let end = start + Duration::days(6);

    (start, end)
}

fn month_bounds(year: i32, month: Month) -> (Date, Date) {
    let start = Date::from_calendar_date(year, month, 1).expect("invalid month start date");
    let end = Date::from_calendar_date(year, month, last_day_of_month(year, month))
        .expect("invalid month end date");

    (start, end)
}

fn year_bounds(year: i32) -> (Date, Date) {
    let start = Date::from_calendar_date(year, Month::January, 1).expect("invalid year start date");
    let end = Date::from_calendar_date(year, Month::December, 31).expect("invalid year end date");

    (start, end)
}

pub(crate) fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

#[cfg(test)]
mod period_bounds_tests {
    use time::macros::{date, datetime};

    use super::{Period, period_bounds, previous_month};

    #[test]
    fn week_bounds_run_monday_to_sunday() {
        // 2024-03-06 is a Wednesday.
        let range = period_bounds(Period::Week, date!(2024 - 03 - 06));

        assert_eq!(range.start, datetime!(2024-03-04 0:00 UTC));
        assert_eq!(range.end.date(), date!(2024 - 03 - 10));
    }

    #[test]
    fn week_bounds_span_month_boundary() {
        // 2024-03-30 is a Saturday; its week starts in March and ends in April.
        let range = period_bounds(Period::Week, date!(2024 - 03 - 30));

        assert_eq!(range.start.date(), date!(2024 - 03 - 25));
        assert_eq!(range.end.date(), date!(2024 - 03 - 31));

        // 2024-12-31 is a Tuesday; its week ends in the next year.
        let range = period_bounds(Period::Week, date!(2024 - 12 - 31));

        assert_eq!(range.start.date(), date!(2024 - 12 - 30));
        assert_eq!(range.end.date(), date!(2025 - 01 - 05));
    }

    #[test]
    fn month_bounds_cover_whole_month() {
        let range = period_bounds(Period::Month, date!(2024 - 03 - 15));

        assert_eq!(range.start, datetime!(2024-03-01 0:00 UTC));
        assert_eq!(range.end.date(), date!(2024 - 03 - 31));
        assert!(range.contains(datetime!(2024-03-31 23:59:59 UTC)));
        assert!(!range.contains(datetime!(2024-04-01 0:00 UTC)));
    }

    #[test]
    fn month_bounds_handle_leap_february() {
        let leap = period_bounds(Period::Month, date!(2024 - 02 - 10));
        assert_eq!(leap.end.date().day(), 29);

        let non_leap = period_bounds(Period::Month, date!(2023 - 02 - 10));
        assert_eq!(non_leap.end.date().day(), 28);
    }

    #[test]
    fn year_bounds_cover_whole_year() {
        let range = period_bounds(Period::Year, date!(2024 - 07 - 01));

        assert_eq!(range.start, datetime!(2024-01-01 0:00 UTC));
        assert_eq!(range.end.date(), date!(2024 - 12 - 31));
    }

    #[test]
    fn window_is_inclusive_on_both_ends() {
        let range = period_bounds(Period::Month, date!(2024 - 03 - 15));

        assert!(range.contains(range.start));
        assert!(range.contains(range.end));
    }

    #[test]
    fn previous_month_steps_back_one_month() {
        assert_eq!(previous_month(date!(2024 - 03 - 15)), date!(2024 - 02 - 15));
    }

    #[test]
    fn previous_month_clamps_day_to_month_length() {
        assert_eq!(previous_month(date!(2024 - 03 - 31)), date!(2024 - 02 - 29));
        assert_eq!(previous_month(date!(2023 - 03 - 31)), date!(2023 - 02 - 28));
    }

    #[test]
    fn previous_month_rolls_over_year_boundary() {
        assert_eq!(previous_month(date!(2024 - 01 - 15)), date!(2023 - 12 - 15));
    }
}
