//! Month grid date arithmetic.
//!
//! This module contains pure logic for laying out a month as the six rows of
//! seven days the calendar displays, together with the small month helpers
//! the view needs. Nothing here touches storage or the clock.

pub mod view;

use crate::constants::{
    DATE_FORMAT_COMPACT, DATE_FORMAT_ISO, DAYS_PER_WEEK, MONTH_FORMAT, MONTH_TITLE_FORMAT,
    WEEKS_PER_GRID,
};
use crate::errors::{AppResult, ValidationError};
use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

pub use view::{CalendarView, DayCell, SwipeAction, SwipeTracker};

/// One week of the grid.
pub type Week = [NaiveDate; DAYS_PER_WEEK];

/// The 6 x 7 block of dates shown for one month.
///
/// Leading days belong to the previous month and trailing days to the next
/// one, so every grid has the same shape regardless of how many weeks the
/// month touches.
///
/// # Examples
///
/// ```
/// use happyday::calendar::generate_grid;
/// use chrono::{NaiveDate, Weekday};
///
/// let reference = NaiveDate::from_ymd_opt(2024, 2, 14).unwrap();
/// let grid = generate_grid(reference, Weekday::Sun);
///
/// assert_eq!(grid.days().count(), 42);
/// assert_eq!(grid.first_day(), NaiveDate::from_ymd_opt(2024, 1, 28).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    month: NaiveDate,
    week_start: Weekday,
    rows: [Week; WEEKS_PER_GRID],
}

impl MonthGrid {
    /// First day of the month this grid displays.
    pub fn month(&self) -> NaiveDate {
        self.month
    }

    /// Weekday every row starts on.
    pub fn week_start(&self) -> Weekday {
        self.week_start
    }

    /// The grid rows, top to bottom.
    pub fn rows(&self) -> &[Week; WEEKS_PER_GRID] {
        &self.rows
    }

    /// All 42 dates in reading order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.rows.iter().flat_map(|week| week.iter().copied())
    }

    /// Top-left date.
    pub fn first_day(&self) -> NaiveDate {
        self.rows[0][0]
    }

    /// Bottom-right date.
    pub fn last_day(&self) -> NaiveDate {
        self.rows[WEEKS_PER_GRID - 1][DAYS_PER_WEEK - 1]
    }

    /// Whether `date` falls in the displayed month rather than an overflow row.
    pub fn contains_in_month(&self, date: NaiveDate) -> bool {
        date.year() == self.month.year() && date.month() == self.month.month()
    }
}

/// Builds the grid for the month containing `month_reference`.
///
/// Rows start on `week_start`. The first row always contains the 1st of the
/// month; the grid then runs for 42 consecutive days.
pub fn generate_grid(month_reference: NaiveDate, week_start: Weekday) -> MonthGrid {
    let month = first_of_month(month_reference);
    let mut day = start_of_week(month, week_start);

    let mut rows = [[month; DAYS_PER_WEEK]; WEEKS_PER_GRID];
    for week in rows.iter_mut() {
        for slot in week.iter_mut() {
            *slot = day;
            day = day.succ_opt().unwrap_or(day);
        }
    }

    MonthGrid {
        month,
        week_start,
        rows,
    }
}

/// First day of the month containing `date`.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last day of the month containing `date`.
pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    first_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// The date on or before `date` that falls on `week_start`.
pub fn start_of_week(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    let offset = (date.weekday().num_days_from_sunday() + 7 - week_start.num_days_from_sunday()) % 7;
    date.checked_sub_days(Days::new(u64::from(offset)))
        .unwrap_or(date)
}

/// Shifts `date` by `months`, clamping the day to the end of a shorter month.
///
/// January 31st plus one month is the last day of February.
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}

/// Two-letter weekday headings in grid order.
///
/// ```
/// use happyday::calendar::weekday_labels;
/// use chrono::Weekday;
///
/// assert_eq!(weekday_labels(Weekday::Mon)[0], "Mo");
/// assert_eq!(weekday_labels(Weekday::Sun)[6], "Sa");
/// ```
pub fn weekday_labels(week_start: Weekday) -> [String; DAYS_PER_WEEK] {
    let mut weekday = week_start;
    std::array::from_fn(|_| {
        let label = weekday.to_string().chars().take(2).collect();
        weekday = weekday.succ();
        label
    })
}

/// Calendar heading such as "October 2026".
pub fn month_title(month: NaiveDate) -> String {
    month.format(MONTH_TITLE_FORMAT).to_string()
}

/// Parses a date in YYYY-MM-DD or YYYYMMDD form.
pub fn parse_date(value: &str) -> AppResult<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, DATE_FORMAT_ISO)
        .or_else(|_| NaiveDate::parse_from_str(value, DATE_FORMAT_COMPACT))
        .map_err(|_| ValidationError::InvalidDate(value.to_string()).into())
}

/// Parses a month in YYYY-MM form, or any full date inside the month.
///
/// Returns the first day of that month.
pub fn parse_month(value: &str) -> AppResult<NaiveDate> {
    let trimmed = value.trim();
    // %Y-%m alone cannot build a NaiveDate, so pin the day.
    NaiveDate::parse_from_str(&format!("{}-01", trimmed), &format!("{}-%d", MONTH_FORMAT))
        .or_else(|_| parse_date(trimmed).map(first_of_month))
        .map_err(|_| ValidationError::InvalidMonth(trimmed.to_string()).into())
}

/// Canonical `YYYY-MM-DD` form used as the bucket key of entries.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT_ISO).to_string()
}
