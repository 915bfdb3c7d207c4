//! Navigation state behind the month view.
//!
//! `CalendarView` tracks which month is on screen and which day is
//! selected; `SwipeTracker` turns horizontal drags into month changes.

use super::{add_months, first_of_month, generate_grid, month_title, weekday_labels, MonthGrid};
use crate::constants::{DAYS_PER_WEEK, MAX_MOODS_PER_CELL, SWIPE_THRESHOLD};
use crate::journal::{EventStore, Mood};
use chrono::{NaiveDate, Weekday};
use tracing::debug;

/// Everything needed to draw one day of the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    /// False for the overflow days of neighbouring months.
    pub in_month: bool,
    pub is_selected: bool,
    pub is_today: bool,
    /// Number of entries on this day.
    pub entry_count: usize,
    /// Moods of the first few entries, in insertion order.
    pub moods: Vec<Mood>,
    /// Set when more entries exist than `moods` shows.
    pub has_more: bool,
}

/// Month navigation and day selection.
///
/// # Examples
///
/// ```
/// use happyday::calendar::CalendarView;
/// use chrono::{NaiveDate, Weekday};
///
/// let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
/// let mut view = CalendarView::new(today, Weekday::Sun);
///
/// view.next_month();
/// assert_eq!(view.title(), "November 2026");
/// assert_eq!(view.selected(), today);
/// ```
#[derive(Debug, Clone)]
pub struct CalendarView {
    current_month: NaiveDate,
    selected: NaiveDate,
    week_start: Weekday,
}

impl CalendarView {
    /// Opens on the month containing `today` with `today` selected.
    pub fn new(today: NaiveDate, week_start: Weekday) -> Self {
        Self {
            current_month: first_of_month(today),
            selected: today,
            week_start,
        }
    }

    /// First day of the displayed month.
    pub fn current_month(&self) -> NaiveDate {
        self.current_month
    }

    pub fn selected(&self) -> NaiveDate {
        self.selected
    }

    pub fn week_start(&self) -> Weekday {
        self.week_start
    }

    /// Heading such as "October 2026".
    pub fn title(&self) -> String {
        month_title(self.current_month)
    }

    pub fn weekday_labels(&self) -> [String; DAYS_PER_WEEK] {
        weekday_labels(self.week_start)
    }

    pub fn next_month(&mut self) {
        self.shift_months(1);
    }

    pub fn prev_month(&mut self) {
        self.shift_months(-1);
    }

    /// Moves the displayed month by `months`; the selection stays put.
    pub fn shift_months(&mut self, months: i32) {
        self.current_month = add_months(self.current_month, months);
        debug!("Calendar moved to {}", self.current_month);
    }

    /// Jumps to the month containing `date`.
    pub fn show_month(&mut self, date: NaiveDate) {
        self.current_month = first_of_month(date);
    }

    /// Selects a day and hands it back to the caller.
    ///
    /// Selecting does not change the displayed month, so clicking an
    /// overflow day keeps the grid where it is.
    pub fn select(&mut self, date: NaiveDate) -> NaiveDate {
        self.selected = date;
        date
    }

    /// Applies a completed swipe gesture.
    pub fn apply_swipe(&mut self, action: SwipeAction) {
        match action {
            SwipeAction::NextMonth => self.next_month(),
            SwipeAction::PrevMonth => self.prev_month(),
        }
    }

    pub fn grid(&self) -> MonthGrid {
        generate_grid(self.current_month, self.week_start)
    }

    /// Builds the grid cells with the entry indicators from `store`.
    pub fn cells(&self, store: &EventStore, today: NaiveDate) -> Vec<Vec<DayCell>> {
        let grid = self.grid();
        grid.rows()
            .iter()
            .map(|week| {
                week.iter()
                    .map(|&date| {
                        let entries = store.entries_for_date(date);
                        DayCell {
                            date,
                            in_month: grid.contains_in_month(date),
                            is_selected: date == self.selected,
                            is_today: date == today,
                            entry_count: entries.len(),
                            moods: entries
                                .iter()
                                .take(MAX_MOODS_PER_CELL)
                                .map(|entry| entry.mood)
                                .collect(),
                            has_more: entries.len() > MAX_MOODS_PER_CELL,
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

/// Month change produced by a swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeAction {
    NextMonth,
    PrevMonth,
}

/// Detects horizontal swipes from touch coordinates.
///
/// A gesture fires at most once: after it triggers, further movement is
/// ignored until the next `touch_start`.
#[derive(Debug, Default, Clone)]
pub struct SwipeTracker {
    start_x: Option<f64>,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn touch_start(&mut self, x: f64) {
        self.start_x = Some(x);
    }

    /// Dragging left past the threshold means next month, right means previous.
    pub fn touch_move(&mut self, x: f64) -> Option<SwipeAction> {
        let start = self.start_x?;
        let travel = start - x;

        if travel.abs() <= SWIPE_THRESHOLD {
            return None;
        }

        self.start_x = None;
        if travel > 0.0 {
            Some(SwipeAction::NextMonth)
        } else {
            Some(SwipeAction::PrevMonth)
        }
    }

    pub fn touch_end(&mut self) {
        self.start_x = None;
    }
}
