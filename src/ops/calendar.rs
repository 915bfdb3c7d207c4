//! The month view command.

use crate::app::JournalApp;
use crate::calendar::CalendarView;
use crate::errors::AppResult;
use crate::render;
use chrono::{NaiveDate, Weekday};
use tracing::debug;

/// Which month to show and which day to highlight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarRequest {
    /// Month to open on; today's month when absent.
    pub month: Option<NaiveDate>,
    /// Months to move forward (positive) or back from `month`.
    pub offset: i32,
    /// Day to select; today when absent.
    pub select: Option<NaiveDate>,
}

/// Renders the month grid followed by the selected day's entries.
///
/// # Errors
///
/// Returns `AuthError::NotAuthenticated` when logged out.
pub fn show_calendar(
    app: &JournalApp,
    week_start: Weekday,
    today: NaiveDate,
    request: &CalendarRequest,
) -> AppResult<String> {
    let store = app.events()?;

    let mut view = CalendarView::new(today, week_start);
    if let Some(selected) = request.select {
        view.select(selected);
        view.show_month(selected);
    }
    if let Some(month) = request.month {
        view.show_month(month);
    }
    view.shift_months(request.offset);
    debug!(
        "Showing {} with {} selected",
        view.current_month(),
        view.selected()
    );

    let mut out = render::render_month(&view, &view.cells(store, today));
    out.push('\n');
    out.push_str(&render::render_day(
        view.selected(),
        &store.entries_for_date(view.selected()),
    ));
    Ok(out)
}
