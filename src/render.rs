//! Plain-text views of the calendar and of a day's entries.

use crate::calendar::{format_date, CalendarView, DayCell};
use crate::constants::{CREATED_AT_FORMAT, MAX_MOODS_PER_CELL};
use crate::journal::{JournalEntry, Mood};
use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone, Utc};
use std::fmt;

const CELL_WIDTH: usize = 8;

/// Draws the month heading, weekday labels, the 6x7 grid and a legend.
pub fn render_month(view: &CalendarView, cells: &[Vec<DayCell>]) -> String {
    let mut out = String::new();
    let grid_width = CELL_WIDTH * 7 + 6;

    out.push_str(&format!("{:^width$}\n", view.title(), width = grid_width));
    let labels: Vec<String> = view
        .weekday_labels()
        .iter()
        .map(|label| format!(" {:<width$}", label, width = CELL_WIDTH - 1))
        .collect();
    out.push_str(labels.join(" ").trim_end());
    out.push('\n');

    for week in cells {
        let row: Vec<String> = week.iter().map(format_cell).collect();
        out.push_str(row.join(" ").trim_end());
        out.push('\n');
    }

    out.push('\n');
    out.push_str(&legend());
    out
}

/// One grid cell, always `CELL_WIDTH` characters wide.
///
/// Layout: selection marker, day number, today/overflow flag, then up to
/// three mood markers and `+` when the day has more entries.
pub fn format_cell(cell: &DayCell) -> String {
    let selected = if cell.is_selected { '>' } else { ' ' };
    let flag = if cell.is_today {
        '*'
    } else if !cell.in_month {
        '.'
    } else {
        ' '
    };

    let mut moods: String = cell
        .moods
        .iter()
        .take(MAX_MOODS_PER_CELL)
        .map(Mood::marker)
        .collect();
    if cell.has_more {
        moods.push('+');
    }

    format!("{}{:>2}{}{:<4}", selected, cell.date.day(), flag, moods)
}

fn legend() -> String {
    let moods: Vec<String> = Mood::ALL
        .iter()
        .map(|mood| format!("{} {}", mood.marker(), mood.as_str()))
        .collect();
    format!(
        "> selected  * today  . other month  + more\n{}\n",
        moods.join("  ")
    )
}

/// "st", "nd", "rd" or "th" for a day of the month.
pub fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// Heading such as "Monday, January 15th, 2024".
pub fn day_heading(date: NaiveDate) -> String {
    format!(
        "{}, {} {}{}, {}",
        date.format("%A"),
        date.format("%B"),
        date.day(),
        ordinal_suffix(date.day()),
        date.year()
    )
}

/// Creation time in the local timezone, e.g. "Jan 15, 2024, 2:30 PM".
pub fn format_created_at(created_at: DateTime<Utc>) -> String {
    format_timestamp(&created_at.with_timezone(&Local))
}

fn format_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    at.format(CREATED_AT_FORMAT).to_string()
}

/// One entry as a card.
pub fn render_entry(entry: &JournalEntry) -> String {
    render_entry_at(entry, &format_created_at(entry.created_at))
}

fn render_entry_at(entry: &JournalEntry, created: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} {}\n", entry.mood.emoji(), entry.title));
    out.push_str(&format!("   {} · {}\n", entry.mood.label(), created));
    for line in entry.description.lines() {
        out.push_str(&format!("   {}\n", line));
    }
    if entry.image_url.is_some() {
        out.push_str("   [image attached]\n");
    }
    out.push_str(&format!("   id: {}\n", entry.id));
    out
}

/// The day heading followed by its entries, or a hint when there are none.
pub fn render_day(date: NaiveDate, entries: &[&JournalEntry]) -> String {
    let mut out = format!("{}\n\n", day_heading(date));

    if entries.is_empty() {
        out.push_str("No entries for this day.\n");
        out.push_str(&format!(
            "Add one with: happyday add --date {} --title \"...\"\n",
            format_date(date)
        ));
        return out;
    }

    let cards: Vec<String> = entries.iter().map(|entry| render_entry(entry)).collect();
    out.push_str(&cards.join("\n"));
    out
}
