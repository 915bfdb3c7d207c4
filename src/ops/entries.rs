//! Create, edit, delete and list journal entries.

use crate::app::JournalApp;
use crate::calendar::format_date;
use crate::errors::AppResult;
use crate::journal::{Mood, NewEntry};
use crate::render;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// What to do with an entry's image when editing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageChange {
    #[default]
    Keep,
    Replace(PathBuf),
    Remove,
}

/// Fields to change on an existing entry; `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryEdit {
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    pub mood: Option<Mood>,
    pub description: Option<String>,
    pub image: ImageChange,
}

/// Lists the entries of `date`.
pub fn list_entries(app: &JournalApp, date: NaiveDate) -> AppResult<String> {
    Ok(render::render_day(date, &app.entries_on(date)?))
}

/// Saves a new entry, compressing `image` into it first when given.
///
/// # Errors
///
/// Returns an error if nobody is logged in, the title is blank, the image
/// cannot be processed or the collection cannot be saved.
pub fn add_entry(app: &mut JournalApp, mut fields: NewEntry, image: Option<&Path>) -> AppResult<String> {
    if let Some(path) = image {
        fields.image_url = Some(app.attach_image(path)?);
    }

    let entry = app.add_entry(fields)?;
    Ok(format!(
        "Added entry on {}\n\n{}",
        format_date(entry.date),
        render::render_entry(&entry)
    ))
}

/// Merges `changes` into the entry with `id` and saves it.
///
/// # Errors
///
/// Returns `AppError::EntryNotFound` for an unknown id, plus the errors of
/// `add_entry`.
pub fn edit_entry(app: &mut JournalApp, id: &str, changes: EntryEdit) -> AppResult<String> {
    let mut entry = app.entry(id)?.clone();

    if let Some(title) = changes.title {
        entry.title = title;
    }
    if let Some(date) = changes.date {
        entry.date = date;
    }
    if let Some(mood) = changes.mood {
        entry.mood = mood;
    }
    if let Some(description) = changes.description {
        entry.description = description;
    }
    match changes.image {
        ImageChange::Keep => {}
        ImageChange::Replace(path) => entry.image_url = Some(app.attach_image(&path)?),
        ImageChange::Remove => entry.image_url = None,
    }

    let entry = app.update_entry(entry)?;
    Ok(format!("Updated entry\n\n{}", render::render_entry(&entry)))
}

pub fn delete_entry(app: &mut JournalApp, id: &str) -> AppResult<String> {
    if app.delete_entry(id)? {
        Ok(format!("Deleted entry {}", id))
    } else {
        Ok(format!("No entry with id {}", id))
    }
}
