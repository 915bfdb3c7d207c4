//! Journal entry types.

use crate::errors::ValidationError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the day felt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    #[default]
    Happy,
    Sad,
    Angry,
    Excited,
    Confused,
}

impl Mood {
    /// Every mood, in the order the editor offers them.
    pub const ALL: [Mood; 5] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Angry,
        Mood::Excited,
        Mood::Confused,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Angry => "angry",
            Mood::Excited => "excited",
            Mood::Confused => "confused",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::Sad => "Sad",
            Mood::Angry => "Angry",
            Mood::Excited => "Excited",
            Mood::Confused => "Confused",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Mood::Happy => "😊",
            Mood::Sad => "😢",
            Mood::Angry => "😠",
            Mood::Excited => "😃",
            Mood::Confused => "😕",
        }
    }

    /// Single character drawn in a grid cell.
    pub fn marker(&self) -> char {
        match self {
            Mood::Happy => 'h',
            Mood::Sad => 's',
            Mood::Angry => 'a',
            Mood::Excited => 'e',
            Mood::Confused => 'c',
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Mood::ALL
            .into_iter()
            .find(|mood| mood.as_str() == wanted)
            .ok_or_else(|| ValidationError::UnknownMood(s.to_string()))
    }
}

/// A dated journal entry as stored in a user's collection.
///
/// Serializes with the camelCase field names of the persisted layout:
///
/// ```
/// use happyday::journal::{JournalEntry, Mood};
/// use chrono::{NaiveDate, TimeZone, Utc};
///
/// let entry = JournalEntry {
///     id: "0190".to_string(),
///     date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
///     title: "Walk".to_string(),
///     description: String::new(),
///     mood: Mood::Happy,
///     image_url: None,
///     created_at: Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 0).unwrap(),
/// };
///
/// let json = serde_json::to_string(&entry).unwrap();
/// assert!(json.contains("\"date\":\"2024-01-15\""));
/// assert!(json.contains("\"createdAt\""));
/// assert!(!json.contains("imageUrl"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: String,
    pub date: NaiveDate,
    pub title: String,
    pub description: String,
    pub mood: Mood,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl JournalEntry {
    /// The form fields of this entry, for pre-filling an edit.
    pub fn to_new_entry(&self) -> NewEntry {
        NewEntry {
            date: self.date,
            title: self.title.clone(),
            description: self.description.clone(),
            mood: self.mood,
            image_url: self.image_url.clone(),
        }
    }

    /// Replaces every mutable field, keeping `id` and `created_at`.
    pub fn apply(&mut self, fields: NewEntry) {
        self.date = fields.date;
        self.title = fields.title;
        self.description = fields.description;
        self.mood = fields.mood;
        self.image_url = fields.image_url;
    }
}

/// An entry as submitted by the editor, before the store assigns its id
/// and creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub date: NaiveDate,
    pub title: String,
    pub description: String,
    pub mood: Mood,
    pub image_url: Option<String>,
}

impl NewEntry {
    /// An empty form for `date` with the default mood.
    pub fn blank(date: NaiveDate) -> Self {
        Self {
            date,
            title: String::new(),
            description: String::new(),
            mood: Mood::default(),
            image_url: None,
        }
    }

    /// Rejects a title that is empty or only whitespace.
    ///
    /// ```
    /// use happyday::journal::NewEntry;
    /// use chrono::NaiveDate;
    ///
    /// let mut form = NewEntry::blank(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    /// assert!(form.validate().is_err());
    /// form.title = "Sunny".to_string();
    /// assert!(form.validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(())
    }
}
