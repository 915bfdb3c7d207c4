//! User-facing notices for session and journal operations.

use std::fmt;
use tracing::{info, warn};

pub const LOGIN_SUCCESSFUL: &str = "Login successful";
pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTRATION_SUCCESSFUL: &str = "Registration successful";
pub const LOGGED_OUT: &str = "Logged out";
pub const EVENT_ADDED: &str = "Event added";
pub const EVENT_UPDATED: &str = "Event updated";
pub const EVENT_DELETED: &str = "Event deleted";
pub const TITLE_REQUIRED: &str = "Title required";
pub const PASSWORD_CHANGED: &str = "Password changed";
pub const PASSWORD_CHANGE_FAILED: &str = "Password change failed";
pub const UPLOAD_FAILED: &str = "Upload failed";
pub const COULD_NOT_SAVE: &str = "Could not save";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A short message about the outcome of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn success(title: &str, description: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: title.to_string(),
            description: description.into(),
        }
    }

    pub fn error(title: &str, description: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.to_string(),
            description: description.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.description.is_empty() {
            write!(f, "{}", self.title)
        } else {
            write!(f, "{}: {}", self.title, self.description)
        }
    }
}

/// Receives notices. Delivery is best effort and never fails.
pub trait Notifier {
    fn notify(&self, notice: Notice);
}

/// Writes notices to the tracing log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => info!(title = %notice.title, "{}", notice.description),
            NoticeLevel::Error => warn!(title = %notice.title, "{}", notice.description),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_description_when_present() {
        let notice = Notice::success(EVENT_ADDED, "Walk in the park");
        assert_eq!(notice.to_string(), "Event added: Walk in the park");

        let notice = Notice::success(LOGGED_OUT, "");
        assert_eq!(notice.to_string(), "Logged out");
    }

    #[test]
    fn test_levels() {
        assert!(Notice::error(LOGIN_FAILED, "Invalid credentials").is_error());
        assert!(!Notice::success(LOGIN_SUCCESSFUL, "").is_error());
    }

    #[test]
    fn test_tracing_notifier_accepts_both_levels() {
        let notifier = TracingNotifier;
        notifier.notify(Notice::success(EVENT_DELETED, ""));
        notifier.notify(Notice::error(COULD_NOT_SAVE, "disk full"));
    }
}
