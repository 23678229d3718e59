//! Error types for calendar export.

use std::fmt;
use thiserror::Error;

/// Which host-side action was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostAction {
    SaveFile,
    OpenUrl,
}

impl fmt::Display for HostAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostAction::SaveFile => f.write_str("save file"),
            HostAction::OpenUrl => f.write_str("open url"),
        }
    }
}

/// Errors that can occur while exporting a deadline.
///
/// None of these are fatal to the caller: `DateParse` and `DateRange`
/// trigger the fallback date, and `HostAction` is logged and swallowed by `host::AddToCalendar`.
#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Could not parse deadline: \"{0}\"")]
    DateParse(String),

    #[error("Deadline \"{0}\" has no representable end")]
    DateRange(String),

    #[error("Host refused to {action}: {reason}")]
    HostAction { action: HostAction, reason: String },

    #[error("ICS parse error: {0}")]
    IcsParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CalendarError {
    pub(crate) fn host(action: HostAction, reason: impl Into<String>) -> Self {
        CalendarError::HostAction {
            action,
            reason: reason.into(),
        }
    }
}

/// Result type alias for calendar export operations.
pub type CalendarResult<T> = Result<T, CalendarError>;
