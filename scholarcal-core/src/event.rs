//! Event value types.
//!
//! A `CalendarEvent` is what a scholarship card hands over when the user
//! clicks "Add to calendar". Nothing here is validated: titles may contain
//! reserved characters and the deadline may not be a date at all.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A scholarship deadline to be exported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub title: String,
    /// Free text; the results page often puts the application URL here.
    pub description: String,
    /// Human-readable deadline, e.g. "March 15, 2024".
    pub deadline_text: String,
}

impl CalendarEvent {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        deadline_text: impl Into<String>,
    ) -> Self {
        CalendarEvent {
            title: title.into(),
            description: description.into(),
            deadline_text: deadline_text.into(),
        }
    }
}

/// A point in time recovered from a deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventTime {
    /// All-day
    Date(NaiveDate),
    /// Wall-clock time without a zone; calendars render it in the viewer's zone
    DateTimeFloating(NaiveDateTime),
}

impl EventTime {
    pub fn is_all_day(&self) -> bool {
        matches!(self, EventTime::Date(_))
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            EventTime::Date(d) => *d,
            EventTime::DateTimeFloating(dt) => dt.date(),
        }
    }

    /// Compact iCalendar form, shared by DTSTART/DTEND and Google's `dates`.
    pub fn to_compact(&self) -> String {
        match self {
            EventTime::Date(d) => d.format("%Y%m%d").to_string(),
            EventTime::DateTimeFloating(dt) => dt.format("%Y%m%dT%H%M%S").to_string(),
        }
    }

    /// `None` when the result falls outside chrono's calendar.
    pub(crate) fn shifted(&self, by: Duration) -> Option<EventTime> {
        match self {
            EventTime::Date(d) => d.checked_add_signed(by).map(EventTime::Date),
            EventTime::DateTimeFloating(dt) => {
                dt.checked_add_signed(by).map(EventTime::DateTimeFloating)
            }
        }
    }
}

/// A reminder/alarm for an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    /// Minutes before the event to trigger
    pub minutes: i64,
}

/// Start and end of an exported deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDeadline {
    pub start: EventTime,
    /// Exclusive for all-day events
    pub end: EventTime,
    /// The deadline text was unusable and the fallback date was taken
    pub fell_back: bool,
}
