//! Deadline text parsing.
//!
//! Deadlines come straight from the matching API as display strings
//! ("March 15, 2024", "2024-03-15", "Rolling"), so parsing is best-effort:
//! explicit formats first, then natural language via fuzzydate. Callers that
//! must always produce output go through `CalendarEventFormatter::resolve`,
//! which applies the fallback date.

use crate::error::{CalendarError, CalendarResult};
use crate::event::EventTime;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Formats that carry a time of day. Tried before `DATE_FORMATS`.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%B %d, %Y %I:%M %p",
    "%B %d, %Y %H:%M",
    "%b %d, %Y %I:%M %p",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%b %d %Y",
    "%d %b %Y",
    "%A, %B %d, %Y",
];

/// Parse a deadline string into an `EventTime`.
///
/// Returns `Date` when only a date is recoverable (the export becomes an
/// all-day event) and `DateTimeFloating` when the text also names a time.
/// Never panics; anything unrecognised is `CalendarError::DateParse`.
pub fn parse_deadline(input: &str) -> CalendarResult<EventTime> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CalendarError::DateParse(input.to_string()));
    }

    let cleaned = strip_ordinals(trimmed);

    if let Some(time) = parse_explicit(&cleaned) {
        return Ok(time);
    }

    parse_natural(&cleaned).ok_or_else(|| CalendarError::DateParse(input.to_string()))
}

fn parse_explicit(input: &str) -> Option<EventTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        // Keep the wall-clock time as written
        return Some(EventTime::DateTimeFloating(dt.naive_local()));
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, fmt) {
            return Some(EventTime::DateTimeFloating(dt));
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(input, fmt) {
            return Some(EventTime::Date(d));
        }
    }

    None
}

/// Relative and loosely written dates ("next friday", "tomorrow 5pm").
fn parse_natural(input: &str) -> Option<EventTime> {
    let expanded = expand_abbreviations(input);
    let dt = fuzzydate::parse(&expanded).ok()?;

    if has_time_component(input) {
        Some(EventTime::DateTimeFloating(dt))
    } else {
        Some(EventTime::Date(dt.date()))
    }
}

/// "15th" -> "15", "1st," -> "1,". Words like "August" are left alone.
fn strip_ordinals(input: &str) -> String {
    input
        .split_whitespace()
        .map(|word| {
            let (body, comma) = match word.strip_suffix(',') {
                Some(body) => (body, ","),
                None => (word, ""),
            };
            let digits = body.chars().take_while(|c| c.is_ascii_digit()).count();
            let suffix = body[digits..].to_ascii_lowercase();
            if digits > 0 && matches!(suffix.as_str(), "st" | "nd" | "rd" | "th") {
                format!("{}{}", &body[..digits], comma)
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

const DAY_AND_MONTH_NAMES: &[&str] = &[
    "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
    "january", "february", "march", "april", "may", "june", "july", "august",
    "september", "october", "november", "december",
];

/// "sat" -> "saturday", "sept" -> "september". fuzzydate only knows full names.
fn expand_abbreviations(input: &str) -> String {
    input
        .to_lowercase()
        .split_whitespace()
        .map(|word| {
            let bare = word.trim_end_matches([',', '.']);
            let full = (bare.len() >= 3)
                .then(|| DAY_AND_MONTH_NAMES.iter().find(|name| name.starts_with(bare)))
                .flatten();
            match full {
                Some(name) => word.replacen(bare, name, 1),
                None => word.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether the deadline text names a time of day: "6pm", "3 pm", "9:30",
/// "noon", "at 15".
fn has_time_component(input: &str) -> bool {
    let lower = input.to_lowercase();
    if lower.contains("noon") || lower.contains("midnight") {
        return true;
    }

    let is_number = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit() || c == ':');
    let words: Vec<&str> = lower.split_whitespace().map(|w| w.trim_end_matches(',')).collect();

    words.iter().enumerate().any(|(i, word)| {
        let previous = i.checked_sub(1).map(|p| words[p]);
        let clock = word.split_once(':').is_some_and(|(h, m)| {
            h.ends_with(|c: char| c.is_ascii_digit()) && m.starts_with(|c: char| c.is_ascii_digit())
        });
        let meridiem = match word.strip_suffix("am").or_else(|| word.strip_suffix("pm")) {
            Some("") => previous.is_some_and(is_number),
            Some(hour) => is_number(hour),
            None => false,
        };
        let after_at = previous == Some("at") && word.starts_with(|c: char| c.is_ascii_digit());

        clock || meridiem || after_at
    })
}
