//! ICS payload generation and parsing.
//!
//! Payloads are built with the icalendar crate, which escapes TEXT values
//! and folds content lines at 75 octets. The reader is a small line-based
//! parser used by `inspect` and by the round-trip tests.

mod generate;
mod parse;

pub use generate::generate_ics;
pub use parse::{parse_payload, unescape_text, ParsedEvent};

/// MIME type of a generated payload
pub const ICS_MIME_TYPE: &str = "text/calendar;charset=utf-8";

/// Suffix of every generated UID
pub(crate) const UID_DOMAIN: &str = "scholarcal";
