//! Calendar export for scholarship deadlines.
//!
//! This crate turns a scholarship's title, description, and free-form
//! deadline text into:
//! - an `.ics` payload that any calendar application can import (`ics`)
//! - a Google Calendar "add event" link (`google`)
//!
//! and hands either one to the host environment (`host`).

pub mod assistant;
pub mod deadline;
pub mod error;
pub mod event;
pub mod filename;
pub mod formatter;
pub mod google;
pub mod host;
pub mod ics;

pub use error::{CalendarError, CalendarResult, HostAction};
pub use event::*;
pub use formatter::{CalendarEventFormatter, FormatterOptions};
