pub mod assistant;
pub mod ics;
pub mod inspect;
pub mod link;

use scholarcal_core::CalendarEvent;

/// The event a card would hand over, trimmed of stray whitespace.
pub fn event_from_args(title: String, description: String, deadline: String) -> CalendarEvent {
    CalendarEvent::new(title.trim(), description.trim(), deadline.trim())
}
