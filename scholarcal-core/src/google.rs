//! Google Calendar "add event" links.
//!
//! The link opens Google Calendar's event-creation form pre-filled with the
//! deadline. Building it makes no network call.

use crate::event::{CalendarEvent, ResolvedDeadline};
use urlencoding::encode;

const RENDER_URL: &str = "https://calendar.google.com/calendar/render";

/// Build the deep link for an event.
///
/// `dates` is `start/end` in compact form: `YYYYMMDD` pairs (end exclusive)
/// for all-day deadlines, floating `YYYYMMDDTHHMMSS` pairs otherwise.
pub fn event_url(event: &CalendarEvent, deadline: &ResolvedDeadline) -> String {
    let dates = format!(
        "{}/{}",
        deadline.start.to_compact(),
        deadline.end.to_compact()
    );

    let mut params = vec![
        ("action", "TEMPLATE".to_string()),
        ("text", event.title.clone()),
        ("dates", dates),
    ];
    if !event.description.is_empty() {
        params.push(("details", event.description.clone()));
    }

    let query = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, encode(value)))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", RENDER_URL, query)
}

#[cfg(test)]
mod tests {
    use crate::event::CalendarEvent;
    use crate::formatter::tests::make_test_formatter;
    use std::collections::HashMap;
    use url::Url;

    fn query_of(link: &str) -> HashMap<String, String> {
        Url::parse(link)
            .expect("Link should be a valid URL")
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_event_url_merit_scholarship() {
        let event = CalendarEvent::new("Merit Scholarship", "Awarded for excellence", "March 15, 2024");
        let link = make_test_formatter().build_external_calendar_url(&event);

        assert!(link.starts_with("https://calendar.google.com/calendar/render?action=TEMPLATE&"));
        assert!(link.contains("text=Merit%20Scholarship"), "Got: {}", link);
        assert!(link.contains("dates=20240315%2F20240316"), "Got: {}", link);
        assert!(link.contains("details=Awarded%20for%20excellence"), "Got: {}", link);
    }

    #[test]
    fn test_event_url_decodes_to_original_text() {
        let title = "Smith & Jones: 100% Tuition? #1 + more";
        let description = "Line one\nLine two, with \"quotes\" and = signs\nhttps://example.org/a?b=c&d=e";
        let event = CalendarEvent::new(title, description, "2024-05-01");
        let link = make_test_formatter().build_external_calendar_url(&event);

        let query = query_of(&link);
        assert_eq!(query["text"], title);
        assert_eq!(query["details"], description);
        assert_eq!(query["action"], "TEMPLATE");
        assert!(!link.contains(' '));
        assert!(!link.contains('\n'));
    }

    #[test]
    fn test_event_url_timed_deadline() {
        let event = CalendarEvent::new("Essay Prize", "", "March 15, 2024 5:00 PM");
        let link = make_test_formatter().build_external_calendar_url(&event);

        let query = query_of(&link);
        assert_eq!(query["dates"], "20240315T170000/20240315T180000");
        assert!(!query.contains_key("details"));
    }

    #[test]
    fn test_event_url_unparsable_deadline_uses_fallback() {
        let event = CalendarEvent::new("Community Award", "Apply online", "");
        let link = make_test_formatter().build_external_calendar_url(&event);

        let query = query_of(&link);
        assert_eq!(query["dates"], "20240110/20240111");
        assert_eq!(query["text"], "Community Award");
    }

    #[test]
    fn test_event_url_unicode_title() {
        let event = CalendarEvent::new("Beca Académica", "", "2024-05-01");
        let link = make_test_formatter().build_external_calendar_url(&event);

        assert!(link.contains("text=Beca%20Acad%C3%A9mica"), "Got: {}", link);
        assert_eq!(query_of(&link)["text"], "Beca Académica");
    }
}
