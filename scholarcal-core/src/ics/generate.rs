//! ICS file generation.

use super::UID_DOMAIN;
use crate::event::{CalendarEvent, EventTime, ResolvedDeadline};
use crate::formatter::FormatterOptions;
use chrono::{DateTime, Utc};
use icalendar::{Alarm, Calendar, Component, EventLike, Property, Trigger, ValueType};
use url::Url;

/// Generate a standalone .ics document holding one event for a deadline.
pub fn generate_ics(
    event: &CalendarEvent,
    deadline: &ResolvedDeadline,
    now: DateTime<Utc>,
    options: &FormatterOptions,
) -> String {
    let mut cal = Calendar::empty();
    cal.append_property(Property::new("VERSION", "2.0"));
    cal.append_property(Property::new("PRODID", normalize_newlines(&options.product_id)));
    cal.append_property(Property::new("METHOD", "PUBLISH"));

    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&format!("{}@{}", uuid::Uuid::new_v4(), UID_DOMAIN));

    // DTSTAMP is required by RFC 5545; CREATED records the same export moment
    let stamp = now.format("%Y%m%dT%H%M%SZ").to_string();
    ics_event.add_property("DTSTAMP", &stamp);
    ics_event.add_property("CREATED", &stamp);

    add_datetime_property(&mut ics_event, "DTSTART", &deadline.start);
    add_datetime_property(&mut ics_event, "DTEND", &deadline.end);

    ics_event.summary(&normalize_newlines(&event.title));

    if !event.description.is_empty() {
        ics_event.description(&normalize_newlines(&event.description));
        if let Some(url) = description_url(&event.description) {
            ics_event.add_property("URL", url.as_str());
        }
    }

    // A deadline doesn't occupy the day
    ics_event.add_property("TRANSP", "TRANSPARENT");

    for reminder in &options.reminders {
        let Some(before) = chrono::Duration::try_minutes(reminder.minutes) else {
            continue;
        };
        ics_event.alarm(Alarm::display("Reminder", Trigger::before_start(before)));
    }

    cal.push(ics_event.done());

    strip_alarm_bloat(&cal.done().to_string())
}

/// DTSTART/DTEND, with VALUE=DATE for all-day events
fn add_datetime_property(ics_event: &mut icalendar::Event, name: &str, time: &EventTime) {
    match time {
        EventTime::Date(_) => {
            let mut prop = Property::new(name, time.to_compact());
            prop.append_parameter(ValueType::Date);
            ics_event.append_property(prop);
        }
        EventTime::DateTimeFloating(_) => {
            ics_event.add_property(name, time.to_compact());
        }
    }
}

/// icalendar stamps every component with DTSTAMP and UID; VALARM needs neither.
fn strip_alarm_bloat(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());
    let mut in_valarm = false;

    for line in ics.lines() {
        if line == "BEGIN:VALARM" {
            in_valarm = true;
        } else if line == "END:VALARM" {
            in_valarm = false;
        }

        if in_valarm && (line.starts_with("DTSTAMP:") || line.starts_with("UID:")) {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}

/// icalendar escapes `\n` but passes `\r` through raw, so CRLF and lone CR
/// are turned into plain newlines first.
fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// The description as a link, when it is nothing but an http(s) URL.
fn description_url(description: &str) -> Option<Url> {
    let trimmed = description.trim();
    if trimmed.contains(char::is_whitespace) {
        return None;
    }
    let url = Url::parse(trimmed).ok()?;
    matches!(url.scheme(), "http" | "https").then_some(url)
}
