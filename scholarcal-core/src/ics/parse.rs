//! ICS file parsing.

use crate::error::{CalendarError, CalendarResult};
use crate::event::{EventTime, Reminder};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// An event read back from an .ics payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedEvent {
    pub uid: String,
    pub summary: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub start: EventTime,
    pub end: Option<EventTime>,
    pub reminders: Vec<Reminder>,
}

/// Fields collected while walking one VEVENT.
#[derive(Default)]
struct EventBuilder {
    uid: Option<String>,
    summary: Option<String>,
    description: Option<String>,
    url: Option<String>,
    start: Option<EventTime>,
    end: Option<EventTime>,
    reminders: Vec<Reminder>,
}

impl EventBuilder {
    fn finish(self) -> CalendarResult<ParsedEvent> {
        let uid = self
            .uid
            .ok_or_else(|| CalendarError::IcsParse("VEVENT without UID".to_string()))?;
        let start = self
            .start
            .ok_or_else(|| CalendarError::IcsParse(format!("VEVENT {} without DTSTART", uid)))?;

        Ok(ParsedEvent {
            uid,
            summary: self.summary.unwrap_or_else(|| "(No title)".to_string()),
            description: self.description,
            url: self.url,
            start,
            end: self.end,
            reminders: self.reminders,
        })
    }
}

/// Parse every VEVENT of an .ics document.
pub fn parse_payload(content: &str) -> CalendarResult<Vec<ParsedEvent>> {
    let lines = unfold_lines(content);

    if lines.first().map(|l| l.trim()) != Some("BEGIN:VCALENDAR") {
        return Err(CalendarError::IcsParse(
            "Missing BEGIN:VCALENDAR".to_string(),
        ));
    }

    let mut events = Vec::new();
    let mut current: Option<EventBuilder> = None;
    let mut in_valarm = false;

    for line in &lines {
        match line.as_str() {
            "BEGIN:VEVENT" => {
                current = Some(EventBuilder::default());
                continue;
            }
            "END:VEVENT" => {
                if let Some(builder) = current.take() {
                    events.push(builder.finish()?);
                }
                continue;
            }
            "BEGIN:VALARM" => {
                in_valarm = true;
                continue;
            }
            "END:VALARM" => {
                in_valarm = false;
                continue;
            }
            _ => {}
        }

        let Some(builder) = current.as_mut() else {
            continue;
        };
        let Some((key, params, value)) = parse_property_line(line) else {
            continue;
        };

        if in_valarm {
            if key == "TRIGGER" {
                if let Some(minutes) = parse_trigger_minutes(value) {
                    builder.reminders.push(Reminder { minutes });
                }
            }
            continue;
        }

        match key {
            "UID" => builder.uid = Some(value.to_string()),
            "SUMMARY" => builder.summary = Some(unescape_text(value)),
            "DESCRIPTION" => builder.description = Some(unescape_text(value)),
            "URL" => builder.url = Some(value.to_string()),
            "DTSTART" => builder.start = parse_datetime(value, params),
            "DTEND" => builder.end = parse_datetime(value, params),
            _ => {}
        }
    }

    if current.is_some() {
        return Err(CalendarError::IcsParse(
            "VEVENT is missing END:VEVENT".to_string(),
        ));
    }

    Ok(events)
}

/// Split into logical lines, joining folded continuations.
///
/// Only the single leading space or tab of a continuation is removed; any
/// other whitespace belongs to the value.
fn unfold_lines(content: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();

    for line in content.lines() {
        if line.starts_with(' ') || line.starts_with('\t') {
            if let Some(last) = lines.last_mut() {
                last.push_str(&line[1..]);
                continue;
            }
        }
        if !line.is_empty() {
            lines.push(line.to_string());
        }
    }

    lines
}

/// Split a content line into key, parameters, and raw value
fn parse_property_line(line: &str) -> Option<(&str, &str, &str)> {
    let (key_part, value) = line.split_once(':')?;
    let (key, params) = key_part.split_once(';').unwrap_or((key_part, ""));
    Some((key, params, value))
}

/// Unescape a TEXT value per RFC 5545
/// Reverses: \, → , and \; → ; and \\ → \ and \n → newline
pub fn unescape_text(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.peek() {
            Some(',') | Some(';') | Some('\\') => {
                if let Some(next) = chars.next() {
                    result.push(next);
                }
            }
            Some('n') | Some('N') => {
                result.push('\n');
                chars.next();
            }
            // Keep backslash if not a recognized escape
            _ => result.push(c),
        }
    }

    result
}

/// Parse a DTSTART/DTEND value.
///
/// UTC values (trailing Z) are kept as the written wall-clock time.
fn parse_datetime(value: &str, params: &str) -> Option<EventTime> {
    let is_date = params.split(';').any(|p| p == "VALUE=DATE");

    if is_date || (value.len() == 8 && value.chars().all(|c| c.is_ascii_digit())) {
        return NaiveDate::parse_from_str(value, "%Y%m%d")
            .ok()
            .map(EventTime::Date);
    }

    let value = value.trim_end_matches('Z');
    NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S")
        .ok()
        .map(EventTime::DateTimeFloating)
}

/// Parse TRIGGER value to minutes before event
fn parse_trigger_minutes(value: &str) -> Option<i64> {
    // Format: -PT{n}M, -PT{n}H, -P{n}D, -PT{n}S, etc.
    let is_before = value.starts_with('-');
    let duration_part = value
        .trim_start_matches(['-', '+'])
        .trim_start_matches('P')
        .trim_start_matches('T');

    let (unit_at, _) = duration_part.char_indices().last()?;
    let (amount, unit) = duration_part.split_at(unit_at);
    let amount = amount.parse::<i64>().ok()?;
    let minutes = match unit {
        "S" => amount / 60,
        "M" => amount,
        "H" => amount.checked_mul(60)?,
        "D" => amount.checked_mul(24 * 60)?,
        "W" => amount.checked_mul(7 * 24 * 60)?,
        _ => return None,
    };

    if is_before {
        Some(minutes)
    } else {
        minutes.checked_neg()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::CalendarEvent;
    use crate::formatter::tests::make_test_formatter;

    fn roundtrip(title: &str, description: &str) -> ParsedEvent {
        let event = CalendarEvent::new(title, description, "March 15, 2024");
        let ics = make_test_formatter().build_file_payload(&event);
        let mut events = parse_payload(&ics).expect("Should parse generated ICS");
        assert_eq!(events.len(), 1, "Expected exactly one event. ICS:\n{}", ics);
        events.remove(0)
    }

    #[test]
    fn test_roundtrip_plain_text() {
        let parsed = roundtrip("Merit Scholarship", "Awarded for excellence");
        assert_eq!(parsed.summary, "Merit Scholarship");
        assert_eq!(parsed.description.as_deref(), Some("Awarded for excellence"));
        assert_eq!(
            parsed.start,
            EventTime::Date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
        );
        assert_eq!(
            parsed.end,
            Some(EventTime::Date(NaiveDate::from_ymd_opt(2024, 3, 16).unwrap()))
        );
        assert_eq!(parsed.reminders, vec![Reminder { minutes: 1440 }]);
    }

    #[test]
    fn test_roundtrip_special_characters() {
        let title = "Smith, Jones; and \\ Partners";
        let description = "Requirements:\n- GPA 3.5; or higher\n- Essay, 500 words\\max";
        let parsed = roundtrip(title, description);
        assert_eq!(parsed.summary, title);
        assert_eq!(parsed.description.as_deref(), Some(description));
    }

    #[test]
    fn test_roundtrip_long_unicode_text() {
        let title = "Beca de Excelencia Académica para Estudiantes Latinoamericanos 2024–2025";
        let description = "Más información: ".repeat(12);
        let parsed = roundtrip(title, &description);
        assert_eq!(parsed.summary, title);
        assert_eq!(parsed.description.as_deref(), Some(description.as_str()));
    }

    #[test]
    fn test_roundtrip_url_description() {
        let parsed = roundtrip("Merit Scholarship", "https://example.org/apply");
        assert_eq!(parsed.description.as_deref(), Some("https://example.org/apply"));
        assert_eq!(parsed.url.as_deref(), Some("https://example.org/apply"));
    }

    #[test]
    fn test_unescape_text() {
        assert_eq!(unescape_text("a\\,b\\;c\\\\d\\ne"), "a,b;c\\d\ne");
        assert_eq!(unescape_text("trailing\\"), "trailing\\");
        assert_eq!(unescape_text("unknown\\x"), "unknown\\x");
    }

    #[test]
    fn test_parse_line_folding_preserves_whitespace() {
        let ics = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:TEST\r\n\
BEGIN:VEVENT\r\n\
UID:test-123\r\n\
SUMMARY:Test\r\n\
DTSTART:20240101T100000Z\r\n\
DTEND:20240101T110000Z\r\n\
DESCRIPTION:Hello \r\n world and \r\n more text\r\n\
END:VEVENT\r\n\
END:VCALENDAR";

        let events = parse_payload(ics).expect("Should parse");

        assert_eq!(
            events[0].description.as_deref(),
            Some("Hello world and more text"),
            "Line folding should preserve the space before 'world'"
        );
        assert_eq!(
            events[0].start,
            EventTime::DateTimeFloating(
                NaiveDate::from_ymd_opt(2024, 1, 1)
                    .unwrap()
                    .and_hms_opt(10, 0, 0)
                    .unwrap()
            )
        );
    }

    #[test]
    fn test_parse_rejects_non_calendar() {
        assert!(matches!(
            parse_payload("hello world"),
            Err(CalendarError::IcsParse(_))
        ));
        assert!(parse_payload("").is_err());
    }

    #[test]
    fn test_parse_rejects_event_without_start() {
        let ics = "BEGIN:VCALENDAR\nBEGIN:VEVENT\nUID:x\nSUMMARY:No start\nEND:VEVENT\nEND:VCALENDAR\n";
        assert!(matches!(parse_payload(ics), Err(CalendarError::IcsParse(_))));
    }

    #[test]
    fn test_parse_rejects_unterminated_event() {
        let ics = "BEGIN:VCALENDAR\nBEGIN:VEVENT\nUID:x\nDTSTART;VALUE=DATE:20240101\n";
        assert!(parse_payload(ics).is_err());
    }

    #[test]
    fn test_parse_trigger_minutes() {
        assert_eq!(parse_trigger_minutes("-PT30M"), Some(30));
        assert_eq!(parse_trigger_minutes("-PT2H"), Some(120));
        assert_eq!(parse_trigger_minutes("-P1D"), Some(1440));
        assert_eq!(parse_trigger_minutes("-P1W"), Some(10080));
        assert_eq!(parse_trigger_minutes("PT15M"), Some(-15));
        assert_eq!(parse_trigger_minutes("-PT86400S"), Some(1440));
        assert_eq!(parse_trigger_minutes("garbage"), None);
        assert_eq!(parse_trigger_minutes(""), None);
    }

    #[test]
    fn test_parse_trigger_minutes_overflow_is_ignored() {
        assert_eq!(parse_trigger_minutes("-P9999999999999999W"), None);
        assert_eq!(parse_trigger_minutes("-P9999999999999999D"), None);
        assert_eq!(parse_trigger_minutes("-PT9223372036854775807H"), None);
        assert_eq!(parse_trigger_minutes("-PT99999999999999999999M"), None);
        assert_eq!(parse_trigger_minutes("PT-9223372036854775808M"), None);
        assert_eq!(parse_trigger_minutes("-PT5é"), None);

        let ics = "BEGIN:VCALENDAR\r\n\
BEGIN:VEVENT\r\n\
UID:huge-alarm\r\n\
DTSTART;VALUE=DATE:20240315\r\n\
BEGIN:VALARM\r\n\
ACTION:DISPLAY\r\n\
TRIGGER:-P9999999999999999W\r\n\
END:VALARM\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";
        let events = parse_payload(ics).expect("Should parse");
        assert!(events[0].reminders.is_empty());
    }
}
