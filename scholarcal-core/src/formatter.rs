//! The calendar event formatter.
//!
//! `CalendarEventFormatter` owns a clock snapshot and the export options,
//! and exposes the two pure outputs of an "Add to calendar" click: the
//! `.ics` payload and the Google Calendar link.

use crate::deadline::parse_deadline;
use crate::error::CalendarError;
use crate::event::{CalendarEvent, EventTime, Reminder, ResolvedDeadline};
use crate::{filename, google, ics};
use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use tracing::warn;

/// Options that shape every exported event.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatterOptions {
    /// Length of a deadline that names a time of day
    pub timed_duration: Duration,
    /// Days after the reference date used when the deadline is unparsable
    pub fallback_offset_days: i64,
    /// Alarms attached to the `.ics` payload
    pub reminders: Vec<Reminder>,
    /// PRODID of the generated calendar
    pub product_id: String,
}

impl Default for FormatterOptions {
    fn default() -> Self {
        FormatterOptions {
            timed_duration: Duration::hours(1),
            fallback_offset_days: 0,
            reminders: vec![Reminder { minutes: 24 * 60 }],
            product_id: "SCHOLARCAL".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CalendarEventFormatter {
    options: FormatterOptions,
    now: DateTime<Utc>,
    today: NaiveDate,
}

impl CalendarEventFormatter {
    /// Formatter using the system clock.
    pub fn new(options: FormatterOptions) -> Self {
        CalendarEventFormatter {
            options,
            now: Utc::now(),
            today: Local::now().date_naive(),
        }
    }

    /// Formatter with a pinned clock.
    pub fn at(now: DateTime<Utc>, today: NaiveDate, options: FormatterOptions) -> Self {
        CalendarEventFormatter {
            options,
            now,
            today,
        }
    }

    pub fn options(&self) -> &FormatterOptions {
        &self.options
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// The date used when the deadline cannot be parsed.
    ///
    /// An offset that leaves chrono's calendar is ignored.
    pub fn fallback_date(&self) -> NaiveDate {
        Duration::try_days(self.options.fallback_offset_days)
            .and_then(|offset| self.today.checked_add_signed(offset))
            .unwrap_or(self.today)
    }

    /// Work out start and end for a deadline, falling back to an all-day
    /// event on `fallback_date` when the text is unusable.
    pub fn resolve(&self, deadline_text: &str) -> ResolvedDeadline {
        let parsed = parse_deadline(deadline_text).and_then(|start| {
            self.default_end(&start)
                .map(|end| (start, end))
                .ok_or_else(|| CalendarError::DateRange(deadline_text.to_string()))
        });

        match parsed {
            Ok((start, end)) => ResolvedDeadline {
                start,
                end,
                fell_back: false,
            },
            Err(e) => {
                let start = EventTime::Date(self.fallback_date());
                warn!(
                    deadline = deadline_text,
                    fallback = %start.date(),
                    "{}, using fallback date",
                    e
                );
                ResolvedDeadline {
                    start,
                    end: self.default_end(&start).unwrap_or(start),
                    fell_back: true,
                }
            }
        }
    }

    /// Default end time: +1 day for all-day events, +`timed_duration` otherwise.
    fn default_end(&self, start: &EventTime) -> Option<EventTime> {
        match start {
            EventTime::Date(_) => start.shifted(Duration::days(1)),
            EventTime::DateTimeFloating(_) => start.shifted(self.options.timed_duration),
        }
    }

    /// A standalone `.ics` document holding exactly one event.
    pub fn build_file_payload(&self, event: &CalendarEvent) -> String {
        self.payload_for(event, &self.resolve(&event.deadline_text))
    }

    /// `build_file_payload` for a deadline that is already resolved.
    pub fn payload_for(&self, event: &CalendarEvent, deadline: &ResolvedDeadline) -> String {
        ics::generate_ics(event, deadline, self.now, &self.options)
    }

    /// A Google Calendar link that pre-fills the "add event" form.
    pub fn build_external_calendar_url(&self, event: &CalendarEvent) -> String {
        self.url_for(event, &self.resolve(&event.deadline_text))
    }

    pub fn url_for(&self, event: &CalendarEvent, deadline: &ResolvedDeadline) -> String {
        google::event_url(event, deadline)
    }

    /// File name offered for the downloaded payload.
    pub fn suggested_file_name(&self, event: &CalendarEvent) -> String {
        filename::ics_filename(&event.title)
    }
}

impl Default for CalendarEventFormatter {
    fn default() -> Self {
        CalendarEventFormatter::new(FormatterOptions::default())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;

    pub(crate) fn make_test_formatter() -> CalendarEventFormatter {
        CalendarEventFormatter::at(
            Utc.with_ymd_and_hms(2024, 1, 10, 12, 30, 0).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            FormatterOptions::default(),
        )
    }

    #[test]
    fn test_resolve_date_only_is_all_day_for_one_day() {
        let resolved = make_test_formatter().resolve("March 15, 2024");
        assert!(!resolved.fell_back);
        assert_eq!(
            resolved.start,
            EventTime::Date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
        );
        assert_eq!(
            resolved.end,
            EventTime::Date(NaiveDate::from_ymd_opt(2024, 3, 16).unwrap())
        );
    }

    #[test]
    fn test_resolve_timed_uses_configured_duration() {
        let options = FormatterOptions {
            timed_duration: Duration::minutes(30),
            ..FormatterOptions::default()
        };
        let formatter = CalendarEventFormatter::at(
            Utc.with_ymd_and_hms(2024, 1, 10, 12, 30, 0).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            options,
        );

        let resolved = formatter.resolve("2024-03-15 17:00");
        let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(
            resolved.end,
            EventTime::DateTimeFloating(day.and_hms_opt(17, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_resolve_unparsable_falls_back_to_reference_date() {
        let resolved = make_test_formatter().resolve("");
        assert!(resolved.fell_back);
        assert_eq!(
            resolved.start,
            EventTime::Date(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap())
        );
        assert_eq!(
            resolved.end,
            EventTime::Date(NaiveDate::from_ymd_opt(2024, 1, 11).unwrap())
        );
    }

    #[test]
    fn test_resolve_fallback_honours_offset() {
        let options = FormatterOptions {
            fallback_offset_days: 7,
            ..FormatterOptions::default()
        };
        let formatter = CalendarEventFormatter::at(
            Utc.with_ymd_and_hms(2024, 1, 10, 12, 30, 0).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            options,
        );

        let resolved = formatter.resolve("Rolling admissions");
        assert!(resolved.fell_back);
        assert_eq!(
            resolved.start,
            EventTime::Date(NaiveDate::from_ymd_opt(2024, 1, 17).unwrap())
        );
    }

    #[test]
    fn test_suggested_file_name_is_slugged() {
        let event = CalendarEvent::new("Merit Scholarship", "", "March 15, 2024");
        assert_eq!(
            make_test_formatter().suggested_file_name(&event),
            "merit-scholarship.ics"
        );
    }

    #[test]
    fn test_resolve_deadline_at_end_of_calendar_falls_back() {
        let formatter = make_test_formatter();
        let today = EventTime::Date(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());

        for text in ["+262142-12-31", "+262142-12-31 23:30"] {
            let resolved = formatter.resolve(text);
            assert!(resolved.fell_back, "{} has no representable end", text);
            assert_eq!(resolved.start, today);

            let ics = formatter.build_file_payload(&CalendarEvent::new("Award", "", text));
            assert!(ics.contains("\r\nDTSTART;VALUE=DATE:20240110\r\n"), "ICS:\n{}", ics);
            let link = formatter.build_external_calendar_url(&CalendarEvent::new("Award", "", text));
            assert!(link.contains("dates=20240110%2F20240111"), "Got: {}", link);
        }
    }

    #[test]
    fn test_fallback_offset_out_of_range_uses_today() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        for offset in [i64::MAX, i64::MIN, 200_000_000] {
            let formatter = CalendarEventFormatter::at(
                Utc.with_ymd_and_hms(2024, 1, 10, 12, 30, 0).unwrap(),
                today,
                FormatterOptions {
                    fallback_offset_days: offset,
                    ..FormatterOptions::default()
                },
            );

            assert_eq!(formatter.fallback_date(), today);
            let resolved = formatter.resolve("Rolling");
            assert_eq!(resolved.start, EventTime::Date(today));
        }
    }

    #[test]
    fn test_fallback_on_last_day_keeps_an_end() {
        let formatter = CalendarEventFormatter::at(
            Utc.with_ymd_and_hms(2024, 1, 10, 12, 30, 0).unwrap(),
            NaiveDate::MAX,
            FormatterOptions::default(),
        );

        let resolved = formatter.resolve("");
        assert!(resolved.fell_back);
        assert_eq!(resolved.end, resolved.start);
    }
}
