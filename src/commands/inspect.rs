use anyhow::{Context, Result};
use scholarcal_core::ics::{parse_payload, ParsedEvent};
use scholarcal_core::EventTime;
use std::path::Path;

pub fn run(file: &Path, json: bool) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let events = parse_payload(&content)
        .with_context(|| format!("Failed to parse {}", file.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }

    if events.is_empty() {
        println!("No events found");
        return Ok(());
    }

    for (i, event) in events.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_event(event);
    }

    Ok(())
}

fn print_event(event: &ParsedEvent) {
    println!("{}", event.summary);
    println!("  When: {}", format_time(&event.start));
    if let Some(description) = &event.description {
        for line in description.lines() {
            println!("  {}", line);
        }
    }
    for reminder in &event.reminders {
        println!("  Reminder: {} min before", reminder.minutes);
    }
}

/// Format an event time (e.g. "2024-03-15 (all-day)" or "2024-03-15 17:00")
fn format_time(time: &EventTime) -> String {
    match time {
        EventTime::Date(d) => format!("{} (all-day)", d.format("%Y-%m-%d")),
        EventTime::DateTimeFloating(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
    }
}
