use crate::config::Config;
use anyhow::{bail, Result};
use scholarcal_core::host::{AddToCalendar, DesktopHost};
use scholarcal_core::CalendarEventFormatter;
use std::path::PathBuf;

pub fn run(
    cfg: &Config,
    title: String,
    description: String,
    deadline: String,
    out_dir: Option<PathBuf>,
) -> Result<()> {
    let formatter = CalendarEventFormatter::new(cfg.formatter_options()?);
    let host = DesktopHost::new(
        out_dir.unwrap_or_else(|| cfg.download_dir()),
        cfg.open_browser,
    );

    let event = super::event_from_args(title, description, deadline);
    let resolved = formatter.resolve(&event.deadline_text);

    let Some(path) = AddToCalendar::new(&formatter, &host).download_resolved(&event, &resolved)
    else {
        bail!(
            "Could not save the calendar file to {}",
            host.download_dir().display()
        );
    };

    if resolved.fell_back {
        eprintln!(
            "Couldn't read the deadline, exported as an all-day event on {}",
            resolved.start.date()
        );
    }
    println!("{}", path.display());

    Ok(())
}
