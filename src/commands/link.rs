use crate::config::Config;
use anyhow::Result;
use scholarcal_core::host::{AddToCalendar, DesktopHost};
use scholarcal_core::CalendarEventFormatter;

pub fn run(
    cfg: &Config,
    title: String,
    description: String,
    deadline: String,
    open: bool,
) -> Result<()> {
    let formatter = CalendarEventFormatter::new(cfg.formatter_options()?);
    let event = super::event_from_args(title, description, deadline);
    let resolved = formatter.resolve(&event.deadline_text);

    println!("{}", formatter.url_for(&event, &resolved));

    if open {
        let host = DesktopHost::new(cfg.download_dir(), cfg.open_browser);
        if !AddToCalendar::new(&formatter, &host).open_resolved(&event, &resolved) {
            eprintln!("(Could not open browser automatically, please copy the URL above)");
        }
    }

    Ok(())
}
