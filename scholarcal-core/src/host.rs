//! Handing exports to the host environment.
//!
//! The formatter only builds strings. Saving a payload and opening a link
//! are side effects owned by a `Host`: the desktop host writes into a
//! download directory and launches the system browser, tests record calls.
//! `AddToCalendar` is the "Add to calendar" button: it runs both actions and
//! absorbs any failure with a logged error.

use crate::error::{CalendarError, CalendarResult, HostAction};
use crate::event::{CalendarEvent, ResolvedDeadline};
use crate::filename::unique_filename;
use crate::formatter::CalendarEventFormatter;
use crate::ics::ICS_MIME_TYPE;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use url::Url;

/// File-save and browser facilities of the environment running the export.
pub trait Host {
    /// Store `payload` under `file_name`, returning where it ended up.
    fn save_file(&self, payload: &[u8], file_name: &str, mime_type: &str)
        -> CalendarResult<PathBuf>;

    /// Open `url` in a new browsing context with no link back to the caller.
    fn open_url(&self, url: &str) -> CalendarResult<()>;
}

/// Save a calendar payload through the host.
pub fn trigger_file_download(
    host: &dyn Host,
    payload: &str,
    suggested_file_name: &str,
) -> CalendarResult<PathBuf> {
    let path = host.save_file(payload.as_bytes(), suggested_file_name, ICS_MIME_TYPE)?;
    info!(path = %path.display(), "Saved calendar file");
    Ok(path)
}

/// Open a link through the host.
pub fn trigger_external_open(host: &dyn Host, url: &str) -> CalendarResult<()> {
    host.open_url(url)?;
    debug!(url, "Opened external calendar");
    Ok(())
}

/// Host backed by the local filesystem and the system browser.
#[derive(Debug, Clone)]
pub struct DesktopHost {
    download_dir: PathBuf,
    open_browser: bool,
}

impl DesktopHost {
    pub fn new(download_dir: impl Into<PathBuf>, open_browser: bool) -> Self {
        DesktopHost {
            download_dir: download_dir.into(),
            open_browser,
        }
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    fn write_payload(&self, payload: &[u8], file_name: &str) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(&self.download_dir)?;

        // Removed on drop unless persisted, so a failed write leaves nothing behind
        let mut temp = tempfile::NamedTempFile::new_in(&self.download_dir)?;
        temp.write_all(payload)?;
        temp.flush()?;

        let final_name = unique_filename(file_name, &self.download_dir);
        let path = self.download_dir.join(final_name);
        temp.persist_noclobber(&path).map_err(|e| e.error)?;

        Ok(path)
    }
}

impl Host for DesktopHost {
    fn save_file(
        &self,
        payload: &[u8],
        file_name: &str,
        mime_type: &str,
    ) -> CalendarResult<PathBuf> {
        if file_name.is_empty() || file_name.contains(['/', '\\']) || file_name.starts_with('.') {
            return Err(CalendarError::host(
                HostAction::SaveFile,
                format!("unsafe file name \"{}\"", file_name),
            ));
        }

        debug!(
            file_name,
            mime_type,
            bytes = payload.len(),
            dir = %self.download_dir.display(),
            "Saving download"
        );

        self.write_payload(payload, file_name)
            .map_err(|e| CalendarError::host(HostAction::SaveFile, e.to_string()))
    }

    fn open_url(&self, url: &str) -> CalendarResult<()> {
        if !self.open_browser {
            return Err(CalendarError::host(
                HostAction::OpenUrl,
                "opening the browser is disabled",
            ));
        }

        let parsed = Url::parse(url)
            .map_err(|e| CalendarError::host(HostAction::OpenUrl, e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CalendarError::host(
                HostAction::OpenUrl,
                format!("refusing to open {} URL", parsed.scheme()),
            ));
        }

        // The browser runs as its own process; it has no handle on us
        open::that(parsed.as_str())
            .map_err(|e| CalendarError::host(HostAction::OpenUrl, e.to_string()))
    }
}

/// The "Add to calendar" action of a scholarship card.
pub struct AddToCalendar<'a> {
    formatter: &'a CalendarEventFormatter,
    host: &'a dyn Host,
}

impl<'a> AddToCalendar<'a> {
    pub fn new(formatter: &'a CalendarEventFormatter, host: &'a dyn Host) -> Self {
        AddToCalendar { formatter, host }
    }

    /// Build and save the `.ics` file. `None` if the host refused.
    pub fn download_ics(&self, event: &CalendarEvent) -> Option<PathBuf> {
        let deadline = self.formatter.resolve(&event.deadline_text);
        self.download_resolved(event, &deadline)
    }

    /// `download_ics` for a deadline the caller already resolved.
    pub fn download_resolved(
        &self,
        event: &CalendarEvent,
        deadline: &ResolvedDeadline,
    ) -> Option<PathBuf> {
        let payload = self.formatter.payload_for(event, deadline);
        let file_name = self.formatter.suggested_file_name(event);

        match trigger_file_download(self.host, &payload, &file_name) {
            Ok(path) => Some(path),
            Err(e) => {
                error!(title = %event.title, "Error downloading ICS file: {}", e);
                None
            }
        }
    }

    /// Build the Google Calendar link and open it. `false` if the host refused.
    pub fn open_in_google_calendar(&self, event: &CalendarEvent) -> bool {
        let deadline = self.formatter.resolve(&event.deadline_text);
        self.open_resolved(event, &deadline)
    }

    /// `open_in_google_calendar` for a deadline the caller already resolved.
    pub fn open_resolved(&self, event: &CalendarEvent, deadline: &ResolvedDeadline) -> bool {
        let url = self.formatter.url_for(event, deadline);

        match trigger_external_open(self.host, &url) {
            Ok(()) => true,
            Err(e) => {
                error!(title = %event.title, "Error opening Google Calendar: {}", e);
                false
            }
        }
    }
}
