use anyhow::{Context, Result};
use scholarcal_core::{FormatterOptions, Reminder};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory exported .ics files are written to
    #[serde(default = "default_download_dir")]
    pub download_dir: String,

    /// Whether `link --open` may launch the system browser
    #[serde(default = "default_open_browser")]
    pub open_browser: bool,

    #[serde(default)]
    pub event: EventConfig,
}

/// How exported deadlines look in the calendar
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventConfig {
    /// Length of deadlines that name a time (e.g. "1h", "30m")
    #[serde(default = "default_duration")]
    pub duration: String,

    /// Reminders before the deadline (e.g. ["1day", "2h"])
    #[serde(default = "default_reminders")]
    pub reminders: Vec<String>,

    /// Days after today used when the deadline can't be read
    #[serde(default)]
    pub fallback_offset_days: i64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            download_dir: default_download_dir(),
            open_browser: default_open_browser(),
            event: EventConfig::default(),
        }
    }
}

impl Default for EventConfig {
    fn default() -> Self {
        EventConfig {
            duration: default_duration(),
            reminders: default_reminders(),
            fallback_offset_days: 0,
        }
    }
}

fn default_download_dir() -> String {
    "~/Downloads".to_string()
}

fn default_open_browser() -> bool {
    true
}

fn default_duration() -> String {
    "1h".to_string()
}

fn default_reminders() -> Vec<String> {
    vec!["1day".to_string()]
}

impl Config {
    /// Formatter options from the `[event]` table.
    pub fn formatter_options(&self) -> Result<FormatterOptions> {
        let timed_duration = parse_duration(&self.event.duration)
            .with_context(|| format!("Invalid event.duration \"{}\"", self.event.duration))?;

        let reminders = self
            .event
            .reminders
            .iter()
            .map(|r| {
                parse_duration(r)
                    .map(|d| Reminder {
                        minutes: d.num_minutes(),
                    })
                    .with_context(|| format!("Invalid event.reminders entry \"{}\"", r))
            })
            .collect::<Result<Vec<_>>>()?;

        let offset = self.event.fallback_offset_days;
        chrono::Duration::try_days(offset)
            .and_then(|days| chrono::Local::now().date_naive().checked_add_signed(days))
            .with_context(|| format!("Invalid event.fallback_offset_days {}", offset))?;

        Ok(FormatterOptions {
            timed_duration,
            fallback_offset_days: self.event.fallback_offset_days,
            reminders,
            ..FormatterOptions::default()
        })
    }

    pub fn download_dir(&self) -> PathBuf {
        expand_path(&self.download_dir)
    }
}

fn parse_duration(input: &str) -> Result<chrono::Duration> {
    let std_dur = humantime::parse_duration(input).map_err(|e| anyhow::anyhow!("{}", e))?;
    chrono::Duration::from_std(std_dur).context("Duration too large")
}

/// Get the config directory path (~/.config/scholarcal)
pub fn config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Could not determine config directory")?
        .join("scholarcal");
    Ok(config_dir)
}

/// Get the config file path (~/.config/scholarcal/config.toml)
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Load config from ~/.config/scholarcal/config.toml, or defaults if absent
pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No config file, using defaults");
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;

    let config: Config = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

    Ok(config)
}

/// Expand ~ in paths to the home directory
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
