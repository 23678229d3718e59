//! Filesystem-safe names for exported files.

use std::path::Path;

const FALLBACK_STEM: &str = "deadline";

/// Name offered for an event's `.ics` file: `merit-scholarship.ics`.
pub fn ics_filename(title: &str) -> String {
    let slug = slugify(title);
    if slug.is_empty() {
        format!("{}.ics", FALLBACK_STEM)
    } else {
        format!("{}.ics", slug)
    }
}

/// Convert a string to a filename-safe slug
fn slugify(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .take(50)
        .collect::<String>()
        .trim_end_matches('-')
        .to_string()
}

/// Pick a name in `dir` that doesn't exist yet.
///
/// Appends -2, -3, etc. to the stem until a free name is found.
pub fn unique_filename(base_filename: &str, dir: &Path) -> String {
    if !dir.join(base_filename).exists() {
        return base_filename.to_string();
    }

    let (stem, ext) = match base_filename.rsplit_once('.') {
        Some((stem, ext)) => (stem, format!(".{}", ext)),
        None => (base_filename, String::new()),
    };

    let mut n = 2;
    loop {
        let candidate = format!("{}-{}{}", stem, n, ext);
        if !dir.join(&candidate).exists() {
            return candidate;
        }
        n += 1;
    }
}
