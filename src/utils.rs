//! Small helpers for display formatting, logging and output directories.

use chrono::DateTime;
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

/// Number of leading characters of a timestamp that make up its date part.
const DATE_STRING_LENGTH: usize = 10;

/// Join author names for display: `"Ann, Bob, Cy"`, or `""` when there are none.
pub fn join_authors(authors: &[String]) -> String {
    authors.join(", ")
}

/// The `YYYY-MM-DD` part of a publication timestamp.
///
/// RFC 3339 timestamps are parsed; anything else is cut to its first ten
/// characters.
pub fn display_date(publication_date: &str) -> String {
    match DateTime::parse_from_rfc3339(publication_date) {
        Ok(dt) => dt.format("%Y-%m-%d").to_string(),
        Err(_) => publication_date.chars().take(DATE_STRING_LENGTH).collect(),
    }
}

/// Truncate a string for logging, appending how many bytes were dropped.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// `true` when a serde_json error means the input ended early.
pub fn looks_truncated(e: &serde_json::Error) -> bool {
    use serde_json::error::Category;
    matches!(e.classify(), Category::Eof)
}

/// Lowercase, hyphenated, filesystem-safe form of a query term.
pub fn slugify(text: &str) -> String {
    let slug: String = text
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '-')
        .map(|c| if c == ' ' { '-' } else { c })
        .collect();
    if slug.is_empty() { "all".to_string() } else { slug }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then writes and removes a
/// probe file inside it.
///
/// # Arguments
///
/// * `path` - The directory path to validate
///
/// # Returns
///
/// `Ok(())` if the directory exists and is writable.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
///
/// # Examples
///
/// ```ignore
/// ensure_writable_dir("./json").await?;
/// ```
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let probe_path = format!("{}/.guardian_news_probe", path.trim_end_matches('/'));
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Output directory is writable");
    Ok(())
}
