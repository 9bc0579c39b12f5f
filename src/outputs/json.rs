//! JSON output of a completed fetch.
//!
//! Each run writes one snapshot file named after the query and sort order,
//! grouped in a directory per local date. A second run with the same query
//! on the same day overwrites the first.

use crate::models::ArticleRecord;
use crate::settings::Settings;
use crate::utils::slugify;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

/// What gets written: the query that produced the records, and the records.
#[derive(Debug, Deserialize, Serialize)]
pub struct SearchSnapshot {
    /// RFC 3339 local time of the fetch.
    pub fetched_at: String,
    pub topic: String,
    pub order_by: String,
    pub articles: Vec<ArticleRecord>,
}

impl SearchSnapshot {
    pub fn new(settings: &Settings, articles: Vec<ArticleRecord>) -> Self {
        Self {
            fetched_at: Local::now().to_rfc3339(),
            topic: settings.topic.clone(),
            order_by: settings.order_by.to_string(),
            articles,
        }
    }
}

/// Write a [`SearchSnapshot`] to a JSON file in a date-based directory.
///
/// Creates the directory for today's local date and writes the pretty-printed
/// snapshot there. The file name comes from the slugified topic and the sort
/// order, so repeating a search on the same day overwrites the earlier file.
///
/// # Arguments
///
/// * `snapshot` - The query and the records it produced
/// * `json_output_dir` - Base directory for JSON output
///
/// # Returns
///
/// The path of the written file, or an error if directory creation,
/// serialization or the write fails.
///
/// # Output Path
///
/// The file is written to: `{json_output_dir}/{date}/{topic}_{order_by}.json`
///
/// # Examples
///
/// ```ignore
/// let snapshot = SearchSnapshot::new(&settings, articles);
/// let path = write_snapshot(&snapshot, "./json").await?;
/// // ./json/2025-05-06/games_newest.json
/// ```
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_snapshot(
    snapshot: &SearchSnapshot,
    json_output_dir: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(snapshot)?;

    let local_date = Local::now().date_naive().to_string();
    let full_json_dir = PathBuf::from(json_output_dir).join(local_date);
    if let Err(e) = fs::create_dir_all(&full_json_dir).await {
        error!(dir = %full_json_dir.display(), error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let path = full_json_dir.join(format!(
        "{}_{}.json",
        slugify(&snapshot.topic),
        snapshot.order_by
    ));
    fs::write(&path, json).await?;
    info!(path = %path.display(), count = snapshot.articles.len(), "Wrote JSON snapshot");

    Ok(path)
}
