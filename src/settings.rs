//! User preferences: the topic query term and the sort order.
//!
//! Preferences live in a small YAML file. A missing file, or a missing key
//! inside it, falls back to the defaults.
//!
//! ```yaml
//! topic: games
//! order_by: newest
//! ```

use crate::error::SettingsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, instrument};

/// Default preference file name, relative to the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = "guardian_news.yaml";

const DEFAULT_TOPIC: &str = "games";

/// Sort order accepted by the `order-by` query parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OrderBy {
    #[default]
    Newest,
    Oldest,
    Relevance,
}

impl OrderBy {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderBy::Newest => "newest",
            OrderBy::Oldest => "oldest",
            OrderBy::Relevance => "relevance",
        }
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Free-text query term sent as `q`.
    pub topic: String,
    pub order_by: OrderBy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            topic: DEFAULT_TOPIC.to_string(),
            order_by: OrderBy::default(),
        }
    }
}

impl Settings {
    /// Load preferences from `path`, or the defaults when the file is absent.
    #[instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let yaml = match fs::read_to_string(path).await {
            Ok(yaml) => yaml,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No settings file; using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Settings = serde_yaml::from_str(&yaml)?;
        debug!(topic = %settings.topic, order_by = %settings.order_by, "Loaded settings");
        Ok(settings)
    }

    /// Write preferences to `path`, creating parent directories as needed.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml).await?;
        info!(topic = %self.topic, order_by = %self.order_by, "Saved settings");
        Ok(())
    }

    /// These settings with any per-run overrides applied.
    pub fn with_overrides(mut self, topic: Option<String>, order_by: Option<OrderBy>) -> Self {
        if let Some(topic) = topic {
            self.topic = topic;
        }
        if let Some(order_by) = order_by {
            self.order_by = order_by;
        }
        self
    }
}
