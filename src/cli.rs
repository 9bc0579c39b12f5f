//! Command-line interface definitions for Guardian News.
//!
//! Running without a subcommand fetches and lists articles. The `settings`
//! subcommand shows or changes the stored preferences. The API key and the
//! settings file path can also come from environment variables.

use crate::request::{DEFAULT_API_KEY, GUARDIAN_REQUEST_URL};
use crate::settings::{DEFAULT_SETTINGS_FILE, OrderBy};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for the Guardian News client.
///
/// # Examples
///
/// ```sh
/// # List articles for the stored topic
/// guardian_news
///
/// # One-off search, also saved as JSON
/// guardian_news -q "zelda" --order-by relevance -j ./json
///
/// # Change the stored topic
/// guardian_news settings set --topic minecraft
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about, args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the preference file
    #[arg(long, global = true, env = "GUARDIAN_NEWS_SETTINGS", default_value = DEFAULT_SETTINGS_FILE)]
    pub settings: PathBuf,

    #[command(flatten)]
    pub fetch: FetchArgs,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show or change the stored preferences
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum SettingsAction {
    /// Print the effective preferences
    Show,
    /// Store new preferences
    Set {
        /// Free-text topic to search for
        #[arg(long)]
        topic: Option<String>,

        /// Sort order of the results
        #[arg(long, value_enum)]
        order_by: Option<OrderBy>,
    },
}

/// Options for fetching and listing articles.
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Search endpoint to query
    #[arg(long, default_value = GUARDIAN_REQUEST_URL)]
    pub base_url: String,

    /// Guardian API key
    #[arg(long, env = "GUARDIAN_API_KEY", default_value = DEFAULT_API_KEY, hide_env_values = true)]
    pub api_key: String,

    /// Topic to search for, overriding the stored preference for this run
    #[arg(short, long)]
    pub query: Option<String>,

    /// Sort order, overriding the stored preference for this run
    #[arg(short, long, value_enum)]
    pub order_by: Option<OrderBy>,

    /// Also write the fetched articles as JSON under this directory
    #[arg(short, long)]
    pub json_output_dir: Option<String>,

    /// Print the link of the article at this position (1-based)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub open: Option<u32>,

    /// Fetch even if the API host does not resolve
    #[arg(long)]
    pub skip_connectivity_check: bool,
}
