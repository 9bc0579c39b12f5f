//! # Guardian News
//!
//! A small client for The Guardian content search API. It builds a search
//! request from the stored preferences, fetches it, decodes the results into
//! article records and lists them in the terminal.
//!
//! ## Usage
//!
//! ```sh
//! guardian_news -q zelda --order-by relevance
//! guardian_news settings set --topic minecraft
//! ```
//!
//! ## Pipeline
//!
//! 1. **Preferences**: load topic and sort order, apply per-run overrides
//! 2. **Request**: build the search URL
//! 3. **Connectivity**: skip the fetch when the API host cannot be reached
//! 4. **Fetch**: GET and decode in a background task; failures become an empty list
//! 5. **Output**: print the list, optionally write JSON and print a selected link

use clap::Parser;
use std::error::Error;
use std::path::Path;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod connectivity;
mod error;
mod loader;
mod models;
mod outputs;
mod request;
mod settings;
mod utils;

use api::HttpArticleSource;
use cli::{Cli, Command, FetchArgs, SettingsAction};
use connectivity::is_network_available;
use loader::ArticleLoader;
use models::ArticleList;
use outputs::json::{SearchSnapshot, write_snapshot};
use outputs::listing::{EmptyState, render};
use request::RequestConfig;
use settings::Settings;
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    debug!(settings = %args.settings.display(), "Parsed CLI arguments");

    match args.command {
        Some(Command::Settings { action }) => {
            run_settings(&args.settings, action.unwrap_or(SettingsAction::Show)).await
        }
        None => run_fetch(&args.settings, args.fetch).await,
    }
}

/// Fetch articles for the effective preferences and print them.
#[instrument(level = "info", skip_all)]
async fn run_fetch(settings_path: &Path, args: FetchArgs) -> Result<(), Box<dyn Error>> {
    let start_time = std::time::Instant::now();

    let settings = Settings::load(settings_path)
        .await?
        .with_overrides(args.query, args.order_by);
    info!(topic = %settings.topic, order_by = %settings.order_by, "Using preferences");

    if let Some(dir) = &args.json_output_dir
        && let Err(e) = ensure_writable_dir(dir).await
    {
        error!(path = %dir, error = %e, "JSON output directory is not writable");
        return Err(e);
    }

    let mut list = ArticleList::new();

    let url = match RequestConfig::new(&args.api_key, &settings).to_url(&args.base_url) {
        Ok(url) => url,
        Err(e) => {
            error!(error = %e, "Could not build the request URL");
            print!("{}", render(&list, EmptyState::NoNewsFound));
            return Ok(());
        }
    };

    if !args.skip_connectivity_check && !is_network_available(&url).await {
        warn!("Network unavailable; not fetching");
        print!("{}", render(&list, EmptyState::NoConnection));
        return Ok(());
    }

    let mut loader = ArticleLoader::new(HttpArticleSource::new()?);
    loader.start(url.as_str());
    loader.load_into(&mut list).await;

    print!("{}", render(&list, EmptyState::NoNewsFound));

    if let Some(dir) = &args.json_output_dir
        && !list.is_empty()
    {
        let snapshot = SearchSnapshot::new(&settings, list.as_slice().to_vec());
        if let Err(e) = write_snapshot(&snapshot, dir).await {
            error!(error = %e, "Failed to write JSON snapshot");
        }
    }

    if let Some(position) = args.open {
        match list.get(position as usize - 1) {
            Some(article) => println!("{}", article.url()),
            None => warn!(position, count = list.len(), "No article at that position"),
        }
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, count = list.len(), "Execution complete");
    Ok(())
}

/// Show or update the stored preferences.
#[instrument(level = "info", skip_all)]
async fn run_settings(settings_path: &Path, action: SettingsAction) -> Result<(), Box<dyn Error>> {
    let mut settings = Settings::load(settings_path).await?;

    if let SettingsAction::Set { topic, order_by } = action {
        settings = settings.with_overrides(topic, order_by);
        settings.save(settings_path).await?;
    }

    println!("Topic:    {}", settings.topic);
    println!("Order by: {}", settings.order_by);
    Ok(())
}
