//! Runs a fetch as a background task and hands back its records.
//!
//! Only one fetch is in flight per loader. Starting another aborts the
//! previous one and its result is thrown away. Failures never reach the
//! caller: they are logged and come back as an empty list.

use crate::api::ArticleSource;
use crate::error::FetchError;
use crate::models::{ArticleList, ArticleRecord};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

type FetchTask = JoinHandle<Result<Vec<ArticleRecord>, FetchError>>;

#[derive(Debug)]
pub struct ArticleLoader<S> {
    source: Arc<S>,
    in_flight: Option<FetchTask>,
}

impl<S> ArticleLoader<S>
where
    S: ArticleSource + Send + Sync + 'static,
{
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
            in_flight: None,
        }
    }

    /// Start fetching `url` in the background, superseding any fetch in flight.
    pub fn start(&mut self, url: impl Into<String>) {
        self.cancel();

        let url = url.into();
        let source = Arc::clone(&self.source);
        debug!(%url, "Starting background fetch");
        self.in_flight = Some(tokio::spawn(async move { source.fetch(&url).await }));
    }

    /// Abort the fetch in flight, if any. Its result is discarded.
    pub fn cancel(&mut self) {
        if let Some(task) = self.in_flight.take() {
            task.abort();
            info!("Discarded in-flight fetch");
        }
    }

    /// Wait for the fetch in flight. Any failure yields an empty list.
    #[instrument(level = "info", skip_all)]
    pub async fn finish(&mut self) -> Vec<ArticleRecord> {
        let Some(task) = self.in_flight.take() else {
            return Vec::new();
        };

        match task.await {
            Ok(Ok(articles)) => {
                info!(count = articles.len(), "Fetch completed");
                articles
            }
            Ok(Err(e)) => {
                error!(error = %e, status = ?e.status(), "Fetch failed; showing empty list");
                Vec::new()
            }
            Err(e) if e.is_cancelled() => {
                debug!("Fetch was cancelled");
                Vec::new()
            }
            Err(e) => {
                error!(error = %e, "Fetch task panicked");
                Vec::new()
            }
        }
    }

    /// Wait for the fetch in flight and put its records on display.
    ///
    /// The stale records are cleared before waiting.
    pub async fn load_into(&mut self, list: &mut ArticleList) {
        list.clear();
        let articles = self.finish().await;
        list.replace(articles);
    }
}

impl<S> Drop for ArticleLoader<S> {
    fn drop(&mut self) {
        if let Some(task) = self.in_flight.take() {
            task.abort();
        }
    }
}
