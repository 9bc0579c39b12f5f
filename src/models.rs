//! Data models for Guardian search results and the decoded article records.
//!
//! This module defines:
//! - [`ArticleRecord`]: one decoded search result, read-only once built
//! - [`ArticleList`]: the replaceable container handed to the list renderer
//! - [`SearchEnvelope`] and [`SearchResult`]: the serde shapes of the
//!   Guardian Content API payload
//!
//! The Guardian field names (`webTitle`, `sectionName`, ...) are mapped once,
//! through the serde renames on the payload structs.

use serde::{Deserialize, Serialize};

/// A news article decoded from one Guardian search result.
///
/// Fields are private so a record cannot change after decoding. `authors`
/// is always present; a result without contributor tags has no authors.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticleRecord {
    title: String,
    #[serde(default)]
    authors: Vec<String>,
    section: String,
    publication_date: String,
    url: String,
}

impl ArticleRecord {
    pub fn new(
        title: impl Into<String>,
        authors: Vec<String>,
        section: impl Into<String>,
        publication_date: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            authors,
            section: section.into(),
            publication_date: publication_date.into(),
            url: url.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn authors(&self) -> &[String] {
        &self.authors
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    /// Publication timestamp exactly as the API returned it.
    pub fn publication_date(&self) -> &str {
        &self.publication_date
    }

    /// Canonical link to the full article.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl From<SearchResult> for ArticleRecord {
    fn from(result: SearchResult) -> Self {
        let authors = result
            .tags
            .unwrap_or_default()
            .into_iter()
            .map(|tag| tag.web_title)
            .collect();
        ArticleRecord::new(
            result.web_title,
            authors,
            result.section_name,
            result.web_publication_date,
            result.web_url,
        )
    }
}

/// The list of articles currently on display.
///
/// Each completed fetch replaces the whole content; nothing is merged.
#[derive(Debug, Default)]
pub struct ArticleList {
    articles: Vec<ArticleRecord>,
}

impl ArticleList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in the records of a completed fetch.
    pub fn replace(&mut self, articles: Vec<ArticleRecord>) {
        self.articles = articles;
    }

    pub fn clear(&mut self) {
        self.articles.clear();
    }

    /// The record at `index`, as selected by the user.
    pub fn get(&self, index: usize) -> Option<&ArticleRecord> {
        self.articles.get(index)
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ArticleRecord> {
        self.articles.iter()
    }

    pub fn as_slice(&self) -> &[ArticleRecord] {
        &self.articles
    }
}

/// Top-level object of a Guardian search response.
///
/// Results are kept as raw JSON values so that each one can be decoded on
/// its own and a bad result does not sink the whole batch.
#[derive(Debug, Deserialize)]
pub struct SearchEnvelope {
    pub response: SearchResponse,
}

/// The `response` object of a search response.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<serde_json::Value>,
}

/// One element of `response.results`.
#[derive(Debug, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "webTitle")]
    pub web_title: String,
    #[serde(rename = "sectionName")]
    pub section_name: String,
    #[serde(rename = "webPublicationDate")]
    pub web_publication_date: String,
    #[serde(rename = "webUrl")]
    pub web_url: String,
    /// Contributor tags; absent or `null` when the request did not ask for tags.
    #[serde(default)]
    pub tags: Option<Vec<Tag>>,
}

/// A tag attached to a search result. Contributor tags carry the author name.
#[derive(Debug, Deserialize)]
pub struct Tag {
    #[serde(rename = "webTitle")]
    pub web_title: String,
}
