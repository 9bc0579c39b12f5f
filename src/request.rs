//! Request URL construction for the Guardian content search endpoint.

use crate::error::FetchError;
use crate::settings::{OrderBy, Settings};
use tracing::{debug, instrument};
use url::Url;

/// Guardian content search endpoint.
pub const GUARDIAN_REQUEST_URL: &str = "https://content.guardianapis.com/search";

/// Public developer key accepted by the Guardian API.
pub const DEFAULT_API_KEY: &str = "test";

const FORMAT_VALUE: &str = "json";
const TAG_VALUE: &str = "games/games";
const SHOW_TAGS_VALUE: &str = "contributor";

/// Query parameter keys understood by the search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryParam {
    ApiKey,
    Format,
    Tag,
    ShowTags,
    Q,
    OrderBy,
}

impl QueryParam {
    pub fn key(self) -> &'static str {
        match self {
            QueryParam::ApiKey => "api-key",
            QueryParam::Format => "format",
            QueryParam::Tag => "tag",
            QueryParam::ShowTags => "show-tags",
            QueryParam::Q => "q",
            QueryParam::OrderBy => "order-by",
        }
    }
}

/// Everything needed to build one search request. Built fresh per fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestConfig {
    pub api_key: String,
    pub format: String,
    pub tag: String,
    pub show_tags: String,
    /// Free-text query term.
    pub query: String,
    pub order_by: OrderBy,
}

impl RequestConfig {
    /// A request for the user's settings with the fixed tag and format.
    pub fn new(api_key: impl Into<String>, settings: &Settings) -> Self {
        Self {
            api_key: api_key.into(),
            format: FORMAT_VALUE.to_string(),
            tag: TAG_VALUE.to_string(),
            show_tags: SHOW_TAGS_VALUE.to_string(),
            query: settings.topic.clone(),
            order_by: settings.order_by,
        }
    }

    /// Append the query parameters to `base`, in a fixed order.
    #[instrument(level = "debug", skip(self))]
    pub fn to_url(&self, base: &str) -> Result<Url, FetchError> {
        let mut url =
            Url::parse(base).map_err(|e| FetchError::InvalidUrl(format!("{base}: {e}")))?;
        if url.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl(base.to_string()));
        }

        url.query_pairs_mut()
            .append_pair(QueryParam::ApiKey.key(), &self.api_key)
            .append_pair(QueryParam::Format.key(), &self.format)
            .append_pair(QueryParam::Tag.key(), &self.tag)
            .append_pair(QueryParam::ShowTags.key(), &self.show_tags)
            .append_pair(QueryParam::Q.key(), &self.query)
            .append_pair(QueryParam::OrderBy.key(), self.order_by.as_str());

        debug!(host = ?url.host_str(), "Built request URL");
        Ok(url)
    }
}
