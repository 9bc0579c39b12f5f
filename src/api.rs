//! The article fetch pipeline: validate the URL, GET it, decode the JSON.
//!
//! # Architecture
//!
//! - [`ArticleSource`]: anything that turns a request URL into article records
//! - [`HttpArticleSource`]: the real implementation on top of `reqwest`
//! - [`decode_articles`]: the JSON step, usable on its own
//!
//! There are no retries and no caching. Every failure of the run as a whole
//! comes back as a [`FetchError`]; a single bad search result is logged and
//! skipped.

use crate::error::{FetchError, RecordError};
use crate::models::{ArticleRecord, SearchEnvelope, SearchResult};
use crate::utils::{looks_truncated, truncate_for_log};
use reqwest::{Client, StatusCode};
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// Time allowed to establish the connection.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Time allowed between reads once connected.
pub const READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of article records for a request URL.
pub trait ArticleSource {
    fn fetch(&self, url: &str)
    -> impl Future<Output = Result<Vec<ArticleRecord>, FetchError>> + Send;
}

/// Fetches articles from the Guardian API over HTTP.
#[derive(Debug, Clone)]
pub struct HttpArticleSource {
    client: Client,
}

impl HttpArticleSource {
    /// Client with the standard connect and read timeouts.
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_timeouts(CONNECT_TIMEOUT, READ_TIMEOUT)
    }

    /// Client with custom timeouts.
    ///
    /// Idle connections are never pooled, so each request's connection is
    /// closed once its response is dropped.
    pub fn with_timeouts(connect: Duration, read: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(connect)
            .read_timeout(read)
            .pool_max_idle_per_host(0)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// GET `url` and return the body of a 200 response.
    #[instrument(level = "info", skip_all, fields(host = ?url.host_str()))]
    async fn get_body(&self, url: Url) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(elapsed_ms = t0.elapsed().as_millis() as u64, error = %e, "HTTP request failed");
            FetchError::from(e)
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            let reason = status.canonical_reason().unwrap_or("unexpected status").to_string();
            error!(status = status.as_u16(), %reason, "HTTP response code not successful");
            return Err(FetchError::NetworkFailure {
                status: Some(status.as_u16()),
                reason,
            });
        }

        let bytes = response.bytes().await?;
        let body = String::from_utf8_lossy(&bytes).into_owned();
        info!(
            bytes = bytes.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Received response body"
        );
        Ok(body)
    }
}

impl ArticleSource for HttpArticleSource {
    #[instrument(level = "info", skip_all)]
    async fn fetch(&self, url: &str) -> Result<Vec<ArticleRecord>, FetchError> {
        let url = parse_request_url(url)?;
        let body = self.get_body(url).await?;
        decode_articles(&body)
    }
}

/// Parse `raw` as an absolute http(s) URL.
///
/// This is the first step of every fetch: a URL that fails here never
/// reaches the network.
///
/// # Arguments
///
/// * `raw` - The request URL as built from the preferences
///
/// # Returns
///
/// The parsed [`Url`], or [`FetchError::InvalidUrl`] when `raw` does not parse,
/// is relative, has a scheme other than `http`/`https`, or has no host.
///
/// # Examples
///
/// ```ignore
/// assert!(parse_request_url("https://content.guardianapis.com/search").is_ok());
/// assert!(parse_request_url("content.guardianapis.com/search").is_err());
/// ```
pub fn parse_request_url(raw: &str) -> Result<Url, FetchError> {
    let url = Url::parse(raw).map_err(|e| {
        error!(url = %raw, error = %e, "Error while parsing the request URL");
        FetchError::InvalidUrl(format!("{raw}: {e}"))
    })?;

    match url.scheme() {
        "http" | "https" if url.host().is_some() => Ok(url),
        _ => {
            error!(url = %raw, "Request URL is not an absolute http(s) URL");
            Err(FetchError::InvalidUrl(raw.to_string()))
        }
    }
}

/// Decode a Guardian search response body into article records.
///
/// Each element of `response.results` is decoded on its own. One with a
/// missing `webTitle`, `sectionName`, `webPublicationDate` or `webUrl`, or
/// with a tag lacking `webTitle`, is logged and skipped. A missing or `null`
/// `tags` gives a record with no authors.
///
/// # Arguments
///
/// * `body` - The full response body of a 200 response
///
/// # Returns
///
/// The decoded records in API order, with no reordering or deduplication.
///
/// # Errors
///
/// - [`FetchError::EmptyResponse`] if `body` is empty or whitespace only
/// - [`FetchError::MalformedJson`] if `body` is not JSON or lacks `response.results`
///
/// # Examples
///
/// ```ignore
/// let body = r#"{"response":{"results":[]}}"#;
/// assert!(decode_articles(body).unwrap().is_empty());
/// assert!(matches!(decode_articles(""), Err(FetchError::EmptyResponse)));
/// ```
pub fn decode_articles(body: &str) -> Result<Vec<ArticleRecord>, FetchError> {
    if body.trim().is_empty() {
        warn!("Empty response body; nothing to decode");
        return Err(FetchError::EmptyResponse);
    }

    let envelope: SearchEnvelope = serde_json::from_str(body).map_err(|e| {
        error!(
            error = %e,
            truncated = looks_truncated(&e),
            body_preview = %truncate_for_log(body, 200),
            "Problem parsing the JSON response"
        );
        FetchError::MalformedJson(e)
    })?;

    let total = envelope.response.results.len();
    let mut articles = Vec::with_capacity(total);
    for (index, value) in envelope.response.results.into_iter().enumerate() {
        match serde_json::from_value::<SearchResult>(value) {
            Ok(result) => articles.push(ArticleRecord::from(result)),
            Err(source) => {
                let e = RecordError { index, source };
                warn!(error = %e, "Skipping malformed search result");
            }
        }
    }

    debug!(total, decoded = articles.len(), "Decoded search results");
    Ok(articles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SINGLE: &str = r#"{"response":{"results":[{"webTitle":"A","sectionName":"Games","webPublicationDate":"2020-01-01T00:00:00Z","webUrl":"http://x","tags":[{"webTitle":"Jane"}]}]}}"#;

    fn result(title: &str, authors: &[&str]) -> serde_json::Value {
        let tags: Vec<_> = authors.iter().map(|a| json!({ "webTitle": a })).collect();
        json!({
            "webTitle": title,
            "sectionName": "Games",
            "webPublicationDate": "2024-03-05T10:00:00Z",
            "webUrl": format!("https://www.theguardian.com/games/{title}"),
            "tags": tags,
        })
    }

    fn envelope(results: Vec<serde_json::Value>) -> String {
        json!({ "response": { "status": "ok", "total": results.len(), "results": results } })
            .to_string()
    }

    #[test]
    fn test_decode_worked_example() {
        let articles = decode_articles(SINGLE).unwrap();
        assert_eq!(
            articles,
            vec![ArticleRecord::new(
                "A",
                vec!["Jane".to_string()],
                "Games",
                "2020-01-01T00:00:00Z",
                "http://x",
            )]
        );
    }

    #[test]
    fn test_decode_keeps_order_and_count() {
        let body = envelope(vec![
            result("one", &["Ann"]),
            result("two", &["Bob", "Cy"]),
            result("three", &["Dee"]),
        ]);
        let articles = decode_articles(&body).unwrap();
        let titles: Vec<_> = articles.iter().map(|a| a.title()).collect();
        assert_eq!(titles, ["one", "two", "three"]);
        assert_eq!(articles[1].authors(), ["Bob", "Cy"]);
    }

    #[test]
    fn test_decode_empty_tags_gives_empty_authors() {
        let articles = decode_articles(&envelope(vec![result("solo", &[])])).unwrap();
        assert_eq!(articles.len(), 1);
        assert!(articles[0].authors().is_empty());
    }

    #[test]
    fn test_decode_null_tags_gives_empty_authors() {
        let mut untagged = result("untagged", &[]);
        untagged["tags"] = serde_json::Value::Null;

        let body = envelope(vec![untagged, json!(7), result("tagged", &["Ann"])]);
        let articles = decode_articles(&body).unwrap();
        let titles: Vec<_> = articles.iter().map(|a| a.title()).collect();
        assert_eq!(titles, ["untagged", "tagged"]);
        assert!(articles[0].authors().is_empty());
        assert_eq!(articles[1].authors(), ["Ann"]);
    }

    #[test]
    fn test_decode_empty_body() {
        assert!(matches!(decode_articles(""), Err(FetchError::EmptyResponse)));
        assert!(matches!(decode_articles("  \n"), Err(FetchError::EmptyResponse)));
    }

    #[test]
    fn test_decode_truncated_json() {
        let result = decode_articles(r#"{"response":"#);
        assert!(matches!(result, Err(FetchError::MalformedJson(_))));
    }

    #[test]
    fn test_decode_missing_results_is_malformed() {
        let result = decode_articles(r#"{"response":{"status":"error"}}"#);
        assert!(matches!(result, Err(FetchError::MalformedJson(_))));
    }

    #[test]
    fn test_decode_skips_record_missing_field() {
        let mut broken = result("broken", &["Eve"]);
        broken.as_object_mut().unwrap().remove("webUrl");
        let mut bad_tag = result("bad-tag", &[]);
        bad_tag["tags"] = json!([{ "id": "profile/nobody" }]);

        let body = envelope(vec![result("first", &[]), broken, bad_tag, result("last", &[])]);
        let articles = decode_articles(&body).unwrap();
        let titles: Vec<_> = articles.iter().map(|a| a.title()).collect();
        assert_eq!(titles, ["first", "last"]);
    }

    #[test]
    fn test_decode_no_results() {
        let articles = decode_articles(&envelope(vec![])).unwrap();
        assert!(articles.is_empty());
    }

    #[test]
    fn test_parse_request_url() {
        assert!(parse_request_url("https://content.guardianapis.com/search?q=x").is_ok());
        assert!(matches!(
            parse_request_url("content.guardianapis.com/search"),
            Err(FetchError::InvalidUrl(_))
        ));
        assert!(matches!(
            parse_request_url("ftp://example.com/file"),
            Err(FetchError::InvalidUrl(_))
        ));
        assert!(matches!(parse_request_url(""), Err(FetchError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "puzzle"))
            .respond_with(ResponseTemplate::new(200).set_body_string(envelope(vec![
                result("one", &["Ann"]),
                result("two", &[]),
            ])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let source = HttpArticleSource::new().unwrap();
        let url = format!("{}/search?q=puzzle", mock_server.uri());
        let articles = source.fetch(&url).await.unwrap();

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title(), "one");
        assert_eq!(articles[0].authors(), ["Ann"]);
        assert!(articles[1].authors().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_http_404() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let source = HttpArticleSource::new().unwrap();
        let result = source.fetch(&format!("{}/search", mock_server.uri())).await;

        match result {
            Err(e @ FetchError::NetworkFailure { .. }) => assert_eq!(e.status(), Some(404)),
            other => panic!("Expected NetworkFailure for HTTP 404, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_http_500() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string(SINGLE))
            .mount(&mock_server)
            .await;

        let source = HttpArticleSource::new().unwrap();
        let result = source.fetch(&format!("{}/search", mock_server.uri())).await;
        assert_eq!(result.unwrap_err().status(), Some(500));
    }

    #[tokio::test]
    async fn test_fetch_empty_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let source = HttpArticleSource::new().unwrap();
        let result = source.fetch(&format!("{}/search", mock_server.uri())).await;
        assert!(matches!(result, Err(FetchError::EmptyResponse)));
    }

    #[tokio::test]
    async fn test_fetch_malformed_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"response":"#))
            .mount(&mock_server)
            .await;

        let source = HttpArticleSource::new().unwrap();
        let result = source.fetch(&format!("{}/search", mock_server.uri())).await;
        assert!(matches!(result, Err(FetchError::MalformedJson(_))));
    }

    #[tokio::test]
    async fn test_fetch_invalid_url_makes_no_request() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SINGLE))
            .expect(0)
            .mount(&mock_server)
            .await;

        let source = HttpArticleSource::new().unwrap();
        let bad = mock_server.uri().replace("http://", "");
        let result = source.fetch(&bad).await;
        assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
    }

    #[test]
    fn test_standard_timeouts() {
        assert_eq!(CONNECT_TIMEOUT, Duration::from_secs(15));
        assert_eq!(READ_TIMEOUT, Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_fetch_read_timeout() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(SINGLE)
                    .set_delay(Duration::from_millis(800)),
            )
            .mount(&mock_server)
            .await;

        let source =
            HttpArticleSource::with_timeouts(Duration::from_secs(1), Duration::from_millis(200))
                .unwrap();
        let result = source.fetch(&format!("{}/search", mock_server.uri())).await;
        match result {
            Err(e @ FetchError::NetworkFailure { .. }) => assert_eq!(e.status(), None),
            other => panic!("Expected NetworkFailure on timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_within_timeouts() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(SINGLE)
                    .set_delay(Duration::from_millis(50)),
            )
            .mount(&mock_server)
            .await;

        let source =
            HttpArticleSource::with_timeouts(Duration::from_secs(1), Duration::from_secs(2))
                .unwrap();
        let articles = source
            .fetch(&format!("{}/search", mock_server.uri()))
            .await
            .unwrap();
        assert_eq!(articles.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let source = HttpArticleSource::new().unwrap();
        let result = source.fetch(&format!("http://127.0.0.1:{port}/search")).await;
        match result {
            Err(e @ FetchError::NetworkFailure { .. }) => assert_eq!(e.status(), None),
            other => panic!("Expected NetworkFailure, got {other:?}"),
        }
    }
}
