//! Search connectors for the external corpora the aggregator fans out to.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use url::Url;

use crate::config::GithubSearchConfig;
use crate::error::Result;
use crate::models::{MultiSourceResult, SourceKind};

const RESULTS_PER_SOURCE: u32 = 10;

/// A searchable corpus. Implementations return results with a zero weight;
/// the aggregator assigns weights by source kind after the merge.
#[async_trait]
pub trait SourceSearch: Send + Sync {
    fn kind(&self) -> SourceKind;

    async fn search(&self, query: &str) -> Result<Vec<MultiSourceResult>>;
}

/// Issue and pull-request search against the GitHub search API.
///
/// Closed items are marked resolved, which earns them the aggregator's
/// resolved bonus during ranking.
pub struct GithubIssueSearch {
    client: reqwest::Client,
    repo: String,
    token: Option<String>,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct GithubIssueSearchResponse {
    items: Vec<GithubIssue>,
}

#[derive(Debug, Deserialize)]
struct GithubIssue {
    title: String,
    html_url: String,
    body: Option<String>,
    state: String,
    updated_at: Option<DateTime<Utc>>,
}

impl GithubIssueSearch {
    pub fn new(config: &GithubSearchConfig, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            repo: config.repo.clone(),
            token: config.token.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl SourceSearch for GithubIssueSearch {
    fn kind(&self) -> SourceKind {
        SourceKind::Github
    }

    async fn search(&self, query: &str) -> Result<Vec<MultiSourceResult>> {
        let mut request = self
            .client
            .get(format!("{}/search/issues", self.base_url))
            .query(&[
                ("q", format!("{query} repo:{}", self.repo)),
                ("per_page", RESULTS_PER_SOURCE.to_string()),
            ])
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "docent");

        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response: GithubIssueSearchResponse =
            request.send().await?.error_for_status()?.json().await?;

        Ok(response
            .items
            .into_iter()
            .map(|issue| MultiSourceResult {
                title: issue.title,
                url: issue.html_url,
                content: issue.body.unwrap_or_default(),
                source: SourceKind::Github,
                weight: 0.0,
                resolved: issue.state == "closed",
                timestamp: issue.updated_at,
            })
            .collect())
    }
}

/// Query-parameter search against a JSON endpoint, used for blog and
/// changelog corpora. Expects `{"results": [{title, url, content, ...}]}`.
pub struct JsonFeedSearch {
    client: reqwest::Client,
    url: Url,
    kind: SourceKind,
}

#[derive(Debug, Deserialize)]
struct FeedSearchResponse {
    results: Vec<FeedEntry>,
}

#[derive(Debug, Deserialize)]
struct FeedEntry {
    title: String,
    url: String,
    #[serde(default, alias = "excerpt", alias = "summary")]
    content: String,
    #[serde(default, alias = "publishedAt", alias = "date")]
    published_at: Option<DateTime<Utc>>,
}

impl JsonFeedSearch {
    pub fn new(url: Url, kind: SourceKind, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self { client, url, kind })
    }
}

#[async_trait]
impl SourceSearch for JsonFeedSearch {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    async fn search(&self, query: &str) -> Result<Vec<MultiSourceResult>> {
        let response: FeedSearchResponse = self
            .client
            .get(self.url.clone())
            .query(&[("q", query)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response
            .results
            .into_iter()
            .map(|entry| MultiSourceResult {
                title: entry.title,
                url: entry.url,
                content: entry.content,
                source: self.kind,
                weight: 0.0,
                resolved: false,
                timestamp: entry.published_at,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn github_config(base_url: &str, token: Option<&str>) -> GithubSearchConfig {
        GithubSearchConfig {
            repo: "acme/widgets".to_string(),
            token: token.map(str::to_string),
            base_url: base_url.to_string(),
        }
    }

    #[tokio::test]
    async fn test_github_search_maps_issues() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/issues"))
            .and(query_param("q", "webhook timeout repo:acme/widgets"))
            .and(header("Accept", "application/vnd.github+json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total_count": 2,
                "items": [
                    {
                        "title": "Webhook deliveries time out",
                        "html_url": "https://github.com/acme/widgets/issues/12",
                        "body": "Fixed by raising the timeout.",
                        "state": "closed",
                        "updated_at": "2024-03-01T10:00:00Z"
                    },
                    {
                        "title": "Webhook retries missing",
                        "html_url": "https://github.com/acme/widgets/issues/44",
                        "body": null,
                        "state": "open",
                        "updated_at": null
                    }
                ]
            })))
            .mount(&server)
            .await;

        let search = GithubIssueSearch::new(&github_config(&server.uri(), None), 5).unwrap();
        let results = search.search("webhook timeout").await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Webhook deliveries time out");
        assert!(results[0].resolved);
        assert!(results[0].timestamp.is_some());
        assert_eq!(results[1].content, "");
        assert!(!results[1].resolved);
    }

    #[tokio::test]
    async fn test_github_search_sends_bearer_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/issues"))
            .and(header("Authorization", "Bearer gh-token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"total_count": 0, "items": []})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let search =
            GithubIssueSearch::new(&github_config(&server.uri(), Some("gh-token")), 5).unwrap();
        let results = search.search("anything").await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_github_search_propagates_http_errors() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/issues"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let search = GithubIssueSearch::new(&github_config(&server.uri(), None), 5).unwrap();
        assert!(search.search("anything").await.is_err());
    }

    #[tokio::test]
    async fn test_feed_search_maps_entries() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "release"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    {
                        "title": "March release notes",
                        "url": "https://blog.example.com/march",
                        "excerpt": "New export API.",
                        "publishedAt": "2024-03-15T00:00:00Z"
                    }
                ]
            })))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/search", server.uri())).unwrap();
        let search = JsonFeedSearch::new(url, SourceKind::Blog, 5).unwrap();
        let results = search.search("release").await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].source, SourceKind::Blog);
        assert_eq!(results[0].content, "New export API.");
        assert!(!results[0].resolved);
    }
}
