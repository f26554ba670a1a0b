//! Image search client (custom search API).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};
use crate::retry::with_retry;
use crate::ImageSearcher;

/// Configuration for the image search client.
#[derive(Debug, Clone)]
pub struct ImageSearchConfig {
    /// Search API endpoint
    pub endpoint: String,
    /// API key
    pub api_key: String,
    /// Search engine ID
    pub engine_id: String,
    /// Results requested per query
    pub result_count: u32,
    /// Request timeout
    pub timeout: Duration,
    /// Max retries for retryable failures
    pub max_retries: u32,
}

impl Default for ImageSearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://www.googleapis.com/customsearch/v1".to_string(),
            api_key: String::new(),
            engine_id: String::new(),
            result_count: 10,
            timeout: Duration::from_secs(30),
            max_retries: 2,
        }
    }
}

impl ImageSearchConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            endpoint: std::env::var("SEARCH_ENDPOINT").unwrap_or(defaults.endpoint),
            api_key: std::env::var("SEARCH_API_KEY").unwrap_or_default(),
            engine_id: std::env::var("SEARCH_ENGINE_ID").unwrap_or_default(),
            result_count: std::env::var("SEARCH_RESULT_COUNT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.result_count),
            timeout: Duration::from_secs(
                std::env::var("SEARCH_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            max_retries: std::env::var("SEARCH_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_retries),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    link: String,
}

/// Client for the external image search API.
pub struct ImageSearchClient {
    http: Client,
    config: ImageSearchConfig,
}

impl ImageSearchClient {
    pub fn new(config: ImageSearchConfig) -> ProviderResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ProviderError::Network)?;
        Ok(Self { http, config })
    }

    pub fn from_env() -> ProviderResult<Self> {
        Self::new(ImageSearchConfig::from_env())
    }
}

#[async_trait]
impl ImageSearcher for ImageSearchClient {
    async fn search(&self, query: &str, offset: usize) -> ProviderResult<String> {
        debug!("Searching images for {:?} at offset {}", query, offset);

        let response = with_retry(self.config.max_retries, || async {
            let response = self
                .http
                .get(&self.config.endpoint)
                .query(&[
                    ("q", query),
                    ("cx", &self.config.engine_id),
                    ("key", &self.config.api_key),
                    ("searchType", "image"),
                    ("num", &self.config.result_count.to_string()),
                ])
                .send()
                .await
                .map_err(ProviderError::Network)?;

            if !response.status().is_success() {
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                return Err(ProviderError::RequestFailed { status, body });
            }
            Ok(response)
        })
        .await?;

        let results: SearchResponse = response.json().await.map_err(ProviderError::Network)?;
        if results.items.is_empty() {
            return Err(ProviderError::NotFound);
        }

        // Offsets beyond the result list wrap instead of failing, so
        // every segment index still maps to some result.
        let item = &results.items[offset % results.items.len()];
        Ok(item.link.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ImageSearchClient {
        ImageSearchClient::new(ImageSearchConfig {
            endpoint: format!("{}/customsearch/v1", server.uri()),
            api_key: "test-key".to_string(),
            engine_id: "test-cx".to_string(),
            max_retries: 0,
            ..ImageSearchConfig::default()
        })
        .unwrap()
    }

    fn items_body(links: &[&str]) -> serde_json::Value {
        serde_json::json!({
            "items": links.iter().map(|l| serde_json::json!({"link": l})).collect::<Vec<_>>()
        })
    }

    #[tokio::test]
    async fn test_search_selects_result_by_offset() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/customsearch/v1"))
            .and(query_param("searchType", "image"))
            .and(query_param("cx", "test-cx"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(items_body(&["http://a/0.png", "http://a/1.png", "http://a/2.png"])),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert_eq!(client.search("budget", 1).await.unwrap(), "http://a/1.png");
        // Offsets past the end wrap around
        assert_eq!(client.search("budget", 4).await.unwrap(), "http://a/1.png");
    }

    #[tokio::test]
    async fn test_search_empty_results_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let err = client_for(&server).search("budget", 0).await.unwrap_err();
        assert!(matches!(err, ProviderError::NotFound));
    }
}
