//! Raw image fetch.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};
use crate::ImageFetcher;

/// Fetches image bytes from a URL (lead images and search results).
pub struct HttpImageFetcher {
    http: Client,
}

impl HttpImageFetcher {
    pub fn new(timeout: Duration) -> ProviderResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ProviderError::Network)?;
        Ok(Self { http })
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> ProviderResult<Vec<u8>> {
        debug!("Fetching image from {}", url);

        let response = self.http.get(url).send().await.map_err(ProviderError::Network)?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::RequestFailed { status, body });
        }

        let bytes = response.bytes().await.map_err(ProviderError::Network)?;
        if bytes.is_empty() {
            return Err(ProviderError::InvalidResponse(
                format!("empty image body from {}", url),
            ));
        }
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_returns_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/lead.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpegdata".to_vec()))
            .mount(&server)
            .await;

        let fetcher = HttpImageFetcher::new(Duration::from_secs(5)).unwrap();
        let bytes = fetcher.fetch(&format!("{}/lead.jpg", server.uri())).await.unwrap();
        assert_eq!(bytes, b"jpegdata");
    }

    #[tokio::test]
    async fn test_fetch_404_surfaces_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = HttpImageFetcher::new(Duration::from_secs(5)).unwrap();
        let err = fetcher.fetch(&format!("{}/gone.jpg", server.uri())).await.unwrap_err();
        assert!(matches!(err, ProviderError::RequestFailed { status: 404, .. }));
    }
}
