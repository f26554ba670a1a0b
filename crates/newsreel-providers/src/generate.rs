//! Generative image client.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};
use crate::retry::with_retry;
use crate::ImageGenerator;

/// Configuration for the image generation client.
#[derive(Debug, Clone)]
pub struct ImageGenConfig {
    /// Generation API endpoint
    pub endpoint: String,
    /// API key (bearer token)
    pub api_key: String,
    /// Model name
    pub model: String,
    /// Generated image size
    pub size: String,
    /// Rendering style
    pub style: String,
    /// Quality tier
    pub quality: String,
    /// Request timeout; generation is slow
    pub timeout: Duration,
    /// Max retries for retryable failures
    pub max_retries: u32,
}

impl Default for ImageGenConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/images/generations".to_string(),
            api_key: String::new(),
            model: "dall-e-3".to_string(),
            size: "1792x1024".to_string(),
            style: "natural".to_string(),
            quality: "hd".to_string(),
            timeout: Duration::from_secs(120),
            max_retries: 2,
        }
    }
}

impl ImageGenConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            endpoint: std::env::var("IMAGE_GEN_ENDPOINT").unwrap_or(defaults.endpoint),
            api_key: std::env::var("IMAGE_GEN_API_KEY").unwrap_or_default(),
            model: std::env::var("IMAGE_GEN_MODEL").unwrap_or(defaults.model),
            size: std::env::var("IMAGE_GEN_SIZE").unwrap_or(defaults.size),
            style: std::env::var("IMAGE_GEN_STYLE").unwrap_or(defaults.style),
            quality: std::env::var("IMAGE_GEN_QUALITY").unwrap_or(defaults.quality),
            timeout: Duration::from_secs(
                std::env::var("IMAGE_GEN_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(120),
            ),
            max_retries: std::env::var("IMAGE_GEN_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_retries),
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: usize,
    size: &'a str,
    response_format: &'a str,
    style: &'a str,
    quality: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    data: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    b64_json: String,
}

/// Client for the generative image API.
pub struct ImageGenClient {
    http: Client,
    config: ImageGenConfig,
}

impl ImageGenClient {
    pub fn new(config: ImageGenConfig) -> ProviderResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ProviderError::Network)?;
        Ok(Self { http, config })
    }

    pub fn from_env() -> ProviderResult<Self> {
        Self::new(ImageGenConfig::from_env())
    }
}

#[async_trait]
impl ImageGenerator for ImageGenClient {
    async fn generate(&self, prompt: &str, count: usize) -> ProviderResult<Vec<Vec<u8>>> {
        debug!("Generating {} image(s), prompt {} chars", count, prompt.len());

        let response = with_retry(self.config.max_retries, || async {
            let response = self
                .http
                .post(&self.config.endpoint)
                .bearer_auth(&self.config.api_key)
                .json(&GenerateRequest {
                    model: &self.config.model,
                    prompt,
                    n: count,
                    size: &self.config.size,
                    response_format: "b64_json",
                    style: &self.config.style,
                    quality: &self.config.quality,
                })
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

        let payload: GenerateResponse = response.json().await.map_err(ProviderError::Network)?;
        if payload.data.is_empty() {
            return Err(ProviderError::InvalidResponse(
                "generation returned no images".to_string(),
            ));
        }

        payload
            .data
            .into_iter()
            .map(|img| {
                base64::engine::general_purpose::STANDARD
                    .decode(img.b64_json)
                    .map_err(ProviderError::Decode)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ImageGenClient {
        ImageGenClient::new(ImageGenConfig {
            endpoint: format!("{}/v1/images/generations", server.uri()),
            api_key: "sk-test".to_string(),
            max_retries: 0,
            ..ImageGenConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_generate_decodes_b64_payloads() {
        let server = MockServer::start().await;
        let png = base64::engine::general_purpose::STANDARD.encode(b"\x89PNGfake");
        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(serde_json::json!({
                "model": "dall-e-3",
                "response_format": "b64_json",
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"data": [{"b64_json": png}]})),
            )
            .mount(&server)
            .await;

        let images = client_for(&server).generate("a city hall", 1).await.unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0], b"\x89PNGfake");
    }

    #[tokio::test]
    async fn test_generate_empty_data_is_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
            .mount(&server)
            .await;

        let err = client_for(&server).generate("a city hall", 1).await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_generate_bad_base64_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"data": [{"b64_json": "!!not-base64!!"}]})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).generate("a city hall", 1).await.unwrap_err();
        assert!(matches!(err, ProviderError::Decode(_)));
    }
}
