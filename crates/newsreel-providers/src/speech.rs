//! Narration synthesis client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};
use crate::retry::with_retry;
use crate::SpeechSynthesizer;

/// Configuration for the speech service client.
#[derive(Debug, Clone)]
pub struct SpeechConfig {
    /// Base URL of the synthesis service
    pub base_url: String,
    /// Voice to synthesize with
    pub voice_id: String,
    /// Synthesis engine
    pub engine: String,
    /// Audio container for the returned bytes
    pub output_format: String,
    /// Request timeout
    pub timeout: Duration,
    /// Max retries for retryable failures
    pub max_retries: u32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8020".to_string(),
            voice_id: "Danielle".to_string(),
            engine: "neural".to_string(),
            output_format: "mp3".to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 2,
        }
    }
}

impl SpeechConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("SPEECH_SERVICE_URL").unwrap_or(defaults.base_url),
            voice_id: std::env::var("SPEECH_VOICE_ID").unwrap_or(defaults.voice_id),
            engine: std::env::var("SPEECH_ENGINE").unwrap_or(defaults.engine),
            output_format: std::env::var("SPEECH_OUTPUT_FORMAT").unwrap_or(defaults.output_format),
            timeout: Duration::from_secs(
                std::env::var("SPEECH_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
            max_retries: std::env::var("SPEECH_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_retries),
        }
    }
}

#[derive(Debug, Serialize)]
struct SynthesizeRequest<'a> {
    text: &'a str,
    voice_id: &'a str,
    engine: &'a str,
    output_format: &'a str,
}

/// Client for the narration synthesis service.
pub struct SpeechClient {
    http: Client,
    config: SpeechConfig,
}

impl SpeechClient {
    pub fn new(config: SpeechConfig) -> ProviderResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ProviderError::Network)?;
        Ok(Self { http, config })
    }

    pub fn from_env() -> ProviderResult<Self> {
        Self::new(SpeechConfig::from_env())
    }
}

#[async_trait]
impl SpeechSynthesizer for SpeechClient {
    async fn synthesize(&self, text: &str) -> ProviderResult<Vec<u8>> {
        let url = format!("{}/v1/synthesize", self.config.base_url);
        debug!("Synthesizing {} chars of narration", text.len());

        let response = with_retry(self.config.max_retries, || async {
            let response = self
                .http
                .post(&url)
                .json(&SynthesizeRequest {
                    text,
                    voice_id: &self.config.voice_id,
                    engine: &self.config.engine,
                    output_format: &self.config.output_format,
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

        let bytes = response.bytes().await.map_err(ProviderError::Network)?;
        if bytes.is_empty() {
            return Err(ProviderError::InvalidResponse(
                "synthesis returned an empty audio body".to_string(),
            ));
        }
        Ok(bytes.to_vec())
    }
}
