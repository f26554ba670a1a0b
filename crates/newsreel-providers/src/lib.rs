//! HTTP collaborator clients for the Newsreel pipeline.
//!
//! This crate provides:
//! - Trait contracts for the three asset collaborators (speech synthesis,
//!   image search, image generation) plus raw image fetching
//! - reqwest-backed clients with per-client timeouts and retry
//!
//! The pipeline depends only on the traits, so tests inject fakes.

pub mod error;
pub mod fetch;
pub mod generate;
pub mod retry;
pub mod search;
pub mod speech;

pub use error::{ProviderError, ProviderResult};
pub use fetch::HttpImageFetcher;
pub use generate::{ImageGenClient, ImageGenConfig};
pub use search::{ImageSearchClient, ImageSearchConfig};
pub use speech::{SpeechClient, SpeechConfig};

use async_trait::async_trait;

/// Narration synthesis collaborator: text in, audio bytes out.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> ProviderResult<Vec<u8>>;
}

/// Image search collaborator: returns the URL of one result for a query,
/// selected by result offset. `ProviderError::NotFound` when the query
/// yields no results.
#[async_trait]
pub trait ImageSearcher: Send + Sync {
    async fn search(&self, query: &str, offset: usize) -> ProviderResult<String>;
}

/// Generative image collaborator: prompt in, image byte blobs out.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, count: usize) -> ProviderResult<Vec<Vec<u8>>>;
}

/// Raw fetch of an image URL to bytes (lead images, search results).
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> ProviderResult<Vec<u8>>;
}
