//! Provider error types.

use thiserror::Error;

pub type ProviderResult<T> = Result<T, ProviderError>;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("No results found")]
    NotFound,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Payload decode error: {0}")]
    Decode(#[from] base64::DecodeError),
}

impl ProviderError {
    /// Whether a retry could plausibly succeed. Empty result sets and
    /// malformed payloads are not retryable; the fallback chain handles
    /// those instead.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::ServiceUnavailable(_) | ProviderError::Network(_) => true,
            ProviderError::RequestFailed { status, .. } => {
                *status == 429 || (500..600).contains(status)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryability_by_status() {
        assert!(ProviderError::RequestFailed { status: 503, body: String::new() }.is_retryable());
        assert!(ProviderError::RequestFailed { status: 429, body: String::new() }.is_retryable());
        assert!(!ProviderError::RequestFailed { status: 403, body: String::new() }.is_retryable());
        assert!(!ProviderError::NotFound.is_retryable());
    }
}
