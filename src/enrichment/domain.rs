//! Internal domain models for the remote cover lookup.
//!
//! These types are OUR types - they don't change when external APIs change.
//! All external API responses get converted into these types via adapters.

/// What the engine asked the remote service for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteQuery {
    /// Artist as read from the audio file's tags
    pub artist: String,
    /// Album as read from the audio file's tags
    pub album: String,
    /// Desired edge length in pixels
    pub size: u32,
}

/// A cover found by the remote service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCover {
    /// Artist name of the matched release
    pub artist: String,
    /// Title of the matched release
    pub title: String,
    /// Downloaded image bytes
    pub data: Vec<u8>,
}

/// Errors that can occur during a remote lookup
#[derive(Debug, thiserror::Error)]
pub enum EnrichmentError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Rate limited - try again later")]
    RateLimited,

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

impl EnrichmentError {
    /// Whether the service is unreachable, as opposed to this one query failing.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

impl From<reqwest::Error> for EnrichmentError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}
