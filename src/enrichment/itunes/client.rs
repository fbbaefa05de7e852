//! iTunes Search HTTP client
//!
//! Searches an artist's albums, picks the one matching the queried album
//! name and downloads its artwork at the requested size.
//!
//! Every request carries a timeout, reported as [`EnrichmentError::Timeout`].

use std::time::Duration;

use async_trait::async_trait;

use super::{adapter, dto};
use crate::enrichment::domain::{EnrichmentError, RemoteCover};
use crate::enrichment::traits::CoverLookup;

/// User agent string sent with every request
const USER_AGENT: &str = concat!("CoverMinder/", env!("CARGO_PKG_VERSION"));

/// Client settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItunesConfig {
    /// Service root, without trailing slash
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Two-letter store country (iTunes defaults to US)
    pub country: Option<String>,
    /// Maximum number of albums returned per search
    pub limit: u32,
}

impl Default for ItunesConfig {
    fn default() -> Self {
        Self {
            base_url: "https://itunes.apple.com".to_string(),
            timeout: Duration::from_secs(15),
            country: None,
            limit: 50,
        }
    }
}

/// iTunes Search API client
pub struct ItunesClient {
    http_client: reqwest::Client,
    config: ItunesConfig,
}

impl ItunesClient {
    /// Create a new client
    pub fn new(config: ItunesConfig) -> Result<Self, EnrichmentError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| EnrichmentError::Network(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Build the album search URL for an artist
    fn search_url(&self, artist: &str) -> String {
        let mut url = format!(
            "{}/search?term={}&media=music&entity=album&limit={}",
            self.config.base_url,
            urlencoding::encode(artist),
            self.config.limit
        );
        if let Some(ref country) = self.config.country {
            url.push_str("&country=");
            url.push_str(&urlencoding::encode(country));
        }
        url
    }

    /// Search the artist's albums
    async fn search(&self, artist: &str) -> Result<dto::SearchResponse, EnrichmentError> {
        let url = self.search_url(artist);
        tracing::debug!(%url, "Searching iTunes");

        let response = self.http_client.get(&url).send().await?;
        let response = check_status(response)?;

        response
            .json::<dto::SearchResponse>()
            .await
            .map_err(|e| EnrichmentError::Parse(e.to_string()))
    }

    /// Download an image from a URL
    async fn download_image(&self, url: &str) -> Result<Vec<u8>, EnrichmentError> {
        let response = self.http_client.get(url).send().await?;
        let response = check_status(response)?;
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl CoverLookup for ItunesClient {
    async fn fetch_cover(
        &self,
        artist: &str,
        album: &str,
        size: u32,
    ) -> Result<Option<RemoteCover>, EnrichmentError> {
        let response = self.search(artist).await?;

        let Some(collection) = adapter::select_album(&response.results, album) else {
            tracing::debug!(artist, album, results = response.result_count, "No matching album");
            return Ok(None);
        };

        let Some(url) = adapter::artwork_url(collection, size) else {
            return Err(EnrichmentError::InvalidResponse(
                "matched album has no artwork URL".to_string(),
            ));
        };

        let data = self.download_image(&url).await?;

        Ok(Some(RemoteCover {
            artist: collection.artist_name.clone().unwrap_or_else(|| artist.to_string()),
            title: collection.collection_name.clone().unwrap_or_else(|| album.to_string()),
            data,
        }))
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, EnrichmentError> {
    let status = response.status();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(EnrichmentError::RateLimited);
    }

    if !status.is_success() {
        return Err(EnrichmentError::InvalidResponse(format!(
            "HTTP {}: {}",
            status,
            status.canonical_reason().unwrap_or("Unknown")
        )));
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = ItunesClient::new(ItunesConfig::default()).unwrap();
        assert_eq!(client.config.base_url, "https://itunes.apple.com");
    }

    #[test]
    fn test_search_url_encodes_artist() {
        let client = ItunesClient::new(ItunesConfig {
            base_url: "http://localhost:8080".to_string(),
            country: Some("gb".to_string()),
            limit: 10,
            ..Default::default()
        })
        .unwrap();

        assert_eq!(
            client.search_url("AC/DC & Friends"),
            "http://localhost:8080/search?term=AC%2FDC%20%26%20Friends&media=music&entity=album&limit=10&country=gb"
        );
    }

    #[test]
    fn test_user_agent_format() {
        assert!(USER_AGENT.starts_with("CoverMinder/"));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_network_error() {
        // Port 9 (discard) on localhost is closed on test machines.
        let client = ItunesClient::new(ItunesConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_secs(2),
            ..Default::default()
        })
        .unwrap();

        let err = client.fetch_cover("Queen", "Jazz", 100).await.unwrap_err();
        assert!(err.is_unavailable(), "unexpected error: {err}");
    }
}
