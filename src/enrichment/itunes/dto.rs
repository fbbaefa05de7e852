//! iTunes Search API Data Transfer Objects
//!
//! These types match what the `/search` endpoint returns for
//! `entity=album`. Only the fields we read are declared.
//! DO NOT use these types outside the itunes module - convert to domain types.

use serde::{Deserialize, Serialize};

/// Search response envelope
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Number of results returned
    pub result_count: u32,
    /// Matching collections
    #[serde(default)]
    pub results: Vec<Collection>,
}

/// A single album ("collection") result
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    /// Artist display name
    pub artist_name: Option<String>,
    /// Album title
    pub collection_name: Option<String>,
    /// 100x100 artwork URL; other sizes are derived from it
    pub artwork_url100: Option<String>,
}
