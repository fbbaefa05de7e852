//! Remote cover lookup - fetches artwork when a folder has none locally.
//!
//! # Architecture
//!
//! - **Domain models** (`domain.rs`) - Internal types the engine works with
//! - **API DTOs** (`itunes/dto.rs`) - Exact API response shapes
//! - **Adapter** (`itunes/adapter.rs`) - Album matching and artwork URLs
//! - **Client** (`itunes/client.rs`) - HTTP client for the iTunes Search API
//! - **Traits** (`traits.rs`) - Seams for mocking the lookup and the
//!   interactive match confirmation
//!
//! # Usage
//!
//! ```ignore
//! use enrichment::{CoverLookup, ItunesClient, ItunesConfig};
//!
//! let client = ItunesClient::new(ItunesConfig::default())?;
//! if let Some(cover) = client.fetch_cover("Queen", "Jazz", 1000).await? {
//!     println!("{} - {}: {} bytes", cover.artist, cover.title, cover.data.len());
//! }
//! ```

pub mod domain;
pub mod itunes;
pub mod traits;

pub use domain::{EnrichmentError, RemoteCover, RemoteQuery};
pub use itunes::{ItunesClient, ItunesConfig};
pub use traits::{AlwaysAccept, ConsoleConfirm, CoverLookup, MatchConfirmation};
