//! iTunes Search API integration
//!
//! Finds album artwork by artist and album name. No API key required.
//!
//! API docs: https://performance-partners.apple.com/search-api

pub mod dto;
mod adapter;
mod client;

pub use adapter::{artwork_url, clean_album_name, select_album};
pub use client::{ItunesClient, ItunesConfig};
