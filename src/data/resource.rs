//! Cached fetch-through for PokeAPI resources
//!
//! Every resource kind (location-area page, location area, pokemon) is read the
//! same way: cache first, network on a miss, raw bytes stored before decoding.

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use super::fetch::{Fetch, FetchError};
use crate::cache::ExpiringCache;

/// Failed to decode a response body
#[derive(Debug, Error)]
#[error("Failed to parse response for {key}: {source}")]
pub struct DecodeError {
    /// Cache key of the offending body
    pub key: String,
    #[source]
    pub source: serde_json::Error,
}

/// Errors from a cached fetch-through
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Returns the resource at `url`, using `cache` under `key`
///
/// On a miss the body is added to the cache before it is decoded, so a body
/// that fails to decode stays cached until the reaper drops it. A failed fetch
/// leaves the cache untouched.
///
/// # Arguments
/// * `cache` - Response cache shared with the reaper
/// * `fetcher` - Network capability used on a miss
/// * `key` - Cache key, normally the same as `url`
/// * `url` - Resource location
pub async fn fetch_resource<T, F>(
    cache: &ExpiringCache,
    fetcher: &F,
    key: &str,
    url: &str,
) -> Result<T, ResourceError>
where
    T: DeserializeOwned,
    F: Fetch + ?Sized,
{
    let body = match cache.get(key) {
        Some(body) => {
            debug!(key, "cache hit");
            body
        }
        None => {
            debug!(key, "cache miss");
            let body = fetcher.fetch(url).await?;
            cache.add(key, body.clone());
            body
        }
    };

    serde_json::from_slice(&body).map_err(|source| {
        DecodeError {
            key: key.to_string(),
            source,
        }
        .into()
    })
}
