//! Client side access to events
//!
//! Talks to a remote server through [`ApiClient`] and falls back to the
//! local cache when the server can't be reached.

pub mod api;
pub mod session;

pub use api::ApiClient;
pub use session::EventSession;

use crate::core::AppConfig;
use crate::store::{FallbackStore, LocalCache};

/// Store used by client commands: the configured server with the
/// configured cache directory as fallback
pub fn connect(config: &AppConfig) -> FallbackStore<ApiClient> {
    FallbackStore::new(
        ApiClient::new(&config.api_url),
        LocalCache::new(&config.cache_path),
    )
}
