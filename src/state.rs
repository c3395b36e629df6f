//! Shared application state injected into all request handlers.

use std::sync::Arc;

use crate::application::services::ShortenerService;

/// Application state shared across all HTTP handlers.
///
/// Cloned per request; the service itself sits behind an [`Arc`].
#[derive(Clone)]
pub struct AppState {
    pub shortener: Arc<ShortenerService>,
    /// Take the client ID from forwarding headers instead of the peer address.
    pub behind_proxy: bool,
}

impl AppState {
    pub fn new(shortener: Arc<ShortenerService>, behind_proxy: bool) -> Self {
        Self {
            shortener,
            behind_proxy,
        }
    }
}
