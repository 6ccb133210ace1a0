//! Shared application state.

use std::sync::Arc;

use bridge::{NodeApi, ScrapeConfig, Scraper};

/// State handed to request handlers via Axum's `State` extractor.
///
/// Holds no metric values; every scrape builds and drops its own registry.
pub struct AppState {
    /// Scrape step bound to the node API client.
    pub scraper: Scraper,
}

impl AppState {
    pub fn new(api: Arc<dyn NodeApi>, scrape: ScrapeConfig) -> Self {
        Self {
            scraper: Scraper::new(api, scrape),
        }
    }
}

/// Thread-safe alias for `AppState`.
pub type SharedState = Arc<AppState>;
