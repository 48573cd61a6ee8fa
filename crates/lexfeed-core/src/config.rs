//! Client configuration

use std::time::Duration;

use crate::fingerprint::Fingerprint;

/// Environment variable naming the API base URL.
pub const API_URL_ENV: &str = "LEXFEED_API_URL";

/// Tunables for the data-synchronization layer.
///
/// A missing or malformed base URL is kept as configured and surfaces as a
/// network error on the first request instead of failing construction.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the remote API.
    pub base_url: Option<String>,

    /// Articles per list page.
    pub page_size: u32,

    /// How long a cached list page stays fresh.
    pub list_stale_window: Duration,

    /// How long a cached article detail stays fresh.
    pub detail_stale_window: Duration,

    /// How long cached jurisdiction/topic collections stay fresh. These
    /// change rarely, so the window is much wider than for lists.
    pub metadata_stale_window: Duration,

    /// Quiescence delay before committing search input.
    pub debounce_delay: Duration,

    /// Attempts per automatic fetch before an entry is marked errored.
    pub max_attempts: u32,

    /// Backoff before the first retry; doubles on each further retry.
    pub retry_base_delay: Duration,

    /// Cache entry bound; least-recently-used entries are evicted beyond it.
    pub max_cache_entries: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            page_size: 10,
            list_stale_window: Duration::from_secs(30),
            detail_stale_window: Duration::from_secs(30),
            metadata_stale_window: Duration::from_secs(300),
            debounce_delay: Duration::from_millis(500),
            max_attempts: 3,
            retry_base_delay: Duration::from_millis(500),
            max_cache_entries: 200,
        }
    }
}

impl ClientConfig {
    /// Defaults with the base URL read from [`API_URL_ENV`].
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var(API_URL_ENV).ok().filter(|v| !v.is_empty()),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Freshness window for the operation behind a fingerprint.
    pub fn stale_window(&self, fingerprint: &Fingerprint) -> Duration {
        match fingerprint {
            Fingerprint::List { .. } => self.list_stale_window,
            Fingerprint::Detail { .. } => self.detail_stale_window,
            Fingerprint::Metadata { .. } => self.metadata_stale_window,
        }
    }
}
