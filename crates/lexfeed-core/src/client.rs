//! Client facade
//!
//! [`NewsClient`] wires the gateway, query cache, and mutation coordinator
//! together behind the surface the presentation layer consumes: snapshot
//! reads keyed by browse state or id, a manual retry, mutation triggers, and
//! an event subscription. It is explicitly constructed and passed by
//! reference (process-wide for a long-lived client, scoped for anything
//! shorter), never an ambient global.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::broadcast;

use crate::config::ClientConfig;
use crate::error::FetchError;
use crate::event::QueryEvent;
use crate::fingerprint::Fingerprint;
use crate::gateway::{ApiGateway, NewsApi};
use crate::models::MetadataKind;
use crate::mutation::MutationCoordinator;
use crate::query::browse::BrowseState;
use crate::query::cache::{CachedValue, QueryCache, RetryPolicy, Snapshot};
use crate::query::debounce::SearchDebouncer;

type FetchFuture = Pin<Box<dyn Future<Output = Result<CachedValue, FetchError>> + Send>>;

/// Entry point for the data-synchronization layer.
pub struct NewsClient {
    gateway: Arc<dyn NewsApi>,
    cache: Arc<QueryCache>,
    mutations: MutationCoordinator,
    config: ClientConfig,
}

impl NewsClient {
    pub fn new(config: ClientConfig, gateway: Arc<dyn NewsApi>) -> Self {
        let cache = Arc::new(QueryCache::new(
            config.max_cache_entries,
            RetryPolicy {
                max_attempts: config.max_attempts,
                base_delay: config.retry_base_delay,
            },
        ));
        let mutations = MutationCoordinator::new(Arc::clone(&gateway), Arc::clone(&cache));

        Self {
            gateway,
            cache,
            mutations,
            config,
        }
    }

    /// Client talking to the API named by `LEXFEED_API_URL`.
    pub fn from_env() -> Self {
        let config = ClientConfig::from_env();
        let gateway = Arc::new(ApiGateway::new(&config));
        Self::new(config, gateway)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The article list for the browse state's current filters and page.
    /// A successful result's page count is recorded back into the state so
    /// pagination stays clamped.
    pub async fn news_page(&self, browse: &mut BrowseState) -> Snapshot {
        let fingerprint = browse.fingerprint();
        let snapshot = self.read(fingerprint).await;
        if let Some(result) = snapshot.page() {
            browse.record_total_pages(result.total_pages);
        }
        snapshot
    }

    /// A single article by id.
    pub async fn article(&self, id: u64) -> Snapshot {
        self.read(Fingerprint::Detail { id }).await
    }

    /// The jurisdiction or topic name collection.
    pub async fn metadata(&self, kind: MetadataKind) -> Snapshot {
        self.read(Fingerprint::Metadata { kind }).await
    }

    /// Re-issue the fetch behind a fingerprint immediately, resetting its
    /// retry budget and bypassing backoff. Backs the UI's retry affordance.
    pub async fn retry(&self, fingerprint: Fingerprint) -> Snapshot {
        let fetcher = fetcher_for(&self.gateway, &fingerprint);
        self.cache.refetch(fingerprint, fetcher).await
    }

    /// Subscribe to cache events; consumers re-read their current
    /// fingerprint when one arrives.
    pub fn events(&self) -> broadcast::Receiver<QueryEvent> {
        self.cache.events().subscribe()
    }

    pub fn mutations(&self) -> &MutationCoordinator {
        &self.mutations
    }

    /// A debouncer preconfigured with this client's delay; its committed
    /// value feeds [`BrowseState::set_search`].
    pub fn search_debouncer(&self) -> SearchDebouncer {
        SearchDebouncer::new(self.config.debounce_delay)
    }

    async fn read(&self, fingerprint: Fingerprint) -> Snapshot {
        let window = self.config.stale_window(&fingerprint);
        let fetcher = fetcher_for(&self.gateway, &fingerprint);
        self.cache.read(fingerprint, window, fetcher).await
    }
}

/// The fingerprint fully describes the request, so one builder covers both
/// plain reads and manual retries.
fn fetcher_for(
    gateway: &Arc<dyn NewsApi>,
    fingerprint: &Fingerprint,
) -> impl Fn() -> FetchFuture + Send + 'static {
    let gateway = Arc::clone(gateway);
    let fingerprint = fingerprint.clone();
    move || -> FetchFuture {
        let gateway = Arc::clone(&gateway);
        match fingerprint.clone() {
            Fingerprint::List {
                filters,
                page,
                page_size,
            } => Box::pin(async move {
                gateway
                    .list_news(&filters, page, page_size)
                    .await
                    .map(CachedValue::Page)
            }),
            Fingerprint::Detail { id } => Box::pin(async move {
                gateway.get_article(id).await.map(CachedValue::Article)
            }),
            Fingerprint::Metadata { kind } => Box::pin(async move {
                gateway.list_metadata(kind).await.map(CachedValue::Names)
            }),
        }
    }
}
