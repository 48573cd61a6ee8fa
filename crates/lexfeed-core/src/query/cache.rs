//! Fingerprint-keyed query cache
//!
//! The cache maps request fingerprints to entries carrying data, freshness,
//! and fetch status. It enforces at-most-one in-flight request per
//! fingerprint, serves stale data while a refetch runs in the background,
//! retries failed fetches with doubling backoff, and publishes events so
//! subscribers re-read after a background completion or an invalidation.
//!
//! Entry mutation and in-flight claiming happen inside a single lock guard
//! with no await in between, so two reads racing on the same fingerprint can
//! never both issue a request.
//!
//! The entry map is LRU-bounded; entries fall out once no recent read has
//! touched them. Invalidation keeps the value and only clears freshness, so
//! consumers can keep showing the previous result while the refetch runs.

use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use lru::LruCache;
use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::event::{EventBus, QueryEvent};
use crate::fingerprint::Fingerprint;
use crate::models::{Article, NewsPage};

/// Result payloads the cache can hold, one variant per fingerprint kind.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    Page(NewsPage),
    Article(Article),
    Names(Vec<String>),
}

/// One cached query result.
#[derive(Debug, Clone, Default)]
struct CacheEntry {
    value: Option<CachedValue>,
    error: Option<FetchError>,
    fetched_at: Option<Instant>,
    is_fetching: bool,
    retry_count: u32,
}

impl CacheEntry {
    fn is_fresh(&self, stale_window: Duration) -> bool {
        match (&self.value, self.fetched_at) {
            (Some(_), Some(at)) => at.elapsed() < stale_window,
            _ => false,
        }
    }
}

/// What a consumer sees for a fingerprint at one instant.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub value: Option<CachedValue>,
    pub error: Option<FetchError>,
    /// A fetch is running and there is no previous value to show.
    pub is_loading: bool,
    /// A fetch is running behind a previous value that is still on display.
    pub is_fetching_in_background: bool,
}

impl Snapshot {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn page(&self) -> Option<&NewsPage> {
        match &self.value {
            Some(CachedValue::Page(page)) => Some(page),
            _ => None,
        }
    }

    pub fn article(&self) -> Option<&Article> {
        match &self.value {
            Some(CachedValue::Article(article)) => Some(article),
            _ => None,
        }
    }

    pub fn names(&self) -> Option<&[String]> {
        match &self.value {
            Some(CachedValue::Names(names)) => Some(names),
            _ => None,
        }
    }
}

/// Retry schedule for failed fetches.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Attempts per automatic fetch before the entry is marked errored.
    pub max_attempts: u32,
    /// Backoff before the first retry; doubles on each further retry.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Backoff after `failed_attempts` consecutive failures.
    fn delay_after(&self, failed_attempts: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(failed_attempts.saturating_sub(1))
    }
}

enum Plan {
    /// Serve the snapshot as-is: fresh, already fetching, or exhausted.
    Serve,
    /// Claimed the fetch; no previous value, so the caller awaits it.
    Foreground,
    /// Claimed the fetch; a previous value exists, refetch runs detached.
    Background,
}

/// Shared query cache. The only shared mutable resource of the sync layer;
/// all access goes through these operations.
pub struct QueryCache {
    entries: Mutex<LruCache<Fingerprint, CacheEntry>>,
    events: EventBus,
    retry: RetryPolicy,
}

impl QueryCache {
    pub fn new(max_entries: usize, retry: RetryPolicy) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            events: EventBus::default_capacity(),
            retry,
        }
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Read the entry behind `fingerprint`, fetching if needed.
    ///
    /// A fresh entry is served without network access. A stale entry with a
    /// previous value is served immediately while the refetch runs detached
    /// (`is_fetching_in_background`). A cold miss awaits the fetch inline.
    /// If a fetch for the fingerprint is already in flight, no second
    /// request is issued; the snapshot reflects the in-flight state and the
    /// outcome arrives via the event bus. An entry whose retries are
    /// exhausted is served errored until [`QueryCache::refetch`] or an
    /// invalidation resets its budget.
    pub async fn read<F, Fut>(
        self: &Arc<Self>,
        fingerprint: Fingerprint,
        stale_window: Duration,
        fetcher: F,
    ) -> Snapshot
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = Result<CachedValue, FetchError>> + Send + 'static,
    {
        let max_attempts = self.retry.max_attempts.max(1);
        let plan = {
            let mut entries = self.entries.lock();
            let entry = entries.get_or_insert_mut(fingerprint.clone(), CacheEntry::default);

            if entry.is_fetching {
                Plan::Serve
            } else if entry.is_fresh(stale_window) {
                Plan::Serve
            } else if entry.error.is_some() && entry.retry_count >= max_attempts {
                Plan::Serve
            } else {
                entry.is_fetching = true;
                entry.retry_count = 0;
                if entry.value.is_some() {
                    Plan::Background
                } else {
                    Plan::Foreground
                }
            }
        };

        match plan {
            Plan::Serve => self.snapshot(&fingerprint),
            Plan::Foreground => {
                self.run_fetch(&fingerprint, fetcher).await;
                self.snapshot(&fingerprint)
            }
            Plan::Background => {
                let snapshot = self.snapshot(&fingerprint);
                let cache = Arc::clone(self);
                tokio::spawn(async move {
                    cache.run_fetch(&fingerprint, fetcher).await;
                });
                snapshot
            }
        }
    }

    /// Force an immediate refetch, resetting the retry budget and bypassing
    /// any backoff from earlier failures. Backs the UI's retry affordance.
    pub async fn refetch<F, Fut>(&self, fingerprint: Fingerprint, fetcher: F) -> Snapshot
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<CachedValue, FetchError>>,
    {
        let claimed = {
            let mut entries = self.entries.lock();
            let entry = entries.get_or_insert_mut(fingerprint.clone(), CacheEntry::default);
            if entry.is_fetching {
                false
            } else {
                entry.is_fetching = true;
                entry.retry_count = 0;
                entry.error = None;
                true
            }
        };

        if claimed {
            self.run_fetch(&fingerprint, fetcher).await;
        }
        self.snapshot(&fingerprint)
    }

    /// Mark every entry whose fingerprint matches the predicate as stale.
    /// Values stay in place so consumers can keep showing them while the
    /// refetch runs; retry budgets reset so errored entries fetch again.
    pub fn invalidate<P>(&self, predicate: P) -> usize
    where
        P: Fn(&Fingerprint) -> bool,
    {
        let invalidated: Vec<Fingerprint> = {
            let mut entries = self.entries.lock();
            let mut hit = Vec::new();
            for (fingerprint, entry) in entries.iter_mut() {
                if predicate(fingerprint) {
                    entry.fetched_at = None;
                    entry.retry_count = 0;
                    hit.push(fingerprint.clone());
                }
            }
            hit
        };

        debug!(count = invalidated.len(), "cache entries invalidated");
        for fingerprint in invalidated.iter().cloned() {
            self.events.publish(QueryEvent::Invalidated(fingerprint));
        }
        invalidated.len()
    }

    /// Seed an entry directly with already-known data, marking it fresh.
    /// Used after a mutation whose response is itself the needed data, which
    /// saves the round trip a refetch would cost.
    pub fn write(&self, fingerprint: Fingerprint, value: CachedValue) {
        {
            let mut entries = self.entries.lock();
            let entry = entries.get_or_insert_mut(fingerprint.clone(), CacheEntry::default);
            entry.value = Some(value);
            entry.error = None;
            entry.fetched_at = Some(Instant::now());
            entry.retry_count = 0;
        }
        debug!(%fingerprint, "cache entry seeded");
        self.events.publish(QueryEvent::Updated(fingerprint));
    }

    /// Current view of an entry without touching the network or recency.
    pub fn peek(&self, fingerprint: &Fingerprint) -> Snapshot {
        let entries = self.entries.lock();
        match entries.peek(fingerprint) {
            Some(entry) => Self::snapshot_of(entry),
            None => Snapshot::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.entries.lock().contains(fingerprint)
    }

    fn snapshot(&self, fingerprint: &Fingerprint) -> Snapshot {
        let mut entries = self.entries.lock();
        match entries.get(fingerprint) {
            Some(entry) => Self::snapshot_of(entry),
            None => Snapshot::default(),
        }
    }

    fn snapshot_of(entry: &CacheEntry) -> Snapshot {
        Snapshot {
            value: entry.value.clone(),
            error: entry.error.clone(),
            is_loading: entry.is_fetching && entry.value.is_none(),
            is_fetching_in_background: entry.is_fetching && entry.value.is_some(),
        }
    }

    /// Attempt the fetch up to `max_attempts` times with doubling backoff,
    /// then record the outcome and publish the matching event.
    async fn run_fetch<F, Fut>(&self, fingerprint: &Fingerprint, fetcher: F)
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<CachedValue, FetchError>>,
    {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            match fetcher().await {
                Ok(value) => {
                    self.store_success(fingerprint, value);
                    return;
                }
                Err(error) => {
                    let give_up = attempt >= max_attempts;
                    self.store_failure(fingerprint, &error, attempt, give_up);
                    if give_up {
                        warn!(%fingerprint, attempts = attempt, %error, "fetch failed, giving up");
                        return;
                    }
                    let delay = self.retry.delay_after(attempt);
                    debug!(
                        %fingerprint,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        %error,
                        "fetch failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    fn store_success(&self, fingerprint: &Fingerprint, value: CachedValue) {
        {
            let mut entries = self.entries.lock();
            // The entry may have been evicted while the fetch was in flight;
            // the result is simply dropped then.
            if let Some(entry) = entries.get_mut(fingerprint) {
                entry.value = Some(value);
                entry.error = None;
                entry.fetched_at = Some(Instant::now());
                entry.is_fetching = false;
                entry.retry_count = 0;
            }
        }
        debug!(%fingerprint, "query stored");
        self.events.publish(QueryEvent::Updated(fingerprint.clone()));
    }

    fn store_failure(
        &self,
        fingerprint: &Fingerprint,
        error: &FetchError,
        attempts: u32,
        give_up: bool,
    ) {
        {
            let mut entries = self.entries.lock();
            if let Some(entry) = entries.get_mut(fingerprint) {
                entry.retry_count = attempts;
                if give_up {
                    entry.error = Some(error.clone());
                    entry.is_fetching = false;
                }
            }
        }
        if give_up {
            self.events.publish(QueryEvent::Errored(fingerprint.clone()));
        }
    }
}
