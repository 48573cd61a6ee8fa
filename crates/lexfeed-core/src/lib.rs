//! lexfeed-core - Core library for lexfeed
//!
//! Client-side data synchronization for a legislative-news API: request
//! gateway, fingerprint-keyed query cache with stale-while-revalidate and
//! retry, debounced search input, filter/pagination state, and mutations
//! with cache invalidation.

pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod fingerprint;
pub mod gateway;
pub mod models;
pub mod mutation;
pub mod query;

pub use client::NewsClient;
pub use config::ClientConfig;
pub use error::FetchError;
pub use event::{EventBus, QueryEvent};
pub use fingerprint::Fingerprint;
pub use gateway::{ApiGateway, NewsApi};
pub use models::{
    Article, ArticleSource, ArticleUpdate, MetadataKind, NewEntry, NewsFilters, NewsPage,
};
pub use mutation::{MutationCoordinator, MutationState};
pub use query::browse::BrowseState;
pub use query::cache::{CachedValue, QueryCache, RetryPolicy, Snapshot};
pub use query::debounce::SearchDebouncer;
