//! Request gateway for the legislative-news API
//!
//! A pure I/O boundary: builds requests, normalizes failures into
//! [`FetchError`], and decodes responses. No caching lives here; that is
//! the query cache's responsibility.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::{ClientConfig, API_URL_ENV};
use crate::error::FetchError;
use crate::models::{Article, ArticleUpdate, MetadataKind, NewEntry, NewsFilters, NewsPage};

/// Remote API surface consumed by the sync layer.
///
/// Implemented by [`ApiGateway`] over HTTP; tests substitute scripted stubs.
#[async_trait]
pub trait NewsApi: Send + Sync {
    async fn list_news(
        &self,
        filters: &NewsFilters,
        page: u32,
        page_size: u32,
    ) -> Result<NewsPage, FetchError>;

    async fn get_article(&self, id: u64) -> Result<Article, FetchError>;

    async fn update_article(&self, id: u64, patch: &ArticleUpdate)
        -> Result<Article, FetchError>;

    /// Names in the order the server returns them; no client-side sort.
    async fn list_metadata(&self, kind: MetadataKind) -> Result<Vec<String>, FetchError>;

    async fn create_metadata(
        &self,
        kind: MetadataKind,
        entry: &NewEntry,
    ) -> Result<serde_json::Value, FetchError>;
}

/// HTTP implementation of [`NewsApi`] over reqwest.
pub struct ApiGateway {
    http: Client,
    base_url: Option<Url>,
}

impl ApiGateway {
    pub fn new(config: &ClientConfig) -> Self {
        let base_url = config.base_url.as_deref().and_then(|raw| match Url::parse(raw) {
            Ok(url) => Some(url),
            Err(error) => {
                warn!(url = raw, %error, "ignoring unparsable API base URL");
                None
            }
        });

        Self {
            http: Client::new(),
            base_url,
        }
    }

    /// Gateway configured from [`API_URL_ENV`].
    pub fn from_env() -> Self {
        Self::new(&ClientConfig::from_env())
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let base = self.base_url.as_ref().ok_or_else(|| {
            FetchError::network(format!("API base URL not configured (set {API_URL_ENV})"))
        })?;

        let mut url = base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| FetchError::network("API base URL cannot be a base"))?;
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    /// Query params for a list request. Only non-empty filters are sent,
    /// matching what the server expects.
    fn list_params(filters: &NewsFilters, page: u32, page_size: u32) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", page.to_string()), ("limit", page_size.to_string())];

        if let Some(state) = filters.jurisdiction.as_deref().filter(|s| !s.is_empty()) {
            params.push(("state", state.to_string()));
        }
        if let Some(topic) = filters.topic.as_deref().filter(|t| !t.is_empty()) {
            params.push(("topic", topic.to_string()));
        }
        if !filters.search.is_empty() {
            params.push(("search", filters.search.clone()));
        }

        params
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        debug!(%url, "GET");
        let response = self.http.get(url).send().await.map_err(as_network)?;
        decode_response(response).await
    }
}

#[async_trait]
impl NewsApi for ApiGateway {
    async fn list_news(
        &self,
        filters: &NewsFilters,
        page: u32,
        page_size: u32,
    ) -> Result<NewsPage, FetchError> {
        let mut url = self.endpoint(&["news"])?;
        for (key, value) in Self::list_params(filters, page, page_size) {
            url.query_pairs_mut().append_pair(key, &value);
        }
        self.get_json(url).await
    }

    async fn get_article(&self, id: u64) -> Result<Article, FetchError> {
        let id = id.to_string();
        let url = self.endpoint(&["news", &id])?;
        self.get_json(url).await
    }

    async fn update_article(
        &self,
        id: u64,
        patch: &ArticleUpdate,
    ) -> Result<Article, FetchError> {
        let id = id.to_string();
        let url = self.endpoint(&["news", &id])?;
        debug!(%url, "PUT");
        let response = self
            .http
            .put(url)
            .json(patch)
            .send()
            .await
            .map_err(as_network)?;
        decode_response(response).await
    }

    async fn list_metadata(&self, kind: MetadataKind) -> Result<Vec<String>, FetchError> {
        let url = self.endpoint(&["news", "metadata", kind.as_path()])?;
        self.get_json(url).await
    }

    async fn create_metadata(
        &self,
        kind: MetadataKind,
        entry: &NewEntry,
    ) -> Result<serde_json::Value, FetchError> {
        let url = self.endpoint(&["admin", kind.as_path()])?;
        debug!(%url, name = %entry.name, "POST");
        let response = self
            .http
            .post(url)
            .json(entry)
            .send()
            .await
            .map_err(as_network)?;
        decode_response(response).await
    }
}

fn as_network(error: reqwest::Error) -> FetchError {
    FetchError::Network {
        message: error.to_string(),
    }
}

/// Failure payload the server attaches to non-2xx responses.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Map a non-success response to an [`FetchError::Api`], preferring the
/// server's own `{message}` over the bare status line.
fn api_error(status: StatusCode, body: &str) -> FetchError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });

    FetchError::Api {
        status: status.as_u16(),
        message,
    }
}

fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, FetchError> {
    serde_json::from_str(body).map_err(|error| FetchError::decode(error.to_string()))
}

async fn decode_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, FetchError> {
    let status = response.status();
    let body = response.text().await.map_err(as_network)?;

    if !status.is_success() {
        return Err(api_error(status, &body));
    }
    decode_body(&body)
}
