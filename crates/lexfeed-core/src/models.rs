//! Wire types for the legislative-news API
//!
//! Shapes mirror the remote service's JSON. List envelopes are camelCase,
//! article bodies use the service's snake_case field names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Originating publication for an article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSource {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// A single news article as returned by the API.
///
/// Immutable on the client except through an explicit update mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: u64,
    /// Opaque share identifier. The live service misspells the field as
    /// `econded_id`, hence the alias.
    #[serde(default, alias = "econded_id")]
    pub encoded_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub source: Option<ArticleSource>,
    #[serde(rename = "state", default)]
    pub jurisdiction: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub published_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub url: String,
}

/// One page of list results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsPage {
    #[serde(default)]
    pub articles: Vec<Article>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub has_more: bool,
}

/// Filter set for list queries.
///
/// Equality is structural; the filter set participates directly in request
/// fingerprints. Unknown keys cannot exist: fields are fixed and typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NewsFilters {
    pub jurisdiction: Option<String>,
    pub topic: Option<String>,
    #[serde(default)]
    pub search: String,
}

impl NewsFilters {
    pub fn is_empty(&self) -> bool {
        self.jurisdiction.is_none() && self.topic.is_none() && self.search.is_empty()
    }
}

/// Partial article update; only set fields are serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArticleUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(rename = "state", skip_serializing_if = "Option::is_none")]
    pub jurisdiction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

impl ArticleUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.content.is_none()
            && self.jurisdiction.is_none()
            && self.topic.is_none()
    }
}

/// The two metadata collections the API serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetadataKind {
    Jurisdictions,
    Topics,
}

impl MetadataKind {
    /// Path segment used by the remote API for this collection.
    pub fn as_path(&self) -> &'static str {
        match self {
            MetadataKind::Jurisdictions => "states",
            MetadataKind::Topics => "topics",
        }
    }

    /// Singular label for messages.
    pub fn label(&self) -> &'static str {
        match self {
            MetadataKind::Jurisdictions => "state",
            MetadataKind::Topics => "topic",
        }
    }
}

/// Payload for registering a new jurisdiction or topic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewEntry {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_accepts_misspelled_encoded_id() {
        let json = r#"{
            "id": 42,
            "econded_id": "abc123",
            "title": "Senate passes budget",
            "state": "CA",
            "topic": "finance",
            "published_date": "2025-03-01T12:00:00Z"
        }"#;

        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.id, 42);
        assert_eq!(article.encoded_id, "abc123");
        assert_eq!(article.jurisdiction, "CA");
        assert!(article.published_date.is_some());
        assert!(article.source.is_none());
    }

    #[test]
    fn test_news_page_camel_case() {
        let json = r#"{"articles": [], "total": 25, "page": 1, "totalPages": 3, "hasMore": true}"#;

        let page: NewsPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.total, 25);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_more);
        assert!(page.articles.is_empty());
    }

    #[test]
    fn test_article_update_skips_unset_fields() {
        let patch = ArticleUpdate {
            title: Some("New title".into()),
            jurisdiction: Some("NY".into()),
            ..Default::default()
        };

        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json["title"], "New title");
        assert_eq!(json["state"], "NY");
        assert!(json.get("content").is_none());
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_filters_structural_equality() {
        let a = NewsFilters {
            jurisdiction: Some("CA".into()),
            topic: None,
            search: "healthcare".into(),
        };
        let b = NewsFilters {
            jurisdiction: Some("CA".into()),
            topic: None,
            search: "healthcare".into(),
        };
        assert_eq!(a, b);

        let c = NewsFilters {
            jurisdiction: Some("NY".into()),
            ..b.clone()
        };
        assert_ne!(b, c);
    }

    #[test]
    fn test_metadata_kind_paths() {
        assert_eq!(MetadataKind::Jurisdictions.as_path(), "states");
        assert_eq!(MetadataKind::Topics.as_path(), "topics");
    }
}
