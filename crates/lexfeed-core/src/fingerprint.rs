//! Request fingerprints
//!
//! A fingerprint is the deterministic cache key derived from an operation
//! and its parameters. Two logically identical requests always produce equal
//! fingerprints, which is what lets the cache deduplicate them.

use std::fmt;

use crate::models::{MetadataKind, NewsFilters};

/// Cache key for one remote read operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Fingerprint {
    /// Article list for a filter set and page.
    List {
        filters: NewsFilters,
        page: u32,
        page_size: u32,
    },
    /// Single article by id.
    Detail { id: u64 },
    /// Jurisdiction or topic name collection.
    Metadata { kind: MetadataKind },
}

impl Fingerprint {
    pub fn is_list(&self) -> bool {
        matches!(self, Fingerprint::List { .. })
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fingerprint::List {
                filters,
                page,
                page_size,
            } => write!(
                f,
                "news?page={}&limit={}&state={}&topic={}&search={}",
                page,
                page_size,
                filters.jurisdiction.as_deref().unwrap_or(""),
                filters.topic.as_deref().unwrap_or(""),
                filters.search,
            ),
            Fingerprint::Detail { id } => write!(f, "news/{id}"),
            Fingerprint::Metadata { kind } => write!(f, "metadata/{}", kind.as_path()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_key(jurisdiction: Option<&str>, page: u32) -> Fingerprint {
        Fingerprint::List {
            filters: NewsFilters {
                jurisdiction: jurisdiction.map(String::from),
                topic: None,
                search: String::new(),
            },
            page,
            page_size: 10,
        }
    }

    #[test]
    fn test_identical_requests_share_a_fingerprint() {
        assert_eq!(list_key(Some("CA"), 1), list_key(Some("CA"), 1));
    }

    #[test]
    fn test_jurisdictions_produce_distinct_fingerprints() {
        assert_ne!(list_key(Some("CA"), 1), list_key(Some("NY"), 1));
        assert_ne!(list_key(Some("CA"), 1), list_key(Some("CA"), 2));
        assert_ne!(list_key(None, 1), list_key(Some("CA"), 1));
    }

    #[test]
    fn test_kinds_never_collide() {
        let list = list_key(None, 1);
        let detail = Fingerprint::Detail { id: 1 };
        let metadata = Fingerprint::Metadata {
            kind: MetadataKind::Topics,
        };

        assert_ne!(list, detail);
        assert_ne!(detail, metadata);
        assert!(list.is_list());
        assert!(!detail.is_list());
    }

    #[test]
    fn test_display_names_the_operation() {
        assert_eq!(Fingerprint::Detail { id: 42 }.to_string(), "news/42");
        assert_eq!(
            Fingerprint::Metadata {
                kind: MetadataKind::Jurisdictions
            }
            .to_string(),
            "metadata/states"
        );
    }
}
