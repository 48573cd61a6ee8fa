//! Mutation coordinator
//!
//! Wraps the gateway's write operations and keeps subsequent reads
//! consistent: on success the affected cache entries are invalidated (and
//! the article detail seeded from the response, saving a round trip); on
//! failure the cache is left untouched and the error is both returned to
//! the caller and retained for UI binding. Client-side validation runs
//! before any request is issued.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::fingerprint::Fingerprint;
use crate::gateway::NewsApi;
use crate::models::{Article, ArticleUpdate, MetadataKind, NewEntry};
use crate::query::cache::{CachedValue, QueryCache};

// Bounds from the article edit and admin forms.
const TITLE_MIN: usize = 5;
const TITLE_MAX: usize = 255;
const CONTENT_MIN: usize = 10;
const ABBREVIATION_MAX: usize = 2;

/// Observable mutation state for UI binding.
#[derive(Debug, Clone, Default)]
pub struct MutationState {
    pub is_in_flight: bool,
    pub last_error: Option<FetchError>,
}

/// Issues write operations against the API and invalidates overlapping
/// cache entries once they succeed.
pub struct MutationCoordinator {
    gateway: Arc<dyn NewsApi>,
    cache: Arc<QueryCache>,
    state: RwLock<MutationState>,
}

impl MutationCoordinator {
    pub fn new(gateway: Arc<dyn NewsApi>, cache: Arc<QueryCache>) -> Self {
        Self {
            gateway,
            cache,
            state: RwLock::new(MutationState::default()),
        }
    }

    /// Current `{is_in_flight, last_error}` tuple.
    pub fn state(&self) -> MutationState {
        self.state.read().clone()
    }

    /// Update an article. Every list fingerprint could contain the article,
    /// so all of them are invalidated along with its detail entry; the
    /// detail entry is then seeded from the response.
    pub async fn update_article(
        &self,
        id: u64,
        patch: ArticleUpdate,
    ) -> Result<Article, FetchError> {
        if let Err(error) = validate_update(&patch) {
            self.state.write().last_error = Some(error.clone());
            return Err(error);
        }

        self.begin();
        match self.gateway.update_article(id, &patch).await {
            Ok(article) => {
                self.finish(None);
                let invalidated = self.cache.invalidate(|fingerprint| {
                    fingerprint.is_list() || *fingerprint == Fingerprint::Detail { id }
                });
                self.cache
                    .write(Fingerprint::Detail { id }, CachedValue::Article(article.clone()));
                debug!(id, invalidated, "article updated");
                Ok(article)
            }
            Err(error) => {
                warn!(id, %error, "article update failed");
                self.finish(Some(error.clone()));
                Err(error)
            }
        }
    }

    /// Register a new jurisdiction or topic, then invalidate the matching
    /// metadata collection so the next read refetches it.
    pub async fn create_metadata(
        &self,
        kind: MetadataKind,
        entry: NewEntry,
    ) -> Result<serde_json::Value, FetchError> {
        if let Err(error) = validate_new_entry(kind, &entry) {
            self.state.write().last_error = Some(error.clone());
            return Err(error);
        }

        self.begin();
        match self.gateway.create_metadata(kind, &entry).await {
            Ok(created) => {
                self.finish(None);
                self.cache
                    .invalidate(|fingerprint| *fingerprint == Fingerprint::Metadata { kind });
                debug!(kind = kind.as_path(), name = %entry.name, "metadata entry created");
                Ok(created)
            }
            Err(error) => {
                warn!(kind = kind.as_path(), %error, "metadata creation failed");
                self.finish(Some(error.clone()));
                Err(error)
            }
        }
    }

    fn begin(&self) {
        let mut state = self.state.write();
        state.is_in_flight = true;
        state.last_error = None;
    }

    fn finish(&self, error: Option<FetchError>) {
        let mut state = self.state.write();
        state.is_in_flight = false;
        state.last_error = error;
    }
}

fn validate_update(patch: &ArticleUpdate) -> Result<(), FetchError> {
    if patch.is_empty() {
        return Err(FetchError::validation("no fields to update"));
    }
    if let Some(title) = &patch.title {
        let length = title.chars().count();
        if length < TITLE_MIN || length > TITLE_MAX {
            return Err(FetchError::validation(format!(
                "title must be between {TITLE_MIN} and {TITLE_MAX} characters"
            )));
        }
    }
    if let Some(content) = &patch.content {
        if content.chars().count() < CONTENT_MIN {
            return Err(FetchError::validation(format!(
                "content must be at least {CONTENT_MIN} characters"
            )));
        }
    }
    Ok(())
}

fn validate_new_entry(kind: MetadataKind, entry: &NewEntry) -> Result<(), FetchError> {
    if entry.name.trim().is_empty() {
        return Err(FetchError::validation("name is required"));
    }
    if kind == MetadataKind::Jurisdictions {
        let Some(abbreviation) = entry
            .abbreviation
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
        else {
            return Err(FetchError::validation(
                "abbreviation is required for a state",
            ));
        };
        if abbreviation.chars().count() > ABBREVIATION_MAX {
            return Err(FetchError::validation(format!(
                "abbreviation must be at most {ABBREVIATION_MAX} characters"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patch_with_title(title: &str) -> ArticleUpdate {
        ArticleUpdate {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_update_validation_title_bounds() {
        assert!(validate_update(&patch_with_title("Senate passes budget")).is_ok());
        assert!(matches!(
            validate_update(&patch_with_title("Shrt")),
            Err(FetchError::Validation { .. })
        ));
        assert!(matches!(
            validate_update(&patch_with_title(&"x".repeat(256))),
            Err(FetchError::Validation { .. })
        ));
    }

    #[test]
    fn test_update_validation_content_minimum() {
        let patch = ArticleUpdate {
            content: Some("too short".into()),
            ..Default::default()
        };
        assert!(matches!(
            validate_update(&patch),
            Err(FetchError::Validation { .. })
        ));

        let patch = ArticleUpdate {
            content: Some("long enough to publish".into()),
            ..Default::default()
        };
        assert!(validate_update(&patch).is_ok());
    }

    #[test]
    fn test_update_validation_rejects_empty_patch() {
        assert!(matches!(
            validate_update(&ArticleUpdate::default()),
            Err(FetchError::Validation { .. })
        ));
    }

    #[test]
    fn test_new_entry_validation_state_abbreviation() {
        let entry = NewEntry {
            name: "California".into(),
            abbreviation: Some("CA".into()),
            description: None,
        };
        assert!(validate_new_entry(MetadataKind::Jurisdictions, &entry).is_ok());

        let entry = NewEntry {
            name: "California".into(),
            abbreviation: Some("CAL".into()),
            description: None,
        };
        assert!(matches!(
            validate_new_entry(MetadataKind::Jurisdictions, &entry),
            Err(FetchError::Validation { .. })
        ));

        let entry = NewEntry {
            name: "California".into(),
            abbreviation: None,
            description: None,
        };
        assert!(matches!(
            validate_new_entry(MetadataKind::Jurisdictions, &entry),
            Err(FetchError::Validation { .. })
        ));
    }

    #[test]
    fn test_new_entry_validation_topic_needs_no_abbreviation() {
        let entry = NewEntry {
            name: "Healthcare".into(),
            abbreviation: None,
            description: Some("Coverage and policy".into()),
        };
        assert!(validate_new_entry(MetadataKind::Topics, &entry).is_ok());
    }

    #[test]
    fn test_new_entry_validation_requires_name() {
        let entry = NewEntry {
            name: "   ".into(),
            abbreviation: Some("CA".into()),
            description: None,
        };
        assert!(matches!(
            validate_new_entry(MetadataKind::Jurisdictions, &entry),
            Err(FetchError::Validation { .. })
        ));
    }
}
