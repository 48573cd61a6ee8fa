//! Filter and pagination state for the article list view
//!
//! Created when a list view mounts, mutated by user interaction, discarded
//! on unmount. Every transition recomputes the fingerprint synchronously, so
//! the cache never sees a stale key.

use crate::fingerprint::Fingerprint;
use crate::models::NewsFilters;

/// Current filter set and page cursor.
///
/// The cursor is 1-based and clamped to the page count reported by the last
/// successful list fetch for the current filter set. Changing any filter
/// resets it to page 1 and forgets the old page count, since it belonged to
/// a different result set.
#[derive(Debug, Clone)]
pub struct BrowseState {
    filters: NewsFilters,
    page: u32,
    page_size: u32,
    total_pages: Option<u32>,
}

impl BrowseState {
    pub fn new(page_size: u32) -> Self {
        Self {
            filters: NewsFilters::default(),
            page: 1,
            page_size: page_size.max(1),
            total_pages: None,
        }
    }

    pub fn filters(&self) -> &NewsFilters {
        &self.filters
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    pub fn set_jurisdiction(&mut self, value: Option<String>) {
        let value = normalize(value);
        if self.filters.jurisdiction == value {
            return;
        }
        self.filters.jurisdiction = value;
        self.reset_pagination();
    }

    pub fn set_topic(&mut self, value: Option<String>) {
        let value = normalize(value);
        if self.filters.topic == value {
            return;
        }
        self.filters.topic = value;
        self.reset_pagination();
    }

    /// Install a committed search value. Re-committing the identical string
    /// (the debouncer may do so) leaves pagination alone.
    pub fn set_search(&mut self, value: impl Into<String>) {
        let value = value.into();
        if self.filters.search == value {
            return;
        }
        self.filters.search = value;
        self.reset_pagination();
    }

    /// Advance one page, bounded by the known page count. No-op until a list
    /// result for the current filter set has been recorded.
    pub fn next_page(&mut self) {
        if let Some(total) = self.total_pages {
            self.page = (self.page + 1).min(total.max(1));
        }
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    /// Record the page count from the latest successful list fetch, pulling
    /// the cursor back if the result shrank beneath it.
    pub fn record_total_pages(&mut self, total_pages: u32) {
        self.total_pages = Some(total_pages);
        if total_pages > 0 && self.page > total_pages {
            self.page = total_pages;
        }
    }

    /// Fingerprint for the list request this state currently describes.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::List {
            filters: self.filters.clone(),
            page: self.page,
            page_size: self.page_size,
        }
    }

    fn reset_pagination(&mut self) {
        self.page = 1;
        self.total_pages = None;
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
