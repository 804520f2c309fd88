//! Pagination and listing state.
//!
//! [`paginate`] slices a result list into fixed-size pages; [`Listing`] holds
//! the active query/tag/page triple and resets the page to 1 whenever the
//! filter changes, so a stale page number from a previous, larger result set
//! can never produce an out-of-range empty page.

use crate::record::DocumentRecord;
use crate::search;

/// One visible page of a result list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageView<T> {
    /// Items on the current page. May be empty only for an empty result list.
    pub items: Vec<T>,
    /// Total number of pages, at least 1.
    pub page_count: usize,
    /// The requested page clamped into `[1, page_count]`.
    pub current_page: usize,
}

/// Slice `items` into pages of `page_size` and return the requested page.
///
/// `page_count` is `ceil(len / page_size)` with a minimum of 1: an empty
/// list yields one valid empty page. `current_page` is clamped into range.
/// A `page_size` of 0 is treated as 1.
pub fn paginate<T: Clone>(items: &[T], page_size: usize, current_page: usize) -> PageView<T> {
    let page_size = page_size.max(1);
    let page_count = items.len().div_ceil(page_size).max(1);
    let current_page = current_page.clamp(1, page_count);

    let start = (current_page - 1) * page_size;
    let end = (start + page_size).min(items.len());
    let items = if start < items.len() {
        items[start..end].to_vec()
    } else {
        Vec::new()
    };

    PageView {
        items,
        page_count,
        current_page,
    }
}

/// Active filter and page state for a document listing.
#[derive(Clone, Debug)]
pub struct Listing {
    query: String,
    selected_tag: Option<String>,
    page: usize,
    page_size: usize,
}

impl Listing {
    /// Create a listing with the given page size, no filters, page 1.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            query: String::new(),
            selected_tag: None,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Set the text query. Resets to page 1.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page = 1;
    }

    /// Select a tag (or clear the selection). Resets to page 1.
    pub fn set_tag(&mut self, tag: Option<String>) {
        self.selected_tag = tag;
        self.page = 1;
    }

    /// Clear both filters. Resets to page 1.
    pub fn clear_filters(&mut self) {
        self.query.clear();
        self.selected_tag = None;
        self.page = 1;
    }

    /// Navigate to a page. Out-of-range values are clamped at view time.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// The active query string.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The selected tag, if any.
    #[must_use]
    pub fn selected_tag(&self) -> Option<&str> {
        self.selected_tag.as_deref()
    }

    /// The requested page number (pre-clamping).
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    /// Apply the active filters and return the visible page.
    pub fn visible<'a>(&self, documents: &'a [DocumentRecord]) -> PageView<&'a DocumentRecord> {
        let filtered = search::filter(documents, &self.query, self.selected_tag.as_deref());
        paginate(&filtered, self.page_size, self.page)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::record::Body;

    use super::*;

    #[test]
    fn test_paginate_exact_pages() {
        let items: Vec<u32> = (1..=6).collect();
        let view = paginate(&items, 3, 2);
        assert_eq!(view.items, vec![4, 5, 6]);
        assert_eq!(view.page_count, 2);
        assert_eq!(view.current_page, 2);
    }

    #[test]
    fn test_paginate_partial_last_page() {
        let items: Vec<u32> = (1..=7).collect();
        let view = paginate(&items, 3, 3);
        assert_eq!(view.items, vec![7]);
        assert_eq!(view.page_count, 3);
    }

    #[test]
    fn test_paginate_empty_list_is_valid() {
        let view = paginate::<u32>(&[], 5, 1);
        assert!(view.items.is_empty());
        assert_eq!(view.page_count, 1);
        assert_eq!(view.current_page, 1);
    }

    #[test]
    fn test_paginate_clamps_current_page() {
        let items: Vec<u32> = (1..=4).collect();
        let high = paginate(&items, 2, 99);
        assert_eq!(high.current_page, 2);
        assert_eq!(high.items, vec![3, 4]);

        let low = paginate(&items, 2, 0);
        assert_eq!(low.current_page, 1);
        assert_eq!(low.items, vec![1, 2]);
    }

    #[test]
    fn test_paginate_zero_page_size() {
        let items = vec![1, 2];
        let view = paginate(&items, 0, 1);
        assert_eq!(view.items, vec![1]);
        assert_eq!(view.page_count, 2);
    }

    fn record(id: &str, tags: &[&str]) -> DocumentRecord {
        DocumentRecord {
            id: id.to_owned(),
            title: id.to_owned(),
            tags: tags.iter().map(|t| (*t).to_owned()).collect(),
            published_at: "2024-12-26".to_owned(),
            summary: String::new(),
            body: Body::Inline(String::new()),
            read_time_minutes: 5,
            featured: false,
            image: None,
        }
    }

    #[test]
    fn test_listing_filter_change_resets_page() {
        let docs: Vec<_> = (0..7)
            .map(|i| {
                let tags: &[&str] = if i == 0 { &["Assembly"] } else { &[] };
                record(&format!("doc-{i}"), tags)
            })
            .collect();

        let mut listing = Listing::new(2);
        listing.set_page(3);
        assert_eq!(listing.visible(&docs).current_page, 3);

        // Selecting a tag with a single result must land on page 1 of 1,
        // not carry the stale page number over.
        listing.set_tag(Some("Assembly".to_owned()));
        let view = listing.visible(&docs);
        assert_eq!(view.current_page, 1);
        assert_eq!(view.page_count, 1);
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].id, "doc-0");
    }

    #[test]
    fn test_listing_query_change_resets_page() {
        let docs: Vec<_> = (0..5).map(|i| record(&format!("doc-{i}"), &[])).collect();
        let mut listing = Listing::new(2);
        listing.set_page(2);
        listing.set_query("doc");
        assert_eq!(listing.page(), 1);
        assert_eq!(listing.visible(&docs).current_page, 1);
    }

    #[test]
    fn test_listing_clear_filters() {
        let docs: Vec<_> = (0..3).map(|i| record(&format!("doc-{i}"), &[])).collect();
        let mut listing = Listing::new(10);
        listing.set_query("nothing matches this");
        assert!(listing.visible(&docs).items.is_empty());

        listing.clear_filters();
        assert_eq!(listing.visible(&docs).items.len(), 3);
    }
}
