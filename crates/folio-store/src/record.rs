//! Document records and the in-memory store.
//!
//! A [`DocumentRecord`] describes one blog post or documentation section:
//! listing metadata plus either an inline body or a reference to an external
//! text resource. Records are immutable once constructed; the store keeps
//! them in manifest order.

use std::collections::HashSet;

/// Where a document's body text lives.
///
/// Exactly one of the two is always populated; the enum makes that
/// structural rather than checked at runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Body {
    /// Body text carried inline in the manifest.
    Inline(String),
    /// Relative path/URL of an external text resource.
    External(String),
}

/// One document in the store. Immutable once constructed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentRecord {
    /// Unique stable key.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Tags, deduplicated case-sensitively, manifest order preserved.
    pub tags: Vec<String>,
    /// Publication date as a validated `YYYY-MM-DD` string.
    pub published_at: String,
    /// Short string shown in listings.
    pub summary: String,
    /// Inline body or external resource reference.
    pub body: Body,
    /// Estimated reading time. Informational only.
    pub read_time_minutes: u32,
    /// Whether the document is featured in listings.
    pub featured: bool,
    /// Optional cover image path for listings.
    pub image: Option<String>,
}

impl DocumentRecord {
    /// Check whether this record carries the given tag (case-sensitive).
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Deduplicate tags case-sensitively, keeping first-occurrence order.
pub(crate) fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.into_iter().filter(|t| seen.insert(t.clone())).collect()
}

/// Ordered, immutable collection of document records.
#[derive(Clone, Debug, Default)]
pub struct DocumentStore {
    records: Vec<DocumentRecord>,
}

impl DocumentStore {
    /// Create a store from records, preserving their order.
    #[must_use]
    pub fn new(records: Vec<DocumentRecord>) -> Self {
        Self { records }
    }

    /// Look up a record by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&DocumentRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// All records in store order.
    #[must_use]
    pub fn records(&self) -> &[DocumentRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
