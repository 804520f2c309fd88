//! Search and tag filtering over the document store.
//!
//! Matching is substring, case-insensitive and unanchored; a linear scan is
//! all a corpus of this size needs. Tag selection takes precedence over the
//! text query: selecting a tag clears search intent.

use std::collections::BTreeSet;

use crate::record::DocumentRecord;

/// Filter documents by tag or query, preserving store order.
///
/// Precedence:
/// 1. `selected_tag` set: documents carrying that exact tag (case-sensitive),
///    the query is ignored.
/// 2. trimmed `query` non-empty: documents whose title, summary or any tag
///    contains the query, case-insensitively.
/// 3. neither: all documents.
pub fn filter<'a>(
    documents: &'a [DocumentRecord],
    query: &str,
    selected_tag: Option<&str>,
) -> Vec<&'a DocumentRecord> {
    if let Some(tag) = selected_tag {
        return documents.iter().filter(|d| d.has_tag(tag)).collect();
    }

    let query = query.trim();
    if query.is_empty() {
        return documents.iter().collect();
    }

    let needle = query.to_lowercase();
    documents
        .iter()
        .filter(|d| matches_query(d, &needle))
        .collect()
}

/// Case-insensitive substring match against title, summary and tags.
fn matches_query(record: &DocumentRecord, needle: &str) -> bool {
    record.title.to_lowercase().contains(needle)
        || record.summary.to_lowercase().contains(needle)
        || record
            .tags
            .iter()
            .any(|t| t.to_lowercase().contains(needle))
}

/// Deduplicated union of all documents' tags, sorted ascending.
pub fn all_tags(documents: &[DocumentRecord]) -> Vec<String> {
    let set: BTreeSet<&str> = documents
        .iter()
        .flat_map(|d| d.tags.iter().map(String::as_str))
        .collect();
    set.into_iter().map(str::to_owned).collect()
}
