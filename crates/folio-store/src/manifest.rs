//! Document manifest loading and validation.
//!
//! The manifest is a TOML file listing every document record. Each entry
//! carries either `content` (inline body) or `content_path` (external
//! resource), never both and never neither. Validation happens at load time so
//! the rest of the system only ever sees well-formed [`DocumentRecord`]s.

use serde::Deserialize;

use crate::record::{dedup_tags, Body, DocumentRecord, DocumentStore};

/// Manifest bundled with the crate, mirroring the site's published posts.
const DEFAULT_MANIFEST: &str = include_str!("../assets/manifest.toml");

/// Error type for manifest loading.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// The TOML itself could not be parsed.
    #[error("invalid manifest: {0}")]
    Parse(#[from] toml::de::Error),

    /// A record set both `content` and `content_path`, or neither.
    #[error("document '{id}': exactly one of 'content' and 'content_path' must be set")]
    Body {
        /// Offending record id.
        id: String,
    },

    /// Two records share an id.
    #[error("duplicate document id '{id}'")]
    DuplicateId {
        /// Duplicated id.
        id: String,
    },

    /// A `published_at` value is not `YYYY-MM-DD`.
    #[error("document '{id}': invalid date '{value}' (expected YYYY-MM-DD)")]
    Date {
        /// Offending record id.
        id: String,
        /// Rejected value.
        value: String,
    },
}

/// Raw manifest as deserialized from TOML.
#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(default)]
    documents: Vec<RawDocument>,
}

/// One manifest entry before validation.
#[derive(Debug, Deserialize)]
struct RawDocument {
    id: String,
    title: String,
    #[serde(default)]
    tags: Vec<String>,
    published_at: String,
    #[serde(default)]
    summary: String,
    content: Option<String>,
    content_path: Option<String>,
    #[serde(default)]
    read_time_minutes: u32,
    #[serde(default)]
    featured: bool,
    image: Option<String>,
}

impl RawDocument {
    fn validate(self) -> Result<DocumentRecord, ManifestError> {
        let body = match (self.content, self.content_path) {
            (Some(inline), None) => Body::Inline(inline),
            (None, Some(path)) => Body::External(path),
            _ => return Err(ManifestError::Body { id: self.id }),
        };

        if !is_iso_date(&self.published_at) {
            return Err(ManifestError::Date {
                id: self.id,
                value: self.published_at,
            });
        }

        Ok(DocumentRecord {
            id: self.id,
            title: self.title,
            tags: dedup_tags(self.tags),
            published_at: self.published_at,
            summary: self.summary,
            body,
            read_time_minutes: self.read_time_minutes,
            featured: self.featured,
            image: self.image,
        })
    }
}

/// Accepts exactly `YYYY-MM-DD` with plausible month/day ranges.
fn is_iso_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return false;
    }
    let digits =
        |range: std::ops::Range<usize>| value[range].bytes().all(|b| b.is_ascii_digit());
    if !(digits(0..4) && digits(5..7) && digits(8..10)) {
        return false;
    }
    let month: u32 = value[5..7].parse().unwrap_or(0);
    let day: u32 = value[8..10].parse().unwrap_or(0);
    (1..=12).contains(&month) && (1..=31).contains(&day)
}

/// Parse and validate a manifest from TOML text.
pub fn load_manifest(text: &str) -> Result<DocumentStore, ManifestError> {
    let raw: RawManifest = toml::from_str(text)?;

    let mut records = Vec::with_capacity(raw.documents.len());
    for doc in raw.documents {
        let record = doc.validate()?;
        if records.iter().any(|r: &DocumentRecord| r.id == record.id) {
            return Err(ManifestError::DuplicateId { id: record.id });
        }
        records.push(record);
    }

    Ok(DocumentStore::new(records))
}

/// Load the manifest bundled with the crate.
///
/// The bundled manifest is validated by tests, so failure here is a build
/// defect rather than a runtime condition.
pub fn default_store() -> Result<DocumentStore, ManifestError> {
    load_manifest(DEFAULT_MANIFEST)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_load_inline_document() {
        let store = load_manifest(
            r#"
            [[documents]]
            id = "hello"
            title = "Hello"
            published_at = "2024-12-26"
            tags = ["Rust", "Rust"]
            content = "Body text"
            "#,
        )
        .unwrap();

        let record = store.get("hello").unwrap();
        assert_eq!(record.body, Body::Inline("Body text".to_owned()));
        assert_eq!(record.tags, vec!["Rust"]);
    }

    #[test]
    fn test_load_external_document() {
        let store = load_manifest(
            r#"
            [[documents]]
            id = "ext"
            title = "External"
            published_at = "2024-01-02"
            content_path = "posts/ext.md"
            "#,
        )
        .unwrap();

        assert_eq!(
            store.get("ext").unwrap().body,
            Body::External("posts/ext.md".to_owned())
        );
    }

    #[test]
    fn test_both_bodies_rejected() {
        let err = load_manifest(
            r#"
            [[documents]]
            id = "bad"
            title = "Bad"
            published_at = "2024-01-02"
            content = "inline"
            content_path = "posts/bad.md"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ManifestError::Body { id } if id == "bad"));
    }

    #[test]
    fn test_missing_body_rejected() {
        let err = load_manifest(
            r#"
            [[documents]]
            id = "empty"
            title = "Empty"
            published_at = "2024-01-02"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ManifestError::Body { .. }));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let err = load_manifest(
            r#"
            [[documents]]
            id = "dup"
            title = "One"
            published_at = "2024-01-02"
            content = "a"

            [[documents]]
            id = "dup"
            title = "Two"
            published_at = "2024-01-03"
            content = "b"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ManifestError::DuplicateId { id } if id == "dup"));
    }

    #[test]
    fn test_invalid_date_rejected() {
        let err = load_manifest(
            r#"
            [[documents]]
            id = "when"
            title = "When"
            published_at = "26-12-2024"
            content = "a"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ManifestError::Date { .. }));
    }

    #[test]
    fn test_is_iso_date() {
        assert!(is_iso_date("2024-12-26"));
        assert!(is_iso_date("2024-01-01"));
        assert!(!is_iso_date("2024-13-01"));
        assert!(!is_iso_date("2024-00-10"));
        assert!(!is_iso_date("2024-1-1"));
        assert!(!is_iso_date("yesterday"));
    }

    #[test]
    fn test_default_store_is_valid() {
        let store = default_store().unwrap();
        assert!(!store.is_empty());
        // Blog posts reference external files, doc sections carry inline text.
        let post = store.get("bootsector-fundamentals").unwrap();
        assert!(matches!(post.body, Body::External(_)));
        let section = store.get("neoos-overview").unwrap();
        assert!(matches!(section.body, Body::Inline(_)));
    }

    #[test]
    fn test_default_store_doc_sections_are_inline() {
        let store = default_store().unwrap();
        let sections: Vec<_> = store
            .records()
            .iter()
            .filter(|r| r.id.starts_with("neoos-"))
            .collect();
        assert_eq!(sections.len(), 11);
        for section in sections {
            assert!(matches!(section.body, Body::Inline(_)));
            assert!(section.tags.contains(&"Documentation".to_owned()));
        }
    }
}
