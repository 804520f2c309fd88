//! Fence processor trait for extensible code fence handling.
//!
//! Processors are registered with the [`BlockRenderer`](crate::BlockRenderer)
//! and checked in registration order when a code fence is rendered. The first
//! processor returning a non-`PassThrough` result wins; fences nobody claims
//! fall back to syntax highlighting.
//!
//! # Example
//!
//! ```
//! use folio_renderer::{FenceProcessor, FenceResult};
//!
//! struct ShoutProcessor;
//!
//! impl FenceProcessor for ShoutProcessor {
//!     fn process(&mut self, language: &str, source: &str, _index: usize) -> FenceResult {
//!         if language == "shout" {
//!             FenceResult::Html(format!("<p>{}</p>", source.to_uppercase()))
//!         } else {
//!             FenceResult::PassThrough
//!         }
//!     }
//! }
//! ```

/// Result of processing a code fence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FenceResult {
    /// Replace the fence with this HTML fragment.
    Html(String),
    /// Not handled by this processor; try the next one.
    PassThrough,
}

/// Trait for turning special code fences into HTML.
///
/// Implementations claim one or more fence languages. Anything they do not
/// recognize must return [`FenceResult::PassThrough`] so the renderer can
/// fall back to highlighting.
pub trait FenceProcessor {
    /// Process a code fence.
    ///
    /// `language` is the first token of the fence info string (empty for a
    /// bare fence), `source` the fence body with its trailing newline
    /// stripped, and `index` the zero-based position of this fence within
    /// the document, usable for stable element ids.
    fn process(&mut self, language: &str, source: &str, index: usize) -> FenceResult;

    /// Warnings accumulated while processing. Default: none.
    fn warnings(&self) -> &[String] {
        &[]
    }
}
