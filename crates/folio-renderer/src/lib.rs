//! Markup parsing and block rendering for portfolio documents.
//!
//! The pipeline has two stages:
//! 1. [`parse`]: markdown text to typed [`Block`] nodes. Total and pure;
//!    unrecognized syntax degrades to plain text.
//! 2. [`BlockRenderer::render`]: block nodes to HTML [`PresentationUnit`]s,
//!    with pluggable [`FenceProcessor`]s claiming special code fences
//!    before the built-in highlighting fallback.
//!
//! # Example
//!
//! ```
//! use folio_renderer::{parse, BlockRenderer};
//!
//! let blocks = parse("# Hello\n\nSome *text*.");
//! let units = BlockRenderer::new().render(&blocks);
//! assert_eq!(units.len(), 2);
//! ```

mod fence;
mod highlight;
mod node;
mod parser;
mod render;

pub use fence::{FenceProcessor, FenceResult};
pub use node::{Block, Span};
pub use parser::parse;
pub use render::{escape_html, BlockRenderer, PresentationUnit, UnitKind};
