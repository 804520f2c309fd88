//! In-memory document store for the portfolio content pipeline.
//!
//! This crate provides:
//! - [`DocumentRecord`] / [`DocumentStore`]: the immutable document corpus
//! - [`load_manifest`] / [`default_store`]: TOML manifest loading with
//!   load-time validation (exactly one body source per record)
//! - [`filter`] / [`all_tags`]: search and tag filtering
//! - [`paginate`] / [`Listing`]: pagination with filter-change page reset
//!
//! Search, filtering and pagination are pure, synchronous functions over the
//! in-memory corpus; nothing here performs I/O beyond reading a manifest
//! string handed in by the caller.

mod manifest;
mod pagination;
mod record;
mod search;

pub use manifest::{default_store, load_manifest, ManifestError};
pub use pagination::{paginate, Listing, PageView};
pub use record::{Body, DocumentRecord, DocumentStore};
pub use search::{all_tags, filter};
