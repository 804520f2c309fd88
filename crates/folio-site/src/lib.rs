//! Document pipeline tying the store, loader, renderer, and diagrams
//! together.
//!
//! [`Site`] owns the document corpus, the listing state (query, tag, page),
//! and a [`SelectionGuard`] that discards render results from superseded
//! selections. Rendering one document runs the explicit pipeline
//! load → parse → render; nothing is cached, each selection recomputes.

mod guard;
mod view;

use std::time::Duration;

use folio_config::Config;
use folio_loader::ContentLoader;
use folio_store::{
    all_tags, default_store, load_manifest, DocumentRecord, DocumentStore, Listing, ManifestError,
    PageView,
};

pub use guard::{SelectionGuard, SelectionToken};
pub use view::{render_document, DocumentView};

/// Site construction error.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// Manifest file could not be read.
    #[error("cannot read manifest: {0}")]
    Io(#[from] std::io::Error),
    /// Manifest content is invalid.
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// The assembled site: corpus, loader, listing state, selection guard.
pub struct Site {
    store: DocumentStore,
    loader: ContentLoader,
    listing: Listing,
    guard: SelectionGuard,
}

impl Site {
    /// Assemble a site from loaded parts.
    #[must_use]
    pub fn new(store: DocumentStore, loader: ContentLoader, page_size: usize) -> Self {
        Self {
            store,
            loader,
            listing: Listing::new(page_size),
            guard: SelectionGuard::new(),
        }
    }

    /// Assemble a site from configuration: manifest from the configured path
    /// or the bundled default, loader from the content section.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured manifest path cannot be read or does
    /// not validate.
    pub fn from_config(config: &Config) -> Result<Self, SiteError> {
        let store = match &config.manifest_resolved {
            Some(path) => {
                let text = std::fs::read_to_string(path)?;
                load_manifest(&text)?
            }
            None => default_store()?,
        };
        let loader = ContentLoader::new(
            config.content.base_url.clone(),
            Duration::from_secs(config.content.timeout_secs),
        );
        Ok(Self::new(store, loader, config.listing.page_size))
    }

    /// The document corpus.
    #[must_use]
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// All tags across the corpus, deduplicated and sorted ascending.
    #[must_use]
    pub fn all_tags(&self) -> Vec<String> {
        all_tags(self.store.records())
    }

    /// Set the search query. Resets to page 1.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.listing.set_query(query);
    }

    /// Select or clear a tag filter. Resets to page 1.
    pub fn set_tag(&mut self, tag: Option<String>) {
        self.listing.set_tag(tag);
    }

    /// Navigate to a page of the current result list.
    pub fn set_page(&mut self, page: usize) {
        self.listing.set_page(page);
    }

    /// Clear query and tag filters. Resets to page 1.
    pub fn clear_filters(&mut self) {
        self.listing.clear_filters();
    }

    /// The currently visible page under the active filters.
    #[must_use]
    pub fn visible(&self) -> PageView<&DocumentRecord> {
        self.listing.visible(self.store.records())
    }

    /// Start a selection. Any outstanding token becomes stale.
    pub fn begin_selection(&self) -> SelectionToken {
        self.guard.begin()
    }

    /// Render the document with the given id for a selection.
    ///
    /// Returns `None` when the id is unknown, or when `token` was superseded
    /// by a newer call to [`begin_selection`](Self::begin_selection) (the
    /// stale result is computed but discarded, never delivered).
    #[must_use]
    pub fn render_selected(&self, token: SelectionToken, id: &str) -> Option<DocumentView> {
        let record = self.store.get(id)?;
        let view = render_document(&self.loader, record);
        self.guard.accept(token, view)
    }

    /// Render a document outside any selection flow (CLI usage).
    #[must_use]
    pub fn render(&self, id: &str) -> Option<DocumentView> {
        let record = self.store.get(id)?;
        Some(render_document(&self.loader, record))
    }
}
