//! Rendered document views.

use folio_diagrams::DiagramProcessor;
use folio_loader::ContentLoader;
use folio_renderer::{parse, BlockRenderer, PresentationUnit};
use folio_store::DocumentRecord;

/// A fully rendered document: the metadata header the UI shows above the
/// body, plus the rendered presentation units.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentView {
    /// Document id.
    pub id: String,
    /// Title.
    pub title: String,
    /// Publication date, `YYYY-MM-DD`.
    pub published_at: String,
    /// Tags in manifest order.
    pub tags: Vec<String>,
    /// Short summary.
    pub summary: String,
    /// Estimated read time in minutes.
    pub read_time_minutes: u32,
    /// Rendered body, one unit per block.
    pub units: Vec<PresentationUnit>,
    /// Non-fatal rendering warnings (failed diagrams and the like).
    pub warnings: Vec<String>,
}

/// Run the full pipeline for one record: load the body, parse it, render it.
///
/// Never fails. A body that could not be fetched renders as the loader's
/// fallback text; a diagram that could not be drawn renders as an error
/// placeholder and lands in `warnings`.
pub fn render_document(loader: &ContentLoader, record: &DocumentRecord) -> DocumentView {
    let text = loader.load(record);
    let blocks = parse(&text);

    let mut renderer = BlockRenderer::new().with_processor(DiagramProcessor::new());
    let units = renderer.render(&blocks);
    let warnings = renderer.warnings().iter().map(|w| (*w).to_owned()).collect();

    DocumentView {
        id: record.id.clone(),
        title: record.title.clone(),
        published_at: record.published_at.clone(),
        tags: record.tags.clone(),
        summary: record.summary.clone(),
        read_time_minutes: record.read_time_minutes,
        units,
        warnings,
    }
}
