//! Fence processor for flowchart diagrams.
//!
//! Claims fences whose language is exactly `mermaid` (case-sensitive; any
//! other casing falls through to syntax highlighting). Rendering failures
//! never fail the page: the fence is replaced with an error placeholder
//! figure and the failure is logged and recorded as a warning.

use std::sync::atomic::{AtomicU64, Ordering};

use rand::distr::Alphanumeric;
use rand::Rng;

use folio_renderer::{escape_html, FenceProcessor, FenceResult};

use crate::flowchart::{self, DiagramError};
use crate::layout::layout;
use crate::svg;

const DIAGRAM_LANGUAGE: &str = "mermaid";

static DIAGRAM_SEQ: AtomicU64 = AtomicU64::new(0);

/// A document-unique, process-unique element id for one diagram.
///
/// Combines a random token with a monotonic counter so ids never collide,
/// even across documents rendered in the same process.
fn unique_diagram_id() -> String {
    let mut rng = rand::rng();
    let token: String = (0..9).map(|_| rng.sample(Alphanumeric) as char).collect();
    let seq = DIAGRAM_SEQ.fetch_add(1, Ordering::Relaxed);
    svg::sanitize_svg_id(&format!("diagram-{token}-{seq}"))
}

/// Render flowchart source to normalized SVG markup.
///
/// `id` names the root element; when absent a unique id is generated. A
/// caller-provided id is sanitized before use.
pub fn render_diagram(source: &str, id: Option<&str>) -> Result<String, DiagramError> {
    let chart = flowchart::parse(source)?;
    let layout = layout(&chart);
    let id = id.map_or_else(unique_diagram_id, svg::sanitize_svg_id);
    let markup = svg::emit(&chart, &layout, &id);
    svg::normalize(&markup)
}

/// Fence processor turning `mermaid` fences into inline SVG figures.
#[derive(Default)]
pub struct DiagramProcessor {
    warnings: Vec<String>,
}

impl DiagramProcessor {
    /// Create a processor with no accumulated warnings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl FenceProcessor for DiagramProcessor {
    fn process(&mut self, language: &str, source: &str, index: usize) -> FenceResult {
        if language != DIAGRAM_LANGUAGE {
            return FenceResult::PassThrough;
        }

        match render_diagram(source, None) {
            Ok(markup) => FenceResult::Html(format!(r#"<figure class="diagram">{markup}</figure>"#)),
            Err(error) => {
                tracing::warn!(index, %error, "diagram rendering failed");
                self.warnings.push(format!("diagram {index}: {error}"));
                FenceResult::Html(error_figure(&error))
            }
        }
    }

    fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

fn error_figure(error: &DiagramError) -> String {
    format!(
        r#"<figure class="diagram diagram-error"><pre>Diagram rendering failed: {}</pre></figure>"#,
        escape_html(&error.to_string())
    )
}
