//! Block rendering to HTML presentation units.
//!
//! [`BlockRenderer`] turns parsed [`Block`] nodes into [`PresentationUnit`]s,
//! one per top-level block. Code fences are offered to registered
//! [`FenceProcessor`]s first (registration order, first non-`PassThrough`
//! wins); unclaimed fences are routed through a closed dispatch to syntax
//! highlighting or escaped plain text.

use std::collections::HashMap;

use crate::fence::{FenceProcessor, FenceResult};
use crate::highlight;
use crate::node::{Block, Span};

/// Kind of a rendered presentation unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitKind {
    /// Heading with an anchor id.
    Heading,
    /// Paragraph of inline content.
    Paragraph,
    /// Ordered or unordered list.
    List,
    /// Code fence rendered as highlighted or plain `<pre>`.
    Code,
    /// Fence claimed by a processor (diagram figure, embed, ...).
    Figure,
    /// Pipe table.
    Table,
    /// Block quote.
    Blockquote,
    /// Image reference.
    Image,
    /// Horizontal rule.
    Rule,
}

/// One rendered block: its kind plus an HTML fragment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PresentationUnit {
    /// What kind of block produced this unit.
    pub kind: UnitKind,
    /// The HTML fragment.
    pub html: String,
}

/// Routing decision for a fence nobody claimed.
enum CodeFenceRoute<'a> {
    Highlight(&'a str),
    Plain,
}

/// Anchor id state for one render pass. Duplicate heading slugs get a
/// numeric suffix so ids stay unique within a document.
#[derive(Default)]
struct HeadingIds {
    counts: HashMap<String, usize>,
}

impl HeadingIds {
    fn assign(&mut self, text: &str) -> String {
        let slug = slugify(text);
        let count = self.counts.entry(slug.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            slug
        } else {
            format!("{slug}-{}", *count - 1)
        }
    }
}

/// Renders block nodes to HTML with pluggable fence processing.
#[derive(Default)]
pub struct BlockRenderer {
    processors: Vec<Box<dyn FenceProcessor>>,
}

impl BlockRenderer {
    /// Create a renderer with no fence processors registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fence processor. Processors are consulted in registration
    /// order.
    #[must_use]
    pub fn with_processor(mut self, processor: impl FenceProcessor + 'static) -> Self {
        self.processors.push(Box::new(processor));
        self
    }

    /// Render a parsed document into presentation units, one per block.
    pub fn render(&mut self, blocks: &[Block]) -> Vec<PresentationUnit> {
        let mut ids = HeadingIds::default();
        let mut fence_index = 0;
        blocks
            .iter()
            .map(|block| {
                let (kind, html) = self.render_block(block, &mut ids, &mut fence_index);
                PresentationUnit { kind, html }
            })
            .collect()
    }

    /// Warnings from all registered processors, in registration order.
    #[must_use]
    pub fn warnings(&self) -> Vec<&str> {
        self.processors
            .iter()
            .flat_map(|p| p.warnings().iter().map(String::as_str))
            .collect()
    }

    fn render_block(
        &mut self,
        block: &Block,
        ids: &mut HeadingIds,
        fence_index: &mut usize,
    ) -> (UnitKind, String) {
        match block {
            Block::Heading { level, spans } => {
                let id = ids.assign(&Span::plain_text(spans));
                let level = (*level).clamp(1, 6);
                let html = format!(r#"<h{level} id="{id}">{}</h{level}>"#, spans_html(spans));
                (UnitKind::Heading, html)
            }
            Block::Paragraph(spans) => (UnitKind::Paragraph, format!("<p>{}</p>", spans_html(spans))),
            Block::List { ordered, items } => {
                let tag = if *ordered { "ol" } else { "ul" };
                let mut html = format!("<{tag}>");
                for item in items {
                    html.push_str("<li>");
                    html.push_str(&spans_html(item));
                    html.push_str("</li>");
                }
                html.push_str(&format!("</{tag}>"));
                (UnitKind::List, html)
            }
            Block::CodeFence { language, text } => {
                let index = *fence_index;
                *fence_index += 1;
                self.render_fence(language.as_deref(), text, index)
            }
            Block::Table { header, rows } => (UnitKind::Table, table_html(header, rows)),
            Block::Blockquote(inner) => {
                let mut html = String::from("<blockquote>");
                for block in inner {
                    let (_, fragment) = self.render_block(block, ids, fence_index);
                    html.push_str(&fragment);
                }
                html.push_str("</blockquote>");
                (UnitKind::Blockquote, html)
            }
            Block::Image { src, alt } => {
                let html = format!(
                    r#"<img src="{}" alt="{}">"#,
                    escape_html(src),
                    escape_html(alt)
                );
                (UnitKind::Image, html)
            }
            Block::Rule => (UnitKind::Rule, "<hr>".to_owned()),
        }
    }

    fn render_fence(
        &mut self,
        language: Option<&str>,
        text: &str,
        index: usize,
    ) -> (UnitKind, String) {
        let language_token = language.unwrap_or("");
        for processor in &mut self.processors {
            match processor.process(language_token, text, index) {
                FenceResult::Html(html) => return (UnitKind::Figure, html),
                FenceResult::PassThrough => {}
            }
        }

        let route = match language {
            Some(lang) if !lang.is_empty() => CodeFenceRoute::Highlight(lang),
            _ => CodeFenceRoute::Plain,
        };
        let html = match route {
            CodeFenceRoute::Highlight(lang) => match highlight::highlight(lang, text) {
                Some(body) => format!(
                    r#"<pre class="code" data-language="{}"><code>{body}</code></pre>"#,
                    escape_html(lang)
                ),
                None => plain_code_html(text),
            },
            CodeFenceRoute::Plain => plain_code_html(text),
        };
        (UnitKind::Code, html)
    }
}

fn plain_code_html(text: &str) -> String {
    format!(r#"<pre class="code"><code>{}</code></pre>"#, escape_html(text))
}

fn table_html(header: &[Vec<Span>], rows: &[Vec<Vec<Span>>]) -> String {
    let mut html = String::from("<table><thead><tr>");
    for cell in header {
        html.push_str("<th>");
        html.push_str(&spans_html(cell));
        html.push_str("</th>");
    }
    html.push_str("</tr></thead><tbody>");
    for row in rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str("<td>");
            html.push_str(&spans_html(cell));
            html.push_str("</td>");
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    html
}

fn spans_html(spans: &[Span]) -> String {
    let mut out = String::new();
    for span in spans {
        match span {
            Span::Text(text) => out.push_str(&escape_html(text)),
            Span::Emphasis(children) => {
                out.push_str("<em>");
                out.push_str(&spans_html(children));
                out.push_str("</em>");
            }
            Span::Strong(children) => {
                out.push_str("<strong>");
                out.push_str(&spans_html(children));
                out.push_str("</strong>");
            }
            Span::Code(code) => {
                out.push_str("<code>");
                out.push_str(&escape_html(code));
                out.push_str("</code>");
            }
            Span::Link { href, children } => {
                out.push_str(&format!(r#"<a href="{}">"#, escape_html(href)));
                out.push_str(&spans_html(children));
                out.push_str("</a>");
            }
        }
    }
    out
}

/// Escape HTML special characters for safe embedding in markup.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Lowercased, hyphen-separated slug for heading anchors.
fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut last_hyphen = true;
    for c in text.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
            last_hyphen = false;
        } else if !last_hyphen {
            slug.push('-');
            last_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("section");
    }
    slug
}
