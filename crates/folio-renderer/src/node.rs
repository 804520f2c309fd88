//! Typed block and span nodes produced by the parser.

/// Inline content within a block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Span {
    /// Plain text run.
    Text(String),
    /// Emphasized (`*italic*`) spans.
    Emphasis(Vec<Span>),
    /// Strong (`**bold**`) spans.
    Strong(Vec<Span>),
    /// Inline code.
    Code(String),
    /// Hyperlink with child spans.
    Link {
        /// Link destination.
        href: String,
        /// Link text spans.
        children: Vec<Span>,
    },
}

/// One parsed block node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    /// ATX heading, level 1-6.
    Heading {
        /// Heading level (1-6).
        level: u8,
        /// Heading content.
        spans: Vec<Span>,
    },
    /// Paragraph of inline spans.
    Paragraph(Vec<Span>),
    /// Ordered or unordered list. Nested lists are flattened to one level.
    List {
        /// True for ordered lists.
        ordered: bool,
        /// List items, each a span sequence.
        items: Vec<Vec<Span>>,
    },
    /// Fenced code block. The trailing newline of the captured text is
    /// stripped before rendering.
    CodeFence {
        /// Language tag from the opening fence, if any.
        language: Option<String>,
        /// Raw fence body.
        text: String,
    },
    /// Pipe table. Rows are padded/truncated to the header width at parse
    /// time, so every row here has exactly `header.len()` cells.
    Table {
        /// Header cells.
        header: Vec<Vec<Span>>,
        /// Body rows.
        rows: Vec<Vec<Vec<Span>>>,
    },
    /// Block quote containing nested blocks.
    Blockquote(Vec<Block>),
    /// Image reference.
    Image {
        /// Image source path/URL.
        src: String,
        /// Alternative text.
        alt: String,
    },
    /// Horizontal rule.
    Rule,
}

impl Span {
    /// Plain-text projection of a span tree (used for heading slugs).
    pub fn plain_text(spans: &[Span]) -> String {
        let mut out = String::new();
        collect_text(spans, &mut out);
        out
    }
}

fn collect_text(spans: &[Span], out: &mut String) {
    for span in spans {
        match span {
            Span::Text(t) | Span::Code(t) => out.push_str(t),
            Span::Emphasis(children) | Span::Strong(children) => collect_text(children, out),
            Span::Link { children, .. } => collect_text(children, out),
        }
    }
}
