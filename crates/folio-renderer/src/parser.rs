//! Markup parsing into typed block nodes.
//!
//! [`parse`] converts raw markdown text into a sequence of [`Block`] nodes.
//! It is a pure, total function: it never fails, and unrecognized syntax
//! degrades to plain paragraph text. Parsing is built on the pulldown-cmark
//! event stream; this module folds events into a tree instead of rendering
//! them directly.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::node::{Block, Span};

/// Parse markdown text into block nodes.
///
/// Supported: ATX headings, paragraphs, ordered/unordered lists (nested
/// lists flattened to one level), fenced code blocks with an optional
/// language tag, pipe tables with the header-defines-width policy, block
/// quotes, images, horizontal rules, and emphasis/strong/code/link spans.
pub fn parse(text: &str) -> Vec<Block> {
    let parser = Parser::new_ext(text, Options::ENABLE_TABLES);
    let mut builder = TreeBuilder::default();
    for event in parser {
        builder.process(event);
    }
    builder.finish()
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// An in-flight inline frame (paragraph body, emphasis run, link text, ...).
struct SpanFrame {
    kind: FrameKind,
    children: Vec<Span>,
}

enum FrameKind {
    /// Top-level inline context of a block (paragraph, heading, item, cell).
    Root,
    Emphasis,
    Strong,
    Link(String),
    /// Swallows alt-text spans of an image.
    ImageAlt(String),
}

struct ListCtx {
    ordered: bool,
    items: Vec<Vec<Span>>,
    /// Extra nesting depth; nested lists are flattened into the outer one.
    depth: usize,
}

#[derive(Default)]
struct TableCtx {
    header: Vec<Vec<Span>>,
    rows: Vec<Vec<Vec<Span>>>,
    current_row: Vec<Vec<Span>>,
    in_head: bool,
}

#[derive(Default)]
struct TreeBuilder {
    /// Block frames: index 0 is the document, further frames are blockquotes.
    frames: Vec<Vec<Block>>,
    spans: Vec<SpanFrame>,
    list: Option<ListCtx>,
    table: Option<TableCtx>,
    /// Active fence: (language, buffered text).
    code: Option<(Option<String>, String)>,
    heading: Option<u8>,
}

impl TreeBuilder {
    fn blocks(&mut self) -> &mut Vec<Block> {
        if self.frames.is_empty() {
            self.frames.push(Vec::new());
        }
        self.frames.last_mut().expect("frame stack is non-empty")
    }

    fn push_root_frame(&mut self) {
        self.spans.push(SpanFrame {
            kind: FrameKind::Root,
            children: Vec::new(),
        });
    }

    fn pop_spans(&mut self) -> Vec<Span> {
        self.spans.pop().map(|f| f.children).unwrap_or_default()
    }

    /// Append text to the innermost inline frame, starting an implicit
    /// paragraph when none is open (degradation path for loose content).
    fn push_text(&mut self, text: &str) {
        if let Some((_, buffer)) = self.code.as_mut() {
            buffer.push_str(text);
            return;
        }
        if self.spans.is_empty() {
            if text.trim().is_empty() {
                return;
            }
            let block = Block::Paragraph(vec![Span::Text(text.trim_end().to_owned())]);
            self.blocks().push(block);
            return;
        }
        if let Some(frame) = self.spans.last_mut() {
            // Merge adjacent text runs so a paragraph of plain text parses
            // to a single span.
            if let Some(Span::Text(last)) = frame.children.last_mut() {
                last.push_str(text);
            } else {
                frame.children.push(Span::Text(text.to_owned()));
            }
        }
    }

    fn process(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.push_text(&text),
            // Raw HTML degrades to plain text; it is escaped at render time.
            Event::Html(html) | Event::InlineHtml(html) => self.push_text(&html),
            Event::Code(code) => {
                if let Some(frame) = self.spans.last_mut() {
                    frame.children.push(Span::Code(code.to_string()));
                } else {
                    let block = Block::Paragraph(vec![Span::Code(code.to_string())]);
                    self.blocks().push(block);
                }
            }
            Event::SoftBreak => {
                if self.code.is_some() {
                    self.push_text("\n");
                } else {
                    self.push_text(" ");
                }
            }
            Event::HardBreak => self.push_text("\n"),
            Event::Rule => self.blocks().push(Block::Rule),
            Event::TaskListMarker(_)
            | Event::FootnoteReference(_)
            | Event::InlineMath(_)
            | Event::DisplayMath(_) => {}
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.push_root_frame(),
            Tag::Heading { level, .. } => {
                self.heading = Some(heading_level(level));
                self.push_root_frame();
            }
            Tag::BlockQuote(_) => self.frames.push(Vec::new()),
            Tag::CodeBlock(kind) => {
                let language = match kind {
                    CodeBlockKind::Fenced(info) => fence_language(&info),
                    CodeBlockKind::Indented => None,
                };
                self.code = Some((language, String::new()));
            }
            Tag::List(start) => match self.list.as_mut() {
                // Nested list: flatten into the outer one.
                Some(ctx) => ctx.depth += 1,
                None => {
                    self.list = Some(ListCtx {
                        ordered: start.is_some(),
                        items: Vec::new(),
                        depth: 0,
                    });
                }
            },
            Tag::Item => self.push_root_frame(),
            Tag::Table(_) => self.table = Some(TableCtx::default()),
            Tag::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.in_head = true;
                }
            }
            Tag::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    table.current_row.clear();
                }
            }
            Tag::TableCell => self.push_root_frame(),
            Tag::Emphasis => self.spans.push(SpanFrame {
                kind: FrameKind::Emphasis,
                children: Vec::new(),
            }),
            Tag::Strong => self.spans.push(SpanFrame {
                kind: FrameKind::Strong,
                children: Vec::new(),
            }),
            Tag::Link { dest_url, .. } => self.spans.push(SpanFrame {
                kind: FrameKind::Link(dest_url.to_string()),
                children: Vec::new(),
            }),
            Tag::Image { dest_url, .. } => self.spans.push(SpanFrame {
                kind: FrameKind::ImageAlt(dest_url.to_string()),
                children: Vec::new(),
            }),
            // Strikethrough/superscript/subscript are disabled by the
            // parser options; definition lists, footnotes, metadata and
            // HTML blocks have no tree counterpart.
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                let spans = self.pop_spans();
                if spans.is_empty() {
                    return;
                }
                // A paragraph inside a list item folds into the item.
                if let Some(frame) = self.spans.last_mut() {
                    if !frame.children.is_empty() {
                        frame.children.push(Span::Text(" ".to_owned()));
                    }
                    frame.children.extend(spans);
                } else {
                    self.blocks().push(Block::Paragraph(spans));
                }
            }
            TagEnd::Heading(_) => {
                let spans = self.pop_spans();
                let level = self.heading.take().unwrap_or(1);
                self.blocks().push(Block::Heading { level, spans });
            }
            TagEnd::BlockQuote(_) => {
                let inner = self.frames.pop().unwrap_or_default();
                self.blocks().push(Block::Blockquote(inner));
            }
            TagEnd::CodeBlock => {
                if let Some((language, mut text)) = self.code.take() {
                    if text.ends_with('\n') {
                        text.pop();
                    }
                    self.blocks().push(Block::CodeFence { language, text });
                }
            }
            TagEnd::List(_) => {
                let done = match self.list.as_mut() {
                    Some(ctx) if ctx.depth > 0 => {
                        ctx.depth -= 1;
                        false
                    }
                    Some(_) => true,
                    None => false,
                };
                if done {
                    if let Some(ctx) = self.list.take() {
                        self.blocks().push(Block::List {
                            ordered: ctx.ordered,
                            items: ctx.items,
                        });
                    }
                }
            }
            TagEnd::Item => {
                let spans = self.pop_spans();
                if let Some(ctx) = self.list.as_mut() {
                    ctx.items.push(spans);
                }
            }
            TagEnd::Table => {
                if let Some(table) = self.table.take() {
                    self.blocks().push(normalize_table(table));
                }
            }
            TagEnd::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.in_head = false;
                }
            }
            TagEnd::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    let row = std::mem::take(&mut table.current_row);
                    table.rows.push(row);
                }
            }
            TagEnd::TableCell => {
                let spans = self.pop_spans();
                if let Some(table) = self.table.as_mut() {
                    if table.in_head {
                        table.header.push(spans);
                    } else {
                        table.current_row.push(spans);
                    }
                }
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Link | TagEnd::Image => {
                self.close_inline_frame();
            }
            _ => {}
        }
    }

    fn close_inline_frame(&mut self) {
        let Some(frame) = self.spans.pop() else {
            return;
        };
        match frame.kind {
            FrameKind::Root => {
                // Unbalanced end tag; restore the frame untouched.
                self.spans.push(frame);
            }
            FrameKind::Emphasis => self.append_span(Span::Emphasis(frame.children)),
            FrameKind::Strong => self.append_span(Span::Strong(frame.children)),
            FrameKind::Link(href) => self.append_span(Span::Link {
                href,
                children: frame.children,
            }),
            FrameKind::ImageAlt(src) => {
                let alt = Span::plain_text(&frame.children);
                self.blocks().push(Block::Image { src, alt });
            }
        }
    }

    fn append_span(&mut self, span: Span) {
        if let Some(frame) = self.spans.last_mut() {
            frame.children.push(span);
        } else {
            self.blocks().push(Block::Paragraph(vec![span]));
        }
    }

    fn finish(mut self) -> Vec<Block> {
        // Flush anything an unterminated document left open.
        if let Some((language, mut text)) = self.code.take() {
            if text.ends_with('\n') {
                text.pop();
            }
            self.blocks().push(Block::CodeFence { language, text });
        }
        if let Some(ctx) = self.list.take() {
            self.blocks().push(Block::List {
                ordered: ctx.ordered,
                items: ctx.items,
            });
        }
        let spans = self.pop_spans();
        if !spans.is_empty() {
            self.blocks().push(Block::Paragraph(spans));
        }
        while self.frames.len() > 1 {
            let inner = self.frames.pop().unwrap_or_default();
            self.blocks().push(Block::Blockquote(inner));
        }
        self.frames.pop().unwrap_or_default()
    }
}

/// First whitespace-delimited token of the fence info string; empty → None.
fn fence_language(info: &str) -> Option<String> {
    let token = info.split_whitespace().next().unwrap_or("");
    if token.is_empty() {
        None
    } else {
        Some(token.to_owned())
    }
}

/// Enforce the header-defines-width policy: rows with fewer cells than the
/// header are padded with empty cells, rows with more are truncated.
fn normalize_table(table: TableCtx) -> Block {
    let width = table.header.len();
    let rows = table
        .rows
        .into_iter()
        .map(|mut row| {
            row.truncate(width);
            while row.len() < width {
                row.push(Vec::new());
            }
            row
        })
        .collect();
    Block::Table {
        header: table.header,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_plain_paragraph_round_trip() {
        let blocks = parse("Just some plain text.");
        assert_eq!(
            blocks,
            vec![Block::Paragraph(vec![Span::Text(
                "Just some plain text.".to_owned()
            )])]
        );
    }

    #[test]
    fn test_heading_levels() {
        let blocks = parse("# One\n\n###### Six");
        assert_eq!(
            blocks,
            vec![
                Block::Heading {
                    level: 1,
                    spans: vec![Span::Text("One".to_owned())],
                },
                Block::Heading {
                    level: 6,
                    spans: vec![Span::Text("Six".to_owned())],
                },
            ]
        );
    }

    #[test]
    fn test_inline_spans() {
        let blocks = parse("*em* **strong** `code` [link](/there)");
        let Block::Paragraph(spans) = &blocks[0] else {
            panic!("expected paragraph");
        };
        assert!(spans.contains(&Span::Emphasis(vec![Span::Text("em".to_owned())])));
        assert!(spans.contains(&Span::Strong(vec![Span::Text("strong".to_owned())])));
        assert!(spans.contains(&Span::Code("code".to_owned())));
        assert!(spans.contains(&Span::Link {
            href: "/there".to_owned(),
            children: vec![Span::Text("link".to_owned())],
        }));
    }

    #[test]
    fn test_unordered_and_ordered_lists() {
        let blocks = parse("- a\n- b\n\n1. x\n2. y");
        assert_eq!(blocks.len(), 2);
        assert_eq!(
            blocks[0],
            Block::List {
                ordered: false,
                items: vec![
                    vec![Span::Text("a".to_owned())],
                    vec![Span::Text("b".to_owned())],
                ],
            }
        );
        assert!(matches!(&blocks[1], Block::List { ordered: true, items } if items.len() == 2));
    }

    #[test]
    fn test_nested_list_is_flattened() {
        let blocks = parse("- outer\n  - inner\n- last");
        let Block::List { ordered, items } = &blocks[0] else {
            panic!("expected list");
        };
        assert!(!ordered);
        // One level only; every nested item becomes a top-level item.
        let texts: Vec<_> = items.iter().map(|i| Span::plain_text(i)).collect();
        assert!(texts.contains(&"outer".to_owned()));
        assert!(texts.contains(&"inner".to_owned()));
        assert!(texts.contains(&"last".to_owned()));
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn test_code_fence_language_and_newline_strip() {
        let blocks = parse("```rust\nfn main() {}\n```");
        assert_eq!(
            blocks,
            vec![Block::CodeFence {
                language: Some("rust".to_owned()),
                text: "fn main() {}".to_owned(),
            }]
        );
    }

    #[test]
    fn test_code_fence_without_language() {
        let blocks = parse("```\nplain\n```");
        assert_eq!(
            blocks,
            vec![Block::CodeFence {
                language: None,
                text: "plain".to_owned(),
            }]
        );
    }

    #[test]
    fn test_unterminated_fence_does_not_panic() {
        let blocks = parse("```mermaid\ngraph TD\nA --> B");
        assert_eq!(blocks.len(), 1);
        assert!(matches!(&blocks[0], Block::CodeFence { language: Some(l), .. } if l == "mermaid"));
    }

    #[test]
    fn test_table_row_padding() {
        let blocks = parse("| A | B | C |\n|---|---|---|\n| 1 | 2 |");
        let Block::Table { header, rows } = &blocks[0] else {
            panic!("expected table");
        };
        assert_eq!(header.len(), 3);
        assert_eq!(rows[0].len(), 3);
        assert!(rows[0][2].is_empty());
    }

    #[test]
    fn test_table_row_truncation() {
        let blocks = parse("| A | B | C |\n|---|---|---|\n| 1 | 2 | 3 | 4 |");
        let Block::Table { header, rows } = &blocks[0] else {
            panic!("expected table");
        };
        assert_eq!(header.len(), 3);
        assert_eq!(rows[0].len(), 3);
        assert_eq!(rows[0][2], vec![Span::Text("3".to_owned())]);
    }

    #[test]
    fn test_blockquote_nesting() {
        let blocks = parse("> quoted text");
        assert_eq!(
            blocks,
            vec![Block::Blockquote(vec![Block::Paragraph(vec![Span::Text(
                "quoted text".to_owned()
            )])])]
        );
    }

    #[test]
    fn test_image_reference() {
        let blocks = parse("![Alt text](image.png)");
        assert!(blocks.contains(&Block::Image {
            src: "image.png".to_owned(),
            alt: "Alt text".to_owned(),
        }));
    }

    #[test]
    fn test_horizontal_rule() {
        assert_eq!(parse("---"), vec![Block::Rule]);
    }

    #[test]
    fn test_raw_html_degrades_to_text() {
        let blocks = parse("<div>widget</div>");
        assert_eq!(blocks.len(), 1);
        let Block::Paragraph(spans) = &blocks[0] else {
            panic!("expected paragraph");
        };
        assert!(Span::plain_text(spans).contains("<div>widget</div>"));
    }

    #[test]
    fn test_parse_never_panics_on_garbage() {
        let hashes = "#".repeat(500);
        let inputs = [
            "",
            "   \n\n\t\n",
            "| broken | table\n|---|\n| a | b | c |",
            "```unterminated",
            "> > > deep\n> quote",
            "[unclosed link(",
            "******",
            "\u{0000}\u{FFFF} mixed \u{202E} controls",
            hashes.as_str(),
        ];
        for input in inputs {
            let _ = parse(input);
        }
    }

    #[test]
    fn test_parse_is_pure() {
        let text = "# Title\n\nBody with `code`.\n\n```mermaid\ngraph TD\nA --> B\n```";
        assert_eq!(parse(text), parse(text));
    }
}
