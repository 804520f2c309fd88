//! Flowchart source parsing.
//!
//! A minimal, deterministic parser for `graph` / `flowchart` blocks:
//! direction header, node declarations with bracket shapes, and edge
//! statements including chains (`A --> B --> C`) and `|label|` edge labels.
//! Anything outside this subset is a parse error; the processor turns that
//! into an error placeholder instead of failing the page.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Diagram rendering failure.
#[derive(Debug, Error)]
pub enum DiagramError {
    /// The fence body was empty or whitespace.
    #[error("empty diagram source")]
    Empty,
    /// The header names a diagram type this engine does not draw.
    #[error("unsupported diagram type '{0}'")]
    UnsupportedType(String),
    /// Header direction token was not TB/TD/BT/LR/RL.
    #[error("unknown direction '{0}'")]
    Direction(String),
    /// A statement line did not parse as a node or edge.
    #[error("line {line}: cannot parse statement '{text}'")]
    Statement {
        /// 1-based source line.
        line: usize,
        /// The offending statement.
        text: String,
    },
    /// SVG post-processing failed.
    #[error("svg normalization failed: {0}")]
    Svg(String),
}

/// Flow direction from the diagram header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// `TB` / `TD`
    TopDown,
    /// `BT`
    BottomTop,
    /// `LR`
    LeftRight,
    /// `RL`
    RightLeft,
}

impl Direction {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "TB" | "TD" => Some(Self::TopDown),
            "BT" => Some(Self::BottomTop),
            "LR" => Some(Self::LeftRight),
            "RL" => Some(Self::RightLeft),
            _ => None,
        }
    }

    /// True when layers advance along the horizontal axis.
    #[must_use]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::LeftRight | Self::RightLeft)
    }

    /// True when layer order is reversed relative to reading order.
    #[must_use]
    pub fn is_reversed(self) -> bool {
        matches!(self, Self::BottomTop | Self::RightLeft)
    }
}

/// Node shape from the bracket syntax.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeShape {
    /// `[text]`
    Rect,
    /// `(text)`
    Rounded,
    /// `([text])`
    Stadium,
    /// `{text}`
    Diamond,
    /// `((text))`
    Circle,
}

/// One declared or implied node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlowNode {
    /// Stable identifier from the source.
    pub id: String,
    /// Display label; defaults to the id.
    pub label: String,
    /// Shape from the bracket syntax.
    pub shape: NodeShape,
}

/// One edge between nodes, by index into [`Flowchart::nodes`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlowEdge {
    /// Source node index.
    pub from: usize,
    /// Target node index.
    pub to: usize,
    /// Optional `|label|` text.
    pub label: Option<String>,
    /// False for open links (`---`), true for arrows.
    pub arrow: bool,
}

/// Parsed flowchart: nodes in declaration order plus the edge list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Flowchart {
    /// Flow direction.
    pub direction: Direction,
    /// Nodes in first-appearance order.
    pub nodes: Vec<FlowNode>,
    /// Edges in source order.
    pub edges: Vec<FlowEdge>,
}

fn arrow_regex() -> &'static Regex {
    static ARROW: OnceLock<Regex> = OnceLock::new();
    ARROW.get_or_init(|| {
        Regex::new(r"\s*(-->|-\.->|==>|---)\s*(?:\|([^|]*)\|\s*)?").expect("arrow pattern is valid")
    })
}

/// Parse flowchart source.
pub fn parse(source: &str) -> Result<Flowchart, DiagramError> {
    let mut lines = source
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty() && !l.starts_with("%%"));

    let Some((_, header)) = lines.next() else {
        return Err(DiagramError::Empty);
    };

    let direction = parse_header(header)?;
    let mut chart = ChartBuilder {
        direction,
        nodes: Vec::new(),
        edges: Vec::new(),
        index: HashMap::new(),
    };

    for (line, text) in lines {
        chart.statement(line, text)?;
    }

    Ok(Flowchart {
        direction: chart.direction,
        nodes: chart.nodes,
        edges: chart.edges,
    })
}

fn parse_header(header: &str) -> Result<Direction, DiagramError> {
    let mut tokens = header.split_whitespace();
    let kind = tokens.next().unwrap_or("");
    if kind != "graph" && kind != "flowchart" {
        return Err(DiagramError::UnsupportedType(kind.to_owned()));
    }
    match tokens.next() {
        None => Ok(Direction::TopDown),
        Some(token) => {
            Direction::parse(token).ok_or_else(|| DiagramError::Direction(token.to_owned()))
        }
    }
}

struct ChartBuilder {
    direction: Direction,
    nodes: Vec<FlowNode>,
    edges: Vec<FlowEdge>,
    index: HashMap<String, usize>,
}

impl ChartBuilder {
    fn statement(&mut self, line: usize, text: &str) -> Result<(), DiagramError> {
        let bad = || DiagramError::Statement {
            line,
            text: text.to_owned(),
        };

        let arrows: Vec<_> = arrow_regex().captures_iter(text).collect();
        if arrows.is_empty() {
            // Standalone node declaration.
            let node = parse_node_spec(text).ok_or_else(bad)?;
            self.intern(node);
            return Ok(());
        }

        // Edge chain: segments between arrow matches are node specs.
        let mut segments = Vec::with_capacity(arrows.len() + 1);
        let mut cursor = 0;
        for capture in &arrows {
            let matched = capture.get(0).ok_or_else(bad)?;
            segments.push(&text[cursor..matched.start()]);
            cursor = matched.end();
        }
        segments.push(&text[cursor..]);

        let mut indices = Vec::with_capacity(segments.len());
        for segment in &segments {
            let node = parse_node_spec(segment).ok_or_else(bad)?;
            indices.push(self.intern(node));
        }

        for (i, capture) in arrows.iter().enumerate() {
            let arrow = capture.get(1).map_or("-->", |m| m.as_str()) != "---";
            let label = capture
                .get(2)
                .map(|m| m.as_str().trim().to_owned())
                .filter(|l| !l.is_empty());
            self.edges.push(FlowEdge {
                from: indices[i],
                to: indices[i + 1],
                label,
                arrow,
            });
        }
        Ok(())
    }

    fn intern(&mut self, node: FlowNode) -> usize {
        if let Some(&index) = self.index.get(&node.id) {
            // A later declaration with a label/shape refines the node.
            if node.label != node.id || node.shape != NodeShape::Rect {
                self.nodes[index].label = node.label;
                self.nodes[index].shape = node.shape;
            }
            return index;
        }
        let index = self.nodes.len();
        self.index.insert(node.id.clone(), index);
        self.nodes.push(node);
        index
    }
}

/// Parse `id`, `id[label]`, `id(label)`, `id([label])`, `id{label}`,
/// `id((label))`.
fn parse_node_spec(text: &str) -> Option<FlowNode> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let bracket = text.find(['[', '(', '{']);
    let (id, rest) = match bracket {
        Some(pos) => (&text[..pos], &text[pos..]),
        None => (text, ""),
    };
    let id = id.trim();
    if id.is_empty() || id.contains(char::is_whitespace) {
        return None;
    }

    if rest.is_empty() {
        return Some(FlowNode {
            id: id.to_owned(),
            label: id.to_owned(),
            shape: NodeShape::Rect,
        });
    }

    let (label, shape) = parse_bracket_shape(rest)?;
    Some(FlowNode {
        id: id.to_owned(),
        label: if label.is_empty() { id.to_owned() } else { label },
        shape,
    })
}

/// Detect the shape from the bracket syntax and extract the label.
fn parse_bracket_shape(text: &str) -> Option<(String, NodeShape)> {
    let delimited = |open: &str, close: &str| -> Option<String> {
        text.strip_prefix(open)?
            .strip_suffix(close)
            .map(|inner| normalize_ws(inner.trim()))
    };

    // Double delimiters before single ones.
    if let Some(label) = delimited("((", "))") {
        return Some((label, NodeShape::Circle));
    }
    if let Some(label) = delimited("([", "])") {
        return Some((label, NodeShape::Stadium));
    }
    if let Some(label) = delimited("[", "]") {
        return Some((label, NodeShape::Rect));
    }
    if let Some(label) = delimited("(", ")") {
        return Some((label, NodeShape::Rounded));
    }
    if let Some(label) = delimited("{", "}") {
        return Some((label, NodeShape::Diamond));
    }
    None
}

fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
