//! Flowchart diagram rendering for `mermaid` code fences.
//!
//! This crate draws a deterministic subset of the flowchart dialect
//! (`graph` / `flowchart` headers, bracket-shaped nodes, labeled edges) as
//! inline SVG. It plugs into the renderer as a [`FenceProcessor`]:
//!
//! ```
//! use folio_diagrams::DiagramProcessor;
//! use folio_renderer::{parse, BlockRenderer};
//!
//! let mut renderer = BlockRenderer::new().with_processor(DiagramProcessor::new());
//! let units = renderer.render(&parse("```mermaid\ngraph TD\nA --> B\n```"));
//! assert!(units[0].html.contains("<svg"));
//! ```
//!
//! Unsupported dialects and parse errors degrade to an error placeholder
//! figure; a diagram can never take the page down with it.
//!
//! [`FenceProcessor`]: folio_renderer::FenceProcessor

mod flowchart;
mod layout;
mod processor;
mod svg;
mod theme;

pub use flowchart::{parse as parse_flowchart, DiagramError, Direction, FlowEdge, FlowNode, Flowchart, NodeShape};
pub use layout::{layout, Layout, PlacedNode};
pub use processor::{render_diagram, DiagramProcessor};
pub use svg::{emit, normalize, sanitize_svg_id};
pub use theme::{init_theme, theme, DiagramTheme};
