//! SVG emission and post-render normalization.
//!
//! [`emit`] draws a laid-out flowchart as standalone SVG markup. [`normalize`]
//! then walks the document with quick-xml and forces the theme's text fill
//! and font onto every `text` and `tspan` element, however deeply nested, so
//! labels stay readable regardless of what the emitter (or a future one)
//! produced.

use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};

use folio_renderer::escape_html;

use crate::flowchart::{DiagramError, FlowEdge, Flowchart, NodeShape};
use crate::layout::{Layout, PlacedNode};
use crate::theme::theme;

/// Render a laid-out flowchart to SVG markup.
///
/// `id` becomes the root element id and prefixes internal defs ids, so
/// multiple diagrams can coexist in one page.
#[must_use]
pub fn emit(chart: &Flowchart, layout: &Layout, id: &str) -> String {
    let theme = theme();
    let width = layout.width;
    let height = layout.height;
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" id="{id}" class="flowchart" role="img" viewBox="0 0 {width:.0} {height:.0}" style="width:100%;height:auto;max-width:100%">"#,
    );

    svg.push_str(&format!(
        r#"<defs><marker id="{id}-arrow" viewBox="0 0 10 10" refX="9" refY="5" markerWidth="7" markerHeight="7" orient="auto-start-reverse"><path d="M 0 0 L 10 5 L 0 10 z" fill="{}"/></marker></defs>"#,
        theme.line_color
    ));
    svg.push_str(&format!(
        r#"<rect x="0" y="0" width="{width:.0}" height="{height:.0}" fill="{}"/>"#,
        theme.background
    ));

    for edge in &chart.edges {
        draw_edge(&mut svg, edge, layout, id);
    }
    for (index, node) in chart.nodes.iter().enumerate() {
        draw_node(&mut svg, layout.placed(index), node.shape, &node.label);
    }

    svg.push_str("</svg>");
    svg
}

fn draw_node(svg: &mut String, placed: &PlacedNode, shape: NodeShape, label: &str) {
    let theme = theme();
    let (cx, cy, w, h) = (placed.cx, placed.cy, placed.width, placed.height);
    let (x, y) = (cx - w / 2.0, cy - h / 2.0);
    let style = format!(
        r#"fill="{}" stroke="{}" stroke-width="1.5""#,
        theme.node_fill, theme.node_border
    );

    match shape {
        NodeShape::Rect => svg.push_str(&format!(
            r#"<rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" {style}/>"#
        )),
        NodeShape::Rounded => svg.push_str(&format!(
            r#"<rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" rx="6" {style}/>"#
        )),
        NodeShape::Stadium => {
            let rx = h / 2.0;
            svg.push_str(&format!(
                r#"<rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" rx="{rx:.1}" {style}/>"#
            ));
        }
        NodeShape::Circle => svg.push_str(&format!(
            r#"<ellipse cx="{cx:.1}" cy="{cy:.1}" rx="{:.1}" ry="{:.1}" {style}/>"#,
            w / 2.0,
            h / 2.0
        )),
        NodeShape::Diamond => svg.push_str(&format!(
            r#"<polygon points="{cx:.1},{y:.1} {:.1},{cy:.1} {cx:.1},{:.1} {x:.1},{cy:.1}" {style}/>"#,
            x + w,
            y + h
        )),
    }

    svg.push_str(&format!(
        r#"<text x="{cx:.1}" y="{cy:.1}" text-anchor="middle" dominant-baseline="central">{}</text>"#,
        escape_html(label)
    ));
}

fn draw_edge(svg: &mut String, edge: &FlowEdge, layout: &Layout, id: &str) {
    let theme = theme();
    let from = layout.placed(edge.from);
    let to = layout.placed(edge.to);

    // Clip the segment between centers at each node's border.
    let (x1, y1) = border_point(from, to.cx, to.cy);
    let (x2, y2) = border_point(to, from.cx, from.cy);

    let marker = if edge.arrow {
        format!(r#" marker-end="url(#{id}-arrow)""#)
    } else {
        String::new()
    };
    svg.push_str(&format!(
        r#"<line x1="{x1:.1}" y1="{y1:.1}" x2="{x2:.1}" y2="{y2:.1}" stroke="{}" stroke-width="1.5"{marker}/>"#,
        theme.line_color
    ));

    if let Some(label) = &edge.label {
        let (mx, my) = ((x1 + x2) / 2.0, (y1 + y2) / 2.0);
        let half_width = label.chars().count() as f64 * 3.6 + 4.0;
        svg.push_str(&format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="16" fill="{}"/>"#,
            mx - half_width,
            my - 8.0,
            half_width * 2.0,
            theme.edge_label_background
        ));
        svg.push_str(&format!(
            r#"<text x="{mx:.1}" y="{my:.1}" text-anchor="middle" dominant-baseline="central">{}</text>"#,
            escape_html(label)
        ));
    }
}

/// Point on the border of `node`'s bounding box along the ray towards
/// `(tx, ty)`. Falls back to the center for degenerate (zero-length) rays.
fn border_point(node: &PlacedNode, tx: f64, ty: f64) -> (f64, f64) {
    let dx = tx - node.cx;
    let dy = ty - node.cy;
    if dx == 0.0 && dy == 0.0 {
        return (node.cx, node.cy);
    }
    let scale_x = if dx == 0.0 {
        f64::INFINITY
    } else {
        (node.width / 2.0) / dx.abs()
    };
    let scale_y = if dy == 0.0 {
        f64::INFINITY
    } else {
        (node.height / 2.0) / dy.abs()
    };
    let t = scale_x.min(scale_y);
    (node.cx + dx * t, node.cy + dy * t)
}

/// Force the theme's text color, font family and size onto every `text` and
/// `tspan` element in the document, at any nesting depth.
pub fn normalize(svg: &str) -> Result<String, DiagramError> {
    let theme = theme();
    let mut reader = Reader::from_str(svg);
    let mut writer = Writer::new(Vec::new());

    loop {
        let event = reader
            .read_event()
            .map_err(|e| DiagramError::Svg(e.to_string()))?;
        let result = match event {
            Event::Eof => break,
            Event::Start(start) if is_text_element(start.name().as_ref()) => {
                writer.write_event(Event::Start(force_text_attrs(&start, theme)?))
            }
            Event::Empty(start) if is_text_element(start.name().as_ref()) => {
                writer.write_event(Event::Empty(force_text_attrs(&start, theme)?))
            }
            other => writer.write_event(other),
        };
        result.map_err(|e| DiagramError::Svg(e.to_string()))?;
    }

    String::from_utf8(writer.into_inner()).map_err(|e| DiagramError::Svg(e.to_string()))
}

fn is_text_element(name: &[u8]) -> bool {
    name == b"text" || name == b"tspan"
}

fn force_text_attrs(
    start: &BytesStart<'_>,
    theme: &crate::theme::DiagramTheme,
) -> Result<BytesStart<'static>, DiagramError> {
    let name = String::from_utf8(start.name().as_ref().to_vec())
        .map_err(|e| DiagramError::Svg(e.to_string()))?;
    let mut element = BytesStart::new(name);

    for attr in start.attributes() {
        let attr = attr.map_err(|e| DiagramError::Svg(e.to_string()))?;
        let key = attr.key.as_ref();
        if matches!(key, b"fill" | b"font-family" | b"font-size" | b"font-weight") {
            continue;
        }
        element.push_attribute((
            String::from_utf8_lossy(key).into_owned().as_str(),
            String::from_utf8_lossy(&attr.value).into_owned().as_str(),
        ));
    }
    element.push_attribute(("fill", theme.text_color.as_str()));
    element.push_attribute(("font-family", theme.font_family.as_str()));
    element.push_attribute(("font-size", format!("{}px", theme.font_size).as_str()));
    element.push_attribute(("font-weight", "400"));
    Ok(element)
}

/// Strip characters that are not safe inside an SVG element id.
#[must_use]
pub fn sanitize_svg_id(id: &str) -> String {
    let sanitized: String = id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();
    if sanitized.is_empty() {
        "diagram".to_owned()
    } else {
        sanitized
    }
}
