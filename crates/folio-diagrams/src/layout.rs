//! Layered layout for parsed flowcharts.
//!
//! Nodes are assigned to layers by longest path from the roots, then placed
//! on a grid: layers advance along the flow axis, nodes within a layer are
//! centered on the cross axis. Spacing matches the site's compact diagram
//! settings.

use crate::flowchart::{Flowchart, NodeShape};

const NODE_SPACING: f64 = 30.0;
const RANK_SPACING: f64 = 40.0;
const NODE_HEIGHT: f64 = 36.0;
const MIN_NODE_WIDTH: f64 = 60.0;
const CHAR_WIDTH: f64 = 7.2;
const LABEL_PADDING: f64 = 24.0;
const MARGIN: f64 = 16.0;

/// A node with its assigned box, in SVG coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedNode {
    /// Index into [`Flowchart::nodes`].
    pub node: usize,
    /// Box center, x.
    pub cx: f64,
    /// Box center, y.
    pub cy: f64,
    /// Box width.
    pub width: f64,
    /// Box height.
    pub height: f64,
}

/// Completed layout: placed nodes plus the canvas size.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    /// One entry per flowchart node, same order.
    pub nodes: Vec<PlacedNode>,
    /// Canvas width.
    pub width: f64,
    /// Canvas height.
    pub height: f64,
}

impl Layout {
    /// The placed box for a flowchart node index.
    #[must_use]
    pub fn placed(&self, node: usize) -> &PlacedNode {
        &self.nodes[node]
    }
}

/// Compute the layout for a parsed flowchart.
#[must_use]
pub fn layout(chart: &Flowchart) -> Layout {
    let layers = assign_layers(chart);
    let layer_count = layers.iter().copied().max().map_or(1, |m| m + 1);

    // Group node indices by layer, preserving declaration order.
    let mut grouped: Vec<Vec<usize>> = vec![Vec::new(); layer_count];
    for (node, &layer) in layers.iter().enumerate() {
        grouped[layer].push(node);
    }
    if chart.direction.is_reversed() {
        grouped.reverse();
    }

    let sizes: Vec<(f64, f64)> = chart.nodes.iter().map(|n| node_size(&n.label, n.shape)).collect();

    // Extent of each layer along the cross axis.
    let cross_extent = |nodes: &[usize]| -> f64 {
        let boxes: f64 = nodes.iter().map(|&n| cross_size(sizes[n], chart)).sum();
        boxes + NODE_SPACING * (nodes.len().saturating_sub(1)) as f64
    };
    let max_cross = grouped
        .iter()
        .map(|l| cross_extent(l))
        .fold(0.0_f64, f64::max);

    let mut placed = vec![
        PlacedNode {
            node: 0,
            cx: 0.0,
            cy: 0.0,
            width: 0.0,
            height: 0.0,
        };
        chart.nodes.len()
    ];

    let mut flow_cursor = MARGIN;
    for layer_nodes in &grouped {
        let layer_thickness = layer_nodes
            .iter()
            .map(|&n| flow_size(sizes[n], chart))
            .fold(0.0_f64, f64::max);
        let mut cross_cursor = MARGIN + (max_cross - cross_extent(layer_nodes)) / 2.0;

        for &node in layer_nodes {
            let (width, height) = sizes[node];
            let flow_center = flow_cursor + layer_thickness / 2.0;
            let cross_center = cross_cursor + cross_size(sizes[node], chart) / 2.0;
            let (cx, cy) = if chart.direction.is_horizontal() {
                (flow_center, cross_center)
            } else {
                (cross_center, flow_center)
            };
            placed[node] = PlacedNode {
                node,
                cx,
                cy,
                width,
                height,
            };
            cross_cursor += cross_size(sizes[node], chart) + NODE_SPACING;
        }
        flow_cursor += layer_thickness + RANK_SPACING;
    }
    // Remove the trailing rank gap, keep the margin.
    let flow_extent = flow_cursor - RANK_SPACING + MARGIN;
    let cross_total = max_cross + 2.0 * MARGIN;

    let (width, height) = if chart.direction.is_horizontal() {
        (flow_extent, cross_total)
    } else {
        (cross_total, flow_extent)
    };

    Layout {
        nodes: placed,
        width,
        height,
    }
}

fn cross_size(size: (f64, f64), chart: &Flowchart) -> f64 {
    if chart.direction.is_horizontal() {
        size.1
    } else {
        size.0
    }
}

fn flow_size(size: (f64, f64), chart: &Flowchart) -> f64 {
    if chart.direction.is_horizontal() {
        size.0
    } else {
        size.1
    }
}

fn node_size(label: &str, shape: NodeShape) -> (f64, f64) {
    let text_width = label.chars().count() as f64 * CHAR_WIDTH;
    let width = (text_width + LABEL_PADDING).max(MIN_NODE_WIDTH);
    match shape {
        // Diamonds need extra room so the label fits inside the rotated box.
        NodeShape::Diamond => (width * 1.5, NODE_HEIGHT * 1.6),
        NodeShape::Circle => {
            let side = width.max(NODE_HEIGHT);
            (side, side)
        }
        NodeShape::Rect | NodeShape::Rounded | NodeShape::Stadium => (width, NODE_HEIGHT),
    }
}

/// Longest-path layering. Cycles are broken by giving up on nodes that
/// never settle and keeping their last assignment.
fn assign_layers(chart: &Flowchart) -> Vec<usize> {
    let mut layers = vec![0usize; chart.nodes.len()];
    // Bounded relaxation; |V| rounds suffice for any acyclic graph.
    for _ in 0..chart.nodes.len().max(1) {
        let mut changed = false;
        for edge in &chart.edges {
            if edge.from == edge.to {
                continue;
            }
            let want = layers[edge.from] + 1;
            if layers[edge.to] < want {
                layers[edge.to] = want;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    layers
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::flowchart::parse;

    use super::*;

    #[test]
    fn test_layers_follow_edges() {
        let chart = parse("graph TD\nA --> B --> C").expect("parses");
        let layout = layout(&chart);
        assert!(layout.placed(0).cy < layout.placed(1).cy);
        assert!(layout.placed(1).cy < layout.placed(2).cy);
        // Single chain: all nodes share the cross-axis center.
        assert_eq!(layout.placed(0).cx, layout.placed(1).cx);
    }

    #[test]
    fn test_horizontal_direction_advances_x() {
        let chart = parse("graph LR\nA --> B").expect("parses");
        let layout = layout(&chart);
        assert!(layout.placed(0).cx < layout.placed(1).cx);
        assert_eq!(layout.placed(0).cy, layout.placed(1).cy);
    }

    #[test]
    fn test_reversed_direction_flips_order() {
        let chart = parse("graph BT\nA --> B").expect("parses");
        let layout = layout(&chart);
        assert!(layout.placed(0).cy > layout.placed(1).cy);
    }

    #[test]
    fn test_siblings_share_a_layer() {
        let chart = parse("graph TD\nA --> B\nA --> C").expect("parses");
        let layout = layout(&chart);
        assert_eq!(layout.placed(1).cy, layout.placed(2).cy);
        assert!(layout.placed(1).cx < layout.placed(2).cx);
    }

    #[test]
    fn test_longest_path_wins() {
        // A->B->C and A->C: C must sit below B, not beside it.
        let chart = parse("graph TD\nA --> B --> C\nA --> C").expect("parses");
        let layout = layout(&chart);
        assert!(layout.placed(2).cy > layout.placed(1).cy);
    }

    #[test]
    fn test_cycle_terminates() {
        let chart = parse("graph TD\nA --> B\nB --> A").expect("parses");
        let layout = layout(&chart);
        assert!(layout.width > 0.0);
        assert!(layout.height > 0.0);
    }

    #[test]
    fn test_wide_labels_grow_the_box() {
        let chart = parse("graph TD\nA[A very long node label indeed]\nB[x]").expect("parses");
        let layout = layout(&chart);
        assert!(layout.placed(0).width > layout.placed(1).width);
        assert_eq!(layout.placed(1).width, 60.0);
    }
}
