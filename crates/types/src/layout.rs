//! Node placement for renderers.
//!
//! Renderers draw one icon per node id. This module decides where those icons
//! go; it knows nothing about how they are drawn.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;

/// How nodes are arranged in the viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NodeLayout {
    /// Evenly spaced on a circle, first node at the top, clockwise.
    #[default]
    Circle,
    /// One horizontal row. Not implemented.
    Row,
    /// One vertical column. Not implemented.
    Column,
}

impl fmt::Display for NodeLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeLayout::Circle => "circle",
            NodeLayout::Row => "row",
            NodeLayout::Column => "column",
        };
        f.write_str(name)
    }
}

/// Errors from [`compute_positions`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// The requested layout has no implementation.
    #[error("layout {0} is not supported")]
    Unsupported(NodeLayout),
}

/// Drawing area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Width of the drawing area.
    pub width: u32,
    /// Height of the drawing area.
    pub height: u32,
}

impl Viewport {
    /// Create a new viewport.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Size of one (square) node icon: an eighth of the viewport height.
    pub fn icon_size(&self) -> (u32, u32) {
        let side = self.height / 8;
        (side, side)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(960, 540)
    }
}

/// Top-left corner of a node icon.
#[derive(Debug, Clone, PartialEq)]
pub struct NodePosition {
    /// Node the icon belongs to.
    pub node_id: String,
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate (grows downwards).
    pub y: f64,
}

/// Order node ids for display.
///
/// Ids that are all decimal digits are sorted numerically (`"2"` before
/// `"10"`); any non-numeric id makes the whole set sort lexicographically.
pub fn display_order(node_ids: &BTreeSet<String>) -> Vec<&str> {
    let mut ids: Vec<&str> = node_ids.iter().map(String::as_str).collect();
    let numeric = ids
        .iter()
        .all(|id| !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()));
    if numeric {
        ids.sort_by(|a, b| compare_numeric(a, b));
    }
    ids
}

fn compare_numeric(a: &str, b: &str) -> Ordering {
    let a_trim = a.trim_start_matches('0');
    let b_trim = b.trim_start_matches('0');
    a_trim
        .len()
        .cmp(&b_trim.len())
        .then_with(|| a_trim.cmp(b_trim))
        .then_with(|| a.cmp(b))
}

/// Compute one icon position per node, in [`display_order`].
///
/// For [`NodeLayout::Circle`] the radius is the largest that keeps icons
/// inside the viewport, and the centre sits half an icon above the middle so
/// the labels under the icons stay visible.
pub fn compute_positions(
    node_ids: &BTreeSet<String>,
    layout: NodeLayout,
    viewport: Viewport,
) -> Result<Vec<NodePosition>, LayoutError> {
    match layout {
        NodeLayout::Circle => Ok(circle_positions(node_ids, viewport)),
        NodeLayout::Row | NodeLayout::Column => Err(LayoutError::Unsupported(layout)),
    }
}

fn circle_positions(node_ids: &BTreeSet<String>, viewport: Viewport) -> Vec<NodePosition> {
    let ordered = display_order(node_ids);
    if ordered.is_empty() {
        return Vec::new();
    }

    let (icon_w, icon_h) = viewport.icon_size();
    let half_w = i64::from(viewport.width / 2);
    let half_h = i64::from(viewport.height / 2);
    let radius = (half_w - i64::from(icon_w))
        .min(half_h - i64::from(icon_h))
        .max(0) as f64;
    let center_x = half_w as f64;
    let center_y = (half_h - i64::from(icon_h / 2)) as f64;
    let angle_delta = 2.0 * PI / ordered.len() as f64;

    ordered
        .into_iter()
        .enumerate()
        .map(|(i, node_id)| {
            let angle = FRAC_PI_2 - angle_delta * i as f64;
            NodePosition {
                node_id: node_id.to_string(),
                x: center_x + angle.cos() * radius,
                y: center_y - angle.sin() * radius,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn assert_close(pos: &NodePosition, x: f64, y: f64) {
        assert!(
            (pos.x - x).abs() < 1e-9 && (pos.y - y).abs() < 1e-9,
            "node {} at ({}, {}), expected ({}, {})",
            pos.node_id,
            pos.x,
            pos.y,
            x,
            y
        );
    }

    #[test]
    fn test_numeric_ids_sort_numerically() {
        let set = ids(&["10", "2", "1"]);
        assert_eq!(display_order(&set), vec!["1", "2", "10"]);
    }

    #[test]
    fn test_mixed_ids_sort_lexicographically() {
        let set = ids(&["10", "2", "a"]);
        assert_eq!(display_order(&set), vec!["10", "2", "a"]);
    }

    #[test]
    fn test_circle_is_clockwise_from_top() {
        let set = ids(&["1", "2", "3", "4"]);
        let positions = compute_positions(&set, NodeLayout::Circle, Viewport::new(800, 800))
            .unwrap();

        // icon 100x100, radius min(400 - 100, 400 - 100) = 300, centre (400, 350)
        assert_eq!(positions.len(), 4);
        assert_close(&positions[0], 400.0, 50.0);
        assert_close(&positions[1], 700.0, 350.0);
        assert_close(&positions[2], 400.0, 650.0);
        assert_close(&positions[3], 100.0, 350.0);
        assert_eq!(positions[1].node_id, "2");
    }

    #[test]
    fn test_circle_deterministic() {
        let set = ids(&["a", "b", "c"]);
        let viewport = Viewport::new(1024, 768);
        assert_eq!(
            compute_positions(&set, NodeLayout::Circle, viewport),
            compute_positions(&set, NodeLayout::Circle, viewport)
        );
    }

    #[test]
    fn test_single_node_sits_on_top() {
        let set = ids(&["only"]);
        let positions = compute_positions(&set, NodeLayout::Circle, Viewport::new(800, 800))
            .unwrap();
        assert_close(&positions[0], 400.0, 50.0);
    }

    #[test]
    fn test_empty_set() {
        let positions =
            compute_positions(&BTreeSet::new(), NodeLayout::Circle, Viewport::default()).unwrap();
        assert!(positions.is_empty());
    }

    #[test]
    fn test_row_and_column_unsupported() {
        let set = ids(&["1"]);
        assert_eq!(
            compute_positions(&set, NodeLayout::Row, Viewport::default()),
            Err(LayoutError::Unsupported(NodeLayout::Row))
        );
        assert_eq!(
            compute_positions(&set, NodeLayout::Column, Viewport::default()),
            Err(LayoutError::Unsupported(NodeLayout::Column))
        );
    }
}
