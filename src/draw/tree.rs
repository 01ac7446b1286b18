use crate::render::{Rgba, Shape, Surface};

use super::{CellState, PRIMARY, SECONDARY, draw_node};

pub const NODE_RADIUS: f64 = 20.0;
const LEVEL_HEIGHT: f64 = 60.0;

/// Where the root of the sample trees is drawn and how far apart its
/// children are. Spacing halves on every level below.
pub const ROOT: (f64, f64) = (300.0, 50.0);
pub const ROOT_SPACING: f64 = 160.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub value: i32,
    pub left: Option<Box<TreeNode>>,
    pub right: Option<Box<TreeNode>>,
}

impl TreeNode {
    /// Builds a complete binary tree from level-order values.
    pub fn complete(values: &[i32]) -> Option<Box<TreeNode>> {
        fn build(values: &[i32], index: usize) -> Option<Box<TreeNode>> {
            let value = *values.get(index)?;
            Some(Box::new(TreeNode {
                value,
                left: build(values, 2 * index + 1),
                right: build(values, 2 * index + 2),
            }))
        }
        build(values, 0)
    }

    pub fn children(&self) -> impl DoubleEndedIterator<Item = &TreeNode> {
        self.left.iter().chain(self.right.iter()).map(|b| b.as_ref())
    }
}

/// Calls `visit(node, x, y, parent_xy)` for every node in preorder, using
/// the halving-spacing layout.
fn walk(
    node: &TreeNode,
    x: f64,
    y: f64,
    spacing: f64,
    parent: Option<(f64, f64)>,
    visit: &mut dyn FnMut(&TreeNode, f64, f64, Option<(f64, f64)>),
) {
    visit(node, x, y, parent);
    let half = spacing / 2.0;
    if let Some(left) = &node.left {
        walk(left, x - half, y + LEVEL_HEIGHT, half, Some((x, y)), visit);
    }
    if let Some(right) = &node.right {
        walk(right, x + half, y + LEVEL_HEIGHT, half, Some((x, y)), visit);
    }
}

/// Draws every node in the default style, edges first so nodes cover them.
pub fn draw_tree(surface: &mut dyn Surface, root: &TreeNode, x: f64, y: f64, spacing: f64) {
    let offset = NODE_RADIUS / 2.0;
    walk(root, x, y, spacing, None, &mut |_, cx, cy, parent| {
        if let Some((px, py)) = parent {
            let dir = if cx < px { -1.0 } else { 1.0 };
            surface.draw(Shape::Line {
                from: (px + dir * offset, py + offset),
                to: (cx - dir * offset, cy - offset),
                color: PRIMARY,
                line_width: 1.0,
            });
        }
    });
    walk(root, x, y, spacing, None, &mut |node, cx, cy, _| {
        draw_node(surface, cx, cy, NODE_RADIUS, &node.value.to_string(), CellState::Default);
    });
}

/// Rings visited nodes in green and frontier nodes in `frontier_color`.
/// A node in both sets counts as visited.
pub fn highlight_tree(
    surface: &mut dyn Surface,
    root: &TreeNode,
    (x, y, spacing): (f64, f64, f64),
    visited: &[i32],
    frontier: &[i32],
    frontier_color: Rgba,
) {
    walk(root, x, y, spacing, None, &mut |node, cx, cy, _| {
        let color = if visited.contains(&node.value) {
            SECONDARY
        } else if frontier.contains(&node.value) {
            frontier_color
        } else {
            return;
        };
        surface.draw(Shape::FillCircle {
            cx,
            cy,
            radius: NODE_RADIUS + 4.0,
            color: color.with_alpha(0.3),
        });
        surface.draw(Shape::StrokeCircle {
            cx,
            cy,
            radius: NODE_RADIUS + 4.0,
            color,
            line_width: 2.0,
        });
    });
}
