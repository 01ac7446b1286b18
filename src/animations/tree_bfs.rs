use std::collections::VecDeque;

use super::Frame;
use crate::draw::PRIMARY;
use crate::draw::tree::{self, ROOT, ROOT_SPACING, TreeNode};
use crate::render::Surface;

pub(crate) const SAMPLE: [i32; 7] = [1, 2, 3, 4, 5, 6, 7];

/// Visit order and queue contents after dequeuing `step` nodes.
pub fn level_order(root: &TreeNode, step: usize) -> (Vec<i32>, Vec<i32>) {
    let mut queue: VecDeque<&TreeNode> = VecDeque::from([root]);
    let mut visited = Vec::new();
    for _ in 0..step {
        let Some(node) = queue.pop_front() else {
            break;
        };
        visited.push(node.value);
        queue.extend(node.children());
    }
    (visited, queue.iter().map(|n| n.value).collect())
}

pub(crate) fn join(values: &[i32], sep: &str) -> String {
    values
        .iter()
        .map(i32::to_string)
        .collect::<Vec<_>>()
        .join(sep)
}

pub fn simulate(surface: &mut dyn Surface, step: usize) -> Frame {
    surface.clear();
    let Some(root) = TreeNode::complete(&SAMPLE) else {
        return Frame::Finished;
    };
    tree::draw_tree(surface, &root, ROOT.0, ROOT.1, ROOT_SPACING);

    let (visited, queue) = level_order(&root, step);
    if step > 0 {
        tree::highlight_tree(
            surface,
            &root,
            (ROOT.0, ROOT.1, ROOT_SPACING),
            &visited,
            &queue,
            PRIMARY,
        );
    }

    let description = if step == 0 {
        "Initial tree, BFS starts at root".to_string()
    } else if queue.is_empty() {
        format!("BFS traversal complete: {}", join(&visited, " → "))
    } else {
        format!(
            "Visited: [{}], Queue: [{}]",
            join(&visited, ", "),
            join(&queue, ", ")
        )
    };
    Frame::describe(description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingSurface;

    fn text(step: usize) -> String {
        let mut s = RecordingSurface::new();
        simulate(&mut s, step).description().unwrap_or_default().to_string()
    }

    #[test]
    fn test_queue_grows_level_by_level() {
        assert_eq!(text(0), "Initial tree, BFS starts at root");
        assert_eq!(text(1), "Visited: [1], Queue: [2, 3]");
        assert_eq!(text(2), "Visited: [1, 2], Queue: [3, 4, 5]");
        assert_eq!(text(4), "Visited: [1, 2, 3, 4], Queue: [5, 6, 7]");
    }

    #[test]
    fn test_completion_is_steady() {
        let done = "BFS traversal complete: 1 → 2 → 3 → 4 → 5 → 6 → 7";
        assert_eq!(text(7), done);
        assert_eq!(text(50), done);
    }
}
