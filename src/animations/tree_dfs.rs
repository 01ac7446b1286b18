use super::Frame;
use super::tree_bfs::{SAMPLE, join};
use crate::draw::HIGHLIGHT;
use crate::draw::tree::{self, ROOT, ROOT_SPACING, TreeNode};
use crate::render::Surface;

/// Preorder visit order and stack contents (bottom first) after popping
/// `step` nodes. Right children are pushed before left ones.
pub fn preorder(root: &TreeNode, step: usize) -> (Vec<i32>, Vec<i32>) {
    let mut stack: Vec<&TreeNode> = vec![root];
    let mut visited = Vec::new();
    for _ in 0..step {
        let Some(node) = stack.pop() else {
            break;
        };
        visited.push(node.value);
        stack.extend(node.children().rev());
    }
    (visited, stack.iter().map(|n| n.value).collect())
}

pub fn simulate(surface: &mut dyn Surface, step: usize) -> Frame {
    surface.clear();
    let Some(root) = TreeNode::complete(&SAMPLE) else {
        return Frame::Finished;
    };
    tree::draw_tree(surface, &root, ROOT.0, ROOT.1, ROOT_SPACING);

    let (visited, stack) = preorder(&root, step);
    if step > 0 {
        tree::highlight_tree(
            surface,
            &root,
            (ROOT.0, ROOT.1, ROOT_SPACING),
            &visited,
            &stack,
            HIGHLIGHT,
        );
    }

    let description = if step == 0 {
        "Initial tree, DFS starts at root".to_string()
    } else if stack.is_empty() {
        format!("DFS traversal complete: {}", join(&visited, " → "))
    } else {
        format!(
            "Visited: [{}], Stack: [{}]",
            join(&visited, ", "),
            join(&stack, ", ")
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
    fn test_stack_holds_right_subtree_for_later() {
        assert_eq!(text(0), "Initial tree, DFS starts at root");
        assert_eq!(text(1), "Visited: [1], Stack: [3, 2]");
        assert_eq!(text(2), "Visited: [1, 2], Stack: [3, 5, 4]");
        assert_eq!(text(4), "Visited: [1, 2, 4, 5], Stack: [3]");
    }

    #[test]
    fn test_preorder_completion() {
        let done = "DFS traversal complete: 1 → 2 → 4 → 5 → 3 → 6 → 7";
        assert_eq!(text(7), done);
        assert_eq!(text(8), done);
    }
}
