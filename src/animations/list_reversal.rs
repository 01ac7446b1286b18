use super::Frame;
use crate::draw::{self, ListLayout, ListPointers};
use crate::render::{LOGICAL_HEIGHT, LOGICAL_WIDTH, Surface};

const NODES: [i32; 5] = [1, 2, 3, 4, 5];
/// Store next, flip the link, advance.
const SUB_STEPS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reversal {
    Original,
    /// Working on node `index`; `sub_step` is 0, 1 or 2
    Flipping {
        index: usize,
        sub_step: usize,
        pointers: ListPointers,
    },
    Complete,
}

/// Position in the reversal of a list of `len` nodes after `step` ticks.
pub fn reversal(len: usize, step: usize) -> Reversal {
    if step == 0 {
        return Reversal::Original;
    }
    let index = (step - 1) / SUB_STEPS;
    let sub_step = (step - 1) % SUB_STEPS;
    if index >= len {
        return Reversal::Complete;
    }
    let mut pointers = ListPointers {
        prev: index.checked_sub(1),
        current: Some(index),
        next: (index + 1 < len).then_some(index + 1),
    };
    match sub_step {
        0 => {}
        1 => pointers.next = None,
        _ => {
            pointers.prev = Some(index);
            pointers.current = (index + 1 < len).then_some(index + 1);
        }
    }
    Reversal::Flipping {
        index,
        sub_step,
        pointers,
    }
}

fn name(index: Option<usize>) -> String {
    index.map_or_else(|| "null".to_string(), |i| NODES[i].to_string())
}

pub fn simulate(surface: &mut dyn Surface, step: usize) -> Frame {
    surface.clear();
    let layout = ListLayout {
        spacing: LOGICAL_WIDTH / (NODES.len() + 1) as f64,
        y: LOGICAL_HEIGHT / 2.0,
        radius: 20.0,
    };

    let description = match reversal(NODES.len(), step) {
        Reversal::Original => {
            draw::draw_linked_list(surface, &layout, &NODES, &ListPointers::default());
            "Original linked list".to_string()
        }
        Reversal::Complete => {
            let mut reversed = NODES;
            reversed.reverse();
            draw::draw_linked_list(surface, &layout, &reversed, &ListPointers::default());
            "Reversal complete".to_string()
        }
        Reversal::Flipping {
            index,
            sub_step,
            pointers,
        } => {
            draw::draw_partially_reversed_list(surface, &layout, &NODES, index, &pointers, sub_step);
            match sub_step {
                0 => format!("Step 1: Store next pointer (node {})", name(pointers.next)),
                1 => format!(
                    "Step 2: Point current node {} to previous node {}",
                    NODES[index],
                    name(pointers.prev)
                ),
                _ => "Step 3: Move prev and current pointers forward".to_string(),
            }
        }
    };
    Frame::describe(description)
}
