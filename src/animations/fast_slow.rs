use super::Frame;
use crate::draw::{self, HIGHLIGHT, ListLayout, ListPointers, PRIMARY, SECONDARY};
use crate::render::{LOGICAL_HEIGHT, LOGICAL_WIDTH, Surface};

const NODES: [i32; 6] = [1, 2, 3, 4, 5, 6];
/// The last node links back to this index.
const CYCLE_START: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Floyd {
    /// Pointers still chasing each other
    Chasing { slow: usize, fast: usize },
    /// Pointers met; `finder` is set once the entry search is running
    Met { slow: usize, fast: usize, finder: Option<usize> },
    /// Entry search converged on `node`
    Entry { slow: usize, fast: usize, node: usize },
}

/// Slow moves one node and fast two per tick, wrapping at `len`. Once they
/// meet, ticks past `len` walk a finder from the head in lock-step with slow.
pub fn floyd(len: usize, step: usize) -> Floyd {
    if len == 0 {
        return Floyd::Chasing { slow: 0, fast: 0 };
    }
    let (mut slow, mut fast) = (0, 0);
    let mut met = false;
    for _ in 0..step {
        slow = (slow + 1) % len;
        fast = (fast + 2) % len;
        if slow == fast {
            met = true;
            break;
        }
    }
    if !met {
        return Floyd::Chasing { slow, fast };
    }
    if step <= len {
        return Floyd::Met {
            slow,
            fast,
            finder: None,
        };
    }
    let mut finder = 0;
    for _ in 0..(step - len).min(len) {
        slow = (slow + 1) % len;
        finder = (finder + 1) % len;
        if slow == finder {
            return Floyd::Entry {
                slow,
                fast,
                node: finder,
            };
        }
    }
    Floyd::Met {
        slow,
        fast,
        finder: Some(finder),
    }
}

pub fn simulate(surface: &mut dyn Surface, step: usize) -> Frame {
    surface.clear();
    let layout = ListLayout {
        spacing: LOGICAL_WIDTH / (NODES.len() + 1) as f64,
        y: LOGICAL_HEIGHT / 2.0,
        radius: 20.0,
    };
    let state = floyd(NODES.len(), step);
    let (slow, fast) = match state {
        Floyd::Chasing { slow, fast } | Floyd::Met { slow, fast, .. } | Floyd::Entry { slow, fast, .. } => {
            (slow, fast)
        }
    };

    let pointers = ListPointers {
        prev: Some(slow),
        current: Some(fast),
        next: None,
    };
    draw::draw_linked_list(surface, &layout, &NODES, &pointers);
    let last = NODES.len() - 1;
    draw::draw_curved_arrow(
        surface,
        (layout.x(last) + layout.radius, layout.y),
        (layout.x(CYCLE_START) - layout.radius, layout.y),
        PRIMARY,
    );

    let bottom = layout.y + layout.radius;
    if slow == fast {
        draw::draw_pointer_below(surface, layout.x(slow), bottom, "S F", HIGHLIGHT);
    } else {
        draw::draw_pointer_below(surface, layout.x(slow), bottom, "S", SECONDARY);
        draw::draw_pointer_below(surface, layout.x(fast), bottom, "F", HIGHLIGHT);
    }

    let description = match state {
        _ if step == 0 => "Initialize: slow = fast = head".to_string(),
        Floyd::Chasing { slow, fast } => {
            format!("Slow pointer at {}, Fast pointer at {}", NODES[slow], NODES[fast])
        }
        Floyd::Met { .. } => "Cycle detected! Slow and fast pointers meet.".to_string(),
        Floyd::Entry { node, .. } => {
            format!("Cycle start found at node with value {}", NODES[node])
        }
    };
    Frame::describe(description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingSurface;

    #[test]
    fn test_pointers_meet_within_list_length() {
        let met_at = (0..=NODES.len())
            .find(|&step| !matches!(floyd(NODES.len(), step), Floyd::Chasing { .. }));
        assert_eq!(met_at, Some(6));
    }

    #[test]
    fn test_descriptions() {
        let mut s = RecordingSurface::new();
        let text = |s: &mut RecordingSurface, step| {
            simulate(s, step).description().unwrap_or_default().to_string()
        };
        assert_eq!(text(&mut s, 0), "Initialize: slow = fast = head");
        assert_eq!(text(&mut s, 1), "Slow pointer at 2, Fast pointer at 3");
        assert_eq!(text(&mut s, 6), "Cycle detected! Slow and fast pointers meet.");
        assert_eq!(text(&mut s, 7), "Cycle start found at node with value 2");
        assert_eq!(text(&mut s, 30), "Cycle start found at node with value 2");
    }

    #[test]
    fn test_markers_drawn_for_both_pointers() {
        let mut s = RecordingSurface::new();
        simulate(&mut s, 2);
        let texts = s.texts();
        assert!(texts.contains(&"S"));
        assert!(texts.contains(&"F"));
        simulate(&mut s, 6);
        assert!(s.texts().contains(&"S F"));
    }
}
