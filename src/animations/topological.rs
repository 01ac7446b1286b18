use std::collections::VecDeque;

use super::Frame;
use crate::draw::{self, CellState, PRIMARY, TEXT};
use crate::render::Surface;

/// Node label, outgoing edges and position.
type GraphNode = (char, &'static [char], (f64, f64));

static GRAPH: [GraphNode; 8] = [
    ('A', &['C', 'D'], (80.0, 40.0)),
    ('B', &['D'], (80.0, 110.0)),
    ('C', &['E'], (190.0, 40.0)),
    ('D', &['F'], (190.0, 110.0)),
    ('E', &['F', 'H'], (300.0, 40.0)),
    ('F', &['G'], (300.0, 110.0)),
    ('G', &[], (410.0, 110.0)),
    ('H', &[], (410.0, 40.0)),
];
const RADIUS: f64 = 18.0;

fn node(label: char) -> Option<&'static GraphNode> {
    GRAPH.iter().find(|n| n.0 == label)
}

/// Snapshot of a depth-first topological sort cut off after a number of
/// visits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopoState {
    /// Nodes in the order they were first entered
    pub visited: Vec<char>,
    /// Finished nodes, each pushed to the front when its DFS returns
    pub order: VecDeque<char>,
    /// Current DFS path
    pub processing: Vec<char>,
}

struct Walker {
    budget: usize,
    calls: usize,
    state: TopoState,
}

impl Walker {
    /// Returns false once the visit budget ran out mid-walk.
    fn visit(&mut self, label: char) -> bool {
        if self.calls >= self.budget {
            return false;
        }
        self.calls += 1;
        self.state.visited.push(label);
        self.state.processing.push(label);
        let edges: &[char] = node(label).map(|n| n.1).unwrap_or_default();
        for &next in edges {
            if !self.state.visited.contains(&next) && !self.visit(next) {
                return false;
            }
        }
        self.state.order.push_front(label);
        self.state.processing.pop();
        true
    }
}

/// Runs the DFS over every root in table order, allowing `budget` node visits.
pub fn topo_sort(budget: usize) -> TopoState {
    let mut walker = Walker {
        budget,
        calls: 0,
        state: TopoState::default(),
    };
    for &(label, _, _) in &GRAPH {
        if !walker.state.visited.contains(&label) && !walker.visit(label) {
            break;
        }
    }
    walker.state
}

fn draw_graph(surface: &mut dyn Surface, state: &TopoState) {
    for &(_, edges, from) in &GRAPH {
        for &target in edges {
            let Some(&(_, _, to)) = node(target) else {
                continue;
            };
            let angle = (to.1 - from.1).atan2(to.0 - from.0);
            let (dx, dy) = (RADIUS * angle.cos(), RADIUS * angle.sin());
            draw::draw_arrow(
                surface,
                (from.0 + dx, from.1 + dy),
                (to.0 - dx, to.1 - dy),
                PRIMARY,
            );
        }
    }
    for &(label, _, (x, y)) in &GRAPH {
        let cell = if state.processing.contains(&label) {
            CellState::Current
        } else if state.visited.contains(&label) {
            CellState::Visited
        } else {
            CellState::Default
        };
        draw::draw_node(surface, x, y, RADIUS, &label.to_string(), cell);
    }
}

fn join(labels: impl IntoIterator<Item = char>, sep: &str) -> String {
    labels
        .into_iter()
        .map(String::from)
        .collect::<Vec<_>>()
        .join(sep)
}

pub fn simulate(surface: &mut dyn Surface, step: usize) -> Frame {
    surface.clear();
    let state = topo_sort(step);
    draw_graph(surface, &state);

    if !state.order.is_empty() {
        draw::draw_text(surface, 20.0, 164.0, "Topological Order:", TEXT);
        for (i, label) in state.order.iter().enumerate() {
            let x = 150.0 + i as f64 * 50.0;
            draw::draw_box(surface, x, 150.0, 40.0, 28.0, &label.to_string(), CellState::Visited);
        }
    }

    let description = if step == 0 {
        "Initial graph, topological sort starts with DFS".to_string()
    } else if state.order.len() == GRAPH.len() {
        format!("Topological sort complete: {}", join(state.order.iter().copied(), " → "))
    } else if let Some(&label) = state.processing.last() {
        format!("Processing node: {label}")
    } else {
        format!("Processed nodes: {}", join(state.visited.iter().copied(), ", "))
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
    fn test_dfs_path_descriptions() {
        assert_eq!(text(0), "Initial graph, topological sort starts with DFS");
        assert_eq!(text(1), "Processing node: A");
        assert_eq!(text(2), "Processing node: C");
        assert_eq!(text(7), "Processed nodes: A, C, E, F, G, H, D");
    }

    #[test]
    fn test_completes_at_step_eight_and_clamps() {
        let done = "Topological sort complete: B → A → D → C → E → H → F → G";
        assert_eq!(text(8), done);
        assert_eq!(text(9), done);
        assert_eq!(text(64), done);
    }

    #[test]
    fn test_order_respects_every_edge() {
        let order: Vec<char> = topo_sort(usize::MAX).order.into_iter().collect();
        for &(from, edges, _) in &GRAPH {
            let pos = |c: char| order.iter().position(|&o| o == c).unwrap();
            for &to in edges {
                assert!(pos(from) < pos(to), "{from} -> {to}");
            }
        }
    }
}
