use super::Frame;
use crate::draw::{self, CellState, SECONDARY, TEXT};
use crate::render::{Shape, Surface};

const VALUES: [i32; 3] = [1, 2, 3];

const PER_ROW: usize = 4;
const CELL_W: f64 = 80.0;
const CELL_H: f64 = 26.0;
const GRID: (f64, f64) = (20.0, 75.0);
const TREE_ROOT: (f64, f64) = (470.0, 22.0);
const TREE_LEVEL: f64 = 44.0;
const TREE_RADIUS: f64 = 13.0;

/// Power set built by doubling: every element is appended to a copy of
/// each subset produced so far.
pub fn power_set(values: &[i32]) -> Vec<Vec<i32>> {
    let mut all: Vec<Vec<i32>> = vec![Vec::new()];
    for &v in values {
        let extended: Vec<Vec<i32>> = all
            .iter()
            .map(|s| {
                let mut next = s.clone();
                next.push(v);
                next
            })
            .collect();
        all.extend(extended);
    }
    all
}

fn show(subset: &[i32]) -> String {
    if subset.is_empty() {
        return "∅".to_string();
    }
    let parts: Vec<String> = subset.iter().map(i32::to_string).collect();
    format!("[{}]", parts.join(", "))
}

/// Include/exclude path from the root of the decision tree down to `subset`.
fn draw_decision_path(surface: &mut dyn Surface, subset: &[i32]) {
    let (mut x, mut y) = TREE_ROOT;
    for v in VALUES {
        let nx = x + if subset.contains(&v) { 30.0 } else { -30.0 };
        let ny = y + TREE_LEVEL;
        surface.draw(Shape::Line {
            from: (x, y + TREE_RADIUS),
            to: (nx, ny - TREE_RADIUS),
            color: SECONDARY,
            line_width: 2.0,
        });
        draw::draw_node(surface, nx, ny, TREE_RADIUS, "", CellState::Visited);
        (x, y) = (nx, ny);
    }
}

pub fn simulate(surface: &mut dyn Surface, step: usize) -> Frame {
    surface.clear();
    let all = power_set(&VALUES);

    draw::draw_text(surface, GRID.0, 12.0, "Original Array:", TEXT);
    for (i, v) in VALUES.iter().enumerate() {
        let x = 150.0 + i as f64 * 40.0;
        draw::draw_box(surface, x, 2.0, 40.0, 24.0, &v.to_string(), CellState::Default);
    }

    draw::draw_text(surface, GRID.0, GRID.1 - 20.0, "Subsets:", TEXT);
    let generated = step.min(all.len());
    for (i, subset) in all.iter().take(generated).enumerate() {
        let x = GRID.0 + (i % PER_ROW) as f64 * (CELL_W + 5.0);
        let y = GRID.1 + (i / PER_ROW) as f64 * (CELL_H + 8.0);
        draw::draw_box(surface, x, y, CELL_W, CELL_H, &show(subset), CellState::Frontier);
    }

    if step > 0 {
        draw::draw_node(surface, TREE_ROOT.0, TREE_ROOT.1, TREE_RADIUS, "∅", CellState::Default);
        if let Some(current) = all.get(step) {
            draw_decision_path(surface, current);
            let items: Vec<String> = current.iter().map(i32::to_string).collect();
            draw::draw_label(
                surface,
                GRID.0 + 2.0 * (CELL_W + 5.0),
                190.0,
                format!("Current subset: [{}]", items.join(", ")),
                TEXT,
            );
        }
    }

    if step == 0 {
        Frame::describe(format!("Initial array: {}", show(&VALUES)))
    } else {
        Frame::describe(format!("Generated {generated} of {} subsets", all.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingSurface;

    #[test]
    fn test_power_set_order_is_stable() {
        let all = power_set(&VALUES);
        let expected: Vec<Vec<i32>> = vec![
            vec![],
            vec![1],
            vec![2],
            vec![1, 2],
            vec![3],
            vec![1, 3],
            vec![2, 3],
            vec![1, 2, 3],
        ];
        assert_eq!(all, expected);
        let mut dedup = all.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(dedup.len(), 8);
    }

    #[test]
    fn test_descriptions() {
        let mut s = RecordingSurface::new();
        let text = |s: &mut RecordingSurface, step| {
            simulate(s, step).description().unwrap_or_default().to_string()
        };
        assert_eq!(text(&mut s, 0), "Initial array: [1, 2, 3]");
        assert_eq!(text(&mut s, 3), "Generated 3 of 8 subsets");
        assert!(s.texts().contains(&"Current subset: [1, 2]"));
        assert_eq!(text(&mut s, 8), "Generated 8 of 8 subsets");
        assert!(!s.texts().iter().any(|t| t.starts_with("Current subset")));
        assert_eq!(text(&mut s, 30), "Generated 8 of 8 subsets");
    }

    #[test]
    fn test_empty_subset_shown_as_empty_set() {
        let mut s = RecordingSurface::new();
        simulate(&mut s, 1);
        assert!(s.texts().contains(&"∅"));
    }
}
