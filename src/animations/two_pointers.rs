use super::Frame;
use crate::draw::{self, ArrayLayout, CellState, SECONDARY, TEXT};
use crate::render::Surface;

const VALUES: [i64; 7] = [1, 3, 4, 5, 7, 11, 15];
const TARGET: i64 = 9;

/// Pointer positions after a number of converging moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Converge {
    Start { left: usize, right: usize },
    Probe { left: usize, right: usize },
    Found { left: usize, right: usize },
    /// The pointers crossed without finding a pair
    Exhausted,
}

/// Runs `step` moves of the converging pair-sum search on a sorted slice.
/// The search stops moving once the pair is found.
pub fn converge(values: &[i64], target: i64, step: usize) -> Converge {
    if values.is_empty() {
        return Converge::Exhausted;
    }
    let (mut left, mut right) = (0isize, values.len() as isize - 1);
    if step == 0 {
        return Converge::Start {
            left: 0,
            right: right as usize,
        };
    }
    let sum = |l: isize, r: isize| values[l as usize] + values[r as usize];
    for _ in 0..step {
        let s = sum(left, right);
        if s == target {
            break;
        }
        if s < target {
            left += 1;
        } else {
            right -= 1;
        }
        if left > right {
            return Converge::Exhausted;
        }
    }
    let (l, r) = (left as usize, right as usize);
    if sum(left, right) == target {
        Converge::Found { left: l, right: r }
    } else {
        Converge::Probe { left: l, right: r }
    }
}

pub fn simulate(surface: &mut dyn Surface, step: usize) -> Frame {
    surface.clear();
    let layout = ArrayLayout::new(VALUES.len());
    let state = converge(&VALUES, TARGET, step);

    let (left, right, found) = match state {
        Converge::Exhausted => return Frame::Finished,
        Converge::Start { left, right } | Converge::Probe { left, right } => (left, right, false),
        Converge::Found { left, right } => (left, right, true),
    };

    draw::draw_array(surface, &layout, &VALUES, |i| {
        if i == left || i == right {
            if found { CellState::Visited } else { CellState::Current }
        } else if i < left || i > right {
            CellState::Pending
        } else {
            CellState::Default
        }
    });
    draw::draw_pointer(surface, layout.center_x(left), layout.start_y, "L", SECONDARY);
    draw::draw_pointer(surface, layout.center_x(right), layout.start_y, "R", SECONDARY);
    draw::draw_label(surface, 300.0, 20.0, format!("Target: {TARGET}"), TEXT);

    let (a, b) = (VALUES[left], VALUES[right]);
    let description = match state {
        Converge::Start { .. } => format!("Initialize: left = 0, right = {right}"),
        Converge::Found { .. } => format!("Found solution: {a} + {b} = {TARGET}"),
        _ => {
            let hint = if a + b < TARGET {
                "too small, move left pointer"
            } else {
                "too large, move right pointer"
            };
            format!("Current sum: {a} + {b} = {} ({hint})", a + b)
        }
    };
    Frame::describe(description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingSurface;

    fn describe(step: usize) -> String {
        let mut s = RecordingSurface::new();
        simulate(&mut s, step)
            .description()
            .unwrap_or_default()
            .to_string()
    }

    #[test]
    fn test_first_frames() {
        assert_eq!(describe(0), "Initialize: left = 0, right = 6");
        assert_eq!(
            describe(1),
            "Current sum: 1 + 11 = 12 (too large, move right pointer)"
        );
        assert_eq!(
            describe(3),
            "Current sum: 3 + 7 = 10 (too large, move right pointer)"
        );
    }

    #[test]
    fn test_finds_pair_at_step_five_and_stays() {
        assert_eq!(describe(5), "Found solution: 4 + 5 = 9");
        assert_eq!(describe(40), "Found solution: 4 + 5 = 9");
    }

    #[test]
    fn test_pointers_never_cross_while_probing() {
        for step in 0..20 {
            match converge(&VALUES, TARGET, step) {
                Converge::Start { left, right }
                | Converge::Probe { left, right }
                | Converge::Found { left, right } => assert!(left <= right),
                Converge::Exhausted => panic!("sample has a solution"),
            }
        }
    }

    #[test]
    fn test_missing_pair_finishes() {
        assert_eq!(converge(&[1, 2, 3], 100, 1), Converge::Probe { left: 1, right: 2 });
        assert_eq!(converge(&[1, 2, 3], 100, 3), Converge::Exhausted);
        assert_eq!(converge(&[], 1, 0), Converge::Exhausted);
    }
}
