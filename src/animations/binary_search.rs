use super::Frame;
use crate::draw::{self, ArrayLayout, CellState, HIGHLIGHT, SECONDARY, TEXT};
use crate::render::{Shape, Surface};

const VALUES: [i64; 7] = [4, 5, 6, 7, 0, 1, 2];
const TARGET: i64 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Half {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    Start,
    /// `sorted` half was checked; `contains` tells whether the target
    /// can lie inside it
    Narrowed { sorted: Half, contains: bool },
    Found,
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Search {
    pub left: isize,
    pub right: isize,
    pub mid: isize,
    pub probe: Probe,
}

/// Binary search over a rotated sorted slice, `step` probes deep.
pub fn rotated_search(values: &[i64], target: i64, step: usize) -> Search {
    let mut s = Search {
        left: 0,
        right: values.len() as isize - 1,
        mid: 0,
        probe: Probe::Start,
    };
    let at = |i: isize| values[i as usize];
    for _ in 0..step {
        if s.left > s.right {
            s.probe = Probe::NotFound;
            break;
        }
        s.mid = (s.left + s.right) / 2;
        if at(s.mid) == target {
            s.probe = Probe::Found;
            break;
        }
        if at(s.left) <= at(s.mid) {
            let contains = at(s.left) <= target && target < at(s.mid);
            if contains {
                s.right = s.mid - 1;
            } else {
                s.left = s.mid + 1;
            }
            s.probe = Probe::Narrowed {
                sorted: Half::Left,
                contains,
            };
        } else {
            let contains = at(s.mid) < target && target <= at(s.right);
            if contains {
                s.left = s.mid + 1;
            } else {
                s.right = s.mid - 1;
            }
            s.probe = Probe::Narrowed {
                sorted: Half::Right,
                contains,
            };
        }
    }
    s
}

fn describe(s: &Search) -> String {
    match s.probe {
        Probe::Start => format!(
            "Initialize: left = {}, right = {}, target = {TARGET}",
            s.left, s.right
        ),
        Probe::Found => format!("Found target {TARGET} at index {}", s.mid),
        Probe::NotFound => format!("Target {TARGET} not found"),
        Probe::Narrowed { sorted, contains } => {
            let half = match sorted {
                Half::Left => "Left",
                Half::Right => "Right",
            };
            // Which bound moved follows from the half and the verdict
            let moved_left = (sorted == Half::Left) != contains;
            let (name, value) = if moved_left {
                ("left", s.left)
            } else {
                ("right", s.right)
            };
            if contains {
                format!("{half} half is sorted and target {TARGET} is in this half. Set {name} = {value}")
            } else {
                format!("{half} half is sorted but target {TARGET} is not in this half. Set {name} = {value}")
            }
        }
    }
}

pub fn simulate(surface: &mut dyn Surface, step: usize) -> Frame {
    surface.clear();
    let layout = ArrayLayout::new(VALUES.len());
    let search = rotated_search(&VALUES, TARGET, step);
    let found = search.probe == Probe::Found;

    draw::draw_array(surface, &layout, &VALUES, |i| {
        let i = i as isize;
        if found && i == search.mid {
            CellState::Visited
        } else if step > 0 && (i < search.left || i > search.right) {
            CellState::Pending
        } else {
            CellState::Default
        }
    });
    draw::draw_indices(surface, &layout, VALUES.len(), "");
    draw::draw_label(surface, 300.0, 14.0, format!("Target: {TARGET}"), TEXT);

    if step > 0 {
        let in_range = |i: isize| (0..VALUES.len() as isize).contains(&i).then_some(i as usize);
        if let Some(l) = in_range(search.left) {
            draw::draw_pointer(surface, layout.center_x(l), layout.start_y, "L", SECONDARY);
        }
        if let Some(r) = in_range(search.right) {
            draw::draw_pointer(surface, layout.center_x(r), layout.start_y, "R", SECONDARY);
        }
        if let Some(m) = in_range(search.mid) {
            draw::draw_pointer_below(surface, layout.center_x(m), layout.bottom() + 18.0, "M", HIGHLIGHT);
            if found {
                surface.draw(Shape::StrokeRect {
                    x: layout.cell_x(m),
                    y: layout.start_y - 5.0,
                    w: layout.box_w,
                    h: layout.box_h + 10.0,
                    color: SECONDARY,
                    line_width: 3.0,
                });
            }
        }
    }
    Frame::describe(describe(&search))
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
    fn test_rotated_search_descriptions() {
        assert_eq!(text(0), "Initialize: left = 0, right = 6, target = 0");
        assert_eq!(
            text(1),
            "Left half is sorted but target 0 is not in this half. Set left = 4"
        );
        assert_eq!(
            text(2),
            "Left half is sorted and target 0 is in this half. Set right = 4"
        );
        assert_eq!(text(3), "Found target 0 at index 4");
        assert_eq!(text(25), "Found target 0 at index 4");
    }

    #[test]
    fn test_right_half_branch() {
        // mid lands on 1, left half [6,7,0] unsorted
        let s = rotated_search(&[6, 7, 0, 1, 2, 3, 4], 3, 1);
        assert_eq!(
            s.probe,
            Probe::Narrowed {
                sorted: Half::Right,
                contains: true
            }
        );
        assert_eq!(s.left, 4);
    }

    #[test]
    fn test_missing_target_is_steady() {
        let s = rotated_search(&[4, 5, 6, 7, 0, 1, 2], 3, 10);
        assert_eq!(s.probe, Probe::NotFound);
        assert!(s.left > s.right);
    }
}
