use super::Frame;
use crate::draw::{self, ArrayLayout, CellState, PRIMARY, SECONDARY, TEXT};
use crate::render::{Rgba, Shape, Surface};

const FIXED_VALUES: [i64; 9] = [1, 3, 2, 6, 8, 4, 7, 2, 5];
const WINDOW: usize = 3;

const VARIABLE_VALUES: [i64; 10] = [4, 2, 1, 7, 8, 1, 2, 8, 1, 0];
const TARGET: i64 = 8;

/// Highlight band spanning boxes `first..=last`, slightly taller than the boxes.
fn draw_window(surface: &mut dyn Surface, layout: &ArrayLayout, first: usize, len: usize, tint: Rgba) {
    let x = layout.cell_x(first);
    let w = len as f64 * layout.box_w;
    let (y, h) = (layout.start_y - 10.0, layout.box_h + 20.0);
    surface.draw(Shape::FillRect {
        x,
        y,
        w,
        h,
        color: tint.with_alpha(0.2),
    });
    surface.draw(Shape::StrokeRect {
        x,
        y,
        w,
        h,
        color: SECONDARY,
        line_width: 3.0,
    });
}

/// Fixed-size window: step N (N ≥ 1) looks at the window starting at
/// `min(N - 1, len - k)`.
pub fn simulate_fixed(surface: &mut dyn Surface, step: usize) -> Frame {
    surface.clear();
    let layout = ArrayLayout::new(FIXED_VALUES.len());
    let last_start = FIXED_VALUES.len() - WINDOW;

    if step == 0 {
        draw::draw_array(surface, &layout, &FIXED_VALUES, |_| CellState::Default);
        return Frame::describe(format!("Initialize: window size = {WINDOW}"));
    }

    let start = (step - 1).min(last_start);
    let window = start..start + WINDOW;
    let sum: i64 = FIXED_VALUES[window.clone()].iter().sum();

    draw::draw_array(surface, &layout, &FIXED_VALUES, |i| {
        if window.contains(&i) {
            CellState::Frontier
        } else if i < start {
            CellState::Visited
        } else {
            CellState::Default
        }
    });
    draw_window(surface, &layout, start, WINDOW, PRIMARY);
    let mid = layout.cell_x(start) + WINDOW as f64 * layout.box_w / 2.0;
    draw::draw_label(surface, mid, layout.bottom() + 30.0, format!("Sum: {sum}"), TEXT);

    if start >= last_start {
        Frame::describe("End of array reached")
    } else {
        Frame::describe(format!("Current window sum: {sum}"))
    }
}

/// State of the minimum-length window search after a number of moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableWindow {
    pub start: usize,
    /// Inclusive; equals `len` once the right edge ran off the end
    pub end: usize,
    pub sum: i64,
    /// Shortest window seen so far whose sum reached the target, inclusive bounds
    pub best: Option<(usize, usize)>,
}

impl VariableWindow {
    pub fn exhausted(&self, len: usize, target: i64) -> bool {
        self.end >= len && self.sum < target
    }
}

/// Runs `step` moves of shrink-while-at-or-above-target / otherwise-expand.
/// Returns `None` for an empty input.
pub fn variable_window(values: &[i64], target: i64, step: usize) -> Option<VariableWindow> {
    let first = *values.first()?;
    let mut w = VariableWindow {
        start: 0,
        end: 0,
        sum: first,
        best: None,
    };
    for _ in 0..step {
        if w.sum >= target && w.start <= w.end {
            let len = w.end - w.start + 1;
            if w.best.is_none_or(|(s, e)| len < e - s + 1) {
                w.best = Some((w.start, w.end));
            }
            w.sum -= values[w.start];
            w.start += 1;
        } else {
            w.end += 1;
            match values.get(w.end) {
                Some(v) => w.sum += v,
                None => break,
            }
        }
    }
    Some(w)
}

fn variable_frame(surface: &mut dyn Surface, values: &[i64], target: i64, step: usize) -> Frame {
    surface.clear();
    let layout = ArrayLayout::new(values.len());
    let Some(w) = variable_window(values, target, step) else {
        return Frame::Finished;
    };

    if step > 0 && w.exhausted(values.len(), target) {
        let Some((s, e)) = w.best else {
            return Frame::Finished;
        };
        draw::draw_array(surface, &layout, values, |i| {
            if (s..=e).contains(&i) { CellState::Visited } else { CellState::Default }
        });
        draw_window(surface, &layout, s, e - s + 1, SECONDARY);
        return Frame::describe(format!(
            "Minimum length subarray: {} (from index {s} to {e})",
            e - s + 1
        ));
    }

    draw::draw_array(surface, &layout, values, |i| {
        if i >= w.start && i <= w.end {
            CellState::Frontier
        } else if w.best.is_some_and(|(s, e)| (s..=e).contains(&i)) {
            CellState::Visited
        } else {
            CellState::Default
        }
    });
    // The window is empty right after shrinking past its last element
    let len = (w.end + 1).saturating_sub(w.start);
    draw_window(surface, &layout, w.start, len, PRIMARY);
    let mid = layout.cell_x(w.start) + len as f64 * layout.box_w / 2.0;
    draw::draw_label(surface, mid, layout.bottom() + 30.0, format!("Sum: {}", w.sum), TEXT);
    draw::draw_label(surface, 300.0, 20.0, format!("Target: {target}"), TEXT);

    let description = if step == 0 {
        format!(
            "Initialize: start = 0, end = 0, sum = {}, target = {target}",
            w.sum
        )
    } else if w.sum >= target {
        format!("Current window sum: {} >= {target} (shrink from left)", w.sum)
    } else {
        format!("Current window sum: {} < {target} (expand to right)", w.sum)
    };
    Frame::describe(description)
}

pub fn simulate_variable(surface: &mut dyn Surface, step: usize) -> Frame {
    variable_frame(surface, &VARIABLE_VALUES, TARGET, step)
}
