use super::Frame;
use crate::draw::{self, CellState, PRIMARY, TEXT};
use crate::render::{Shape, Surface};

const N: usize = 6;
const BOX_W: f64 = 44.0;
const BOX_H: f64 = 34.0;
const ROW_X: f64 = 10.0;
const SEQUENCE_Y: f64 = 20.0;
const MEMO_Y: f64 = 84.0;
const TREE_RADIUS: f64 = 18.0;

/// Memoized recursion for F(n) limited to a number of calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FibTrace {
    pub memo: Vec<Option<u64>>,
    pub calls: usize,
    /// Argument of the most recent call that was entered
    pub current: Option<usize>,
}

impl FibTrace {
    fn call(&mut self, n: usize, budget: usize) -> Option<u64> {
        if self.calls >= budget {
            return None;
        }
        self.calls += 1;
        self.current = Some(n);
        if n <= 1 {
            self.memo[n] = Some(n as u64);
            return Some(n as u64);
        }
        if let Some(v) = self.memo[n] {
            return Some(v);
        }
        let a = self.call(n - 1, budget)?;
        let b = self.call(n - 2, budget)?;
        self.memo[n] = Some(a + b);
        Some(a + b)
    }

    pub fn result(&self, n: usize) -> Option<u64> {
        self.memo.get(n).copied().flatten()
    }
}

pub fn fib_with_budget(n: usize, budget: usize) -> FibTrace {
    let mut trace = FibTrace {
        memo: vec![None; n + 1],
        calls: 0,
        current: None,
    };
    trace.call(n, budget);
    trace
}

fn draw_row(surface: &mut dyn Surface, y: f64, caption: &str, cells: &[(String, Option<String>, CellState)]) {
    draw::draw_text(surface, ROW_X, y - 10.0, caption, TEXT);
    for (i, (label, value, state)) in cells.iter().enumerate() {
        let x = ROW_X + i as f64 * BOX_W;
        draw::draw_box(surface, x, y, BOX_W, BOX_H, "", *state);
        draw::draw_label(surface, x + BOX_W / 2.0, y + 10.0, label.as_str(), TEXT);
        if let Some(v) = value {
            draw::draw_label(surface, x + BOX_W / 2.0, y + 25.0, v.as_str(), TEXT);
        }
    }
}

fn tree_node(surface: &mut dyn Surface, trace: &FibTrace, (x, y): (f64, f64), k: usize) {
    let state = if trace.current == Some(k) {
        CellState::Current
    } else if trace.result(k).is_some() {
        CellState::Visited
    } else {
        CellState::Default
    };
    draw::draw_node(surface, x, y, TREE_RADIUS, &format!("F({k})"), state);
}

fn tree_edge(surface: &mut dyn Surface, from: (f64, f64), to: (f64, f64)) {
    surface.draw(Shape::Line {
        from: (from.0, from.1 + TREE_RADIUS),
        to: (to.0, to.1 - TREE_RADIUS),
        color: PRIMARY,
        line_width: 1.0,
    });
}

/// Top of the call tree, revealed as the recursion reaches it.
fn draw_call_tree(surface: &mut dyn Surface, trace: &FibTrace) {
    draw::draw_text(surface, 350.0, 10.0, "Recursion Tree (simplified):", TEXT);
    let root = (470.0, 40.0);
    let (left, right) = ((400.0, 95.0), (540.0, 95.0));
    if trace.calls > 1 {
        tree_edge(surface, root, left);
        tree_edge(surface, root, right);
        if trace.calls > 3 && N > 2 {
            let (ll, lr) = ((370.0, 150.0), (430.0, 150.0));
            tree_edge(surface, left, ll);
            tree_edge(surface, left, lr);
            tree_node(surface, trace, ll, N - 2);
            tree_node(surface, trace, lr, N - 3);
        }
        tree_node(surface, trace, left, N - 1);
        tree_node(surface, trace, right, N - 2);
    }
    tree_node(surface, trace, root, N);
}

pub fn simulate(surface: &mut dyn Surface, step: usize) -> Frame {
    surface.clear();
    let trace = fib_with_budget(N, step);

    let sequence: Vec<_> = (0..=N)
        .map(|i| {
            let value = if i <= 1 { Some(i as u64) } else { trace.result(i) };
            (format!("F({i})"), value.map(|v| v.to_string()), CellState::Default)
        })
        .collect();
    draw_row(surface, SEQUENCE_Y, "Fibonacci Sequence:", &sequence);

    let memo: Vec<_> = (0..=N)
        .map(|i| {
            let value = trace.result(i);
            let state = if value.is_some() { CellState::Visited } else { CellState::Default };
            (format!("memo[{i}]"), value.map(|v| v.to_string()), state)
        })
        .collect();
    draw_row(surface, MEMO_Y, "Memoization Table:", &memo);

    if step == 0 {
        return Frame::describe(format!("Initialize: Calculate Fibonacci({N})"));
    }
    draw_call_tree(surface, &trace);
    draw::draw_text(surface, ROW_X, 150.0, format!("Calls: {}", trace.calls), TEXT);

    let description = match (trace.result(N), trace.current) {
        (Some(v), _) => format!("Fibonacci({N}) = {v} (Completed in {} calls)", trace.calls),
        (None, Some(k)) => format!("Step {step}: Computing Fibonacci({k})"),
        (None, None) => String::new(),
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
    fn test_call_budget_walks_down_then_up() {
        assert_eq!(text(0), "Initialize: Calculate Fibonacci(6)");
        assert_eq!(text(1), "Step 1: Computing Fibonacci(6)");
        assert_eq!(text(6), "Step 6: Computing Fibonacci(1)");
        assert_eq!(text(7), "Step 7: Computing Fibonacci(0)");
        assert_eq!(text(10), "Step 10: Computing Fibonacci(3)");
    }

    #[test]
    fn test_completes_in_eleven_calls() {
        assert_eq!(text(11), "Fibonacci(6) = 8 (Completed in 11 calls)");
        assert_eq!(text(40), "Fibonacci(6) = 8 (Completed in 11 calls)");
        let trace = fib_with_budget(6, usize::MAX);
        assert_eq!(
            trace.memo,
            vec![Some(0), Some(1), Some(1), Some(2), Some(3), Some(5), Some(8)]
        );
    }

    #[test]
    fn test_small_inputs() {
        assert_eq!(fib_with_budget(0, 5).result(0), Some(0));
        assert_eq!(fib_with_budget(1, 5).result(1), Some(1));
        assert_eq!(fib_with_budget(2, 2).result(2), None);
    }
}
