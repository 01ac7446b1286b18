use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::Frame;
use crate::draw::{self, ArrayLayout, CellState, TEXT};
use crate::render::Surface;

const VALUES: [i64; 8] = [3, 1, 5, 4, 2, 8, 7, 6];

/// Smaller half in a max-heap, larger half in a min-heap. The max-heap
/// holds the extra element when the count is odd.
#[derive(Debug, Clone, Default)]
pub struct MedianHeaps {
    lower: BinaryHeap<i64>,
    upper: BinaryHeap<Reverse<i64>>,
}

impl MedianHeaps {
    pub fn insert(&mut self, value: i64) {
        match self.lower.peek() {
            Some(&top) if value > top => self.upper.push(Reverse(value)),
            _ => self.lower.push(value),
        }
        if self.lower.len() > self.upper.len() + 1 {
            if let Some(top) = self.lower.pop() {
                self.upper.push(Reverse(top));
            }
        } else if self.upper.len() > self.lower.len() {
            if let Some(Reverse(top)) = self.upper.pop() {
                self.lower.push(top);
            }
        }
    }

    pub fn median(&self) -> Option<f64> {
        let low = *self.lower.peek()?;
        match self.upper.peek() {
            Some(Reverse(high)) if self.lower.len() == self.upper.len() => {
                Some((low + high) as f64 / 2.0)
            }
            _ => Some(low as f64),
        }
    }

    /// Max-heap contents, largest first.
    pub fn lower(&self) -> Vec<i64> {
        let mut v = self.lower.clone().into_sorted_vec();
        v.reverse();
        v
    }

    /// Min-heap contents, smallest first.
    pub fn upper(&self) -> Vec<i64> {
        let mut v: Vec<i64> = self.upper.iter().map(|r| r.0).collect();
        v.sort_unstable();
        v
    }
}

/// Heaps after streaming the first `count` values.
pub fn stream(values: &[i64], count: usize) -> MedianHeaps {
    let mut heaps = MedianHeaps::default();
    for &v in values.iter().take(count) {
        heaps.insert(v);
    }
    heaps
}

fn join(values: &[i64]) -> String {
    values
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn simulate(surface: &mut dyn Surface, step: usize) -> Frame {
    surface.clear();
    let processed = step.min(VALUES.len());
    let heaps = stream(&VALUES, processed);

    let base = ArrayLayout {
        box_h: 30.0,
        ..ArrayLayout::new(VALUES.len())
    };
    let input = base.at_y(18.0);
    let lower = base.at_y(78.0);
    let upper = base.at_y(138.0);

    draw::draw_text(surface, input.start_x, 9.0, "Original Array:", TEXT);
    draw::draw_array(surface, &input, &VALUES, |i| {
        if i < processed { CellState::Frontier } else { CellState::Default }
    });
    draw::draw_text(surface, lower.start_x, 69.0, "Max Heap (smaller half):", TEXT);
    draw::draw_array(surface, &lower, &heaps.lower(), |_| CellState::Visited);
    draw::draw_text(surface, upper.start_x, 129.0, "Min Heap (larger half):", TEXT);
    draw::draw_array(surface, &upper, &heaps.upper(), |_| CellState::Current);

    if step == 0 {
        return Frame::describe(format!("Initial array: {}", join(&VALUES)));
    }
    let median = heaps.median().map_or_else(String::new, |m| m.to_string());
    draw::draw_label(surface, 300.0, 185.0, format!("Current Median: {median}"), TEXT);
    Frame::describe(format!(
        "Processed: [{}], Median: {median}",
        join(&VALUES[..processed])
    ))
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
    fn test_running_median_descriptions() {
        assert_eq!(text(0), "Initial array: 3, 1, 5, 4, 2, 8, 7, 6");
        assert_eq!(text(1), "Processed: [3], Median: 3");
        assert_eq!(text(2), "Processed: [3, 1], Median: 2");
        assert_eq!(text(4), "Processed: [3, 1, 5, 4], Median: 3.5");
        assert_eq!(text(8), "Processed: [3, 1, 5, 4, 2, 8, 7, 6], Median: 4.5");
        assert_eq!(text(20), text(8));
    }

    #[test]
    fn test_heap_invariants_on_every_prefix() {
        for count in 0..=VALUES.len() {
            let heaps = stream(&VALUES, count);
            let (lower, upper) = (heaps.lower(), heaps.upper());
            assert_eq!(lower.len() + upper.len(), count);
            assert!(lower.len() >= upper.len());
            assert!(lower.len() - upper.len() <= 1);
            if let (Some(max_low), Some(min_high)) = (lower.first(), upper.first()) {
                assert!(max_low <= min_high, "prefix {count}");
            }
        }
    }

    #[test]
    fn test_heap_views_are_ordered() {
        let heaps = stream(&VALUES, 7);
        assert_eq!(heaps.lower(), vec![4, 3, 2, 1]);
        assert_eq!(heaps.upper(), vec![5, 7, 8]);
        assert_eq!(heaps.median(), Some(4.0));
    }
}
