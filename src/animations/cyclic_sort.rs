use super::Frame;
use crate::draw::{self, ArrayLayout, CellState};
use crate::render::Surface;

const VALUES: [usize; 6] = [3, 1, 5, 4, 2, 0];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CyclicMove {
    Swapped { placed: usize, fetched: usize },
    Advanced { settled: usize },
    Complete,
}

/// Array contents, scan index and last move after `step` ticks of cyclic
/// sort over a permutation of `0..len`.
pub fn cyclic_sort(values: &[usize], step: usize) -> (Vec<usize>, usize, Option<CyclicMove>) {
    let mut array = values.to_vec();
    let mut index = 0;
    let mut last = None;
    for _ in 0..step {
        if index >= array.len() {
            last = Some(CyclicMove::Complete);
            break;
        }
        let target = array[index];
        if target != index && target < array.len() {
            array.swap(index, target);
            last = Some(CyclicMove::Swapped {
                placed: array[target],
                fetched: array[index],
            });
        } else {
            index += 1;
            last = Some(CyclicMove::Advanced { settled: index - 1 });
        }
    }
    (array, index, last)
}

pub fn simulate(surface: &mut dyn Surface, step: usize) -> Frame {
    surface.clear();
    let layout = ArrayLayout::new(VALUES.len());
    let (array, index, last) = cyclic_sort(&VALUES, step);

    draw::draw_array(surface, &layout, &array, |i| {
        if step > 0 && i == index {
            CellState::Current
        } else if array[i] == i {
            CellState::Visited
        } else {
            CellState::Default
        }
    });
    draw::draw_indices(surface, &layout, array.len(), "idx: ");

    let description = match last {
        None => "Initial array".to_string(),
        Some(CyclicMove::Swapped { placed, fetched }) => format!("Swap {placed} and {fetched}"),
        Some(CyclicMove::Advanced { settled }) => {
            format!("Element {settled} is in correct position, moving to next")
        }
        Some(CyclicMove::Complete) => "Sort complete".to_string(),
    };
    Frame::describe(description)
}
