use super::Frame;
use crate::draw::{self, CellState, MUTED, TEXT};
use crate::render::{Align, Shape, Surface};

type Activity = (u32, u32);

const ACTIVITIES: [Activity; 11] = [
    (1, 4),
    (3, 5),
    (0, 6),
    (5, 7),
    (3, 9),
    (5, 9),
    (6, 10),
    (8, 11),
    (8, 12),
    (2, 14),
    (12, 16),
];
const MAX_TIME: u32 = 16;
const TIMELINE: (f64, f64) = (60.0, 580.0);
const AXIS_Y: f64 = 62.0;
const SELECTED_Y: f64 = 30.0;
const ROWS_Y: f64 = 74.0;
const ROW_PITCH: f64 = 11.5;
const BAR_H: f64 = 9.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Activities ordered by finish time
    pub sorted: Vec<Activity>,
    /// Indices into `sorted` that were picked
    pub selected: Vec<usize>,
    /// Index of the activity examined last, with whether it was picked
    pub last: Option<(usize, bool)>,
}

/// Earliest-finish-first selection over the first `step` activities.
pub fn select(activities: &[Activity], step: usize) -> Selection {
    let mut sorted = activities.to_vec();
    sorted.sort_by_key(|a| a.1);
    let mut selected = Vec::new();
    let mut last = None;
    let mut free_at = 0;
    for (i, &(start, finish)) in sorted.iter().enumerate().take(step) {
        let fits = start >= free_at;
        if fits {
            selected.push(i);
            free_at = finish;
        }
        last = Some((i, fits));
    }
    Selection {
        sorted,
        selected,
        last,
    }
}

fn time_x(t: u32) -> f64 {
    TIMELINE.0 + t as f64 * (TIMELINE.1 - TIMELINE.0) / MAX_TIME as f64
}

fn draw_bar(surface: &mut dyn Surface, (start, finish): Activity, y: f64, h: f64, state: CellState) {
    let (x1, x2) = (time_x(start), time_x(finish));
    draw::draw_box(surface, x1, y, x2 - x1, h, &format!("[{start}, {finish}]"), state);
}

fn draw_timeline(surface: &mut dyn Surface) {
    surface.draw(Shape::Line {
        from: (TIMELINE.0, AXIS_Y),
        to: (TIMELINE.1, AXIS_Y),
        color: TEXT,
        line_width: 2.0,
    });
    for t in (0..=MAX_TIME).step_by(2) {
        let x = time_x(t);
        surface.draw(Shape::Line {
            from: (x, AXIS_Y - 4.0),
            to: (x, AXIS_Y + 4.0),
            color: TEXT,
            line_width: 1.0,
        });
        draw::draw_label(surface, x, AXIS_Y - 10.0, t.to_string(), MUTED);
    }
}

pub fn simulate(surface: &mut dyn Surface, step: usize) -> Frame {
    surface.clear();
    draw_timeline(surface);
    let selection = select(&ACTIVITIES, step);
    let current = selection
        .last
        .filter(|_| step > 0 && step <= selection.sorted.len())
        .map(|(i, _)| i);

    for (i, &activity) in selection.sorted.iter().enumerate() {
        let y = ROWS_Y + i as f64 * ROW_PITCH;
        let state = if selection.selected.contains(&i) {
            CellState::Visited
        } else if current == Some(i) {
            CellState::Current
        } else {
            CellState::Default
        };
        draw_bar(surface, activity, y, BAR_H, state);
        surface.draw(Shape::Text {
            x: time_x(activity.0) - 6.0,
            y: y + BAR_H / 2.0,
            text: format!("A{}", i + 1),
            color: MUTED,
            align: Align::Right,
        });
    }

    if !selection.selected.is_empty() {
        draw::draw_text(surface, 4.0, SELECTED_Y - 14.0, "Selected Activities:", TEXT);
        for &i in &selection.selected {
            draw_bar(surface, selection.sorted[i], SELECTED_Y - 6.0, 14.0, CellState::Visited);
        }
    }

    let description = if step == 0 {
        "Initial activities sorted by finish time".to_string()
    } else if step >= selection.sorted.len() {
        format!(
            "Greedy selection complete: {} activities selected",
            selection.selected.len()
        )
    } else {
        match selection.last {
            Some((i, true)) => {
                let (s, f) = selection.sorted[i];
                format!("Selected activity [{s}, {f}]")
            }
            Some((i, false)) => {
                let (s, f) = selection.sorted[i];
                format!("Skipped activity [{s}, {f}] (conflicts with last selected activity)")
            }
            None => String::new(),
        }
    };
    Frame::describe(description)
}
