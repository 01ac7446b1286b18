use super::Frame;
use crate::draw::{self, MUTED, PRIMARY, SECONDARY, TEXT};
use crate::render::{Rgba, Shape, Surface};

type Interval = (i32, i32);

const INTERVALS: [Interval; 4] = [(1, 3), (2, 6), (8, 10), (15, 18)];
const AXIS_MAX: i32 = 20;
const AXIS_X: f64 = 30.0;
const AXIS_Y: f64 = 170.0;
const BAR_HEIGHT: f64 = 16.0;
const MERGED_Y: f64 = 118.0;

/// What happened to the most recently processed interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeEvent {
    Merged { into: Interval, with: Interval },
    Added(Interval),
}

/// Merges the first `count` intervals (sorted by start) and reports the
/// last merge decision.
pub fn merge_prefix(intervals: &[Interval], count: usize) -> (Vec<Interval>, Option<MergeEvent>) {
    let mut sorted = intervals.to_vec();
    sorted.sort_by_key(|iv| iv.0);
    let mut merged: Vec<Interval> = Vec::new();
    let mut event = None;
    for &current in sorted.iter().take(count) {
        match merged.last_mut() {
            Some(last) if current.0 <= last.1 => {
                last.1 = last.1.max(current.1);
                event = Some(MergeEvent::Merged {
                    into: *last,
                    with: current,
                });
            }
            Some(_) => {
                merged.push(current);
                event = Some(MergeEvent::Added(current));
            }
            None => merged.push(current),
        }
    }
    (merged, event)
}

fn scale_x(v: i32) -> f64 {
    AXIS_X + v as f64 * (600.0 - 2.0 * AXIS_X) / AXIS_MAX as f64
}

fn draw_bar(surface: &mut dyn Surface, iv: Interval, y: f64, color: Rgba, label_color: Rgba) {
    let (x1, x2) = (scale_x(iv.0), scale_x(iv.1));
    surface.draw(Shape::FillRect {
        x: x1,
        y,
        w: x2 - x1,
        h: BAR_HEIGHT,
        color: color.with_alpha(0.3),
    });
    surface.draw(Shape::StrokeRect {
        x: x1,
        y,
        w: x2 - x1,
        h: BAR_HEIGHT,
        color,
        line_width: 2.0,
    });
    draw::draw_label(
        surface,
        (x1 + x2) / 2.0,
        y + BAR_HEIGHT / 2.0,
        format!("[{}, {}]", iv.0, iv.1),
        label_color,
    );
}

fn draw_axis(surface: &mut dyn Surface) {
    surface.draw(Shape::Line {
        from: (AXIS_X, AXIS_Y),
        to: (scale_x(AXIS_MAX), AXIS_Y),
        color: TEXT,
        line_width: 1.0,
    });
    for tick in (0..=AXIS_MAX).step_by(5) {
        let x = scale_x(tick);
        surface.draw(Shape::Line {
            from: (x, AXIS_Y - 5.0),
            to: (x, AXIS_Y + 5.0),
            color: TEXT,
            line_width: 1.0,
        });
        draw::draw_label(surface, x, AXIS_Y + 18.0, tick.to_string(), TEXT);
    }
}

fn format_list(intervals: &[Interval]) -> String {
    let parts: Vec<String> = intervals.iter().map(|(a, b)| format!("[{a},{b}]")).collect();
    format!("[{}]", parts.join(","))
}

pub fn simulate(surface: &mut dyn Surface, step: usize) -> Frame {
    surface.clear();
    draw_axis(surface);

    let processed = step.min(INTERVALS.len());
    let (merged, event) = merge_prefix(&INTERVALS, processed);

    for (i, &iv) in INTERVALS.iter().enumerate() {
        let pending = step > 0 && i >= processed;
        let (color, label) = if pending { (MUTED, MUTED) } else { (PRIMARY, TEXT) };
        draw_bar(surface, iv, 8.0 + i as f64 * 22.0, color, label);
    }

    draw::draw_text(surface, AXIS_X, MERGED_Y - 10.0, "Merged:", TEXT);
    for &iv in &merged {
        draw_bar(surface, iv, MERGED_Y, SECONDARY, TEXT);
    }

    let description = if step == 0 {
        "Original intervals (sorted by start time)".to_string()
    } else if processed >= INTERVALS.len() {
        format!("Final merged intervals: {}", format_list(&merged))
    } else {
        match event {
            Some(MergeEvent::Merged { into, with }) => format!(
                "Merged interval [{}, {}] with [{}, {}]",
                into.0, into.1, with.0, with.1
            ),
            Some(MergeEvent::Added(iv)) => format!("Added new interval [{}, {}]", iv.0, iv.1),
            // Only the first interval is placed; nothing new to say
            None => String::new(),
        }
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
    fn test_merge_sequence() {
        assert_eq!(text(0), "Original intervals (sorted by start time)");
        assert_eq!(text(1), "");
        assert_eq!(text(2), "Merged interval [1, 6] with [2, 6]");
        assert_eq!(text(3), "Added new interval [8, 10]");
        assert_eq!(text(4), "Final merged intervals: [[1,6],[8,10],[15,18]]");
        assert_eq!(text(12), text(4));
    }

    #[test]
    fn test_merge_prefix_sorts_first() {
        let (merged, event) = merge_prefix(&[(5, 7), (1, 2), (2, 4)], 3);
        assert_eq!(merged, vec![(1, 4), (5, 7)]);
        assert_eq!(event, Some(MergeEvent::Added((5, 7))));
    }

    #[test]
    fn test_source_intervals_stay_untouched() {
        let (merged, _) = merge_prefix(&INTERVALS, 4);
        assert_eq!(merged[0], (1, 6));
        assert_eq!(INTERVALS[0], (1, 3));
    }
}
