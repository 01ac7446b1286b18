//! Stateless painting helpers shared by the pattern simulators.
//!
//! Everything here takes logical coordinates; the surface clips whatever
//! falls outside of it.

pub mod tree;

use std::f64::consts::PI;
use std::fmt::Display;

use crate::render::{Align, LOGICAL_HEIGHT, LOGICAL_WIDTH, Rgba, Shape, Surface};

pub const PRIMARY: Rgba = Rgba::rgb(0x42, 0x85, 0xf4);
pub const SECONDARY: Rgba = Rgba::rgb(0x34, 0xa8, 0x53);
pub const HIGHLIGHT: Rgba = Rgba::rgb(0xea, 0x43, 0x35);
/// Box and node fill. Dark so the tints and labels stay readable.
pub const BACKGROUND: Rgba = Rgba::rgb(0x28, 0x2c, 0x34);
pub const TEXT: Rgba = Rgba::rgb(0xe8, 0xe8, 0xe8);
pub const MUTED: Rgba = Rgba::rgb(0x70, 0x74, 0x7c);

const TINT_ALPHA: f64 = 0.2;
const LINE_WIDTH: f64 = 2.0;
const ARROW_HEAD: f64 = 10.0;

/// Visual role of a box or node in the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellState {
    #[default]
    Default,
    /// The element the algorithm is looking at right now
    Current,
    /// Already processed
    Visited,
    /// Queued or otherwise in view next
    Frontier,
    /// Not reached yet, drawn subdued
    Pending,
}

impl CellState {
    pub fn tint(self) -> Option<Rgba> {
        match self {
            CellState::Current => Some(HIGHLIGHT.with_alpha(TINT_ALPHA)),
            CellState::Visited => Some(SECONDARY.with_alpha(TINT_ALPHA)),
            CellState::Frontier => Some(PRIMARY.with_alpha(TINT_ALPHA)),
            CellState::Default | CellState::Pending => None,
        }
    }

    pub fn stroke(self) -> Rgba {
        match self {
            CellState::Current => HIGHLIGHT,
            CellState::Visited => SECONDARY,
            CellState::Default | CellState::Frontier => PRIMARY,
            CellState::Pending => MUTED,
        }
    }

    fn text(self) -> Rgba {
        if self == CellState::Pending { MUTED } else { TEXT }
    }
}

/// Centered text label.
pub fn draw_label(surface: &mut dyn Surface, x: f64, y: f64, text: impl Into<String>, color: Rgba) {
    surface.draw(Shape::Text {
        x,
        y,
        text: text.into(),
        color,
        align: Align::Center,
    });
}

/// Left-anchored text label.
pub fn draw_text(surface: &mut dyn Surface, x: f64, y: f64, text: impl Into<String>, color: Rgba) {
    surface.draw(Shape::Text {
        x,
        y,
        text: text.into(),
        color,
        align: Align::Left,
    });
}

/// Filled, outlined rectangle with a centered label.
pub fn draw_box(
    surface: &mut dyn Surface,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    label: &str,
    state: CellState,
) {
    surface.draw(Shape::FillRect {
        x,
        y,
        w,
        h,
        color: BACKGROUND,
    });
    if let Some(tint) = state.tint() {
        surface.draw(Shape::FillRect {
            x,
            y,
            w,
            h,
            color: tint,
        });
    }
    surface.draw(Shape::StrokeRect {
        x,
        y,
        w,
        h,
        color: state.stroke(),
        line_width: LINE_WIDTH,
    });
    if !label.is_empty() {
        draw_label(surface, x + w / 2.0, y + h / 2.0, label, state.text());
    }
}

/// Filled, outlined circle with a centered label.
pub fn draw_node(
    surface: &mut dyn Surface,
    cx: f64,
    cy: f64,
    radius: f64,
    label: &str,
    state: CellState,
) {
    surface.draw(Shape::FillCircle {
        cx,
        cy,
        radius,
        color: BACKGROUND,
    });
    if let Some(tint) = state.tint() {
        surface.draw(Shape::FillCircle {
            cx,
            cy,
            radius,
            color: tint,
        });
    }
    surface.draw(Shape::StrokeCircle {
        cx,
        cy,
        radius,
        color: state.stroke(),
        line_width: LINE_WIDTH,
    });
    draw_label(surface, cx, cy, label, state.text());
}

fn arrow_head(surface: &mut dyn Surface, tip: (f64, f64), angle: f64, color: Rgba) {
    let wing = |a: f64| (tip.0 - ARROW_HEAD * a.cos(), tip.1 - ARROW_HEAD * a.sin());
    surface.draw(Shape::Triangle {
        points: [tip, wing(angle - PI / 6.0), wing(angle + PI / 6.0)],
        color,
    });
}

/// Straight arrow with a filled head at `to`.
pub fn draw_arrow(surface: &mut dyn Surface, from: (f64, f64), to: (f64, f64), color: Rgba) {
    surface.draw(Shape::Line {
        from,
        to,
        color,
        line_width: LINE_WIDTH,
    });
    let angle = (to.1 - from.1).atan2(to.0 - from.0);
    arrow_head(surface, to, angle, color);
}

/// Arrow bent upwards through a control point 50 units above `from`.
/// Used for back edges such as a list cycle.
pub fn draw_curved_arrow(surface: &mut dyn Surface, from: (f64, f64), to: (f64, f64), color: Rgba) {
    let ctrl = ((from.0 + to.0) / 2.0, from.1 - 50.0);
    surface.draw(Shape::QuadCurve {
        from,
        ctrl,
        to,
        color,
        line_width: LINE_WIDTH,
    });
    let angle = (to.1 - ctrl.1).atan2(to.0 - ctrl.0);
    arrow_head(surface, to, angle, color);
}

/// Small triangular marker whose tip sits 20 units above `top`, with an
/// optional label above it.
pub fn draw_pointer(surface: &mut dyn Surface, x: f64, top: f64, label: &str, color: Rgba) {
    surface.draw(Shape::Triangle {
        points: [(x, top - 20.0), (x - 10.0, top - 10.0), (x + 10.0, top - 10.0)],
        color,
    });
    if !label.is_empty() {
        draw_label(surface, x, top - 30.0, label, color);
    }
}

/// Marker under a shape whose bottom edge is at `bottom`, tip facing up.
pub fn draw_pointer_below(surface: &mut dyn Surface, x: f64, bottom: f64, label: &str, color: Rgba) {
    surface.draw(Shape::Triangle {
        points: [(x, bottom + 5.0), (x - 10.0, bottom + 15.0), (x + 10.0, bottom + 15.0)],
        color,
    });
    if !label.is_empty() {
        draw_label(surface, x, bottom + 25.0, label, color);
    }
}

/// Geometry of a horizontal row of equally sized boxes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrayLayout {
    pub start_x: f64,
    pub start_y: f64,
    pub box_w: f64,
    pub box_h: f64,
}

impl ArrayLayout {
    /// Centers `len` boxes vertically with one box width of margin on
    /// either side.
    pub fn new(len: usize) -> Self {
        let box_w = LOGICAL_WIDTH / (len + 2) as f64;
        let box_h = 40.0;
        ArrayLayout {
            start_x: box_w,
            start_y: LOGICAL_HEIGHT / 2.0 - box_h / 2.0,
            box_w,
            box_h,
        }
    }

    /// Same horizontal layout, boxes starting at `y`.
    pub fn at_y(self, y: f64) -> Self {
        ArrayLayout { start_y: y, ..self }
    }

    pub fn cell_x(&self, index: usize) -> f64 {
        self.start_x + index as f64 * self.box_w
    }

    pub fn center_x(&self, index: usize) -> f64 {
        self.cell_x(index) + self.box_w / 2.0
    }

    pub fn bottom(&self) -> f64 {
        self.start_y + self.box_h
    }
}

/// Array of boxes, each cell styled by `state(index)`.
pub fn draw_array<T: Display>(
    surface: &mut dyn Surface,
    layout: &ArrayLayout,
    values: &[T],
    state: impl Fn(usize) -> CellState,
) {
    for (i, value) in values.iter().enumerate() {
        draw_box(
            surface,
            layout.cell_x(i),
            layout.start_y,
            layout.box_w,
            layout.box_h,
            &value.to_string(),
            state(i),
        );
    }
}

/// Index labels under each box of an array.
pub fn draw_indices(surface: &mut dyn Surface, layout: &ArrayLayout, len: usize, prefix: &str) {
    for i in 0..len {
        draw_label(
            surface,
            layout.center_x(i),
            layout.bottom() + 15.0,
            format!("{prefix}{i}"),
            MUTED,
        );
    }
}

/// Which list nodes the reversal pointers currently reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListPointers {
    pub prev: Option<usize>,
    pub current: Option<usize>,
    pub next: Option<usize>,
}

impl ListPointers {
    fn state(&self, index: usize) -> CellState {
        if self.current == Some(index) {
            CellState::Current
        } else if self.prev == Some(index) {
            CellState::Visited
        } else if self.next == Some(index) {
            CellState::Frontier
        } else {
            CellState::Default
        }
    }
}

/// Horizontal placement of list nodes: node `i` is centered at
/// `(i + 1) * spacing`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListLayout {
    pub spacing: f64,
    pub y: f64,
    pub radius: f64,
}

impl ListLayout {
    pub fn x(&self, index: usize) -> f64 {
        (index + 1) as f64 * self.spacing
    }

    fn forward_arrow(&self, surface: &mut dyn Surface, index: usize, color: Rgba) {
        draw_arrow(
            surface,
            (self.x(index) + self.radius, self.y),
            (self.x(index + 1) - self.radius, self.y),
            color,
        );
    }
}

fn draw_list_nodes<T: Display>(
    surface: &mut dyn Surface,
    layout: &ListLayout,
    values: &[T],
    pointers: &ListPointers,
) {
    for (i, value) in values.iter().enumerate() {
        draw_node(
            surface,
            layout.x(i),
            layout.y,
            layout.radius,
            &value.to_string(),
            pointers.state(i),
        );
    }
}

/// Singly linked list with forward arrows between neighbours.
pub fn draw_linked_list<T: Display>(
    surface: &mut dyn Surface,
    layout: &ListLayout,
    values: &[T],
    pointers: &ListPointers,
) {
    draw_list_nodes(surface, layout, values, pointers);
    for i in 0..values.len().saturating_sub(1) {
        layout.forward_arrow(surface, i, PRIMARY);
    }
}

/// Linked list whose first `reversed` nodes already point backwards.
/// Node `reversed` itself is flipped once `sub_step >= 1`; `pointers`
/// only decides styling and the prev/curr/next tags.
pub fn draw_partially_reversed_list<T: Display>(
    surface: &mut dyn Surface,
    layout: &ListLayout,
    values: &[T],
    reversed: usize,
    pointers: &ListPointers,
    sub_step: usize,
) {
    draw_list_nodes(surface, layout, values, pointers);
    let last = values.len().saturating_sub(1);
    for i in 0..values.len() {
        if i < reversed {
            if i > 0 {
                draw_arrow(
                    surface,
                    (layout.x(i) - layout.radius, layout.y),
                    (layout.x(i - 1) + layout.radius, layout.y),
                    SECONDARY,
                );
            }
        } else if i == reversed && sub_step >= 1 {
            if let Some(prev) = i.checked_sub(1) {
                draw_arrow(
                    surface,
                    (layout.x(i) - layout.radius, layout.y),
                    (layout.x(prev) + layout.radius, layout.y),
                    HIGHLIGHT,
                );
            }
        } else if i < last {
            layout.forward_arrow(surface, i, PRIMARY);
        }
    }

    let label_y = layout.y + layout.radius + 20.0;
    let tags = [
        (pointers.prev, "prev", SECONDARY),
        (pointers.current, "curr", HIGHLIGHT),
        (pointers.next, "next", PRIMARY),
    ];
    for (index, tag, color) in tags {
        if let Some(i) = index {
            draw_label(surface, layout.x(i), label_y, tag, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingSurface;

    #[test]
    fn test_array_layout_matches_canvas_proportions() {
        let layout = ArrayLayout::new(7);
        assert!((layout.box_w - 600.0 / 9.0).abs() < 1e-9);
        assert_eq!(layout.start_x, layout.box_w);
        assert_eq!(layout.start_y, 80.0);
        assert!((layout.center_x(0) - layout.box_w * 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_box_tint_only_when_highlighted() {
        let mut s = RecordingSurface::new();
        draw_box(&mut s, 0.0, 0.0, 10.0, 10.0, "1", CellState::Default);
        assert_eq!(s.calls().len(), 3);
        s.clear();
        draw_box(&mut s, 0.0, 0.0, 10.0, 10.0, "1", CellState::Current);
        assert_eq!(s.calls().len(), 4);
        assert!(matches!(
            s.calls()[1],
            Shape::FillRect { color, .. } if color == HIGHLIGHT.with_alpha(0.2)
        ));
    }

    #[test]
    fn test_arrow_head_points_back_from_tip() {
        let mut s = RecordingSurface::new();
        draw_arrow(&mut s, (0.0, 50.0), (100.0, 50.0), PRIMARY);
        let Shape::Triangle { points, .. } = &s.calls()[1] else {
            panic!("expected arrow head");
        };
        assert_eq!(points[0], (100.0, 50.0));
        assert!(points[1].0 < 100.0 && points[2].0 < 100.0);
        assert!(((points[1].1 - 50.0).abs() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_linked_list_has_one_arrow_less_than_nodes() {
        let mut s = RecordingSurface::new();
        let layout = ListLayout {
            spacing: 100.0,
            y: 100.0,
            radius: 20.0,
        };
        draw_linked_list(&mut s, &layout, &[1, 2, 3], &ListPointers::default());
        let lines = s
            .calls()
            .iter()
            .filter(|c| matches!(c, Shape::Line { .. }))
            .count();
        assert_eq!(lines, 2);
    }

    #[test]
    fn test_pointer_labels_follow_pointers() {
        let mut s = RecordingSurface::new();
        let layout = ListLayout {
            spacing: 100.0,
            y: 100.0,
            radius: 20.0,
        };
        let pointers = ListPointers {
            prev: Some(0),
            current: Some(1),
            next: None,
        };
        draw_partially_reversed_list(&mut s, &layout, &[1, 2, 3], 1, &pointers, 1);
        let texts = s.texts();
        assert!(texts.contains(&"prev"));
        assert!(texts.contains(&"curr"));
        assert!(!texts.contains(&"next"));
    }
}
