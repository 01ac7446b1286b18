/// Logical surface width every simulator draws against.
pub const LOGICAL_WIDTH: f64 = 600.0;
/// Logical surface height every simulator draws against.
pub const LOGICAL_HEIGHT: f64 = 200.0;

/// An RGB color with straight alpha (0.0 transparent, 1.0 opaque).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Rgba { r, g, b, a: 1.0 }
    }

    pub const fn with_alpha(self, a: f64) -> Self {
        Rgba { a, ..self }
    }
}

/// Horizontal anchoring of a text label relative to its x coordinate.
/// Labels are always vertically centered on y.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// A single draw call in logical coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    FillRect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        color: Rgba,
    },
    StrokeRect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        color: Rgba,
        line_width: f64,
    },
    FillCircle {
        cx: f64,
        cy: f64,
        radius: f64,
        color: Rgba,
    },
    StrokeCircle {
        cx: f64,
        cy: f64,
        radius: f64,
        color: Rgba,
        line_width: f64,
    },
    Line {
        from: (f64, f64),
        to: (f64, f64),
        color: Rgba,
        line_width: f64,
    },
    Triangle {
        points: [(f64, f64); 3],
        color: Rgba,
    },
    /// Quadratic Bezier from `from` to `to` bent towards `ctrl`.
    QuadCurve {
        from: (f64, f64),
        ctrl: (f64, f64),
        to: (f64, f64),
        color: Rgba,
        line_width: f64,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        color: Rgba,
        align: Align,
    },
}

/// A drawing target. Coordinates are logical units in
/// `0..LOGICAL_WIDTH` x `0..LOGICAL_HEIGHT`; anything outside is clipped.
pub trait Surface {
    /// Logical (width, height).
    fn size(&self) -> (f64, f64) {
        (LOGICAL_WIDTH, LOGICAL_HEIGHT)
    }

    /// Reset to a blank frame.
    fn clear(&mut self);

    fn draw(&mut self, shape: Shape);
}
