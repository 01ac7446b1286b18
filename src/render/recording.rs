use super::shape::{Shape, Surface};

/// Surface that keeps the draw calls of the current frame instead of
/// rasterizing them. Used for headless tracing and for comparing frames.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    calls: Vec<Shape>,
    clears: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw calls issued since the last `clear()`.
    pub fn calls(&self) -> &[Shape] {
        &self.calls
    }

    /// Number of times the surface was cleared.
    pub fn clears(&self) -> usize {
        self.clears
    }

    /// All text labels of the current frame, in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Shape::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self) {
        self.calls.clear();
        self.clears += 1;
    }

    fn draw(&mut self, shape: Shape) {
        self.calls.push(shape);
    }
}
