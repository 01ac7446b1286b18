pub mod braille;
pub mod canvas;
pub mod halfblock;
pub mod recording;
pub mod shape;

pub use canvas::{Canvas, ColorMode, RenderMode};
pub use recording::RecordingSurface;
pub use shape::{Align, LOGICAL_HEIGHT, LOGICAL_WIDTH, Rgba, Shape, Surface};
