//! Step-through terminal visualizations of classic interview algorithm
//! patterns, plus a small solved-problem tracker.
//!
//! Every pattern is a [`animations::Simulator`]: a pure function that
//! redraws step `n` from scratch onto a [`render::Surface`]. The
//! [`playback::Controller`] ticks through the steps and the [`stage::Stage`]
//! hosts one pattern at a time in the terminal.

pub mod animations;
pub mod catalog;
pub mod config;
pub mod draw;
pub mod error;
pub mod external;
pub mod playback;
pub mod progress;
pub mod render;
pub mod stage;

pub use error::{Error, Result};
