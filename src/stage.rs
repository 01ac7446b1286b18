use std::fmt::Write as _;
use std::time::Instant;

use crate::animations::{self, PATTERNS, PatternEntry};
use crate::playback::{Controller, SPEED_STEP};
use crate::render::{Canvas, ColorMode, RenderMode};

/// Smallest terminal the stage lays itself out in.
pub const MIN_COLS: u16 = 10;
pub const MIN_ROWS: u16 = 5;

const RENDER_MODES: [RenderMode; 2] = [RenderMode::HalfBlock, RenderMode::Braille];
const COLOR_MODES: [ColorMode; 4] = [
    ColorMode::TrueColor,
    ColorMode::Ansi256,
    ColorMode::Ansi16,
    ColorMode::Mono,
];

/// User-level operations, from the keyboard or the external control feed.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Play,
    Pause,
    Toggle,
    Reset,
    Speed(f64),
    Faster,
    Slower,
    NextPattern,
    PreviousPattern,
    Activate(String),
    CycleRender,
    CycleColor,
    ToggleStatus,
}

/// Display settings the stage starts with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageOptions {
    pub cols: u16,
    pub rows: u16,
    pub render_mode: RenderMode,
    pub color_mode: ColorMode,
    pub color_quant: u8,
    pub hide_status: bool,
    pub speed: f64,
}

/// Terminal container for one pattern at a time: owns the canvas and the
/// playback controller, and rebuilds the canvas whenever the pattern, the
/// terminal size or the render settings change.
pub struct Stage {
    canvas: Canvas,
    controller: Controller,
    index: Option<usize>,
    cols: u16,
    rows: u16,
    render_mode: RenderMode,
    color_mode: ColorMode,
    color_quant: u8,
    hide_status: bool,
    dirty: bool,
}

impl Stage {
    pub fn new(options: StageOptions) -> Self {
        let mut controller = Controller::new();
        controller.set_speed(options.speed, Instant::now());
        let mut stage = Stage {
            canvas: Canvas::new(0, 0, options.render_mode, options.color_mode),
            controller,
            index: None,
            cols: options.cols.max(MIN_COLS),
            rows: options.rows.max(MIN_ROWS),
            render_mode: options.render_mode,
            color_mode: options.color_mode,
            color_quant: options.color_quant,
            hide_status: options.hide_status,
            dirty: true,
        };
        stage.canvas = stage.fresh_canvas();
        stage
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn pattern(&self) -> Option<&'static PatternEntry> {
        self.index.map(|i| &PATTERNS[i])
    }

    /// Terminal rows given to the canvas; the rest hold the description
    /// line and the status bar.
    fn canvas_rows(&self) -> usize {
        let reserved = if self.hide_status { 1 } else { 2 };
        (self.rows as usize).saturating_sub(reserved)
    }

    fn fresh_canvas(&self) -> Canvas {
        let mut canvas = Canvas::new(
            self.cols as usize,
            self.canvas_rows(),
            self.render_mode,
            self.color_mode,
        );
        canvas.color_quant = self.color_quant;
        canvas
    }

    /// Switches to the pattern registered under `id`. Unknown ids keep the
    /// current pattern and return false.
    pub fn open(&mut self, id: &str) -> bool {
        let Some(index) = animations::position(id) else {
            tracing::warn!(id, "no animation available");
            return false;
        };
        self.open_index(index);
        true
    }

    fn open_index(&mut self, index: usize) {
        self.controller.deactivate();
        self.canvas = self.fresh_canvas();
        let entry = &PATTERNS[index];
        self.controller.load(entry.name, entry.simulate, &mut self.canvas);
        self.index = Some(index);
        self.dirty = true;
    }

    fn step_pattern(&mut self, forward: bool) {
        let len = PATTERNS.len();
        let next = match (self.index, forward) {
            (None, _) => 0,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        };
        self.open_index(next);
    }

    /// Recreates the canvas and redraws the current step on it.
    fn rebuild(&mut self) {
        self.canvas = self.fresh_canvas();
        self.controller.redraw(&mut self.canvas);
        self.dirty = true;
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        if cols < MIN_COLS || rows < MIN_ROWS || (cols, rows) == (self.cols, self.rows) {
            return;
        }
        self.cols = cols;
        self.rows = rows;
        self.rebuild();
    }

    pub fn apply(&mut self, command: Command, now: Instant) {
        tracing::debug!(?command, "command");
        match command {
            Command::Play => self.controller.play(now),
            Command::Pause => self.controller.pause(),
            Command::Toggle => self.controller.toggle(now),
            Command::Reset => self.controller.reset(&mut self.canvas),
            Command::Speed(v) => self.controller.set_speed(v, now),
            Command::Faster => {
                let v = self.controller.speed() + SPEED_STEP;
                self.controller.set_speed(v, now);
            }
            Command::Slower => {
                let v = self.controller.speed() - SPEED_STEP;
                self.controller.set_speed(v, now);
            }
            Command::NextPattern => self.step_pattern(true),
            Command::PreviousPattern => self.step_pattern(false),
            Command::Activate(id) => {
                self.open(&id);
            }
            Command::CycleRender => {
                let idx = RENDER_MODES.iter().position(|&m| m == self.render_mode).unwrap_or(0);
                self.render_mode = RENDER_MODES[(idx + 1) % RENDER_MODES.len()];
                self.rebuild();
            }
            Command::CycleColor => {
                let idx = COLOR_MODES.iter().position(|&m| m == self.color_mode).unwrap_or(0);
                self.color_mode = COLOR_MODES[(idx + 1) % COLOR_MODES.len()];
                self.rebuild();
            }
            Command::ToggleStatus => {
                self.hide_status = !self.hide_status;
                self.rebuild();
            }
        }
        self.dirty = true;
    }

    /// Advances playback if a tick is due. Returns true when a frame was
    /// drawn.
    pub fn tick(&mut self, now: Instant) -> bool {
        let ticked = self.controller.pump(&mut self.canvas, now);
        self.dirty |= ticked;
        ticked
    }

    /// Whether anything changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn status_line(&self) -> String {
        let title = self.pattern().map(|p| p.title).unwrap_or("no pattern");
        format!(
            " {} | step {} | {:?} | {:.1}x | {:?} | {:?} | [space] play  [r] reset  [+/-] speed  [←/→] pattern  [m] render  [c] color  [h] hide  [q] quit ",
            title,
            self.controller.step(),
            self.controller.state(),
            self.controller.speed(),
            self.render_mode,
            self.color_mode,
        )
    }

    /// Full terminal frame: canvas, description line and status bar.
    pub fn frame(&self) -> String {
        let mut out = String::from("\x1b[H");
        out.push_str(&self.canvas.render());

        let width = self.cols as usize;
        let description: String = self.controller.description().chars().take(width).collect();
        let _ = write!(out, "\x1b[{};1H\x1b[0m\x1b[2K{}", self.canvas_rows() + 1, description);

        if !self.hide_status {
            let status: String = self.status_line().chars().take(width).collect();
            let _ = write!(
                out,
                "\x1b[{};1H\x1b[7m{:<width$}\x1b[0m",
                self.rows,
                status,
                width = width
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::PlaybackState;
    use std::time::Duration;

    fn stage() -> Stage {
        Stage::new(StageOptions {
            cols: 60,
            rows: 20,
            render_mode: RenderMode::HalfBlock,
            color_mode: ColorMode::TrueColor,
            color_quant: 0,
            hide_status: false,
            speed: 1.0,
        })
    }

    #[test]
    fn test_open_allocates_canvas_and_renders() {
        let mut s = stage();
        assert!(s.open("pattern-9-two-heaps"));
        assert_eq!(s.pattern().map(|p| p.name), Some("two-heaps"));
        assert_eq!(s.canvas().term_size(), (60, 18));
        assert_eq!(s.controller().state(), PlaybackState::Ready);
        assert!(s.canvas().pixels.iter().any(|&p| p > 0.0));
    }

    #[test]
    fn test_unknown_pattern_keeps_current() {
        let mut s = stage();
        s.open("cyclic-sort");
        assert!(!s.open("no-such-pattern"));
        assert_eq!(s.pattern().map(|p| p.name), Some("cyclic-sort"));
    }

    #[test]
    fn test_switch_cancels_playback() {
        let t0 = Instant::now();
        let mut s = stage();
        s.open("two-pointers");
        s.apply(Command::Play, t0);
        assert!(s.tick(t0 + Duration::from_millis(1000)));
        s.apply(Command::NextPattern, t0 + Duration::from_millis(1100));
        assert_eq!(s.pattern().map(|p| p.name), Some("sliding-window"));
        assert_eq!(s.controller().state(), PlaybackState::Ready);
        assert!(!s.tick(t0 + Duration::from_millis(5000)));
    }

    #[test]
    fn test_pattern_navigation_wraps() {
        let now = Instant::now();
        let mut s = stage();
        s.apply(Command::PreviousPattern, now);
        assert_eq!(s.pattern().map(|p| p.name), Some("two-pointers"));
        s.apply(Command::PreviousPattern, now);
        assert_eq!(s.pattern().map(|p| p.name), Some("activity-selection"));
        s.apply(Command::NextPattern, now);
        assert_eq!(s.pattern().map(|p| p.name), Some("two-pointers"));
    }

    #[test]
    fn test_resize_keeps_step() {
        let t0 = Instant::now();
        let mut s = stage();
        s.open("tree-bfs");
        s.apply(Command::Play, t0);
        s.tick(t0 + Duration::from_millis(1000));
        s.tick(t0 + Duration::from_millis(2000));
        s.resize(80, 30);
        assert_eq!(s.canvas().term_size(), (80, 28));
        assert_eq!(s.controller().step(), 2);
        assert!(s.canvas().pixels.iter().any(|&p| p > 0.0));
        s.resize(3, 3);
        assert_eq!(s.canvas().term_size(), (80, 28));
    }

    #[test]
    fn test_speed_keys_step_and_clamp() {
        let now = Instant::now();
        let mut s = stage();
        s.apply(Command::Faster, now);
        assert!((s.controller().speed() - 1.1).abs() < 1e-9);
        for _ in 0..20 {
            s.apply(Command::Faster, now);
        }
        assert_eq!(s.controller().speed(), 2.0);
        s.apply(Command::Speed(0.2), now);
        assert_eq!(s.controller().speed(), 0.5);
    }

    #[test]
    fn test_frame_shows_description_and_status() {
        let mut s = stage();
        s.open("two-pointers");
        let frame = s.frame();
        assert!(frame.contains("Initialize: left = 0, right = 6"));
        assert!(frame.contains("step 0"));
        s.apply(Command::ToggleStatus, Instant::now());
        assert!(!s.frame().contains("| step 0 |"));
        assert_eq!(s.canvas().term_size(), (60, 19));
    }

    #[test]
    fn test_cycle_render_mode_rebuilds() {
        let mut s = stage();
        s.open("subsets");
        s.apply(Command::CycleRender, Instant::now());
        assert_eq!(s.canvas().render_mode, RenderMode::Braille);
        assert_eq!(s.canvas().width, 120);
        assert!(s.take_dirty());
        assert!(!s.take_dirty());
    }
}
