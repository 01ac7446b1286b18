use std::time::{Duration, Instant};

use crate::animations::{self, Frame, Simulator};
use crate::render::Surface;

/// Interval between ticks at speed 1.0.
pub const BASE_INTERVAL: Duration = Duration::from_millis(1000);
pub const MIN_SPEED: f64 = 0.5;
pub const MAX_SPEED: f64 = 2.0;
/// Increment used by the faster/slower keys.
pub const SPEED_STEP: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// No pattern active
    Idle,
    /// Pattern loaded, showing step 0
    Ready,
    Playing,
    /// Stopped mid-sequence, step kept
    Paused,
}

/// A tick handed out by [`Controller::due`]. It is only honoured if no
/// schedule change happened since it was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    generation: u64,
}

#[derive(Debug, Clone, Copy)]
struct Schedule {
    interval: Duration,
    next_due: Instant,
}

/// Recurring tick source. Every `schedule` or `cancel` starts a new
/// generation, which invalidates tokens of the previous one.
#[derive(Debug, Default)]
struct Timer {
    generation: u64,
    schedule: Option<Schedule>,
}

impl Timer {
    fn schedule(&mut self, interval: Duration, now: Instant) {
        self.generation += 1;
        self.schedule = Some(Schedule {
            interval,
            next_due: now + interval,
        });
    }

    fn cancel(&mut self) {
        if self.schedule.take().is_some() {
            self.generation += 1;
        }
    }

    fn due(&self, now: Instant) -> Option<Tick> {
        let schedule = self.schedule?;
        (schedule.next_due <= now).then_some(Tick {
            generation: self.generation,
        })
    }

    /// Consumes a due tick. Missed intervals are skipped rather than
    /// replayed in a burst.
    fn fire(&mut self, tick: Tick, now: Instant) -> bool {
        if tick.generation != self.generation {
            return false;
        }
        let Some(schedule) = self.schedule.as_mut() else {
            return false;
        };
        schedule.next_due += schedule.interval;
        if schedule.next_due <= now {
            schedule.next_due = now + schedule.interval;
        }
        true
    }

    fn next_due(&self) -> Option<Instant> {
        self.schedule.map(|s| s.next_due)
    }
}

#[derive(Debug, Clone)]
struct Active {
    name: String,
    simulate: Simulator,
}

/// Step-indexed playback of one pattern at a time.
///
/// Time is always passed in, so the same controller runs against the wall
/// clock in the terminal loop and against a virtual clock in tests.
#[derive(Debug)]
pub struct Controller {
    state: PlaybackState,
    step: usize,
    speed: f64,
    active: Option<Active>,
    description: String,
    timer: Timer,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller {
    pub fn new() -> Self {
        Controller {
            state: PlaybackState::Idle,
            step: 0,
            speed: 1.0,
            active: None,
            description: String::new(),
            timer: Timer::default(),
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Canonical name of the active pattern.
    pub fn pattern(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.name.as_str())
    }

    /// Description of the last frame that supplied one.
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn interval(&self) -> Duration {
        BASE_INTERVAL.div_f64(self.speed)
    }

    /// Activates the pattern registered under `id` and renders its first
    /// frame. Unknown ids leave the controller untouched and return false.
    pub fn activate(&mut self, id: &str, surface: &mut dyn Surface) -> bool {
        let Some(entry) = animations::entry(id) else {
            return false;
        };
        self.load(entry.name, entry.simulate, surface);
        true
    }

    /// Activates an arbitrary simulator under `name`.
    pub fn load(&mut self, name: &str, simulate: Simulator, surface: &mut dyn Surface) {
        self.timer.cancel();
        self.active = Some(Active {
            name: name.to_string(),
            simulate,
        });
        self.description.clear();
        self.render_first(surface);
        tracing::debug!(pattern = name, "activated");
    }

    /// Drops the active pattern, e.g. before switching to another one.
    pub fn deactivate(&mut self) {
        self.timer.cancel();
        self.active = None;
        self.step = 0;
        self.description.clear();
        self.state = PlaybackState::Idle;
    }

    pub fn play(&mut self, now: Instant) {
        if !matches!(self.state, PlaybackState::Ready | PlaybackState::Paused) {
            return;
        }
        self.timer.schedule(self.interval(), now);
        self.state = PlaybackState::Playing;
        tracing::debug!(step = self.step, "playing");
    }

    pub fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        self.timer.cancel();
        self.state = PlaybackState::Paused;
        tracing::debug!(step = self.step, "paused");
    }

    pub fn toggle(&mut self, now: Instant) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play(now);
        }
    }

    /// Back to step 0 from any state.
    pub fn reset(&mut self, surface: &mut dyn Surface) {
        self.timer.cancel();
        if self.active.is_some() {
            self.description.clear();
            self.render_first(surface);
        } else {
            self.step = 0;
            self.state = PlaybackState::Idle;
        }
    }

    /// Sets the speed multiplier, clamped to `MIN_SPEED..=MAX_SPEED`.
    /// While playing the timer is replaced, so ticks of the old interval
    /// never fire.
    pub fn set_speed(&mut self, multiplier: f64, now: Instant) {
        if !multiplier.is_finite() {
            return;
        }
        self.speed = multiplier.clamp(MIN_SPEED, MAX_SPEED);
        if self.is_playing() {
            self.timer.schedule(self.interval(), now);
        }
        tracing::debug!(speed = self.speed, "speed changed");
    }

    /// Redraws the current step, e.g. onto a freshly created surface.
    pub fn redraw(&self, surface: &mut dyn Surface) {
        if let Some(active) = &self.active {
            (active.simulate)(surface, self.step);
        }
    }

    /// Token for the tick that is due at `now`, if any.
    pub fn due(&self, now: Instant) -> Option<Tick> {
        self.timer.due(now)
    }

    /// Time left until the next tick, `None` when nothing is scheduled.
    pub fn until_next(&self, now: Instant) -> Option<Duration> {
        self.timer
            .next_due()
            .map(|due| due.saturating_duration_since(now))
    }

    /// Advances one step for `tick`. Stale tokens are dropped and return
    /// false.
    pub fn deliver(&mut self, tick: Tick, surface: &mut dyn Surface, now: Instant) -> bool {
        if !self.timer.fire(tick, now) {
            tracing::trace!("dropped stale tick");
            return false;
        }
        let Some(active) = self.active.clone() else {
            self.timer.cancel();
            return false;
        };
        self.step += 1;
        match (active.simulate)(surface, self.step) {
            Frame::Finished => {
                self.timer.cancel();
                self.step -= 1;
                (active.simulate)(surface, self.step);
                self.state = PlaybackState::Paused;
                tracing::info!(pattern = %active.name, step = self.step, "playback finished");
            }
            Frame::Continuing { description } => {
                if !description.is_empty() {
                    self.description = description;
                }
            }
        }
        true
    }

    /// Delivers the tick due at `now`, if there is one.
    pub fn pump(&mut self, surface: &mut dyn Surface, now: Instant) -> bool {
        match self.due(now) {
            Some(tick) => self.deliver(tick, surface, now),
            None => false,
        }
    }

    fn render_first(&mut self, surface: &mut dyn Surface) {
        self.step = 0;
        if let Some(active) = &self.active
            && let Frame::Continuing { description } = (active.simulate)(surface, 0)
            && !description.is_empty()
        {
            self.description = description;
        }
        self.state = PlaybackState::Ready;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingSurface;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    /// Runs the controller from `start` to `start + span`, pumping every 10ms.
    fn run(c: &mut Controller, s: &mut RecordingSurface, start: Instant, span: u64) -> usize {
        let mut ticks = 0;
        for t in (10..=span).step_by(10) {
            if c.pump(s, start + ms(t)) {
                ticks += 1;
            }
        }
        ticks
    }

    fn steady(_: &mut dyn Surface, step: usize) -> Frame {
        Frame::describe(format!("step {step}"))
    }

    fn ends_after_three(_: &mut dyn Surface, step: usize) -> Frame {
        if step > 3 { Frame::Finished } else { Frame::describe(format!("step {step}")) }
    }

    fn silent_odd(_: &mut dyn Surface, step: usize) -> Frame {
        if step % 2 == 1 { Frame::describe("") } else { Frame::describe(format!("even {step}")) }
    }

    #[test]
    fn test_activate_renders_first_frame() {
        let mut c = Controller::new();
        let mut s = RecordingSurface::new();
        assert!(c.activate("pattern-1-two-pointers-converging-sorted-array-target-sum", &mut s));
        assert_eq!(c.state(), PlaybackState::Ready);
        assert_eq!(c.step(), 0);
        assert_eq!(c.pattern(), Some("two-pointers"));
        assert!(!s.calls().is_empty());
        assert!(c.description().starts_with("Initialize"));
    }

    #[test]
    fn test_activate_miss_is_noop() {
        let mut c = Controller::new();
        let mut s = RecordingSurface::new();
        assert!(!c.activate("nope", &mut s));
        assert_eq!(c.state(), PlaybackState::Idle);
        assert!(s.calls().is_empty());
        c.play(Instant::now());
        assert_eq!(c.state(), PlaybackState::Idle);
    }

    #[test]
    fn test_ticks_follow_interval() {
        let mut c = Controller::new();
        let mut s = RecordingSurface::new();
        let t0 = Instant::now();
        c.load("steady", steady, &mut s);
        c.play(t0);
        assert_eq!(run(&mut c, &mut s, t0, 3500), 3);
        assert_eq!(c.step(), 3);
        assert_eq!(c.description(), "step 3");
    }

    #[test]
    fn test_reset_from_any_state() {
        let t0 = Instant::now();
        let mut s = RecordingSurface::new();

        let mut c = Controller::new();
        c.reset(&mut s);
        assert_eq!((c.state(), c.step()), (PlaybackState::Idle, 0));

        c.load("steady", steady, &mut s);
        c.reset(&mut s);
        assert_eq!((c.state(), c.step()), (PlaybackState::Ready, 0));

        c.play(t0);
        run(&mut c, &mut s, t0, 2000);
        c.reset(&mut s);
        assert_eq!((c.state(), c.step()), (PlaybackState::Ready, 0));
        assert!(!c.is_playing());
        assert_eq!(c.until_next(t0), None);

        c.play(t0);
        run(&mut c, &mut s, t0, 1000);
        c.pause();
        c.reset(&mut s);
        assert_eq!((c.state(), c.step()), (PlaybackState::Ready, 0));
        assert_eq!(c.description(), "step 0");
    }

    #[test]
    fn test_double_pause_is_idempotent() {
        let t0 = Instant::now();
        let mut c = Controller::new();
        let mut s = RecordingSurface::new();
        c.load("steady", steady, &mut s);
        c.play(t0);
        run(&mut c, &mut s, t0, 1000);
        c.pause();
        c.pause();
        assert_eq!((c.state(), c.step()), (PlaybackState::Paused, 1));
        assert_eq!(run(&mut c, &mut s, t0, 5000), 0);
    }

    #[test]
    fn test_speed_change_never_doubles_ticks() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        fn counting(_: &mut dyn Surface, step: usize) -> Frame {
            CALLS.fetch_add(1, Ordering::SeqCst);
            Frame::describe(format!("step {step}"))
        }

        let t0 = Instant::now();
        let mut c = Controller::new();
        let mut s = RecordingSurface::new();
        c.load("counting", counting, &mut s);
        CALLS.store(0, Ordering::SeqCst);
        c.play(t0);
        c.set_speed(2.0, t0);
        assert_eq!(run(&mut c, &mut s, t0, 3000), 6);
        assert_eq!(CALLS.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn test_stale_tick_is_dropped() {
        let t0 = Instant::now();
        let mut c = Controller::new();
        let mut s = RecordingSurface::new();
        c.load("steady", steady, &mut s);
        c.play(t0);
        let stale = c.due(t0 + ms(1000)).unwrap();
        c.set_speed(0.5, t0 + ms(1000));
        assert!(!c.deliver(stale, &mut s, t0 + ms(1000)));
        assert_eq!(c.step(), 0);
        assert_eq!(c.until_next(t0 + ms(1000)), Some(ms(2000)));

        let stale = c.due(t0 + ms(3000)).unwrap();
        c.pause();
        c.play(t0 + ms(3000));
        assert!(!c.deliver(stale, &mut s, t0 + ms(3000)));
    }

    #[test]
    fn test_speed_is_clamped() {
        let now = Instant::now();
        let mut c = Controller::new();
        c.set_speed(10.0, now);
        assert_eq!(c.speed(), MAX_SPEED);
        c.set_speed(0.1, now);
        assert_eq!(c.speed(), MIN_SPEED);
        assert_eq!(c.interval(), ms(2000));
        c.set_speed(f64::NAN, now);
        assert_eq!(c.speed(), MIN_SPEED);
    }

    #[test]
    fn test_finished_restores_last_step_and_pauses() {
        let t0 = Instant::now();
        let mut c = Controller::new();
        let mut s = RecordingSurface::new();
        c.load("short", ends_after_three, &mut s);
        c.play(t0);
        assert_eq!(run(&mut c, &mut s, t0, 10_000), 4);
        assert_eq!(c.state(), PlaybackState::Paused);
        assert_eq!(c.step(), 3);
        assert_eq!(c.description(), "step 3");
        assert_eq!(c.until_next(t0), None);
    }

    #[test]
    fn test_empty_description_keeps_previous() {
        let t0 = Instant::now();
        let mut c = Controller::new();
        let mut s = RecordingSurface::new();
        c.load("silent", silent_odd, &mut s);
        assert_eq!(c.description(), "even 0");
        c.play(t0);
        run(&mut c, &mut s, t0, 1000);
        assert_eq!(c.description(), "even 0");
        run(&mut c, &mut s, t0 + ms(1000), 1000);
        assert_eq!(c.description(), "even 2");
    }

    #[test]
    fn test_late_pump_does_not_burst() {
        let t0 = Instant::now();
        let mut c = Controller::new();
        let mut s = RecordingSurface::new();
        c.load("steady", steady, &mut s);
        c.play(t0);
        assert!(c.pump(&mut s, t0 + ms(5000)));
        assert!(!c.pump(&mut s, t0 + ms(5000)));
        assert_eq!(c.step(), 1);
        assert_eq!(c.until_next(t0 + ms(5000)), Some(ms(1000)));
    }

    #[test]
    fn test_toggle_and_deactivate() {
        let t0 = Instant::now();
        let mut c = Controller::new();
        let mut s = RecordingSurface::new();
        c.load("steady", steady, &mut s);
        c.toggle(t0);
        assert!(c.is_playing());
        c.toggle(t0);
        assert_eq!(c.state(), PlaybackState::Paused);
        c.toggle(t0);
        c.deactivate();
        assert_eq!(c.state(), PlaybackState::Idle);
        assert_eq!(c.pattern(), None);
        assert_eq!(run(&mut c, &mut s, t0, 3000), 0);
    }
}
