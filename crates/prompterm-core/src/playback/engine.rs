//! Frame-driven scroll engine
//!
//! The engine integrates position over wall-clock time: every frame it
//! measures the time since the previous frame and advances by
//! `rate(speed) * elapsed`. Frames come from a [`FrameScheduler`] paced by
//! the host's display refresh, so motion stays smooth when frame times vary.
//!
//! Every operation is infallible. Calls on a destroyed engine, or frames
//! that arrive after their request was cancelled, are silently dropped.

use std::time::Instant;

use tracing::{debug, trace};

use super::speed::Speed;

/// Scrollable extent of a surface, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollExtent {
    pub content_height: f64,
    pub viewport_height: f64,
}

impl ScrollExtent {
    pub fn new(content_height: f64, viewport_height: f64) -> Self {
        Self {
            content_height,
            viewport_height,
        }
    }

    /// Largest offset that still keeps content in the viewport
    pub fn max_offset(&self) -> f64 {
        (self.content_height - self.viewport_height).max(0.0)
    }
}

/// Visual element whose offset the engine drives
pub trait Surface {
    /// Move the content to `offset` pixels from the top
    fn apply_offset(&mut self, offset: f64);

    /// Current scrollable extent, read at call time
    fn extent(&self) -> ScrollExtent;

    /// Hint that continuous motion is starting or ending
    fn set_animating(&mut self, _animating: bool) {}
}

/// Handle for a requested frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(u64);

impl FrameId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Display-paced frame source
///
/// The host delivers each requested frame back through
/// [`ScrollEngine::frame`] with the frame's timestamp.
pub trait FrameScheduler {
    /// Monotonic clock the frame timestamps are measured against
    fn now(&self) -> Instant;

    /// Ask for one callback on the next frame
    fn request_frame(&mut self) -> FrameId;

    /// Withdraw a request that has not been delivered yet
    fn cancel_frame(&mut self, id: FrameId);
}

/// Receives the engine position after every change
pub trait PositionObserver {
    fn position_changed(&mut self, position: f64);
}

impl<F: FnMut(f64)> PositionObserver for F {
    fn position_changed(&mut self, position: f64) {
        self(position)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Playing,
    Paused,
}

struct Binding {
    surface: Box<dyn Surface>,
    scheduler: Box<dyn FrameScheduler>,
    observer: Option<Box<dyn PositionObserver>>,
}

impl Binding {
    fn publish(&mut self, position: f64) {
        self.surface.apply_offset(position);
        if let Some(observer) = self.observer.as_mut() {
            observer.position_changed(position);
        }
    }
}

pub struct ScrollEngine {
    /// `None` once destroyed
    binding: Option<Binding>,
    state: EngineState,
    position: f64,
    speed: Speed,
    last_timestamp: Option<Instant>,
    pending_frame: Option<FrameId>,
}

impl ScrollEngine {
    /// Bind a new engine to a surface and frame source
    pub fn new(
        surface: impl Surface + 'static,
        scheduler: impl FrameScheduler + 'static,
    ) -> Self {
        Self {
            binding: Some(Binding {
                surface: Box::new(surface),
                scheduler: Box::new(scheduler),
                observer: None,
            }),
            state: EngineState::Idle,
            position: 0.0,
            speed: Speed::default(),
            last_timestamp: None,
            pending_frame: None,
        }
    }

    /// Attach the position observer
    pub fn with_observer(mut self, observer: impl PositionObserver + 'static) -> Self {
        if let Some(binding) = self.binding.as_mut() {
            binding.observer = Some(Box::new(observer));
        }
        self
    }

    /// Begin scrolling at `speed`. No-op while already playing.
    pub fn start(&mut self, speed: Speed) {
        if self.state == EngineState::Playing {
            return;
        }
        let Some(binding) = self.binding.as_mut() else {
            return;
        };

        self.speed = speed;
        self.state = EngineState::Playing;
        self.last_timestamp = Some(binding.scheduler.now());
        binding.surface.set_animating(true);
        self.pending_frame = Some(binding.scheduler.request_frame());
        debug!(speed = speed.level(), position = self.position, "Scroll engine started");
    }

    /// Frame callback
    ///
    /// Frames whose id is not the currently pending request are stale and
    /// ignored, so a callback racing a pause can never move the surface.
    pub fn frame(&mut self, id: FrameId, timestamp: Instant) {
        if self.pending_frame != Some(id) {
            trace!(frame = id.raw(), "Dropping stale frame");
            return;
        }
        self.pending_frame = None;

        if self.state != EngineState::Playing {
            return;
        }
        let Some(binding) = self.binding.as_mut() else {
            return;
        };

        let elapsed = self
            .last_timestamp
            .map(|last| timestamp.saturating_duration_since(last))
            .unwrap_or_default();
        self.last_timestamp = Some(timestamp);

        self.position += self.speed.pixels_per_second() * elapsed.as_secs_f64();
        binding.publish(self.position);

        self.pending_frame = Some(binding.scheduler.request_frame());
    }

    /// Stop the frame loop, keeping the position
    pub fn pause(&mut self) {
        let Some(binding) = self.binding.as_mut() else {
            return;
        };

        if let Some(id) = self.pending_frame.take() {
            binding.scheduler.cancel_frame(id);
        }
        if self.state == EngineState::Playing {
            self.state = EngineState::Paused;
            debug!(position = self.position, "Scroll engine paused");
        }
        binding.surface.set_animating(false);
    }

    /// Pause and rewind to the top
    pub fn stop(&mut self) {
        if self.binding.is_none() {
            return;
        }
        self.pause();
        self.state = EngineState::Idle;
        self.position = 0.0;
        if let Some(binding) = self.binding.as_mut() {
            binding.publish(0.0);
        }
        debug!("Scroll engine stopped");
    }

    /// Change speed; restarts the loop when playing so the new rate
    /// applies from the next frame on
    pub fn set_speed(&mut self, speed: Speed) {
        if self.binding.is_none() {
            return;
        }
        if self.state == EngineState::Playing {
            self.pause();
            self.start(speed);
        } else {
            self.speed = speed;
        }
    }

    /// Set the position directly, regardless of play state
    ///
    /// Negative and non-finite positions become 0. There is no upper bound.
    pub fn jump_to_position(&mut self, position: f64) {
        let Some(binding) = self.binding.as_mut() else {
            return;
        };

        self.position = if position.is_finite() {
            position.max(0.0)
        } else {
            0.0
        };
        binding.publish(self.position);
    }

    pub fn jump_to_top(&mut self) {
        self.jump_to_position(0.0);
    }

    /// Jump to the surface's maximum offset as laid out right now
    pub fn jump_to_end(&mut self) {
        let Some(binding) = self.binding.as_ref() else {
            return;
        };
        let max_offset = binding.surface.extent().max_offset();
        self.jump_to_position(max_offset);
    }

    /// Release the surface and observer; the engine is inert afterwards
    pub fn destroy(&mut self) {
        if self.binding.is_none() {
            return;
        }
        self.pause();
        self.binding = None;
        self.state = EngineState::Idle;
        debug!(position = self.position, "Scroll engine destroyed");
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.state == EngineState::Playing
    }

    #[inline]
    pub fn position(&self) -> f64 {
        self.position
    }

    #[inline]
    pub fn speed(&self) -> Speed {
        self.speed
    }

    #[inline]
    pub fn state(&self) -> EngineState {
        self.state
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.binding.is_none()
    }

    /// Frame request currently awaiting delivery
    #[inline]
    pub fn pending_frame(&self) -> Option<FrameId> {
        self.pending_frame
    }

    /// Extent of the bound surface, if still bound
    pub fn extent(&self) -> Option<ScrollExtent> {
        self.binding.as_ref().map(|binding| binding.surface.extent())
    }
}

impl Drop for ScrollEngine {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl std::fmt::Debug for ScrollEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollEngine")
            .field("state", &self.state)
            .field("position", &self.position)
            .field("speed", &self.speed)
            .field("pending_frame", &self.pending_frame)
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use super::super::speed::rate;
    use super::super::test_support::{ManualFrames, RecordingSurface};
    use super::*;

    fn engine() -> (ScrollEngine, RecordingSurface, ManualFrames) {
        let surface = RecordingSurface::new(ScrollExtent::new(2000.0, 500.0));
        let frames = ManualFrames::new();
        let engine = ScrollEngine::new(surface.clone(), frames.clone());
        (engine, surface, frames)
    }

    fn run_for(engine: &mut ScrollEngine, frames: &ManualFrames, step: Duration, count: u32) {
        for _ in 0..count {
            let (id, now) = frames.advance(step).expect("frame should be pending");
            engine.frame(id, now);
        }
    }

    #[test]
    fn test_one_second_at_speed_five() {
        let (mut engine, surface, frames) = engine();
        engine.start(Speed::new(5));
        run_for(&mut engine, &frames, Duration::from_millis(20), 50);

        let expected = rate(5);
        let position = engine.position();
        assert!(
            (position - expected).abs() <= expected * 0.01,
            "position {} not within 1% of {}",
            position,
            expected
        );
        assert_eq!(surface.offset(), position);
    }

    #[test]
    fn test_variable_frame_times_integrate_the_same() {
        let (mut engine, _surface, frames) = engine();
        engine.start(Speed::new(3));
        for ms in [5, 40, 16, 100, 33, 6, 300, 500] {
            let (id, now) = frames.advance(Duration::from_millis(ms)).unwrap();
            engine.frame(id, now);
        }
        assert!((engine.position() - rate(3)).abs() < 1e-6);
    }

    #[test]
    fn test_start_then_pause_keeps_position() {
        let (mut engine, _surface, frames) = engine();
        engine.jump_to_position(120.0);
        engine.start(Speed::new(7));
        engine.pause();

        assert_eq!(engine.position(), 120.0);
        assert_eq!(engine.state(), EngineState::Paused);
        assert!(frames.pending().is_empty());
    }

    #[test]
    fn test_start_is_noop_while_playing() {
        let (mut engine, _surface, frames) = engine();
        engine.start(Speed::new(2));
        let first = engine.pending_frame();
        engine.start(Speed::new(9));

        assert_eq!(engine.pending_frame(), first);
        assert_eq!(engine.speed().level(), 2);
        assert_eq!(frames.pending().len(), 1);
    }

    #[test]
    fn test_pause_cancels_pending_frame() {
        let (mut engine, surface, frames) = engine();
        engine.start(Speed::new(5));
        let id = engine.pending_frame().unwrap();
        engine.pause();

        assert_eq!(frames.cancelled(), vec![id]);
        // A frame that slipped through after the pause must not move anything
        engine.frame(id, frames.now() + Duration::from_secs(1));
        assert_eq!(engine.position(), 0.0);
        assert_eq!(surface.apply_count(), 0);
        assert!(!surface.animating());
    }

    #[test]
    fn test_resume_preserves_position() {
        let (mut engine, _surface, frames) = engine();
        engine.start(Speed::new(4));
        run_for(&mut engine, &frames, Duration::from_millis(100), 5);
        let paused_at = engine.position();
        engine.pause();

        // Time passing while paused does not count
        frames.set_now(frames.now() + Duration::from_secs(10));
        engine.start(Speed::new(4));
        assert_eq!(engine.position(), paused_at);

        run_for(&mut engine, &frames, Duration::from_millis(100), 5);
        assert!((engine.position() - 2.0 * paused_at).abs() < 1e-6);
    }

    #[test]
    fn test_stop_resets_from_any_state() {
        let (mut engine, surface, frames) = engine();
        engine.start(Speed::new(6));
        run_for(&mut engine, &frames, Duration::from_millis(50), 4);
        engine.stop();

        assert_eq!(engine.position(), 0.0);
        assert!(!engine.is_playing());
        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(surface.offset(), 0.0);

        engine.jump_to_position(40.0);
        engine.stop();
        assert_eq!(engine.position(), 0.0);
    }

    #[test]
    fn test_set_speed_while_playing_preserves_position() {
        let (mut engine, _surface, frames) = engine();
        engine.start(Speed::new(5));
        run_for(&mut engine, &frames, Duration::from_millis(100), 3);
        let before = engine.position();

        engine.set_speed(Speed::new(8));
        assert_eq!(engine.position(), before);
        assert!(engine.is_playing());
        assert_eq!(engine.speed().level(), 8);

        run_for(&mut engine, &frames, Duration::from_millis(100), 1);
        let expected = before + rate(8) * 0.1;
        assert!((engine.position() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_set_speed_while_paused_waits_for_start() {
        let (mut engine, _surface, frames) = engine();
        engine.set_speed(Speed::new(9));
        assert!(!engine.is_playing());
        assert!(frames.pending().is_empty());
        assert_eq!(engine.speed().level(), 9);
    }

    #[test]
    fn test_jump_clamps_only_below_zero() {
        let (mut engine, surface, _frames) = engine();
        engine.jump_to_position(-50.0);
        assert_eq!(engine.position(), 0.0);

        engine.jump_to_position(99_999.0);
        assert_eq!(engine.position(), 99_999.0);
        assert_eq!(surface.offset(), 99_999.0);

        engine.jump_to_position(f64::NAN);
        assert_eq!(engine.position(), 0.0);
    }

    #[test]
    fn test_jump_to_end_reads_extent_at_call_time() {
        let (mut engine, surface, _frames) = engine();
        engine.jump_to_end();
        assert_eq!(engine.position(), 1500.0);

        surface.set_extent(ScrollExtent::new(900.0, 600.0));
        engine.jump_to_end();
        assert_eq!(engine.position(), 300.0);

        surface.set_extent(ScrollExtent::new(100.0, 600.0));
        engine.jump_to_end();
        assert_eq!(engine.position(), 0.0);

        engine.jump_to_position(10.0);
        engine.jump_to_top();
        assert_eq!(engine.position(), 0.0);
    }

    #[test]
    fn test_observer_sees_every_change() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let surface = RecordingSurface::new(ScrollExtent::new(1000.0, 200.0));
        let frames = ManualFrames::new();
        let mut engine = ScrollEngine::new(surface, frames.clone())
            .with_observer(move |position| sink.borrow_mut().push(position));

        engine.jump_to_position(10.0);
        engine.start(Speed::new(1));
        run_for(&mut engine, &frames, Duration::from_millis(500), 2);
        engine.stop();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 4);
        assert_eq!(seen[0], 10.0);
        assert!((seen[1] - 24.0).abs() < 1e-9);
        assert!((seen[2] - 38.0).abs() < 1e-9);
        assert_eq!(seen[3], 0.0);
    }

    #[test]
    fn test_destroyed_engine_ignores_everything() {
        let (mut engine, surface, frames) = engine();
        engine.start(Speed::new(5));
        let id = engine.pending_frame().unwrap();
        engine.destroy();

        assert!(engine.is_destroyed());
        assert!(surface.released());
        assert_eq!(frames.cancelled(), vec![id]);

        engine.start(Speed::new(5));
        engine.jump_to_position(10.0);
        engine.jump_to_end();
        engine.set_speed(Speed::new(2));
        engine.stop();
        engine.frame(id, frames.now());
        engine.destroy();

        assert!(!engine.is_playing());
        assert_eq!(engine.position(), 0.0);
        assert!(engine.extent().is_none());
    }

    #[test]
    fn test_drop_cancels_pending_frame() {
        let (mut engine, _surface, frames) = engine();
        engine.start(Speed::new(5));
        let id = engine.pending_frame().unwrap();
        drop(engine);
        assert_eq!(frames.cancelled(), vec![id]);
    }
}
