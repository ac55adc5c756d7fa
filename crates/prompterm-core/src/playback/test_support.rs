//! Hand-driven surface and frame source for engine and coordinator tests

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use super::engine::{FrameId, FrameScheduler, ScrollExtent, Surface};

#[derive(Debug)]
struct FramesState {
    now: Instant,
    next_id: u64,
    pending: Vec<FrameId>,
    cancelled: Vec<FrameId>,
}

/// Frame source whose clock only moves when the test advances it
#[derive(Debug, Clone)]
pub struct ManualFrames {
    state: Rc<RefCell<FramesState>>,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(FramesState {
                now: Instant::now(),
                next_id: 1,
                pending: Vec::new(),
                cancelled: Vec::new(),
            })),
        }
    }

    /// Move the clock forward and hand out the oldest pending frame
    pub fn advance(&self, step: Duration) -> Option<(FrameId, Instant)> {
        let mut state = self.state.borrow_mut();
        state.now += step;
        if state.pending.is_empty() {
            return None;
        }
        let id = state.pending.remove(0);
        Some((id, state.now))
    }

    pub fn now(&self) -> Instant {
        self.state.borrow().now
    }

    pub fn set_now(&self, now: Instant) {
        self.state.borrow_mut().now = now;
    }

    pub fn pending(&self) -> Vec<FrameId> {
        self.state.borrow().pending.clone()
    }

    pub fn cancelled(&self) -> Vec<FrameId> {
        self.state.borrow().cancelled.clone()
    }
}

impl FrameScheduler for ManualFrames {
    fn now(&self) -> Instant {
        self.state.borrow().now
    }

    fn request_frame(&mut self) -> FrameId {
        let mut state = self.state.borrow_mut();
        let id = FrameId::new(state.next_id);
        state.next_id += 1;
        state.pending.push(id);
        id
    }

    fn cancel_frame(&mut self, id: FrameId) {
        let mut state = self.state.borrow_mut();
        state.pending.retain(|pending| *pending != id);
        state.cancelled.push(id);
    }
}

#[derive(Debug, Default)]
struct SurfaceState {
    offset: f64,
    extent: ScrollExtent,
    animating: bool,
    apply_count: usize,
    released: bool,
}

/// Surface that records what the engine does to it
///
/// Dropping any handle marks the surface released.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    state: Rc<RefCell<SurfaceState>>,
}

impl RecordingSurface {
    pub fn new(extent: ScrollExtent) -> Self {
        Self {
            state: Rc::new(RefCell::new(SurfaceState {
                extent,
                ..Default::default()
            })),
        }
    }

    pub fn offset(&self) -> f64 {
        self.state.borrow().offset
    }

    pub fn set_extent(&self, extent: ScrollExtent) {
        self.state.borrow_mut().extent = extent;
    }

    pub fn animating(&self) -> bool {
        self.state.borrow().animating
    }

    pub fn apply_count(&self) -> usize {
        self.state.borrow().apply_count
    }

    pub fn released(&self) -> bool {
        self.state.borrow().released
    }
}

impl Surface for RecordingSurface {
    fn apply_offset(&mut self, offset: f64) {
        let mut state = self.state.borrow_mut();
        state.offset = offset;
        state.apply_count += 1;
    }

    fn extent(&self) -> ScrollExtent {
        self.state.borrow().extent
    }

    fn set_animating(&mut self, animating: bool) {
        self.state.borrow_mut().animating = animating;
    }
}

impl Drop for RecordingSurface {
    fn drop(&mut self) {
        self.state.borrow_mut().released = true;
    }
}
