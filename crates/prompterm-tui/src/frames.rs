//! Terminal frame pacing
//!
//! Terminals have no vsync callback, so frames are paced at the configured
//! animation FPS. The event loop asks how long until the next frame is due,
//! polls input for at most that long, then delivers the due frames.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use prompterm_core::playback::{FrameId, FrameScheduler};

#[derive(Debug)]
struct FrameQueue {
    next_id: u64,
    pending: Vec<FrameId>,
    interval: Duration,
    last_frame: Option<Instant>,
}

/// Frame scheduler shared between the event loop and the scroll engine
#[derive(Debug, Clone)]
pub struct TerminalFrames {
    queue: Rc<RefCell<FrameQueue>>,
}

impl TerminalFrames {
    pub fn new(fps: u32) -> Self {
        let interval = if fps == 0 {
            Duration::from_millis(16) // ~60fps fallback
        } else {
            Duration::from_nanos(1_000_000_000 / u64::from(fps))
        };
        Self {
            queue: Rc::new(RefCell::new(FrameQueue {
                next_id: 1,
                pending: Vec::new(),
                interval,
                last_frame: None,
            })),
        }
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.queue.borrow().interval
    }

    pub fn has_pending(&self) -> bool {
        !self.queue.borrow().pending.is_empty()
    }

    /// How long until a pending frame is due; `None` when nothing is pending
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        let queue = self.queue.borrow();
        if queue.pending.is_empty() {
            return None;
        }
        Some(match queue.last_frame {
            Some(last) => (last + queue.interval).saturating_duration_since(now),
            None => Duration::ZERO,
        })
    }

    /// Remove and return the frames due at `now`
    pub fn take_due(&self, now: Instant) -> Vec<FrameId> {
        let mut queue = self.queue.borrow_mut();
        if queue.pending.is_empty() {
            return Vec::new();
        }
        if let Some(last) = queue.last_frame {
            if now < last + queue.interval {
                return Vec::new();
            }
        }
        queue.last_frame = Some(now);
        std::mem::take(&mut queue.pending)
    }
}

impl FrameScheduler for TerminalFrames {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn request_frame(&mut self) -> FrameId {
        let mut queue = self.queue.borrow_mut();
        let id = FrameId::new(queue.next_id);
        queue.next_id += 1;
        queue.pending.push(id);
        id
    }

    fn cancel_frame(&mut self, id: FrameId) {
        self.queue.borrow_mut().pending.retain(|pending| *pending != id);
    }
}
