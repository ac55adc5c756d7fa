//! Continuous scroll playback
//!
//! # Layers
//!
//! - `speed` - speed levels and the pure speed curve
//! - `engine` - frame-driven position integration bound to one surface
//! - `coordinator` - session state mirroring the single bound engine
//!
//! # Usage
//!
//! ```ignore
//! use prompterm_core::playback::{PlaybackCoordinator, ScrollEngine, Speed};
//!
//! let mut coordinator = PlaybackCoordinator::new(Speed::new(5));
//! let engine = ScrollEngine::new(surface, frames).with_observer(coordinator.position_feed());
//! coordinator.set_scroll_engine(engine);
//!
//! coordinator.play();
//! // In the host loop, deliver each requested frame:
//! coordinator.frame(frame_id, Instant::now());
//! ```

pub mod coordinator;
pub mod engine;
pub mod speed;

#[cfg(test)]
pub(crate) mod test_support;

pub use coordinator::{PlaybackCoordinator, PositionFeed, ScrollState};
pub use engine::{
    EngineState, FrameId, FrameScheduler, PositionObserver, ScrollEngine, ScrollExtent, Surface,
};
pub use speed::{rate, Speed, DEFAULT_SPEED, MAX_SPEED, MIN_SPEED};
