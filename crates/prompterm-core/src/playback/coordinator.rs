//! Session-wide playback state
//!
//! The coordinator is the single place UI code reads transport state from.
//! It owns at most one [`ScrollEngine`] and mirrors the engine's playing
//! flag, position and speed. Position flows back from the engine through a
//! watch channel that the coordinator drains after every delegated call.

use std::time::Instant;

use serde::Serialize;
use tokio::sync::watch;
use tracing::info;

use super::engine::{FrameId, PositionObserver, ScrollEngine};
use super::speed::Speed;

/// Snapshot of the transport state
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScrollState {
    pub playing: bool,
    pub position: f64,
    pub speed: Speed,
}

/// Observer handed to engines so their position reaches the coordinator
#[derive(Debug, Clone)]
pub struct PositionFeed {
    tx: watch::Sender<f64>,
}

impl PositionObserver for PositionFeed {
    fn position_changed(&mut self, position: f64) {
        self.tx.send_replace(position);
    }
}

#[derive(Debug)]
pub struct PlaybackCoordinator {
    playing: bool,
    speed: Speed,
    position: f64,
    engine: Option<ScrollEngine>,
    position_tx: watch::Sender<f64>,
    position_rx: watch::Receiver<f64>,
}

impl Default for PlaybackCoordinator {
    fn default() -> Self {
        Self::new(Speed::default())
    }
}

impl PlaybackCoordinator {
    /// Start a session at the given speed with no engine bound
    pub fn new(speed: Speed) -> Self {
        let (position_tx, position_rx) = watch::channel(0.0);
        Self {
            playing: false,
            speed,
            position: 0.0,
            engine: None,
            position_tx,
            position_rx,
        }
    }

    /// Observer to attach to an engine before binding it
    pub fn position_feed(&self) -> PositionFeed {
        PositionFeed {
            tx: self.position_tx.clone(),
        }
    }

    /// Bind a new engine, destroying the previous one first
    pub fn set_scroll_engine(&mut self, engine: ScrollEngine) {
        if let Some(mut previous) = self.engine.take() {
            previous.destroy();
            info!(position = previous.position(), "Released previous scroll engine");
        }

        // Whatever the old engine reported last is no longer relevant
        let _ = self.position_rx.borrow_and_update();
        self.playing = engine.is_playing();
        self.position = engine.position();
        self.engine = Some(engine);
        info!("Scroll engine bound");
    }

    pub fn play(&mut self) {
        let speed = self.speed;
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        if !engine.is_playing() {
            engine.start(speed);
        }
        self.playing = engine.is_playing();
        self.sync();
    }

    pub fn pause(&mut self) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        if engine.is_playing() {
            engine.pause();
        }
        self.playing = engine.is_playing();
        self.sync();
    }

    pub fn toggle(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Pause and rewind; always leaves the session stopped at 0
    pub fn stop(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            engine.stop();
        }
        self.sync();
        self.playing = false;
        self.position = 0.0;
    }

    /// Update the speed. Without an engine this only changes the mirrored
    /// value; it reaches the engine on the next `play`.
    pub fn set_speed(&mut self, speed: Speed) {
        self.speed = speed;
        if let Some(engine) = self.engine.as_mut() {
            engine.set_speed(speed);
        }
        self.sync();
    }

    pub fn jump_to_position(&mut self, position: f64) {
        if let Some(engine) = self.engine.as_mut() {
            engine.jump_to_position(position);
        }
        self.sync();
    }

    pub fn jump_to_top(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            engine.jump_to_top();
        }
        self.sync();
    }

    pub fn jump_to_end(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            engine.jump_to_end();
        }
        self.sync();
    }

    /// Organic position update, fed by the engine's observer
    pub fn set_position(&mut self, position: f64) {
        self.position = position;
    }

    /// Deliver a host frame to the bound engine
    pub fn frame(&mut self, id: FrameId, timestamp: Instant) {
        if let Some(engine) = self.engine.as_mut() {
            engine.frame(id, timestamp);
        }
        self.sync();
    }

    /// Re-apply the current position after the surface was re-laid out
    pub fn refresh_layout(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            let current = engine.position();
            engine.jump_to_position(current);
        }
        self.sync();
    }

    /// Pull the latest position reported by the engine
    pub fn sync(&mut self) {
        if matches!(self.position_rx.has_changed(), Ok(true)) {
            let position = *self.position_rx.borrow_and_update();
            self.set_position(position);
        }
    }

    /// Tear down the session's engine
    pub fn end_session(&mut self) {
        if let Some(mut engine) = self.engine.take() {
            engine.destroy();
            info!(position = engine.position(), "Playback session ended");
        }
        self.playing = false;
    }

    pub fn state(&self) -> ScrollState {
        ScrollState {
            playing: self.playing,
            position: self.position,
            speed: self.speed,
        }
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.playing
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
    pub fn is_bound(&self) -> bool {
        self.engine.is_some()
    }

    /// Bound engine, for pull-based queries
    pub fn engine(&self) -> Option<&ScrollEngine> {
        self.engine.as_ref()
    }
}
