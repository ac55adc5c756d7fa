use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};

/// Event handler for terminal events
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms.max(1)),
        }
    }

    /// Poll for the next event, waiting at most `timeout` (the tick rate when `None`)
    pub fn next(&self, timeout: Option<Duration>) -> Result<Option<AppEvent>> {
        let timeout = timeout.map_or(self.tick_rate, |t| t.min(self.tick_rate));
        if !event::poll(timeout)? {
            return Ok(Some(AppEvent::Tick));
        }

        let event = match event::read()? {
            // Release events only arrive when the terminal reports event types
            Event::Key(key) => match key.kind {
                KeyEventKind::Press | KeyEventKind::Repeat => Some(AppEvent::Key(key)),
                KeyEventKind::Release => Some(AppEvent::KeyRelease(key.code)),
            },
            Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
            Event::FocusLost => Some(AppEvent::FocusLost),
            Event::FocusGained => Some(AppEvent::FocusGained),
            _ => None,
        };
        Ok(event)
    }
}

/// Application events
#[derive(Debug)]
pub enum AppEvent {
    /// A key was pressed
    Key(KeyEvent),
    /// A key was released
    KeyRelease(KeyCode),
    /// Terminal was resized
    Resize(u16, u16),
    FocusLost,
    FocusGained,
    /// Tick event for periodic updates
    Tick,
}
