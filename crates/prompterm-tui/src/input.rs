//! Keyboard controller
//!
//! Translates key events into playback coordinator calls. Transport keys
//! are fixed; everything else goes through the configurable [`Keymap`].

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent};
use prompterm_core::playback::{PlaybackCoordinator, Speed};
use tracing::trace;

use crate::keymap::{is_transport_modifiers, Keymap};

/// Repeats of the same held key inside this window are ignored
pub const DEBOUNCE: Duration = Duration::from_millis(150);

/// Where a key event was aimed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTarget {
    Prompter,
    /// Text editing area; playback shortcuts stay out of its way
    Editor,
}

/// Outcome of a key press, for the host to act on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Transport, already applied to the coordinator
    TogglePlayback,
    SpeedChanged(Speed),
    JumpToTop,
    JumpToEnd,
    ToggleFullscreen,

    // Host bindings
    Quit,
    Stop,
    ToggleMirror,
    MarginDecrease,
    MarginIncrease,
    EditScript,
    ToggleMaximize,
    ShowShortcuts,
    ClosePopup,
    CycleTextColor,
    CycleBackgroundColor,
    LineHeightDecrease,
    LineHeightIncrease,

    None,
}

pub struct KeyboardController {
    keymap: Keymap,
    pressed: HashSet<KeyCode>,
    last_trigger: HashMap<KeyCode, Instant>,
}

impl KeyboardController {
    pub fn new(keymap: Keymap) -> Self {
        Self {
            keymap,
            pressed: HashSet::new(),
            last_trigger: HashMap::new(),
        }
    }

    /// Handle a key press (or auto-repeat)
    pub fn handle_key_down(
        &mut self,
        key: KeyEvent,
        target: KeyTarget,
        now: Instant,
        coordinator: &mut PlaybackCoordinator,
    ) -> Action {
        if target == KeyTarget::Editor {
            return Action::None;
        }

        let code = normalize(key.code);
        let transport = is_transport_modifiers(key.modifiers);

        // Space toggles on every press
        if transport && code == KeyCode::Char(' ') {
            coordinator.toggle();
            return Action::TogglePlayback;
        }

        if self.is_debounced(code, now) {
            trace!(?code, "Debounced key");
            return Action::None;
        }
        self.pressed.insert(code);
        self.last_trigger.insert(code, now);

        if !transport {
            return self.keymap.lookup(&key).copied().unwrap_or(Action::None);
        }

        match code {
            KeyCode::Up => {
                let speed = coordinator.speed().faster();
                coordinator.set_speed(speed);
                Action::SpeedChanged(speed)
            }
            KeyCode::Down => {
                let speed = coordinator.speed().slower();
                coordinator.set_speed(speed);
                Action::SpeedChanged(speed)
            }
            KeyCode::Home | KeyCode::PageUp => {
                coordinator.jump_to_top();
                Action::JumpToTop
            }
            KeyCode::End | KeyCode::PageDown => {
                coordinator.jump_to_end();
                Action::JumpToEnd
            }
            KeyCode::Char('f') => Action::ToggleFullscreen,
            _ => self.keymap.lookup(&key).copied().unwrap_or(Action::None),
        }
    }

    /// Handle a key release
    pub fn handle_key_up(&mut self, code: KeyCode) {
        self.pressed.remove(&normalize(code));
    }

    /// Forget every held key, e.g. when the terminal loses focus
    pub fn clear_pressed(&mut self) {
        self.pressed.clear();
    }

    fn is_debounced(&self, code: KeyCode, now: Instant) -> bool {
        self.pressed.contains(&code)
            && self
                .last_trigger
                .get(&code)
                .is_some_and(|last| now.saturating_duration_since(*last) < DEBOUNCE)
    }
}

/// Track letters case-insensitively, like physical keys
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}
