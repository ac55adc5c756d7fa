use std::sync::Arc;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use prompterm_core::config::PrompterConfig;
use prompterm_core::playback::{PlaybackCoordinator, ScrollEngine, Speed};
use prompterm_core::script::{calculate_progress, format_time, Script, TextAnalysis};
use prompterm_core::AppConfig;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Color;
use tracing::{debug, info};

use crate::frames::TerminalFrames;
use crate::input::{Action, KeyTarget, KeyboardController};
use crate::keymap::Keymap;
use crate::surface::{wrap_text, ViewportSurface};
use crate::theme::{color_or, Theme};

pub const MARGIN_STEP: u16 = 5;
pub const MAX_MARGIN: u16 = 40;
pub const LINE_HEIGHT_STEP: f64 = 3.0;
pub const MIN_LINE_HEIGHT: f64 = 18.0;
pub const MAX_LINE_HEIGHT: f64 = 108.0;

/// Color presets cycled by the text/background color keys
pub const TEXT_COLORS: &[&str] = &["#000000", "#ffffff", "#ffff00", "#00ff00", "#00ffff"];
pub const BACKGROUND_COLORS: &[&str] = &["#ffffff", "#000000", "#1e1e1e", "#002b36", "#00008b"];

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    /// Typing into the script editor
    Editing,
    /// Shortcuts popup open
    Shortcuts,
}

/// Local presentation settings, seeded from config and CLI flags
#[derive(Debug, Clone, PartialEq)]
pub struct PrompterSettings {
    pub speed: Speed,
    /// Horizontal margin on each side, percent of the prompter width
    pub margin: u16,
    pub text_color: String,
    pub background_color: String,
    pub mirror: bool,
    /// Pixels per prompter row; sets how far a second of playback scrolls
    pub line_height_px: f64,
}

impl From<&PrompterConfig> for PrompterSettings {
    fn from(config: &PrompterConfig) -> Self {
        Self {
            speed: config.speed,
            margin: config.margin.min(MAX_MARGIN),
            text_color: config.text_color.clone(),
            background_color: config.background_color.clone(),
            mirror: config.mirror,
            line_height_px: config.line_height_px,
        }
    }
}

impl PrompterSettings {
    /// Columns left for text once the margins are taken out of `width`
    pub fn text_width(&self, width: u16) -> u16 {
        let margin_cols = u32::from(width) * u32::from(self.margin) / 100;
        width.saturating_sub((margin_cols * 2) as u16).max(1)
    }

    /// Columns of margin on each side
    pub fn margin_cols(&self, width: u16) -> u16 {
        width.saturating_sub(self.text_width(width)) / 2
    }
}

/// Preset after `current` (case-insensitive), or the first one when `current` isn't a preset
fn next_preset(presets: &[&str], current: &str) -> String {
    let next = presets
        .iter()
        .position(|preset| preset.eq_ignore_ascii_case(current))
        .map_or(0, |i| (i + 1) % presets.len());
    presets[next].to_string()
}

/// Screen areas for the current mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub notice: Option<Rect>,
    pub editor: Option<Rect>,
    pub prompter: Rect,
    pub controls: Option<Rect>,
}

/// Application state
pub struct App {
    pub config: Arc<AppConfig>,
    pub script: Script,
    pub settings: PrompterSettings,
    pub coordinator: PlaybackCoordinator,
    pub viewport: ViewportSurface,
    pub frames: TerminalFrames,
    pub analysis: TextAnalysis,
    pub theme: Theme,
    /// Prompter colors resolved from the settings
    pub text_color: Color,
    pub background_color: Color,
    pub mode: Mode,
    pub fullscreen: bool,
    /// Prompter takes the whole body, editor hidden
    pub maximized: bool,
    pub should_quit: bool,
    pub status_message: Option<String>,
    controller: KeyboardController,
    /// Wrapped script rows for the current text width
    rows: Vec<String>,
    wrapped_width: u16,
    rows_dirty: bool,
}

impl App {
    pub fn new(config: Arc<AppConfig>, script: Script, settings: PrompterSettings) -> Self {
        let theme = Theme::from_name(config.ui.theme);
        let keymap = Keymap::from_config(&config.keymap);
        let analysis = script.analysis();
        let text_color = color_or(&settings.text_color, theme.fg0);
        let background_color = color_or(&settings.background_color, theme.bg0);

        let mut app = Self {
            coordinator: PlaybackCoordinator::new(settings.speed),
            viewport: ViewportSurface::new(settings.line_height_px),
            frames: TerminalFrames::new(config.ui.animation_fps),
            maximized: config.ui.start_maximized,
            config,
            script,
            settings,
            analysis,
            theme,
            text_color,
            background_color,
            mode: Mode::Normal,
            fullscreen: false,
            should_quit: false,
            status_message: None,
            controller: KeyboardController::new(keymap),
            rows: Vec::new(),
            wrapped_width: 0,
            rows_dirty: true,
        };
        app.mount_viewport();
        app
    }

    /// Start a presentation session on the prompter viewport
    pub fn mount_viewport(&mut self) {
        let engine = ScrollEngine::new(self.viewport.clone(), self.frames.clone())
            .with_observer(self.coordinator.position_feed());
        self.coordinator.set_scroll_engine(engine);
    }

    /// Split the terminal area for the current mode
    pub fn layout(&self, area: Rect) -> AppLayout {
        if self.fullscreen {
            return AppLayout {
                notice: None,
                editor: None,
                prompter: area,
                controls: None,
            };
        }

        let notice_height = if self.analysis.is_large { 1 } else { 0 };
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(notice_height),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(area);

        let (editor, prompter) = if self.maximized {
            (None, rows[1])
        } else {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
                .split(rows[1]);
            (Some(columns[0]), columns[1])
        };

        AppLayout {
            notice: self.analysis.is_large.then_some(rows[0]),
            editor,
            prompter,
            controls: Some(rows[2]),
        }
    }

    /// Re-measure the prompter for `area` (the whole terminal)
    ///
    /// Rewraps when the text or its width changed and re-applies the
    /// playback position to the new layout.
    pub fn layout_viewport(&mut self, area: Rect) {
        let prompter = self.layout(area).prompter;
        let width = self.settings.text_width(prompter.width);
        let before = self.viewport.metrics();

        if self.rows_dirty || width != self.wrapped_width {
            self.rows = wrap_text(self.script.display_text(), width);
            self.wrapped_width = width;
            self.rows_dirty = false;
        }
        self.viewport.set_layout(self.rows.len(), prompter.height);

        let after = self.viewport.metrics();
        if before.content_rows != after.content_rows || before.viewport_rows != after.viewport_rows
        {
            debug!(
                rows = after.content_rows,
                viewport = after.viewport_rows,
                "Prompter re-measured"
            );
            self.coordinator.refresh_layout();
        }
    }

    /// Deliver the animation frames that are due
    pub fn deliver_frames(&mut self, now: Instant) {
        for id in self.frames.take_due(now) {
            self.coordinator.frame(id, now);
        }
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        let target = if self.mode == Mode::Editing {
            KeyTarget::Editor
        } else {
            KeyTarget::Prompter
        };
        let action = self
            .controller
            .handle_key_down(key, target, now, &mut self.coordinator);

        if self.mode == Mode::Editing {
            self.edit_script(key);
        } else {
            self.apply_action(action);
        }
    }

    pub fn handle_key_release(&mut self, code: KeyCode) {
        self.controller.handle_key_up(code);
    }

    pub fn handle_focus_lost(&mut self) {
        self.controller.clear_pressed();
    }

    pub fn apply_action(&mut self, action: Action) {
        match action {
            Action::TogglePlayback => {
                self.status_message = None;
            }
            Action::SpeedChanged(speed) => {
                self.settings.speed = speed;
                self.status_message = Some(format!("Speed {}", speed));
            }
            Action::JumpToTop | Action::JumpToEnd => {}
            Action::ToggleFullscreen => {
                self.fullscreen = !self.fullscreen;
                if self.mode == Mode::Shortcuts {
                    self.mode = Mode::Normal;
                }
            }
            Action::Quit => self.quit(),
            Action::Stop => self.coordinator.stop(),
            Action::ToggleMirror => {
                self.settings.mirror = !self.settings.mirror;
            }
            Action::MarginDecrease => {
                self.set_margin(self.settings.margin.saturating_sub(MARGIN_STEP));
            }
            Action::MarginIncrease => {
                self.set_margin(self.settings.margin + MARGIN_STEP);
            }
            Action::EditScript => {
                self.mode = Mode::Editing;
                self.fullscreen = false;
                self.maximized = false;
                self.status_message = Some("Editing script, Esc to finish".to_string());
            }
            Action::ToggleMaximize => {
                self.maximized = !self.maximized;
            }
            Action::ShowShortcuts => {
                self.mode = if self.mode == Mode::Shortcuts {
                    Mode::Normal
                } else {
                    Mode::Shortcuts
                };
            }
            Action::ClosePopup => {
                if self.mode == Mode::Shortcuts {
                    self.mode = Mode::Normal;
                } else if self.fullscreen {
                    self.fullscreen = false;
                }
            }
            Action::CycleTextColor => {
                self.settings.text_color = next_preset(TEXT_COLORS, &self.settings.text_color);
                self.text_color = color_or(&self.settings.text_color, self.theme.fg0);
                self.status_message = Some(format!("Text color {}", self.settings.text_color));
            }
            Action::CycleBackgroundColor => {
                self.settings.background_color =
                    next_preset(BACKGROUND_COLORS, &self.settings.background_color);
                self.background_color = color_or(&self.settings.background_color, self.theme.bg0);
                self.status_message =
                    Some(format!("Background {}", self.settings.background_color));
            }
            Action::LineHeightDecrease => {
                self.set_line_height(self.settings.line_height_px - LINE_HEIGHT_STEP);
            }
            Action::LineHeightIncrease => {
                self.set_line_height(self.settings.line_height_px + LINE_HEIGHT_STEP);
            }
            Action::None => {}
        }
    }

    fn set_margin(&mut self, margin: u16) {
        self.settings.margin = margin.min(MAX_MARGIN);
        self.status_message = Some(format!("Margin {}%", self.settings.margin));
    }

    /// Resize prompter rows and keep the current scroll position on the new extent
    fn set_line_height(&mut self, line_height_px: f64) {
        let line_height_px = line_height_px.clamp(MIN_LINE_HEIGHT, MAX_LINE_HEIGHT);
        self.settings.line_height_px = line_height_px;
        self.viewport.set_line_height(line_height_px);
        self.coordinator.refresh_layout();
        self.status_message = Some(format!("Line height {:.0}px", line_height_px));
    }

    fn edit_script(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if key.code == KeyCode::Char('c') {
                self.quit();
            }
            return;
        }

        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                self.analysis = self.script.analysis();
                self.status_message = Some(format!("{} words", self.script.word_count()));
                return;
            }
            KeyCode::Char(c) => self.script.text_mut().push(c),
            KeyCode::Enter => self.script.text_mut().push('\n'),
            KeyCode::Tab => self.script.text_mut().push('\t'),
            KeyCode::Backspace => {
                self.script.text_mut().pop();
            }
            _ => return,
        }
        self.rows_dirty = true;
    }

    pub fn quit(&mut self) {
        self.coordinator.end_session();
        self.should_quit = true;
        info!("Quitting");
    }

    /// Percent of the script already scrolled past
    pub fn progress(&self) -> f64 {
        self.coordinator
            .engine()
            .and_then(|engine| engine.extent())
            .map_or(0.0, |extent| {
                calculate_progress(
                    self.coordinator.position(),
                    extent.content_height,
                    extent.viewport_height,
                )
            })
    }

    /// Reading time left at the current speed
    pub fn time_remaining(&self) -> String {
        let total = self.script.estimate(self.coordinator.speed()).total_seconds as f64;
        format_time(total * (1.0 - self.progress() / 100.0))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn app_with(text: &str) -> App {
        let config = Arc::new(AppConfig::default());
        let settings = PrompterSettings::from(&config.prompter);
        App::new(config, Script::from_text(text), settings)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_text_width_respects_margin() {
        let mut settings = PrompterSettings::from(&PrompterConfig::default());
        settings.margin = 20;
        assert_eq!(settings.text_width(100), 60);
        assert_eq!(settings.margin_cols(100), 20);

        settings.margin = 0;
        assert_eq!(settings.text_width(100), 100);
        assert_eq!(settings.text_width(0), 1);
    }

    #[test]
    fn test_session_is_mounted_on_start() {
        let app = app_with("Hello");
        assert!(app.coordinator.is_bound());
        assert_eq!(app.coordinator.speed(), app.settings.speed);
    }

    #[test]
    fn test_layout_viewport_measures_rows() {
        let mut app = app_with("one two three four five six");
        app.maximized = true;
        app.settings.margin = 0;
        app.layout_viewport(Rect::new(0, 0, 10, 11));

        // 10 rows of body plus the controls bar
        let metrics = app.viewport.metrics();
        assert_eq!(metrics.viewport_rows, 10);
        assert_eq!(metrics.content_rows, app.rows().len());
        assert_eq!(app.rows(), &["one two", "three four", "five six"]);
    }

    #[test]
    fn test_playback_moves_viewport() {
        let mut app = app_with(&"word ".repeat(500));
        app.layout_viewport(Rect::new(0, 0, 80, 24));

        app.handle_key(press(KeyCode::Char(' ')), Instant::now());
        assert!(app.coordinator.is_playing());

        let start = Instant::now();
        app.deliver_frames(start);
        app.deliver_frames(start + Duration::from_millis(500));

        assert!(app.coordinator.position() > 0.0);
        assert_eq!(app.viewport.offset_px(), app.coordinator.position());
    }

    #[test]
    fn test_speed_keys_update_settings() {
        let mut app = app_with("Hello");
        app.handle_key(press(KeyCode::Up), Instant::now());
        assert_eq!(app.settings.speed.level(), 6);
        assert_eq!(app.coordinator.speed().level(), 6);
    }

    #[test]
    fn test_margin_is_clamped() {
        let mut app = app_with("Hello");
        for _ in 0..20 {
            app.apply_action(Action::MarginIncrease);
        }
        assert_eq!(app.settings.margin, MAX_MARGIN);
        for _ in 0..20 {
            app.apply_action(Action::MarginDecrease);
        }
        assert_eq!(app.settings.margin, 0);
    }

    #[test]
    fn test_color_keys_cycle_presets() {
        let mut app = app_with("Hello");
        assert_eq!(app.settings.text_color, "#000000");

        app.handle_key(press(KeyCode::Char('c')), Instant::now());
        assert_eq!(app.settings.text_color, "#ffffff");
        assert_eq!(app.text_color, Color::Rgb(0xff, 0xff, 0xff));

        app.apply_action(Action::CycleBackgroundColor);
        assert_eq!(app.settings.background_color, "#000000");
        assert_eq!(app.background_color, Color::Rgb(0, 0, 0));

        // Wraps around after the last preset
        for _ in 0..BACKGROUND_COLORS.len() {
            app.apply_action(Action::CycleBackgroundColor);
        }
        assert_eq!(app.settings.background_color, "#000000");
    }

    #[test]
    fn test_unknown_color_cycles_to_first_preset() {
        let mut app = app_with("Hello");
        app.settings.text_color = "#ABCDEF".to_string();
        app.apply_action(Action::CycleTextColor);
        assert_eq!(app.settings.text_color, TEXT_COLORS[0]);

        app.settings.background_color = "#1E1E1E".to_string();
        app.apply_action(Action::CycleBackgroundColor);
        assert_eq!(app.settings.background_color, "#002b36");
    }

    #[test]
    fn test_line_height_keys_rescale_viewport() {
        let mut app = app_with(&"word ".repeat(500));
        app.layout_viewport(Rect::new(0, 0, 80, 24));
        app.coordinator.jump_to_position(360.0);
        let row = app.viewport.metrics().top_row();

        app.apply_action(Action::LineHeightIncrease);
        assert_eq!(app.settings.line_height_px, 39.0);
        assert_eq!(app.viewport.metrics().line_height_px, 39.0);
        // Same pixel position, fewer rows scrolled at the taller line height
        assert_eq!(app.viewport.offset_px(), 360.0);
        assert!(app.viewport.metrics().top_row() < row);

        app.handle_key(press(KeyCode::Char('-')), Instant::now());
        assert_eq!(app.settings.line_height_px, 36.0);
    }

    #[test]
    fn test_line_height_is_clamped() {
        let mut app = app_with("Hello");
        for _ in 0..40 {
            app.apply_action(Action::LineHeightIncrease);
        }
        assert_eq!(app.settings.line_height_px, MAX_LINE_HEIGHT);
        for _ in 0..40 {
            app.apply_action(Action::LineHeightDecrease);
        }
        assert_eq!(app.settings.line_height_px, MIN_LINE_HEIGHT);
        assert_eq!(app.viewport.metrics().line_height_px, MIN_LINE_HEIGHT);
    }

    #[test]
    fn test_editing_ignores_playback_keys() {
        let mut app = app_with("");
        app.apply_action(Action::EditScript);
        assert_eq!(app.mode, Mode::Editing);

        let now = Instant::now();
        for c in "hi there".chars() {
            app.handle_key(press(KeyCode::Char(c)), now);
        }
        assert_eq!(app.script.text(), "hi there");
        assert!(!app.coordinator.is_playing());

        app.handle_key(press(KeyCode::Backspace), now);
        app.handle_key(press(KeyCode::Esc), now);
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.script.text(), "hi ther");
        assert_eq!(app.analysis.word_count, 2);
    }

    #[test]
    fn test_escape_closes_popup_then_fullscreen() {
        let mut app = app_with("Hello");
        app.apply_action(Action::ToggleFullscreen);
        app.apply_action(Action::ShowShortcuts);
        assert_eq!(app.mode, Mode::Shortcuts);

        app.apply_action(Action::ClosePopup);
        assert_eq!(app.mode, Mode::Normal);
        assert!(app.fullscreen);

        app.apply_action(Action::ClosePopup);
        assert!(!app.fullscreen);
    }

    #[test]
    fn test_quit_ends_session() {
        let mut app = app_with("Hello");
        app.handle_key(press(KeyCode::Char('q')), Instant::now());
        assert!(app.should_quit);
        assert!(!app.coordinator.is_bound());
    }

    #[test]
    fn test_fullscreen_layout_uses_whole_area() {
        let mut app = app_with("Hello");
        let area = Rect::new(0, 0, 80, 24);
        assert!(app.layout(area).controls.is_some());

        app.apply_action(Action::ToggleFullscreen);
        let layout = app.layout(area);
        assert_eq!(layout.prompter, area);
        assert!(layout.editor.is_none());
        assert!(layout.controls.is_none());
    }
}
