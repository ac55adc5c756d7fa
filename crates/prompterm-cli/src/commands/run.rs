use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use crossterm::{
    event::{
        DisableFocusChange, EnableFocusChange, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use tracing::{error, info, warn};

use prompterm_core::{playback::Speed, AppConfig, Script};
use prompterm_tui::{
    app::{App, Mode, PrompterSettings, MAX_MARGIN},
    event::{AppEvent, EventHandler},
    widgets::{ControlsBarWidget, EditorWidget, NoticeWidget, PrompterWidget, ShortcutsPopup},
};

/// Options for `prompterm run`
#[derive(Debug, Default, Args)]
pub struct RunArgs {
    /// Script file to load
    pub script: Option<PathBuf>,
    /// Initial speed, 1-10
    #[arg(short, long, allow_negative_numbers = true)]
    pub speed: Option<i64>,
    /// Start mirrored
    #[arg(short, long)]
    pub mirror: bool,
    /// Horizontal margin percent, 0-40
    #[arg(long)]
    pub margin: Option<u16>,
    /// Text color, e.g. "#000000"
    #[arg(long)]
    pub text_color: Option<String>,
    /// Background color, e.g. "#ffffff"
    #[arg(long)]
    pub background_color: Option<String>,
}

impl RunArgs {
    /// Configured prompter settings with the command-line overrides applied
    pub fn settings(&self, config: &AppConfig) -> PrompterSettings {
        let mut settings = PrompterSettings::from(&config.prompter);
        if let Some(speed) = self.speed {
            settings.speed = Speed::new(speed);
        }
        if let Some(margin) = self.margin {
            settings.margin = margin.min(MAX_MARGIN);
        }
        if let Some(color) = &self.text_color {
            settings.text_color = color.clone();
        }
        if let Some(color) = &self.background_color {
            settings.background_color = color.clone();
        }
        settings.mirror |= self.mirror;
        settings
    }
}

pub async fn run(config: Arc<AppConfig>, args: RunArgs) -> Result<()> {
    let script = match &args.script {
        Some(path) => Script::load(path)
            .await
            .with_context(|| format!("failed to load script {}", path.display()))?,
        None => Script::default(),
    };
    let settings = args.settings(&config);
    info!(speed = %settings.speed, words = script.word_count(), "Starting prompter");

    let mut app = App::new(config.clone(), script, settings);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange, SetTitle("prompterm"))?;

    // Key release events keep the debounce honest where the terminal reports them
    let enhanced = supports_keyboard_enhancement().unwrap_or(false);
    if enhanced {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app);

    let restored = restore_terminal(&mut terminal, enhanced);
    app.coordinator.end_session();

    if let Err(e) = &restored {
        error!(error = %e, "Failed to restore terminal");
    }
    result?;
    restored.context("failed to restore terminal")
}

/// Undo the terminal setup, attempting every step even after one fails
fn restore_terminal(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    enhanced: bool,
) -> io::Result<()> {
    first_error([
        if enhanced {
            execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)
        } else {
            Ok(())
        },
        disable_raw_mode(),
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableFocusChange
        ),
        terminal.show_cursor(),
    ])
}

fn first_error(results: impl IntoIterator<Item = io::Result<()>>) -> io::Result<()> {
    results.into_iter().fold(Ok(()), |acc, result| acc.and(result))
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let event_handler = EventHandler::new(app.config.ui.tick_rate_ms);

    loop {
        app.deliver_frames(Instant::now());

        let size = terminal.size()?;
        app.layout_viewport(Rect::new(0, 0, size.width, size.height));

        terminal.draw(|frame| {
            let layout = app.layout(frame.area());

            if let Some(area) = layout.notice {
                NoticeWidget::render(frame, area, app);
            }
            if let Some(area) = layout.editor {
                EditorWidget::render(frame, area, app);
            }
            PrompterWidget::render(frame, layout.prompter, app);
            if let Some(area) = layout.controls {
                ControlsBarWidget::render(frame, area, app);
            }
            if app.mode == Mode::Shortcuts {
                ShortcutsPopup::render(frame, app);
            }
        })?;

        // Wake up for the next frame while playing, otherwise at the tick rate
        let timeout = app.frames.time_until_due(Instant::now());
        if let Some(event) = event_handler.next(timeout)? {
            match event {
                AppEvent::Key(key) => app.handle_key(key, Instant::now()),
                AppEvent::KeyRelease(code) => app.handle_key_release(code),
                AppEvent::FocusLost => app.handle_focus_lost(),
                // Layout is re-measured at the top of the loop
                AppEvent::Resize(_, _) | AppEvent::FocusGained | AppEvent::Tick => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    if app.coordinator.position() > 0.0 {
        info!(position = app.coordinator.position(), "Session ended mid-script");
    }
    Ok(())
}

/// Warn about settings the prompter will silently ignore
pub fn check_args(args: &RunArgs) {
    if let Some(speed) = args.speed {
        if !(1..=10).contains(&speed) {
            warn!("Speed {} is out of range, clamped to {}", speed, Speed::new(speed));
        }
    }
    if let Some(margin) = args.margin {
        if margin > MAX_MARGIN {
            warn!("Margin {}% is out of range, clamped to {}%", margin, MAX_MARGIN);
        }
    }
}
