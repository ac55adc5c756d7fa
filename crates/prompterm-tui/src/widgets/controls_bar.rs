use prompterm_core::script::wpm_for_speed;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;

const HELP_HINT: &str = " space:play ↑↓:speed e:edit ?:keys q:quit ";

/// One-line transport readout at the bottom of the screen
pub struct ControlsBarWidget;

impl ControlsBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let base = Style::default().fg(theme.fg0).bg(theme.bg1);

        let (state, state_color) = if app.coordinator.is_playing() {
            (" ▶ PLAYING ", theme.success)
        } else if app.coordinator.position() > 0.0 {
            (" ❚❚ PAUSED ", theme.warning)
        } else {
            (" ■ READY ", theme.grey)
        };

        let speed = app.coordinator.speed();
        let details = format!(
            " Speed {} ({} wpm) | Margin {}% | Line {:.0}px | Mirror {} | {:.0}px | {:.0}% | {} left ",
            speed,
            wpm_for_speed(speed),
            app.settings.margin,
            app.settings.line_height_px,
            if app.settings.mirror { "on" } else { "off" },
            app.coordinator.position(),
            app.progress(),
            app.time_remaining(),
        );

        let mut spans = vec![
            Span::styled(
                state,
                Style::default()
                    .fg(theme.bg0)
                    .bg(state_color)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(details, base),
        ];
        if let Some(message) = &app.status_message {
            spans.push(Span::styled(
                format!(" {} ", message),
                base.fg(theme.accent),
            ));
        }

        let hint_width = (HELP_HINT.width() as u16).min(area.width);
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(hint_width)])
            .split(area);

        frame.render_widget(Paragraph::new(Line::from(spans)).style(base), chunks[0]);
        frame.render_widget(
            Paragraph::new(Span::styled(HELP_HINT, base.fg(theme.grey))),
            chunks[1],
        );
    }
}
