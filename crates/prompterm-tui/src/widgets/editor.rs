use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, Mode};
use crate::surface::wrap_text;

const CURSOR: char = '▏';

/// Script editor pane
pub struct EditorWidget;

impl EditorWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let editing = app.mode == Mode::Editing;
        let theme = &app.theme;

        let (title, border_color) = if editing {
            (" Script [editing, Esc to finish] ", theme.accent)
        } else {
            (" Script ", theme.border)
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .style(Style::default().bg(theme.bg0));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if app.script.is_blank() && !editing {
            let hint = Paragraph::new(Line::from(Span::styled(
                "Press e to write or paste a script",
                Style::default().fg(theme.grey).add_modifier(Modifier::ITALIC),
            )));
            frame.render_widget(hint, inner);
            return;
        }

        let mut text = app.script.text().to_string();
        if editing {
            text.push(CURSOR);
        }
        let rows = wrap_text(&text, inner.width);

        // Keep the cursor in view while typing
        let height = usize::from(inner.height);
        let skip = if editing {
            rows.len().saturating_sub(height)
        } else {
            0
        };

        let lines: Vec<Line> = rows
            .into_iter()
            .skip(skip)
            .take(height)
            .map(|row| Line::from(Span::styled(row, Style::default().fg(theme.fg0))))
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }
}
