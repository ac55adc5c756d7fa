use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use crate::app::App;

/// The scrolling script pane
pub struct PrompterWidget;

impl PrompterWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let style = Style::default().fg(app.text_color).bg(app.background_color);
        frame.render_widget(Block::default().style(style), area);

        let margin = app.settings.margin_cols(area.width);
        let text_area = Rect::new(
            area.x + margin,
            area.y,
            app.settings.text_width(area.width).min(area.width),
            area.height,
        );

        let metrics = app.viewport.metrics();
        let padding = metrics.top_padding();
        let top = metrics.top_row();
        let placeholder = app.script.is_blank();

        let lines: Vec<Line> = (top..top + usize::from(area.height))
            .map(|virtual_row| {
                let row = virtual_row
                    .checked_sub(padding)
                    .and_then(|i| app.rows().get(i))
                    .map(String::as_str)
                    .unwrap_or("");
                let span = if placeholder {
                    Span::styled(row, style.add_modifier(Modifier::ITALIC))
                } else {
                    Span::raw(row)
                };

                if app.settings.mirror {
                    Line::from(Span::styled(mirror_row(row), span.style)).alignment(Alignment::Right)
                } else {
                    Line::from(span)
                }
            })
            .collect();

        frame.render_widget(Paragraph::new(lines).style(style), text_area);
    }
}

/// Flip a row horizontally for a beam-splitter mirror
pub fn mirror_row(row: &str) -> String {
    row.chars().rev().collect()
}

/// Banner shown above the prompter for large scripts
pub struct NoticeWidget;

impl NoticeWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let Some(recommendation) = app.analysis.recommendation else {
            return;
        };
        let line = Line::from(vec![
            Span::styled(
                " Performance Notice: ",
                Style::default()
                    .fg(app.theme.bg0)
                    .bg(app.theme.warning)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(
                    " {} ({} characters)",
                    recommendation, app.analysis.char_count
                ),
                Style::default().fg(app.theme.warning).bg(app.theme.bg1),
            ),
        ]);
        frame.render_widget(
            Paragraph::new(line).style(Style::default().bg(app.theme.bg1)),
            area,
        );
    }
}
