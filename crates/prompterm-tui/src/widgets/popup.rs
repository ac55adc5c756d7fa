use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;

pub struct ShortcutsPopup;

impl ShortcutsPopup {
    pub fn render(frame: &mut Frame, app: &App) {
        let keymap = &app.config.keymap;
        let entries: Vec<(String, &str)> = vec![
            ("Space".to_string(), "Play / pause"),
            ("↑ / ↓".to_string(), "Speed up / down"),
            ("Home / PgUp".to_string(), "Jump to top"),
            ("End / PgDn".to_string(), "Jump to end"),
            ("f".to_string(), "Toggle fullscreen"),
            (keymap.stop.clone(), "Stop and rewind"),
            (keymap.toggle_mirror.clone(), "Mirror text"),
            (
                format!("{} / {}", keymap.margin_decrease, keymap.margin_increase),
                "Narrower / wider margin",
            ),
            (
                format!(
                    "{} / {}",
                    keymap.line_height_decrease, keymap.line_height_increase
                ),
                "Smaller / larger lines",
            ),
            (keymap.cycle_text_color.clone(), "Next text color"),
            (keymap.cycle_background_color.clone(), "Next background color"),
            (keymap.edit_script.clone(), "Edit script"),
            (keymap.toggle_maximize.clone(), "Maximize prompter"),
            (keymap.quit.clone(), "Quit"),
            ("Esc".to_string(), "Close popup / leave fullscreen"),
        ];

        let area = frame.area();
        let popup_width = 52u16.min(area.width.saturating_sub(4));
        let popup_height = (entries.len() as u16 + 2).min(area.height.saturating_sub(2));
        let popup_area = centered_rect(popup_width, popup_height, area);

        frame.render_widget(Clear, popup_area);

        let theme = &app.theme;
        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .style(Style::default().bg(theme.bg1));

        let lines: Vec<Line> = entries
            .into_iter()
            .map(|(key, description)| {
                Line::from(vec![
                    Span::styled(
                        format!(" {:<14}", key),
                        Style::default()
                            .fg(theme.accent)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(description, Style::default().fg(theme.fg0)),
                ])
            })
            .collect();

        frame.render_widget(Paragraph::new(lines).block(block), popup_area);
    }
}

/// Helper function to create a centered rect
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(centered_rect(50, 10, area), Rect::new(25, 15, 50, 10));
        assert_eq!(centered_rect(200, 10, area), Rect::new(0, 15, 100, 10));
    }
}
