use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{App, AppMode};

/// Key bar definitions: (key_label, description)
const KEYS_NORMAL: &[(&str, &str)] = &[
    ("F1", "Help  "),
    ("r", "Refresh "),
    ("j/k", "Line "),
    ("^D/^U", "Half "),
    ("^F/^B", "Page "),
    ("z", "Pause "),
    ("F10", "Quit "),
];

const KEYS_HELP: &[(&str, &str)] = &[("Esc", "Close "), ("F10", "Quit ")];

/// Draw the bottom key bar: key in black-on-cyan, description in light-on-dark
pub fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let bg_fill = " ".repeat(area.width as usize);
    f.render_widget(
        Paragraph::new(bg_fill).style(Style::default().bg(Color::Indexed(234))),
        area,
    );

    let keys = match app.mode {
        AppMode::Help => KEYS_HELP,
        AppMode::Normal => KEYS_NORMAL,
    };

    let mut spans: Vec<Span> = Vec::new();
    for (key, desc) in keys {
        spans.push(Span::styled(
            key.to_string(),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            desc.to_string(),
            Style::default()
                .fg(Color::Indexed(252)) // light gray
                .bg(Color::Indexed(234)), // very dark gray
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
