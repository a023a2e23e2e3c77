use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

/// Draw the Help popup (F1)
pub fn draw_help(f: &mut Frame) {
    let area = centered_rect(60, 70, f.area());
    f.render_widget(Clear, area);

    let section = |title: &'static str| {
        Line::from(Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD).fg(Color::Yellow),
        ))
    };

    let help_text = vec![
        Line::from(Span::styled(
            " proctop - live process monitor ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section(" Navigation "),
        Line::from("  j / Down      Line down"),
        Line::from("  k / Up        Line up"),
        Line::from("  Ctrl+D        Half page down"),
        Line::from("  Ctrl+U        Half page up"),
        Line::from("  Ctrl+F / PgDn Page down"),
        Line::from("  Ctrl+B / PgUp Page up"),
        Line::from("  g / Home      First process"),
        Line::from("  G / End       Last process"),
        Line::from(""),
        section(" Refresh "),
        Line::from("  r / Ctrl+L    Refresh now (unpause)"),
        Line::from("  z             Pause/resume timer"),
        Line::from(""),
        section(" Other "),
        Line::from("  F1 / h / ?    Show this help"),
        Line::from("  q / F10       Quit"),
        Line::from("  Ctrl+C        Quit"),
        Line::from(""),
        Line::from(Span::styled(
            " Press Esc or F1 to close ",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help ")
                .title_alignment(Alignment::Center)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White).bg(Color::Black))
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}

/// Create a centered rectangle with percentage width/height
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
