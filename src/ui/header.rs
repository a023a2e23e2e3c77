use chrono::Local;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::App;

/// One-line summary: `Tasks: 312  CPU: 12.5%  Interval: 1.0s  [paused]  14:02:11`
pub fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let value = Style::default().fg(Color::White);

    let mut spans = vec![
        Span::styled("Tasks: ", label),
        Span::styled(format!("{:<6}", app.total_tasks), value),
        Span::styled("CPU: ", label),
        Span::styled(format!("{:>5.1}%  ", app.cpu_busy_percent), value),
        Span::styled("Interval: ", label),
        Span::styled(format!("{:.1}s  ", app.update_interval_ms as f64 / 1000.0), value),
    ];
    if app.paused {
        spans.push(Span::styled(
            "[paused]  ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        ));
    }
    spans.push(Span::styled(
        Local::now().format("%H:%M:%S").to_string(),
        Style::default().fg(Color::DarkGray),
    ));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
