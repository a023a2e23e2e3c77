use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::App;
use crate::system::row::DisplayRow;

/// Column headers and widths; 0 = takes remaining space
const HEADERS: &[(&str, u16)] = &[
    ("PID", PID_WIDTH),
    ("USER", 9),
    ("CPU%", 11),
    ("Command", 0),
];

/// Seven digits (pid_max is 4194304) plus a separating space
const PID_WIDTH: u16 = 8;

const ROW_FG: Color = Color::Yellow;
const HEADER_BG: Color = Color::Green;
const SELECTED_BG: Color = Color::Cyan;

/// Draw the process table
pub fn draw_process_table(f: &mut Frame, app: &App, area: Rect) {
    if area.height < 2 {
        return;
    }

    // --- Column header row (full-width colored background) ---
    let header_area = Rect { height: 1, ..area };
    let header_style = Style::default().fg(Color::Black).bg(HEADER_BG).add_modifier(Modifier::BOLD);
    let titles: String = HEADERS
        .iter()
        .map(|(name, width)| match *width {
            0 => name.to_string(),
            w => pad_to_width(name, w as usize),
        })
        .collect();
    f.render_widget(
        Paragraph::new(pad_to_width(&titles, area.width as usize)).style(header_style),
        header_area,
    );

    // --- Process rows ---
    let rows_area = Rect {
        y: area.y + 1,
        height: area.height - 1,
        ..area
    };
    let visible = rows_area.height as usize;
    let start = app.scroll_offset.min(app.rows.len());
    let end = (start + visible).min(app.rows.len());

    for (i, row_idx) in (start..end).enumerate() {
        let row_area = Rect {
            y: rows_area.y + i as u16,
            height: 1,
            ..rows_area
        };
        let selected = row_idx == app.selected_index;
        let line = build_row(&app.rows[row_idx], row_area.width as usize, selected);
        f.render_widget(Paragraph::new(line), row_area);
    }
}

fn fixed_cols_width() -> usize {
    HEADERS.iter().map(|(_, w)| *w as usize).sum()
}

fn build_row(row: &DisplayRow, width: usize, selected: bool) -> Line<'static> {
    let style = if selected {
        Style::default().fg(Color::Black).bg(SELECTED_BG)
    } else {
        Style::default().fg(ROW_FG)
    };

    let cmd_width = width.saturating_sub(fixed_cols_width());
    let text = format!(
        "{}{}{}{}",
        pad_to_width(&row.pid, PID_WIDTH as usize),
        pad_to_width(&truncate_to_width(&row.user, 8), 9),
        pad_to_width(&row.cpu, 11),
        truncate_to_width(&printable(&row.command), cmd_width),
    );
    // Selected line is highlighted across the full width
    let text = if selected { pad_to_width(&text, width) } else { text };
    Line::from(Span::styled(text, style))
}

/// Replace control characters (argv NUL separators included) with spaces
fn printable(s: &str) -> String {
    s.chars().map(|c| if c.is_control() { ' ' } else { c }).collect()
}

/// Left-align `s` in a field `width` terminal cells wide
fn pad_to_width(s: &str, width: usize) -> String {
    let used = UnicodeWidthStr::width(s);
    let mut out = s.to_string();
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(used)));
    out
}

/// Cut `s` so it occupies at most `width` terminal cells
fn truncate_to_width(s: &str, width: usize) -> String {
    let mut used = 0;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_counts_display_cells() {
        assert_eq!(pad_to_width("ab", 4), "ab  ");
        assert_eq!(pad_to_width("日本", 6), "日本  ");
        assert_eq!(pad_to_width("toolong", 3), "toolong");
    }

    #[test]
    fn truncation_never_splits_wide_chars() {
        assert_eq!(truncate_to_width("日本語", 5), "日本");
        assert_eq!(truncate_to_width("postgres", 4), "post");
        assert_eq!(truncate_to_width("x", 0), "");
    }

    #[test]
    fn nul_separators_render_as_spaces() {
        assert_eq!(printable("sleep\u{0}10\u{0}"), "sleep 10 ");
    }

    #[test]
    fn row_columns_line_up() {
        let row = DisplayRow {
            pid: "42".into(),
            user: "root".into(),
            cpu: "1.000000".into(),
            command: "init".into(),
        };
        let line = build_row(&row, 80, false);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "42      root     1.000000   init");
    }

    #[test]
    fn widest_pid_keeps_a_gap_before_user() {
        let row = DisplayRow {
            pid: "4194304".into(),
            user: "root".into(),
            cpu: "0.000000".into(),
            command: "x".into(),
        };
        let line = build_row(&row, 80, false);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.starts_with("4194304 root"));
    }
}
