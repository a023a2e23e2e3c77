pub mod footer;
pub mod header;
pub mod help;
pub mod process_table;

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;

use crate::app::{App, AppMode};

/// Rows taken by everything except the process lines
pub fn chrome_height(app: &App) -> u16 {
    header_height(app) + 1 /* column titles */ + 1 /* footer */
}

pub fn header_height(app: &App) -> u16 {
    if app.show_header {
        1
    } else {
        0
    }
}

/// Render the complete UI
pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header_height(app)), // summary line
            Constraint::Min(2),                     // process table
            Constraint::Length(1),                  // footer (key bar)
        ])
        .split(f.area());

    if app.show_header {
        header::draw_header(f, app, chunks[0]);
    }
    process_table::draw_process_table(f, app, chunks[1]);
    footer::draw_footer(f, app, chunks[2]);

    if app.mode == AppMode::Help {
        help::draw_help(f);
    }
}
