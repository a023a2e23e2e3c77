use crate::system::collector::Snapshot;
use crate::system::row::DisplayRow;

/// Which view/mode the app is currently in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Normal,
    Help,
}

/// Main application state: what the table shows and where the cursor is.
/// Sampling state never lives here, only the rows of the latest snapshot.
pub struct App {
    pub mode: AppMode,
    pub should_quit: bool,
    pub paused: bool,            // z key: ignore timer ticks
    pub refresh_requested: bool, // r / Ctrl-L

    // Latest snapshot
    pub rows: Vec<DisplayRow>,
    pub total_tasks: usize,
    pub cpu_busy_percent: f64,

    // Table state
    pub selected_index: usize,
    pub scroll_offset: usize,
    pub visible_rows: usize,

    // Display options
    pub show_header: bool,
    pub update_interval_ms: u64,

    // Completed refreshes
    pub tick: u64,
}

impl App {
    pub fn new() -> Self {
        Self {
            mode: AppMode::Normal,
            should_quit: false,
            paused: false,
            refresh_requested: false,

            rows: Vec::new(),
            total_tasks: 0,
            cpu_busy_percent: 0.0,

            selected_index: 0,
            scroll_offset: 0,
            visible_rows: 20,

            show_header: true,
            update_interval_ms: 1000,

            tick: 0,
        }
    }

    /// Replace the table contents with a fresh snapshot
    pub fn apply_snapshot(&mut self, snapshot: &Snapshot) {
        self.rows = snapshot.rows();
        self.total_tasks = snapshot.records.len();
        self.cpu_busy_percent = snapshot.cpu_busy_percent;
        self.clamp_selection();
        self.tick += 1;
    }

    /// Keep selected_index inside the viewport
    fn ensure_visible(&mut self) {
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + self.visible_rows {
            self.scroll_offset = self.selected_index + 1 - self.visible_rows.max(1);
        }
    }

    fn max_index(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    fn move_down(&mut self, by: usize) {
        self.selected_index = (self.selected_index + by).min(self.max_index());
        self.ensure_visible();
    }

    fn move_up(&mut self, by: usize) {
        self.selected_index = self.selected_index.saturating_sub(by);
        self.ensure_visible();
    }

    fn half_page(&self) -> usize {
        (self.visible_rows / 2).max(1)
    }

    /// Move selection down one line
    pub fn select_next(&mut self) {
        self.move_down(1);
    }

    /// Move selection up one line
    pub fn select_prev(&mut self) {
        self.move_up(1);
    }

    pub fn half_page_down(&mut self) {
        self.move_down(self.half_page());
    }

    pub fn half_page_up(&mut self) {
        self.move_up(self.half_page());
    }

    pub fn page_down(&mut self) {
        self.move_down(self.visible_rows.max(1));
    }

    pub fn page_up(&mut self) {
        self.move_up(self.visible_rows.max(1));
    }

    /// Home
    pub fn select_first(&mut self) {
        self.selected_index = 0;
        self.scroll_offset = 0;
    }

    /// End
    pub fn select_last(&mut self) {
        self.selected_index = self.max_index();
        self.ensure_visible();
    }

    pub fn selected_row(&self) -> Option<&DisplayRow> {
        self.rows.get(self.selected_index)
    }

    /// Clamp selection and scroll to the current row count and viewport
    pub fn clamp_selection(&mut self) {
        if self.rows.is_empty() {
            self.selected_index = 0;
            self.scroll_offset = 0;
            return;
        }
        if self.selected_index > self.max_index() {
            self.selected_index = self.max_index();
        }
        let last_page_start = self.rows.len().saturating_sub(self.visible_rows.max(1));
        if self.scroll_offset > last_page_start {
            self.scroll_offset = last_page_start;
        }
        self.ensure_visible();
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
