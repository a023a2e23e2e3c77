use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, AppMode};

/// Handle a single key input event.
pub fn handle_input(app: &mut App, key: KeyEvent) {
    // Ctrl-C is the interrupt signal under raw mode; honour it everywhere
    if is_ctrl(&key, 'c') {
        app.should_quit = true;
        return;
    }
    match app.mode {
        AppMode::Normal => handle_normal_mode(app, key),
        AppMode::Help => handle_help_mode(app, key),
    }
}

fn is_ctrl(key: &KeyEvent, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(c)
}

// ── Normal mode ─────────────────────────────────────────────────────────

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        // ── Quit ──
        KeyCode::F(10) | KeyCode::Char('q') => app.should_quit = true,

        // ── Half pages (Ctrl-D / Ctrl-U) ──
        KeyCode::Char('d') if ctrl => app.half_page_down(),
        KeyCode::Char('u') if ctrl => app.half_page_up(),

        // ── Full pages (Ctrl-F / Ctrl-B, PgDn / PgUp) ──
        KeyCode::Char('f') if ctrl => app.page_down(),
        KeyCode::Char('b') if ctrl => app.page_up(),
        KeyCode::PageDown => app.page_down(),
        KeyCode::PageUp => app.page_up(),

        // ── Manual refresh (also unpauses) ──
        KeyCode::Char('l') if ctrl => request_refresh(app),
        KeyCode::Char('r') => request_refresh(app),

        // ── Lines ──
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),

        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),

        // ── Pause timer refreshes ──
        KeyCode::Char('z') | KeyCode::Char('Z') => app.paused = !app.paused,

        // ── Help ──
        KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('h') => app.mode = AppMode::Help,

        _ => {}
    }
}

fn request_refresh(app: &mut App) {
    app.paused = false;
    app.refresh_requested = true;
}

// ── Help popup ──────────────────────────────────────────────────────────

fn handle_help_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::F(10) => app.should_quit = true,
        KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Enter => {
            app.mode = AppMode::Normal;
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::collector::Snapshot;
    use crate::system::process::ProcessRecord;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn app_with_rows(n: u32) -> App {
        let mut app = App::new();
        app.visible_rows = 10;
        app.apply_snapshot(&Snapshot {
            records: (0..n)
                .map(|pid| ProcessRecord {
                    pid,
                    user: "u".into(),
                    command: String::new(),
                    cpu_percent: 0.0,
                })
                .collect(),
            ..Default::default()
        });
        app
    }

    #[test]
    fn quit_keys() {
        for k in [key(KeyCode::Char('q')), key(KeyCode::F(10)), ctrl('c')] {
            let mut app = App::new();
            handle_input(&mut app, k);
            assert!(app.should_quit);
        }
    }

    #[test]
    fn ctrl_c_quits_from_help() {
        let mut app = App::new();
        app.mode = AppMode::Help;
        handle_input(&mut app, ctrl('c'));
        assert!(app.should_quit);
    }

    #[test]
    fn vim_and_arrow_lines() {
        let mut app = app_with_rows(40);
        handle_input(&mut app, key(KeyCode::Char('j')));
        handle_input(&mut app, key(KeyCode::Down));
        assert_eq!(app.selected_index, 2);
        handle_input(&mut app, key(KeyCode::Char('k')));
        assert_eq!(app.selected_index, 1);
        handle_input(&mut app, key(KeyCode::Up));
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn page_bindings() {
        let mut app = app_with_rows(40);
        handle_input(&mut app, ctrl('d'));
        assert_eq!(app.selected_index, 5);
        handle_input(&mut app, ctrl('f'));
        assert_eq!(app.selected_index, 15);
        handle_input(&mut app, key(KeyCode::PageDown));
        assert_eq!(app.selected_index, 25);
        handle_input(&mut app, ctrl('u'));
        assert_eq!(app.selected_index, 20);
        handle_input(&mut app, ctrl('b'));
        handle_input(&mut app, key(KeyCode::PageUp));
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn plain_letters_are_not_page_moves() {
        let mut app = app_with_rows(40);
        handle_input(&mut app, key(KeyCode::Char('d')));
        handle_input(&mut app, key(KeyCode::Char('f')));
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn refresh_request_unpauses() {
        let mut app = App::new();
        handle_input(&mut app, key(KeyCode::Char('z')));
        assert!(app.paused);
        handle_input(&mut app, ctrl('l'));
        assert!(!app.paused);
        assert!(app.refresh_requested);
    }

    #[test]
    fn help_opens_and_closes() {
        let mut app = App::new();
        handle_input(&mut app, key(KeyCode::F(1)));
        assert_eq!(app.mode, AppMode::Help);
        handle_input(&mut app, key(KeyCode::Char('j')));
        assert_eq!(app.mode, AppMode::Help);
        handle_input(&mut app, key(KeyCode::Esc));
        assert_eq!(app.mode, AppMode::Normal);
    }
}
