//! proctop — a live process monitor for Linux, written in Rust.
//!
//! Shows PID, USER, CPU% and command line for every process, sampled from
//! /proc once per interval.
//!
//! Keybindings: Press F1 or '?' for help.

use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};

use proctop::app::App;
use proctop::cli::Args;
use proctop::config::ProctopConfig;
use proctop::input;
use proctop::scheduler::{Scheduler, SchedulerEvent};
use proctop::system::collector::Collector;
use proctop::system::procfs::ProcFs;
use proctop::ui;

fn main() -> Result<()> {
    let args = Args::parse();
    let config = ProctopConfig::resolve(&args)?;
    init_logging(&args)?;
    info!(?config, "starting proctop");

    // Checked before the terminal changes mode so the message stays readable
    let procfs = ProcFs::new(&config.proc_root);
    procfs.check_available()?;
    let mut collector = Collector::new(procfs);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the app
    let result = run_app(&mut terminal, &mut collector, &config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        error!(error = %e, "fatal");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    info!("exiting");
    Ok(())
}

/// Logging goes to a file only; the terminal belongs to the UI.
fn init_logging(args: &Args) -> Result<()> {
    let (Some(path), Some(level)) = (&args.log_file, args.log_level.as_level()) else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(file))
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;
    Ok(())
}

/// Main application loop
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    collector: &mut Collector,
    config: &ProctopConfig,
) -> Result<()> {
    let mut app = App::new();
    config.apply_to(&mut app);
    let mut scheduler = Scheduler::new(
        Duration::from_millis(config.update_interval_ms),
        Instant::now(),
    );

    // Initial data collection
    scheduler.dispatch(SchedulerEvent::Refresh, collector, &mut app, Instant::now())?;

    loop {
        // Update visible rows based on terminal size
        let size = terminal.size()?;
        app.visible_rows = size.height.saturating_sub(ui::chrome_height(&app)).max(1) as usize;
        app.clamp_selection();

        terminal.draw(|f| ui::draw(f, &app))?;

        // Block on input until the next tick is due
        if event::poll(scheduler.time_until_tick(Instant::now()))? {
            // Resize needs nothing here; the next draw picks it up
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    input::handle_input(&mut app, key);
                }
            }
        }

        if app.should_quit {
            scheduler.dispatch(SchedulerEvent::Quit, collector, &mut app, Instant::now())?;
        }
        if scheduler.is_terminated() {
            return Ok(());
        }

        if std::mem::take(&mut app.refresh_requested) {
            scheduler.dispatch(SchedulerEvent::Refresh, collector, &mut app, Instant::now())?;
        }
        if scheduler.due(Instant::now()) {
            scheduler.dispatch(SchedulerEvent::Tick, collector, &mut app, Instant::now())?;
        }
    }
}
