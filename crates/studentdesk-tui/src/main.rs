//! Studentdesk - a terminal user interface for student records.
//!
//! Lists, searches, adds, edits and deletes students held by a remote REST
//! store. Every change is followed by a full reload from the store.

mod app;
mod ui;

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use studentdesk_core::models::sort_by_id;
use studentdesk_core::{ApiClient, Config};

use app::{App, AppState};
use ui::input::{handle_input, handle_mouse};
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

const LOG_FILE: &str = "studentdesk.log";

const USAGE: &str = "\
Usage: studentdesk [--dump | --help]

  (no args)  Start the TUI
  --dump     Print the student list as JSON and exit
  --help     Show this message

Environment:
  STUDENT_API_BASE_URL  Student store address, e.g. http://localhost:8080/api/students
  STUDENT_DATE_LOCALE   Birth date display locale (default vi-VN)
  RUST_LOG              Log filter (default info)";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Log to a file while the TUI owns the terminal.
/// The returned guard must live until shutdown so buffered lines are flushed.
fn init_file_tracing() -> Result<WorkerGuard> {
    let log_dir = Config::log_dir()?;
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .with(env_filter())
        .init();
    Ok(guard)
}

fn init_stderr_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("--help") | Some("-h") => {
            println!("{}", USAGE);
            return Ok(());
        }
        Some("--dump") => {
            init_stderr_tracing();
            return dump_students().await;
        }
        Some(other) => {
            eprintln!("Unknown argument: {}\n\n{}", other, USAGE);
            std::process::exit(2);
        }
        None => {}
    }

    let _guard = init_file_tracing()?;
    info!("Studentdesk starting");

    // Fail on bad configuration before touching the terminal
    let config = Config::load()?;
    let mut app = App::new(&config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    app.reload_background();

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("Studentdesk shutting down");
    Ok(())
}

/// Print the store's collection, sorted by id, as pretty JSON on stdout.
async fn dump_students() -> Result<()> {
    let config = Config::load()?;
    let api = ApiClient::with_timeout(config.base_url()?, config.request_timeout())?;

    let mut students = api.list_students().await?;
    sort_by_id(&mut students);

    println!("{}", serde_json::to_string_pretty(&students)?);
    eprintln!("{} students from {}", students.len(), api.base_url());
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        let screen = terminal.draw(|f| render(f, app))?.area;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            match event::read()? {
                Event::Key(key) => {
                    if handle_input(app, key) {
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) => handle_mouse(app, mouse, screen),
                _ => {}
            }
        }

        // Check for completed background tasks
        app.check_background_tasks();

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
