//! jobtrail-tui - job application tracker dashboard
//!
//! Terminal UI for browsing records, analytics charts, and the
//! auto-refreshing activity feed.

mod app;
mod ui;

use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use jobtrail_core::{Config, Database};

use crate::app::App;

fn main() -> Result<()> {
    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging (to file, not stdout since we have a TUI)
    let _log_guard =
        jobtrail_core::logging::init(&config.logging).context("failed to initialize logging")?;

    tracing::info!("jobtrail TUI starting up");

    // Open database
    let db_path = Config::database_path();
    tracing::info!(path = %db_path.display(), "Opening database");

    let db = Database::open(&db_path).context("failed to open database")?;
    db.migrate().context("failed to run database migrations")?;

    // Create app and take the first snapshot
    let mut app = App::new(db, &config).context("failed to load records")?;

    // Setup terminal
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    // Run the main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;

    tracing::info!("jobtrail TUI shutting down");

    result
}

/// Run the main application loop.
///
/// The activity auto-refresh timer lives here: it only fires while the
/// loop runs, so quitting the UI tears it down with everything else.
fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let mut last_refresh = Instant::now();

    loop {
        // Re-snapshot the store on the configured interval while the
        // activity feed is visible
        if app.auto_refresh
            && app.is_activity_view()
            && last_refresh.elapsed() >= app.refresh_interval()
        {
            if let Err(e) = app.refresh() {
                tracing::warn!(error = %e, "Auto-refresh failed");
            }
            last_refresh = Instant::now();
        }

        // Render
        terminal.draw(|frame| ui::render(frame, app))?;

        // Handle events
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
                if app.manual_refresh_requested {
                    last_refresh = Instant::now();
                    app.manual_refresh_requested = false;
                }
            }
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    Ok(())
}
