//! tripgen - plan a multi-city trip from the terminal
//!
//! A terminal UI that collects a country, a set of cities and a trip length,
//! and shows the day-by-day itinerary generated by a remote service.

use std::io;
use std::panic;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};

use tripgen::app::App;
use tripgen::cli::{Cli, StartupConfig};
use tripgen::data::{build_http_client, ItineraryClient, SuggestionClient};
use tripgen::worker::{try_recv, Worker};
use tripgen::{logging, ui};

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Runs the event loop until the user quits
async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    worker: &mut Worker,
) -> io::Result<()> {
    if let Some(action) = app.initial_action() {
        worker.dispatch(action);
    }

    loop {
        // Apply every finished request before drawing
        while let Some(message) = try_recv(worker) {
            app.apply(message);
        }

        terminal.draw(|f| ui::render(f, app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(action) = app.handle_key(key) {
                        worker.dispatch(action);
                    }
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return Ok(ExitCode::from(2));
        }
    };

    match logging::init(config.log_file.as_deref()) {
        Ok(path) => info!(log_file = %path.display(), api_url = %config.api_url, "starting tripgen"),
        Err(e) => eprintln!("warning: logging disabled: {}", e),
    }

    let http_client = build_http_client(config.timeout)?;
    let mut worker = Worker::new(
        SuggestionClient::with_client(http_client.clone(), config.api_url.clone()),
        ItineraryClient::with_client(http_client, config.api_url.clone()),
    );
    let mut app = App::with_startup_config(&config);

    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app, &mut worker).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    if let Err(e) = &result {
        error!(error = %e, "terminal error");
    }
    result?;
    info!("exiting");
    Ok(ExitCode::SUCCESS)
}
