//! ReelPeek - Cyberpunk TUI for browsing movies and previewing trailers
//!
//! # Usage
//!
//! ```bash
//! # Launch interactive TUI
//! reelpeek
//!
//! # CLI mode (for automation)
//! reelpeek search "blade runner"
//! reelpeek preview 78 --play
//! reelpeek recent --json
//! ```

use std::io::{stdout, Stdout};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use tracing::{info, warn};

use reelpeek::app::App;
use reelpeek::catalog::CatalogQuery;
use reelpeek::cli::{self, Cli, Command, ExitCode, Output};
use reelpeek::commands::{self, Context};
use reelpeek::config::{Config, Credentials, Session};
use reelpeek::runtime::Runtime;
use reelpeek::storage::{FileStorage, MemoryStorage, Storage};
use reelpeek::{logging, ui, TmdbClient};

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.is_cli_mode() {
        // CLI mode: log to stderr, execute command and exit
        logging::init_stderr(cli.verbose, cli.quiet);
        let config = load_config(&cli);
        let exit_code = run_cli(cli, &config).await;
        std::process::exit(exit_code.into());
    }

    // TUI mode: the terminal is ours, so logs go to a file
    let config = load_config(&cli);
    let _guard = match config.log_file() {
        Some(path) => logging::init_file(cli.verbose, &path)?,
        None => None,
    };
    run_tui(&config).await
}

fn load_config(cli: &Cli) -> Config {
    match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// Open the file store, falling back to memory so the app still runs
fn open_storage(config: &Config) -> Arc<dyn Storage> {
    let Some(path) = config.storage_path() else {
        warn!("no data directory; recently watched and credentials won't persist");
        return Arc::new(MemoryStorage::new());
    };

    match FileStorage::open(&path) {
        Ok(storage) => Arc::new(storage),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "storage unavailable, using memory");
            Arc::new(MemoryStorage::new())
        }
    }
}

fn resolve_credentials(config: &Config, storage: &dyn Storage) -> Credentials {
    Credentials::resolve(storage, &config.default_credentials())
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli, config: &Config) -> ExitCode {
    let output = Output::new(&cli);
    let storage = open_storage(config);
    let credentials = resolve_credentials(config, storage.as_ref());
    let ctx = Context::new(storage, credentials, config.api_base_url(), config.image_base_url());

    match cli.command {
        Some(Command::Popular(cmd)) => commands::popular_cmd(cmd, &ctx, &output).await,

        Some(Command::Search(cmd)) => commands::search_cmd(cmd, &ctx, &output).await,

        Some(Command::Preview(cmd)) => {
            if let Err(e) = cli::validate_movie_id(cmd.id) {
                return output.error(e, ExitCode::InvalidArgs);
            }
            commands::preview_cmd(cmd, &ctx, &output).await
        }

        Some(Command::Recent(cmd)) => commands::recent_cmd(cmd, &ctx, &output).await,

        Some(Command::Auth(cmd)) => commands::auth_cmd(cmd, &ctx, &output).await,

        None => {
            // This shouldn't happen (handled by is_cli_mode check)
            ExitCode::Success
        }
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run interactive TUI
async fn run_tui(config: &Config) -> Result<()> {
    let storage = open_storage(config);
    let credentials = resolve_credentials(config, storage.as_ref());
    let missing = credentials.is_empty();

    let client = TmdbClient::new(Session::new(credentials.clone(), config.api_base_url()));
    let (mut runtime, events) = Runtime::new(client);
    let mut app = App::new(storage, credentials, config.image_base_url());

    info!(api = config.api_base_url(), "starting TUI");
    runtime.dispatch(app.begin_load(CatalogQuery::Popular));
    if missing {
        app.open_credentials(Some(
            "No TMDb credentials found. Enter a V4 token or a V3 API key.".into(),
        ));
    }

    let mut terminal = init_terminal()?;

    let result = run_event_loop(&mut terminal, &mut app, &mut runtime, events).await;

    // Always restore terminal, even on error
    restore_terminal(&mut terminal)?;

    result
}

/// Main event loop - handles input, applies async results, renders UI
async fn run_event_loop(
    terminal: &mut Tui,
    app: &mut App,
    runtime: &mut Runtime,
    mut events: tokio::sync::mpsc::UnboundedReceiver<reelpeek::AppEvent>,
) -> Result<()> {
    const TICK_RATE: Duration = Duration::from_millis(100);
    let mut area = Rect::default();

    while app.running {
        // Render current state
        terminal.draw(|frame| {
            area = frame.area();
            app.set_viewport(area);
            ui::render(frame, app);
        })?;

        // Poll for input with timeout so async results keep flowing
        if event::poll(TICK_RATE)? {
            let action = match event::read()? {
                // Only handle key press events (ignore releases on Windows)
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse, area),
                _ => None,
            };
            if let Some(action) = action {
                runtime.dispatch(action);
            }
        }

        // Drain completed tasks
        while let Ok(event) = events.try_recv() {
            app.apply_event(event);
        }
    }

    Ok(())
}
