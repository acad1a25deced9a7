//! CLI - Command Line Interface for ReelPeek
//!
//! Every TUI action is scriptable. All output is JSON-parseable.
//!
//! # Examples
//!
//! ```bash
//! reelpeek popular --limit 5
//! reelpeek search "blade runner" --json
//! reelpeek preview 438631 --open
//! reelpeek recent --clear
//! reelpeek auth --token "$TMDB_V4_TOKEN"
//! ```

use clap::{ArgAction, Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Network error
    NetworkError = 3,
    /// Credentials missing or rejected
    AuthError = 4,
    /// Nothing matched
    NoResults = 5,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// ReelPeek - Cyberpunk TUI for browsing movies and previewing trailers
///
/// Run without arguments to launch interactive TUI.
/// Use subcommands for scriptable automation.
#[derive(Parser, Debug)]
#[command(
    name = "reelpeek",
    version,
    about = "Cyberpunk TUI for browsing movies and previewing trailers",
    long_about = "A neon-soaked terminal interface for browsing popular movies, \
                  searching TMDb and previewing trailers.\n\n\
                  Run without arguments to launch the interactive TUI.\n\
                  Use subcommands for automation and scripting.",
    after_help = "EXAMPLES:\n\
                  reelpeek                            Launch interactive TUI\n\
                  reelpeek search \"blade runner\"      Search for movies\n\
                  reelpeek preview 438631 --play      Play a trailer in mpv\n\
                  reelpeek recent --json              Recently watched as JSON"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run (omit for TUI mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Check if running in CLI mode (has subcommand)
    pub fn is_cli_mode(&self) -> bool {
        self.command.is_some()
    }

    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List popular movies
    #[command(visible_alias = "pop")]
    Popular(PopularCmd),

    /// Search movies by title
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// Show a movie's trailer (and record it as watched)
    #[command(visible_alias = "p")]
    Preview(PreviewCmd),

    /// Show or clear recently watched movies
    #[command(visible_alias = "r")]
    Recent(RecentCmd),

    /// Inspect or update TMDb credentials
    Auth(AuthCmd),
}

/// List popular movies
#[derive(Args, Debug)]
pub struct PopularCmd {
    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,
}

/// Search movies by title
#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Search term (blank falls back to popular)
    #[arg(required = true)]
    pub query: String,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,
}

/// Preview a movie's trailer
#[derive(Args, Debug)]
pub struct PreviewCmd {
    /// TMDb movie ID
    #[arg(required = true)]
    pub id: u64,

    /// Open the trailer in the default browser
    #[arg(long, short = 'o', conflicts_with = "play")]
    pub open: bool,

    /// Play the trailer in mpv
    #[arg(long, short = 'p')]
    pub play: bool,
}

/// Show or clear recently watched
#[derive(Args, Debug)]
pub struct RecentCmd {
    /// Remove every entry
    #[arg(long)]
    pub clear: bool,
}

/// Inspect or update credentials
#[derive(Args, Debug)]
pub struct AuthCmd {
    /// Store a V4 read access token ("" clears it)
    #[arg(long, short = 't')]
    pub token: Option<String>,

    /// Store a V3 API key ("" clears it)
    #[arg(long, short = 'k')]
    pub key: Option<String>,

    /// Print the active credentials (masked)
    #[arg(long, short = 's')]
    pub show: bool,
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

/// Status OK response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusOk {
    pub status: &'static str,
}

impl Default for StatusOk {
    fn default() -> Self {
        Self { status: "ok" }
    }
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data as JSON
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Ok(())
    }

    /// Print a human-readable line (JSON mode prints nothing)
    pub fn line(&self, msg: impl std::fmt::Display) {
        if !self.json {
            println!("{}", msg);
        }
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Validation
// =============================================================================

/// TMDb ids are positive; 0 means "no movie"
pub fn validate_movie_id(id: u64) -> Result<u64, &'static str> {
    if id == 0 {
        Err("Invalid movie ID (expected a positive TMDb ID)")
    } else {
        Ok(id)
    }
}

// =============================================================================
// Tests
// =============================================================================
