//! Trailer launcher - browser/mpv playback
//!
//! The terminal can't embed a video, so trailers are handed off to
//! the system browser or played directly in mpv.

use std::process::Stdio;
use thiserror::Error;
use tokio::process::{Child, Command};
use tracing::info;

/// Where a trailer URL gets opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LaunchTarget {
    /// System default browser (default)
    #[default]
    Browser,
    /// mpv media player (plays YouTube URLs through yt-dlp)
    Mpv,
}

impl LaunchTarget {
    /// Get the command name for this target
    pub fn command(&self) -> &'static str {
        match self {
            LaunchTarget::Browser => {
                #[cfg(target_os = "macos")]
                return "open";
                #[cfg(target_os = "windows")]
                return "explorer";
                #[cfg(not(any(target_os = "macos", target_os = "windows")))]
                return "xdg-open";
            }
            LaunchTarget::Mpv => "mpv",
        }
    }

    /// Get a display name for this target
    pub fn display_name(&self) -> &'static str {
        match self {
            LaunchTarget::Browser => "browser",
            LaunchTarget::Mpv => "mpv",
        }
    }
}

impl std::fmt::Display for LaunchTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Errors from launching a trailer
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("'{0}' not found. Install it first.")]
    NotFound(String),
    #[error("Failed to launch: {0}")]
    StartFailed(#[from] std::io::Error),
    #[error("Refusing to open non-http URL: {0}")]
    InvalidUrl(String),
}

/// Build the command line for a target without spawning it
pub fn command_args(target: LaunchTarget, url: &str) -> Vec<String> {
    match target {
        LaunchTarget::Browser => vec![url.to_string()],
        LaunchTarget::Mpv => vec![
            url.to_string(),
            "--force-window=immediate".to_string(),
            "--ytdl-format=bestvideo[height<=1080]+bestaudio/best".to_string(),
        ],
    }
}

/// Open `url` with the given target, detached from the terminal
pub async fn launch(target: LaunchTarget, url: &str) -> Result<Child, LaunchError> {
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(LaunchError::InvalidUrl(url.to_string()));
    }

    let mut cmd = Command::new(target.command());
    cmd.args(command_args(target, url));

    // Keep the TUI clean
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::null());
    cmd.stderr(Stdio::null());

    info!(%target, url, "launching trailer");
    cmd.spawn().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            LaunchError::NotFound(target.command().to_string())
        } else {
            LaunchError::StartFailed(e)
        }
    })
}
