//! CLI Command Handlers
//!
//! Implements all CLI commands by calling the appropriate backend services.
//! Each handler takes CLI args, a [`Context`] and Output, returns ExitCode.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::api::{TmdbClient, TmdbError};
use crate::catalog::{self, CatalogQuery};
use crate::cli::{AuthCmd, ExitCode, Output, PopularCmd, PreviewCmd, RecentCmd, SearchCmd, StatusOk};
use crate::config::{mask_secret, AuthMode, CredentialUpdate, Credentials, Session};
use crate::history::{RecentlyWatched, EMPTY_MESSAGE};
use crate::launcher::{self, LaunchTarget};
use crate::models::{format_rating, poster_url, MovieSummary, RecentEntry};
use crate::storage::Storage;
use crate::trailer::TrailerView;

// =============================================================================
// Context
// =============================================================================

/// Everything a command needs, resolved once at startup
pub struct Context {
    pub client: TmdbClient,
    pub storage: Arc<dyn Storage>,
    pub credentials: Credentials,
    pub image_base: String,
}

impl Context {
    pub fn new(storage: Arc<dyn Storage>, credentials: Credentials, base_url: &str, image_base: &str) -> Self {
        Self {
            client: TmdbClient::new(Session::new(credentials.clone(), base_url)),
            storage,
            credentials,
            image_base: image_base.to_string(),
        }
    }

    pub fn history(&self) -> RecentlyWatched {
        RecentlyWatched::new(self.storage.clone())
    }
}

/// Map an API failure to a scripting exit code
pub fn exit_code_for(err: &TmdbError) -> ExitCode {
    if err.is_unauthorized() {
        return ExitCode::AuthError;
    }
    match err {
        TmdbError::Network(_) | TmdbError::Http { .. } => ExitCode::NetworkError,
        _ => ExitCode::Error,
    }
}

// =============================================================================
// Listing Output
// =============================================================================

/// One movie in `popular` / `search` output
#[derive(Debug, Serialize)]
pub struct MovieListing {
    pub id: u64,
    pub title: String,
    pub rating: String,
    pub poster_url: String,
}

impl MovieListing {
    fn new(movie: &MovieSummary, image_base: &str) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            rating: format_rating(movie.vote_average),
            poster_url: poster_url(image_base, movie.poster_path.as_deref()),
        }
    }
}

fn print_listing(movies: &[MovieSummary], limit: usize, ctx: &Context, output: &Output) -> ExitCode {
    let listing: Vec<MovieListing> = movies
        .iter()
        .take(limit)
        .map(|m| MovieListing::new(m, &ctx.image_base))
        .collect();

    if output.json {
        if let Err(e) = output.print(&listing) {
            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
    } else {
        for movie in &listing {
            output.line(format!("{:>8}  {}  ⭐ {}", movie.id, movie.title, movie.rating));
        }
    }
    ExitCode::Success
}

async fn catalog_cmd(query: CatalogQuery, limit: usize, ctx: &Context, output: &Output) -> ExitCode {
    match catalog::fetch(&ctx.client, &query).await {
        Ok(movies) if movies.is_empty() => output.error(query.empty_message(), ExitCode::NoResults),
        Ok(movies) => print_listing(&movies, limit, ctx, output),
        Err(e) => output.error(query.failure_message(&e), exit_code_for(&e)),
    }
}

// =============================================================================
// Popular / Search Commands
// =============================================================================

pub async fn popular_cmd(cmd: PopularCmd, ctx: &Context, output: &Output) -> ExitCode {
    output.info("Fetching popular movies...");
    catalog_cmd(CatalogQuery::Popular, cmd.limit, ctx, output).await
}

pub async fn search_cmd(cmd: SearchCmd, ctx: &Context, output: &Output) -> ExitCode {
    let query = CatalogQuery::from_term(&cmd.query);
    match &query {
        CatalogQuery::Search(term) => output.info(format!("Searching for: {}", term)),
        CatalogQuery::Popular => output.info("Empty search, fetching popular movies..."),
    }
    catalog_cmd(query, cmd.limit, ctx, output).await
}

// =============================================================================
// Preview Command
// =============================================================================

/// `preview` output
#[derive(Debug, Serialize)]
pub struct PreviewReport {
    pub id: u64,
    pub title: String,
    pub release_date: Option<String>,
    pub trailer: TrailerView,
}

pub async fn preview_cmd(cmd: PreviewCmd, ctx: &Context, output: &Output) -> ExitCode {
    output.info(format!("Loading trailer for movie {}...", cmd.id));

    let (detail, videos) = match ctx.client.preview(cmd.id).await {
        Ok(result) => result,
        Err(e) => {
            return output.error(format!("Failed to load trailer: {}", e), exit_code_for(&e));
        }
    };

    if let Err(e) = ctx.history().record(RecentEntry::from_detail(&detail, Utc::now())) {
        warn!(error = %e, "failed to save recently watched");
    }

    let report = PreviewReport {
        id: detail.id,
        title: detail.title.clone(),
        release_date: detail.release_date().map(str::to_string),
        trailer: TrailerView::from_videos(detail.id, &videos),
    };

    if output.json {
        if let Err(e) = output.print(&report) {
            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
    } else {
        print_report(&report, output);
    }

    let target = if cmd.play {
        LaunchTarget::Mpv
    } else if cmd.open {
        LaunchTarget::Browser
    } else {
        return ExitCode::Success;
    };

    let Some(url) = report.trailer.primary_url() else {
        return output.error("No video to open", ExitCode::NoResults);
    };

    match launcher::launch(target, url).await {
        Ok(mut child) => {
            output.info(format!("Opening in {}...", target));
            if let Err(e) = child.wait().await {
                warn!(error = %e, %target, "waiting for launcher failed");
            }
            ExitCode::Success
        }
        Err(e) => output.error(e.to_string(), ExitCode::Error),
    }
}

fn print_report(report: &PreviewReport, output: &Output) {
    output.line(format!(
        "{} ({})",
        report.title,
        report.release_date.as_deref().unwrap_or("unknown date")
    ));
    match &report.trailer {
        TrailerView::Player { name, watch_url, .. } => {
            output.line(format!("▶ {}", name));
            output.line(format!("  {}", watch_url));
        }
        TrailerView::LinkList { videos } => {
            output.line("Available videos:");
            for video in videos {
                match &video.url {
                    Some(url) => output.line(format!("  • {}  {}", video.label, url)),
                    None => output.line(format!("  • {}", video.label)),
                }
            }
        }
        TrailerView::NoTrailer { tmdb_url } => {
            output.line("No trailer available.");
            output.line(format!("  View on TMDb: {}", tmdb_url));
        }
    }
}

// =============================================================================
// Recent Command
// =============================================================================

pub async fn recent_cmd(cmd: RecentCmd, ctx: &Context, output: &Output) -> ExitCode {
    let history = ctx.history();

    if cmd.clear {
        if let Err(e) = history.clear() {
            return output.error(format!("Failed to clear history: {}", e), ExitCode::Error);
        }
        info!("recently watched cleared");
        if output.json {
            if output.print(StatusOk::default()).is_err() {
                return ExitCode::Error;
            }
        } else {
            output.info("Recently watched cleared.");
        }
        return ExitCode::Success;
    }

    let entries = history.entries();
    if output.json {
        if let Err(e) = output.print(&entries) {
            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
    } else if entries.is_empty() {
        output.line(EMPTY_MESSAGE);
    } else {
        for entry in &entries {
            output.line(format!("{:>8}  {}  {}", entry.id, entry.title, entry.short_date()));
        }
    }
    ExitCode::Success
}

// =============================================================================
// Auth Command
// =============================================================================

/// `auth --show` output; secrets are masked
#[derive(Debug, Serialize)]
pub struct AuthStatus {
    pub mode: AuthMode,
    pub token: Option<String>,
    pub api_key: Option<String>,
}

impl AuthStatus {
    pub fn new(credentials: &Credentials) -> Self {
        Self {
            mode: credentials.default_mode(),
            token: credentials.token().map(mask_secret),
            api_key: credentials.api_key().map(mask_secret),
        }
    }
}

pub async fn auth_cmd(cmd: AuthCmd, ctx: &Context, output: &Output) -> ExitCode {
    let mut credentials = ctx.credentials.clone();
    let changed = cmd.token.is_some() || cmd.key.is_some();

    if changed {
        let update = CredentialUpdate {
            token: cmd.token.map(|t| t.trim().to_string()),
            api_key: cmd.key.map(|k| k.trim().to_string()),
        };
        if let Err(e) = credentials.update(ctx.storage.as_ref(), update) {
            return output.error(format!("Failed to save credentials: {}", e), ExitCode::Error);
        }
        info!(mode = %credentials.default_mode(), "credentials updated");
    }

    if !changed || cmd.show {
        let status = AuthStatus::new(&credentials);
        if output.json {
            if let Err(e) = output.print(&status) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
        } else {
            output.line(format!("Mode:    {}", status.mode));
            output.line(format!("Token:   {}", status.token.as_deref().unwrap_or("(not set)")));
            output.line(format!("API key: {}", status.api_key.as_deref().unwrap_or("(not set)")));
        }
    } else if output.json {
        if output.print(StatusOk::default()).is_err() {
            return ExitCode::Error;
        }
    } else {
        output.info("Credentials saved.");
    }

    if credentials.is_empty() {
        return output.error(
            "No TMDb credentials configured. Use --token or --key.",
            ExitCode::AuthError,
        );
    }
    ExitCode::Success
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(exit_code_for(&TmdbError::AuthMissing(AuthMode::Bearer)), ExitCode::AuthError);
        assert_eq!(
            exit_code_for(&TmdbError::Http {
                status: 401,
                message: "Invalid API key".into()
            }),
            ExitCode::AuthError
        );
        assert_eq!(
            exit_code_for(&TmdbError::Http {
                status: 503,
                message: "Service Unavailable".into()
            }),
            ExitCode::NetworkError
        );
        assert_eq!(
            exit_code_for(&TmdbError::InvalidResponse("bad".into())),
            ExitCode::Error
        );
    }

    #[test]
    fn test_auth_status_masks_secrets() {
        let creds = Credentials::new(Some("abcdefghijklmnop".into()), None);
        let status = AuthStatus::new(&creds);
        assert_eq!(status.mode, AuthMode::Bearer);
        assert_eq!(status.token.as_deref(), Some("abcd…mnop"));
        assert_eq!(status.api_key, None);
    }
}
