//! Configuration management for ReelPeek
//!
//! Handles config file loading/saving and TMDB credential resolution.
//! Config is stored at ~/.config/reelpeek/config.toml

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::storage::{Storage, StorageError, API_KEY_KEY, TOKEN_KEY};

/// Default TMDB API base
pub const DEFAULT_API_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Marker for unfilled template values ("YOUR_TMDB_V3_API_KEY" etc.)
const PLACEHOLDER_MARKER: &str = "YOUR_TMDB";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Override for the TMDB API base URL
    pub api_base_url: Option<String>,
    /// Override for the poster image base URL
    pub image_base_url: Option<String>,
    /// Default V3 API key (used when nothing is stored)
    pub tmdb_api_key: Option<String>,
    /// Default V4 read access token (used when nothing is stored)
    pub tmdb_v4_token: Option<String>,
    /// Where the local key/value store lives
    pub storage_path: Option<PathBuf>,
    /// Log file for TUI mode
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Get config file path (~/.config/reelpeek/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("reelpeek").join("config.toml"))
    }

    /// Load config from file, or return default if not found
    pub fn load() -> Self {
        Self::path().map(|p| Self::load_from(&p)).unwrap_or_default()
    }

    /// Load config from an explicit path, or return default
    pub fn load_from(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| match toml::from_str(&s) {
                Ok(config) => Some(config),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "ignoring malformed config");
                    None
                }
            })
            .unwrap_or_default()
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        let path = Self::path().ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;
        self.save_to(&path)
    }

    /// Save config to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL)
    }

    pub fn image_base_url(&self) -> &str {
        self.image_base_url
            .as_deref()
            .unwrap_or(crate::models::IMAGE_BASE_URL)
    }

    /// Storage file location (config override, else data dir)
    pub fn storage_path(&self) -> Option<PathBuf> {
        self.storage_path
            .clone()
            .or_else(crate::storage::FileStorage::default_path)
    }

    /// Log file location (config override, else data dir)
    pub fn log_file(&self) -> Option<PathBuf> {
        self.log_file
            .clone()
            .or_else(|| dirs::data_dir().map(|p| p.join("reelpeek").join("logs").join("reelpeek.log")))
    }

    /// Default credentials with fallback chain:
    /// 1. Environment variables TMDB_V4_TOKEN / TMDB_API_KEY
    /// 2. Values from the config file
    pub fn default_credentials(&self) -> Credentials {
        let token = std::env::var("TMDB_V4_TOKEN")
            .ok()
            .or_else(|| self.tmdb_v4_token.clone());
        let api_key = std::env::var("TMDB_API_KEY")
            .ok()
            .or_else(|| self.tmdb_api_key.clone());
        Credentials::new(token, api_key)
    }
}

// =============================================================================
// Credentials
// =============================================================================

/// Which credential a request authenticates with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    /// `Authorization: Bearer <token>` (V4 read access token)
    Bearer,
    /// `api_key=<key>` query parameter (V3 key)
    ApiKey,
}

impl std::fmt::Display for AuthMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthMode::Bearer => write!(f, "V4 token"),
            AuthMode::ApiKey => write!(f, "API key"),
        }
    }
}

/// Bearer token / query key pair
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    token: Option<String>,
    api_key: Option<String>,
}

/// Partial credential update; `None` leaves a value untouched, `Some("")` clears it
#[derive(Debug, Clone, Default)]
pub struct CredentialUpdate {
    pub api_key: Option<String>,
    pub token: Option<String>,
}

/// Treat empty strings and template placeholders as absent
fn usable(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty() && !v.contains(PLACEHOLDER_MARKER))
}

impl Credentials {
    pub fn new(token: Option<String>, api_key: Option<String>) -> Self {
        Self {
            token: usable(token),
            api_key: usable(api_key),
        }
    }

    /// Resolve credentials: stored values win, defaults fill the gaps.
    ///
    /// Storage read failures are logged and treated as "nothing stored".
    pub fn resolve(storage: &dyn Storage, defaults: &Credentials) -> Self {
        let read = |key: &str| match storage.get(key) {
            Ok(value) => usable(value),
            Err(e) => {
                warn!(key, error = %e, "failed to read stored credential");
                None
            }
        };

        Self {
            token: read(TOKEN_KEY).or_else(|| defaults.token.clone()),
            api_key: read(API_KEY_KEY).or_else(|| defaults.api_key.clone()),
        }
    }

    /// Apply an update and persist every supplied field
    pub fn update(
        &mut self,
        storage: &dyn Storage,
        update: CredentialUpdate,
    ) -> Result<(), StorageError> {
        if let Some(api_key) = update.api_key {
            storage.set(API_KEY_KEY, &api_key)?;
            self.api_key = usable(Some(api_key));
        }
        if let Some(token) = update.token {
            storage.set(TOKEN_KEY, &token)?;
            self.token = usable(Some(token));
        }
        Ok(())
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Bearer when a usable token exists, else query key
    pub fn default_mode(&self) -> AuthMode {
        if self.token.is_some() {
            AuthMode::Bearer
        } else {
            AuthMode::ApiKey
        }
    }

    /// Credential for the given mode, if present
    pub fn for_mode(&self, mode: AuthMode) -> Option<&str> {
        match mode {
            AuthMode::Bearer => self.token(),
            AuthMode::ApiKey => self.api_key(),
        }
    }

    /// True when neither credential is set
    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.api_key.is_none()
    }
}

/// Mask a secret for display (first/last 4 chars)
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}…{}", head, tail)
}

/// Everything the API client needs, snapshotted at construction time.
///
/// Rebuilt (and a new client issued) whenever credentials change.
#[derive(Debug, Clone)]
pub struct Session {
    pub credentials: Credentials,
    pub base_url: String,
}

impl Session {
    pub fn new(credentials: Credentials, base_url: impl Into<String>) -> Self {
        Self {
            credentials,
            base_url: base_url.into(),
        }
    }
}
