//! ReelPeek - Cyberpunk TUI for browsing movies and previewing trailers
//!
//! A neon-soaked terminal interface over the TMDb catalog: popular movies,
//! title search, a trailer preview modal and a recently watched list.
//!
//! # Modules
//!
//! - `models` - TMDb data structures and history entries
//! - `storage` - Persistent key/value store
//! - `config` - Config file, credentials and API session
//! - `api` - TMDb client
//! - `catalog` - Popular listing and search
//! - `trailer` - Trailer selection
//! - `preview` - Preview modal state machine
//! - `history` - Recently watched store
//! - `launcher` - Browser/mpv handoff
//! - `ui` - TUI components
//! - `app` - Application state and input handling
//! - `runtime` - Async action dispatcher

pub mod api;
pub mod app;
pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod history;
pub mod launcher;
pub mod logging;
pub mod models;
pub mod preview;
pub mod runtime;
pub mod storage;
pub mod trailer;
pub mod ui;

// Re-export commonly used types
pub use models::{MovieDetail, MovieSummary, RecentEntry, Video};

pub use api::{TmdbClient, TmdbError};
pub use app::{Action, App, AppEvent};
pub use catalog::{CatalogOutcome, CatalogQuery, CatalogTicket};
pub use config::{Config, Credentials, Session};
pub use history::RecentlyWatched;
pub use preview::{PreviewModal, PreviewState};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use trailer::{select_trailer, TrailerView};
