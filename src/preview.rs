//! Preview modal state machine
//!
//! `Closed → Loading → Loaded | Failed → Closed`
//!
//! Only one preview exists at a time. Every `open` hands out a fresh
//! [`PreviewTicket`]; results carrying an older ticket are dropped so a
//! slow response can never overwrite the movie the user is looking at.

use crate::api::TmdbError;
use crate::models::{MovieDetail, Video};
use crate::trailer::TrailerView;

/// Placeholder text while the preview loads
pub const LOADING_MESSAGE: &str = "Loading trailer...";

/// Identifies one `open` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewTicket {
    pub movie_id: u64,
    generation: u64,
}

/// Everything shown once a preview has loaded
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewContent {
    pub movie_id: u64,
    pub title: String,
    pub release_date: String,
    pub view: TrailerView,
}

impl PreviewContent {
    pub fn new(detail: &MovieDetail, videos: &[Video]) -> Self {
        Self {
            movie_id: detail.id,
            title: detail.title.clone(),
            release_date: detail.release_date().unwrap_or_default().to_string(),
            view: TrailerView::from_videos(detail.id, videos),
        }
    }
}

/// Modal state
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PreviewState {
    #[default]
    Closed,
    Loading { movie_id: u64 },
    Loaded(PreviewContent),
    Failed { movie_id: u64, message: String },
}

/// Preview modal with stale-result protection
#[derive(Debug, Default)]
pub struct PreviewModal {
    state: PreviewState,
    generation: u64,
}

impl PreviewModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PreviewState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != PreviewState::Closed
    }

    /// Open a preview, replacing whatever was shown before
    pub fn open(&mut self, movie_id: u64) -> PreviewTicket {
        self.generation += 1;
        self.state = PreviewState::Loading { movie_id };
        PreviewTicket {
            movie_id,
            generation: self.generation,
        }
    }

    /// True if `ticket` belongs to the preview currently loading
    pub fn is_current(&self, ticket: PreviewTicket) -> bool {
        ticket.generation == self.generation
            && matches!(self.state, PreviewState::Loading { movie_id } if movie_id == ticket.movie_id)
    }

    /// Apply a fetch outcome. Returns false when the ticket is stale
    /// (superseded or closed) and the result was discarded.
    pub fn resolve(
        &mut self,
        ticket: PreviewTicket,
        result: Result<PreviewContent, TmdbError>,
    ) -> bool {
        if !self.is_current(ticket) {
            return false;
        }

        self.state = match result {
            Ok(content) => PreviewState::Loaded(content),
            Err(e) => PreviewState::Failed {
                movie_id: ticket.movie_id,
                message: format!("Failed to load trailer: {}", e),
            },
        };
        true
    }

    /// Close the modal; any in-flight result becomes stale
    pub fn close(&mut self) {
        self.generation += 1;
        self.state = PreviewState::Closed;
    }

    /// Loaded content, if any
    pub fn content(&self) -> Option<&PreviewContent> {
        match &self.state {
            PreviewState::Loaded(content) => Some(content),
            _ => None,
        }
    }
}
