//! Recently watched history
//!
//! A most-recent-first list of previewed movies, capped at
//! [`MAX_RECENT`] entries and unique by movie id. Persisted as a
//! JSON array under a single storage key after every change.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::models::{poster_url, RecentEntry};
use crate::storage::{Storage, StorageError, RECENT_KEY};

/// Maximum number of remembered movies
pub const MAX_RECENT: usize = 12;

/// Shown when the history is empty
pub const EMPTY_MESSAGE: &str = "No recently watched movies yet.";

/// Recently watched store backed by [`Storage`]
#[derive(Clone)]
pub struct RecentlyWatched {
    storage: Arc<dyn Storage>,
}

impl RecentlyWatched {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Persisted entries. Unreadable data yields an empty list.
    pub fn entries(&self) -> Vec<RecentEntry> {
        let raw = match self.storage.get(RECENT_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "failed to read recently watched");
                return Vec::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(error = %e, "recently watched list is corrupt, ignoring");
            Vec::new()
        })
    }

    /// Record a movie as just watched (stamped with the current time)
    pub fn record(&self, entry: RecentEntry) -> Result<(), StorageError> {
        self.record_at(entry, Utc::now())
    }

    /// Record with an explicit timestamp.
    ///
    /// Entries without an id are ignored. An existing entry for the same
    /// movie is moved to the front rather than duplicated.
    pub fn record_at(&self, mut entry: RecentEntry, ts: DateTime<Utc>) -> Result<(), StorageError> {
        if entry.id == 0 {
            return Ok(());
        }

        entry.ts = ts;
        let mut list = self.entries();
        list.retain(|m| m.id != entry.id);
        list.insert(0, entry);
        list.truncate(MAX_RECENT);

        debug!(len = list.len(), "saving recently watched");
        self.save(&list)
    }

    /// Forget everything
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(RECENT_KEY)
    }

    /// Panel view model for the side panel / CLI listing
    pub fn panel(&self, image_base: &str) -> RecentPanel {
        RecentPanel::from_entries(&self.entries(), image_base)
    }

    fn save(&self, list: &[RecentEntry]) -> Result<(), StorageError> {
        let json = serde_json::to_string(list).map_err(|e| StorageError::Corrupt(e.to_string()))?;
        self.storage.set(RECENT_KEY, &json)
    }
}

/// One clickable row in the recently watched panel
#[derive(Debug, Clone, PartialEq)]
pub struct RecentRow {
    pub id: u64,
    pub title: String,
    pub subtitle: String,
    pub poster_url: String,
}

/// Recently watched panel content
#[derive(Debug, Clone, PartialEq)]
pub enum RecentPanel {
    Empty(&'static str),
    Rows(Vec<RecentRow>),
}

impl RecentPanel {
    pub fn from_entries(entries: &[RecentEntry], image_base: &str) -> Self {
        if entries.is_empty() {
            return RecentPanel::Empty(EMPTY_MESSAGE);
        }

        RecentPanel::Rows(
            entries
                .iter()
                .map(|m| RecentRow {
                    id: m.id,
                    title: if m.title.is_empty() {
                        "Untitled".to_string()
                    } else {
                        m.title.clone()
                    },
                    subtitle: m.short_date(),
                    poster_url: poster_url(image_base, m.poster_path.as_deref()),
                })
                .collect(),
        )
    }

    pub fn rows(&self) -> &[RecentRow] {
        match self {
            RecentPanel::Empty(_) => &[],
            RecentPanel::Rows(rows) => rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows().is_empty()
    }
}
