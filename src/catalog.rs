//! Catalog loading and search
//!
//! Turns a search box value into a catalog query and the query's
//! outcome into grid content. Failures never escape: they become an
//! inline message, flagged when the user should re-enter credentials.

use tracing::{error, info};

use crate::api::{TmdbClient, TmdbError};
use crate::models::MovieSummary;

/// Shown when the popular listing comes back empty
pub const NO_MOVIES_MESSAGE: &str = "No movies found. Try another search!";

/// What to ask the catalog for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogQuery {
    /// Popularity-sorted discovery
    Popular,
    /// Title search (already trimmed, never empty)
    Search(String),
}

impl CatalogQuery {
    /// Blank or whitespace-only input falls back to the popular listing
    pub fn from_term(term: &str) -> Self {
        let term = term.trim();
        if term.is_empty() {
            CatalogQuery::Popular
        } else {
            CatalogQuery::Search(term.to_string())
        }
    }

    /// Message for a query that matched nothing
    pub fn empty_message(&self) -> String {
        match self {
            CatalogQuery::Popular => NO_MOVIES_MESSAGE.to_string(),
            CatalogQuery::Search(term) => format!("No movies found for \"{}\".", term),
        }
    }

    pub fn failure_message(&self, err: &TmdbError) -> String {
        match self {
            CatalogQuery::Popular => format!("Failed to load movies. {}", err),
            CatalogQuery::Search(_) => format!("Search failed: {}", err),
        }
    }
}

/// Identifies one catalog load
///
/// Two loads of the same query still get distinct tickets, so only the
/// latest load can update the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogTicket {
    pub query: CatalogQuery,
    generation: u64,
}

impl CatalogTicket {
    pub(crate) fn new(query: CatalogQuery, generation: u64) -> Self {
        Self { query, generation }
    }
}

/// Result of a catalog load, ready for the grid
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogOutcome {
    Movies(Vec<MovieSummary>),
    Message {
        text: String,
        is_error: bool,
        /// 401-classified failure: prompt for credentials
        needs_credentials: bool,
    },
}

impl CatalogOutcome {
    /// Fold a raw fetch result into an outcome
    pub fn from_result(query: &CatalogQuery, result: Result<Vec<MovieSummary>, TmdbError>) -> Self {
        match result {
            Ok(movies) if movies.is_empty() => CatalogOutcome::Message {
                text: query.empty_message(),
                is_error: false,
                needs_credentials: false,
            },
            Ok(movies) => CatalogOutcome::Movies(movies),
            Err(e) => {
                error!(error = %e, ?query, "catalog load failed");
                CatalogOutcome::Message {
                    text: query.failure_message(&e),
                    is_error: true,
                    needs_credentials: e.is_unauthorized(),
                }
            }
        }
    }

    pub fn needs_credentials(&self) -> bool {
        matches!(
            self,
            CatalogOutcome::Message {
                needs_credentials: true,
                ..
            }
        )
    }
}

/// Run a catalog query
pub async fn fetch(client: &TmdbClient, query: &CatalogQuery) -> Result<Vec<MovieSummary>, TmdbError> {
    match query {
        CatalogQuery::Popular => client.discover_popular().await,
        CatalogQuery::Search(term) => client.search_movies(term).await,
    }
}

/// Run a catalog query and fold the result for display
pub async fn load(client: &TmdbClient, query: &CatalogQuery) -> CatalogOutcome {
    info!(?query, "loading catalog");
    CatalogOutcome::from_result(query, fetch(client, query).await)
}
