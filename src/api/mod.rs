//! API clients for external services
//!
//! - TMDB: Movie discovery, search, details and trailers

pub mod tmdb;

pub use tmdb::{TmdbClient, TmdbError};
