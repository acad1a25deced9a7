//! Data structures and types for ReelPeek
//!
//! Contains all shared models used across the application organized by domain:
//! - **Catalog**: TMDB movie summaries and details
//! - **Videos**: Trailer/teaser metadata attached to a movie
//! - **History**: Recently watched entries persisted locally

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Poster image base (w500 rendition)
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Shown when a movie has no poster
pub const POSTER_PLACEHOLDER: &str = "https://via.placeholder.com/300x450?text=No+Poster";

// =============================================================================
// Catalog Models (TMDB)
// =============================================================================

/// Movie entry from a discover or search listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f32>,
}

impl MovieSummary {
    /// Rating formatted to one decimal, or "N/A"
    pub fn rating_label(&self) -> String {
        format_rating(self.vote_average)
    }

    /// Full poster URL, falling back to the placeholder
    pub fn poster_url(&self, image_base: &str) -> String {
        poster_url(image_base, self.poster_path.as_deref())
    }
}

impl fmt::Display for MovieSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - ⭐ {}", self.title, self.rating_label())
    }
}

/// Detailed movie information from TMDB
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f32>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
}

impl MovieDetail {
    /// Release date with empty strings treated as absent
    pub fn release_date(&self) -> Option<&str> {
        self.release_date.as_deref().filter(|d| !d.is_empty())
    }
}

impl fmt::Display for MovieDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.release_date() {
            Some(date) => write!(f, "{} ({}) - ⭐ {}", self.title, date, format_rating(self.vote_average)),
            None => write!(f, "{} - ⭐ {}", self.title, format_rating(self.vote_average)),
        }
    }
}

// =============================================================================
// Video Models
// =============================================================================

/// Video attached to a movie (trailer, teaser, clip...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Video {
    #[serde(default)]
    pub site: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub official: bool,
    #[serde(default)]
    pub name: String,
}

impl Video {
    pub fn is_youtube(&self) -> bool {
        self.site == "YouTube"
    }

    /// YouTube watch URL, if this video can be opened there
    pub fn watch_url(&self) -> Option<String> {
        (self.is_youtube() && !self.key.is_empty())
            .then(|| format!("https://www.youtube.com/watch?v={}", self.key))
    }
}

impl fmt::Display for Video {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} - {})", self.name, self.site, self.kind)
    }
}

// =============================================================================
// History Models
// =============================================================================

/// Entry in the recently watched list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentEntry {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    /// When the entry was (re)inserted, stored as epoch millis
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub ts: DateTime<Utc>,
}

impl RecentEntry {
    /// Build an entry from movie details, stamped with the given time
    pub fn from_detail(detail: &MovieDetail, ts: DateTime<Utc>) -> Self {
        Self {
            id: detail.id,
            title: detail.title.clone(),
            poster_path: detail.poster_path.clone(),
            release_date: detail.release_date.clone(),
            ts,
        }
    }

    /// Short date for the panel: release date if known, else insertion time
    pub fn short_date(&self) -> String {
        match self
            .release_date
            .as_deref()
            .and_then(|d| chrono::NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        {
            Some(date) => date.format("%x").to_string(),
            None => self.ts.with_timezone(&Local).format("%x").to_string(),
        }
    }
}

impl fmt::Display for RecentEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.title, self.short_date())
    }
}

// =============================================================================
// Formatting helpers
// =============================================================================

/// Format a 0-10 rating to one decimal, "N/A" when absent
pub fn format_rating(vote_average: Option<f32>) -> String {
    match vote_average {
        Some(v) if v.is_finite() => format!("{:.1}", v),
        _ => "N/A".to_string(),
    }
}

/// Join an image base and poster path, or return the placeholder
pub fn poster_url(image_base: &str, poster_path: Option<&str>) -> String {
    match poster_path.filter(|p| !p.is_empty()) {
        Some(path) => format!("{}{}", image_base.trim_end_matches('/'), path),
        None => POSTER_PLACEHOLDER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_rating() {
        assert_eq!(format_rating(Some(7.84)), "7.8");
        assert_eq!(format_rating(Some(10.0)), "10.0");
        assert_eq!(format_rating(Some(0.0)), "0.0");
        assert_eq!(format_rating(None), "N/A");
    }

    #[test]
    fn test_poster_url() {
        assert_eq!(
            poster_url(IMAGE_BASE_URL, Some("/abc.jpg")),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
        assert_eq!(poster_url(IMAGE_BASE_URL, None), POSTER_PLACEHOLDER);
        assert_eq!(poster_url(IMAGE_BASE_URL, Some("")), POSTER_PLACEHOLDER);
    }

    #[test]
    fn test_video_deserializes_type_field() {
        let video: Video = serde_json::from_str(
            r#"{"site":"YouTube","type":"Trailer","key":"abc","official":true,"name":"Main"}"#,
        )
        .unwrap();
        assert_eq!(video.kind, "Trailer");
        assert!(video.official);
        assert_eq!(video.watch_url().as_deref(), Some("https://www.youtube.com/watch?v=abc"));
    }

    #[test]
    fn test_video_missing_fields_default() {
        let video: Video = serde_json::from_str(r#"{"site":"Vimeo"}"#).unwrap();
        assert!(!video.official);
        assert!(video.key.is_empty());
        assert!(video.watch_url().is_none());
    }

    #[test]
    fn test_summary_tolerates_null_fields() {
        let movie: MovieSummary = serde_json::from_str(
            r#"{"id": 5, "title": "X", "poster_path": null, "vote_average": null}"#,
        )
        .unwrap();
        assert_eq!(movie.rating_label(), "N/A");
        assert_eq!(movie.poster_url(IMAGE_BASE_URL), POSTER_PLACEHOLDER);
    }

    #[test]
    fn test_recent_entry_ts_is_millis() {
        let ts = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let entry = RecentEntry {
            id: 1,
            title: "Dune".into(),
            poster_path: None,
            release_date: None,
            ts,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["ts"], 1_700_000_000_123i64);
    }

    #[test]
    fn test_detail_display() {
        let detail = MovieDetail {
            id: 1,
            title: "Dune".into(),
            poster_path: None,
            vote_average: Some(8.04),
            release_date: Some("2021-09-15".into()),
            overview: None,
        };
        assert_eq!(detail.to_string(), "Dune (2021-09-15) - ⭐ 8.0");
    }
}
