//! Trailer selection
//!
//! Picks the best video for a movie and turns the video list into
//! what the preview modal shows: a player, a link list, or nothing.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

use crate::models::Video;

fn trailer_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)trailer").ok()).as_ref()
}

fn is_trailer_type(video: &Video) -> bool {
    trailer_pattern().is_some_and(|re| re.is_match(&video.kind))
}

/// Select a video by priority:
/// 1. official YouTube trailer
/// 2. any YouTube trailer
/// 3. any YouTube video
/// 4. the first video of any kind
pub fn select_trailer(videos: &[Video]) -> Option<&Video> {
    videos
        .iter()
        .find(|v| v.is_youtube() && is_trailer_type(v) && v.official)
        .or_else(|| videos.iter().find(|v| v.is_youtube() && is_trailer_type(v)))
        .or_else(|| videos.iter().find(|v| v.is_youtube()))
        .or_else(|| videos.first())
}

/// One row of the fallback video list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoLink {
    /// "<name> (<site> - <type>)"
    pub label: String,
    /// Watch URL when the video is on YouTube
    pub url: Option<String>,
}

/// What the preview modal renders for a movie's videos
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrailerView {
    /// Playable YouTube trailer
    Player {
        name: String,
        embed_url: String,
        watch_url: String,
    },
    /// No YouTube selection; list everything available
    LinkList { videos: Vec<VideoLink> },
    /// Nothing at all
    NoTrailer { tmdb_url: String },
}

impl TrailerView {
    pub fn from_videos(movie_id: u64, videos: &[Video]) -> Self {
        if let Some(trailer) = select_trailer(videos).filter(|v| v.is_youtube() && !v.key.is_empty()) {
            let name = if trailer.name.is_empty() {
                "Trailer".to_string()
            } else {
                trailer.name.clone()
            };
            return TrailerView::Player {
                name,
                embed_url: format!("https://www.youtube.com/embed/{}?autoplay=1&rel=0", trailer.key),
                watch_url: format!("https://www.youtube.com/watch?v={}", trailer.key),
            };
        }

        if videos.is_empty() {
            return TrailerView::NoTrailer {
                tmdb_url: format!("https://www.themoviedb.org/movie/{}", movie_id),
            };
        }

        TrailerView::LinkList {
            videos: videos
                .iter()
                .map(|v| VideoLink {
                    label: v.to_string(),
                    url: v.watch_url(),
                })
                .collect(),
        }
    }

    /// URL the "open" action should launch, if any
    pub fn primary_url(&self) -> Option<&str> {
        match self {
            TrailerView::Player { watch_url, .. } => Some(watch_url),
            TrailerView::LinkList { videos } => videos.iter().find_map(|v| v.url.as_deref()),
            TrailerView::NoTrailer { tmdb_url } => Some(tmdb_url),
        }
    }
}
