use serde::{Deserialize, Serialize};

mod suggestion;
mod watchlist;

pub use suggestion::{CandidateSuggestion, ConversationMessage, ResolvedSuggestion};
pub use watchlist::{SaveMovieRequest, WatchlistEntry};

/// Width bucket for catalog image assets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageWidth {
    /// Thumbnails (chat cards, live-search dropdown)
    W92,
    /// Posters
    W500,
    /// Backdrops
    W1280,
}

impl ImageWidth {
    pub fn segment(&self) -> &'static str {
        match self {
            ImageWidth::W92 => "w92",
            ImageWidth::W500 => "w500",
            ImageWidth::W1280 => "w1280",
        }
    }
}

/// Builds a fully-qualified image URL from a catalog path fragment
pub fn image_url(image_base: &str, width: ImageWidth, path: &str) -> String {
    format!("{}/{}{}", image_base, width.segment(), path)
}

/// An authenticated identity resolved from the session service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Identity {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "$createdAt", default)]
    pub created_at: Option<String>,
}

/// A catalog list entry returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub rating: f64,
}

/// Full detail view for a single catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    pub id: u64,
    pub title: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    pub rating: f64,
    pub runtime: Option<u32>,
    pub genres: Vec<String>,
    pub trailer_url: Option<String>,
}

// ============================================================================
// Catalog (TMDB) API Types
// ============================================================================

/// Raw list response from the catalog API
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogListResponse {
    #[serde(default)]
    pub results: Vec<CatalogMovie>,
}

impl CatalogListResponse {
    /// Empty-result shape used to normalize failed reads
    pub fn empty() -> Self {
        Self {
            results: Vec::new(),
        }
    }
}

/// Raw movie entry as returned by catalog list endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogMovie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
}

impl From<CatalogMovie> for MovieSummary {
    fn from(movie: CatalogMovie) -> Self {
        MovieSummary {
            id: movie.id,
            title: movie.title,
            poster_path: movie.poster_path,
            // Catalog sometimes returns an empty string instead of omitting
            release_date: movie.release_date.filter(|d| !d.is_empty()),
            rating: movie.vote_average,
        }
    }
}

/// Raw detail response from the catalog API (with appended videos)
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogMovieDetails {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<CatalogGenre>,
    #[serde(default)]
    pub videos: Option<CatalogVideoList>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogGenre {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogVideoList {
    #[serde(default)]
    pub results: Vec<CatalogVideo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogVideo {
    pub key: String,
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
}

impl From<CatalogMovieDetails> for MovieDetails {
    fn from(details: CatalogMovieDetails) -> Self {
        let trailer_url = details
            .videos
            .as_ref()
            .and_then(|videos| {
                videos
                    .results
                    .iter()
                    .find(|v| v.site == "YouTube" && v.video_type == "Trailer")
            })
            .map(|v| format!("https://www.youtube.com/watch?v={}", v.key));

        MovieDetails {
            id: details.id,
            title: details.title,
            overview: details.overview,
            poster_path: details.poster_path,
            backdrop_path: details.backdrop_path,
            release_date: details.release_date.filter(|d| !d.is_empty()),
            rating: details.vote_average,
            runtime: details.runtime,
            genres: details.genres.into_iter().map(|g| g.name).collect(),
            trailer_url,
        }
    }
}
