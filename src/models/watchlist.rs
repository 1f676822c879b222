use serde::{Deserialize, Serialize};

/// Payload for saving a movie to the watchlist.
///
/// Mirrors the catalog detail fields at the moment of the save action; the
/// stored document is denormalized from these.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveMovieRequest {
    pub movie_id: u64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub genres: Vec<String>,
}

/// A saved watchlist document, as stored in the user collection.
///
/// `poster_path` is a fully-qualified image URL (expanded at write time) and
/// `genres` is a comma-delimited string; both are denormalized so the saved
/// list renders without further catalog calls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchlistEntry {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "movieId")]
    pub movie_id: String,
    pub title: String,
    #[serde(rename = "posterPath")]
    pub poster_path: String,
    #[serde(rename = "releaseDate", default)]
    pub release_date: Option<String>,
    #[serde(rename = "voteAverage", default)]
    pub vote_average: f64,
    pub genres: String,
}
