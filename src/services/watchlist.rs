//! Watchlist service
//!
//! Maintains save/unsave/is-saved/list-all over the user's watchlist
//! collection. Identity is resolved once per request upstream and passed in
//! explicitly; an absent identity makes writes fail and reads fall back to
//! their empty shapes.
//!
//! Known race, preserved deliberately: `save` performs no pre-insert
//! duplicate check, so two near-simultaneous saves of the same movie can
//! produce duplicate documents, and `unsave` removes only the first match.
use crate::{
    error::{AppError, AppResult},
    models::{image_url, Identity, ImageWidth, SaveMovieRequest, WatchlistEntry},
    services::store::{DocumentStore, Filter},
};
use serde_json::json;
use std::sync::Arc;

const FALLBACK_POSTER: &str = "/no-poster.jpg";

pub struct WatchlistService {
    store: Arc<dyn DocumentStore>,
    collection: String,
    image_base: String,
}

impl WatchlistService {
    pub fn new(store: Arc<dyn DocumentStore>, collection: String, image_base: String) -> Self {
        Self {
            store,
            collection,
            image_base,
        }
    }

    /// Saves a movie to the user's watchlist
    pub async fn save(
        &self,
        identity: Option<&Identity>,
        request: SaveMovieRequest,
    ) -> AppResult<WatchlistEntry> {
        let identity = identity
            .ok_or_else(|| AppError::WatchlistWrite("Failed to save movie.".to_string()))?;

        // Denormalized at write time so the saved list renders standalone
        let poster_path = request
            .poster_path
            .as_deref()
            .map(|path| image_url(&self.image_base, ImageWidth::W500, path))
            .unwrap_or_else(|| FALLBACK_POSTER.to_string());

        let entry = WatchlistEntry {
            user_id: identity.id.clone(),
            movie_id: request.movie_id.to_string(),
            title: request.title,
            poster_path,
            release_date: request.release_date,
            vote_average: request.vote_average,
            genres: request.genres.join(", "),
        };

        let data = json!({
            "userId": entry.user_id,
            "movieId": entry.movie_id,
            "title": entry.title,
            "posterPath": entry.poster_path,
            "releaseDate": entry.release_date,
            "voteAverage": entry.vote_average,
            "genres": entry.genres,
        });

        self.store
            .create(&self.collection, data)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, movie_id = %entry.movie_id, "Error saving movie");
                AppError::WatchlistWrite("Failed to save movie.".to_string())
            })?;

        Ok(entry)
    }

    /// Removes a movie from the user's watchlist.
    ///
    /// "No match found" is a successful no-op; only the first matching
    /// document is deleted.
    pub async fn unsave(&self, identity: Option<&Identity>, movie_id: u64) -> AppResult<()> {
        let identity = identity
            .ok_or_else(|| AppError::WatchlistWrite("Failed to unsave movie.".to_string()))?;

        let filters = [
            Filter::equal("userId", identity.id.as_str()),
            Filter::equal("movieId", movie_id.to_string()),
        ];

        let page = self
            .store
            .list(&self.collection, &filters)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, movie_id, "Error unsaving movie");
                AppError::WatchlistWrite("Failed to unsave movie.".to_string())
            })?;

        let Some(document_id) = page
            .documents
            .first()
            .and_then(|doc| doc["$id"].as_str())
        else {
            tracing::warn!(movie_id, "No watchlist document found to delete");
            return Ok(());
        };

        self.store
            .delete(&self.collection, document_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, movie_id, "Error unsaving movie");
                AppError::WatchlistWrite("Failed to unsave movie.".to_string())
            })
    }

    /// Whether the movie is already saved.
    ///
    /// Fail-safe policy: any failure, including a missing identity, reports
    /// `false` rather than propagating.
    pub async fn is_saved(&self, identity: Option<&Identity>, movie_id: u64) -> bool {
        let Some(identity) = identity else {
            return false;
        };

        let filters = [
            Filter::equal("userId", identity.id.as_str()),
            Filter::equal("movieId", movie_id.to_string()),
            Filter::Limit(1),
        ];

        match self.store.list(&self.collection, &filters).await {
            Ok(page) => page.total > 0,
            Err(e) => {
                tracing::warn!(error = %e, movie_id, "Saved-status check failed; reporting unsaved");
                false
            }
        }
    }

    /// All saved movies, most recently saved first.
    ///
    /// Any failure returns an empty sequence rather than propagating.
    pub async fn list_all(&self, identity: Option<&Identity>) -> Vec<WatchlistEntry> {
        let Some(identity) = identity else {
            return Vec::new();
        };

        let filters = [
            Filter::equal("userId", identity.id.as_str()),
            Filter::OrderDesc("$createdAt".to_string()),
        ];

        match self.store.list(&self.collection, &filters).await {
            Ok(page) => page
                .documents
                .into_iter()
                .filter_map(|doc| match serde_json::from_value::<WatchlistEntry>(doc) {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        tracing::warn!(error = %e, "Skipping malformed watchlist document");
                        None
                    }
                })
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Watchlist fetch failed; returning empty list");
                Vec::new()
            }
        }
    }
}
