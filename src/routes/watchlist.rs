use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    middleware::session::SessionContext,
    models::{SaveMovieRequest, WatchlistEntry},
    routes::AppState,
};

/// Handler for the saved-movies list; anonymous callers see an empty list
pub async fn list(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
) -> Json<Vec<WatchlistEntry>> {
    Json(state.watchlist.list_all(session.identity()).await)
}

/// Handler for saving a movie
pub async fn save(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Json(request): Json<SaveMovieRequest>,
) -> AppResult<(StatusCode, Json<WatchlistEntry>)> {
    let entry = state.watchlist.save(session.identity(), request).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Handler for removing a movie
pub async fn remove(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(movie_id): Path<u64>,
) -> AppResult<StatusCode> {
    state.watchlist.unsave(session.identity(), movie_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for the saved-status check; always answers, never errors
pub async fn status(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(movie_id): Path<u64>,
) -> Json<Value> {
    let saved = state.watchlist.is_saved(session.identity(), movie_id).await;
    Json(json!({ "saved": saved }))
}
