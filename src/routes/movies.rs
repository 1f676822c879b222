use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, Query, State,
    },
    response::Response,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    error::{AppError, AppResult},
    models::{MovieDetails, MovieSummary},
    routes::AppState,
    services::{catalog::CatalogProvider, debounce::DebouncedSearch},
};

/// Category slugs exposed by the discovery pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Trending,
    Hindi,
    Telugu,
    Tamil,
    Bengali,
    Kannada,
    Foreign,
    Kids,
}

impl FromStr for Category {
    type Err = ();

    fn from_str(slug: &str) -> Result<Self, Self::Err> {
        match slug {
            "trending" => Ok(Category::Trending),
            "hindi" => Ok(Category::Hindi),
            "telugu" => Ok(Category::Telugu),
            "tamil" => Ok(Category::Tamil),
            "bengali" => Ok(Category::Bengali),
            "kannada" => Ok(Category::Kannada),
            "foreign" => Ok(Category::Foreign),
            "kids" => Ok(Category::Kids),
            _ => Err(()),
        }
    }
}

impl Category {
    async fn fetch(&self, catalog: &dyn CatalogProvider) -> Vec<MovieSummary> {
        match self {
            Category::Trending => catalog.trending().await,
            Category::Hindi => catalog.by_language("hi", "IN").await,
            Category::Telugu => catalog.by_language("te", "IN").await,
            Category::Tamil => catalog.by_language("ta", "IN").await,
            Category::Bengali => catalog.by_language("bn", "IN").await,
            Category::Kannada => catalog.by_language("kn", "IN").await,
            Category::Foreign => catalog.foreign().await,
            Category::Kids => catalog.kids().await,
        }
    }
}

/// Handler for the discovery overview: all category rows, fetched
/// concurrently and joined when all complete
pub async fn overview(State(state): State<AppState>) -> Json<Value> {
    let catalog = state.catalog.as_ref();
    let (trending, hindi, telugu, tamil, bengali, kannada, foreign, kids) = tokio::join!(
        catalog.trending(),
        catalog.by_language("hi", "IN"),
        catalog.by_language("te", "IN"),
        catalog.by_language("ta", "IN"),
        catalog.by_language("bn", "IN"),
        catalog.by_language("kn", "IN"),
        catalog.foreign(),
        catalog.kids(),
    );

    Json(json!({
        "trending": trending,
        "hindi": hindi,
        "telugu": telugu,
        "tamil": tamil,
        "bengali": bengali,
        "kannada": kannada,
        "foreign": foreign,
        "kids": kids,
    }))
}

/// Handler for trending movies
pub async fn trending(State(state): State<AppState>) -> Json<Vec<MovieSummary>> {
    Json(state.catalog.trending().await)
}

/// Handler for one category page; unknown slugs render as an empty list
pub async fn category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Json<Vec<MovieSummary>> {
    let movies = match Category::from_str(&slug) {
        Ok(category) => category.fetch(state.catalog.as_ref()).await,
        Err(()) => Vec::new(),
    };
    Json(movies)
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: String,
}

/// Handler for full-page search
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<MovieSummary>>> {
    let query = params.q.trim();
    if query.is_empty() {
        return Err(AppError::InvalidInput(
            "Search query cannot be empty".to_string(),
        ));
    }
    Ok(Json(state.catalog.search(query).await))
}

/// Handler for one movie's detail view
pub async fn details(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<Json<MovieDetails>> {
    let details = state.catalog.details(id).await?;
    Ok(Json(details))
}

/// Handler for the live-search WebSocket.
///
/// Each text frame is one input change; the server pushes a JSON snapshot
/// whenever the debounced search state advances.
pub async fn live_search(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let catalog = Arc::clone(&state.catalog);
    let quiet_period = state.search_quiet_period;
    ws.on_upgrade(move |socket| run_live_search(socket, catalog, quiet_period))
}

async fn run_live_search(
    mut socket: WebSocket,
    catalog: Arc<dyn CatalogProvider>,
    quiet_period: Duration,
) {
    let mut search = DebouncedSearch::new(catalog, quiet_period);
    let mut snapshots = search.subscribe();

    loop {
        tokio::select! {
            frame = socket.recv() => {
                match frame {
                    Some(Ok(Message::Text(input))) => search.input(&input),
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!(error = %e, "Live-search socket error");
                        break;
                    }
                }
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                let Ok(body) = serde_json::to_string(&snapshot) else {
                    continue;
                };
                if socket.send(Message::Text(body)).await.is_err() {
                    break;
                }
            }
        }
    }
}
