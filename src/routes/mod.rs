use axum::{
    http::StatusCode,
    middleware as axum_middleware,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::Config,
    error::AppResult,
    middleware::{request_id::request_id_middleware, session::session_context_middleware},
    services::{
        catalog::{CatalogProvider, TmdbCatalog},
        profile::ProfileService,
        session::{HttpSessionClient, SessionProvider},
        storage::HttpFileStorage,
        store::{DocumentStore, HttpDocumentStore},
        suggestions::{GeminiModel, SuggestionPipeline},
        watchlist::WatchlistService,
    },
};

pub mod auth;
pub mod chat;
pub mod movies;
pub mod profile;
pub mod watchlist;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogProvider>,
    pub sessions: Arc<dyn SessionProvider>,
    pub watchlist: Arc<WatchlistService>,
    pub profiles: Arc<ProfileService>,
    pub pipeline: Arc<SuggestionPipeline>,
    pub search_quiet_period: Duration,
}

impl AppState {
    /// Wires the real HTTP clients from configuration
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let catalog: Arc<dyn CatalogProvider> = Arc::new(TmdbCatalog::new(
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
        )?);

        let sessions: Arc<dyn SessionProvider> = Arc::new(HttpSessionClient::new(
            config.backend_endpoint.clone(),
            config.backend_project_id.clone(),
        ));

        let store: Arc<dyn DocumentStore> = Arc::new(HttpDocumentStore::new(
            config.backend_endpoint.clone(),
            config.backend_project_id.clone(),
            config.backend_database_id.clone(),
        ));

        let storage = Arc::new(HttpFileStorage::new(
            config.backend_endpoint.clone(),
            config.backend_project_id.clone(),
            config.avatar_bucket_id.clone(),
        ));

        let watchlist = Arc::new(WatchlistService::new(
            Arc::clone(&store),
            config.watchlist_collection_id.clone(),
            config.tmdb_image_url.clone(),
        ));

        let profiles = Arc::new(ProfileService::new(
            Arc::clone(&sessions),
            Arc::clone(&store),
            storage,
            config.user_profiles_collection_id.clone(),
            config.profiles_collection_id.clone(),
        ));

        let model = Arc::new(GeminiModel::new(
            config.gemini_api_key.clone(),
            config.gemini_api_url.clone(),
        ));
        let pipeline = Arc::new(SuggestionPipeline::new(model, Arc::clone(&catalog)));

        Ok(Self {
            catalog,
            sessions,
            watchlist,
            profiles,
            pipeline,
            search_quiet_period: Duration::from_millis(config.search_debounce_ms),
        })
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes(state))
        .layer(axum_middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// API routes under /api/v1
fn api_routes(state: AppState) -> Router {
    Router::new()
        // Auth
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/session", delete(auth::logout))
        .route("/auth/me", get(auth::me))
        // Catalog
        .route("/movies/overview", get(movies::overview))
        .route("/movies/trending", get(movies::trending))
        .route("/movies/category/:slug", get(movies::category))
        .route("/movies/search", get(movies::search))
        .route("/movies/live-search", get(movies::live_search))
        .route("/movies/:id", get(movies::details))
        // Watchlist
        .route("/watchlist", get(watchlist::list).post(watchlist::save))
        .route("/watchlist/:movie_id", delete(watchlist::remove))
        .route("/watchlist/:movie_id/status", get(watchlist::status))
        // Chat assistant
        .route("/chat/suggestions", post(chat::suggestions))
        // Profile
        .route("/profile", get(profile::profile))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            session_context_middleware,
        ))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
