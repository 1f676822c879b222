use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Not authenticated: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Catalog detail error: {0}")]
    CatalogDetail(String),

    #[error("Suggestion service error: {0}")]
    Suggestions(String),

    #[error("Malformed external payload: {0}")]
    SchemaViolation(String),

    #[error("Watchlist write error: {0}")]
    WatchlistWrite(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::ExternalApi(msg) | AppError::WatchlistWrite(msg) => {
                (StatusCode::BAD_GATEWAY, msg)
            }
            AppError::HttpClient(e) => (StatusCode::BAD_GATEWAY, e.to_string()),
            AppError::CatalogDetail(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Suggestions(msg) => (StatusCode::NOT_FOUND, msg),
            // The declared-schema contract is internal detail; callers only
            // ever see the generic no-suggestions message.
            AppError::SchemaViolation(_) => (
                StatusCode::NOT_FOUND,
                "Couldn't find any movie suggestions for that. Please try another query."
                    .to_string(),
            ),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_auth_error_maps_to_unauthorized() {
        let response = AppError::Auth("no session".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_schema_violation_masks_detail() {
        let response =
            AppError::SchemaViolation("expected array of title/year".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let message = body["error"].as_str().unwrap();
        assert!(!message.contains("title/year"));
        assert!(message.contains("suggestions"));
    }

    #[tokio::test]
    async fn test_watchlist_write_maps_to_bad_gateway() {
        let response = AppError::WatchlistWrite("insert failed".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
