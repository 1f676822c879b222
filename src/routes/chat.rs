use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::ConversationMessage,
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ConversationMessage>,
}

/// Handler for the chat assistant: transcript in, resolved suggestions out
pub async fn suggestions(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<ChatRequest>,
) -> AppResult<Json<Value>> {
    tracing::info!(
        request_id = %request_id,
        turns = request.messages.len(),
        "Processing suggestion request"
    );

    let suggestions = state
        .pipeline
        .resolve_suggestions(&request.messages)
        .await?;

    tracing::info!(
        request_id = %request_id,
        suggestions = suggestions.len(),
        "Suggestion request completed"
    );

    Ok(Json(json!({ "suggestions": suggestions })))
}
