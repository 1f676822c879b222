use axum::{extract::State, http::StatusCode, Extension, Json};
use base64::Engine;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::session::SessionContext,
    models::Identity,
    routes::AppState,
    services::profile::{Avatar, RegistrationRequest},
};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    #[serde(default)]
    pub phone: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub avatar: Option<AvatarUpload>,
}

/// Avatar image, base64-encoded by the client
#[derive(Debug, Deserialize)]
pub struct AvatarUpload {
    pub file_name: String,
    pub data: String,
}

/// Handler for email/password login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<Value>> {
    let session = state
        .sessions
        .create_session(&request.email, &request.password)
        .await?;

    Ok(Json(json!({
        "session": session.secret,
        "user_id": session.user_id,
    })))
}

/// Handler for registration
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let avatar = match request.avatar {
        Some(upload) => {
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(upload.data.as_bytes())
                .map_err(|_| {
                    AppError::InvalidInput("Avatar image is not valid base64.".to_string())
                })?;
            Some(Avatar {
                file_name: upload.file_name,
                bytes,
            })
        }
        None => None,
    };

    let (identity, session) = state
        .profiles
        .register(RegistrationRequest {
            name: request.name,
            phone: request.phone,
            email: request.email,
            password: request.password,
            avatar,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "user": identity,
            "session": session.secret,
        })),
    ))
}

/// Handler for logout
pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
) -> AppResult<StatusCode> {
    let token = session.require_token()?;
    state.sessions.delete_session(token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for the current identity
pub async fn me(Extension(session): Extension<SessionContext>) -> AppResult<Json<Identity>> {
    let identity = session.require()?;
    Ok(Json(identity.clone()))
}
