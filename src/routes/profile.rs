use axum::{extract::State, Extension, Json};

use crate::{
    error::AppResult,
    middleware::session::SessionContext,
    routes::AppState,
    services::profile::UserProfile,
};

/// Handler for the authenticated user's profile
pub async fn profile(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
) -> AppResult<Json<UserProfile>> {
    let identity = session.require()?;
    let profile = state.profiles.fetch_profile(identity).await?;
    Ok(Json(profile))
}
