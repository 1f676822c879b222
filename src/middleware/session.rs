use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{
    error::{AppError, AppResult},
    models::Identity,
    routes::AppState,
};

/// HTTP header carrying the caller's session secret
pub const SESSION_HEADER: &str = "x-session-secret";

/// Per-request session context.
///
/// Identity is resolved against the auth service exactly once, here, and
/// passed down to services explicitly. Resolution failing simply means the
/// request is anonymous; handlers that need authentication call `require`.
#[derive(Clone, Debug, Default)]
pub struct SessionContext {
    pub token: Option<String>,
    pub identity: Option<Identity>,
}

impl SessionContext {
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn require(&self) -> AppResult<&Identity> {
        self.identity
            .as_ref()
            .ok_or_else(|| AppError::Auth("No active session".to_string()))
    }

    pub fn require_token(&self) -> AppResult<&str> {
        self.token
            .as_deref()
            .ok_or_else(|| AppError::Auth("No active session".to_string()))
    }
}

/// Resolves the session context for the request and stores it in extensions
pub async fn session_context_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(SESSION_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string);

    let identity = match token.as_deref() {
        Some(secret) => match state.sessions.current_identity(secret).await {
            Ok(identity) => Some(identity),
            Err(e) => {
                tracing::debug!(error = %e, "Session resolution failed; treating as anonymous");
                None
            }
        },
        None => None,
    };

    request
        .extensions_mut()
        .insert(SessionContext { token, identity });

    next.run(request).await
}
