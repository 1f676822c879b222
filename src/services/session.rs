//! Account/session client (Appwrite-compatible account API)
//!
//! Identity resolution failing is the sole signal used to decide anonymous
//! vs authenticated handling; callers resolve identity once per request and
//! pass it down explicitly rather than re-querying per operation.
use crate::{
    error::{AppError, AppResult},
    models::Identity,
};
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::json;

const PROJECT_HEADER: &str = "X-Appwrite-Project";
const SESSION_HEADER: &str = "X-Appwrite-Session";

/// A created session; `secret` authenticates subsequent requests
#[derive(Debug, Clone, Deserialize)]
pub struct SessionSecret {
    #[serde(rename = "$id")]
    pub id: String,
    pub secret: String,
    #[serde(rename = "userId")]
    pub user_id: String,
}

/// Trait for the account/session service
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SessionProvider: Send + Sync {
    /// Registers a new account
    async fn create_account(&self, email: &str, password: &str, name: &str)
        -> AppResult<Identity>;

    /// Opens an email/password session
    async fn create_session(&self, email: &str, password: &str) -> AppResult<SessionSecret>;

    /// Resolves the identity behind a session secret
    async fn current_identity(&self, session: &str) -> AppResult<Identity>;

    /// Closes the current session
    async fn delete_session(&self, session: &str) -> AppResult<()>;
}

#[derive(Clone)]
pub struct HttpSessionClient {
    http_client: HttpClient,
    endpoint: String,
    project_id: String,
}

impl HttpSessionClient {
    pub fn new(endpoint: String, project_id: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            endpoint,
            project_id,
        }
    }
}

#[async_trait::async_trait]
impl SessionProvider for HttpSessionClient {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> AppResult<Identity> {
        let response = self
            .http_client
            .post(format!("{}/account", self.endpoint))
            .header(PROJECT_HEADER, &self.project_id)
            .json(&json!({
                "userId": "unique()",
                "email": email,
                "password": password,
                "name": name,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Account creation failed with status {}: {}",
                status, body
            )));
        }

        response
            .json::<Identity>()
            .await
            .map_err(|e| AppError::SchemaViolation(format!("Invalid account payload: {}", e)))
    }

    async fn create_session(&self, email: &str, password: &str) -> AppResult<SessionSecret> {
        let response = self
            .http_client
            .post(format!("{}/account/sessions/email", self.endpoint))
            .header(PROJECT_HEADER, &self.project_id)
            .json(&json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AppError::Auth(
                "Invalid credentials. Please check your email and password.".to_string(),
            ));
        }
        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "Session creation failed with status {}",
                response.status()
            )));
        }

        response
            .json::<SessionSecret>()
            .await
            .map_err(|e| AppError::SchemaViolation(format!("Invalid session payload: {}", e)))
    }

    async fn current_identity(&self, session: &str) -> AppResult<Identity> {
        let response = self
            .http_client
            .get(format!("{}/account", self.endpoint))
            .header(PROJECT_HEADER, &self.project_id)
            .header(SESSION_HEADER, session)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Auth("No active session".to_string()));
        }

        response
            .json::<Identity>()
            .await
            .map_err(|e| AppError::SchemaViolation(format!("Invalid identity payload: {}", e)))
    }

    async fn delete_session(&self, session: &str) -> AppResult<()> {
        let response = self
            .http_client
            .delete(format!("{}/account/sessions/current", self.endpoint))
            .header(PROJECT_HEADER, &self.project_id)
            .header(SESSION_HEADER, session)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "Session deletion failed with status {}",
                response.status()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> HttpSessionClient {
        HttpSessionClient::new(server.uri(), "proj_1".to_string())
    }

    #[tokio::test]
    async fn test_create_session_returns_secret() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/account/sessions/email"))
            .and(body_partial_json(serde_json::json!({"email": "a@b.c"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "$id": "sess_1",
                "secret": "s3cret",
                "userId": "user_1"
            })))
            .mount(&server)
            .await;

        let session = client_for(&server)
            .create_session("a@b.c", "password123")
            .await
            .unwrap();
        assert_eq!(session.secret, "s3cret");
        assert_eq!(session.user_id, "user_1");
    }

    #[tokio::test]
    async fn test_bad_credentials_map_to_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/account/sessions/email"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let result = client_for(&server).create_session("a@b.c", "wrong").await;
        assert!(matches!(result, Err(AppError::Auth(_))));
    }

    #[tokio::test]
    async fn test_current_identity_forwards_session_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/account"))
            .and(header(SESSION_HEADER, "s3cret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "$id": "user_1",
                "email": "a@b.c"
            })))
            .mount(&server)
            .await;

        let identity = client_for(&server).current_identity("s3cret").await.unwrap();
        assert_eq!(identity.id, "user_1");
    }

    #[tokio::test]
    async fn test_missing_session_is_auth_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/account"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let result = client_for(&server).current_identity("expired").await;
        assert!(matches!(result, Err(AppError::Auth(_))));
    }
}
