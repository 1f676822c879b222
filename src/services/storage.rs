//! Object storage client (Appwrite-compatible storage API)
//!
//! Used for avatar uploads during registration. Files are addressed by a
//! templated view URL parameterized by bucket, file id, and project.
use crate::error::{AppError, AppResult};
use reqwest::multipart::{Form, Part};
use reqwest::Client as HttpClient;
use serde::Deserialize;

const PROJECT_HEADER: &str = "X-Appwrite-Project";

/// Trait for the backend file storage
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait FileStorage: Send + Sync {
    /// Uploads a file and returns its id
    async fn create_file(&self, file_name: &str, bytes: Vec<u8>) -> AppResult<String>;

    /// Public view URL for a stored file
    fn view_url(&self, file_id: &str) -> String;
}

#[derive(Clone)]
pub struct HttpFileStorage {
    http_client: HttpClient,
    endpoint: String,
    project_id: String,
    bucket_id: String,
}

impl HttpFileStorage {
    pub fn new(endpoint: String, project_id: String, bucket_id: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            endpoint,
            project_id,
            bucket_id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreatedFile {
    #[serde(rename = "$id")]
    id: String,
}

#[async_trait::async_trait]
impl FileStorage for HttpFileStorage {
    async fn create_file(&self, file_name: &str, bytes: Vec<u8>) -> AppResult<String> {
        let form = Form::new()
            .text("fileId", "unique()")
            .part("file", Part::bytes(bytes).file_name(file_name.to_string()));

        let response = self
            .http_client
            .post(format!(
                "{}/storage/buckets/{}/files",
                self.endpoint, self.bucket_id
            ))
            .header(PROJECT_HEADER, &self.project_id)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "File upload failed with status {}: {}",
                status, body
            )));
        }

        let created = response
            .json::<CreatedFile>()
            .await
            .map_err(|e| AppError::SchemaViolation(format!("Invalid file payload: {}", e)))?;

        Ok(created.id)
    }

    fn view_url(&self, file_id: &str) -> String {
        format!(
            "{}/storage/buckets/{}/files/{}/view?project={}",
            self.endpoint, self.bucket_id, file_id, self.project_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_view_url_template() {
        let storage = HttpFileStorage::new(
            "https://backend.example/v1".to_string(),
            "proj_1".to_string(),
            "avatars".to_string(),
        );
        assert_eq!(
            storage.view_url("file_1"),
            "https://backend.example/v1/storage/buckets/avatars/files/file_1/view?project=proj_1"
        );
    }

    #[tokio::test]
    async fn test_create_file_returns_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/storage/buckets/avatars/files"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "$id": "file_1"
            })))
            .mount(&server)
            .await;

        let storage =
            HttpFileStorage::new(server.uri(), "proj_1".to_string(), "avatars".to_string());
        let file_id = storage
            .create_file("avatar.jpg", vec![0xff, 0xd8])
            .await
            .unwrap();
        assert_eq!(file_id, "file_1");
    }

    #[tokio::test]
    async fn test_create_file_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(413))
            .mount(&server)
            .await;

        let storage =
            HttpFileStorage::new(server.uri(), "proj_1".to_string(), "avatars".to_string());
        let result = storage.create_file("avatar.jpg", vec![0u8; 16]).await;
        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }
}
