//! Document store client (Appwrite-compatible database API)
//!
//! Thin pass-through over the backend's per-collection document endpoints.
//! Filters support equality, ordering, and a result-count limit; that is the
//! whole query surface the watchlist and profile services need.
use crate::error::{AppError, AppResult};
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::json;

const PROJECT_HEADER: &str = "X-Appwrite-Project";

/// A query predicate serialized into the store's wire form
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Equal {
        attribute: String,
        value: serde_json::Value,
    },
    OrderDesc(String),
    Limit(u32),
}

impl Filter {
    pub fn equal(attribute: &str, value: impl Into<serde_json::Value>) -> Self {
        Filter::Equal {
            attribute: attribute.to_string(),
            value: value.into(),
        }
    }

    /// Renders the predicate as the store's JSON query string
    pub fn to_query(&self) -> String {
        let value = match self {
            Filter::Equal { attribute, value } => json!({
                "method": "equal",
                "attribute": attribute,
                "values": [value],
            }),
            Filter::OrderDesc(attribute) => json!({
                "method": "orderDesc",
                "attribute": attribute,
            }),
            Filter::Limit(count) => json!({
                "method": "limit",
                "values": [count],
            }),
        };
        value.to_string()
    }
}

/// A page of documents with the store-reported total match count
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentPage {
    pub total: u64,
    #[serde(default)]
    pub documents: Vec<serde_json::Value>,
}

/// Trait for the backend document store
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a document with a server-generated id
    async fn create(
        &self,
        collection: &str,
        data: serde_json::Value,
    ) -> AppResult<serde_json::Value>;

    /// Lists documents matching the given filters
    async fn list(&self, collection: &str, filters: &[Filter]) -> AppResult<DocumentPage>;

    /// Deletes one document by id
    async fn delete(&self, collection: &str, document_id: &str) -> AppResult<()>;
}

#[derive(Clone)]
pub struct HttpDocumentStore {
    http_client: HttpClient,
    endpoint: String,
    project_id: String,
    database_id: String,
}

impl HttpDocumentStore {
    pub fn new(endpoint: String, project_id: String, database_id: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            endpoint,
            project_id,
            database_id,
        }
    }

    fn documents_url(&self, collection: &str) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.endpoint, self.database_id, collection
        )
    }
}

#[async_trait::async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn create(
        &self,
        collection: &str,
        data: serde_json::Value,
    ) -> AppResult<serde_json::Value> {
        let response = self
            .http_client
            .post(self.documents_url(collection))
            .header(PROJECT_HEADER, &self.project_id)
            .json(&json!({
                "documentId": "unique()",
                "data": data,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Document store returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }

    async fn list(&self, collection: &str, filters: &[Filter]) -> AppResult<DocumentPage> {
        let queries: Vec<(&str, String)> = filters
            .iter()
            .map(|f| ("queries[]", f.to_query()))
            .collect();

        let response = self
            .http_client
            .get(self.documents_url(collection))
            .header(PROJECT_HEADER, &self.project_id)
            .query(&queries)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "Document store returned status {}",
                response.status()
            )));
        }

        response
            .json::<DocumentPage>()
            .await
            .map_err(|e| AppError::SchemaViolation(format!("Invalid document page payload: {}", e)))
    }

    async fn delete(&self, collection: &str, document_id: &str) -> AppResult<()> {
        let url = format!("{}/{}", self.documents_url(collection), document_id);
        let response = self
            .http_client
            .delete(&url)
            .header(PROJECT_HEADER, &self.project_id)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "Document store returned status {}",
                response.status()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_equal_filter_wire_form() {
        let filter = Filter::equal("userId", "user_1");
        let parsed: serde_json::Value = serde_json::from_str(&filter.to_query()).unwrap();
        assert_eq!(parsed["method"], "equal");
        assert_eq!(parsed["attribute"], "userId");
        assert_eq!(parsed["values"][0], "user_1");
    }

    #[test]
    fn test_limit_and_order_filter_wire_form() {
        let limit: serde_json::Value =
            serde_json::from_str(&Filter::Limit(1).to_query()).unwrap();
        assert_eq!(limit["method"], "limit");
        assert_eq!(limit["values"][0], 1);

        let order: serde_json::Value =
            serde_json::from_str(&Filter::OrderDesc("$createdAt".to_string()).to_query()).unwrap();
        assert_eq!(order["method"], "orderDesc");
        assert_eq!(order["attribute"], "$createdAt");
    }

    fn store_for(server: &MockServer) -> HttpDocumentStore {
        HttpDocumentStore::new(server.uri(), "proj_1".to_string(), "db_1".to_string())
    }

    #[tokio::test]
    async fn test_create_posts_document_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/databases/db_1/collections/saved_movies/documents"))
            .and(header(PROJECT_HEADER, "proj_1"))
            .and(body_partial_json(serde_json::json!({
                "documentId": "unique()",
                "data": {"movieId": "42"}
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "$id": "doc_1",
                "movieId": "42"
            })))
            .mount(&server)
            .await;

        let document = store_for(&server)
            .create("saved_movies", serde_json::json!({"movieId": "42"}))
            .await
            .unwrap();
        assert_eq!(document["$id"], "doc_1");
    }

    #[tokio::test]
    async fn test_list_sends_query_strings() {
        let server = MockServer::start().await;
        let filter = Filter::equal("userId", "user_1");
        Mock::given(method("GET"))
            .and(path("/databases/db_1/collections/saved_movies/documents"))
            .and(query_param("queries[]", filter.to_query()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "total": 1,
                "documents": [{"$id": "doc_1"}]
            })))
            .mount(&server)
            .await;

        let page = store_for(&server)
            .list("saved_movies", &[filter])
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.documents.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_failure_is_external_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = store_for(&server).delete("saved_movies", "missing").await;
        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }
}
