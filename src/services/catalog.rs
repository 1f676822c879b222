//! Movie catalog (TMDB) client
//!
//! Read-only access to trending/discovery/search/detail endpoints. Every
//! list-returning method normalizes transport or non-2xx failures to an empty
//! result set; only `details` raises, since a single-item detail view has no
//! meaningful empty-state fallback.
use crate::{
    error::{AppError, AppResult},
    models::{CatalogListResponse, CatalogMovieDetails, MovieDetails, MovieSummary},
};
use reqwest::Client as HttpClient;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for movie catalog providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Movies trending this week
    async fn trending(&self) -> Vec<MovieSummary>;

    /// Popular movies in a given original language and region
    async fn by_language(&self, language: &str, region: &str) -> Vec<MovieSummary>;

    /// Popular foreign-language films
    async fn foreign(&self) -> Vec<MovieSummary>;

    /// Popular kid-friendly animated films
    async fn kids(&self) -> Vec<MovieSummary>;

    /// Free-text title search
    async fn search(&self, query: &str) -> Vec<MovieSummary>;

    /// Title search scoped to a primary release year
    async fn search_year(&self, query: &str, year: i32) -> Vec<MovieSummary>;

    /// Full detail for one movie, including videos
    async fn details(&self, id: u64) -> AppResult<MovieDetails>;
}

#[derive(Clone)]
pub struct TmdbCatalog {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbCatalog {
    pub fn new(api_key: String, api_url: String) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http_client,
            api_key,
            api_url,
        })
    }

    /// Issues one list request, normalizing any failure to an empty set
    async fn fetch_list(&self, endpoint: &str, params: &[(&str, &str)]) -> Vec<MovieSummary> {
        match self.try_fetch_list(endpoint, params).await {
            Ok(response) => response.results.into_iter().map(MovieSummary::from).collect(),
            Err(e) => {
                tracing::warn!(
                    endpoint = %endpoint,
                    error = %e,
                    "Catalog read failed; returning empty result set"
                );
                Vec::new()
            }
        }
    }

    async fn try_fetch_list(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> AppResult<CatalogListResponse> {
        let url = format!("{}/{}", self.api_url, endpoint);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "Catalog API returned status {}",
                response.status()
            )));
        }

        response
            .json::<CatalogListResponse>()
            .await
            .map_err(|e| AppError::SchemaViolation(format!("Invalid catalog list payload: {}", e)))
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbCatalog {
    async fn trending(&self) -> Vec<MovieSummary> {
        self.fetch_list("trending/movie/week", &[]).await
    }

    async fn by_language(&self, language: &str, region: &str) -> Vec<MovieSummary> {
        self.fetch_list(
            "discover/movie",
            &[
                ("with_original_language", language),
                ("region", region),
                ("sort_by", "popularity.desc"),
                ("vote_count.gte", "100"),
            ],
        )
        .await
    }

    async fn foreign(&self) -> Vec<MovieSummary> {
        self.fetch_list(
            "discover/movie",
            &[
                ("with_original_language", "ko"),
                ("sort_by", "popularity.desc"),
                ("vote_count.gte", "100"),
            ],
        )
        .await
    }

    async fn kids(&self) -> Vec<MovieSummary> {
        self.fetch_list(
            "discover/movie",
            &[
                ("certification_country", "US"),
                ("certification.lte", "G"),
                ("with_genres", "16"),
                ("include_adult", "false"),
                ("sort_by", "popularity.desc"),
            ],
        )
        .await
    }

    async fn search(&self, query: &str) -> Vec<MovieSummary> {
        let results = self.fetch_list("search/movie", &[("query", query)]).await;

        tracing::info!(
            query = %query,
            results = results.len(),
            provider = "tmdb",
            "Catalog search completed"
        );

        results
    }

    async fn search_year(&self, query: &str, year: i32) -> Vec<MovieSummary> {
        let year = year.to_string();
        self.fetch_list(
            "search/movie",
            &[("query", query), ("primary_release_year", year.as_str())],
        )
        .await
    }

    async fn details(&self, id: u64) -> AppResult<MovieDetails> {
        let url = format!("{}/movie/{}", self.api_url, id);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("append_to_response", "videos,images"),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("Movie {} not found", id)));
        }
        if !status.is_success() {
            return Err(AppError::CatalogDetail(format!(
                "Catalog API returned status {}",
                status
            )));
        }

        let details = response
            .json::<CatalogMovieDetails>()
            .await
            .map_err(|e| AppError::SchemaViolation(format!("Invalid catalog detail payload: {}", e)))?;

        Ok(MovieDetails::from(details))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn catalog_for(server: &MockServer) -> TmdbCatalog {
        TmdbCatalog::new("test_key".to_string(), server.uri()).unwrap()
    }

    #[tokio::test]
    async fn test_search_parses_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/movie"))
            .and(query_param("api_key", "test_key"))
            .and(query_param("query", "inception"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    {"id": 27205, "title": "Inception", "vote_average": 8.4,
                     "poster_path": "/p.jpg", "release_date": "2010-07-15"}
                ]
            })))
            .mount(&server)
            .await;

        let results = catalog_for(&server).search("inception").await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, 27205);
    }

    #[tokio::test]
    async fn test_search_year_scopes_by_release_year() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/movie"))
            .and(query_param("primary_release_year", "2001"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"id": 10757, "title": "Dil Chahta Hai"}]
            })))
            .mount(&server)
            .await;

        let results = catalog_for(&server).search_year("Dil Chahta Hai", 2001).await;
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_list_failure_normalizes_to_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/trending/movie/week"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let results = catalog_for(&server).trending().await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_list_payload_normalizes_to_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/discover/movie"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let results = catalog_for(&server).kids().await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_details_raises_on_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/1"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = catalog_for(&server).details(1).await;
        assert!(matches!(result, Err(AppError::CatalogDetail(_))));
    }

    #[tokio::test]
    async fn test_details_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/999"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = catalog_for(&server).details(999).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_details_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/27205"))
            .and(query_param("append_to_response", "videos,images"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 27205,
                "title": "Inception",
                "vote_average": 8.4,
                "runtime": 148,
                "genres": [{"id": 28, "name": "Action"}]
            })))
            .mount(&server)
            .await;

        let details = catalog_for(&server).details(27205).await.unwrap();
        assert_eq!(details.title, "Inception");
        assert_eq!(details.runtime, Some(148));
        assert_eq!(details.genres, vec!["Action"]);
    }
}
