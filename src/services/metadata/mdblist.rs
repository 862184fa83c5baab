/// MDBList API provider
///
/// Both endpoints hang off the API root and are selected by query parameter:
/// 1. Search: `/?apikey=..&s={query}` → `{ "search": [hit, ...] }`
/// 2. Detail: `/?apikey=..&i={id}` → a single title object, or an object
///    without an `id` when nothing matched
use reqwest::Client as HttpClient;

use crate::{
    error::{AppError, AppResult},
    models::{MdblistSearchResponse, MdblistTitle, TitleDetail, TitleSummary},
    services::metadata::MetadataProvider,
};

#[derive(Clone)]
pub struct MdblistProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl MdblistProvider {
    pub fn new(http_client: HttpClient, api_key: String, api_url: String) -> Self {
        Self {
            http_client,
            api_key,
            api_url,
        }
    }

    async fn get(&self, params: &[(&str, &str)]) -> AppResult<serde_json::Value> {
        let url = format!("{}/", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[("apikey", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "MDBList API returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }

    async fn fetch_search(&self, query: &str) -> AppResult<Vec<TitleSummary>> {
        let body = self.get(&[("s", query)]).await?;

        let results: MdblistSearchResponse = serde_json::from_value(body).map_err(|e| {
            AppError::ExternalApi(format!("Invalid MDBList search response: {}", e))
        })?;

        // Hits that do not deserialize are dropped rather than failing the search
        let titles: Vec<TitleSummary> = results
            .search
            .into_iter()
            .filter_map(|hit| serde_json::from_value::<MdblistTitle>(hit).ok())
            .filter_map(MdblistTitle::into_summary)
            .collect();

        Ok(titles)
    }

    async fn fetch_detail(&self, id: &str) -> AppResult<Option<TitleDetail>> {
        let body = self.get(&[("i", id)]).await?;

        let raw: MdblistTitle = serde_json::from_value(body).map_err(|e| {
            AppError::ExternalApi(format!("Invalid MDBList detail response: {}", e))
        })?;

        Ok(raw.into_detail())
    }
}

#[async_trait::async_trait]
impl MetadataProvider for MdblistProvider {
    async fn search(&self, query: &str) -> Vec<TitleSummary> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        match self.fetch_search(query.trim()).await {
            Ok(titles) => {
                tracing::info!(
                    query = %query,
                    results = titles.len(),
                    provider = "mdblist",
                    "Title search completed"
                );
                titles
            }
            Err(e) => {
                tracing::warn!(error = %e, query = %query, provider = "mdblist", "Title search failed");
                Vec::new()
            }
        }
    }

    async fn get_detail(&self, id: &str) -> Option<TitleDetail> {
        match self.fetch_detail(id).await {
            Ok(Some(detail)) => {
                tracing::info!(title_id = %id, provider = "mdblist", "Title detail fetched");
                Some(detail)
            }
            Ok(None) => {
                tracing::info!(title_id = %id, provider = "mdblist", "Title not found");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, title_id = %id, provider = "mdblist", "Title detail lookup failed");
                None
            }
        }
    }

    fn name(&self) -> &'static str {
        "mdblist"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TitleKind;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> MdblistProvider {
        MdblistProvider::new(HttpClient::new(), "test_key".to_string(), server.uri())
    }

    #[tokio::test]
    async fn test_search_preserves_source_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("apikey", "test_key"))
            .and(query_param("s", "Oppenheimer"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "search": [
                    { "id": "mv001", "title": "Oppenheimer", "year": 2023, "type": "movie", "score": 86 },
                    { "title": "no id, skipped" },
                    { "id": "sh002", "title": "Oppenheimer", "year": 1980, "type": "show",
                      "poster": "https://img.example/1980.jpg" }
                ],
                "total": 3,
                "response": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let results = provider(&server).search("Oppenheimer").await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "mv001");
        assert_eq!(results[0].kind, TitleKind::Movie);
        assert_eq!(results[1].id, "sh002");
        assert_eq!(results[1].kind, TitleKind::Show);
        assert_eq!(results[1].poster_url, "https://img.example/1980.jpg");
    }

    #[tokio::test]
    async fn test_search_missing_array_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "response": false, "error": "Invalid API key!" })),
            )
            .mount(&server)
            .await;

        assert!(provider(&server).search("Heat").await.is_empty());
    }

    #[tokio::test]
    async fn test_search_server_error_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        assert!(provider(&server).search("Heat").await.is_empty());
    }

    #[tokio::test]
    async fn test_search_blank_query_skips_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        assert!(provider(&server).search("   ").await.is_empty());
    }

    #[tokio::test]
    async fn test_get_detail_normalizes_ratings() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("i", "mv001"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "mv001",
                "title": "Oppenheimer",
                "year": 2023,
                "ratings": [{ "source": "imdb", "value": "8.6" }]
            })))
            .mount(&server)
            .await;

        let detail = provider(&server).get_detail("mv001").await.unwrap();
        assert_eq!(detail.summary.title, "Oppenheimer");
        assert_eq!(detail.summary.year, 2023);
        assert_eq!(detail.ratings.imdb, Some("8.6".to_string()));
        assert_eq!(detail.ratings.metacritic_aggregate, None);
    }

    #[tokio::test]
    async fn test_get_detail_tolerates_malformed_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("i", "mv001"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "mv001",
                "title": "Oppenheimer",
                "year": "2023",
                "genres": [{ "id": 18 }, { "title": "drama" }],
                "ratings": [{ "source": "imdb", "value": "8.6" }, { "value": 5 }]
            })))
            .mount(&server)
            .await;

        let detail = provider(&server).get_detail("mv001").await.unwrap();
        assert_eq!(detail.summary.year, 2023);
        assert_eq!(detail.genres, vec!["drama"]);
        assert_eq!(detail.ratings.imdb, Some("8.6".to_string()));
    }

    #[tokio::test]
    async fn test_get_detail_not_found_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "response": false, "error": "Not found" })),
            )
            .mount(&server)
            .await;

        assert!(provider(&server).get_detail("missing").await.is_none());
    }

    #[tokio::test]
    async fn test_get_detail_transport_error_is_none() {
        let provider = MdblistProvider::new(
            HttpClient::new(),
            "test_key".to_string(),
            "http://127.0.0.1:1".to_string(),
        );

        assert!(provider.get_detail("mv001").await.is_none());
    }
}
