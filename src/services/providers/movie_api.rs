/// Movie recommendation API provider
///
/// Talks to the recommendation backend:
/// 1. Filtered: /get_movies?genre=<comma joined>&match_type=<contains|exact>
/// 2. Random: /random
///
/// Both endpoints answer with a JSON array of movies. No retries, no caching.
use std::time::Duration;

use reqwest::{Client as HttpClient, Response};

use crate::{
    error::{AppError, AppResult},
    models::{Movie, QueryDescriptor},
    services::providers::RecommendationSource,
};

const GET_MOVIES_PATH: &str = "/get_movies";
const RANDOM_PATH: &str = "/random";

#[derive(Clone)]
pub struct MovieApiProvider {
    http_client: HttpClient,
    api_url: String,
}

impl MovieApiProvider {
    /// Creates a provider with a request timeout applied to every call
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http_client, api_url))
    }

    pub fn with_client(http_client: HttpClient, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self {
            http_client,
            api_url,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Checks the status and parses the body as a movie list
    async fn parse_movies(&self, response: Response) -> AppResult<Vec<Movie>> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Recommendation API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        tracing::debug!(response = %response_text, "Raw recommendation API response");

        serde_json::from_str::<Vec<Movie>>(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                response = %response_text,
                "Failed to deserialize recommendation response"
            );
            AppError::ExternalApi(format!("Failed to parse recommendation response: {}", e))
        })
    }
}

#[async_trait::async_trait]
impl RecommendationSource for MovieApiProvider {
    async fn get_movies(&self, descriptor: &QueryDescriptor) -> AppResult<Vec<Movie>> {
        let response = self
            .http_client
            .get(self.endpoint(GET_MOVIES_PATH))
            .query(&descriptor.query_pairs())
            .send()
            .await?;

        let movies = self.parse_movies(response).await?;

        tracing::info!(
            genre = %descriptor.genre_param(),
            match_type = %descriptor.match_type(),
            results = movies.len(),
            provider = self.name(),
            "Filtered movies fetched"
        );

        Ok(movies)
    }

    async fn random_movies(&self) -> AppResult<Vec<Movie>> {
        let response = self
            .http_client
            .get(self.endpoint(RANDOM_PATH))
            .send()
            .await?;

        let movies = self.parse_movies(response).await?;

        tracing::info!(
            results = movies.len(),
            provider = self.name(),
            "Random movies fetched"
        );

        Ok(movies)
    }

    fn name(&self) -> &'static str {
        "movie_api"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchMode;
    use axum::{
        extract::RawQuery,
        http::StatusCode,
        routing::get,
        Router,
    };
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    fn movies_json() -> Value {
        json!([
            {
                "id": "680",
                "title": "Pulp Fiction",
                "genres": "Thriller, Crime",
                "release_date": "1994-09-10",
                "vote_average": 8.5,
                "vote_count": 27000,
                "poster_path": "/d5iIlFn5s0ImszYzBPb8JPIfbXD.jpg"
            },
            {
                "id": "155",
                "title": "The Dark Knight",
                "genres": "Drama, Action, Crime, Thriller",
                "release_date": "2008-07-16",
                "vote_average": 8.5,
                "vote_count": 31000,
                "poster_path": ""
            }
        ])
    }

    async fn spawn_server(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{addr}")
    }

    fn provider(url: String) -> MovieApiProvider {
        provider_with_timeout(url, Duration::from_secs(5))
    }

    fn provider_with_timeout(url: String, timeout: Duration) -> MovieApiProvider {
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
        MovieApiProvider::new(url, timeout).unwrap()
    }

    #[tokio::test]
    async fn test_get_movies_sends_encoded_query() {
        let seen_query: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
        let recorder = seen_query.clone();
        let app = Router::new().route(
            "/get_movies",
            get(move |RawQuery(query): RawQuery| {
                let recorder = recorder.clone();
                async move {
                    *recorder.lock().unwrap() = query;
                    axum::Json(movies_json())
                }
            }),
        );
        let url = spawn_server(app).await;

        let descriptor = QueryDescriptor::new(["action", "drama"], MatchMode::Contains).unwrap();
        let movies = provider(url).get_movies(&descriptor).await.unwrap();

        assert_eq!(
            seen_query.lock().unwrap().as_deref(),
            Some("genre=action%2Cdrama&match_type=contains")
        );
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].title, "Pulp Fiction");
        assert_eq!(movies[1].title, "The Dark Knight");
    }

    #[tokio::test]
    async fn test_get_movies_encodes_multi_word_genres() {
        let seen_query: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
        let recorder = seen_query.clone();
        let app = Router::new().route(
            "/get_movies",
            get(move |RawQuery(query): RawQuery| {
                let recorder = recorder.clone();
                async move {
                    *recorder.lock().unwrap() = query;
                    axum::Json(json!([]))
                }
            }),
        );
        let url = spawn_server(app).await;

        let descriptor =
            QueryDescriptor::new(["Science Fiction", "TV Movie"], MatchMode::Exact).unwrap();
        let movies = provider(url).get_movies(&descriptor).await.unwrap();

        assert!(movies.is_empty());
        assert_eq!(
            seen_query.lock().unwrap().as_deref(),
            Some("genre=science+fiction%2Ctv+movie&match_type=exact")
        );
    }

    #[tokio::test]
    async fn test_random_movies() {
        let app = Router::new().route(
            "/random",
            get(|RawQuery(query): RawQuery| async move {
                assert_eq!(query, None);
                axum::Json(movies_json())
            }),
        );
        let url = spawn_server(app).await;

        // Trailing slash on the base URL must not double up
        let movies = provider(format!("{url}/")).random_movies().await.unwrap();
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].id, "680");
    }

    #[tokio::test]
    async fn test_server_error_is_external_api_error() {
        let app = Router::new().route(
            "/get_movies",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let url = spawn_server(app).await;

        let descriptor = QueryDescriptor::new(["action"], MatchMode::Contains).unwrap();
        let err = provider(url).get_movies(&descriptor).await.unwrap_err();

        match err {
            AppError::ExternalApi(msg) => {
                assert!(msg.contains("500"), "unexpected message: {msg}");
                assert!(msg.contains("boom"), "unexpected message: {msg}");
            }
            other => panic!("expected ExternalApi, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_external_api_error() {
        let app = Router::new().route(
            "/random",
            get(|| async { axum::Json(json!({ "detail": "not a list" })) }),
        );
        let url = spawn_server(app).await;

        let err = provider(url).random_movies().await.unwrap_err();
        assert!(matches!(err, AppError::ExternalApi(_)));
    }

    #[tokio::test]
    async fn test_non_json_body_is_external_api_error() {
        let app = Router::new().route(
            "/get_movies",
            get(|| async { axum::response::Html("<html>oops</html>") }),
        );
        let url = spawn_server(app).await;

        let descriptor = QueryDescriptor::new(["comedy"], MatchMode::Contains).unwrap();
        let err = provider(url).get_movies(&descriptor).await.unwrap_err();

        match err {
            AppError::ExternalApi(msg) => {
                assert!(msg.starts_with("Failed to parse"), "unexpected message: {msg}");
            }
            other => panic!("expected ExternalApi, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_stalled_server_times_out() {
        let app = Router::new().route(
            "/random",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                axum::Json(json!([]))
            }),
        );
        let url = spawn_server(app).await;

        let err = provider_with_timeout(url, Duration::from_millis(100))
            .random_movies()
            .await
            .unwrap_err();

        match err {
            AppError::HttpClient(e) => assert!(e.is_timeout(), "expected timeout, got {e}"),
            other => panic!("expected HttpClient, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_http_client_error() {
        // Bind then drop to get a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = provider(format!("http://{addr}"))
            .random_movies()
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::HttpClient(_)));
    }

    #[test]
    fn test_endpoint_join() {
        let provider = MovieApiProvider::with_client(HttpClient::new(), "http://test.local/");
        assert_eq!(provider.endpoint(GET_MOVIES_PATH), "http://test.local/get_movies");
        assert_eq!(provider.endpoint(RANDOM_PATH), "http://test.local/random");
    }
}
