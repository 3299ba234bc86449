use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::json;

use cinematch_api::api::{create_router, AppState};
use cinematch_api::catalog::Catalog;
use cinematch_api::config::Config;
use cinematch_api::error::{AppError, AppResult};
use cinematch_api::models::{ChatMessage, Movie};
use cinematch_api::services::ModelGateway;

/// Records every message sequence it receives and answers with a fixed reply
#[derive(Default)]
struct RecordingGateway {
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

#[async_trait::async_trait]
impl ModelGateway for RecordingGateway {
    async fn complete(&self, messages: &[ChatMessage]) -> AppResult<String> {
        self.calls.lock().unwrap().push(messages.to_vec());
        Ok("1. Inception (2010, Sci-Fi, 4.8)".to_string())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

struct SlowGateway;

#[async_trait::async_trait]
impl ModelGateway for SlowGateway {
    async fn complete(&self, _messages: &[ChatMessage]) -> AppResult<String> {
        tokio::time::sleep(Duration::from_secs(35)).await;
        Ok("never".to_string())
    }

    fn name(&self) -> &'static str {
        "slow"
    }
}

struct RateLimitedGateway;

#[async_trait::async_trait]
impl ModelGateway for RateLimitedGateway {
    async fn complete(&self, _messages: &[ChatMessage]) -> AppResult<String> {
        Err(AppError::Upstream {
            status: 429,
            body: "Rate limit reached".to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "rate-limited"
    }
}

fn test_catalog() -> Catalog {
    Catalog::builtin().unwrap()
}

fn create_test_server(gateway: Arc<dyn ModelGateway>, timeout: Duration) -> TestServer {
    let state = AppState::new(test_catalog(), gateway, timeout);
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

fn recording_server() -> (TestServer, Arc<RecordingGateway>) {
    let gateway = Arc::new(RecordingGateway::default());
    let server = create_test_server(gateway.clone(), Duration::from_secs(30));
    (server, gateway)
}

#[tokio::test]
async fn test_health_check() {
    let (server, _) = recording_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let (server, _) = recording_server();
    let response = server.get("/health").await;
    let header = response.header("x-request-id");
    assert!(uuid::Uuid::parse_str(header.to_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_incoming_request_id_is_honoured() {
    let (server, _) = recording_server();
    let request_id = uuid::Uuid::new_v4();

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_str(&request_id.to_string()).unwrap(),
        )
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.header("x-request-id").to_str().unwrap(),
        request_id.to_string()
    );
}

#[tokio::test]
async fn test_chat_returns_reply_and_candidates() {
    let (server, gateway) = recording_server();

    let response = server
        .post("/api/chat")
        .json(&json!({ "message": "best sci-fi movies" }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "1. Inception (2010, Sci-Fi, 4.8)");

    let movies: Vec<Movie> = serde_json::from_value(body["movies"].clone()).unwrap();
    assert!(!movies.is_empty() && movies.len() <= 5);
    assert!(movies
        .iter()
        .all(|m| m.rating >= 4.5 && m.has_any_genre(&["sci-fi"])));

    let calls = gateway.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert!(calls[0][0].content.contains("ONLY recommend from these"));
}

#[tokio::test]
async fn test_informational_query_returns_no_movies() {
    let (server, gateway) = recording_server();

    let response = server
        .post("/api/chat")
        .json(&json!({ "message": "what is the movie Titanic about" }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert!(body.get("movies").is_none());

    let calls = gateway.calls.lock().unwrap();
    assert!(calls[0][0].content.contains("not related to movies"));
}

#[tokio::test]
async fn test_history_is_truncated_to_last_four() {
    let (server, gateway) = recording_server();

    let history: Vec<_> = (0..8)
        .map(|i| {
            json!({
                "role": if i % 2 == 0 { "user" } else { "assistant" },
                "content": format!("turn {i}")
            })
        })
        .collect();

    server
        .post("/api/chat")
        .json(&json!({ "message": "horror", "history": history }))
        .await
        .assert_status_ok();

    let calls = gateway.calls.lock().unwrap();
    let contents: Vec<&str> = calls[0].iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents.len(), 6);
    assert_eq!(contents[1..], ["turn 4", "turn 5", "turn 6", "turn 7", "horror"]);
}

#[tokio::test]
async fn test_missing_message_is_bad_request() {
    let (server, gateway) = recording_server();

    let response = server
        .post("/api/chat")
        .json(&json!({ "history": [] }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("required"));
    assert!(gateway.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_non_string_message_is_bad_request() {
    let (server, _) = recording_server();

    let response = server
        .post("/api/chat")
        .json(&json!({ "message": ["action"] }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let (server, _) = recording_server();

    let response = server
        .post("/api/chat")
        .content_type("application/json")
        .text("{ not json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_missing_api_key_is_server_error() {
    let config = Config::from_vars(Vec::new()).unwrap();
    let state = AppState::from_config(&config, test_catalog());
    let server = TestServer::new(create_router(state)).unwrap();

    let response = server
        .post("/api/chat")
        .json(&json!({ "message": "comedy" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "HUGGINGFACE_API_KEY is not configured");
}

#[tokio::test]
async fn test_slow_model_yields_gateway_timeout() {
    let server = create_test_server(Arc::new(SlowGateway), Duration::from_millis(50));

    let response = server
        .post("/api/chat")
        .json(&json!({ "message": "recent action" }))
        .await;

    response.assert_status(StatusCode::GATEWAY_TIMEOUT);
    let body: serde_json::Value = response.json();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .to_lowercase()
        .contains("timeout"));
}

#[tokio::test]
async fn test_upstream_status_is_forwarded() {
    let server = create_test_server(Arc::new(RateLimitedGateway), Duration::from_secs(30));

    let response = server
        .post("/api/chat")
        .json(&json!({ "message": "comedy" }))
        .await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "API error: Rate limit reached");
}

#[tokio::test]
async fn test_list_movies() {
    let (server, _) = recording_server();

    let response = server.get("/api/movies").await;
    response.assert_status_ok();
    let movies: Vec<Movie> = response.json();
    assert_eq!(movies.len(), test_catalog().len());
}

#[tokio::test]
async fn test_list_movies_by_genre() {
    let (server, _) = recording_server();

    let response = server
        .get("/api/movies")
        .add_query_param("genre", "Horror")
        .await;
    response.assert_status_ok();
    let movies: Vec<Movie> = response.json();
    assert!(!movies.is_empty());
    assert!(movies.iter().all(|m| m.genre.iter().any(|g| g == "Horror")));

    let all: Vec<Movie> = server
        .get("/api/movies")
        .add_query_param("genre", "All")
        .await
        .json();
    assert_eq!(all.len(), test_catalog().len());
}

#[tokio::test]
async fn test_get_movie() {
    let (server, _) = recording_server();

    let response = server.get("/api/movies/1").await;
    response.assert_status_ok();
    let movie: Movie = response.json();
    assert_eq!(movie.id, 1);

    server
        .get("/api/movies/9999")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_numeric_movie_id_is_json_bad_request() {
    let (server, _) = recording_server();

    let response = server.get("/api/movies/abc").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_list_genres() {
    let (server, _) = recording_server();

    let genres: Vec<String> = server.get("/api/genres").await.json();
    assert!(genres.contains(&"Sci-Fi".to_string()));
    let mut deduped = genres.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), genres.len());
}
