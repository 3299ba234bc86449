use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::request_id::RequestId;
use crate::models::{ChatMessage, ChatResponse, HistoryItem, Movie};

use super::AppState;

// Request types

/// Validated body of `POST /api/chat`
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<ChatMessage>,
}

impl TryFrom<Value> for ChatRequest {
    type Error = AppError;

    fn try_from(body: Value) -> Result<Self, Self::Error> {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .filter(|message| !message.is_empty())
            .ok_or_else(|| {
                AppError::InvalidInput("Message is required and must be a string".to_string())
            })?
            .to_string();

        let history = match body.get("history") {
            None | Some(Value::Null) => Vec::new(),
            Some(history) => serde_json::from_value::<Vec<HistoryItem>>(history.clone())
                .map_err(|e| {
                    AppError::InvalidInput(format!(
                        "History must be a list of {{role, content}} entries: {}",
                        e
                    ))
                })?
                .into_iter()
                .map(ChatMessage::from)
                .collect(),
        };

        Ok(Self { message, history })
    }
}

#[derive(Debug, Deserialize)]
pub struct MovieQuery {
    pub genre: Option<String>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Answers a chat message, optionally with candidate movies
pub async fn chat(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<ChatResponse>> {
    state.chat.ensure_configured()?;

    let Json(body) = payload.map_err(|rejection| AppError::InvalidInput(rejection.body_text()))?;
    let request = ChatRequest::try_from(body)?;

    tracing::info!(
        request_id = %request_id,
        message_len = request.message.len(),
        history_len = request.history.len(),
        "Processing chat request"
    );

    let response = state.chat.answer(&request.message, &request.history).await?;

    tracing::info!(
        request_id = %request_id,
        movies = response.movies.len(),
        "Chat reply generated"
    );

    Ok(Json(response))
}

/// Lists the catalog, optionally narrowed to one genre
pub async fn list_movies(
    State(state): State<AppState>,
    query: Result<Query<MovieQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Movie>>> {
    let Query(query) = query.map_err(|rejection| AppError::InvalidInput(rejection.body_text()))?;
    let movies: Vec<Movie> = match query.genre.as_deref() {
        Some(genre) if genre != "All" => {
            state.catalog.by_genre(genre).into_iter().cloned().collect()
        }
        _ => state.catalog.movies().to_vec(),
    };
    Ok(Json(movies))
}

/// Fetches a single movie by id
pub async fn get_movie(
    State(state): State<AppState>,
    id: Result<Path<u32>, PathRejection>,
) -> AppResult<Json<Movie>> {
    let Path(id) = id.map_err(|rejection| AppError::InvalidInput(rejection.body_text()))?;
    state
        .catalog
        .get(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("movie {}", id)))
}

/// Distinct genres present in the catalog
pub async fn list_genres(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.catalog.genres().into_iter().map(str::to_string).collect())
}
