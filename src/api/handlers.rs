use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::request_id::RequestId;
use crate::models::{Genre, MatchMode, Movie, MovieRequest, GENRE_CATALOG};
use crate::services::{Lifecycle, PendingQuery, QueryExecutor, SelectionController, ToggleOutcome};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct ToggleGenreRequest {
    pub genre: String,
}

#[derive(Debug, Deserialize)]
pub struct SetMatchTypeRequest {
    pub match_type: MatchMode,
}

/// One checkbox of the genre list
#[derive(Debug, Serialize)]
pub struct GenreOptionResponse {
    pub name: &'static str,
    pub known_count: u32,
    pub selected: bool,
    pub disabled: bool,
}

#[derive(Debug, Serialize)]
pub struct SelectionResponse {
    pub genres: Vec<Genre>,
    pub match_type: MatchMode,
    /// Whether the "get movies" trigger should be enabled
    pub can_search: bool,
}

impl From<&SelectionController> for SelectionResponse {
    fn from(selection: &SelectionController) -> Self {
        Self {
            genres: selection.selection().to_vec(),
            match_type: selection.match_mode(),
            can_search: !selection.selection().is_empty(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub outcome: ToggleOutcome,
    pub selection: SelectionResponse,
}

/// A movie shaped for display
#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub id: String,
    pub title: String,
    pub genres: String,
    pub release_date: String,
    pub year: String,
    pub vote_average: f64,
    /// Vote average with one decimal, e.g. "7.3"
    pub rating: String,
    pub vote_count: u64,
    pub poster_url: Option<String>,
}

impl From<&Movie> for MovieResponse {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id.clone(),
            title: movie.title.clone(),
            genres: movie.genres.clone(),
            release_date: movie.release_date.clone(),
            year: movie.release_year().to_string(),
            vote_average: movie.vote_average,
            rating: format!("{:.1}", movie.vote_average),
            vote_count: movie.vote_count,
            poster_url: movie.poster_url(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MoviesResponse {
    pub status: &'static str,
    pub error: Option<String>,
    pub movies: Vec<MovieResponse>,
}

impl From<&QueryExecutor> for MoviesResponse {
    fn from(executor: &QueryExecutor) -> Self {
        let error = match executor.lifecycle() {
            Lifecycle::Failed { error, .. } => Some(error.clone()),
            _ => None,
        };

        Self {
            status: executor.lifecycle().status(),
            error,
            movies: executor.movies().iter().map(MovieResponse::from).collect(),
        }
    }
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Genre catalog with per-entry selection and disabled state
pub async fn get_genres(State(state): State<AppState>) -> Json<Vec<GenreOptionResponse>> {
    let inner = state.inner.read().await;
    let options = GENRE_CATALOG
        .iter()
        .map(|entry| GenreOptionResponse {
            name: entry.genre.name(),
            known_count: entry.known_count,
            selected: inner.selection.is_selected(entry.genre),
            disabled: inner.selection.is_genre_disabled(entry.genre),
        })
        .collect();
    Json(options)
}

/// Current selection and match type
pub async fn get_selection(State(state): State<AppState>) -> Json<SelectionResponse> {
    let inner = state.inner.read().await;
    Json(SelectionResponse::from(&inner.selection))
}

/// Toggle one genre in or out of the selection
pub async fn toggle_genre(
    State(state): State<AppState>,
    Json(request): Json<ToggleGenreRequest>,
) -> AppResult<Json<ToggleResponse>> {
    let genre: Genre = request.genre.parse()?;

    let mut inner = state.inner.write().await;
    let outcome = inner.selection.toggle_genre(genre);

    Ok(Json(ToggleResponse {
        outcome,
        selection: SelectionResponse::from(&inner.selection),
    }))
}

/// Switch between contains and exact matching
pub async fn set_match_type(
    State(state): State<AppState>,
    Json(request): Json<SetMatchTypeRequest>,
) -> Json<SelectionResponse> {
    let mut inner = state.inner.write().await;
    inner.selection.set_match_mode(request.match_type);
    Json(SelectionResponse::from(&inner.selection))
}

/// Last query status and the movies currently held
pub async fn get_movies(State(state): State<AppState>) -> Json<MoviesResponse> {
    let inner = state.inner.read().await;
    Json(MoviesResponse::from(&inner.executor))
}

/// Run a filtered query for the current selection
pub async fn search_movies(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<MoviesResponse>> {
    let pending = {
        let mut inner = state.inner.write().await;
        let descriptor = inner.selection.current_query_descriptor().ok_or_else(|| {
            AppError::InvalidInput("Select at least one genre".to_string())
        })?;

        tracing::info!(
            request_id = %request_id,
            genre = %descriptor.genre_param(),
            match_type = %descriptor.match_type(),
            "Processing movie search"
        );

        inner.executor.begin(MovieRequest::Filtered(descriptor))?
    };

    settle(state, pending).await.map(Json)
}

/// Run a query for random movies
pub async fn random_movies(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<MoviesResponse>> {
    let pending = {
        let mut inner = state.inner.write().await;
        tracing::info!(request_id = %request_id, "Processing random movie request");
        inner.executor.begin(MovieRequest::Random)?
    };

    settle(state, pending).await.map(Json)
}

/// Runs the pending query to completion outside the state lock
///
/// The fetch and the completion run in their own task so a client that
/// disconnects mid-request cannot leave the session stuck in Loading.
async fn settle(state: AppState, pending: PendingQuery) -> AppResult<MoviesResponse> {
    let task_state = state.clone();
    let task = tokio::spawn(async move {
        let outcome = pending.execute().await;
        let mut inner = task_state.inner.write().await;
        inner.executor.complete(outcome);
        MoviesResponse::from(&inner.executor)
    });

    match task.await {
        Ok(response) => Ok(response),
        Err(e) => {
            tracing::error!(error = %e, "Query task join error");
            let mut inner = state.inner.write().await;
            if inner.executor.lifecycle().is_loading() {
                inner
                    .executor
                    .complete(Err(AppError::Internal(e.to_string())));
            }
            Err(AppError::Internal(e.to_string()))
        }
    }
}
