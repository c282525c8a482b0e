use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the session API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Genre selection
        .route("/genres", get(handlers::get_genres))
        .route("/selection", get(handlers::get_selection))
        .route("/selection/toggle", post(handlers::toggle_genre))
        .route("/selection/match-type", put(handlers::set_match_type))
        // Movie queries
        .route("/movies", get(handlers::get_movies))
        .route("/movies/search", post(handlers::search_movies))
        .route("/movies/random", post(handlers::random_movies))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
        .with_state(state)
}

/// CORS policy for browser UIs served from another origin
pub fn cors_layer(allow_any_origin: bool) -> CorsLayer {
    if allow_any_origin {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    }
}
