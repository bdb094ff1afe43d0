use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path,
    },
    routing::{get, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{debug, Level};

use common::types::Health;

use crate::errors::ApiError;
use crate::state::AppState;

pub mod articles;
pub mod tags;

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Numeric path id, or 400 before any service call.
pub(crate) fn path_id(path: Result<Path<i32>, PathRejection>) -> Result<i32, ApiError> {
    path.map(|Path(id)| id).map_err(|e| {
        debug!(error = %e, "rejected path id");
        ApiError::validation("Invalid id")
    })
}

/// Deserialized JSON body, or 400 when it is missing or malformed.
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(v)| v).map_err(|e| {
        debug!(error = %e, "rejected request body");
        ApiError::validation("Invalid request body")
    })
}

/// Build the application router with tag and article routes.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/tags", get(tags::list).post(tags::create))
        .route("/tags/:id", get(tags::get).put(tags::update).delete(tags::delete))
        .route("/tags/:id/articles", get(tags::list_articles))
        .route("/articles", get(articles::list).post(articles::create))
        .route("/articles/:id", get(articles::get).put(articles::update).delete(articles::delete))
        .route("/articles/:id/tags", put(articles::add_tags).delete(articles::remove_tags))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // status code and latency per response
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
