use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultOnFailure, TraceLayer};

use moodreel_core::mood::{MoodRequest, MoodResponse, MoodService, ServiceError};

const MOOD_FAILED: &str = "Something failed";
const MOVIE_FAILED: &str = "Failed to fetch movie details";

#[derive(Clone)]
pub struct AppState {
    pub service: MoodService,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/mood", post(post_mood))
        .route("/api/movie/:id", get(get_movie))
        .with_state(state)
        .layer(CorsLayer::permissive())
        // Failures are already reported at error level by the service.
        .layer(
            TraceLayer::new_for_http()
                .on_failure(DefaultOnFailure::new().level(tracing::Level::WARN)),
        )
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl ApiError {
    fn from_service(err: ServiceError, upstream_message: &'static str) -> Self {
        match err {
            ServiceError::Validation(message) => Self {
                status: StatusCode::BAD_REQUEST,
                message,
            },
            ServiceError::Upstream(_) => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: upstream_message,
            },
        }
    }
}

async fn healthz() -> &'static str {
    "ok"
}

async fn post_mood(
    State(state): State<AppState>,
    payload: Result<Json<MoodRequest>, JsonRejection>,
) -> Result<Json<MoodResponse>, ApiError> {
    // An unreadable body carries no mood.
    let req = payload.map(|Json(req)| req).unwrap_or_default();

    let res = state
        .service
        .handle(req)
        .await
        .map_err(|e| ApiError::from_service(e, MOOD_FAILED))?;
    Ok(Json(res))
}

async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let movie = state
        .service
        .movie(&id)
        .await
        .map_err(|e| ApiError::from_service(e, MOVIE_FAILED))?;
    Ok(Json(movie))
}
