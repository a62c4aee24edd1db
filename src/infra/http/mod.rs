mod api;
mod middleware;

pub use api::{ApiError, AppState};

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    middleware as axum_middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::application::error::ErrorReport;

use self::middleware::{log_responses, set_request_context};

/// Router for the JSON API plus the health check.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/posts",
            get(api::list_posts).post(api::create_post),
        )
        .route("/api/posts/{id}", get(api::get_post))
        .route("/api/classify", post(api::classify))
        .route("/_health", get(health))
        .with_state(state)
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
}

async fn health(State(state): State<AppState>) -> Response {
    match state.posts.count_posts().await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}
