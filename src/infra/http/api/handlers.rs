//! JSON handlers for posts and classification.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use quillpost_api_types::{
    ClassifyRequest, ClassifyResponse, CreatePostRequest, PostPayload,
};

use crate::application::posts::CreatePostCommand;
use crate::domain::types::PostId;

use super::error::{ApiError, POST_FIELDS_REQUIRED, SUMMARY_REQUIRED};
use super::state::AppState;

pub async fn list_posts(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let posts = state
        .posts
        .list_posts()
        .await
        .map_err(ApiError::from_read)?;

    let payload: Vec<PostPayload> = posts.into_iter().map(PostPayload::from).collect();
    Ok(Json(payload))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state
        .posts
        .find_post(&PostId::from(id))
        .await
        .map_err(ApiError::from_read)?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    Ok(Json(PostPayload::from(post)))
}

pub async fn create_post(
    State(state): State<AppState>,
    payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) =
        payload.map_err(|err| ApiError::bad_request(POST_FIELDS_REQUIRED, Some(err.body_text())))?;

    let post = state
        .posts
        .create_post(CreatePostCommand::new(request.title, request.content))
        .await
        .map_err(|err| ApiError::from_service(err, POST_FIELDS_REQUIRED))?;

    Ok((StatusCode::CREATED, Json(PostPayload::from(post))))
}

pub async fn classify(
    State(state): State<AppState>,
    payload: Result<Json<ClassifyRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) =
        payload.map_err(|err| ApiError::bad_request(SUMMARY_REQUIRED, Some(err.body_text())))?;

    let category = state
        .posts
        .classify_summary(&request.summary)
        .await
        .map_err(|err| ApiError::from_service(err, SUMMARY_REQUIRED))?;

    Ok(Json(ClassifyResponse { category }))
}
