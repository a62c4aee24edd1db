use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use quillpost_api_types::ApiErrorBody;

use crate::application::error::ErrorReport;
use crate::application::posts::PostServiceError;
use crate::application::repos::RepoError;

pub const POST_FIELDS_REQUIRED: &str = "Title and content are required";
pub const SUMMARY_REQUIRED: &str = "Summary is required";

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: &'static str,
    details: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: &'static str, details: Option<String>) -> Self {
        Self {
            status,
            message,
            details,
        }
    }

    pub fn bad_request(message: &'static str, details: Option<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, details)
    }

    pub fn not_found(message: &'static str) -> Self {
        Self::new(StatusCode::NOT_FOUND, message, None)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Map a service failure, using `invalid_message` for rejected input.
    pub fn from_service(err: PostServiceError, invalid_message: &'static str) -> Self {
        match err {
            PostServiceError::InvalidInput { message } => {
                Self::bad_request(invalid_message, Some(message))
            }
            PostServiceError::Repo(RepoError::InvalidInput { message }) => {
                Self::bad_request(invalid_message, Some(message))
            }
            PostServiceError::Repo(RepoError::Persistence(message)) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to store post",
                Some(message),
            ),
        }
    }

    /// Map a failure from a query that takes no client input.
    pub fn from_read(err: PostServiceError) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to load posts",
            Some(err.to_string()),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let diagnostic = match &self.details {
            Some(details) => format!("{}: {details}", self.message),
            None => self.message.to_string(),
        };
        // Persistence details stay in the logs.
        let details = if self.status.is_server_error() {
            None
        } else {
            self.details
        };
        let body = ApiErrorBody {
            error: self.message.to_string(),
            details,
        };
        let mut response = (self.status, Json(body)).into_response();
        ErrorReport::from_message("infra::http::api", self.status, diagnostic)
            .attach(&mut response);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persistence_failures_map_to_500() {
        let err = ApiError::from_service(
            PostServiceError::Repo(RepoError::Persistence("disk full".to_string())),
            POST_FIELDS_REQUIRED,
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn invalid_input_uses_the_caller_message() {
        let err = ApiError::from_service(
            PostServiceError::InvalidInput {
                message: "title must not be empty".to_string(),
            },
            POST_FIELDS_REQUIRED,
        );
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message, POST_FIELDS_REQUIRED);
    }

    #[test]
    fn read_failures_map_to_500_without_input_message() {
        let err = ApiError::from_read(PostServiceError::Repo(RepoError::Persistence(
            "lock poisoned".to_string(),
        )));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Failed to load posts");
        assert_eq!(err.details.as_deref(), Some("persistence error: lock poisoned"));
    }
}
