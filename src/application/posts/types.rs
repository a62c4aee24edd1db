use thiserror::Error;
use url::Url;

use crate::{
    application::{relay::RelayDelivery, repos::RepoError},
    domain::{error::DomainError, types::PostId},
};

#[derive(Debug, Error)]
pub enum PostServiceError {
    #[error("{message}")]
    InvalidInput { message: String },
    #[error(transparent)]
    Repo(RepoError),
}

impl From<DomainError> for PostServiceError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation { message } => Self::InvalidInput { message },
        }
    }
}

impl From<RepoError> for PostServiceError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::InvalidInput { message } => Self::InvalidInput { message },
            other => Self::Repo(other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreatePostCommand {
    pub title: String,
    pub content: String,
}

impl CreatePostCommand {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Builds public links to posts.
#[derive(Debug, Clone)]
pub struct PostLinks {
    base: String,
}

impl PostLinks {
    pub fn new(public_base_url: &Url) -> Self {
        Self {
            base: public_base_url.as_str().trim_end_matches('/').to_string(),
        }
    }

    pub fn post_url(&self, id: &PostId) -> String {
        format!("{}/posts/{id}", self.base)
    }
}

/// Relay webhook together with the delivery policy used to reach it.
#[derive(Clone)]
pub struct RelayTarget {
    pub delivery: RelayDelivery,
    pub url: Url,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_links_ignore_trailing_slash() {
        let base = Url::parse("http://localhost:3000/").expect("url");
        let links = PostLinks::new(&base);
        assert_eq!(
            links.post_url(&PostId::from("42")),
            "http://localhost:3000/posts/42"
        );
    }

    #[test]
    fn store_validation_errors_surface_as_invalid_input() {
        let err = PostServiceError::from(RepoError::InvalidInput {
            message: "title must not be empty".to_string(),
        });
        assert!(matches!(err, PostServiceError::InvalidInput { .. }));

        let err = PostServiceError::from(RepoError::Persistence("disk full".to_string()));
        assert!(matches!(err, PostServiceError::Repo(_)));
    }
}
