//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::PostRecord;
use crate::domain::types::{Category, PostId};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct CreatePostParams {
    pub title: String,
    pub content: String,
    pub category: Category,
}

impl CreatePostParams {
    /// Parameters for a post carrying the default category.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            category: Category::default(),
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    /// All posts, newest first.
    async fn list_posts(&self) -> Result<Vec<PostRecord>, RepoError>;

    async fn find_post(&self, id: &PostId) -> Result<Option<PostRecord>, RepoError>;

    async fn count_posts(&self) -> Result<usize, RepoError>;
}

#[async_trait]
pub trait PostsWriteRepo: Send + Sync {
    /// Validate, stamp and store a new post.
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError>;
}
