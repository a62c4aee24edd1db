use async_trait::async_trait;
use time::OffsetDateTime;
use tracing::debug;

use crate::application::repos::{CreatePostParams, PostsWriteRepo, RepoError};
use crate::domain::{entities::PostRecord, posts::ensure_valid_post, types::PostId};

use super::{Backing, PostStore, file};

#[async_trait]
impl PostsWriteRepo for PostStore {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        ensure_valid_post(&params.title, &params.content).map_err(|err| {
            RepoError::InvalidInput {
                message: err.to_string(),
            }
        })?;

        let record = PostRecord {
            id: PostId::generate(),
            title: params.title,
            content: params.content,
            date: OffsetDateTime::now_utc(),
            category: params.category,
        };

        let mut posts = self.posts.lock().await;
        match &self.backing {
            Backing::Memory => posts.push(record.clone()),
            Backing::File(path) => {
                let mut next = posts.clone();
                next.push(record.clone());
                file::persist(path, &next).await?;
                *posts = next;
                debug!(path = %path.display(), posts = posts.len(), "post file rewritten");
            }
        }

        Ok(record)
    }
}
