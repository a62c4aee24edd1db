use async_trait::async_trait;

use crate::application::repos::{PostsRepo, RepoError};
use crate::domain::{entities::PostRecord, types::PostId};

use super::{PostStore, newest_first};

#[async_trait]
impl PostsRepo for PostStore {
    async fn list_posts(&self) -> Result<Vec<PostRecord>, RepoError> {
        let posts = self.posts.lock().await;
        Ok(newest_first(&posts))
    }

    async fn find_post(&self, id: &PostId) -> Result<Option<PostRecord>, RepoError> {
        let posts = self.posts.lock().await;
        Ok(posts.iter().find(|post| &post.id == id).cloned())
    }

    async fn count_posts(&self) -> Result<usize, RepoError> {
        Ok(self.posts.lock().await.len())
    }
}
