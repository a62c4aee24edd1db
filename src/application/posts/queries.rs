use crate::application::classify::{ClassifyInput, classify_or_default};
use crate::domain::entities::PostRecord;
use crate::domain::posts::ensure_non_empty;
use crate::domain::types::{Category, PostId};

use super::service::PostService;
use super::types::PostServiceError;

impl PostService {
    pub async fn list_posts(&self) -> Result<Vec<PostRecord>, PostServiceError> {
        self.reader
            .list_posts()
            .await
            .map_err(PostServiceError::from)
    }

    pub async fn find_post(&self, id: &PostId) -> Result<Option<PostRecord>, PostServiceError> {
        self.reader
            .find_post(id)
            .await
            .map_err(PostServiceError::from)
    }

    pub async fn count_posts(&self) -> Result<usize, PostServiceError> {
        self.reader
            .count_posts()
            .await
            .map_err(PostServiceError::from)
    }

    /// Classify free text with the configured strategy, falling back to
    /// [`Category::Other`].
    pub async fn classify_summary(&self, summary: &str) -> Result<Category, PostServiceError> {
        ensure_non_empty(summary, "summary")?;
        let input = ClassifyInput::summary(summary);
        Ok(classify_or_default(self.classifier.as_ref(), &input).await)
    }
}
