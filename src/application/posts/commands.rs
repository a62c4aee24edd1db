use metrics::counter;
use tracing::{info, warn};

use crate::application::classify::{ClassifyInput, classify_or_default};
use crate::application::relay::RelayPayload;
use crate::application::repos::CreatePostParams;
use crate::domain::entities::PostRecord;
use crate::domain::posts::{build_summary, ensure_valid_post};

use super::service::PostService;
use super::types::{CreatePostCommand, PostServiceError};

impl PostService {
    /// Create a post and fan it out to the relay and notification channels.
    ///
    /// Only validation and persistence failures are returned. Classification
    /// falls back to `Other`, and relay or notification failures are logged.
    pub async fn create_post(
        &self,
        command: CreatePostCommand,
    ) -> Result<PostRecord, PostServiceError> {
        ensure_valid_post(&command.title, &command.content)?;

        let summary = build_summary(&command.title, &command.content);
        let input = ClassifyInput {
            summary: summary.clone(),
            title: Some(command.title.clone()),
            description: None,
            content: Some(command.content.clone()),
        };
        let category = classify_or_default(self.classifier.as_ref(), &input).await;

        let params = CreatePostParams::new(command.title, command.content).with_category(category);
        let post = self.writer.create_post(params).await?;
        counter!("quillpost_posts_created_total").increment(1);
        info!(post_id = %post.id, category = %post.category, "post created");

        match &self.relay {
            Some(relay) => {
                let payload = RelayPayload::from_post(&post, &summary);
                if !relay.delivery.deliver_with_retry(&relay.url, &payload).await {
                    warn!(post_id = %post.id, "post was not delivered to the relay webhook");
                }
            }
            None => warn!("relay webhook URL not configured; skipping relay delivery"),
        }

        let link = self.links.post_url(&post.id);
        let outcome = self.notifier.notify(post.category, &summary, &link).await;
        info!(
            post_id = %post.id,
            success = outcome.success,
            message = %outcome.message,
            "notification finished"
        );

        Ok(post)
    }
}
