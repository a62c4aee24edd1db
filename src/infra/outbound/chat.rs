use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::application::notify::{ChatChannel, ChatMessage, NotifyError};

/// Posts announcements to a Discord-compatible webhook.
#[derive(Debug, Clone)]
pub struct ChatWebhookClient {
    client: Client,
    webhook_url: Url,
}

impl ChatWebhookClient {
    pub fn new(client: Client, webhook_url: Url) -> Self {
        Self {
            client,
            webhook_url,
        }
    }
}

#[async_trait]
impl ChatChannel for ChatWebhookClient {
    async fn send_message(&self, message: &ChatMessage) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(self.webhook_url.clone())
            .json(message)
            .send()
            .await
            .map_err(|err| NotifyError::Request(err.to_string()))?;

        if response.status().is_success() {
            return Ok(());
        }
        let status = response.status().as_u16();
        Err(NotifyError::Status {
            status,
            body: super::error_body(response).await,
        })
    }
}
