use async_trait::async_trait;
use reqwest::{
    Client,
    header::{ACCEPT, CONTENT_TYPE},
};
use url::Url;

use crate::application::relay::{RelayError, RelayResponse, WebhookTransport};

#[derive(Debug, Clone)]
pub struct HttpWebhookTransport {
    client: Client,
}

impl HttpWebhookTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl WebhookTransport for HttpWebhookTransport {
    async fn post_json(
        &self,
        url: &Url,
        body: &serde_json::Value,
    ) -> Result<RelayResponse, RelayError> {
        let response = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| RelayError::Transport(err.to_string()))?;

        let status = response.status().as_u16();
        let body = super::error_body(response).await;
        Ok(RelayResponse { status, body })
    }
}
