//! Outbound HTTP adapters for the relay, chat, email and model endpoints.

mod chat;
mod email;
mod model;
mod relay;

pub use chat::ChatWebhookClient;
pub use email::{EMAILJS_SEND_ENDPOINT, EmailJsClient, EmailJsCredentials};
pub use model::{DEFAULT_MODEL, ModelClassifier};
pub use relay::HttpWebhookTransport;

use std::time::Duration;

use reqwest::Client;

use crate::infra::error::InfraError;

pub fn user_agent() -> &'static str {
    concat!("quillpost/", env!("CARGO_PKG_VERSION"))
}

/// Shared client for every outbound call; `timeout` bounds each request.
pub fn build_http_client(timeout: Duration) -> Result<Client, InfraError> {
    Client::builder()
        .user_agent(user_agent())
        .timeout(timeout)
        .build()
        .map_err(|err| InfraError::http_client(err.to_string()))
}

/// Read a failed response body for diagnostics, tolerating read errors.
async fn error_body(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|err| format!("<unreadable body: {err}>"))
}
