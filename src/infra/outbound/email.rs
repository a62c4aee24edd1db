use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use url::Url;

use crate::application::notify::{EmailChannel, NotifyError, TeamEmail};

pub const EMAILJS_SEND_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// The four values the provider needs before an email can be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailJsCredentials {
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
    pub recipient: String,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: TemplateParams<'a>,
}

#[derive(Debug, Serialize)]
struct TemplateParams<'a> {
    summary: &'a str,
    link: &'a str,
    to_email: &'a str,
    subject: &'a str,
}

/// Client for the EmailJS REST send endpoint.
#[derive(Debug, Clone)]
pub struct EmailJsClient {
    client: Client,
    endpoint: Url,
    credentials: EmailJsCredentials,
}

impl EmailJsClient {
    pub fn new(client: Client, endpoint: Url, credentials: EmailJsCredentials) -> Self {
        Self {
            client,
            endpoint,
            credentials,
        }
    }
}

#[async_trait]
impl EmailChannel for EmailJsClient {
    async fn send_email(&self, email: &TeamEmail) -> Result<(), NotifyError> {
        let request = SendRequest {
            service_id: &self.credentials.service_id,
            template_id: &self.credentials.template_id,
            user_id: &self.credentials.public_key,
            template_params: TemplateParams {
                summary: &email.summary,
                link: &email.link,
                to_email: &self.credentials.recipient,
                subject: &email.subject,
            },
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
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
