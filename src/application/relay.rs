//! Bounded-retry delivery of new posts to an external webhook relay.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use metrics::counter;
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{info, warn};
use url::Url;

use crate::domain::entities::PostRecord;

/// Responses from the relay's edge proxy contain this marker when the
/// origin could not be reached.
pub const EDGE_ERROR_MARKER: &str = "CloudFront";

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("payload could not be encoded: {0}")]
    Encode(String),
}

/// Outcome of a single POST to the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayResponse {
    pub status: u16,
    pub body: String,
}

impl RelayResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait WebhookTransport: Send + Sync {
    async fn post_json(
        &self,
        url: &Url,
        body: &serde_json::Value,
    ) -> Result<RelayResponse, RelayError>;
}

/// Body sent to the relay for each created post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelayPayload {
    pub title: String,
    pub content: String,
    pub summary: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl RelayPayload {
    pub fn from_post(post: &PostRecord, summary: &str) -> Self {
        Self {
            title: post.title.clone(),
            content: post.content.clone(),
            summary: summary.to_string(),
            timestamp: post.date,
        }
    }
}

pub const DEFAULT_MAX_ATTEMPTS: NonZeroU32 = match NonZeroU32::new(3) {
    Some(attempts) => attempts,
    None => panic!("attempt budget must be non-zero"),
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: NonZeroU32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Wait after the failed attempt numbered `attempt` (1-based):
    /// `base_delay * 2^attempt`, capped at `max_delay`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }
}

#[derive(Clone)]
pub struct RelayDelivery {
    transport: Arc<dyn WebhookTransport>,
    policy: RetryPolicy,
}

impl RelayDelivery {
    pub fn new(transport: Arc<dyn WebhookTransport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// POST `payload` to `url` until it succeeds or the attempt budget runs
    /// out. Returns whether any attempt got a 2xx response.
    pub async fn deliver_with_retry<T: Serialize + Sync>(&self, url: &Url, payload: &T) -> bool {
        let body = match serde_json::to_value(payload) {
            Ok(body) => body,
            Err(err) => {
                warn!(error = %RelayError::Encode(err.to_string()), "relay payload rejected");
                return false;
            }
        };

        let max_attempts = self.policy.max_attempts.get();
        for attempt in 1..=max_attempts {
            counter!("quillpost_relay_attempts_total").increment(1);

            match self.transport.post_json(url, &body).await {
                Ok(response) if response.is_success() => {
                    info!(attempt, status = response.status, "relay delivery succeeded");
                    return true;
                }
                Ok(response) => {
                    let edge_error = response.body.contains(EDGE_ERROR_MARKER);
                    warn!(
                        attempt,
                        max_attempts,
                        status = response.status,
                        edge_error,
                        "relay delivery rejected"
                    );
                }
                Err(err) => {
                    warn!(attempt, max_attempts, error = %err, "relay delivery failed");
                }
            }

            if attempt < max_attempts {
                tokio::time::sleep(self.policy.backoff(attempt)).await;
            }
        }

        counter!("quillpost_relay_failures_total").increment(1);
        warn!(max_attempts, "relay delivery gave up");
        false
    }
}
