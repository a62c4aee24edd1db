//! Category-specific notifications sent after a post is created.
//!
//! Product posts are announced on a chat webhook, team posts go out by email
//! and everything else is left alone. Channels that are not configured are
//! skipped; [`NotificationService::notify`] reports every result as a
//! [`NotificationOutcome`] and never fails the caller.

use std::sync::Arc;

use async_trait::async_trait;
use metrics::counter;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::{
    posts::{ELLIPSIS, char_prefix, truncate_for_display},
    types::Category,
};

/// Longest summary shown in a chat announcement.
pub const CHAT_SUMMARY_MAX_CHARS: usize = 200;
/// Summary characters quoted in an email subject.
pub const EMAIL_SUBJECT_PREFIX_CHARS: usize = 50;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationOutcome {
    pub success: bool,
    pub message: String,
}

impl NotificationOutcome {
    fn sent(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEmbed {
    pub title: String,
    pub description: String,
    pub url: String,
    pub color: u32,
}

/// Chat webhook body: a markdown line plus one rich embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub content: String,
    pub embeds: Vec<ChatEmbed>,
}

impl ChatMessage {
    pub fn announcement(category: Category, summary: &str, link: &str) -> Self {
        let summary = truncate_for_display(summary, CHAT_SUMMARY_MAX_CHARS);
        Self {
            content: format!("**{category} Update!**\nSummary: {summary}\nLink: <{link}>"),
            embeds: vec![ChatEmbed {
                title: format!("{category} Update"),
                description: summary,
                url: link.to_string(),
                color: embed_color(category),
            }],
        }
    }
}

pub fn embed_color(category: Category) -> u32 {
    match category {
        Category::Product => 3_447_003,
        Category::Team => 16_752_000,
        Category::Other => 8_355_711,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamEmail {
    pub summary: String,
    pub link: String,
    pub subject: String,
}

impl TeamEmail {
    pub fn new(summary: &str, link: &str) -> Self {
        Self {
            summary: summary.to_string(),
            link: link.to_string(),
            subject: format!(
                "Team Update: {}{ELLIPSIS}",
                char_prefix(summary, EMAIL_SUBJECT_PREFIX_CHARS)
            ),
        }
    }
}

#[async_trait]
pub trait ChatChannel: Send + Sync {
    async fn send_message(&self, message: &ChatMessage) -> Result<(), NotifyError>;
}

#[async_trait]
pub trait EmailChannel: Send + Sync {
    async fn send_email(&self, email: &TeamEmail) -> Result<(), NotifyError>;
}

#[derive(Clone, Default)]
pub struct NotificationService {
    chat: Option<Arc<dyn ChatChannel>>,
    email: Option<Arc<dyn EmailChannel>>,
}

impl NotificationService {
    pub fn new(chat: Option<Arc<dyn ChatChannel>>, email: Option<Arc<dyn EmailChannel>>) -> Self {
        Self { chat, email }
    }

    pub async fn notify(&self, category: Category, summary: &str, link: &str) -> NotificationOutcome {
        match category {
            Category::Product => self.announce_on_chat(category, summary, link).await,
            Category::Team => self.email_team(summary, link).await,
            Category::Other => {
                record("none", "noop");
                info!("post classified as Other; no notification sent");
                NotificationOutcome::sent("Summary classified as Other. No action taken.")
            }
        }
    }

    async fn announce_on_chat(
        &self,
        category: Category,
        summary: &str,
        link: &str,
    ) -> NotificationOutcome {
        let Some(chat) = self.chat.as_ref() else {
            record("chat", "skipped");
            warn!("chat webhook URL not configured; skipping chat notification");
            return NotificationOutcome::failed(
                "Chat webhook not configured. Notification skipped.",
            );
        };

        let message = ChatMessage::announcement(category, summary, link);
        match chat.send_message(&message).await {
            Ok(()) => {
                record("chat", "sent");
                info!("chat notification sent");
                NotificationOutcome::sent("Successfully sent to chat webhook.")
            }
            Err(err) => {
                record("chat", "failed");
                warn!(error = %err, "chat notification failed");
                NotificationOutcome::failed(format!("Failed to send to chat webhook: {err}"))
            }
        }
    }

    async fn email_team(&self, summary: &str, link: &str) -> NotificationOutcome {
        let Some(email) = self.email.as_ref() else {
            record("email", "skipped");
            warn!("email provider not fully configured; skipping email notification");
            return NotificationOutcome::failed(
                "Email configuration incomplete. Notification skipped.",
            );
        };

        let message = TeamEmail::new(summary, link);
        match email.send_email(&message).await {
            Ok(()) => {
                record("email", "sent");
                info!(subject = %message.subject, "email notification sent");
                NotificationOutcome::sent("Successfully sent email notification.")
            }
            Err(err) => {
                record("email", "failed");
                warn!(error = %err, "email notification failed");
                NotificationOutcome::failed(format!("Failed to send email: {err}"))
            }
        }
    }
}

fn record(channel: &'static str, outcome: &'static str) {
    counter!("quillpost_notifications_total", "channel" => channel, "outcome" => outcome)
        .increment(1);
}
