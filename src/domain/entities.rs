//! Domain entities mirrored from persistent storage.

use quillpost_api_types::PostPayload;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::types::{Category, PostId};

/// A stored blog post. Field names double as the on-disk layout of the file
/// store: `id`, `title`, `content`, `date`, `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: PostId,
    pub title: String,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    #[serde(rename = "type", default)]
    pub category: Category,
}

impl From<PostRecord> for PostPayload {
    fn from(record: PostRecord) -> Self {
        PostPayload {
            id: record.id.to_string(),
            title: record.title,
            content: record.content,
            date: record.date,
            category: record.category,
        }
    }
}
