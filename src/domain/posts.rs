//! Post invariants and the text helpers used to derive summaries.

use time::macros::datetime;

use crate::domain::{
    entities::PostRecord,
    error::DomainError,
    types::{Category, PostId},
};

/// Number of content characters included in a post summary.
pub const SUMMARY_PREVIEW_CHARS: usize = 150;
pub const ELLIPSIS: &str = "...";

/// Reject blank values for required post fields.
pub fn ensure_non_empty(value: &str, field: &'static str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} must not be empty")));
    }
    Ok(())
}

pub fn ensure_valid_post(title: &str, content: &str) -> Result<(), DomainError> {
    ensure_non_empty(title, "title")?;
    ensure_non_empty(content, "content")
}

/// Leading `max_chars` characters of `text`, never splitting a code point.
pub fn char_prefix(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

/// Shorten `text` to at most `max_chars` characters, ending with an ellipsis
/// when anything was cut.
pub fn truncate_for_display(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    format!("{}{ELLIPSIS}", char_prefix(text, keep))
}

pub fn content_preview(content: &str) -> String {
    let preview = char_prefix(content, SUMMARY_PREVIEW_CHARS);
    if preview.len() < content.len() {
        format!("{preview}{ELLIPSIS}")
    } else {
        preview.to_string()
    }
}

/// Summary used for classification, relay payloads and notifications.
pub fn build_summary(title: &str, content: &str) -> String {
    format!("New post: {title}. {}", content_preview(content))
}

/// Post inserted into an empty store on first start.
pub fn welcome_post() -> PostRecord {
    PostRecord {
        id: PostId::from("1"),
        title: "Welcome to My Blog".to_string(),
        content: "This is the first post on my blog. Stay tuned for more content!".to_string(),
        date: datetime!(2024-03-13 00:00 UTC),
        category: Category::Other,
    }
}
