//! Post storage backed by an in-memory list, optionally mirrored to a JSON file.

mod file;
mod read;
mod write;

use std::path::{Path, PathBuf};

use tokio::sync::Mutex;
use tracing::info;

use crate::domain::{entities::PostRecord, posts::welcome_post};
use crate::infra::error::InfraError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Backing {
    Memory,
    File(PathBuf),
}

/// Owns every post. All reads and writes go through one async lock, so
/// concurrent appends are applied one at a time.
#[derive(Debug)]
pub struct PostStore {
    posts: Mutex<Vec<PostRecord>>,
    backing: Backing,
}

impl PostStore {
    /// Store that lives only as long as the process.
    pub fn in_memory(seed_welcome_post: bool) -> Self {
        Self::from_records(Vec::new(), Backing::Memory, seed_welcome_post)
    }

    /// Load posts from `path`, treating a missing file as an empty store.
    /// Every append rewrites the whole file.
    pub async fn open(path: impl AsRef<Path>, seed_welcome_post: bool) -> Result<Self, InfraError> {
        let path = path.as_ref().to_path_buf();
        let records = file::load(&path).await?;
        info!(path = %path.display(), posts = records.len(), "post file loaded");
        Ok(Self::from_records(
            records,
            Backing::File(path),
            seed_welcome_post,
        ))
    }

    fn from_records(mut records: Vec<PostRecord>, backing: Backing, seed: bool) -> Self {
        if seed && records.is_empty() {
            records.push(welcome_post());
        }
        Self {
            posts: Mutex::new(records),
            backing,
        }
    }
}

/// Newest first; posts sharing a timestamp keep reverse insertion order.
fn newest_first(records: &[PostRecord]) -> Vec<PostRecord> {
    let mut sorted: Vec<PostRecord> = records.iter().rev().cloned().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}
