use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::application::repos::RepoError;
use crate::domain::entities::PostRecord;
use crate::infra::error::InfraError;

pub(super) async fn load(path: &Path) -> Result<Vec<PostRecord>, InfraError> {
    let raw = match tokio::fs::read(path).await {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err.into()),
    };
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    serde_json::from_slice(&raw).map_err(|err| InfraError::Io(err.into()))
}

/// Replace the file with `records`. The list is written to a sibling
/// temporary file first and renamed into place.
pub(super) async fn persist(path: &Path, records: &[PostRecord]) -> Result<(), RepoError> {
    let encoded = serde_json::to_vec_pretty(records).map_err(RepoError::from_persistence)?;

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(RepoError::from_persistence)?;
    }

    let staging = staging_path(path);
    tokio::fs::write(&staging, encoded)
        .await
        .map_err(RepoError::from_persistence)?;
    if let Err(err) = tokio::fs::rename(&staging, path).await {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(RepoError::from_persistence(err));
    }
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("posts.json"));
    name.push(".tmp");
    path.with_file_name(name)
}
