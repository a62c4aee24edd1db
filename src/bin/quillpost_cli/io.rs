#![deny(clippy::all, clippy::pedantic)]

use std::fs;
use std::path::PathBuf;

use crate::client::CliError;

/// Inline value or file contents, with the file taking precedence.
pub fn read_value(
    val: Option<String>,
    file: Option<PathBuf>,
    name: &str,
) -> Result<String, CliError> {
    if let Some(path) = file {
        let data = fs::read_to_string(&path).map_err(|source| CliError::InputFile {
            path: path.display().to_string(),
            source,
        })?;
        Ok(data)
    } else if let Some(v) = val {
        Ok(v)
    } else {
        Err(CliError::InvalidInput(format!("{name} is required")))
    }
}
