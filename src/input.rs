// src/input.rs
// =============================================================================
// Reads the list of links to check: a UTF-8 text file, one URL per line.
//
// Lines are returned untouched (blank ones included) so the dispatcher can
// report real line numbers. Trimming and skipping happen there.
// =============================================================================

use std::path::Path;

use crate::error::CheckError;

pub async fn read_entries(path: &Path) -> Result<Vec<String>, CheckError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CheckError::InputUnreadable {
            path: path.to_path_buf(),
            source,
        })?;

    // lines() handles both \n and \r\n and ignores a trailing newline
    Ok(content.lines().map(str::to_string).collect())
}
