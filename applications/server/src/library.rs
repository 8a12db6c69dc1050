/// Music directory scanning
use crate::error::{Result, ServerError};
use std::io::ErrorKind;
use std::path::Path;

/// List files in `dir` whose extension matches, sorted by name.
///
/// Matching ignores ASCII case. Subdirectories and names that are not valid
/// UTF-8 are skipped.
pub async fn scan(dir: &Path, extension: &str) -> Result<Vec<String>> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ServerError::NotFound("Music directory not found".to_string()));
        }
        Err(e) => return Err(read_failure(dir, &e)),
    };

    let mut tracks = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| read_failure(dir, &e))?
    {
        let is_file = entry
            .file_type()
            .await
            .map(|t| t.is_file())
            .unwrap_or(false);
        if !is_file {
            continue;
        }

        let Ok(name) = entry.file_name().into_string() else {
            tracing::debug!(dir = %dir.display(), "Skipping non UTF-8 file name");
            continue;
        };

        if has_extension(&name, extension) {
            tracks.push(name);
        }
    }

    tracks.sort();
    tracing::debug!(dir = %dir.display(), count = tracks.len(), "Scanned music directory");
    Ok(tracks)
}

fn has_extension(name: &str, extension: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

fn read_failure(dir: &Path, error: &std::io::Error) -> ServerError {
    tracing::warn!(dir = %dir.display(), error = %error, "Failed to read music directory");
    ServerError::Library("Failed to read music directory".to_string())
}
