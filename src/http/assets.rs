//! Landing page resolution.

use std::path::{Path, PathBuf};

/// First candidate that exists as a regular file, in list order.
pub async fn resolve_index(candidates: &[PathBuf]) -> Option<&Path> {
    for candidate in candidates {
        match tokio::fs::metadata(candidate).await {
            Ok(meta) if meta.is_file() => return Some(candidate.as_path()),
            _ => continue,
        }
    }
    None
}
