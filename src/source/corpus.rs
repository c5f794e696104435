// Corpus listing: which files in the input folder a run will look at.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

/// Case-insensitive extension check.
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}

/// Regular files in `dir` accepted by `accepts`, sorted by path.
///
/// A missing or unreadable directory is fatal; files of other types are
/// skipped without error.
pub fn list_files(dir: &Path, accepts: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read input folder {}", dir.display()))?;

    let mut files = Vec::new();
    let mut ignored = 0usize;
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to list {}", dir.display()))?
            .path();
        if path.is_file() && accepts(&path) {
            files.push(path);
        } else {
            ignored += 1;
        }
    }
    files.sort();

    debug!(folder = %dir.display(), accepted = files.len(), ignored, "Listed corpus");
    Ok(files)
}
