// Recursive file enumeration for the submission run.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Yield every regular file under `root`, depth first, in filesystem
/// order. Symlinks are not followed, so a symlinked file or directory is
/// skipped rather than traversed. Errors (missing root, unreadable
/// subtree) surface as `Err` items for the caller to propagate.
pub fn walk_files(root: &Path) -> impl Iterator<Item = Result<PathBuf, walkdir::Error>> {
    WalkDir::new(root).into_iter().filter_map(|entry| match entry {
        Ok(entry) if entry.file_type().is_file() => Some(Ok(entry.into_path())),
        Ok(_) => None,
        Err(err) => Some(Err(err)),
    })
}
