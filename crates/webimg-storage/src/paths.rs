//! Path confinement helpers.

use crate::traits::{StorageError, StorageResult};
use std::path::{Component, Path, PathBuf};

/// Lexically resolve `.` and `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Return the absolute form of `candidate` if it lies strictly inside `root`.
///
/// Checks the lexical path first, then the canonical one when the candidate
/// exists so a symlink inside the root cannot point outside it.
pub(crate) fn confine(root: &Path, candidate: &Path) -> StorageResult<PathBuf> {
    let root_abs = normalize(&std::path::absolute(root)?);
    let candidate_abs = normalize(&std::path::absolute(candidate)?);

    if candidate_abs == root_abs || !candidate_abs.starts_with(&root_abs) {
        return Err(StorageError::InvalidKey(format!(
            "{} resolves outside storage directory",
            candidate.display()
        )));
    }

    if candidate_abs.exists() {
        let root_canonical = root_abs.canonicalize().map_err(|e| {
            StorageError::ConfigError(format!("Failed to canonicalize base path: {}", e))
        })?;
        let canonical = candidate_abs.canonicalize()?;
        if canonical == root_canonical || canonical.strip_prefix(&root_canonical).is_err() {
            return Err(StorageError::InvalidKey(format!(
                "{} resolves outside storage directory",
                candidate.display()
            )));
        }
    }

    Ok(candidate_abs)
}

/// Keep only URL-safe token characters.
pub(crate) fn sanitize_token(token: &str) -> String {
    token
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}
