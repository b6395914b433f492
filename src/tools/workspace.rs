//! Working-directory confinement.
//!
//! Requested working directories are resolved against the workspace root
//! lexically: `.` and `..` segments are folded without touching the
//! filesystem, so a directory that does not exist yet is judged the same way
//! as one that does. Symlinks inside the workspace are not followed.

use std::path::{Component, Path, PathBuf};
use tracing::warn;

use crate::error::{ShellwardError, ShellwardResult};

/// Resolves `requested` against `root` and checks that it stays inside.
///
/// `None` or a blank string resolves to the root itself. Relative paths are
/// joined to the root; absolute paths are taken as they are. `root` must be
/// absolute and already normalized.
///
/// # Errors
///
/// - `PathTraversal` if a `..` segment steps out of the root (or is applied
///   while already outside it)
/// - `WorkspaceViolation` if the resolved path is not within the root
pub fn resolve_working_directory(root: &Path, requested: Option<&str>) -> ShellwardResult<PathBuf> {
    let requested = match requested.map(str::trim) {
        Some(dir) if !dir.is_empty() => dir,
        _ => return Ok(root.to_path_buf()),
    };

    let candidate = Path::new(requested);
    let joined = if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        root.join(candidate)
    };

    let mut resolved = PathBuf::new();
    let mut escaped = false;
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !resolved.starts_with(root) || resolved == root {
                    escaped = true;
                }
                resolved.pop();
            }
            other => resolved.push(other.as_os_str()),
        }
    }

    if escaped {
        warn!(
            path = %requested,
            workspace = %root.display(),
            "Security: directory traversal attempt rejected"
        );
        return Err(ShellwardError::path_traversal(requested));
    }

    if !resolved.starts_with(root) {
        warn!(
            path = %requested,
            resolved = %resolved.display(),
            workspace = %root.display(),
            "Security: working directory outside workspace rejected"
        );
        return Err(ShellwardError::workspace_violation(requested));
    }

    Ok(resolved)
}

/// Folds `.` and `..` segments out of `path` without consulting the
/// filesystem. `..` at the root stays at the root.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
