//! Sandbox path resolution for the blob root.
//!
//! Every path handed to the engine goes through [`resolve_sharding`] or
//! [`resolve_path`]; nothing else in the crate touches the filesystem with a
//! caller-influenced path.

use crate::error::BlobError;
use std::path::{Component, Path, PathBuf};

fn traversal(path: &Path, detail: &'static str) -> BlobError {
    BlobError::PathTraversalAttempt {
        message: path.display().to_string().into(),
        context: Some(detail.into()),
    }
}

/// Lexically collapses `.` and `..` segments relative to an empty base.
///
/// A `..` that would climb above the base is a traversal attempt, as is any
/// absolute or prefixed component.
fn collapse(path: &Path) -> Result<PathBuf, BlobError> {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::Normal(segment) => out.push(segment),
            Component::ParentDir if out.pop() => {},
            Component::ParentDir => {
                return Err(traversal(path, "Path attempted to escape sandbox via '..'"));
            },
            Component::RootDir | Component::Prefix(_) => {
                return Err(traversal(path, "Absolute paths are not allowed in sandbox"));
            },
        }
    }
    Ok(out)
}

/// Joins `path` under `root` and proves the result stays inside the sandbox.
///
/// Existing targets are canonicalized and checked directly. A target that
/// does not exist yet is checked through its first existing ancestor: that
/// ancestor is canonicalized, so a symlinked shard directory pointing outside
/// the root is caught before anything is written through it.
pub(crate) fn resolve_path(root: &Path, path: impl AsRef<Path>) -> Result<PathBuf, BlobError> {
    let path = path.as_ref();
    if path.is_absolute() {
        return Err(traversal(path, "Absolute paths are not allowed in sandbox"));
    }

    let joined = root.join(collapse(path)?);

    match joined.canonicalize() {
        Ok(canonical) if canonical.starts_with(root) => Ok(canonical),
        Ok(_) => Err(traversal(&joined, "Path attempted to escape sandbox via .. sequences")),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => check_unborn(root, &joined),
        Err(e) => Err(BlobError::Io { source: e, context: None }),
    }
}

/// Validates a target that is not on disk yet.
fn check_unborn(root: &Path, joined: &Path) -> Result<PathBuf, BlobError> {
    if !joined.starts_with(root) {
        return Err(traversal(joined, "Path is outside sandbox boundaries"));
    }

    let existing = joined
        .ancestors()
        .find(|a| a.exists())
        .ok_or_else(|| traversal(joined, "No valid parent directory found within sandbox"))?;

    let canonical = existing.canonicalize().map_err(|source| BlobError::Io {
        source,
        context: Some("Failed to verify parent directory".into()),
    })?;

    if canonical.starts_with(root) {
        Ok(joined.to_path_buf())
    } else {
        Err(traversal(&canonical, "Existing parent directory is a symlink outside sandbox"))
    }
}

/// Resolves a stored blob name to its sharded location under `root`.
///
/// The first four characters of the name pick two shard directories, so no
/// single directory ever holds every blob on the instance. Names shorter than
/// four characters land unsharded at the root.
pub(crate) fn resolve_sharding(root: &Path, name: &str) -> Result<PathBuf, BlobError> {
    if name.is_empty() {
        return Err(BlobError::BlobNotFound { message: "Empty blob name".into(), context: None });
    }

    let prefix: Vec<char> = name.chars().take(4).collect();
    let mut sharded = PathBuf::new();
    if prefix.len() == 4 {
        sharded.push(prefix[..2].iter().collect::<String>());
        sharded.push(prefix[2..].iter().collect::<String>());
    }
    sharded.push(name);

    resolve_path(root, sharded)
}
