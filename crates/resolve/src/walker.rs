//! Directory walking.
//!
//! Walks a tree depth-first with an explicit stack, visiting entries of each
//! directory in file-name order so the output is stable across runs.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::ResolveError;

/// Files collected by [`walk`], plus anything that had to be skipped.
#[derive(Debug, Default)]
pub struct Walk {
    pub files: Vec<PathBuf>,
    pub diagnostics: Vec<WalkDiagnostic>,
}

/// A subtree that could not be read and was left out of the walk.
#[derive(Debug)]
pub struct WalkDiagnostic {
    pub path: PathBuf,
    pub error: std::io::Error,
}

/// Collects every regular file under `root`.
///
/// A file root yields itself. Symlinks to files are kept; symlinked
/// directories are never entered. Failing to stat or read `root` is an error;
/// failing to read anything below it is recorded in
/// [`Walk::diagnostics`] and skipped.
pub fn walk(root: &Path) -> Result<Walk, ResolveError> {
    let io_err = |source| ResolveError::Io {
        path: root.to_path_buf(),
        source,
    };

    let mut walk = Walk::default();
    let meta = fs::symlink_metadata(root).map_err(io_err)?;

    if meta.file_type().is_symlink() {
        let target = fs::metadata(root).map_err(io_err)?;
        if target.is_file() {
            walk.files.push(root.to_path_buf());
        } else {
            debug!(path = %root.display(), "skipping symlink that is not a file");
        }
        return Ok(walk);
    }

    if meta.is_file() {
        walk.files.push(root.to_path_buf());
        return Ok(walk);
    }

    if !meta.is_dir() {
        return Ok(walk);
    }

    let mut stack = vec![sorted_entries(root).map_err(io_err)?.into_iter()];

    while let Some(entries) = stack.last_mut() {
        let Some(path) = entries.next() else {
            stack.pop();
            continue;
        };

        let meta = match fs::symlink_metadata(&path) {
            Ok(m) => m,
            Err(error) => {
                record(&mut walk, path, error);
                continue;
            }
        };

        if meta.file_type().is_symlink() {
            match fs::metadata(&path) {
                Ok(target) if target.is_file() => walk.files.push(path),
                Ok(_) => debug!(path = %path.display(), "not following directory symlink"),
                Err(error) => record(&mut walk, path, error),
            }
        } else if meta.is_dir() {
            match sorted_entries(&path) {
                Ok(children) => stack.push(children.into_iter()),
                Err(error) => record(&mut walk, path, error),
            }
        } else if meta.is_file() {
            walk.files.push(path);
        }
    }

    Ok(walk)
}

/// Lists a directory's entries sorted by file name.
pub(crate) fn sorted_entries(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(entries)
}

fn record(walk: &mut Walk, path: PathBuf, error: std::io::Error) {
    warn!(path = %path.display(), error = %error, "skipping unreadable path");
    walk.diagnostics.push(WalkDiagnostic { path, error });
}
