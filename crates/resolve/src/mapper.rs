//! Local-to-remote path translation.

use std::path::{Component, Path, PathBuf};

use crate::error::ResolveError;

/// Maps files inside a checkout onto absolute remote paths.
///
/// The remote tree mirrors the checkout exactly: `<root>/src/a.txt` becomes
/// `/src/a.txt`, with `/` as the separator on every host.
#[derive(Debug, Clone)]
pub struct RemotePathMapper {
    root: PathBuf,
}

impl RemotePathMapper {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the remote path for `local`, which must live under the root.
    pub fn map(&self, local: &Path) -> Result<String, ResolveError> {
        relative_slash_path(&self.root, local).map(|rel| format!("/{rel}"))
    }
}

/// The path of `path` relative to `root`, joined with `/`.
///
/// Fails when `path` is not under `root`, is the root itself, or has a
/// component that is not valid UTF-8.
pub(crate) fn relative_slash_path(root: &Path, path: &Path) -> Result<String, ResolveError> {
    let outside = || ResolveError::OutsideRoot {
        path: path.to_path_buf(),
        root: root.to_path_buf(),
    };

    let rel = path.strip_prefix(root).map_err(|_| outside())?;
    let mut parts = Vec::new();
    for component in rel.components() {
        if let Component::Normal(part) = component {
            let part = part.to_str().ok_or_else(|| ResolveError::NonUtf8Path {
                path: path.to_path_buf(),
            })?;
            parts.push(part);
        }
    }

    if parts.is_empty() {
        Err(outside())
    } else {
        Ok(parts.join("/"))
    }
}
