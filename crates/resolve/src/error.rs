//! Resolution error types.

use std::path::PathBuf;

/// Errors produced while resolving the deploy file set.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("invalid rule {rule:?}: {source}")]
    Pattern {
        rule: String,
        #[source]
        source: globset::Error,
    },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "no files could be resolved to be included/excluded \
         (include: {include:?}, exclude: {exclude:?}); \
         make sure the git.files rules name existing top-level paths"
    )]
    NoMatch {
        include: Vec<String>,
        exclude: Vec<String>,
    },

    #[error("{} is not inside {}", path.display(), root.display())]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error("{} is not valid UTF-8 and has no remote name", path.display())]
    NonUtf8Path { path: PathBuf },
}
