//! Resolution set building.
//!
//! Precedence is decided here, not in the matcher:
//!
//! - each top-level entry of the checkout is rejected if it matches an
//!   exclude rule, otherwise accepted if it matches an include rule;
//! - accepted entries are walked, and every walked file is checked against
//!   the exclude rules again using its checkout-relative path;
//! - anything inside a `.git` directory is rejected at both levels;
//! - a symlinked file is kept only if its target resolves inside the
//!   checkout, outside `.git`.
//!
//! Paths that are not valid UTF-8 have no remote name; they are skipped and
//! reported as diagnostics.

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::ResolveError;
use crate::mapper::relative_slash_path;
use crate::pattern::{Matcher, clean_path};
use crate::walker::{WalkDiagnostic, sorted_entries, walk};

/// Version-control metadata directory that is never deployed.
pub const VCS_METADATA_DIR: &str = ".git";

/// The ordered, deduplicated files chosen for a deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionSet {
    root: PathBuf,
    files: Vec<PathBuf>,
}

impl ResolutionSet {
    /// The checkout root every file lives under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.files.iter()
    }
}

/// Output of [`resolve`]: the set plus any subtrees skipped while walking.
#[derive(Debug)]
pub struct Resolution {
    pub set: ResolutionSet,
    pub diagnostics: Vec<WalkDiagnostic>,
}

/// Resolves the files to deploy from `clone_root`.
///
/// Fails with [`ResolveError::NoMatch`] when nothing survives the rules.
pub fn resolve<S: AsRef<str>>(
    clone_root: &Path,
    include: &[S],
    exclude: &[S],
) -> Result<Resolution, ResolveError> {
    let include_rules: Vec<String> = include.iter().map(|r| r.as_ref().to_string()).collect();
    let mut exclude_rules: Vec<String> = exclude.iter().map(|r| r.as_ref().to_string()).collect();
    if !exclude_rules
        .iter()
        .any(|r| clean_path(r.trim()) == VCS_METADATA_DIR)
    {
        exclude_rules.push(VCS_METADATA_DIR.to_string());
    }

    let include_matcher = Matcher::compile(&include_rules)?;
    let exclude_matcher = Matcher::compile(&exclude_rules)?;

    let entries = sorted_entries(clone_root).map_err(|source| ResolveError::Io {
        path: clone_root.to_path_buf(),
        source,
    })?;

    let canonical_root = clone_root.canonicalize().map_err(|source| ResolveError::Io {
        path: clone_root.to_path_buf(),
        source,
    })?;

    let mut candidates = Vec::new();
    let mut diagnostics = Vec::new();
    for entry in entries {
        let name = match relative_slash_path(clone_root, &entry) {
            Ok(name) => name,
            Err(e) => {
                skip(&mut diagnostics, entry, invalid_data(e));
                continue;
            }
        };

        if name == VCS_METADATA_DIR || exclude_matcher.matches(&name) {
            debug!(entry = %name, "excluded top-level entry");
        } else if include_matcher.matches(&name) {
            candidates.push(entry);
        }
    }

    let mut files = Vec::new();
    let mut seen = HashSet::new();

    for candidate in candidates {
        let walked = match walk(&candidate) {
            Ok(w) => w,
            Err(ResolveError::Io { path, source }) => {
                diagnostics.push(WalkDiagnostic {
                    path,
                    error: source,
                });
                continue;
            }
            Err(e) => return Err(e),
        };
        diagnostics.extend(walked.diagnostics);

        for file in walked.files {
            let rel = match relative_slash_path(clone_root, &file) {
                Ok(rel) => rel,
                Err(e) => {
                    skip(&mut diagnostics, file, invalid_data(e));
                    continue;
                }
            };
            if is_vcs_path(&rel) || exclude_matcher.matches(&rel) {
                debug!(file = %rel, "excluded file");
                continue;
            }
            if let Err(error) = check_link_target(&canonical_root, &file) {
                skip(&mut diagnostics, file, error);
                continue;
            }
            if seen.insert(file.clone()) {
                files.push(file);
            }
        }
    }

    if files.is_empty() {
        return Err(ResolveError::NoMatch {
            include: include_rules,
            exclude: exclude_rules,
        });
    }

    info!(
        files = files.len(),
        skipped = diagnostics.len(),
        "resolved deploy files"
    );

    Ok(Resolution {
        set: ResolutionSet {
            root: clone_root.to_path_buf(),
            files,
        },
        diagnostics,
    })
}

fn is_vcs_path(rel: &str) -> bool {
    rel.split('/').any(|c| c == VCS_METADATA_DIR)
}

/// Accepts `file` unless it is a symlink resolving outside `canonical_root`
/// or into version-control metadata.
fn check_link_target(canonical_root: &Path, file: &Path) -> std::io::Result<()> {
    if !fs::symlink_metadata(file)?.file_type().is_symlink() {
        return Ok(());
    }

    let target = fs::canonicalize(file)?;
    let inside = target
        .strip_prefix(canonical_root)
        .ok()
        .and_then(|rel| rel.to_str())
        .is_some_and(|rel| !is_vcs_path(&rel.replace('\\', "/")));

    if inside {
        Ok(())
    } else {
        Err(std::io::Error::new(
            ErrorKind::PermissionDenied,
            format!("symlink target {} is outside the checkout", target.display()),
        ))
    }
}

fn invalid_data(error: ResolveError) -> std::io::Error {
    std::io::Error::new(ErrorKind::InvalidData, error)
}

fn skip(diagnostics: &mut Vec<WalkDiagnostic>, path: PathBuf, error: std::io::Error) {
    warn!(path = %path.display(), error = %error, "skipping path");
    diagnostics.push(WalkDiagnostic { path, error });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_checkout() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();

        fs::create_dir_all(root.join(".git").join("objects")).unwrap();
        fs::write(root.join(".git").join("config"), b"[core]").unwrap();
        fs::write(root.join(".git").join("objects").join("ab"), b"obj").unwrap();

        fs::create_dir_all(root.join("src").join("nested")).unwrap();
        fs::write(root.join("src").join("a.txt"), b"a").unwrap();
        fs::write(root.join("src").join("b.txt"), b"b").unwrap();
        fs::write(root.join("src").join("debug.log"), b"log").unwrap();
        fs::write(root.join("src").join("nested").join("c.txt"), b"c").unwrap();

        fs::create_dir_all(root.join("docs")).unwrap();
        fs::write(root.join("docs").join("guide.md"), b"guide").unwrap();
        fs::write(root.join("README.md"), b"readme").unwrap();

        dir
    }

    fn relative(set: &ResolutionSet) -> Vec<String> {
        set.iter()
            .map(|f| relative_slash_path(set.root(), f).unwrap())
            .collect()
    }

    #[test]
    fn star_resolves_everything_but_git() {
        let dir = create_checkout();
        let none: [&str; 0] = [];
        let res = resolve(dir.path(), &["*"], &none).unwrap();

        assert_eq!(
            relative(&res.set),
            [
                "README.md",
                "docs/guide.md",
                "src/a.txt",
                "src/b.txt",
                "src/debug.log",
                "src/nested/c.txt",
            ]
        );
        assert!(res.set.iter().all(|f| f.is_file()));
    }

    #[test]
    fn include_selects_top_level_roots() {
        let dir = create_checkout();
        let none: [&str; 0] = [];
        let res = resolve(dir.path(), &["src"], &none).unwrap();
        assert_eq!(
            relative(&res.set),
            ["src/a.txt", "src/b.txt", "src/debug.log", "src/nested/c.txt"]
        );
    }

    #[test]
    fn exclude_vetoes_top_level_include() {
        let dir = create_checkout();
        let res = resolve(dir.path(), &["*"], &["docs", "src"]).unwrap();
        assert_eq!(relative(&res.set), ["README.md"]);
    }

    #[test]
    fn exclude_is_rechecked_per_file() {
        let dir = create_checkout();
        let res = resolve(dir.path(), &["src"], &["*.log", "src/nested/*"]).unwrap();
        assert_eq!(relative(&res.set), ["src/a.txt", "src/b.txt"]);
    }

    #[test]
    fn git_cannot_be_included() {
        let dir = create_checkout();
        let none: [&str; 0] = [];
        let err = resolve(dir.path(), &[".git"], &none).unwrap_err();
        assert!(matches!(err, ResolveError::NoMatch { .. }));
    }

    #[test]
    fn nested_git_directories_are_skipped() {
        let dir = create_checkout();
        let nested = dir.path().join("src").join("vendored").join(".git");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("HEAD"), b"ref").unwrap();

        let none: [&str; 0] = [];
        let res = resolve(dir.path(), &["src"], &none).unwrap();
        assert!(relative(&res.set).iter().all(|f| !f.contains(".git")));
    }

    #[test]
    fn git_exclusion_is_forced_into_rules() {
        let dir = TempDir::new().unwrap();
        let none: [&str; 0] = [];
        let err = resolve(dir.path(), &["missing/"], &none).unwrap_err();
        match err {
            ResolveError::NoMatch { include, exclude } => {
                assert_eq!(include, ["missing/"]);
                assert_eq!(exclude, [".git"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_include_rules_do_not_duplicate_files() {
        let dir = create_checkout();
        let none: [&str; 0] = [];
        let res = resolve(dir.path(), &["docs", "doc*", "*"], &none).unwrap();
        let rel = relative(&res.set);
        let unique: HashSet<_> = rel.iter().collect();
        assert_eq!(unique.len(), rel.len());
    }

    #[test]
    fn resolve_is_idempotent() {
        let dir = create_checkout();
        let first = resolve(dir.path(), &["*"], &["*.md"]).unwrap().set;
        let second = resolve(dir.path(), &["*"], &["*.md"]).unwrap().set;
        assert_eq!(first, second);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_files_are_skipped_with_diagnostics() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        let data = dir.path().join("data");
        fs::create_dir_all(&data).unwrap();
        fs::write(data.join(OsStr::from_bytes(b"\xff")), b"one").unwrap();
        fs::write(data.join(OsStr::from_bytes(b"\xfe")), b"two").unwrap();
        fs::write(data.join("ok.txt"), b"ok").unwrap();

        let none: [&str; 0] = [];
        let res = resolve(dir.path(), &["*"], &none).unwrap();

        assert_eq!(relative(&res.set), ["data/ok.txt"]);
        assert_eq!(res.diagnostics.len(), 2);
        assert!(
            res.diagnostics
                .iter()
                .all(|d| d.error.kind() == ErrorKind::InvalidData)
        );
    }

    #[cfg(unix)]
    #[test]
    fn symlink_leaving_the_checkout_is_skipped() {
        let outside = TempDir::new().unwrap();
        let secret = outside.path().join("id_rsa");
        fs::write(&secret, b"private").unwrap();

        let dir = create_checkout();
        std::os::unix::fs::symlink(&secret, dir.path().join("src").join("id_rsa")).unwrap();
        std::os::unix::fs::symlink(
            dir.path().join("src").join("a.txt"),
            dir.path().join("src").join("alias.txt"),
        )
        .unwrap();
        std::os::unix::fs::symlink(
            dir.path().join(".git").join("config"),
            dir.path().join("src").join("git-config"),
        )
        .unwrap();

        let none: [&str; 0] = [];
        let res = resolve(dir.path(), &["src"], &none).unwrap();
        let rel = relative(&res.set);

        assert!(rel.contains(&"src/alias.txt".to_string()));
        assert!(!rel.contains(&"src/id_rsa".to_string()));
        assert!(!rel.contains(&"src/git-config".to_string()));
        let skipped: Vec<_> = res.diagnostics.iter().map(|d| d.path.clone()).collect();
        assert!(skipped.contains(&dir.path().join("src").join("id_rsa")));
        assert!(skipped.contains(&dir.path().join("src").join("git-config")));
    }

    #[cfg(unix)]
    #[test]
    fn names_with_surrounding_spaces_match_literally() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("keep"), b"plain").unwrap();
        fs::write(dir.path().join("keep "), b"spaced").unwrap();

        let res = resolve(dir.path(), &["*"], &["keep"]).unwrap();
        assert_eq!(relative(&res.set), ["keep "]);
    }

    #[test]
    fn invalid_rule_fails_before_walking() {
        let dir = create_checkout();
        let none: [&str; 0] = [];
        let err = resolve(dir.path(), &["[broken"], &none).unwrap_err();
        assert!(matches!(err, ResolveError::Pattern { .. }));
    }
}
