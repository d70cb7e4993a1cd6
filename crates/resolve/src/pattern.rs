//! Wildcard rule compilation.
//!
//! A rule describes a whole candidate path relative to the repository root.
//! `*` matches any run of characters, including `/`, so `*.log` matches
//! both `debug.log` and `logs/debug.log`.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::error::ResolveError;

/// A compiled rule set.
///
/// Matches a path when any of its rules matches the whole path. An empty
/// rule set matches nothing.
#[derive(Debug, Clone)]
pub struct Matcher {
    set: GlobSet,
    rules: Vec<String>,
}

impl Matcher {
    /// Compiles a rule list. Surrounding whitespace is trimmed from each
    /// rule, and rules that clean down to nothing (`""`, `/`, `./`) are
    /// dropped.
    pub fn compile<S: AsRef<str>>(rules: &[S]) -> Result<Self, ResolveError> {
        let mut builder = GlobSetBuilder::new();
        let mut cleaned = Vec::with_capacity(rules.len());

        for rule in rules {
            let raw = rule.as_ref();
            let clean = clean_path(raw.trim());
            if clean.is_empty() {
                continue;
            }

            let glob = GlobBuilder::new(&clean)
                .literal_separator(false)
                .build()
                .map_err(|source| ResolveError::Pattern {
                    rule: raw.to_string(),
                    source,
                })?;
            builder.add(glob);
            cleaned.push(clean);
        }

        let set = builder.build().map_err(|source| ResolveError::Pattern {
            rule: cleaned.join(", "),
            source,
        })?;

        Ok(Self {
            set,
            rules: cleaned,
        })
    }

    /// A matcher with no rules.
    pub fn empty() -> Self {
        Self {
            set: GlobSet::empty(),
            rules: Vec::new(),
        }
    }

    /// Returns `true` if any rule matches the whole (cleaned) path.
    pub fn matches(&self, path: &str) -> bool {
        if self.rules.is_empty() {
            return false;
        }
        self.set.is_match(clean_path(path))
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The cleaned rules, in definition order.
    pub fn rules(&self) -> &[String] {
        &self.rules
    }
}

/// Normalizes a rule or candidate path: collapses repeated separators,
/// drops `.` segments and leading/trailing `/`. Whitespace is significant.
pub fn clean_path(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}
