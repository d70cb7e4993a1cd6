//! Remote deletion set.
//!
//! The ignore list protects root entries from the wipe. The rule `*` is a
//! sentinel meaning "protect nothing" rather than a wildcard, and an empty
//! list behaves the same way, so the default is to delete everything.

use wingflow_resolve::{Matcher, ResolveError};

/// Sentinel ignore rule: nothing is protected.
pub const DELETE_EVERYTHING: &str = "*";

/// Compiled ignore rules for the remote wipe.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    protect: Matcher,
}

impl IgnoreRules {
    /// Compiles the configured ignore list. `*` entries are dropped.
    pub fn compile<S: AsRef<str>>(rules: &[S]) -> Result<Self, ResolveError> {
        let protecting: Vec<&str> = rules
            .iter()
            .map(|r| r.as_ref())
            .filter(|r| r.trim() != DELETE_EVERYTHING)
            .collect();

        Ok(Self {
            protect: Matcher::compile(&protecting)?,
        })
    }

    /// Entries of `listing` to delete, in listing order.
    ///
    /// `keep` names an entry that must survive regardless of the rules
    /// (the backup archive).
    pub fn deletion_set(&self, listing: &[String], keep: Option<&str>) -> Vec<String> {
        listing
            .iter()
            .filter(|name| keep != Some(name.as_str()))
            .filter(|name| !self.protect.matches(name))
            .cloned()
            .collect()
    }
}
