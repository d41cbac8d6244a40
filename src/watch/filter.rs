// src/watch/filter.rs

use std::fmt;

use anyhow::{Context, Result};
use globset::{Glob, GlobMatcher};

use crate::config::model::IgnoreRule;

/// Compiled ignore predicate for the file watcher.
///
/// Built once from `[server.watch].ignored` and held for the lifetime of the
/// watch session. Evaluation is a logical OR over the clauses: a path is
/// ignored as soon as *any* clause matches. Clauses are pure string tests,
/// so `is_ignored` is total over arbitrary input (empty strings included)
/// and safe to call from any thread.
#[derive(Clone)]
pub struct WatchFilter {
    clauses: Vec<Clause>,
}

/// One compiled clause of the filter.
#[derive(Clone)]
enum Clause {
    /// Marker substring anywhere in the path. Not segment-aware on purpose:
    /// `Contains("ace-builds")` also ignores `"ace-builds-backup.txt"`.
    Contains(String),
    /// Literal trailing text, e.g. a custom file extension like `".fs"`.
    Suffix(String),
    /// Glob against the root-relative path.
    Glob(GlobMatcher),
}

impl fmt::Debug for WatchFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchFilter")
            .field("clauses", &self.clauses.len())
            .finish()
    }
}

impl WatchFilter {
    /// Compile the configured ignore rules into a filter.
    ///
    /// Rule order is preserved, although it cannot affect the result of a
    /// pure OR. Fails only on glob rules that don't compile; `contains` and
    /// `suffix` markers are taken verbatim.
    pub fn from_rules(rules: &[IgnoreRule]) -> Result<Self> {
        let mut clauses = Vec::with_capacity(rules.len());
        for (idx, rule) in rules.iter().enumerate() {
            let clause = match rule {
                IgnoreRule::Contains { contains } => Clause::Contains(contains.clone()),
                IgnoreRule::Suffix { suffix } => Clause::Suffix(suffix.clone()),
                IgnoreRule::Glob { glob } => {
                    let matcher = Glob::new(glob)
                        .with_context(|| format!("ignore rule #{idx}: invalid glob {glob:?}"))?
                        .compile_matcher();
                    Clause::Glob(matcher)
                }
            };
            clauses.push(clause);
        }
        Ok(Self { clauses })
    }

    /// A filter that ignores nothing.
    pub fn empty() -> Self {
        Self {
            clauses: Vec::new(),
        }
    }

    /// Number of compiled clauses.
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// True if no clauses are configured (every path is watched).
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Decide whether change notifications for `path` should be suppressed.
    ///
    /// `true` means "suppress", `false` means "propagate normally".
    pub fn is_ignored(&self, path: &str) -> bool {
        self.clauses.iter().any(|clause| clause.matches(path))
    }
}

impl Clause {
    fn matches(&self, path: &str) -> bool {
        match self {
            Clause::Contains(marker) => path.contains(marker.as_str()),
            Clause::Suffix(marker) => path.ends_with(marker.as_str()),
            Clause::Glob(matcher) => matcher.is_match(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vendored_editor_filter() -> WatchFilter {
        WatchFilter::from_rules(&[
            IgnoreRule::Contains {
                contains: "ace-builds".to_string(),
            },
            IgnoreRule::Suffix {
                suffix: ".fs".to_string(),
            },
        ])
        .unwrap()
    }

    #[test]
    fn plain_source_paths_are_watched() {
        let filter = vendored_editor_filter();
        assert!(!filter.is_ignored("/project/src/main.ts"));
        assert!(!filter.is_ignored("src/index.html"));
        assert!(!filter.is_ignored("/project/rules/sample.fsx"));
    }

    #[test]
    fn marker_substring_matches_anywhere() {
        let filter = vendored_editor_filter();
        assert!(filter.is_ignored("/project/node_modules/ace-builds/src/ace.js"));
        assert!(filter.is_ignored("ace-builds"));
        // Containment is not segment-aware; this is documented behavior.
        assert!(filter.is_ignored("/project/ace-builds-backup.txt"));
    }

    #[test]
    fn suffix_matches_only_at_end() {
        let filter = vendored_editor_filter();
        assert!(filter.is_ignored("/project/rules/sample.fs"));
        assert!(filter.is_ignored(".fs"));
        assert!(!filter.is_ignored("/project/rules/sample.fs.bak"));
    }

    #[test]
    fn empty_path_is_watched() {
        let filter = vendored_editor_filter();
        assert!(!filter.is_ignored(""));
    }

    #[test]
    fn evaluation_is_pure() {
        let filter = vendored_editor_filter();
        let path = "/project/node_modules/ace-builds/src/ace.js";
        assert_eq!(filter.is_ignored(path), filter.is_ignored(path));
    }

    #[test]
    fn unusual_characters_do_not_panic() {
        let filter = vendored_editor_filter();
        assert!(!filter.is_ignored("weird\u{0}\u{7f}☃ path"));
        assert!(filter.is_ignored("snow☃ace-builds☃man"));
    }

    #[test]
    fn glob_clause_matches_relative_paths() {
        let filter = WatchFilter::from_rules(&[IgnoreRule::Glob {
            glob: "vendor/**".to_string(),
        }])
        .unwrap();
        assert!(filter.is_ignored("vendor/ace/ace.js"));
        assert!(!filter.is_ignored("src/vendor.rs"));
    }

    #[test]
    fn empty_filter_watches_everything() {
        let filter = WatchFilter::empty();
        assert!(filter.is_empty());
        assert!(!filter.is_ignored("/anything/at/all"));
        assert!(!filter.is_ignored(""));
    }

    #[test]
    fn bad_glob_reports_rule_index() {
        let err = WatchFilter::from_rules(&[IgnoreRule::Glob {
            glob: "vendor/{**".to_string(),
        }])
        .unwrap_err();
        assert!(format!("{err:#}").contains("rule #0"));
    }
}
