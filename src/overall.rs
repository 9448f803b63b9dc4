//! Whole-snapshot coverage percentage, with optional glob ignore patterns.

use glob::Pattern;

use crate::error::{CoverageError, Result};
use crate::model::{CoverageStats, Snapshot};

/// Compiled ignore patterns, matched against a file's base name.
///
/// Patterns that fail to compile are kept aside in [`IgnorePatterns::invalid`]
/// and never match anything.
#[derive(Debug, Clone, Default)]
pub struct IgnorePatterns {
    patterns: Vec<Pattern>,
    invalid: Vec<String>,
}

impl IgnorePatterns {
    pub fn new<S: AsRef<str>>(raw: &[S]) -> Self {
        let mut patterns = Vec::new();
        let mut invalid = Vec::new();
        for p in raw {
            let p = p.as_ref();
            match Pattern::new(p) {
                Ok(pattern) => patterns.push(pattern),
                Err(_) => invalid.push(p.to_string()),
            }
        }
        Self { patterns, invalid }
    }

    /// No patterns at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// Patterns that were skipped because they are not valid globs.
    #[must_use]
    pub fn invalid(&self) -> &[String] {
        &self.invalid
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Whether the base name of `path` matches any pattern.
    #[must_use]
    pub fn is_ignored(&self, path: &str) -> bool {
        let name = base_name(path);
        self.patterns.iter().any(|p| p.matches(name))
    }
}

/// The final path component, e.g. `min_heap.go` for `github.com/x/min_heap.go`.
#[must_use]
pub fn base_name(path: &str) -> &str {
    let path = path.trim_end_matches('/');
    match path.rsplit_once('/') {
        Some((_, name)) => name,
        None => path,
    }
}

/// Statement totals over every file that is not ignored.
#[must_use]
pub fn overall_stats(snapshot: &Snapshot, ignore: &IgnorePatterns) -> CoverageStats {
    let mut stats = CoverageStats::default();
    for file in &snapshot.files {
        if ignore.is_ignored(&file.path) {
            continue;
        }
        stats.merge(file.stats());
    }
    stats
}

/// Overall statement coverage in percent.
///
/// Fails with [`CoverageError::NoCoverageData`] when no statements remain
/// after filtering.
pub fn overall_percent(snapshot: &Snapshot, ignore: &IgnorePatterns) -> Result<f64> {
    overall_stats(snapshot, ignore)
        .percent()
        .ok_or(CoverageError::NoCoverageData)
}
