//! Classification of changed files: unit tests vs. code, and where each file
//! exists across the two snapshots.

use indexmap::IndexSet;

use crate::model::{FileCoverage, Snapshot};
use crate::packages::qualify_path;

/// File-name suffix that marks a Go unit-test file.
pub const TEST_FILE_SUFFIX: &str = "_test.go";

/// Whether `path` names a unit-test file. Purely syntactic.
#[must_use]
pub fn is_unit_test(path: &str) -> bool {
    path.ends_with(TEST_FILE_SUFFIX)
}

/// A changed file with its coverage on either side, if it existed there.
#[derive(Debug, Clone)]
pub struct ChangedFile<'a> {
    pub path: String,
    pub is_unit_test: bool,
    pub old: Option<&'a FileCoverage>,
    pub new: Option<&'a FileCoverage>,
}

/// Qualify, dedupe and look up each changed path in both snapshots.
///
/// Order of first occurrence in `paths` is preserved.
pub fn classify<'a, S: AsRef<str>>(
    paths: &[S],
    root: &str,
    old: &'a Snapshot,
    new: &'a Snapshot,
) -> Vec<ChangedFile<'a>> {
    let old_files = old.index();
    let new_files = new.index();

    let qualified: IndexSet<String> = paths
        .iter()
        .map(|p| qualify_path(root, p.as_ref()))
        .collect();

    qualified
        .into_iter()
        .map(|path| ChangedFile {
            is_unit_test: is_unit_test(&path),
            old: old_files.get(path.as_str()).copied(),
            new: new_files.get(path.as_str()).copied(),
            path,
        })
        .collect()
}
