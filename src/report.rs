//! The comparison between two snapshots, restricted to a set of changed
//! files, ready to be formatted.

use indexmap::IndexSet;
use serde::Serialize;

use crate::classify::classify;
use crate::model::{CoverageStats, FileCoverage, Snapshot};
use crate::overall::{overall_percent, IgnorePatterns};
use crate::packages::{package_path, package_stats};

/// An old and a new coverage percentage. `None` means there was nothing to
/// measure on that side (missing file, zero statements).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Delta {
    pub old: Option<f64>,
    pub new: Option<f64>,
}

/// How a [`Delta`] moved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Change {
    /// No old measurement to compare against.
    Undefined,
    Unchanged,
    /// Positive difference in percentage points.
    Improved(f64),
    /// Negative difference in percentage points.
    Regressed(f64),
}

impl Delta {
    pub fn new(old: Option<f64>, new: Option<f64>) -> Self {
        Self { old, new }
    }

    /// Signed difference in percentage points; a missing new side counts as 0%.
    #[must_use]
    pub fn diff(&self) -> Option<f64> {
        self.old.map(|old| self.new.unwrap_or(0.0) - old)
    }

    #[must_use]
    pub fn change(&self) -> Change {
        match self.diff() {
            None => Change::Undefined,
            Some(d) if d > 0.0 => Change::Improved(d),
            Some(d) if d < 0.0 => Change::Regressed(d),
            Some(_) => Change::Unchanged,
        }
    }
}

/// Coverage movement of one impacted package.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageDelta {
    pub path: String,
    pub coverage: Delta,
}

/// Coverage movement of one changed non-test file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileDelta {
    pub path: String,
    pub coverage: Delta,
    /// Statement counts in the old snapshot (zero if the file was absent).
    pub old: CoverageStats,
    /// Statement counts in the new snapshot (zero if the file was removed).
    pub new: CoverageStats,
}

/// Everything a formatter needs to render a coverage comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub overall: Delta,
    pub packages: Vec<PackageDelta>,
    pub files: Vec<FileDelta>,
    pub unit_test_files: Vec<String>,
}

impl Report {
    /// Compare `old` and `new` for the given changed paths.
    ///
    /// `changed` may be repository-relative; each path is qualified with
    /// `root` before lookup. Never fails: an empty snapshot only leaves the
    /// overall delta undefined.
    pub fn build<S: AsRef<str>>(old: &Snapshot, new: &Snapshot, changed: &[S], root: &str) -> Self {
        let no_ignores = IgnorePatterns::none();
        let overall = Delta::new(
            overall_percent(old, &no_ignores).ok(),
            overall_percent(new, &no_ignores).ok(),
        );

        let mut impacted: IndexSet<String> = IndexSet::new();
        let mut files = Vec::new();
        let mut unit_test_files = Vec::new();

        for file in classify(changed, root, old, new) {
            if file.is_unit_test {
                unit_test_files.push(file.path);
                continue;
            }

            impacted.insert(package_path(root, &file.path));

            let old_stats = file.old.map(FileCoverage::stats).unwrap_or_default();
            let new_stats = file.new.map(FileCoverage::stats).unwrap_or_default();
            files.push(FileDelta {
                path: file.path,
                coverage: Delta::new(old_stats.percent(), new_stats.percent()),
                old: old_stats,
                new: new_stats,
            });
        }

        let old_packages = package_stats(old, root);
        let new_packages = package_stats(new, root);
        let packages = impacted
            .into_iter()
            .map(|path| {
                let coverage = Delta::new(
                    old_packages.get(&path).and_then(CoverageStats::percent),
                    new_packages.get(&path).and_then(CoverageStats::percent),
                );
                PackageDelta { path, coverage }
            })
            .collect();

        Report {
            overall,
            packages,
            files,
            unit_test_files,
        }
    }

    /// Whether any file (code or test) changed.
    #[must_use]
    pub fn has_changed_files(&self) -> bool {
        !self.files.is_empty() || !self.unit_test_files.is_empty()
    }

    /// Format using a specific formatter.
    #[must_use]
    pub fn format(&self, formatter: &dyn ReportFormatter) -> String {
        formatter.format(self)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Trait for formatting coverage reports.
pub trait ReportFormatter {
    /// Format the report to a string.
    fn format(&self, report: &Report) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Block;

    const ROOT: &str = "example.com/m";

    fn file(path: &str, blocks: Vec<Block>) -> FileCoverage {
        FileCoverage {
            path: path.to_string(),
            blocks,
        }
    }

    #[test]
    fn test_delta_change() {
        assert_eq!(Delta::new(None, Some(50.0)).change(), Change::Undefined);
        assert_eq!(Delta::new(None, None).change(), Change::Undefined);
        assert_eq!(Delta::new(Some(0.0), Some(0.0)).change(), Change::Unchanged);
        assert_eq!(Delta::new(Some(40.0), Some(50.0)).change(), Change::Improved(10.0));
        assert_eq!(Delta::new(Some(50.0), Some(40.0)).change(), Change::Regressed(-10.0));
        // A file that lost all statements fell to zero.
        assert_eq!(Delta::new(Some(25.0), None).change(), Change::Regressed(-25.0));
    }

    #[test]
    fn test_build_empty_inputs() {
        let empty = Snapshot::default();
        let report = Report::build::<&str>(&empty, &empty, &[], ROOT);
        assert_eq!(report.overall, Delta::new(None, None));
        assert!(report.packages.is_empty());
        assert!(report.files.is_empty());
        assert!(report.unit_test_files.is_empty());
        assert!(!report.has_changed_files());
    }

    #[test]
    fn test_build_splits_tests_from_code() {
        let old = Snapshot::new(vec![file("example.com/m/a.go", vec![Block::new(4, 1)])]);
        let new = Snapshot::new(vec![file(
            "example.com/m/a.go",
            vec![Block::new(4, 1), Block::new(4, 0)],
        )]);

        let report = Report::build(&old, &new, &["a_test.go", "a.go"], ROOT);

        assert_eq!(report.overall, Delta::new(Some(100.0), Some(50.0)));
        assert_eq!(report.unit_test_files, ["example.com/m/a_test.go"]);
        assert_eq!(report.files.len(), 1);

        let a = &report.files[0];
        assert_eq!(a.path, "example.com/m/a.go");
        assert_eq!(a.coverage, Delta::new(Some(100.0), Some(50.0)));
        assert_eq!(a.old, CoverageStats { total: 4, covered: 4 });
        assert_eq!(a.new, CoverageStats { total: 8, covered: 4 });
    }

    #[test]
    fn test_packages_only_from_code_files() {
        let old = Snapshot::new(vec![
            file("example.com/m/a.go", vec![Block::new(1, 1)]),
            file("example.com/m/sub/b.go", vec![Block::new(1, 1)]),
        ]);
        let new = old.clone();

        let report = Report::build(&old, &new, &["sub/b_test.go", "a.go"], ROOT);
        let packages: Vec<&str> = report.packages.iter().map(|p| p.path.as_str()).collect();
        assert_eq!(packages, ["example.com/m"]);
    }

    #[test]
    fn test_packages_in_encounter_order() {
        let empty = Snapshot::default();
        let report = Report::build(&empty, &empty, &["z/a.go", "a.go", "z/b.go"], ROOT);
        let packages: Vec<&str> = report.packages.iter().map(|p| p.path.as_str()).collect();
        assert_eq!(packages, ["example.com/m/z", "example.com/m"]);
    }

    #[test]
    fn test_new_package_is_undefined() {
        let old = Snapshot::new(vec![file("example.com/m/a.go", vec![Block::new(2, 1)])]);
        let new = Snapshot::new(vec![
            file("example.com/m/a.go", vec![Block::new(2, 1)]),
            file("example.com/m/fresh/f.go", vec![Block::new(3, 3)]),
        ]);

        let report = Report::build(&old, &new, &["fresh/f.go"], ROOT);
        assert_eq!(report.packages[0].coverage, Delta::new(None, Some(100.0)));
        assert_eq!(report.files[0].coverage.change(), Change::Undefined);
        assert_eq!(report.files[0].old, CoverageStats::default());
    }

    #[test]
    fn test_unmatched_file_is_undefined_on_both_sides() {
        let old = Snapshot::new(vec![file("example.com/m/a.go", vec![Block::new(2, 1)])]);
        let report = Report::build(&old, &old, &["ghost.go"], ROOT);
        assert_eq!(report.files[0].coverage, Delta::new(None, None));
    }

    #[test]
    fn test_to_json() {
        let old = Snapshot::new(vec![file("example.com/m/a.go", vec![Block::new(2, 1)])]);
        let report = Report::build(&old, &old, &["a.go"], ROOT);
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["overall"]["old"], 100.0);
        assert_eq!(json["files"][0]["path"], "example.com/m/a.go");
        assert_eq!(json["files"][0]["new"]["total"], 2);
    }
}
