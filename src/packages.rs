//! Per-package aggregation. A package is the directory of a file, qualified
//! with the module root so it reads like a Go import path.

use std::collections::HashMap;

use crate::model::{CoverageStats, Snapshot};

/// Qualify `path` with the module `root`.
///
/// Paths that already live under the root are returned unchanged, so fully
/// qualified profile paths and repository-relative changed paths end up in
/// the same namespace.
#[must_use]
pub fn qualify_path(root: &str, path: &str) -> String {
    let root = root.trim_end_matches('/');
    let path = path.strip_prefix("./").unwrap_or(path);

    if root.is_empty() {
        return path.to_string();
    }
    if path == root || path.starts_with(&format!("{root}/")) {
        return path.to_string();
    }

    let path = path.trim_start_matches('/');
    if path.is_empty() {
        root.to_string()
    } else {
        format!("{root}/{path}")
    }
}

/// Package path of a file: its qualified path without the file name.
///
/// A file at the top of an unrooted tree belongs to package `"."`.
#[must_use]
pub fn package_path(root: &str, file_path: &str) -> String {
    let qualified = qualify_path(root, file_path);
    match qualified.rsplit_once('/') {
        Some((dir, _)) if !dir.is_empty() => dir.to_string(),
        _ => ".".to_string(),
    }
}

/// Statement totals for every package in the snapshot. No ignore patterns
/// apply here.
#[must_use]
pub fn package_stats(snapshot: &Snapshot, root: &str) -> HashMap<String, CoverageStats> {
    let mut packages: HashMap<String, CoverageStats> = HashMap::new();
    for file in &snapshot.files {
        packages
            .entry(package_path(root, &file.path))
            .or_default()
            .merge(file.stats());
    }
    packages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, FileCoverage};

    #[test]
    fn test_qualify_relative_path() {
        assert_eq!(
            qualify_path("github.com/fgrosse/prioqueue", "min_heap.go"),
            "github.com/fgrosse/prioqueue/min_heap.go"
        );
        assert_eq!(
            qualify_path("github.com/fgrosse/prioqueue", "foo/bar/baz.go"),
            "github.com/fgrosse/prioqueue/foo/bar/baz.go"
        );
    }

    #[test]
    fn test_qualify_trailing_and_leading_separators() {
        assert_eq!(
            qualify_path("chariot/go/apps/training-v2/", "internal/api/h.go"),
            "chariot/go/apps/training-v2/internal/api/h.go"
        );
        assert_eq!(qualify_path("example.com/m", "./a.go"), "example.com/m/a.go");
        assert_eq!(qualify_path("example.com/m", "/a.go"), "example.com/m/a.go");
    }

    #[test]
    fn test_qualify_already_qualified() {
        assert_eq!(
            qualify_path("example.com/m", "example.com/m/pkg/a.go"),
            "example.com/m/pkg/a.go"
        );
        // A sibling module that merely shares a prefix is not under the root.
        assert_eq!(
            qualify_path("example.com/m", "example.com/mod/a.go"),
            "example.com/m/example.com/mod/a.go"
        );
    }

    #[test]
    fn test_qualify_empty_root() {
        assert_eq!(qualify_path("", "pkg/a.go"), "pkg/a.go");
        assert_eq!(qualify_path("/", "pkg/a.go"), "pkg/a.go");
    }

    #[test]
    fn test_package_path() {
        assert_eq!(
            package_path("github.com/fgrosse/prioqueue", "min_heap.go"),
            "github.com/fgrosse/prioqueue"
        );
        assert_eq!(
            package_path("github.com/fgrosse/prioqueue", "foo/bar/baz.go"),
            "github.com/fgrosse/prioqueue/foo/bar"
        );
        assert_eq!(package_path("", "main.go"), ".");
        assert_eq!(package_path("", "cmd/tool/main.go"), "cmd/tool");
    }

    #[test]
    fn test_package_stats_sums_files() {
        let snapshot = Snapshot::new(vec![
            FileCoverage {
                path: "example.com/m/a.go".to_string(),
                blocks: vec![Block::new(4, 1), Block::new(1, 0)],
            },
            FileCoverage {
                path: "example.com/m/b.go".to_string(),
                blocks: vec![Block::new(5, 0)],
            },
            FileCoverage {
                path: "example.com/m/sub/c.go".to_string(),
                blocks: vec![Block::new(2, 3)],
            },
        ]);

        let packages = package_stats(&snapshot, "example.com/m");
        assert_eq!(packages.len(), 2);
        assert_eq!(
            packages["example.com/m"],
            CoverageStats { total: 10, covered: 4 }
        );
        assert_eq!(
            packages["example.com/m/sub"],
            CoverageStats { total: 2, covered: 2 }
        );
    }

    #[test]
    fn test_package_stats_qualifies_relative_profile_paths() {
        let snapshot = Snapshot::new(vec![FileCoverage {
            path: "pkg/a.go".to_string(),
            blocks: vec![Block::new(1, 1)],
        }]);
        let packages = package_stats(&snapshot, "example.com/m");
        assert!(packages.contains_key("example.com/m/pkg"));
    }
}
