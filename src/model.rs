//! Uniform in-memory representation of a Go coverage profile. Parsers produce
//! a `Snapshot`; the aggregators and the report builder only ever read it.

use std::collections::HashMap;

/// Compute a coverage percentage, or `None` when there is nothing to cover.
#[must_use]
pub fn percent(covered: u64, total: u64) -> Option<f64> {
    if total == 0 {
        None
    } else {
        Some(covered as f64 / total as f64 * 100.0)
    }
}

/// A measured code region: some statements and how often they ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
    pub statement_count: u64,
    pub hit_count: u64,
}

impl Block {
    /// A block without source position, for callers that only care about counts.
    pub fn new(statement_count: u64, hit_count: u64) -> Self {
        Self {
            start_line: 0,
            start_col: 0,
            end_line: 0,
            end_col: 0,
            statement_count,
            hit_count,
        }
    }

    #[must_use]
    pub fn is_covered(&self) -> bool {
        self.hit_count > 0
    }
}

/// Statement totals for a file, a package or a whole snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct CoverageStats {
    pub total: u64,
    pub covered: u64,
}

impl CoverageStats {
    #[must_use]
    pub fn missed(&self) -> u64 {
        self.total.saturating_sub(self.covered)
    }

    #[must_use]
    pub fn percent(&self) -> Option<f64> {
        percent(self.covered, self.total)
    }

    pub fn add_block(&mut self, block: &Block) {
        self.total = self.total.saturating_add(block.statement_count);
        if block.is_covered() {
            self.covered = self.covered.saturating_add(block.statement_count);
        }
    }

    pub fn merge(&mut self, other: CoverageStats) {
        self.total = self.total.saturating_add(other.total);
        self.covered = self.covered.saturating_add(other.covered);
    }
}

/// Coverage data for a single source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileCoverage {
    pub path: String,
    pub blocks: Vec<Block>,
}

impl FileCoverage {
    pub fn new(path: String) -> Self {
        Self {
            path,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn stats(&self) -> CoverageStats {
        let mut stats = CoverageStats::default();
        for block in &self.blocks {
            stats.add_block(block);
        }
        stats
    }
}

/// One complete coverage run (the old or the new side of a comparison).
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub files: Vec<FileCoverage>,
}

impl Snapshot {
    pub fn new(files: Vec<FileCoverage>) -> Self {
        Self { files }
    }

    /// Look up a file by exact path.
    #[must_use]
    pub fn file(&self, path: &str) -> Option<&FileCoverage> {
        self.files.iter().find(|f| f.path == path)
    }

    /// Index the files by path for repeated lookups.
    #[must_use]
    pub fn index(&self) -> HashMap<&str, &FileCoverage> {
        self.files.iter().map(|f| (f.path.as_str(), f)).collect()
    }

    #[must_use]
    pub fn stats(&self) -> CoverageStats {
        let mut stats = CoverageStats::default();
        for file in &self.files {
            stats.merge(file.stats());
        }
        stats
    }
}
