//! Command handler functions for the covdelta CLI.
//!
//! Each `cmd_*` function returns its output as a `String`, making them easy
//! to test without capturing stdout.

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;

use crate::changed::parse_changed_files;
use crate::markdown::{JsonFormatter, MarkdownFormatter};
use crate::model::Snapshot;
use crate::overall::{overall_percent, overall_stats, IgnorePatterns};
use crate::parsers::gocover::GocoverParser;
use crate::parsers::Parser;
use crate::report::{Report, ReportFormatter};

/// Output style for the `report` command.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum Style {
    #[default]
    Markdown,
    Json,
}

/// Read and parse a Go coverage profile.
pub fn load_profile(path: &Path) -> Result<Snapshot> {
    let content =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    GocoverParser
        .parse(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Read and parse a JSON list of changed files.
pub fn load_changed_files(path: &Path) -> Result<Vec<String>> {
    let content =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    parse_changed_files(&content)
        .with_context(|| format!("Failed to parse changed files from {}", path.display()))
}

/// Compare two profiles for the changed files and render the report.
pub fn cmd_report(
    old: &Path,
    new: &Path,
    changed_files: &Path,
    root: &str,
    style: Style,
    formatter: &MarkdownFormatter,
) -> Result<String> {
    let old_cov = load_profile(old)?;
    let new_cov = load_profile(new)?;
    let changed = load_changed_files(changed_files)?;

    let report = Report::build(&old_cov, &new_cov, &changed, root);

    if report.overall.old.is_none() {
        tracing::warn!(profile = %old.display(), "No statements in old coverage profile");
    }
    if report.overall.new.is_none() {
        tracing::warn!(profile = %new.display(), "No statements in new coverage profile");
    }
    tracing::info!(
        changed = changed.len(),
        packages = report.packages.len(),
        files = report.files.len(),
        unit_tests = report.unit_test_files.len(),
        "Built coverage report"
    );

    let output = match style {
        Style::Markdown => report.format(formatter),
        Style::Json => report.format(&JsonFormatter),
    };
    Ok(output)
}

/// Overall coverage of a single profile, ignoring files whose base name
/// matches any of `ignore`.
pub fn cmd_overall(profile: &Path, ignore: &[String]) -> Result<String> {
    let snapshot = load_profile(profile)?;

    let patterns = IgnorePatterns::new(ignore);
    for invalid in patterns.invalid() {
        tracing::warn!(pattern = %invalid, "Skipping invalid ignore pattern");
    }
    if !patterns.is_empty() {
        tracing::info!(patterns = ?ignore, "Ignoring files from overall coverage");
    }

    let pct = overall_percent(&snapshot, &patterns)
        .with_context(|| format!("Cannot compute coverage of {}", profile.display()))?;

    let stats = overall_stats(&snapshot, &patterns);
    tracing::info!(
        total = stats.total,
        covered = stats.covered,
        percent = %format!("{pct:.2}"),
        "Computed overall coverage"
    );

    Ok(format!("{pct:.2}\n"))
}
