//! Markdown rendering of a [`Report`], meant to be posted as a pull-request
//! comment. Output is a pure function of the report and formatter settings.

use std::fmt::Write;

use crate::report::{Change, Delta, Report, ReportFormatter};

/// Default drop, in percentage points, past which a regression is critical.
pub const DEFAULT_CRITICAL_DROP: f64 = 10.0;

/// Critical markers never repeat more than this many times.
const MAX_CRITICAL_MARKERS: usize = 5;

const GOOD_GAIN: f64 = 10.0;
const GREAT_GAIN: f64 = 20.0;

const FOOTNOTE: &str = "_Please note that the \"Total\", \"Covered\", and \"Missed\" counts above refer to ***code statements*** instead of lines of code. The value in brackets refers to the test coverage of that file in the old version of the code._";

/// Markdown formatter.
#[derive(Debug, Clone)]
pub struct MarkdownFormatter {
    critical_drop: f64,
    trim_prefix: Option<String>,
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self {
            critical_drop: DEFAULT_CRITICAL_DROP,
            trim_prefix: None,
        }
    }
}

impl MarkdownFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the critical regression threshold. Non-positive or
    /// non-finite values fall back to [`DEFAULT_CRITICAL_DROP`].
    #[must_use]
    pub fn with_critical_drop(mut self, drop: f64) -> Self {
        self.critical_drop = if drop.is_finite() && drop > 0.0 {
            drop
        } else {
            DEFAULT_CRITICAL_DROP
        };
        self
    }

    /// Strip `prefix` from package and file paths in the tables.
    #[must_use]
    pub fn with_trim_prefix(mut self, prefix: Option<String>) -> Self {
        self.trim_prefix = prefix.filter(|p| !p.is_empty());
        self
    }

    fn display_path<'a>(&self, path: &'a str) -> &'a str {
        let Some(prefix) = self.trim_prefix.as_deref() else {
            return path;
        };
        let prefix = prefix.trim_end_matches('/');
        match path.strip_prefix(prefix).and_then(|rest| rest.strip_prefix('/')) {
            Some(rest) if !rest.is_empty() => rest,
            _ => path,
        }
    }

    /// Severity marker for a change.
    #[must_use]
    pub fn marker(&self, change: Change) -> String {
        match change {
            Change::Undefined | Change::Unchanged => String::new(),
            Change::Improved(d) if d > GREAT_GAIN => ":star2:".to_string(),
            Change::Improved(d) if d > GOOD_GAIN => ":tada:".to_string(),
            Change::Improved(_) => ":thumbsup:".to_string(),
            Change::Regressed(d) if -d > self.critical_drop => {
                let steps = (-d / self.critical_drop) as usize;
                ":skull: ".repeat(steps.min(MAX_CRITICAL_MARKERS))
            }
            Change::Regressed(_) => ":thumbsdown:".to_string(),
        }
    }

    fn write_title(&self, md: &mut String, overall: &Delta) {
        let verb = match (overall.old, overall.new) {
            (Some(old), Some(new)) if new > old => "increase",
            (Some(old), Some(new)) if new < old => "decrease",
            (None, Some(_)) => "increase",
            (Some(_), None) => "decrease",
            _ => "not change",
        };
        writeln!(md, "### Merging this branch will **{verb}** overall coverage").unwrap();
        writeln!(
            md,
            "#### Overall Project Coverage: {} :arrow_right: {}",
            format_overall(overall.old),
            format_overall(overall.new)
        )
        .unwrap();
    }

    fn write_packages(&self, md: &mut String, report: &Report) {
        if report.packages.is_empty() {
            return;
        }
        md.push_str("| Impacted Packages | Coverage Δ | :robot: |\n");
        md.push_str("|-------------------|------------|---------|\n");
        for pkg in &report.packages {
            writeln!(
                md,
                "| {} | {} | {} |",
                self.display_path(&pkg.path),
                format_coverage(&pkg.coverage),
                self.marker(pkg.coverage.change())
            )
            .unwrap();
        }
    }

    fn write_details(&self, md: &mut String, report: &Report) {
        md.push_str("\n---\n\n<details>\n\n<summary>Coverage by file</summary>\n\n");

        if !report.files.is_empty() {
            md.push_str("### Changed files (no unit tests)\n\n");
            md.push_str("| Changed File | Coverage Δ | Total | Covered | Missed | :robot: |\n");
            md.push_str("|--------------|------------|-------|---------|--------|---------|\n");
            for f in &report.files {
                // Without an old measurement there is nothing to diff against.
                let old = match f.coverage.change() {
                    Change::Undefined => f.new,
                    _ => f.old,
                };
                writeln!(
                    md,
                    "| {} | {} | {} | {} | {} | {} |",
                    self.display_path(&f.path),
                    format_coverage(&f.coverage),
                    count_with_delta(old.total, f.new.total),
                    count_with_delta(old.covered, f.new.covered),
                    count_with_delta(old.missed(), f.new.missed()),
                    self.marker(f.coverage.change())
                )
                .unwrap();
            }
            md.push('\n');
        }

        if !report.unit_test_files.is_empty() {
            md.push_str("### Changed unit test files\n\n");
            for path in &report.unit_test_files {
                writeln!(md, "- {}", self.display_path(path)).unwrap();
            }
            md.push('\n');
        }

        if !report.files.is_empty() {
            md.push_str(FOOTNOTE);
            md.push_str("\n\n");
        }
        md.push_str("</details>");
    }
}

impl ReportFormatter for MarkdownFormatter {
    fn format(&self, report: &Report) -> String {
        let mut md = String::new();
        self.write_title(&mut md, &report.overall);
        self.write_packages(&mut md, report);
        if report.has_changed_files() {
            self.write_details(&mut md, report);
        }
        md
    }
}

/// Pretty-printed JSON formatter.
pub struct JsonFormatter;

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &Report) -> String {
        // Report holds only strings, numbers and options.
        report.to_json().unwrap_or_default()
    }
}

fn format_overall(pct: Option<f64>) -> String {
    match pct {
        Some(p) => format!("{p:.2}%"),
        None => "ø".to_string(),
    }
}

/// `new% (delta)` where delta is `ø`, `±0.00%` or a bold signed difference.
fn format_coverage(delta: &Delta) -> String {
    let new = delta.new.unwrap_or(0.0);
    let diff = match delta.change() {
        Change::Undefined => "ø".to_string(),
        Change::Unchanged => "±0.00%".to_string(),
        Change::Improved(d) | Change::Regressed(d) => format!("**{d:+.2}%**"),
    };
    format!("{new:.2}% ({diff})")
}

/// A statement count with its signed change against the old snapshot.
fn count_with_delta(old: u64, new: u64) -> String {
    match new.cmp(&old) {
        std::cmp::Ordering::Greater => format!("{new} (+{})", new - old),
        std::cmp::Ordering::Less => format!("{new} (-{})", old - new),
        std::cmp::Ordering::Equal => new.to_string(),
    }
}
