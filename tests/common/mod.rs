#![allow(dead_code)]

use covdelta::model::Snapshot;
use covdelta::report::Report;

fn fixture(name: &str) -> Vec<u8> {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    std::fs::read(&path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}

/// Parse a coverage profile from `tests/fixtures`.
pub fn profile(name: &str) -> Snapshot {
    covdelta::parsers::gocover::parse(&fixture(name)).unwrap()
}

/// Parse a changed-files list from `tests/fixtures`.
pub fn changed_files(name: &str) -> Vec<String> {
    covdelta::changed::parse_changed_files(&fixture(name)).unwrap()
}

/// Build the report for the numbered fixture set, e.g. `"01"`.
pub fn report(set: &str, root: &str) -> Report {
    let old = profile(&format!("{set}-old-coverage.txt"));
    let new = profile(&format!("{set}-new-coverage.txt"));
    let changed = changed_files(&format!("{set}-changed-files.json"));
    Report::build(&old, &new, &changed, root)
}
