//! Changed-file lists, as a JSON array of repository-relative paths.

use crate::error::Result;

/// Parse a JSON array of changed paths, e.g. `["main.go", "pkg/util.go"]`.
///
/// Order is preserved; empty entries are dropped. Paths are returned as
/// written, qualification with the module root happens in the classifier.
pub fn parse_changed_files(input: &[u8]) -> Result<Vec<String>> {
    let paths: Vec<String> = serde_json::from_slice(input)?;
    Ok(paths
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect())
}
