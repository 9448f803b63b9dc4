/// Parser for Go's `-coverprofile` format.
///
/// Reference: https://go.dev/blog/cover
///
/// Format:
///   mode: set|count|atomic
///   <file>:<startLine>.<startCol>,<endLine>.<endCol> <numStatements> <count>
///
/// Each line describes a basic block with the number of statements in it and
/// how many times it was executed. Blocks are kept as-is; the same block
/// reported twice (e.g. from `-coverpkg` runs across several packages) is
/// merged into one.
use std::collections::HashMap;
use std::str::FromStr;

use super::Parser;
use crate::error::{CoverageError, Result};
use crate::model::{Block, FileCoverage, Snapshot};

/// Go coverage profile parser.
pub struct GocoverParser;

impl Parser for GocoverParser {
    fn parse(&self, input: &[u8]) -> Result<Snapshot> {
        parse(input)
    }
}

/// The `mode:` header of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Set,
    Count,
    Atomic,
}

impl FromStr for Mode {
    type Err = CoverageError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "set" => Ok(Mode::Set),
            "count" => Ok(Mode::Count),
            "atomic" => Ok(Mode::Atomic),
            _ => Err(CoverageError::Parse(format!(
                "Unknown cover mode: '{s}'. Supported: set, count, atomic"
            ))),
        }
    }
}

type Position = (u32, u32, u32, u32);

/// Blocks of one file, deduplicated by position.
struct FileBlocks {
    blocks: Vec<Block>,
    seen: HashMap<Position, usize>,
}

impl FileBlocks {
    fn new() -> Self {
        Self {
            blocks: Vec::new(),
            seen: HashMap::new(),
        }
    }

    fn push(&mut self, block: Block, mode: Mode) {
        let pos = (block.start_line, block.start_col, block.end_line, block.end_col);
        match self.seen.get(&pos).copied() {
            Some(idx) => {
                let existing = &mut self.blocks[idx];
                existing.hit_count = match mode {
                    Mode::Set => existing.hit_count.max(block.hit_count),
                    Mode::Count | Mode::Atomic => existing.hit_count.saturating_add(block.hit_count),
                };
            }
            None => {
                self.seen.insert(pos, self.blocks.len());
                self.blocks.push(block);
            }
        }
    }
}

/// Parse a Go coverage profile from raw bytes.
pub fn parse(input: &[u8]) -> Result<Snapshot> {
    let text = std::str::from_utf8(input)
        .map_err(|e| CoverageError::Parse(format!("Invalid UTF-8 in Go coverage data: {e}")))?;

    let mut mode = Mode::default();
    let mut file_order: Vec<String> = Vec::new();
    let mut file_blocks: HashMap<String, FileBlocks> = HashMap::new();
    let mut block_count = 0usize;

    for (idx, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(m) = line.strip_prefix("mode:") {
            mode = m.trim().parse()?;
            continue;
        }

        let (file, block) = parse_block_line(line).ok_or_else(|| {
            CoverageError::Parse(format!("line {}: malformed coverage block: {line}", idx + 1))
        })?;

        if !file_blocks.contains_key(file) {
            file_order.push(file.to_string());
            file_blocks.insert(file.to_string(), FileBlocks::new());
        }
        if let Some(blocks) = file_blocks.get_mut(file) {
            blocks.push(block, mode);
        }
        block_count += 1;
    }

    let files: Vec<FileCoverage> = file_order
        .into_iter()
        .filter_map(|path| {
            let blocks = file_blocks.remove(&path)?.blocks;
            Some(FileCoverage { path, blocks })
        })
        .collect();

    tracing::debug!(
        files = files.len(),
        blocks = block_count,
        ?mode,
        "Parsed Go coverage profile"
    );

    Ok(Snapshot::new(files))
}

/// Parse `line.col` into its two numbers.
fn parse_position(s: &str) -> Option<(u32, u32)> {
    let (line, col) = s.split_once('.')?;
    Some((line.parse().ok()?, col.parse().ok()?))
}

/// Parse a single block line, returning (file_path, Block).
///
/// Format: `<file>:<startLine>.<startCol>,<endLine>.<endCol> <numStmt> <count>`
fn parse_block_line(line: &str) -> Option<(&str, Block)> {
    // Anchor on the last ':' so paths containing colons survive.
    let (file, rest) = line.rsplit_once(':')?;
    if file.is_empty() {
        return None;
    }

    let mut parts = rest.split_whitespace();
    let range = parts.next()?;
    let statement_count: u64 = parts.next()?.parse().ok()?;
    let hit_count: u64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }

    let (start, end) = range.split_once(',')?;
    let (start_line, start_col) = parse_position(start)?;
    let (end_line, end_col) = parse_position(end)?;

    Some((
        file,
        Block {
            start_line,
            start_col,
            end_line,
            end_col,
            statement_count,
            hit_count,
        },
    ))
}
