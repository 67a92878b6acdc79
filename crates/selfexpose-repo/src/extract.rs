//! Declaration extraction from the head of a source file.
//!
//! A declaration is a marker token (`@self-expose` by default) followed by a JSON object inside a
//! comment. The object may span several comment lines; comment leaders are stripped from
//! continuation lines before parsing. Malformed objects get two recovery attempts:
//!
//! 1. closing braces are appended when the object is unbalanced, first to the whole candidate
//!    and then to ever shorter line prefixes, so trailing comment lines that are not JSON
//!    (encoding cookies, license lines) fall away;
//! 2. the raw comment text, not cut at a block closer, is re-sliced from the first `{` to the
//!    last `}`. This recovers objects whose string values contain `-->` or `*/`.

use camino::Utf8Path;
use selfexpose_domain::model::{DeclarationGap, humanize};
use selfexpose_domain::policy::ScanFilter;
use selfexpose_types::{
    DEFAULT_VERSION, ExposureKind, ExposureRecord, Needs, Provides, RepoPath,
};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Leaders of single-line comments, longest first.
const LINE_LEADERS: &[&str] = &["//", "--", "#", ";", "*"];
/// Openers of block comments and docstrings; their bodies rarely repeat a leader per line.
const BLOCK_OPENERS: &[&str] = &["<!--", "/*", "\"\"\"", "'''"];
const BLOCK_CLOSERS: &[&str] = &["-->", "*/", "\"\"\"", "'''"];

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("read {path}: {source}")]
    Read {
        path: RepoPath,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not valid UTF-8")]
    NotUtf8 { path: RepoPath },

    #[error("line {line}: no '{{' after the declaration marker")]
    NoObject { line: u32 },

    #[error("line {line}: invalid JSON declaration: {message}")]
    InvalidJson { line: u32, message: String },

    #[error("line {line}: declaration is not a JSON object")]
    NotObject { line: u32 },
}

impl ExtractError {
    /// 1-based marker line, when the error concerns one declaration.
    pub fn line(&self) -> Option<u32> {
        match self {
            ExtractError::NoObject { line }
            | ExtractError::InvalidJson { line, .. }
            | ExtractError::NotObject { line } => Some(*line),
            ExtractError::Read { .. } | ExtractError::NotUtf8 { .. } => None,
        }
    }

    /// True when the file itself could not be read.
    pub fn is_read_failure(&self) -> bool {
        matches!(self, ExtractError::Read { .. } | ExtractError::NotUtf8 { .. })
    }
}

/// Everything extracted from one file.
#[derive(Debug, Default)]
pub struct FileExtraction {
    /// Records in the order their markers appear.
    pub records: Vec<ExposureRecord>,
    /// Per-declaration failures; never abort the file.
    pub errors: Vec<ExtractError>,
    /// Number of marker occurrences that started a declaration.
    pub markers_found: usize,
    /// Parsed declarations that left fields to defaults.
    pub gaps: Vec<DeclarationGap>,
}

/// Read `root/source` and extract its declarations.
pub fn extract_file(
    root: &Utf8Path,
    source: &RepoPath,
    filter: &ScanFilter,
) -> Result<FileExtraction, ExtractError> {
    let abs = root.join(source.as_str());
    let bytes = std::fs::read(&abs).map_err(|e| ExtractError::Read {
        path: source.clone(),
        source: e,
    })?;
    let text = String::from_utf8(bytes).map_err(|_| ExtractError::NotUtf8 {
        path: source.clone(),
    })?;
    Ok(extract_from_text(&text, source, filter))
}

/// Extract every declaration whose marker sits in the first `max_scan_lines` lines of `text`.
pub fn extract_from_text(text: &str, source: &RepoPath, filter: &ScanFilter) -> FileExtraction {
    let lines: Vec<&str> = text
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .collect();
    let mut out = FileExtraction::default();

    // (line index, byte offset in that line) before which markers were consumed by a declaration.
    let mut consumed: Option<(usize, usize)> = None;

    for (idx, line) in lines.iter().enumerate().take(filter.max_scan_lines) {
        for (offset, marker_len) in marker_positions(line, &filter.markers) {
            if let Some((last_line, end)) = consumed
                && (idx < last_line || (idx == last_line && offset < end))
            {
                continue;
            }
            out.markers_found += 1;
            let line_no = (idx + 1) as u32;
            let after = offset + marker_len;

            let block = read_declaration(&lines, idx, after, filter.max_declaration_len);
            consumed = Some(block.consumed_through);
            let Some(candidate) = block.candidate else {
                out.errors.push(ExtractError::NoObject { line: line_no });
                continue;
            };
            match parse_candidate(&candidate, block.raw.as_deref(), line_no) {
                Ok(map) => {
                    let record = record_from_object(&map, source);
                    if let Some(gap) = declaration_gap(&map, &record, line_no) {
                        out.gaps.push(gap);
                    }
                    out.records.push(record);
                }
                Err(err) => out.errors.push(err),
            }
        }
    }

    out
}

/// Non-overlapping marker occurrences in `line`, as `(offset, marker length)`, in line order.
fn marker_positions(line: &str, markers: &[String]) -> Vec<(usize, usize)> {
    let mut found: Vec<(usize, usize)> = markers
        .iter()
        .filter(|m| !m.is_empty())
        .flat_map(|m| line.match_indices(m.as_str()).map(|(i, s)| (i, s.len())))
        .collect();
    found.sort();
    let mut out: Vec<(usize, usize)> = Vec::with_capacity(found.len());
    for (offset, len) in found {
        match out.last() {
            Some(&(prev, prev_len)) if offset < prev + prev_len => {}
            _ => out.push((offset, len)),
        }
    }
    out
}

struct DeclarationBlock {
    /// Text from the first `{`, ending at the balancing `}` when one was found.
    candidate: Option<String>,
    /// Same lines from the first `{`, cut neither at a block closer nor at the balancing `}`.
    raw: Option<String>,
    consumed_through: (usize, usize),
}

/// Brace depth tracker that ignores braces inside JSON string literals.
#[derive(Debug, Default)]
struct BraceScanner {
    depth: usize,
    opened: bool,
    in_string: bool,
    escaped: bool,
}

impl BraceScanner {
    /// Feed the next chunk. Returns the index just past the `}` that balances the first `{`.
    fn feed(&mut self, chunk: &str) -> Option<usize> {
        for (i, b) in chunk.bytes().enumerate() {
            if self.in_string {
                if self.escaped {
                    self.escaped = false;
                } else if b == b'\\' {
                    self.escaped = true;
                } else if b == b'"' {
                    self.in_string = false;
                }
                continue;
            }
            match b {
                b'"' if self.opened => self.in_string = true,
                b'{' => {
                    self.depth += 1;
                    self.opened = true;
                }
                b'}' if self.opened && self.depth > 0 => {
                    self.depth -= 1;
                    if self.depth == 0 {
                        return Some(i + 1);
                    }
                }
                _ => {}
            }
        }
        None
    }
}

/// Collect the comment block following a marker and cut it at the balancing brace.
///
/// The block ends at the balancing brace, at `max_len` bytes, or at the end of the comment:
/// for line comments the first line without a leader, for block comments the closer.
fn read_declaration(
    lines: &[&str],
    marker_line: usize,
    after: usize,
    max_len: usize,
) -> DeclarationBlock {
    let first = lines[marker_line];
    let head = first.trim_start();
    let line_mode =
        !BLOCK_OPENERS.iter().any(|o| head.starts_with(o)) && strip_line_leader(first).is_some();

    let mut block = String::new();
    let mut raw = String::new();
    let mut scanner = BraceScanner::default();
    let mut last_line = marker_line;

    for (idx, line) in lines.iter().enumerate().skip(marker_line) {
        let (piece, line_start) = if idx == marker_line {
            (first.get(after..).unwrap_or(""), after)
        } else if line_mode {
            match strip_line_leader(line) {
                Some(rest) => (rest, 0),
                None => break,
            }
        } else {
            (strip_line_leader(line).unwrap_or(line), 0)
        };

        if idx != marker_line {
            raw.push('\n');
        }
        let raw_room = max_len.saturating_sub(raw.len());
        raw.push_str(truncate_at_char_boundary(piece, raw_room));

        let (piece, closes) = if line_mode {
            (piece, false)
        } else {
            match find_closer(piece) {
                Some(cut) => (&piece[..cut], true),
                None => (piece, false),
            }
        };

        if idx != marker_line {
            block.push('\n');
        }
        let start = block.len();
        let room = max_len.saturating_sub(start);
        let piece = truncate_at_char_boundary(piece, room);
        block.push_str(piece);
        last_line = idx;

        if let Some(end) = scanner.feed(&block[start..]) {
            block.truncate(start + end);
            let within = if idx == marker_line { line_start + end } else { usize::MAX };
            return finish(block, raw, (idx, within));
        }
        if closes || block.len() >= max_len {
            break;
        }
    }

    finish(block, raw, (last_line, usize::MAX))
}

fn finish(block: String, raw: String, consumed_through: (usize, usize)) -> DeclarationBlock {
    DeclarationBlock {
        candidate: block.find('{').map(|open| block[open..].to_string()),
        raw: raw.find('{').map(|open| raw[open..].to_string()),
        consumed_through,
    }
}

fn strip_line_leader(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    LINE_LEADERS
        .iter()
        .find_map(|leader| trimmed.strip_prefix(leader))
}

fn find_closer(piece: &str) -> Option<usize> {
    BLOCK_CLOSERS.iter().filter_map(|c| piece.find(c)).min()
}

fn truncate_at_char_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Parse a candidate object, trying the two recovery strategies in order.
fn parse_candidate(
    candidate: &str,
    raw: Option<&str>,
    line: u32,
) -> Result<Map<String, Value>, ExtractError> {
    let first_error = match serde_json::from_str::<Value>(candidate) {
        Ok(value) => return into_object(value, line),
        Err(err) => err.to_string(),
    };

    // (a) append the missing closing braces to the candidate, then to each shorter line prefix
    let prefix_ends = std::iter::once(candidate.len())
        .chain(candidate.rmatch_indices('\n').map(|(at, _)| at));
    for end in prefix_ends {
        if let Some(value) = close_unbalanced(candidate[..end].trim_end()) {
            return into_object(value, line);
        }
    }

    // (b) re-slice from the first `{` to the last `}`
    for text in std::iter::once(candidate).chain(raw.filter(|r| *r != candidate)) {
        if let Some(value) = outermost_braces(text) {
            return into_object(value, line);
        }
    }

    Err(ExtractError::InvalidJson {
        line,
        message: first_error,
    })
}

/// Parse `text` with closing braces appended, when it opens more braces than it closes.
fn close_unbalanced(text: &str) -> Option<Value> {
    let mut scanner = BraceScanner::default();
    if scanner.feed(text).is_some() || scanner.depth == 0 || scanner.in_string {
        return None;
    }
    serde_json::from_str(&format!("{text}{}", "}".repeat(scanner.depth))).ok()
}

fn outermost_braces(text: &str) -> Option<Value> {
    let open = text.find('{')?;
    let close = text.rfind('}')?;
    if open >= close {
        return None;
    }
    serde_json::from_str(&text[open..=close]).ok()
}

fn into_object(value: Value, line: u32) -> Result<Map<String, Value>, ExtractError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ExtractError::NotObject { line }),
    }
}

/// Turn a parsed declaration into a record with every default applied.
pub fn record_from_object(map: &Map<String, Value>, source: &RepoPath) -> ExposureRecord {
    let id = non_empty_str(map.get("id"))
        .map(str::to_string)
        .unwrap_or_else(|| source.file_stem().to_string());
    let name = non_empty_str(map.get("name"))
        .map(str::to_string)
        .unwrap_or_else(|| humanize(&id));
    let kind = non_empty_str(map.get("kind").or_else(|| map.get("type")))
        .map(ExposureKind::parse)
        .unwrap_or_default();
    let version = match map.get("version") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => DEFAULT_VERSION.to_string(),
    };

    let needs = map.get("needs").and_then(Value::as_object);
    let dependencies = needs
        .and_then(|n| n.get("deps").or_else(|| n.get("dependencies")))
        .map(string_set)
        .unwrap_or_default();
    let resources = needs
        .and_then(|n| n.get("resources"))
        .map(string_set)
        .unwrap_or_default();
    let capabilities = map
        .get("provides")
        .and_then(Value::as_object)
        .and_then(|p| p.get("capabilities"))
        .map(string_set)
        .unwrap_or_default();

    ExposureRecord {
        id,
        name,
        kind,
        version,
        needs: Needs {
            dependencies,
            resources,
        },
        provides: Provides { capabilities },
        source_path: source.clone(),
    }
}

/// Which fields of `map` fell back to defaults. `None` when the declaration is complete.
fn declaration_gap(
    map: &Map<String, Value>,
    record: &ExposureRecord,
    line: u32,
) -> Option<DeclarationGap> {
    type Accepts = fn(&Value) -> bool;
    let mut fields: Vec<(&str, Option<&Value>, Accepts)> = vec![
        ("id", map.get("id"), Value::is_string),
        ("name", map.get("name"), Value::is_string),
        ("kind", map.get("kind").or_else(|| map.get("type")), Value::is_string),
        ("version", map.get("version"), is_scalar),
        ("needs", map.get("needs"), Value::is_object),
        ("provides", map.get("provides"), Value::is_object),
    ];
    if let Some(needs) = map.get("needs").and_then(Value::as_object) {
        // No dependency list means no dependencies; only a wrong shape is reported.
        let lists = [
            ("needs.deps", needs.get("deps").or_else(|| needs.get("dependencies"))),
            ("needs.resources", needs.get("resources")),
        ];
        for (field, value) in lists {
            if value.is_some_and(|v| !v.is_null()) {
                fields.push((field, value, is_string_list));
            }
        }
    }
    if let Some(provides) = map.get("provides").and_then(Value::as_object) {
        fields.push(("provides.capabilities", provides.get("capabilities"), is_string_list));
    }

    let mut missing = Vec::new();
    let mut malformed = Vec::new();
    for (field, value, accepts) in fields {
        match value {
            None | Some(Value::Null) => missing.push(field.to_string()),
            Some(Value::String(s)) if s.trim().is_empty() => missing.push(field.to_string()),
            Some(v) if accepts(v) => {}
            Some(_) => malformed.push(field.to_string()),
        }
    }
    if missing.is_empty() && malformed.is_empty() {
        return None;
    }
    Some(DeclarationGap {
        id: record.id.clone(),
        path: record.source_path.clone(),
        line,
        missing,
        malformed,
    })
}

fn is_scalar(value: &Value) -> bool {
    value.is_string() || value.is_number()
}

fn is_string_list(value: &Value) -> bool {
    value.is_array() || value.is_string()
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// A list keeps its non-empty string entries; a lone string is a one-element set.
fn string_set(value: &Value) -> BTreeSet<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Value::String(s) if !s.trim().is_empty() => [s.trim().to_string()].into(),
        _ => BTreeSet::new(),
    }
}
