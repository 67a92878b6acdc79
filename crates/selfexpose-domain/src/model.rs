use selfexpose_types::{ExposureRecord, RepoPath};
use std::collections::BTreeSet;

/// Everything the extractor learned about one tree.
#[derive(Clone, Debug, Default)]
pub struct ScanModel {
    /// Number of candidate files after filtering.
    pub files_considered: u32,
    /// Records in discovery order (sorted path, then position in file).
    pub records: Vec<ExposureRecord>,
    /// Per-file problems, in discovery order.
    pub issues: Vec<FileIssue>,
    /// Declarations that parsed but relied on defaults, in discovery order.
    pub gaps: Vec<DeclarationGap>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum FileIssueKind {
    /// No marker within the scanned head of the file.
    MissingDeclaration,
    /// Marker found, but the declaration could not be turned into a JSON object.
    Unparseable,
    /// File could not be read or is not UTF-8.
    Unreadable,
}

impl FileIssueKind {
    pub fn is_failure(&self) -> bool {
        !matches!(self, FileIssueKind::MissingDeclaration)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileIssue {
    pub path: RepoPath,
    /// 1-based line of the marker, when known.
    pub line: Option<u32>,
    pub kind: FileIssueKind,
    pub message: String,
}

/// Fields one declaration left out or gave the wrong shape. Defaults stand in for all of them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeclarationGap {
    /// Record id after defaults were applied.
    pub id: String,
    pub path: RepoPath,
    /// 1-based marker line.
    pub line: u32,
    /// Absent, null or empty fields, in declaration field order.
    pub missing: Vec<String>,
    /// Fields present with a type that was ignored.
    pub malformed: Vec<String>,
}

impl ScanModel {
    pub fn files_with_declarations(&self) -> u32 {
        self.records
            .iter()
            .map(|r| &r.source_path)
            .collect::<BTreeSet<_>>()
            .len() as u32
    }

    pub fn files_missing_declaration(&self) -> u32 {
        self.issues
            .iter()
            .filter(|i| i.kind == FileIssueKind::MissingDeclaration)
            .count() as u32
    }

    /// Distinct files with at least one read or parse failure.
    pub fn files_failed(&self) -> u32 {
        self.issues
            .iter()
            .filter(|i| i.kind.is_failure())
            .map(|i| &i.path)
            .collect::<BTreeSet<_>>()
            .len() as u32
    }
}

/// `agent_manager` -> `Agent Manager`.
pub fn humanize(id: &str) -> String {
    id.split(['_', '-'])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
