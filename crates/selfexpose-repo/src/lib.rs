//! Repository adapters: discover candidate files, extract declarations, persist snapshots and
//! scan endpoint call sites.
//!
//! This crate is allowed to do filesystem IO. It never spawns processes and never writes
//! anything it was not asked to write.

#![forbid(unsafe_code)]

mod discover;
pub mod endpoints;
mod extract;
mod repository;

use anyhow::Context;
use camino::Utf8Path;
use selfexpose_domain::model::{FileIssue, FileIssueKind, ScanModel};
use selfexpose_domain::policy::ScanFilter;

pub use discover::discover_files;
pub use endpoints::{EndpointScan, EndpointScanner, RawEndpoint, scan_endpoints};
pub use extract::{ExtractError, FileExtraction, extract_file, extract_from_text, record_from_object};
pub use selfexpose_domain::model::humanize;
pub use repository::{ComponentGraph, ExposureRepository, GraphEdge, GraphMetadata, GraphNode};

/// Fuzz-friendly API for testing extraction robustness without filesystem access.
/// These functions are designed to never panic on any input.
pub mod fuzz {
    use super::*;
    use selfexpose_types::RepoPath;

    /// Run the extractor over arbitrary text with the default filter.
    ///
    /// Returns the number of records extracted. **Never panics** on any input.
    pub fn extract_declarations(text: &str) -> usize {
        let filter = ScanFilter::default();
        extract_from_text(text, &RepoPath::new("fuzz.py"), &filter)
            .records
            .len()
    }

    /// Same as [`extract_declarations`] with a caller-chosen length bound.
    ///
    /// **Never panics** on any input.
    pub fn extract_bounded(text: &str, max_declaration_len: usize) -> usize {
        let filter = ScanFilter {
            max_declaration_len,
            ..ScanFilter::default()
        };
        extract_from_text(text, &RepoPath::new("fuzz.py"), &filter)
            .records
            .len()
    }
}

/// Walk `root`, extract every declaration and collect per-file problems.
///
/// Per-file failures never abort the walk; they land in [`ScanModel::issues`].
pub fn scan_tree(root: &Utf8Path, filter: &ScanFilter) -> anyhow::Result<ScanModel> {
    let files = discover_files(root, filter).context("discover candidate files")?;
    let mut model = ScanModel {
        files_considered: files.len() as u32,
        ..ScanModel::default()
    };

    for file in &files {
        match extract_file(root, file, filter) {
            Ok(extraction) => {
                tracing::debug!(
                    path = %file,
                    records = extraction.records.len(),
                    errors = extraction.errors.len(),
                    gaps = extraction.gaps.len(),
                    "extracted"
                );
                if extraction.markers_found == 0 {
                    model.issues.push(FileIssue {
                        path: file.clone(),
                        line: None,
                        kind: FileIssueKind::MissingDeclaration,
                        message: format!(
                            "no declaration marker in the first {} lines",
                            filter.max_scan_lines
                        ),
                    });
                }
                for err in extraction.errors {
                    tracing::warn!(path = %file, error = %err, "unparseable declaration");
                    model.issues.push(issue_from_error(file, &err));
                }
                model.records.extend(extraction.records);
                model.gaps.extend(extraction.gaps);
            }
            Err(err) => {
                tracing::warn!(path = %file, error = %err, "unreadable file");
                model.issues.push(issue_from_error(file, &err));
            }
        }
    }

    tracing::info!(
        files = model.files_considered,
        records = model.records.len(),
        failed = model.files_failed(),
        "scan complete"
    );
    Ok(model)
}

fn issue_from_error(path: &selfexpose_types::RepoPath, err: &ExtractError) -> FileIssue {
    let kind = if err.is_read_failure() {
        FileIssueKind::Unreadable
    } else {
        FileIssueKind::Unparseable
    };
    FileIssue {
        path: path.clone(),
        line: err.line(),
        kind,
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn extractor_never_panics(text in "\\PC{0,400}") {
            let _ = fuzz::extract_declarations(&text);
        }

        #[test]
        fn extractor_never_panics_on_marker_soup(
            body in "[{}\"\\\\#/*<!->\n a-z:,\\[\\]]{0,200}",
            bound in 0usize..64,
        ) {
            let text = format!("# @self-expose: {body}");
            let _ = fuzz::extract_bounded(&text, bound);
        }
    }
}
